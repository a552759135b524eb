//! Event polling, dispatching, and UI rendering loop.
//!
//! Terminal events are read on a background task and forwarded over a
//! channel; the loop drains them, lets the controller pick up any finished
//! request, and redraws when something changed. The loop itself never waits
//! on the network.

use std::{
    error::Error,
    time::{Duration, Instant},
};

use ratatui::crossterm::event::{
    self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseEventKind,
};
use tokio::sync::mpsc;
use tracing::debug;

use crate::core::app::App;
use crate::core::controller::SubmitOutcome;
use crate::ui::lifecycle::{restore_terminal, setup_terminal, AppTerminal};
use crate::ui::renderer::ui;

const PAGE_SCROLL_LINES: u16 = 10;
const WHEEL_SCROLL_LINES: u16 = 3;

#[derive(Debug)]
pub enum UiEvent {
    Crossterm(Event),
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct EventOutcome {
    pub request_redraw: bool,
    pub exit_requested: bool,
}

impl EventOutcome {
    fn redraw() -> Self {
        Self {
            request_redraw: true,
            exit_requested: false,
        }
    }

    fn exit() -> Self {
        Self {
            request_redraw: true,
            exit_requested: true,
        }
    }
}

pub fn route_key_event(app: &mut App, key: KeyEvent) -> EventOutcome {
    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);

    match key.code {
        KeyCode::Char('c') if ctrl => return EventOutcome::exit(),
        KeyCode::Esc => return EventOutcome::exit(),
        KeyCode::Char('l') if ctrl => {
            app.clear_input();
            return EventOutcome::redraw();
        }
        KeyCode::PageUp => {
            app.scroll_results_up(PAGE_SCROLL_LINES);
            return EventOutcome::redraw();
        }
        KeyCode::PageDown => {
            app.scroll_results_down(PAGE_SCROLL_LINES);
            return EventOutcome::redraw();
        }
        KeyCode::Enter
            if key
                .modifiers
                .intersects(KeyModifiers::ALT | KeyModifiers::SHIFT) =>
        {
            app.edit_input(|ta| ta.insert_newline());
            return EventOutcome::redraw();
        }
        KeyCode::Enter => {
            if let SubmitOutcome::Started { request_id } = app.submit() {
                debug!(request_id, "submitted from editor");
            }
            return EventOutcome::redraw();
        }
        _ => {}
    }

    let applied = app.edit_input(|ta| {
        ta.input(tui_textarea::Input::from(key));
    });
    EventOutcome {
        request_redraw: applied,
        exit_requested: false,
    }
}

pub fn handle_ui_event(app: &mut App, ev: UiEvent) -> EventOutcome {
    match ev {
        UiEvent::Crossterm(Event::Key(key)) if key.kind == KeyEventKind::Press => {
            route_key_event(app, key)
        }
        UiEvent::Crossterm(Event::Paste(text)) => EventOutcome {
            request_redraw: app.paste(&text),
            exit_requested: false,
        },
        UiEvent::Crossterm(Event::Mouse(mouse)) => match mouse.kind {
            MouseEventKind::ScrollUp => {
                app.scroll_results_up(WHEEL_SCROLL_LINES);
                EventOutcome::redraw()
            }
            MouseEventKind::ScrollDown => {
                app.scroll_results_down(WHEEL_SCROLL_LINES);
                EventOutcome::redraw()
            }
            _ => EventOutcome::default(),
        },
        UiEvent::Crossterm(Event::Resize(_, _)) => EventOutcome::redraw(),
        UiEvent::Crossterm(_) => EventOutcome::default(),
    }
}

fn spawn_event_reader(event_tx: mpsc::UnboundedSender<UiEvent>) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        loop {
            if let Ok(true) = event::poll(Duration::from_millis(10)) {
                match event::read() {
                    Ok(ev) => {
                        if event_tx.send(UiEvent::Crossterm(ev)).is_err() {
                            break;
                        }
                    }
                    Err(_) => {
                        continue;
                    }
                }
            } else {
                tokio::task::yield_now().await;
            }
        }
    })
}

async fn main_loop(
    app: &mut App,
    terminal: &mut AppTerminal,
    event_rx: &mut mpsc::UnboundedReceiver<UiEvent>,
) -> Result<(), Box<dyn Error>> {
    const MAX_FPS: u64 = 30;
    let frame_duration = Duration::from_millis(1000 / MAX_FPS);
    let mut request_redraw = true;
    let mut last_draw = Instant::now() - frame_duration;

    loop {
        // Keep the loading indicator animated while a request is in flight.
        let animate = app.is_loading() && last_draw.elapsed() >= frame_duration;
        if request_redraw || animate {
            terminal.draw(|f| ui(f, app))?;
            last_draw = Instant::now();
            request_redraw = false;
        }

        let mut events_processed = false;
        while let Ok(ev) = event_rx.try_recv() {
            events_processed = true;
            let outcome = handle_ui_event(app, ev);
            if outcome.exit_requested {
                app.exit_requested = true;
                return Ok(());
            }
            request_redraw |= outcome.request_redraw;
        }

        if app.poll_settlement() {
            request_redraw = true;
        }

        if !events_processed && !request_redraw {
            tokio::time::sleep(Duration::from_millis(16)).await;
        }
    }
}

/// Run the full-screen interface until the user quits, handing the session
/// back so the caller can print the last result.
pub async fn run_app(mut app: App) -> Result<App, Box<dyn Error>> {
    let mut terminal = setup_terminal()?;

    let (event_tx, mut event_rx) = mpsc::unbounded_channel::<UiEvent>();
    let event_reader_handle = spawn_event_reader(event_tx);

    let result = main_loop(&mut app, &mut terminal, &mut event_rx).await;

    event_reader_handle.abort();
    restore_terminal(&mut terminal)?;

    result.map(|()| app)
}
