//! Interactive session state.
//!
//! [`App`] pairs the [`RequestController`] with the presentation-only state of
//! the full-screen interface: the notes editor, the results scroll position,
//! the last validation notice, and the theme. All lifecycle decisions are
//! delegated to the controller; the editor is only a view of its input text.

use std::time::Instant;

use chrono::{DateTime, Local};
use tui_textarea::TextArea;

use crate::core::controller::{RequestController, RequestState, SubmitOutcome};
use crate::core::render::{render, View};
use crate::ui::theme::Theme;

pub const INPUT_PLACEHOLDER: &str = "Paste your medical information here...";

pub struct App {
    pub controller: RequestController,
    textarea: TextArea<'static>,
    pub theme: Theme,
    pub base_url: String,
    pub notice: Option<&'static str>,
    pub scroll_offset: u16,
    pub max_scroll_offset: u16,
    pub last_settled_at: Option<DateTime<Local>>,
    pub pulse_start: Instant,
    pub exit_requested: bool,
}

impl App {
    pub fn new(controller: RequestController, theme: Theme, base_url: String) -> Self {
        let mut app = Self {
            controller,
            textarea: TextArea::default(),
            theme,
            base_url,
            notice: None,
            scroll_offset: 0,
            max_scroll_offset: 0,
            last_settled_at: None,
            pulse_start: Instant::now(),
            exit_requested: false,
        };
        app.configure_textarea();
        app
    }

    fn configure_textarea(&mut self) {
        let textarea_style = self
            .theme
            .input_text_style
            .patch(ratatui::style::Style::default().bg(self.theme.background_color));
        self.textarea.set_style(textarea_style);
        self.textarea.set_cursor_style(self.theme.input_cursor_style);
        self.textarea
            .set_cursor_line_style(ratatui::style::Style::default());
        self.textarea.set_placeholder_text(INPUT_PLACEHOLDER);
        self.textarea
            .set_placeholder_style(self.theme.placeholder_style);
    }

    pub fn textarea(&self) -> &TextArea<'static> {
        &self.textarea
    }

    pub fn state(&self) -> &RequestState {
        self.controller.state()
    }

    pub fn is_loading(&self) -> bool {
        self.controller.state().is_loading()
    }

    pub fn view(&self) -> View {
        render(self.controller.state())
    }

    /// Apply an edit to the notes editor. Edits are refused while a request
    /// is in flight. Returns whether the edit was applied.
    pub fn edit_input<F>(&mut self, f: F) -> bool
    where
        F: FnOnce(&mut TextArea<'static>),
    {
        if self.is_loading() {
            return false;
        }
        f(&mut self.textarea);
        self.notice = None;
        self.sync_input_from_textarea()
    }

    fn sync_input_from_textarea(&mut self) -> bool {
        let text = self.textarea.lines().join("\n");
        self.controller.set_input(text)
    }

    pub fn set_input_text(&mut self, text: &str) -> bool {
        let applied = self.edit_input(|ta| {
            *ta = TextArea::from(text.split('\n').map(str::to_string));
            ta.move_cursor(tui_textarea::CursorMove::Bottom);
            ta.move_cursor(tui_textarea::CursorMove::End);
        });
        if applied {
            // A fresh TextArea drops the styling.
            self.configure_textarea();
        }
        applied
    }

    pub fn clear_input(&mut self) -> bool {
        self.set_input_text("")
    }

    pub fn paste(&mut self, raw: &str) -> bool {
        let text = sanitize_pasted_text(raw);
        self.edit_input(|ta| {
            for (index, segment) in text.split('\n').enumerate() {
                if index > 0 {
                    ta.insert_newline();
                }
                ta.insert_str(segment);
            }
        })
    }

    pub fn submit(&mut self) -> SubmitOutcome {
        let outcome = self.controller.submit_input();
        match &outcome {
            SubmitOutcome::Started { .. } => {
                self.notice = None;
                self.scroll_offset = 0;
                self.pulse_start = Instant::now();
            }
            SubmitOutcome::Rejected { notice } => self.notice = Some(*notice),
            SubmitOutcome::IgnoredWhileLoading => {}
        }
        outcome
    }

    /// Pick up a finished request, if any. Returns true when the state changed.
    pub fn poll_settlement(&mut self) -> bool {
        if !self.controller.poll_settlement() {
            return false;
        }
        self.last_settled_at = Some(Local::now());
        self.scroll_offset = 0;
        true
    }

    pub fn scroll_results_up(&mut self, lines: u16) {
        self.scroll_offset = self.scroll_offset.saturating_sub(lines);
    }

    pub fn scroll_results_down(&mut self, lines: u16) {
        self.scroll_offset = self
            .scroll_offset
            .saturating_add(lines)
            .min(self.max_scroll_offset);
    }
}

pub(crate) fn sanitize_pasted_text(text: &str) -> String {
    let without_crlf = text.replace("\r\n", "\n");
    let without_cr = without_crlf.replace('\r', "\n");
    without_cr.replace('\t', "    ")
}
