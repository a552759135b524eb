use crate::core::app::App;
use crate::core::render::{Outcome, SectionContent, SectionKind, View};
use crate::ui::theme::Theme;
use ratatui::{
    layout::{Alignment, Constraint, Layout, Rect},
    style::Style,
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};
use unicode_width::UnicodeWidthChar;

pub const INPUT_TITLE: &str = "Enter Medical Information";
pub const RESULTS_TITLE: &str = "Heidi Response";
pub const SUBMIT_LABEL: &str = "Ask Heidi for Antibiotic Guide";
pub const SUBMITTING_LABEL: &str = "Sending to Heidi...";

pub fn ui(f: &mut Frame, app: &mut App) {
    let area = f.area();
    f.render_widget(
        Block::default().style(Style::default().bg(app.theme.background_color)),
        area,
    );

    let rows = Layout::vertical([
        Constraint::Length(1),
        Constraint::Min(3),
        Constraint::Length(1),
    ])
    .split(area);

    draw_title(f, app, rows[0]);

    let panes = Layout::horizontal([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(rows[1]);
    draw_input(f, app, panes[0]);
    draw_results(f, app, panes[1]);
    draw_hint(f, app, rows[2]);
}

fn draw_title(f: &mut Frame, app: &App, area: Rect) {
    let title = Line::from(vec![
        Span::styled("Heidi", app.theme.title_style),
        Span::styled(" · Antibiotic Guide", app.theme.hint_style),
        Span::styled(format!("  ({})", app.base_url), app.theme.hint_style),
    ]);
    f.render_widget(Paragraph::new(title), area);
}

fn draw_input(f: &mut Frame, app: &App, area: Rect) {
    let border_style = if app.is_loading() {
        app.theme.input_border_locked_style
    } else {
        app.theme.pane_border_style
    };
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(border_style)
        .title(Span::styled(INPUT_TITLE, app.theme.pane_title_style));
    let inner = block.inner(area);
    f.render_widget(block, area);
    f.render_widget(app.textarea(), inner);
}

fn draw_results(f: &mut Frame, app: &mut App, area: Rect) {
    let mut title = vec![Span::styled(RESULTS_TITLE, app.theme.pane_title_style)];
    if let Some(settled_at) = app.last_settled_at {
        title.push(Span::styled(
            format!(" • updated {}", settled_at.format("%H:%M:%S")),
            app.theme.hint_style,
        ));
    }
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(app.theme.pane_border_style)
        .title(Line::from(title));
    let inner = block.inner(area);

    let view = app.view();
    let lines = build_result_lines(&view, &app.theme);

    if let View::Placeholder(_) = view {
        // Vertically center the single placeholder line.
        let padding = inner.height.saturating_sub(1) / 2;
        let mut padded = vec![Line::default(); padding as usize];
        padded.extend(lines);
        app.max_scroll_offset = 0;
        app.scroll_offset = 0;
        let paragraph = Paragraph::new(padded)
            .block(block)
            .alignment(Alignment::Center);
        f.render_widget(paragraph, area);
        return;
    }

    // Wrapped here rather than by the paragraph so the row count used for
    // the scroll limit is exactly what gets drawn.
    let rows = prewrap_lines(&lines, inner.width);
    let total = u16::try_from(rows.len()).unwrap_or(u16::MAX);
    app.max_scroll_offset = total.saturating_sub(inner.height);
    app.scroll_offset = app.scroll_offset.min(app.max_scroll_offset);

    let paragraph = Paragraph::new(rows)
        .block(block)
        .scroll((app.scroll_offset, 0));
    f.render_widget(paragraph, area);
}

fn draw_hint(f: &mut Frame, app: &App, area: Rect) {
    let line = if let Some(notice) = app.notice {
        Line::from(Span::styled(notice, app.theme.notice_style))
    } else if app.is_loading() {
        Line::from(vec![
            Span::styled(
                pulse_symbol(app.pulse_start.elapsed().as_millis()),
                app.theme.loading_indicator_style,
            ),
            Span::raw(" "),
            Span::styled(SUBMITTING_LABEL, app.theme.hint_style),
        ])
    } else {
        Line::from(Span::styled(
            format!(
                "Enter: {SUBMIT_LABEL} • Alt+Enter: new line • Ctrl+L: clear • PgUp/PgDn: scroll • Ctrl+C: quit"
            ),
            app.theme.hint_style,
        ))
    };
    f.render_widget(Paragraph::new(line), area);
}

fn pulse_symbol(elapsed_ms: u128) -> &'static str {
    // Two pulses per second, ramping up then back down
    let elapsed = elapsed_ms as f32 / 1000.0;
    let pulse_phase = (elapsed * 2.0) % 2.0;
    let pulse_intensity = if pulse_phase < 1.0 {
        pulse_phase
    } else {
        2.0 - pulse_phase
    };

    if pulse_intensity < 0.33 {
        "○"
    } else if pulse_intensity < 0.66 {
        "◐"
    } else {
        "●"
    }
}

/// Lay out a view as styled lines. Absent sections produce nothing; every
/// present section is followed by a blank separator line.
pub fn build_result_lines(view: &View, theme: &Theme) -> Vec<Line<'static>> {
    let sections = match view {
        View::Placeholder(text) => {
            return vec![Line::from(Span::styled(*text, theme.hint_style))];
        }
        View::Sections(sections) => sections,
    };

    let mut lines = Vec::new();
    for section in sections.iter().filter(|section| section.is_present()) {
        if section.kind != SectionKind::Status {
            lines.push(Line::from(Span::styled(
                section.kind.title(),
                theme.heading_style,
            )));
        }

        match &section.content {
            SectionContent::Absent => {}
            SectionContent::Status { outcome, text } => {
                let (marker, style) = match outcome {
                    Outcome::Success => ("✓ ", theme.success_style),
                    Outcome::Failure => ("✗ ", theme.failure_style),
                };
                lines.push(Line::from(vec![
                    Span::styled(marker, style),
                    Span::styled(text.clone(), style),
                ]));
            }
            SectionContent::Text(text) => {
                lines.push(Line::from(Span::styled(text.clone(), theme.body_style)));
            }
            SectionContent::Summary { text, disclaimer } => {
                for raw in text.split('\n') {
                    lines.push(Line::from(Span::styled(raw.to_string(), theme.body_style)));
                }
                lines.push(Line::from(vec![
                    Span::styled("⚠ ", theme.disclaimer_style),
                    Span::styled(*disclaimer, theme.disclaimer_style),
                ]));
            }
            SectionContent::List(items) => {
                for item in items {
                    lines.push(Line::from(Span::styled(item.clone(), theme.body_style)));
                }
            }
        }

        lines.push(Line::default());
    }

    lines
}

/// Wrap styled lines to rows of at most `width` columns, breaking at spaces
/// and splitting words longer than a row. Spacing is kept as written and each
/// character keeps its span's style.
pub fn prewrap_lines(lines: &[Line<'_>], width: u16) -> Vec<Line<'static>> {
    let mut out = Vec::with_capacity(lines.len());
    for line in lines {
        let mut row = RowBuilder::new(usize::from(width.max(1)));
        let mut word: Vec<(char, Style)> = Vec::new();
        for span in &line.spans {
            for ch in span.content.chars() {
                if ch == ' ' {
                    row.place_word(&mut word, &mut out);
                    row.place_space(span.style, &mut out);
                } else {
                    word.push((ch, span.style));
                }
            }
        }
        row.place_word(&mut word, &mut out);
        row.finish(&mut out);
    }
    out
}

fn char_width(ch: char) -> usize {
    UnicodeWidthChar::width(ch).unwrap_or(0)
}

struct RowBuilder {
    width: usize,
    spans: Vec<Span<'static>>,
    used: usize,
    emitted: bool,
}

impl RowBuilder {
    fn new(width: usize) -> Self {
        Self {
            width,
            spans: Vec::new(),
            used: 0,
            emitted: false,
        }
    }

    fn push(&mut self, ch: char, style: Style) {
        match self.spans.last_mut() {
            Some(last) if last.style == style => last.content.to_mut().push(ch),
            _ => self.spans.push(Span::styled(ch.to_string(), style)),
        }
        self.used += char_width(ch);
    }

    fn break_row(&mut self, out: &mut Vec<Line<'static>>) {
        out.push(Line::from(std::mem::take(&mut self.spans)));
        self.used = 0;
        self.emitted = true;
    }

    fn place_word(&mut self, word: &mut Vec<(char, Style)>, out: &mut Vec<Line<'static>>) {
        if word.is_empty() {
            return;
        }
        let word_width: usize = word.iter().map(|(ch, _)| char_width(*ch)).sum();
        if self.used > 0 && self.used + word_width > self.width {
            self.break_row(out);
        }
        for (ch, style) in word.drain(..) {
            if self.used > 0 && self.used + char_width(ch) > self.width {
                self.break_row(out);
            }
            self.push(ch, style);
        }
    }

    fn place_space(&mut self, style: Style, out: &mut Vec<Line<'static>>) {
        if self.used < self.width {
            self.push(' ', style);
        } else {
            self.break_row(out);
        }
    }

    fn finish(mut self, out: &mut Vec<Line<'static>>) {
        if !self.spans.is_empty() || !self.emitted {
            out.push(Line::from(std::mem::take(&mut self.spans)));
        }
    }
}
