//! Single-string rendering of a [`View`].
//!
//! This is the flat layout the service's first web client produced: the status
//! line, then one emoji-prefixed paragraph per present section. It is used for
//! the `ask` subcommand and for printing the last result after the full-screen
//! interface exits.

use crate::core::render::{SectionContent, SectionKind, View};

fn heading(kind: SectionKind) -> &'static str {
    match kind {
        SectionKind::Status => "",
        SectionKind::ExtractedDrugs => "💊 Extracted Drugs",
        SectionKind::ReferenceContext => "📚",
        SectionKind::ClinicalSummary => "🧠 Heidi's Clinical Summary",
        SectionKind::ProcessingSteps => "⚙️ Processing Steps",
    }
}

pub fn format_plain_text(view: &View) -> String {
    let sections = match view {
        View::Placeholder(text) => return (*text).to_string(),
        View::Sections(sections) => sections,
    };

    let mut out = String::new();
    for section in sections {
        match (&section.kind, &section.content) {
            (_, SectionContent::Absent) => continue,
            (_, SectionContent::Status { text, .. }) => {
                out.push_str(text);
                out.push_str("\n\n");
            }
            (SectionKind::ReferenceContext, SectionContent::Text(text)) => {
                out.push_str(&format!("{} {text}\n\n", heading(SectionKind::ReferenceContext)));
            }
            (kind, SectionContent::Text(text)) => {
                out.push_str(&format!("{}: {text}\n\n", heading(*kind)));
            }
            (kind, SectionContent::Summary { text, disclaimer }) => {
                out.push_str(&format!("{}:\n{text}\n\n⚠️ {disclaimer}\n\n", heading(*kind)));
            }
            (kind, SectionContent::List(items)) => {
                out.push_str(&format!("{}:\n", heading(*kind)));
                for item in items {
                    out.push_str(item);
                    out.push('\n');
                }
            }
        }
    }

    out.truncate(out.trim_end().len());
    out
}
