//! Projection of a [`RequestState`] into ordered display sections.
//!
//! The projection is pure: it reads a state snapshot and never touches the
//! controller. A settled state always yields the same five slots in the same
//! order, each either present with content or explicitly absent, so every
//! display surface lays sections out identically.

use crate::api::AnalysisResult;
use crate::core::controller::RequestState;

pub const IDLE_PLACEHOLDER: &str = "Results will appear here";
pub const LOADING_PLACEHOLDER: &str = "Processing your request...";
pub const NONE_IDENTIFIED: &str = "None identified";
pub const MEDICAL_DISCLAIMER: &str = "This summary is generated automatically and is not a \
substitute for professional clinical judgement. Verify all drug information against current \
guidelines before acting on it.";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SectionKind {
    Status,
    ExtractedDrugs,
    ReferenceContext,
    ClinicalSummary,
    ProcessingSteps,
}

impl SectionKind {
    pub const ORDER: [SectionKind; 5] = [
        SectionKind::Status,
        SectionKind::ExtractedDrugs,
        SectionKind::ReferenceContext,
        SectionKind::ClinicalSummary,
        SectionKind::ProcessingSteps,
    ];

    pub fn title(self) -> &'static str {
        match self {
            SectionKind::Status => "Status",
            SectionKind::ExtractedDrugs => "Extracted Drugs",
            SectionKind::ReferenceContext => "Reference Context",
            SectionKind::ClinicalSummary => "Clinical Summary",
            SectionKind::ProcessingSteps => "Processing Steps",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Success,
    Failure,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SectionContent {
    Absent,
    Status { outcome: Outcome, text: String },
    Text(String),
    /// Verbatim narrative; the disclaimer is rendered directly beneath it.
    Summary { text: String, disclaimer: &'static str },
    List(Vec<String>),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Section {
    pub kind: SectionKind,
    pub content: SectionContent,
}

impl Section {
    fn new(kind: SectionKind, content: SectionContent) -> Self {
        Self { kind, content }
    }

    fn absent(kind: SectionKind) -> Self {
        Self::new(kind, SectionContent::Absent)
    }

    pub fn is_present(&self) -> bool {
        !matches!(self.content, SectionContent::Absent)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum View {
    /// Nothing settled yet, or a request is in flight.
    Placeholder(&'static str),
    /// All five slots in [`SectionKind::ORDER`].
    Sections(Vec<Section>),
}

impl View {
    pub fn sections(&self) -> &[Section] {
        match self {
            View::Placeholder(_) => &[],
            View::Sections(sections) => sections,
        }
    }

    pub fn present_sections(&self) -> impl Iterator<Item = &Section> {
        self.sections().iter().filter(|section| section.is_present())
    }

    /// The content of `kind` when it is present.
    pub fn section(&self, kind: SectionKind) -> Option<&SectionContent> {
        self.present_sections()
            .find(|section| section.kind == kind)
            .map(|section| &section.content)
    }
}

pub fn render(state: &RequestState) -> View {
    match state {
        RequestState::Idle => View::Placeholder(IDLE_PLACEHOLDER),
        RequestState::Loading => View::Placeholder(LOADING_PLACEHOLDER),
        RequestState::Succeeded(payload) => View::Sections(success_sections(payload)),
        RequestState::Failed(message) => View::Sections(failure_sections(message)),
    }
}

fn success_sections(payload: &AnalysisResult) -> Vec<Section> {
    SectionKind::ORDER
        .iter()
        .map(|&kind| {
            let content = match kind {
                SectionKind::Status => SectionContent::Status {
                    outcome: Outcome::Success,
                    text: payload.message.clone(),
                },
                SectionKind::ExtractedDrugs => SectionContent::Text(drug_list(payload)),
                SectionKind::ReferenceContext => match payload.reference_chunk_count() {
                    0 => SectionContent::Absent,
                    count => SectionContent::Text(format!(
                        "Found {count} relevant reference chunks"
                    )),
                },
                SectionKind::ClinicalSummary => match payload.summary() {
                    Some(text) => SectionContent::Summary {
                        text: text.to_string(),
                        disclaimer: MEDICAL_DISCLAIMER,
                    },
                    None => SectionContent::Absent,
                },
                SectionKind::ProcessingSteps => match payload.steps() {
                    [] => SectionContent::Absent,
                    steps => SectionContent::List(numbered(steps)),
                },
            };
            Section::new(kind, content)
        })
        .collect()
}

fn failure_sections(message: &str) -> Vec<Section> {
    SectionKind::ORDER
        .iter()
        .map(|&kind| match kind {
            SectionKind::Status => Section::new(
                kind,
                SectionContent::Status {
                    outcome: Outcome::Failure,
                    text: message.to_string(),
                },
            ),
            _ => Section::absent(kind),
        })
        .collect()
}

fn drug_list(payload: &AnalysisResult) -> String {
    match payload.drugs() {
        [] => NONE_IDENTIFIED.to_string(),
        drugs => drugs.join(", "),
    }
}

fn numbered(steps: &[String]) -> Vec<String> {
    steps
        .iter()
        .enumerate()
        .map(|(index, step)| format!("{}. {step}", index + 1))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::controller::FAILURE_MESSAGE;
    use serde_json::json;

    fn succeeded(payload: serde_json::Value) -> RequestState {
        RequestState::Succeeded(serde_json::from_value(payload).expect("valid payload"))
    }

    fn kinds(view: &View) -> Vec<SectionKind> {
        view.present_sections().map(|section| section.kind).collect()
    }

    #[test]
    fn idle_and_loading_render_single_placeholder() {
        assert_eq!(
            render(&RequestState::Idle),
            View::Placeholder(IDLE_PLACEHOLDER)
        );
        let loading = render(&RequestState::Loading);
        assert_eq!(loading, View::Placeholder(LOADING_PLACEHOLDER));
        assert!(loading.sections().is_empty());
    }

    #[test]
    fn settled_views_always_carry_five_ordered_slots() {
        let states = [
            succeeded(json!({"message": "ok"})),
            succeeded(json!({
                "message": "ok",
                "extracted_drugs": ["a"],
                "vector_context": [{}],
                "final_summary": "s",
                "processing_steps": ["p"]
            })),
            RequestState::Failed(FAILURE_MESSAGE.to_string()),
        ];

        for state in &states {
            let view = render(state);
            let order: Vec<SectionKind> = view.sections().iter().map(|s| s.kind).collect();
            assert_eq!(order, SectionKind::ORDER.to_vec());
        }
    }

    #[test]
    fn missing_or_empty_drugs_read_none_identified() {
        for payload in [
            json!({"message": "ok"}),
            json!({"message": "ok", "extracted_drugs": []}),
            json!({"message": "ok", "extracted_drugs": null}),
        ] {
            let view = render(&succeeded(payload));
            assert_eq!(
                view.section(SectionKind::ExtractedDrugs),
                Some(&SectionContent::Text("None identified".into()))
            );
        }
    }

    #[test]
    fn drugs_join_in_order_with_comma_space() {
        let view = render(&succeeded(json!({
            "message": "ok",
            "extracted_drugs": ["amoxicillin", "metronidazole"]
        })));
        assert_eq!(
            view.section(SectionKind::ExtractedDrugs),
            Some(&SectionContent::Text("amoxicillin, metronidazole".into()))
        );
    }

    #[test]
    fn reference_context_reports_count_only() {
        let chunks: Vec<serde_json::Value> = (0..7)
            .map(|i| json!({"content": format!("chunk {i}"), "source": "guide.pdf"}))
            .collect();
        let view = render(&succeeded(json!({"message": "ok", "vector_context": chunks})));
        assert_eq!(
            view.section(SectionKind::ReferenceContext),
            Some(&SectionContent::Text(
                "Found 7 relevant reference chunks".into()
            ))
        );

        for payload in [
            json!({"message": "ok", "vector_context": []}),
            json!({"message": "ok"}),
        ] {
            let view = render(&succeeded(payload));
            assert_eq!(view.section(SectionKind::ReferenceContext), None);
        }
    }

    #[test]
    fn summary_and_disclaimer_render_together() {
        let text = "Amoxicillin:\n  500mg TDS\n\nAvoid in penicillin allergy.";
        let view = render(&succeeded(json!({"message": "ok", "final_summary": text})));
        assert_eq!(
            view.section(SectionKind::ClinicalSummary),
            Some(&SectionContent::Summary {
                text: text.to_string(),
                disclaimer: MEDICAL_DISCLAIMER,
            })
        );

        let view = render(&succeeded(json!({"message": "ok"})));
        assert_eq!(view.section(SectionKind::ClinicalSummary), None);
        let view = render(&succeeded(json!({"message": "ok", "final_summary": ""})));
        assert_eq!(view.section(SectionKind::ClinicalSummary), None);
    }

    #[test]
    fn processing_steps_are_one_indexed_in_order() {
        let view = render(&succeeded(json!({
            "message": "ok",
            "processing_steps": ["Extract drugs", "Query references", "Summarize"]
        })));
        assert_eq!(
            view.section(SectionKind::ProcessingSteps),
            Some(&SectionContent::List(vec![
                "1. Extract drugs".into(),
                "2. Query references".into(),
                "3. Summarize".into(),
            ]))
        );

        let view = render(&succeeded(json!({"message": "ok", "processing_steps": []})));
        assert_eq!(view.section(SectionKind::ProcessingSteps), None);
    }

    #[test]
    fn status_carries_message_and_success_framing() {
        let view = render(&succeeded(json!({"message": "Processed"})));
        assert_eq!(
            view.section(SectionKind::Status),
            Some(&SectionContent::Status {
                outcome: Outcome::Success,
                text: "Processed".into()
            })
        );
        assert_eq!(
            kinds(&view),
            vec![SectionKind::Status, SectionKind::ExtractedDrugs]
        );
    }

    #[test]
    fn failure_shows_only_status() {
        let view = render(&RequestState::Failed(FAILURE_MESSAGE.to_string()));
        assert_eq!(kinds(&view), vec![SectionKind::Status]);
        assert_eq!(
            view.section(SectionKind::Status),
            Some(&SectionContent::Status {
                outcome: Outcome::Failure,
                text: FAILURE_MESSAGE.into()
            })
        );
    }
}
