//! Wire types for the analysis service.
//!
//! The service exposes a single endpoint that accepts raw clinical notes and
//! replies with an [`AnalysisResult`]. Every field except `message` is
//! optional on the wire: a missing key and an explicit `null` both mean
//! "not provided", and unknown keys are ignored.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Path of the analysis endpoint, relative to the configured base URL.
pub const ASK_ENDPOINT: &str = "ask-heidi";

#[derive(Debug, Clone, Serialize)]
pub struct AskRequest<'a> {
    pub content: &'a str,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct AnalysisResult {
    pub message: String,
    #[serde(default)]
    pub extracted_drugs: Option<Vec<String>>,
    /// Reference chunks retrieved for the extracted drugs. Only the count is
    /// ever displayed, so the records are kept as opaque JSON.
    #[serde(default)]
    pub vector_context: Option<Vec<Value>>,
    #[serde(default)]
    pub final_summary: Option<String>,
    #[serde(default)]
    pub processing_steps: Option<Vec<String>>,
}

impl AnalysisResult {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            extracted_drugs: None,
            vector_context: None,
            final_summary: None,
            processing_steps: None,
        }
    }

    pub fn drugs(&self) -> &[String] {
        self.extracted_drugs.as_deref().unwrap_or_default()
    }

    pub fn reference_chunk_count(&self) -> usize {
        self.vector_context.as_ref().map_or(0, Vec::len)
    }

    pub fn summary(&self) -> Option<&str> {
        self.final_summary.as_deref().filter(|text| !text.is_empty())
    }

    pub fn steps(&self) -> &[String] {
        self.processing_steps.as_deref().unwrap_or_default()
    }
}
