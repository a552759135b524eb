//! TUI-less "ask" command

use std::error::Error;
use std::fs;
use std::io::{self, IsTerminal, Read};
use std::path::PathBuf;
use std::sync::Arc;

use crate::core::controller::{RequestController, RequestState, SubmitOutcome};
use crate::core::plain_text::format_plain_text;
use crate::core::render::render;
use crate::core::transport::Transport;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AskReport {
    Answer(String),
    Notice(&'static str),
    Failure(String),
}

pub async fn run_ask(
    notes: Vec<String>,
    file: Option<PathBuf>,
    transport: Arc<dyn Transport>,
) -> Result<(), Box<dyn Error>> {
    let notes = match read_notes(notes, file)? {
        Some(notes) => notes,
        None => {
            eprintln!("Usage: heidi-guide ask <notes> | --file <path> | < notes.txt");
            std::process::exit(1);
        }
    };

    match analyze(transport, &notes).await {
        AskReport::Answer(text) => {
            println!("{text}");
            Ok(())
        }
        AskReport::Notice(notice) => {
            eprintln!("⚠️  {notice}");
            std::process::exit(1);
        }
        AskReport::Failure(text) => {
            eprintln!("❌ {text}");
            std::process::exit(1);
        }
    }
}

/// Gather the notes from the command line, a file, or piped stdin. Returns
/// `None` when there is nothing to read and stdin is an interactive terminal.
fn read_notes(notes: Vec<String>, file: Option<PathBuf>) -> io::Result<Option<String>> {
    if let Some(path) = file {
        return fs::read_to_string(path).map(Some);
    }
    if !notes.is_empty() {
        return Ok(Some(notes.join(" ")));
    }

    let mut stdin = io::stdin();
    if stdin.is_terminal() {
        return Ok(None);
    }
    let mut buffer = String::new();
    stdin.read_to_string(&mut buffer)?;
    Ok(Some(buffer))
}

/// Run one request through a fresh controller and report the plain-text result.
pub async fn analyze(transport: Arc<dyn Transport>, notes: &str) -> AskReport {
    let mut controller = RequestController::new(transport);
    if let SubmitOutcome::Rejected { notice } = controller.submit(notes) {
        return AskReport::Notice(notice);
    }

    let state = controller.wait_for_settlement().await;
    let text = format_plain_text(&render(state));
    match state {
        RequestState::Failed(_) => AskReport::Failure(text),
        _ => AskReport::Answer(text),
    }
}
