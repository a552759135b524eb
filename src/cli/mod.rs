//! Command-line interface parsing and handling
//!
//! This module parses command-line arguments, resolves where the analysis
//! service lives, and dispatches to the full-screen interface, the one-shot
//! `ask` command, or the configuration commands.

pub mod ask;
pub mod settings;

use std::error::Error;
use std::path::PathBuf;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use tracing::info;

use crate::cli::ask::run_ask;
use crate::cli::settings::{handle_config, handle_set, handle_unset};
use crate::core::app::App;
use crate::core::config::data::BASE_URL_ENV;
use crate::core::config::Config;
use crate::core::controller::RequestController;
use crate::core::plain_text::format_plain_text;
use crate::core::transport::{HttpTransport, Transport};
use crate::ui::event_loop::run_app;
use crate::ui::theme::Theme;
use crate::utils::logging::{init_logging, LogTarget};
use crate::utils::url::is_http_url;

#[derive(Parser)]
#[command(name = "heidi-guide")]
#[command(about = "Turn clinical notes into an antibiotic guide using the Heidi analysis service")]
#[command(
    long_about = "heidi-guide sends free-text medical notes to an analysis service and shows \
the structured result: the extracted drugs, how much reference material was found, a \
clinical summary, and the processing steps the service took.\n\n\
Environment Variables:\n\
  HEIDI_BASE_URL    Analysis service origin (defaults to http://localhost:8004)\n\
  HEIDI_LOG         Log filter, e.g. debug or heidi_guide=trace (defaults to info)\n\n\
Controls:\n\
  Type              Enter medical information in the editor\n\
  Enter             Ask Heidi for an antibiotic guide\n\
  Alt+Enter         Insert a newline\n\
  PgUp/PgDn/Mouse   Scroll the response\n\
  Ctrl+L            Clear the editor\n\
  Ctrl+C / Esc      Quit the application"
)]
pub struct Args {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Analysis service origin, overriding HEIDI_BASE_URL and the config file
    #[arg(long, global = true, value_name = "URL")]
    pub base_url: Option<String>,

    /// Give up on a request after this many seconds (0 waits indefinitely)
    #[arg(long, global = true, value_name = "SECONDS")]
    pub timeout: Option<u64>,

    /// Write diagnostic logs to the specified file
    #[arg(short = 'l', long, global = true)]
    pub log: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start the full-screen interface (default)
    Run,
    /// Analyze notes once and print the result without the full-screen interface
    Ask {
        /// Notes to analyze; read from --file or stdin when omitted
        #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
        notes: Vec<String>,
        /// Read the notes from this file
        #[arg(short = 'f', long, conflicts_with = "notes")]
        file: Option<PathBuf>,
    },
    /// Set configuration values
    Set {
        /// Configuration key to set (base-url, timeout, theme)
        key: String,
        /// Value to set for the key
        #[arg(trailing_var_arg = true)]
        value: Vec<String>,
    },
    /// Unset configuration values
    Unset {
        /// Configuration key to unset
        key: String,
    },
    /// Show the current configuration
    Config,
}

pub fn main() -> Result<(), Box<dyn Error>> {
    let args = Args::parse();
    tokio::runtime::Runtime::new()?.block_on(async_main(args))
}

async fn async_main(args: Args) -> Result<(), Box<dyn Error>> {
    let Args {
        command,
        base_url,
        timeout,
        log,
    } = args;

    match command.unwrap_or(Commands::Run) {
        Commands::Set { key, value } => handle_set(&key, &value.join(" ")),
        Commands::Unset { key } => handle_unset(&key),
        Commands::Config => handle_config(),
        Commands::Run => {
            start_logging(log.as_deref(), true);
            let config = Config::load()?;
            let (base_url, transport) = connect(&config, base_url.as_deref(), timeout)?;
            let theme = config
                .theme
                .as_deref()
                .and_then(Theme::from_name)
                .unwrap_or_else(Theme::dark_default);

            let app = App::new(RequestController::new(transport), theme, base_url);
            let app = run_app(app).await?;

            // Leave the last result on the normal screen once the interface closes.
            if app.state().is_settled() {
                println!("{}", format_plain_text(&app.view()));
            }
            Ok(())
        }
        Commands::Ask { notes, file } => {
            start_logging(log.as_deref(), false);
            let config = Config::load()?;
            let (_, transport) = connect(&config, base_url.as_deref(), timeout)?;
            run_ask(notes, file, transport).await
        }
    }
}

fn start_logging(log_file: Option<&std::path::Path>, interactive: bool) {
    if let Err(err) = init_logging(LogTarget::select(log_file, interactive)) {
        eprintln!("⚠️  Logging disabled: {err}");
    }
}

fn connect(
    config: &Config,
    base_url_flag: Option<&str>,
    timeout_flag: Option<u64>,
) -> Result<(String, Arc<dyn Transport>), Box<dyn Error>> {
    let env_base_url = std::env::var(BASE_URL_ENV).ok();
    let base_url = config.resolve_base_url(base_url_flag, env_base_url.as_deref());
    if !is_http_url(&base_url) {
        eprintln!("❌ Invalid base URL: {base_url} (expected http:// or https://)");
        std::process::exit(1);
    }

    let timeout = config.resolve_timeout(timeout_flag);
    let transport = HttpTransport::new(&base_url, timeout)?;
    info!(endpoint = %transport.endpoint(), ?timeout, "using analysis service");

    Ok((base_url, Arc::new(transport)))
}
