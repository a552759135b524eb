//! heidi-guide is a terminal client for a clinical notes analysis service.
//!
//! The crate is organized around a small set of collaborating layers:
//! - [`api`] defines the request and response payloads of the analysis service.
//! - [`core`] owns the HTTP transport, the request lifecycle controller, the
//!   pure response renderer, and configuration.
//! - [`ui`] draws the full-screen interface and runs the event loop that feeds
//!   keyboard input into the controller.
//! - [`cli`] parses arguments and dispatches to the interface, the one-shot
//!   `ask` command, or configuration commands.
//!
//! Runtime entrypoints live in the binary crate (`src/main.rs`) and route
//! through [`crate::cli::main`].

pub mod api;
pub mod cli;
pub mod core;
pub mod ui;
pub mod utils;
