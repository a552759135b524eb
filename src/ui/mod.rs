//! Terminal UI layer.
//!
//! - [`event_loop`]: reads terminal events, routes keys into the session, and
//!   redraws while a request is in flight.
//! - [`renderer`]: composes the editor and response panes for each frame.
//! - [`theme`]: color and style policy.
//! - [`lifecycle`]: raw mode and alternate screen setup and teardown.
//!
//! This layer presents and captures interaction state, while [`crate::core`]
//! owns the request lifecycle and what the response says.

pub mod event_loop;
pub mod lifecycle;
pub mod renderer;
pub mod theme;
