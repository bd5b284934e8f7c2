//! sidechat is a terminal chat widget for a single backend chat endpoint.
//!
//! The crate is organized around a small set of collaborating layers:
//! - [`core`] owns the widget state: the panel flag, the conversation, the
//!   turn executor that talks to the backend, notifications, and config.
//! - [`ui`] renders the toggle button and side panel and runs the
//!   interactive event loop.
//! - [`utils`] holds layout/scroll math, transcript logging, diagnostics and
//!   endpoint validation.
//!
//! Runtime entrypoints live in the binary crate (`src/main.rs`) and route
//! through [`crate::cli::main`].

pub mod cli;
pub mod core;
pub mod ui;
pub mod utils;
