//! Shared constants used across the application

/// Backend chat endpoint used when neither the command line, the
/// environment, nor the config file names one.
pub const DEFAULT_ENDPOINT: &str = "http://localhost:8000/api/chat/";

/// Environment variable that overrides the configured endpoint.
pub const ENDPOINT_ENV_VAR: &str = "SIDECHAT_ENDPOINT";

/// Environment variable naming a file that receives diagnostic traces.
pub const DIAGNOSTICS_ENV_VAR: &str = "SIDECHAT_LOG";

/// Panel title when the config does not set one.
pub const DEFAULT_TITLE: &str = "EHS Chatbot";

/// How long a notification stays on screen unless the config overrides it.
pub const DEFAULT_NOTIFICATION_SECONDS: u64 = 3;

/// Width of the side panel on wide terminals. Narrow terminals get 90% of
/// their width instead.
pub const PANEL_WIDTH: u16 = 48;

/// Terminals narrower than this use the proportional panel width.
pub const NARROW_TERMINAL_WIDTH: u16 = 80;
