/// Lobby configuration constants.
///
/// This module defines parameters for the lobby: connection ceiling,
/// idle shutdown and frame limits.
pub const MAX_CONNECTIONS: usize = 2;

/// Time (in seconds) without any inbound frame before an idle server shuts down.
pub const IDLE_TIMEOUT_SECS: u64 = 120;

/// How often (in seconds) the lobby checks for inactivity.
pub const IDLE_CHECK_INTERVAL_SECS: u64 = 10;

/// Maximum length of a single inbound frame, in bytes (newline excluded).
pub const MAX_FRAME_LENGTH: usize = 1024;
