use std::time::Duration;

use crate::codec::DecoderLimits;

/// Default capacity of the per-session read buffer
pub const DEFAULT_READ_BUFFER_SIZE: usize = 1024;

/// Per-session settings.
///
/// ```
/// use aio_http::connection::SessionConfig;
/// use std::time::Duration;
///
/// let config = SessionConfig::default()
///     .with_read_buffer_size(4 * 1024)
///     .with_max_body_bytes(64 * 1024)
///     .with_idle_timeout(Duration::from_secs(30));
/// assert_eq!(config.idle_timeout(), Some(Duration::from_secs(30)));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionConfig {
    read_buffer_size: usize,
    limits: DecoderLimits,
    idle_timeout: Option<Duration>,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self { read_buffer_size: DEFAULT_READ_BUFFER_SIZE, limits: DecoderLimits::default(), idle_timeout: None }
    }
}

impl SessionConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Capacity of the buffer each read fills; lines longer than this still parse.
    pub fn with_read_buffer_size(mut self, size: usize) -> Self {
        self.read_buffer_size = size.max(1);
        self
    }

    pub fn with_max_header_bytes(mut self, max: usize) -> Self {
        self.limits.max_header_bytes = max;
        self
    }

    pub fn with_max_headers(mut self, max: usize) -> Self {
        self.limits.max_headers = max;
        self
    }

    pub fn with_max_body_bytes(mut self, max: usize) -> Self {
        self.limits.max_body_bytes = max;
        self
    }

    /// Closes the session when a single read or write takes longer than `timeout`.
    pub fn with_idle_timeout(mut self, timeout: Duration) -> Self {
        self.idle_timeout = Some(timeout);
        self
    }

    pub fn read_buffer_size(&self) -> usize {
        self.read_buffer_size
    }

    pub fn limits(&self) -> DecoderLimits {
        self.limits
    }

    pub fn idle_timeout(&self) -> Option<Duration> {
        self.idle_timeout
    }
}
