//! Observable lifecycle events.

use std::fmt;

/// Events emitted by the service
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    /// Process startup begins
    ServerStart,
    /// Configuration loaded and validated
    ConfigLoaded,
    /// Listener bound, ready to serve
    ServerListening,
    /// Request answered with a non-5xx status
    RequestComplete,
    /// Request answered with a 5xx status
    RequestFailed,
    /// Graceful shutdown finished
    ServerStopped,
    /// Startup aborted
    StartupFailed,
}

impl Event {
    pub fn as_str(&self) -> &'static str {
        match self {
            Event::ServerStart => "SERVER_START",
            Event::ConfigLoaded => "CONFIG_LOADED",
            Event::ServerListening => "SERVER_LISTENING",
            Event::RequestComplete => "REQUEST_COMPLETE",
            Event::RequestFailed => "REQUEST_FAILED",
            Event::ServerStopped => "SERVER_STOPPED",
            Event::StartupFailed => "STARTUP_FAILED",
        }
    }

    /// Whether this event ends the process
    pub fn is_fatal(&self) -> bool {
        matches!(self, Event::StartupFailed)
    }

    /// Whether this event reports a failure
    pub fn is_failure(&self) -> bool {
        matches!(self, Event::RequestFailed | Event::StartupFailed)
    }
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
