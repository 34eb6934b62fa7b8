//! Observability subsystem
//!
//! Structured one-line JSON logs for lifecycle and request events.
//! The repository layer never logs; the HTTP layer and the CLI do.
//!
//! # Usage
//!
//! ```ignore
//! use pizza_api::observability::{log_event_with_fields, Event};
//!
//! log_event_with_fields(Event::ServerListening, &[("addr", "0.0.0.0:3001")]);
//! ```

mod events;
mod logger;

pub use events::Event;
pub use logger::{Logger, Severity};

/// Severity an event is logged at
pub fn event_severity(event: Event) -> Severity {
    if event.is_fatal() {
        Severity::Fatal
    } else if event.is_failure() {
        Severity::Error
    } else {
        Severity::Info
    }
}

/// Log a lifecycle event
pub fn log_event(event: Event) {
    Logger::log(event_severity(event), event.as_str(), &[]);
}

/// Log a lifecycle event with fields
pub fn log_event_with_fields(event: Event, fields: &[(&str, &str)]) {
    Logger::log(event_severity(event), event.as_str(), fields);
}
