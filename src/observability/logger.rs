//! Structured JSON logger
//!
//! - One log line = one JSON object = one event
//! - `event` and `severity` always present
//! - Field keys sorted, so identical events produce identical lines
//! - Synchronous, no buffering

use std::collections::BTreeMap;
use std::fmt;
use std::io::{self, Write};

use serde_json::Value;

/// Log severity levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Severity {
    /// Normal operations
    Info,
    /// Operation failures
    Error,
    /// Unrecoverable, process exits
    Fatal,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Info => "INFO",
            Severity::Error => "ERROR",
            Severity::Fatal => "FATAL",
        }
    }

    /// Errors and fatals go to stderr, everything else to stdout
    fn uses_stderr(&self) -> bool {
        *self >= Severity::Error
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Structured logger writing one JSON object per line
pub struct Logger;

impl Logger {
    /// Log an event with the given severity and fields
    pub fn log(severity: Severity, event: &str, fields: &[(&str, &str)]) {
        if severity.uses_stderr() {
            Self::log_to_writer(severity, event, fields, &mut io::stderr().lock());
        } else {
            Self::log_to_writer(severity, event, fields, &mut io::stdout().lock());
        }
    }

    fn log_to_writer<W: Write>(
        severity: Severity,
        event: &str,
        fields: &[(&str, &str)],
        writer: &mut W,
    ) {
        let mut line = format_line(severity, event, fields);
        line.push('\n');

        // Logging never fails the caller
        let _ = writer.write_all(line.as_bytes());
        let _ = writer.flush();
    }
}

/// Render one log line without the trailing newline.
///
/// `event` comes first and `severity` second; fields follow sorted by key.
/// A field named `event` or `severity` is dropped.
fn format_line(severity: Severity, event: &str, fields: &[(&str, &str)]) -> String {
    let sorted: BTreeMap<&str, &str> = fields
        .iter()
        .filter(|(key, _)| *key != "event" && *key != "severity")
        .copied()
        .collect();

    let mut line = String::with_capacity(64 + fields.len() * 24);
    line.push_str("{\"event\":");
    line.push_str(&json_string(event));
    line.push_str(",\"severity\":\"");
    line.push_str(severity.as_str());
    line.push('"');
    for (key, value) in sorted {
        line.push(',');
        line.push_str(&json_string(key));
        line.push(':');
        line.push_str(&json_string(value));
    }
    line.push('}');
    line
}

fn json_string(raw: &str) -> String {
    Value::String(raw.to_string()).to_string()
}

/// Capture logs to a buffer for testing
#[cfg(test)]
pub fn capture_log(severity: Severity, event: &str, fields: &[(&str, &str)]) -> String {
    let mut buffer = Vec::new();
    Logger::log_to_writer(severity, event, fields, &mut buffer);
    String::from_utf8(buffer).unwrap()
}
