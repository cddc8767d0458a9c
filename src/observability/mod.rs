//! Observability for metadata operations
//!
//! Structured JSON logging of typed events. Logging is a side channel: it
//! never changes the result of an operation and never fails.
//!
//! ```ignore
//! use chunkmeta::observability::{log_event, Event, Logger, Severity};
//!
//! Logger::set_min_severity(Severity::Info);
//! log_event(Severity::Info, Event::ConfigLoaded, &[("path", "meta.json")]);
//! ```

mod events;
mod logger;

pub use events::Event;
pub use logger::{Logger, Severity};

/// Logs a typed event
pub fn log_event(severity: Severity, event: Event, fields: &[(&str, &str)]) {
    Logger::log(severity, event.as_str(), fields);
}
