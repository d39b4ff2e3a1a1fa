//! Alert derivation.
//!
//! Turns the visible detection set and the active scenario into the critical
//! flag, the ranked alert panel and the next spoken notification.

mod engine;
mod types;

pub use engine::{
    critical_message, derive_alerts, evaluate, missing_tools, warning_message, AlertEngine,
    AlertEngineState, Evaluation, SpeechEvent, LOW_CONFIDENCE_CUTOFF, MAX_ALERTS,
};
pub use types::{Alert, AlertStatus, Severity};
