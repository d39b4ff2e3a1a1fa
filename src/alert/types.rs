use serde::{Deserialize, Serialize};

use crate::detect::ObjectClass;

/// Alert severity. Ordered so that `Critical > Warning > Info`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Info,
    Warning,
    Critical,
}

impl Severity {
    pub fn label(&self) -> &'static str {
        match self {
            Severity::Critical => "CRITICAL",
            Severity::Warning => "WARNING",
            Severity::Info => "INFO",
        }
    }
}

/// A derived alert. Alerts are rebuilt on every cycle and never persisted.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Alert {
    pub severity: Severity,
    pub message: String,
    pub tool: ObjectClass,
    /// Monotonic clock reading in milliseconds at evaluation time.
    pub timestamp_ms: u64,
}

impl Alert {
    /// Message prefixed with its severity, e.g. `WARNING: Toolbox not detected.`
    pub fn headline(&self) -> String {
        format!("{}: {}", self.severity.label(), self.message)
    }
}

/// Alert panel contents.
///
/// `Nominal` is an explicit positive state; it is never represented by an
/// empty list.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", content = "alerts", rename_all = "snake_case")]
pub enum AlertStatus {
    Nominal,
    Active(Vec<Alert>),
}

impl AlertStatus {
    pub fn is_nominal(&self) -> bool {
        matches!(self, AlertStatus::Nominal)
    }

    pub fn alerts(&self) -> &[Alert] {
        match self {
            AlertStatus::Nominal => &[],
            AlertStatus::Active(alerts) => alerts,
        }
    }
}
