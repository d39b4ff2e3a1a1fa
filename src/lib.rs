//! Station Watch
//!
//! Emergency tool presence monitor for a space-station module. A detection
//! source reports which safety tools are in view; the monitor filters the
//! batch by confidence, derives alerts for the active emergency scenario and
//! drives voice, haptic and tone cues.
//!
//! # Architecture
//!
//! Data flows one way, evaluated leaf-first:
//!
//! 1. **Detection source**: produces a complete batch every cycle, replacing the last.
//! 2. **Detection filter**: keeps records at or above the confidence threshold.
//! 3. **Alert engine**: missing tools, critical flag, ranked alerts (at most three)
//!    and the next spoken message, de-duplicated against the last one spoken.
//!
//! # Module Structure
//!
//! - `detect`: Detection records, confidence filter, sources (mock)
//! - `scenario`: Emergency scenarios and their critical tools
//! - `alert`: Alert derivation engine
//! - `sink`: Device sinks (speech, vibration, tones)
//! - `clock`: Clock port and refresh cadence
//! - `monitor`: Single evaluation flow and presentation snapshot
//! - `report`: Text rendering of snapshots
//! - `config`: Configuration loading

pub mod alert;
pub mod clock;
pub mod config;
pub mod detect;
pub mod monitor;
pub mod report;
pub mod scenario;
pub mod sink;

pub use alert::{
    Alert, AlertEngine, AlertEngineState, AlertStatus, Evaluation, Severity, SpeechEvent,
};
pub use clock::{Clock, ManualClock, RefreshSchedule, SystemClock};
pub use config::MonitorConfig;
pub use detect::{
    filter_visible, BoundingBox, ConfidenceThreshold, DetectionRecord, DetectionSource,
    MockSource, ObjectClass, REQUIRED_TOOLS,
};
pub use monitor::{Controls, Monitor, Snapshot};
pub use scenario::Scenario;
pub use sink::{DeviceSink, Intensity, LogSink, NullSink, RecordingSink, ToneKind};
