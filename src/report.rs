//! Plain-text rendering of a monitor snapshot.

use std::fmt::Write;

use crate::alert::{AlertStatus, Severity};
use crate::monitor::Snapshot;

pub const NOMINAL_BANNER: &str = "ALL EMERGENCY TOOLS DETECTED";
pub const EMPTY_DETECTIONS: &str = "NO OBJECTS DETECTED ABOVE THRESHOLD";

/// Status line, e.g. `OBJECTS: 3 | CONFIDENCE: ≥70%`.
pub fn status_line(snapshot: &Snapshot) -> String {
    format!(
        "OBJECTS: {} | CONFIDENCE: ≥{}%",
        snapshot.detection_count, snapshot.threshold_percent
    )
}

/// Alert panel lines, or the nominal banner.
pub fn alert_lines(snapshot: &Snapshot) -> Vec<String> {
    match &snapshot.alerts {
        AlertStatus::Nominal => vec![NOMINAL_BANNER.to_string()],
        AlertStatus::Active(alerts) => alerts
            .iter()
            .map(|alert| {
                let marker = match alert.severity {
                    Severity::Critical => "!!",
                    Severity::Warning => " !",
                    Severity::Info => " i",
                };
                let mut line = format!("{} {}", marker, alert.headline().to_uppercase());
                if let Some(location) = snapshot.last_seen(alert.tool) {
                    let _ = write!(line, " (LAST SEEN: {})", location.to_uppercase());
                }
                line
            })
            .collect(),
    }
}

/// Full multi-line report for one cycle.
pub fn render(snapshot: &Snapshot) -> String {
    let controls = &snapshot.controls;
    let mut out = String::new();

    let _ = writeln!(
        out,
        "[cycle {} @ {}ms] {} - {}",
        snapshot.cycle,
        snapshot.timestamp_ms,
        controls.scenario.label().to_uppercase(),
        controls.scenario.description().to_uppercase()
    );
    let _ = writeln!(out, "  {}", status_line(snapshot));
    if controls.recording {
        let _ = writeln!(out, "  RECORDING");
    }
    if snapshot.critical {
        let _ = writeln!(out, "  *** CRITICAL ALERT: EMERGENCY TOOL MISSING ***");
    }

    let _ = writeln!(out, "  LIVE DETECTIONS:");
    if snapshot.visible.is_empty() {
        let _ = writeln!(out, "    {}", EMPTY_DETECTIONS);
    }
    for record in &snapshot.visible {
        let bbox = record.bounding_box;
        let _ = writeln!(
            out,
            "    {} {}% LOCATION: {} BBOX: {}, {}, {}x{}",
            record.class.display_name().to_uppercase(),
            record.confidence_percent(),
            record.location.to_uppercase(),
            bbox.x,
            bbox.y,
            bbox.width,
            bbox.height
        );
    }

    let _ = writeln!(out, "  ALERTS:");
    for line in alert_lines(snapshot) {
        let _ = writeln!(out, "    {}", line);
    }
    let _ = writeln!(
        out,
        "  AUDIO ALERTS: {}",
        if controls.audio_enabled {
            "ENABLED"
        } else {
            "DISABLED"
        }
    );
    out
}
