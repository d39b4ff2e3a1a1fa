use serde::Serialize;

use super::types::{Alert, AlertStatus, Severity};
use crate::detect::{DetectionRecord, ObjectClass, REQUIRED_TOOLS};
use crate::scenario::Scenario;
use crate::sink::{self, DeviceSink, Intensity, ToneKind};

/// Maximum number of alerts shown at once.
pub const MAX_ALERTS: usize = 3;

/// Visible detections below this confidence raise an occlusion notice.
pub const LOW_CONFIDENCE_CUTOFF: f32 = 0.8;

/// State carried between evaluations: the last message actually spoken.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct AlertEngineState {
    pub previous_spoken: Option<String>,
}

/// A new utterance selected by an evaluation.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct SpeechEvent {
    pub message: String,
    pub tool: ObjectClass,
    /// Set when the tool is the scenario's critical tool.
    pub critical: bool,
}

/// Result of one evaluation cycle.
#[derive(Clone, Debug, PartialEq)]
pub struct Evaluation {
    pub missing_tools: Vec<ObjectClass>,
    pub critical: bool,
    pub alerts: AlertStatus,
    pub speech: Option<SpeechEvent>,
    pub state: AlertEngineState,
}

/// Required tools absent from `visible`, in canonical order.
///
/// Unknown classes never satisfy a required tool.
pub fn missing_tools(visible: &[DetectionRecord]) -> Vec<ObjectClass> {
    REQUIRED_TOOLS
        .into_iter()
        .filter(|tool| !visible.iter().any(|record| record.class == *tool))
        .collect()
}

pub fn critical_message(tool: ObjectClass) -> String {
    match tool {
        ObjectClass::FireExtinguisher => {
            "Fire extinguisher not detected! Immediate location required.".to_string()
        }
        ObjectClass::OxygenTank => "Oxygen tank missing! Life support emergency.".to_string(),
        other => format!("{} not detected! Immediate location required.", other.display_name()),
    }
}

pub fn warning_message(tool: ObjectClass) -> String {
    format!("{} not detected.", tool.display_name())
}

fn low_confidence_message(record: &DetectionRecord) -> String {
    format!(
        "{} detected with low confidence ({}%). May be partially occluded.",
        record.class.display_name(),
        record.confidence_percent()
    )
}

/// Build the ranked, capped alert panel.
///
/// Groups are emitted critical, warning, info and truncated to `MAX_ALERTS`,
/// so occlusion notices can never push out a missing-tool alert.
pub fn derive_alerts(
    visible: &[DetectionRecord],
    missing: &[ObjectClass],
    scenario: Scenario,
    timestamp_ms: u64,
) -> AlertStatus {
    let alert = |severity, message, tool| Alert {
        severity,
        message,
        tool,
        timestamp_ms,
    };

    let critical = missing
        .iter()
        .filter(|tool| scenario.is_critical_tool(**tool))
        .map(|tool| alert(Severity::Critical, critical_message(*tool), *tool));
    let warnings = missing
        .iter()
        .filter(|tool| !scenario.is_critical_tool(**tool))
        .map(|tool| alert(Severity::Warning, warning_message(*tool), *tool));
    let info = visible
        .iter()
        .filter(|record| record.confidence < LOW_CONFIDENCE_CUTOFF)
        .map(|record| alert(Severity::Info, low_confidence_message(record), record.class));

    let alerts: Vec<Alert> = critical.chain(warnings).chain(info).take(MAX_ALERTS).collect();
    if alerts.is_empty() {
        AlertStatus::Nominal
    } else {
        AlertStatus::Active(alerts)
    }
}

/// Pure evaluation of one cycle.
pub fn evaluate(
    visible: &[DetectionRecord],
    scenario: Scenario,
    audio_enabled: bool,
    state: &AlertEngineState,
    timestamp_ms: u64,
) -> Evaluation {
    let missing = missing_tools(visible);
    let critical = scenario
        .critical_tool()
        .is_some_and(|tool| missing.contains(&tool));
    let alerts = derive_alerts(visible, &missing, scenario, timestamp_ms);

    // Critical tool first, otherwise the first missing tool in canonical order.
    let spoken_tool = scenario
        .critical_tool()
        .filter(|tool| missing.contains(tool))
        .or_else(|| missing.first().copied());

    let (speech, state) = match spoken_tool {
        None => (None, AlertEngineState::default()),
        Some(tool) => {
            let is_critical = scenario.is_critical_tool(tool);
            let message = if is_critical {
                critical_message(tool)
            } else {
                warning_message(tool)
            };
            if !audio_enabled || state.previous_spoken.as_deref() == Some(message.as_str()) {
                (None, state.clone())
            } else {
                (
                    Some(SpeechEvent {
                        message: message.clone(),
                        tool,
                        critical: is_critical,
                    }),
                    AlertEngineState {
                        previous_spoken: Some(message),
                    },
                )
            }
        }
    };

    Evaluation {
        missing_tools: missing,
        critical,
        alerts,
        speech,
        state,
    }
}

/// Alert engine owning the spoken-message memory.
#[derive(Debug, Default)]
pub struct AlertEngine {
    state: AlertEngineState,
}

impl AlertEngine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &AlertEngineState {
        &self.state
    }

    /// Evaluate a cycle and adopt the resulting state.
    pub fn evaluate(
        &mut self,
        visible: &[DetectionRecord],
        scenario: Scenario,
        audio_enabled: bool,
        timestamp_ms: u64,
    ) -> Evaluation {
        let evaluation = evaluate(visible, scenario, audio_enabled, &self.state, timestamp_ms);
        if evaluation.state.previous_spoken.is_none() && self.state.previous_spoken.is_some() {
            log::info!("all required tools detected; spoken alert memory cleared");
        }
        self.state = evaluation.state.clone();
        evaluation
    }

    /// Forward an evaluation's speech event to the device sink.
    ///
    /// A new critical utterance also triggers a heavy vibration and an alert tone.
    pub fn dispatch(evaluation: &Evaluation, device: &mut dyn DeviceSink) {
        let Some(speech) = &evaluation.speech else {
            return;
        };
        if speech.critical {
            log::warn!("critical: {}", speech.message);
            sink::emit_vibration(device, Intensity::Heavy);
            sink::emit_tone(device, ToneKind::Alert);
        } else {
            log::info!("notice: {}", speech.message);
        }
        sink::emit_speech(device, &speech.message);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::detect::BoundingBox;

    fn seen(class: ObjectClass, confidence: f32) -> DetectionRecord {
        DetectionRecord::new(
            format!("{}_1", class),
            class,
            confidence,
            BoundingBox::new(0.0, 0.0, 10.0, 10.0),
            "center",
        )
    }

    #[test]
    fn missing_tools_follow_canonical_order() {
        let visible = vec![seen(ObjectClass::OxygenTank, 0.9)];
        assert_eq!(
            missing_tools(&visible),
            vec![ObjectClass::FireExtinguisher, ObjectClass::Toolbox]
        );
    }

    #[test]
    fn unknown_class_does_not_satisfy_a_tool() {
        let visible = vec![seen(ObjectClass::Unknown, 0.95)];
        assert_eq!(missing_tools(&visible), REQUIRED_TOOLS.to_vec());
    }

    #[test]
    fn low_confidence_unknown_gets_occlusion_notice() {
        let visible = vec![
            seen(ObjectClass::FireExtinguisher, 0.9),
            seen(ObjectClass::OxygenTank, 0.9),
            seen(ObjectClass::Toolbox, 0.9),
            seen(ObjectClass::Unknown, 0.5),
        ];
        let eval = evaluate(
            &visible,
            Scenario::Normal,
            true,
            &AlertEngineState::default(),
            3,
        );
        assert!(eval.missing_tools.is_empty());
        assert!(eval.speech.is_none());
        let alerts = eval.alerts.alerts();
        assert_eq!(alerts.len(), 1);
        assert_eq!(alerts[0].severity, Severity::Info);
        assert_eq!(alerts[0].tool, ObjectClass::Unknown);
        assert_eq!(
            alerts[0].message,
            "Unknown object detected with low confidence (50.0%). May be partially occluded."
        );
    }

    #[test]
    fn leak_scenario_reports_occlusion_only() {
        let visible = vec![
            seen(ObjectClass::FireExtinguisher, 0.85),
            seen(ObjectClass::OxygenTank, 0.94),
            seen(ObjectClass::Toolbox, 0.65),
        ];
        let eval = evaluate(
            &visible,
            Scenario::Leak,
            true,
            &AlertEngineState::default(),
            7,
        );
        assert!(!eval.critical);
        assert!(eval.speech.is_none());
        let alerts = eval.alerts.alerts();
        assert_eq!(alerts.len(), 1);
        assert_eq!(alerts[0].severity, Severity::Info);
        assert_eq!(
            alerts[0].message,
            "Toolbox detected with low confidence (65.0%). May be partially occluded."
        );
        assert_eq!(alerts[0].timestamp_ms, 7);
    }

    #[test]
    fn muted_audio_keeps_previous_message() {
        let state = AlertEngineState {
            previous_spoken: Some("Toolbox not detected.".into()),
        };
        let eval = evaluate(&[], Scenario::Fire, false, &state, 0);
        assert!(eval.speech.is_none());
        assert_eq!(eval.state, state);
        assert!(eval.critical);
    }

    #[test]
    fn non_critical_speech_has_no_haptics() {
        let visible = vec![
            seen(ObjectClass::FireExtinguisher, 0.9),
            seen(ObjectClass::OxygenTank, 0.9),
        ];
        let recorder = crate::sink::RecordingSink::new();
        let mut sink = recorder.clone();
        let mut engine = AlertEngine::new();
        let eval = engine.evaluate(&visible, Scenario::Normal, true, 0);
        AlertEngine::dispatch(&eval, &mut sink);
        assert_eq!(recorder.spoken(), vec!["Toolbox not detected."]);
        assert!(recorder.vibrations().is_empty());
        assert!(recorder.tones().is_empty());
    }

    #[test]
    fn severity_orders_critical_highest() {
        assert!(Severity::Critical > Severity::Warning);
        assert!(Severity::Warning > Severity::Info);
    }
}
