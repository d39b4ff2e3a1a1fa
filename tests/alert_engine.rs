use station_watch::alert::{evaluate, missing_tools};
use station_watch::{
    AlertEngine, AlertEngineState, AlertStatus, BoundingBox, DetectionRecord, ObjectClass,
    RecordingSink, Scenario, Severity, REQUIRED_TOOLS,
};
use station_watch::sink::{DeviceCue, Intensity, ToneKind};

fn record(id: &str, class: ObjectClass, confidence: f32) -> DetectionRecord {
    DetectionRecord::new(
        id,
        class,
        confidence,
        BoundingBox::new(100.0, 100.0, 50.0, 80.0),
        "left side",
    )
}

fn all_tools() -> Vec<DetectionRecord> {
    vec![
        record("fire_ext_1", ObjectClass::FireExtinguisher, 0.89),
        record("oxygen_1", ObjectClass::OxygenTank, 0.93),
        record("toolbox_1", ObjectClass::Toolbox, 0.86),
    ]
}

#[test]
fn oxygen_emergency_raises_single_critical_alert() {
    let visible = vec![
        record("fire_ext_1", ObjectClass::FireExtinguisher, 0.91),
        record("toolbox_1", ObjectClass::Toolbox, 0.87),
    ];
    let eval = evaluate(
        &visible,
        Scenario::Oxygen,
        true,
        &AlertEngineState::default(),
        0,
    );

    assert!(eval.critical);
    let alerts = eval.alerts.alerts();
    assert_eq!(alerts.len(), 1);
    assert_eq!(alerts[0].severity, Severity::Critical);
    assert_eq!(alerts[0].tool, ObjectClass::OxygenTank);
    assert_eq!(
        alerts[0].message,
        "Oxygen tank missing! Life support emergency."
    );

    let speech = eval.speech.expect("critical speech");
    assert_eq!(speech.message, "Oxygen tank missing! Life support emergency.");
    assert!(speech.critical);
    assert_eq!(
        eval.state.previous_spoken.as_deref(),
        Some("Oxygen tank missing! Life support emergency.")
    );
}

#[test]
fn fire_flag_flips_when_extinguisher_appears() {
    let mut visible = vec![
        record("oxygen_1", ObjectClass::OxygenTank, 0.92),
        record("toolbox_1", ObjectClass::Toolbox, 0.88),
    ];
    let state = AlertEngineState::default();
    assert!(evaluate(&visible, Scenario::Fire, true, &state, 0).critical);

    visible.push(record("fire_ext_1", ObjectClass::FireExtinguisher, 0.85));
    let eval = evaluate(&visible, Scenario::Fire, true, &state, 0);
    assert!(!eval.critical);
    assert!(eval.alerts.is_nominal());
}

#[test]
fn missing_tools_outrank_occlusion_notices() {
    // Three missing tools plus two occlusion notices: five candidates.
    let visible = vec![
        record("unknown_1", ObjectClass::Unknown, 0.6),
        record("unknown_2", ObjectClass::Unknown, 0.5),
    ];
    let eval = evaluate(&visible, Scenario::Fire, true, &AlertEngineState::default(), 42);
    assert_eq!(eval.missing_tools, REQUIRED_TOOLS.to_vec());
    let alerts = eval.alerts.alerts();

    assert_eq!(alerts.len(), 3);
    assert_eq!(
        alerts
            .iter()
            .map(|a| (a.severity, a.tool))
            .collect::<Vec<_>>(),
        vec![
            (Severity::Critical, ObjectClass::FireExtinguisher),
            (Severity::Warning, ObjectClass::OxygenTank),
            (Severity::Warning, ObjectClass::Toolbox),
        ]
    );
    assert!(alerts.iter().all(|a| a.timestamp_ms == 42));
}

#[test]
fn alert_panel_caps_at_three_and_keeps_group_order() {
    let visible = vec![
        record("toolbox_1", ObjectClass::Toolbox, 0.6),
        record("toolbox_2", ObjectClass::Toolbox, 0.5),
    ];
    let eval = evaluate(&visible, Scenario::Fire, true, &AlertEngineState::default(), 0);
    let severities: Vec<_> = eval.alerts.alerts().iter().map(|a| a.severity).collect();
    assert_eq!(
        severities,
        vec![Severity::Critical, Severity::Warning, Severity::Info]
    );
    assert_eq!(
        eval.alerts.alerts()[2].message,
        "Toolbox detected with low confidence (60.0%). May be partially occluded."
    );
}

#[test]
fn identical_state_is_spoken_once() {
    let recorder = RecordingSink::new();
    let mut sink = recorder.clone();
    let mut engine = AlertEngine::new();
    let visible = vec![record("oxygen_1", ObjectClass::OxygenTank, 0.92)];

    for cycle in 0..2 {
        let eval = engine.evaluate(&visible, Scenario::Normal, true, cycle * 2000);
        AlertEngine::dispatch(&eval, &mut sink);
    }

    assert_eq!(recorder.spoken(), vec!["Fire extinguisher not detected."]);
}

#[test]
fn all_tools_present_is_nominal_and_clears_memory() {
    let state = AlertEngineState {
        previous_spoken: Some("Toolbox not detected.".into()),
    };
    let eval = evaluate(&all_tools(), Scenario::Oxygen, true, &state, 0);

    assert_eq!(eval.alerts, AlertStatus::Nominal);
    assert!(!eval.critical);
    assert!(eval.speech.is_none());
    assert_eq!(eval.state.previous_spoken, None);
    assert!(missing_tools(&all_tools()).is_empty());
}

#[test]
fn message_is_spoken_again_after_tool_reappears() {
    let recorder = RecordingSink::new();
    let mut sink = recorder.clone();
    let mut engine = AlertEngine::new();
    let without_fire = vec![
        record("oxygen_1", ObjectClass::OxygenTank, 0.92),
        record("toolbox_1", ObjectClass::Toolbox, 0.88),
    ];

    for visible in [without_fire.clone(), all_tools(), without_fire] {
        let eval = engine.evaluate(&visible, Scenario::Fire, true, 0);
        AlertEngine::dispatch(&eval, &mut sink);
    }

    let expected = "Fire extinguisher not detected! Immediate location required.";
    assert_eq!(recorder.spoken(), vec![expected, expected]);
    assert_eq!(
        recorder.vibrations(),
        vec![Intensity::Heavy, Intensity::Heavy]
    );
}

#[test]
fn critical_speech_pulses_heavy_vibration_and_alert_tone() {
    let recorder = RecordingSink::new();
    let mut sink = recorder.clone();
    let mut engine = AlertEngine::new();
    let eval = engine.evaluate(&[], Scenario::Oxygen, true, 0);
    AlertEngine::dispatch(&eval, &mut sink);

    assert_eq!(
        recorder.cues(),
        vec![
            DeviceCue::Vibrate(Intensity::Heavy),
            DeviceCue::Tone(ToneKind::Alert),
            DeviceCue::CancelSpeech,
            DeviceCue::Speak("Oxygen tank missing! Life support emergency.".into()),
        ]
    );

    // Same condition next cycle: no new speech, no new pulse.
    let eval = engine.evaluate(&[], Scenario::Oxygen, true, 2000);
    AlertEngine::dispatch(&eval, &mut sink);
    assert_eq!(recorder.vibrations().len(), 1);
}

#[test]
fn muted_engine_never_speaks() {
    let mut engine = AlertEngine::new();
    let eval = engine.evaluate(&[], Scenario::Fire, false, 0);
    assert!(eval.critical);
    assert!(eval.speech.is_none());
    assert_eq!(engine.state().previous_spoken, None);
}
