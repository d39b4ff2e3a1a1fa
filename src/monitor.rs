//! Monitor: the single evaluation flow.
//!
//! Detection source -> confidence filter -> alert engine -> device sink.
//!
//! Every input change and every scheduled refresh goes through `&mut Monitor`,
//! so two evaluations can never interleave. A new batch replaces the previous
//! one wholesale before the engine sees it.

use anyhow::Result;
use serde::Serialize;

use crate::alert::{AlertEngine, AlertEngineState, AlertStatus, Evaluation};
use crate::clock::{Clock, RefreshSchedule};
use crate::config::MonitorConfig;
use crate::detect::{
    filter_visible, ConfidenceThreshold, DetectionRecord, DetectionSource, ObjectClass,
};
use crate::scenario::Scenario;
use crate::sink::{self, DeviceSink, Intensity, ToneKind};

/// Operator-controlled inputs.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct Controls {
    pub scenario: Scenario,
    pub threshold: ConfidenceThreshold,
    pub audio_enabled: bool,
    /// Presentation only; has no effect on alerting.
    pub recording: bool,
}

impl From<&MonitorConfig> for Controls {
    fn from(cfg: &MonitorConfig) -> Self {
        Self {
            scenario: cfg.scenario,
            threshold: cfg.threshold,
            audio_enabled: cfg.audio_enabled,
            recording: cfg.recording,
        }
    }
}

/// Everything presentation needs after a cycle.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Snapshot {
    pub cycle: u64,
    pub timestamp_ms: u64,
    pub controls: Controls,
    pub visible: Vec<DetectionRecord>,
    pub detection_count: usize,
    pub threshold_percent: u32,
    pub missing_tools: Vec<ObjectClass>,
    pub critical: bool,
    pub alerts: AlertStatus,
    /// Message spoken during this cycle, if any.
    pub spoken: Option<String>,
}

impl Snapshot {
    /// Location of the first visible detection of `tool`.
    pub fn last_seen(&self, tool: ObjectClass) -> Option<&str> {
        self.visible
            .iter()
            .find(|record| record.class == tool)
            .map(|record| record.location.as_str())
    }
}

pub struct Monitor {
    source: Box<dyn DetectionSource>,
    clock: Box<dyn Clock>,
    sink: Box<dyn DeviceSink>,
    schedule: RefreshSchedule,
    engine: AlertEngine,
    controls: Controls,
    visible: Vec<DetectionRecord>,
    last: Evaluation,
    last_spoken: Option<String>,
    cycle: u64,
    timestamp_ms: u64,
}

impl Monitor {
    /// Connect the source and run the initial refresh.
    pub fn new(
        cfg: &MonitorConfig,
        mut source: Box<dyn DetectionSource>,
        clock: Box<dyn Clock>,
        sink: Box<dyn DeviceSink>,
    ) -> Result<Self> {
        source.connect()?;
        log::info!(
            "monitor starting: source={}, scenario={}, threshold={}%, audio={}",
            source.name(),
            cfg.scenario,
            cfg.threshold.percent(),
            if cfg.audio_enabled { "on" } else { "off" }
        );
        let mut monitor = Self {
            source,
            clock,
            sink,
            schedule: RefreshSchedule::new(cfg.refresh_interval),
            engine: AlertEngine::new(),
            controls: Controls::from(cfg),
            visible: Vec::new(),
            last: Evaluation {
                missing_tools: Vec::new(),
                critical: false,
                alerts: AlertStatus::Nominal,
                speech: None,
                state: AlertEngineState::default(),
            },
            last_spoken: None,
            cycle: 0,
            timestamp_ms: 0,
        };
        monitor.refresh()?;
        Ok(monitor)
    }

    pub fn controls(&self) -> Controls {
        self.controls
    }

    pub fn schedule(&self) -> &RefreshSchedule {
        &self.schedule
    }

    /// Refresh if the cadence says a batch is due.
    pub fn tick(&mut self) -> Result<Option<Snapshot>> {
        if !self.schedule.is_due(self.clock.now()) {
            return Ok(None);
        }
        self.refresh().map(Some)
    }

    /// Pull a new batch, filter it and evaluate.
    pub fn refresh(&mut self) -> Result<Snapshot> {
        let now = self.clock.now();
        let batch = self.source.generate(self.controls.scenario)?;
        self.visible = filter_visible(&batch, self.controls.threshold);
        self.schedule.mark(now);
        self.cycle += 1;
        log::debug!(
            "cycle {}: {} raw, {} visible at >= {}%",
            self.cycle,
            batch.len(),
            self.visible.len(),
            self.controls.threshold.percent()
        );
        self.evaluate();
        Ok(self.snapshot())
    }

    /// Switch scenario: feedback cue, then an immediate refresh.
    pub fn set_scenario(&mut self, scenario: Scenario) -> Result<Snapshot> {
        sink::emit_vibration(self.sink.as_mut(), Intensity::Medium);
        self.click();
        if scenario != self.controls.scenario {
            log::info!("scenario: {} -> {}", self.controls.scenario, scenario);
        }
        self.controls.scenario = scenario;
        self.schedule.reset();
        self.refresh()
    }

    /// Change the confidence threshold and refresh immediately.
    pub fn set_threshold(&mut self, threshold: ConfidenceThreshold) -> Result<Snapshot> {
        sink::emit_vibration(self.sink.as_mut(), Intensity::Light);
        log::info!("confidence threshold: {}%", threshold.percent());
        self.controls.threshold = threshold;
        self.schedule.reset();
        self.refresh()
    }

    /// Flip audio. Muting cancels any utterance in flight.
    pub fn toggle_audio(&mut self) -> Snapshot {
        let enabled = !self.controls.audio_enabled;
        self.set_audio(enabled)
    }

    pub fn set_audio(&mut self, enabled: bool) -> Snapshot {
        sink::emit_vibration(self.sink.as_mut(), Intensity::Light);
        self.click();
        self.controls.audio_enabled = enabled;
        log::info!("audio alerts {}", if enabled { "enabled" } else { "disabled" });
        if !enabled {
            sink::emit_cancel(self.sink.as_mut());
        }
        self.evaluate();
        self.snapshot()
    }

    /// Flip the recording indicator and announce it when audio is on.
    pub fn toggle_recording(&mut self) -> Snapshot {
        sink::emit_vibration(self.sink.as_mut(), Intensity::Medium);
        self.click();
        self.controls.recording = !self.controls.recording;
        let message = if self.controls.recording {
            "Recording started"
        } else {
            "Recording stopped"
        };
        log::info!("{}", message);
        if self.controls.audio_enabled {
            sink::emit_speech(self.sink.as_mut(), message);
        }
        self.snapshot()
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            cycle: self.cycle,
            timestamp_ms: self.timestamp_ms,
            controls: self.controls,
            visible: self.visible.clone(),
            detection_count: self.visible.len(),
            threshold_percent: self.controls.threshold.percent(),
            missing_tools: self.last.missing_tools.clone(),
            critical: self.last.critical,
            alerts: self.last.alerts.clone(),
            spoken: self.last_spoken.clone(),
        }
    }

    fn evaluate(&mut self) {
        self.timestamp_ms = self.clock.now_ms();
        let was_critical = self.last.critical;
        let evaluation = self.engine.evaluate(
            &self.visible,
            self.controls.scenario,
            self.controls.audio_enabled,
            self.timestamp_ms,
        );
        if evaluation.critical && !was_critical {
            log::warn!("critical alert raised under {} scenario", self.controls.scenario);
        } else if !evaluation.critical && was_critical {
            log::info!("critical alert cleared");
        }
        AlertEngine::dispatch(&evaluation, self.sink.as_mut());
        self.last_spoken = evaluation.speech.as_ref().map(|s| s.message.clone());
        self.last = evaluation;
    }

    fn click(&mut self) {
        if self.controls.audio_enabled {
            sink::emit_tone(self.sink.as_mut(), ToneKind::Click);
        }
    }
}
