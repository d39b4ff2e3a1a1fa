//! station-watch - emergency tool presence monitor
//!
//! This binary:
//! 1. Loads configuration (file + env), then applies CLI overrides
//! 2. Pulls a detection batch on a fixed cadence
//! 3. Filters by confidence and derives alerts
//! 4. Emits speech/haptic/tone cues through the log sink
//! 5. Prints a status report (or JSON snapshot) per cycle

use anyhow::{anyhow, Result};
use clap::Parser;
use std::sync::mpsc::{self, RecvTimeoutError};

use station_watch::{
    clock::{Clock, SystemClock},
    config::MonitorConfig,
    report, ConfidenceThreshold, LogSink, MockSource, Monitor, Scenario, Snapshot,
};

#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Args {
    /// Emergency scenario: normal, fire, leak or oxygen.
    #[arg(long)]
    scenario: Option<Scenario>,
    /// Confidence threshold in [0.30, 1.00], rounded to 0.05 steps.
    #[arg(long)]
    threshold: Option<f32>,
    /// Disable spoken alerts and tones.
    #[arg(long)]
    mute: bool,
    /// Show the recording indicator.
    #[arg(long)]
    record: bool,
    /// Refresh cadence in milliseconds.
    #[arg(long)]
    refresh_ms: Option<u64>,
    /// Stop after this many refresh cycles (runs until Ctrl-C otherwise).
    #[arg(long)]
    cycles: Option<u64>,
    /// Emit one JSON snapshot per cycle instead of the text report.
    #[arg(long)]
    json: bool,
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();
    let mut cfg = MonitorConfig::load()?;
    if let Some(scenario) = args.scenario {
        cfg.scenario = scenario;
    }
    if let Some(threshold) = args.threshold {
        cfg.threshold = ConfidenceThreshold::new(threshold)?;
    }
    if args.mute {
        cfg.audio_enabled = false;
    }
    if args.record {
        cfg.recording = true;
    }
    if let Some(ms) = args.refresh_ms {
        if ms == 0 {
            return Err(anyhow!("refresh-ms must be >= 1"));
        }
        cfg.refresh_interval = std::time::Duration::from_millis(ms);
    }

    let (tx, rx) = mpsc::channel();
    ctrlc::set_handler(move || {
        let _ = tx.send(());
    })
    .map_err(|e| anyhow!("error setting Ctrl-C handler: {}", e))?;

    let clock = SystemClock::new();
    let mut monitor = Monitor::new(
        &cfg,
        Box::new(MockSource::new()),
        Box::new(clock.clone()),
        Box::new(LogSink::new()),
    )?;

    let mut completed = 1u64;
    emit(&monitor.snapshot(), args.json)?;

    while args.cycles.map_or(true, |limit| completed < limit) {
        let wait = monitor.schedule().until_due(clock.now());
        match rx.recv_timeout(wait) {
            Ok(()) | Err(RecvTimeoutError::Disconnected) => {
                log::info!("shutdown signal received, stopping monitor");
                break;
            }
            Err(RecvTimeoutError::Timeout) => {}
        }
        if let Some(snapshot) = monitor.tick()? {
            completed += 1;
            emit(&snapshot, args.json)?;
        }
    }

    log::info!("station-watch stopped after {} cycles", completed);
    Ok(())
}

fn emit(snapshot: &Snapshot, json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string(snapshot)?);
    } else {
        print!("{}", report::render(snapshot));
    }
    Ok(())
}
