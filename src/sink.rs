//! Device sinks for speech, haptics and tones.
//!
//! The monitor only decides what to emit and when. Actual device I/O lives
//! behind `DeviceSink`. A sink may be unavailable on a given platform; every
//! call goes through the `emit_*` helpers, which log and drop failures so the
//! alert pipeline never depends on sink availability.

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::sync::{Arc, Mutex};

/// Vibration strength.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Intensity {
    Light,
    Medium,
    Heavy,
}

impl Intensity {
    /// Pulse length in milliseconds.
    pub fn pulse_ms(&self) -> u64 {
        match self {
            Intensity::Light => 50,
            Intensity::Medium => 100,
            Intensity::Heavy => 200,
        }
    }
}

/// Short feedback tones.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ToneKind {
    Click,
    Alert,
    Success,
}

impl ToneKind {
    pub fn frequency_hz(&self) -> u32 {
        match self {
            ToneKind::Click => 800,
            ToneKind::Alert => 440,
            ToneKind::Success => 660,
        }
    }
}

/// One-shot device capabilities. No acknowledgement is expected.
///
/// At most one utterance is outstanding: `speak` replaces whatever is playing.
pub trait DeviceSink {
    fn speak(&mut self, message: &str) -> Result<()>;

    fn cancel_speech(&mut self) -> Result<()>;

    fn vibrate(&mut self, intensity: Intensity) -> Result<()>;

    fn tone(&mut self, kind: ToneKind) -> Result<()>;
}

/// Cancel any in-flight utterance, then speak `message`.
pub fn emit_speech(sink: &mut dyn DeviceSink, message: &str) {
    emit_cancel(sink);
    if let Err(err) = sink.speak(message) {
        log::debug!("speech unavailable: {}", err);
    }
}

pub fn emit_cancel(sink: &mut dyn DeviceSink) {
    if let Err(err) = sink.cancel_speech() {
        log::debug!("speech cancel unavailable: {}", err);
    }
}

pub fn emit_vibration(sink: &mut dyn DeviceSink, intensity: Intensity) {
    if let Err(err) = sink.vibrate(intensity) {
        log::debug!("vibration unavailable: {}", err);
    }
}

pub fn emit_tone(sink: &mut dyn DeviceSink, kind: ToneKind) {
    if let Err(err) = sink.tone(kind) {
        log::debug!("tone unavailable: {}", err);
    }
}

/// Sink that discards everything.
#[derive(Clone, Copy, Debug, Default)]
pub struct NullSink;

impl DeviceSink for NullSink {
    fn speak(&mut self, _message: &str) -> Result<()> {
        Ok(())
    }

    fn cancel_speech(&mut self) -> Result<()> {
        Ok(())
    }

    fn vibrate(&mut self, _intensity: Intensity) -> Result<()> {
        Ok(())
    }

    fn tone(&mut self, _kind: ToneKind) -> Result<()> {
        Ok(())
    }
}

/// Sink that reports device cues through the log.
#[derive(Debug, Default)]
pub struct LogSink {
    speaking: bool,
}

impl LogSink {
    pub fn new() -> Self {
        Self::default()
    }
}

impl DeviceSink for LogSink {
    fn speak(&mut self, message: &str) -> Result<()> {
        self.speaking = true;
        log::info!("speak: \"{}\"", message);
        Ok(())
    }

    fn cancel_speech(&mut self) -> Result<()> {
        if self.speaking {
            log::debug!("speech cancelled");
        }
        self.speaking = false;
        Ok(())
    }

    fn vibrate(&mut self, intensity: Intensity) -> Result<()> {
        log::info!("vibrate: {:?} ({}ms)", intensity, intensity.pulse_ms());
        Ok(())
    }

    fn tone(&mut self, kind: ToneKind) -> Result<()> {
        log::debug!("tone: {:?} ({}Hz)", kind, kind.frequency_hz());
        Ok(())
    }
}

/// A single cue observed by a `RecordingSink`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DeviceCue {
    Speak(String),
    CancelSpeech,
    Vibrate(Intensity),
    Tone(ToneKind),
}

/// Sink that records every cue. Clones share the same log.
#[derive(Clone, Debug, Default)]
pub struct RecordingSink {
    cues: Arc<Mutex<Vec<DeviceCue>>>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cues(&self) -> Vec<DeviceCue> {
        self.cues.lock().map(|cues| cues.clone()).unwrap_or_default()
    }

    /// Spoken messages in order.
    pub fn spoken(&self) -> Vec<String> {
        self.cues()
            .into_iter()
            .filter_map(|cue| match cue {
                DeviceCue::Speak(message) => Some(message),
                _ => None,
            })
            .collect()
    }

    pub fn vibrations(&self) -> Vec<Intensity> {
        self.cues()
            .into_iter()
            .filter_map(|cue| match cue {
                DeviceCue::Vibrate(intensity) => Some(intensity),
                _ => None,
            })
            .collect()
    }

    pub fn tones(&self) -> Vec<ToneKind> {
        self.cues()
            .into_iter()
            .filter_map(|cue| match cue {
                DeviceCue::Tone(kind) => Some(kind),
                _ => None,
            })
            .collect()
    }

    pub fn clear(&self) {
        if let Ok(mut cues) = self.cues.lock() {
            cues.clear();
        }
    }

    fn push(&self, cue: DeviceCue) {
        if let Ok(mut cues) = self.cues.lock() {
            cues.push(cue);
        }
    }
}

impl DeviceSink for RecordingSink {
    fn speak(&mut self, message: &str) -> Result<()> {
        self.push(DeviceCue::Speak(message.to_string()));
        Ok(())
    }

    fn cancel_speech(&mut self) -> Result<()> {
        self.push(DeviceCue::CancelSpeech);
        Ok(())
    }

    fn vibrate(&mut self, intensity: Intensity) -> Result<()> {
        self.push(DeviceCue::Vibrate(intensity));
        Ok(())
    }

    fn tone(&mut self, kind: ToneKind) -> Result<()> {
        self.push(DeviceCue::Tone(kind));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::anyhow;

    struct UnavailableSink;

    impl DeviceSink for UnavailableSink {
        fn speak(&mut self, _message: &str) -> Result<()> {
            Err(anyhow!("speech synthesis not supported"))
        }

        fn cancel_speech(&mut self) -> Result<()> {
            Err(anyhow!("speech synthesis not supported"))
        }

        fn vibrate(&mut self, _intensity: Intensity) -> Result<()> {
            Err(anyhow!("vibration not supported"))
        }

        fn tone(&mut self, _kind: ToneKind) -> Result<()> {
            Err(anyhow!("audio context not supported"))
        }
    }

    #[test]
    fn unavailable_sink_is_tolerated() {
        let mut sink = UnavailableSink;
        emit_speech(&mut sink, "Toolbox not detected.");
        emit_vibration(&mut sink, Intensity::Heavy);
        emit_tone(&mut sink, ToneKind::Alert);
        emit_cancel(&mut sink);
    }

    #[test]
    fn speech_cancels_before_speaking() {
        let recorder = RecordingSink::new();
        let mut sink = recorder.clone();
        emit_speech(&mut sink, "first");
        emit_speech(&mut sink, "second");
        assert_eq!(
            recorder.cues(),
            vec![
                DeviceCue::CancelSpeech,
                DeviceCue::Speak("first".into()),
                DeviceCue::CancelSpeech,
                DeviceCue::Speak("second".into()),
            ]
        );
        assert_eq!(recorder.spoken(), vec!["first", "second"]);
    }
}
