use anyhow::{anyhow, Result};
use serde::{Deserialize, Serialize};

use super::result::DetectionRecord;

/// Lowest threshold the operator may select.
pub const MIN_THRESHOLD: f32 = 0.30;
/// Highest threshold the operator may select.
pub const MAX_THRESHOLD: f32 = 1.00;
/// Slider granularity.
pub const THRESHOLD_STEP: f32 = 0.05;
pub const DEFAULT_THRESHOLD: f32 = 0.70;

const STEPS_PER_UNIT: f32 = 20.0;

/// Confidence threshold in [0.30, 1.00], held on a 0.05 slider step.
///
/// A threshold of 1.00 is legal and usually leaves nothing visible.
#[derive(Clone, Copy, Debug, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(try_from = "f32", into = "f32")]
pub struct ConfidenceThreshold(f32);

impl ConfidenceThreshold {
    /// Range-check `value` and round it to the nearest slider step.
    pub fn new(value: f32) -> Result<Self> {
        if !value.is_finite() || !(MIN_THRESHOLD..=MAX_THRESHOLD).contains(&value) {
            return Err(anyhow!(
                "confidence threshold must be within [{:.2}, {:.2}], got {}",
                MIN_THRESHOLD,
                MAX_THRESHOLD,
                value
            ));
        }
        // k / 20 is the f32 nearest each slider literal; k * 0.05 is not.
        let steps = (value * STEPS_PER_UNIT).round();
        Ok(Self((steps / STEPS_PER_UNIT).clamp(MIN_THRESHOLD, MAX_THRESHOLD)))
    }

    pub fn value(&self) -> f32 {
        self.0
    }

    /// Whole-number percentage for display, e.g. `70`.
    pub fn percent(&self) -> u32 {
        (self.0 * 100.0).round() as u32
    }
}

impl Default for ConfidenceThreshold {
    fn default() -> Self {
        Self(DEFAULT_THRESHOLD)
    }
}

impl TryFrom<f32> for ConfidenceThreshold {
    type Error = anyhow::Error;

    fn try_from(value: f32) -> Result<Self> {
        Self::new(value)
    }
}

impl From<ConfidenceThreshold> for f32 {
    fn from(threshold: ConfidenceThreshold) -> f32 {
        threshold.0
    }
}

/// Keep the records whose confidence reaches `threshold`, in their original order.
pub fn filter_visible(
    batch: &[DetectionRecord],
    threshold: ConfidenceThreshold,
) -> Vec<DetectionRecord> {
    batch
        .iter()
        .filter(|record| record.confidence >= threshold.value())
        .cloned()
        .collect()
}
