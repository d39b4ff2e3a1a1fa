use anyhow::Result;

use crate::detect::result::DetectionRecord;
use crate::scenario::Scenario;

/// Producer of detection batches.
///
/// Each call returns a complete batch that replaces the previous one wholesale.
/// Sources do not apply the confidence threshold; `filter_visible` does.
pub trait DetectionSource: Send {
    /// Source identifier.
    fn name(&self) -> &'static str;

    /// Produce the batch for the current scenario.
    fn generate(&mut self, scenario: Scenario) -> Result<Vec<DetectionRecord>>;

    /// Optional warm-up hook.
    fn connect(&mut self) -> Result<()> {
        Ok(())
    }
}
