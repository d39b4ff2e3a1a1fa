use anyhow::Result;

use crate::detect::backend::DetectionSource;
use crate::detect::result::{BoundingBox, DetectionRecord, ObjectClass};
use crate::scenario::Scenario;

/// Canned detector that stands in for a real perception pipeline.
///
/// Each scenario maps to a fixed batch staged in a 640x480 frame.
#[derive(Default)]
pub struct MockSource {
    batches_generated: u64,
}

impl MockSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn batches_generated(&self) -> u64 {
        self.batches_generated
    }
}

impl DetectionSource for MockSource {
    fn name(&self) -> &'static str {
        "mock"
    }

    fn connect(&mut self) -> Result<()> {
        log::info!("MockSource: connected (synthetic detections)");
        Ok(())
    }

    fn generate(&mut self, scenario: Scenario) -> Result<Vec<DetectionRecord>> {
        self.batches_generated += 1;
        Ok(scenario_batch(scenario))
    }
}

/// The staged batch for a scenario.
pub fn scenario_batch(scenario: Scenario) -> Vec<DetectionRecord> {
    use ObjectClass::{FireExtinguisher, OxygenTank, Toolbox};

    match scenario {
        Scenario::Fire => vec![
            DetectionRecord::new(
                "oxygen_1",
                OxygenTank,
                0.92,
                BoundingBox::new(120.0, 180.0, 80.0, 120.0),
                "left side",
            ),
            DetectionRecord::new(
                "toolbox_1",
                Toolbox,
                0.88,
                BoundingBox::new(450.0, 250.0, 100.0, 60.0),
                "right side",
            ),
        ],
        // Toolbox is partially occluded, hence the low confidence.
        Scenario::Leak => vec![
            DetectionRecord::new(
                "fire_ext_1",
                FireExtinguisher,
                0.85,
                BoundingBox::new(200.0, 150.0, 60.0, 140.0),
                "center left",
            ),
            DetectionRecord::new(
                "oxygen_1",
                OxygenTank,
                0.94,
                BoundingBox::new(350.0, 120.0, 90.0, 130.0),
                "center right",
            ),
            DetectionRecord::new(
                "toolbox_1",
                Toolbox,
                0.65,
                BoundingBox::new(500.0, 280.0, 80.0, 50.0),
                "far right",
            ),
        ],
        Scenario::Oxygen => vec![
            DetectionRecord::new(
                "fire_ext_1",
                FireExtinguisher,
                0.91,
                BoundingBox::new(180.0, 160.0, 65.0, 135.0),
                "left side",
            ),
            DetectionRecord::new(
                "toolbox_1",
                Toolbox,
                0.87,
                BoundingBox::new(420.0, 240.0, 95.0, 65.0),
                "right side",
            ),
        ],
        Scenario::Normal => vec![
            DetectionRecord::new(
                "fire_ext_1",
                FireExtinguisher,
                0.89,
                BoundingBox::new(150.0, 140.0, 70.0, 150.0),
                "left side",
            ),
            DetectionRecord::new(
                "oxygen_1",
                OxygenTank,
                0.93,
                BoundingBox::new(320.0, 110.0, 85.0, 140.0),
                "center",
            ),
            DetectionRecord::new(
                "toolbox_1",
                Toolbox,
                0.86,
                BoundingBox::new(480.0, 260.0, 90.0, 70.0),
                "right side",
            ),
        ],
    }
}
