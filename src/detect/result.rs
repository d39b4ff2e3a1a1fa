use serde::{Deserialize, Serialize};

/// Tools every station module must keep in view, in canonical priority order.
///
/// Iteration order matters: missing-tool alerts and spoken guidance follow it.
pub const REQUIRED_TOOLS: [ObjectClass; 3] = [
    ObjectClass::FireExtinguisher,
    ObjectClass::OxygenTank,
    ObjectClass::Toolbox,
];

/// A single observed object instance within one detection batch.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DetectionRecord {
    /// Unique within a batch; carries no identity across batches.
    pub id: String,
    pub class: ObjectClass,
    /// Detector confidence in [0, 1].
    pub confidence: f32,
    #[serde(rename = "bbox")]
    pub bounding_box: BoundingBox,
    /// Human-readable zone label, used only for display and alert text.
    pub location: String,
}

impl DetectionRecord {
    pub fn new(
        id: impl Into<String>,
        class: ObjectClass,
        confidence: f32,
        bounding_box: BoundingBox,
        location: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            class,
            confidence,
            bounding_box,
            location: location.into(),
        }
    }

    /// Confidence as a percentage with one decimal, e.g. `65.0`.
    pub fn confidence_percent(&self) -> String {
        format!("{:.1}", self.confidence * 100.0)
    }
}

/// Bounding box in source-frame pixel coordinates.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl BoundingBox {
    pub const fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }
}

/// Object classes the detector can report.
///
/// Labels outside the known set deserialize to `Unknown`. Unknown objects never
/// satisfy a required tool, but a low-confidence one still gets an occlusion
/// notice like any other visible detection.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ObjectClass {
    FireExtinguisher,
    OxygenTank,
    Toolbox,
    #[serde(other)]
    Unknown,
}

impl ObjectClass {
    /// Wire label, e.g. `fire_extinguisher`.
    pub fn as_str(&self) -> &'static str {
        match self {
            ObjectClass::FireExtinguisher => "fire_extinguisher",
            ObjectClass::OxygenTank => "oxygen_tank",
            ObjectClass::Toolbox => "toolbox",
            ObjectClass::Unknown => "unknown",
        }
    }

    /// Sentence-case name used in alert and speech text.
    pub fn display_name(&self) -> &'static str {
        match self {
            ObjectClass::FireExtinguisher => "Fire extinguisher",
            ObjectClass::OxygenTank => "Oxygen tank",
            ObjectClass::Toolbox => "Toolbox",
            ObjectClass::Unknown => "Unknown object",
        }
    }

    pub fn is_required_tool(&self) -> bool {
        REQUIRED_TOOLS.contains(self)
    }
}

impl std::fmt::Display for ObjectClass {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
