mod backend;
pub mod backends;
mod filter;
mod result;

pub use backend::DetectionSource;
pub use backends::MockSource;
pub use filter::{
    filter_visible, ConfidenceThreshold, DEFAULT_THRESHOLD, MAX_THRESHOLD, MIN_THRESHOLD,
    THRESHOLD_STEP,
};
pub use result::{BoundingBox, DetectionRecord, ObjectClass, REQUIRED_TOOLS};
