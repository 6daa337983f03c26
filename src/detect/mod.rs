//! Object classification capability.
//!
//! Detection models run outside this crate. The navigator only needs a
//! narrow seam to hand them a color frame and log what came back; the
//! decision policy never reads detections.

mod backend;
mod backends;
mod result;

pub use backend::ObjectDetector;
pub use backends::{CannedDetector, NullDetector};
pub use result::{Detection, DetectionResult};
