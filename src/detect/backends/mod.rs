pub mod canned;
pub mod null;

pub use canned::CannedDetector;
pub use null::NullDetector;
