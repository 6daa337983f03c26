use anyhow::Result;

use crate::detect::backend::ObjectDetector;
use crate::detect::result::DetectionResult;
use crate::frame::ColorFrame;

/// Detector for deployments without a model runtime. Never reports anything.
#[derive(Default)]
pub struct NullDetector;

impl NullDetector {
    pub fn new() -> Self {
        Self
    }
}

impl ObjectDetector for NullDetector {
    fn name(&self) -> &'static str {
        "null"
    }

    fn detect(&mut self, _frame: &ColorFrame) -> Result<DetectionResult> {
        Ok(DetectionResult::default())
    }
}
