use anyhow::{anyhow, Result};

use crate::detect::backend::ObjectDetector;
use crate::detect::result::{Detection, DetectionResult};
use crate::frame::ColorFrame;

/// Returns a fixed set of detections for every frame. For tests and demos.
pub struct CannedDetector {
    detections: Vec<Detection>,
    calls: u64,
}

impl CannedDetector {
    pub fn new(detections: Vec<Detection>) -> Self {
        Self {
            detections,
            calls: 0,
        }
    }

    pub fn calls(&self) -> u64 {
        self.calls
    }
}

impl ObjectDetector for CannedDetector {
    fn name(&self) -> &'static str {
        "canned"
    }

    fn detect(&mut self, frame: &ColorFrame) -> Result<DetectionResult> {
        if frame.width == 0 || frame.height == 0 {
            return Err(anyhow!("canned detector received an empty frame"));
        }
        self.calls += 1;
        Ok(DetectionResult {
            detections: self.detections.clone(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::detect::NullDetector;

    #[test]
    fn canned_detector_repeats_its_detections() {
        let mut detector = CannedDetector::new(vec![Detection {
            label: "chair".to_string(),
            confidence: 0.7,
            x: 0.4,
            y: 0.5,
            w: 0.2,
            h: 0.3,
        }]);
        let frame = ColorFrame::new(4, 4, vec![0; 48]).unwrap();

        let r1 = detector.detect(&frame).unwrap();
        let r2 = detector.detect(&frame).unwrap();
        assert_eq!(r1, r2);
        assert_eq!(r1.primary().unwrap().label, "chair");
        assert_eq!(detector.calls(), 2);

        let empty = ColorFrame::new(0, 0, vec![]).unwrap();
        assert!(detector.detect(&empty).is_err());
    }

    #[test]
    fn null_detector_reports_nothing() {
        let mut detector = NullDetector::new();
        detector.warm_up().unwrap();
        let frame = ColorFrame::new(2, 2, vec![0; 12]).unwrap();
        assert!(detector.detect(&frame).unwrap().is_empty());
        assert_eq!(detector.name(), "null");
    }
}
