/// Result of running detection on a color frame.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct DetectionResult {
    pub detections: Vec<Detection>,
}

impl DetectionResult {
    /// Highest-confidence detection, if any.
    pub fn primary(&self) -> Option<&Detection> {
        self.detections
            .iter()
            .max_by(|a, b| a.confidence.total_cmp(&b.confidence))
    }

    pub fn is_empty(&self) -> bool {
        self.detections.is_empty()
    }
}

/// One labelled box. Coordinates are normalized to 0..1.
#[derive(Clone, Debug, PartialEq)]
pub struct Detection {
    pub label: String,
    pub confidence: f32,
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn det(label: &str, confidence: f32) -> Detection {
        Detection {
            label: label.to_string(),
            confidence,
            x: 0.0,
            y: 0.0,
            w: 0.1,
            h: 0.1,
        }
    }

    #[test]
    fn primary_is_most_confident() {
        let result = DetectionResult {
            detections: vec![det("chair", 0.4), det("person", 0.9), det("cup", 0.6)],
        };
        assert_eq!(result.primary().unwrap().label, "person");
        assert!(DetectionResult::default().primary().is_none());
    }
}
