use anyhow::Result;

use crate::frame::ColorFrame;
use crate::detect::result::DetectionResult;

/// Object detector trait.
///
/// Implementations wrap a model runtime (YOLO, MobileNet-SSD, ...). They must
/// treat the frame as read-only and must not keep it past the call.
pub trait ObjectDetector: Send {
    /// Detector identifier, used in logs.
    fn name(&self) -> &'static str;

    /// Run detection on a frame.
    fn detect(&mut self, frame: &ColorFrame) -> Result<DetectionResult>;

    /// Optional warm-up hook.
    fn warm_up(&mut self) -> Result<()> {
        Ok(())
    }
}
