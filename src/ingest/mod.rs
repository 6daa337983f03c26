//! Depth frame sources.
//!
//! This module provides different providers of depth frames:
//! - Synthetic scenes (`stub://<scene>`) for tests, demos and bench runs
//! - Raw `u16` little-endian dumps on local disk
//!
//! Camera bring-up, intrinsics and calibration belong to the device driver in
//! front of a source, not to this crate. Sources MUST:
//! - Hand out owned frames (the engine never sees a frame that is still being written)
//! - Report health without blocking
//!
//! Sources MUST NOT buffer more than the frame they are about to return.

pub mod capture;
pub mod file;
pub mod synthetic;

use anyhow::{anyhow, Result};

use crate::frame::{ColorFrame, DepthFrame};

pub use capture::spawn_capture;
pub use file::RawFileDepthSource;
pub use synthetic::{Scene, SyntheticDepthSource};

/// A depth-frame provider.
pub trait DepthSource: Send {
    /// Open the underlying device or file.
    fn connect(&mut self) -> Result<()>;

    /// Capture the next frame.
    fn next_frame(&mut self) -> Result<DepthFrame>;

    /// Color frame registered with the last depth frame, for sources that have one.
    fn color_frame(&mut self) -> Result<Option<ColorFrame>> {
        Ok(None)
    }

    fn is_healthy(&self) -> bool;

    fn stats(&self) -> SourceStats;
}

/// Statistics for a depth source.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SourceStats {
    pub frames_captured: u64,
    pub url: String,
}

/// Pick a source for `url`: `stub://<scene>` or a local file path.
pub fn open_source(url: &str, width: u32, height: u32) -> Result<Box<dyn DepthSource>> {
    if url.trim().is_empty() {
        return Err(anyhow!("depth source url must not be empty"));
    }
    if let Some(scene) = url.strip_prefix("stub://") {
        let scene: Scene = scene.parse()?;
        return Ok(Box::new(SyntheticDepthSource::new(scene, width, height)));
    }
    if url.contains("://") {
        return Err(anyhow!(
            "unsupported depth source '{}' (expected stub://<scene> or a local file path)",
            url
        ));
    }
    Ok(Box::new(RawFileDepthSource::new(url, width, height)))
}
