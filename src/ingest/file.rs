//! Local raw depth file source.
//!
//! This module provides `RawFileDepthSource` for replaying a captured depth
//! frame from disk. The file is a bare little-endian `u16` dump of exactly
//! `width * height` millimetre samples, row-major, no header. The same frame
//! is returned every cycle.

use anyhow::{anyhow, Context, Result};
use std::path::PathBuf;

use super::{DepthSource, SourceStats};
use crate::frame::DepthFrame;

pub struct RawFileDepthSource {
    path: PathBuf,
    width: u32,
    height: u32,
    frame: Option<DepthFrame>,
    frame_count: u64,
}

impl RawFileDepthSource {
    pub fn new(path: impl Into<PathBuf>, width: u32, height: u32) -> Self {
        Self {
            path: path.into(),
            width,
            height,
            frame: None,
            frame_count: 0,
        }
    }
}

impl DepthSource for RawFileDepthSource {
    fn connect(&mut self) -> Result<()> {
        let bytes = std::fs::read(&self.path)
            .with_context(|| format!("read depth file {}", self.path.display()))?;
        let frame = decode_u16_le(&bytes, self.width, self.height)
            .with_context(|| format!("decode depth file {}", self.path.display()))?;
        log::info!(
            "RawFileDepthSource: loaded {} ({}x{})",
            self.path.display(),
            self.width,
            self.height
        );
        self.frame = Some(frame);
        Ok(())
    }

    fn next_frame(&mut self) -> Result<DepthFrame> {
        let frame = self
            .frame
            .clone()
            .ok_or_else(|| anyhow!("depth file {} not connected", self.path.display()))?;
        self.frame_count += 1;
        Ok(frame)
    }

    fn is_healthy(&self) -> bool {
        self.frame.is_some()
    }

    fn stats(&self) -> SourceStats {
        SourceStats {
            frames_captured: self.frame_count,
            url: self.path.display().to_string(),
        }
    }
}

fn decode_u16_le(bytes: &[u8], width: u32, height: u32) -> Result<DepthFrame> {
    if bytes.len() % 2 != 0 {
        return Err(anyhow!("odd byte count {} for u16 samples", bytes.len()));
    }
    let samples = bytes
        .chunks_exact(2)
        .map(|pair| u16::from_le_bytes([pair[0], pair[1]]))
        .collect();
    DepthFrame::new(width, height, samples)
}
