//! Depth and color frame containers.
//!
//! - `DepthFrame`: Row-major grid of millimetre samples. Samples are private.
//! - `ColorFrame`: RGB bytes handed to the object detector. Never scored.
//! - `LatestFrame`: Single-slot hand-off between a capture thread and the decision loop.
//!
//! A sample of `0`, or at/above the configured sentinel, means "no reading".
//! Frames carry no notion of freshness; that belongs to the source.

use anyhow::{anyhow, Result};
use std::sync::{Arc, Mutex};

// ----------------------------------------------------------------------------
// DepthFrame
// ----------------------------------------------------------------------------

/// Per-pixel distance-to-obstacle readings in millimetres.
///
/// Zero-sized frames are valid and simply contain no usable data.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DepthFrame {
    samples: Vec<u16>,
    width: u32,
    height: u32,
}

impl DepthFrame {
    /// Wrap a row-major sample buffer. The buffer must hold exactly `width * height` samples.
    pub fn new(width: u32, height: u32, samples: Vec<u16>) -> Result<Self> {
        let expected = (width as usize)
            .checked_mul(height as usize)
            .ok_or_else(|| anyhow!("depth frame {}x{} overflows", width, height))?;
        if samples.len() != expected {
            return Err(anyhow!(
                "depth frame {}x{} expects {} samples, got {}",
                width,
                height,
                expected,
                samples.len()
            ));
        }
        Ok(Self {
            samples,
            width,
            height,
        })
    }

    /// A frame with no rows and no columns.
    pub fn empty() -> Self {
        Self {
            samples: Vec::new(),
            width: 0,
            height: 0,
        }
    }

    /// A frame where every sample has the same value.
    pub fn filled(width: u32, height: u32, depth_mm: u16) -> Self {
        Self {
            samples: vec![depth_mm; width as usize * height as usize],
            width,
            height,
        }
    }

    /// Build a frame by evaluating `f(x, y)` for every pixel.
    pub fn from_fn(width: u32, height: u32, mut f: impl FnMut(u32, u32) -> u16) -> Self {
        let mut samples = Vec::with_capacity(width as usize * height as usize);
        for y in 0..height {
            for x in 0..width {
                samples.push(f(x, y));
            }
        }
        Self {
            samples,
            width,
            height,
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Sample at column `x`, row `y`, or `None` outside the frame.
    pub fn get(&self, x: u32, y: u32) -> Option<u16> {
        if x >= self.width || y >= self.height {
            return None;
        }
        self.samples
            .get(y as usize * self.width as usize + x as usize)
            .copied()
    }

    /// One full row of samples, or `None` past the last row or when the frame has no columns.
    pub fn row(&self, y: u32) -> Option<&[u16]> {
        if y >= self.height || self.width == 0 {
            return None;
        }
        let w = self.width as usize;
        let start = y as usize * w;
        self.samples.get(start..start + w)
    }
}

impl Default for DepthFrame {
    fn default() -> Self {
        Self::empty()
    }
}

// ----------------------------------------------------------------------------
// ColorFrame
// ----------------------------------------------------------------------------

/// Interleaved RGB frame. Only the object detector looks at it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ColorFrame {
    pixels: Vec<u8>,
    pub width: u32,
    pub height: u32,
}

impl ColorFrame {
    pub fn new(width: u32, height: u32, pixels: Vec<u8>) -> Result<Self> {
        let expected = width as usize * height as usize * 3;
        if pixels.len() != expected {
            return Err(anyhow!(
                "color frame {}x{} expects {} bytes, got {}",
                width,
                height,
                expected,
                pixels.len()
            ));
        }
        Ok(Self {
            pixels,
            width,
            height,
        })
    }

    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }
}

// ----------------------------------------------------------------------------
// LatestFrame: capture -> decision hand-off
// ----------------------------------------------------------------------------

/// Single-slot mailbox holding the most recently captured frame.
///
/// The capture thread overwrites the slot; the decision loop takes it. Older
/// frames are dropped, never queued.
#[derive(Clone, Default)]
pub struct LatestFrame {
    slot: Arc<Mutex<Option<DepthFrame>>>,
}

impl LatestFrame {
    pub fn new() -> Self {
        Self::default()
    }

    /// Publish a frame, replacing any frame not yet taken.
    pub fn publish(&self, frame: DepthFrame) -> Result<()> {
        let mut guard = self
            .slot
            .lock()
            .map_err(|_| anyhow!("latest frame lock poisoned"))?;
        *guard = Some(frame);
        Ok(())
    }

    /// Take the newest frame, leaving the slot empty.
    pub fn take(&self) -> Result<Option<DepthFrame>> {
        let mut guard = self
            .slot
            .lock()
            .map_err(|_| anyhow!("latest frame lock poisoned"))?;
        Ok(guard.take())
    }
}

// ----------------------------------------------------------------------------
// Tests
// ----------------------------------------------------------------------------
