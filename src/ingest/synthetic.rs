//! Synthetic depth scenes.
//!
//! Each scene is a fixed layout of distances with a sparse, deterministic
//! sprinkle of zero samples standing in for stereo dropouts.

use anyhow::{anyhow, Result};
use std::fmt;
use std::str::FromStr;

use super::{DepthSource, SourceStats};
use crate::frame::{ColorFrame, DepthFrame};

/// Frames spent on each scene before `Scene::Cycle` moves on.
const CYCLE_FRAMES: u64 = 20;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Scene {
    /// Everything 3 m away.
    Open,
    /// 200 mm obstacle dead ahead, 2.5 m on both sides.
    BlockedCenter,
    /// No valid readings at all.
    Invalid,
    /// 300 mm wall across the whole view.
    Wall,
    /// Far-left and left at 2.5 m, everything else 350 mm.
    LeftOpen,
    /// Rotates through the other scenes.
    Cycle,
}

impl Scene {
    pub const ALL: [Scene; 6] = [
        Scene::Open,
        Scene::BlockedCenter,
        Scene::Invalid,
        Scene::Wall,
        Scene::LeftOpen,
        Scene::Cycle,
    ];

    const STILLS: [Scene; 5] = [
        Scene::Open,
        Scene::BlockedCenter,
        Scene::Invalid,
        Scene::Wall,
        Scene::LeftOpen,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Scene::Open => "open",
            Scene::BlockedCenter => "blocked_center",
            Scene::Invalid => "invalid",
            Scene::Wall => "wall",
            Scene::LeftOpen => "left_open",
            Scene::Cycle => "cycle",
        }
    }

    /// Render the scene at `frame_index`. Only `Cycle` depends on the index.
    pub fn render(self, width: u32, height: u32, frame_index: u64) -> DepthFrame {
        let still = match self {
            Scene::Cycle => Self::STILLS[((frame_index / CYCLE_FRAMES) % 5) as usize],
            other => other,
        };
        DepthFrame::from_fn(width, height, |x, y| {
            if still != Scene::Invalid && dropout(x, y) {
                return 0;
            }
            let fifth = if width == 0 { 0 } else { (x as u64 * 5 / width as u64) as u32 };
            match still {
                Scene::Open => 3000,
                Scene::BlockedCenter => {
                    if fifth == 2 {
                        200
                    } else {
                        2500
                    }
                }
                Scene::Invalid => 0,
                Scene::Wall => 300,
                Scene::LeftOpen | Scene::Cycle => {
                    if fifth < 2 {
                        2500
                    } else {
                        350
                    }
                }
            }
        })
    }
}

fn dropout(x: u32, y: u32) -> bool {
    (x.wrapping_mul(7).wrapping_add(y.wrapping_mul(13))) % 23 == 0
}

impl FromStr for Scene {
    type Err = anyhow::Error;

    fn from_str(value: &str) -> Result<Self> {
        Scene::ALL
            .iter()
            .copied()
            .find(|scene| scene.name() == value)
            .ok_or_else(|| anyhow!("unknown synthetic scene '{}'", value))
    }
}

impl fmt::Display for Scene {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.name())
    }
}

/// Depth source for `stub://<scene>` URLs.
pub struct SyntheticDepthSource {
    scene: Scene,
    width: u32,
    height: u32,
    frame_count: u64,
}

impl SyntheticDepthSource {
    pub fn new(scene: Scene, width: u32, height: u32) -> Self {
        Self {
            scene,
            width,
            height,
            frame_count: 0,
        }
    }
}

impl DepthSource for SyntheticDepthSource {
    /// Synthetic sources are always "connected".
    fn connect(&mut self) -> Result<()> {
        log::info!("SyntheticDepthSource: connected to stub://{}", self.scene);
        Ok(())
    }

    fn next_frame(&mut self) -> Result<DepthFrame> {
        let frame = self.scene.render(self.width, self.height, self.frame_count);
        self.frame_count += 1;
        Ok(frame)
    }

    /// Flat mid-gray image matching the depth frame size.
    fn color_frame(&mut self) -> Result<Option<ColorFrame>> {
        let len = self.width as usize * self.height as usize * 3;
        ColorFrame::new(self.width, self.height, vec![128; len]).map(Some)
    }

    fn is_healthy(&self) -> bool {
        true
    }

    fn stats(&self) -> SourceStats {
        SourceStats {
            frames_captured: self.frame_count,
            url: format!("stub://{}", self.scene),
        }
    }
}
