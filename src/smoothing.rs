//! Optional cross-frame smoothing.
//!
//! The engine itself is stateless. `SmoothedNavigator` wraps it with a
//! per-region exponential moving average so single noisy frames do not flip
//! the decision.

use anyhow::{anyhow, Result};

use crate::engine::NavigationEngine;
use crate::frame::DepthFrame;
use crate::policy::TurnSource;
use crate::scoring::{Region, RegionScores};
use crate::NavigationCommand;

/// Per-region exponential moving average: `s' = alpha * new + (1 - alpha) * prev`.
#[derive(Clone, Debug)]
pub struct ScoreSmoother {
    alpha: f32,
    state: Option<RegionScores>,
}

impl ScoreSmoother {
    /// `alpha` in `(0, 1]`; 1.0 passes scores through unchanged.
    pub fn new(alpha: f32) -> Result<Self> {
        if !(alpha > 0.0 && alpha <= 1.0) {
            return Err(anyhow!("smoothing alpha must be within (0, 1], got {}", alpha));
        }
        Ok(Self { alpha, state: None })
    }

    pub fn alpha(&self) -> f32 {
        self.alpha
    }

    /// Fold in a new frame's scores and return the smoothed set.
    pub fn update(&mut self, scores: &RegionScores) -> RegionScores {
        let smoothed: RegionScores = match &self.state {
            None => Region::ALL
                .iter()
                .map(|&region| (region, scores.get(region)))
                .collect(),
            Some(prev) => Region::ALL
                .iter()
                .map(|&region| {
                    let value =
                        self.alpha * scores.get(region) + (1.0 - self.alpha) * prev.get(region);
                    (region, value.clamp(0.0, 1.0))
                })
                .collect(),
        };
        self.state = Some(smoothed.clone());
        smoothed
    }

    pub fn reset(&mut self) {
        self.state = None;
    }
}

/// Engine plus smoother: score, smooth, decide.
pub struct SmoothedNavigator {
    engine: NavigationEngine,
    smoother: ScoreSmoother,
}

impl SmoothedNavigator {
    pub fn new(engine: NavigationEngine, smoother: ScoreSmoother) -> Self {
        Self { engine, smoother }
    }

    pub fn engine(&self) -> &NavigationEngine {
        &self.engine
    }

    /// Score, smooth, decide. The returned command's `scores` are the
    /// smoothed values the decision was made on, not this frame's raw scores.
    pub fn evaluate(&mut self, frame: &DepthFrame, turns: &mut dyn TurnSource) -> NavigationCommand {
        let raw = self.engine.scorer().score(frame);
        let smoothed = self.smoother.update(&raw);
        self.engine.decide(&smoothed, turns)
    }

    pub fn reset(&mut self) {
        self.smoother.reset();
    }
}
