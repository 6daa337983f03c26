use anyhow::Result;

use crate::config::NavigationConfig;
use crate::frame::DepthFrame;
use crate::policy::{DecisionPolicy, TurnSource};
use crate::scoring::{RegionScorer, RegionScores};
use crate::NavigationCommand;

/// Region scorer and decision policy built from one validated config.
///
/// `evaluate` takes `&self` and touches no shared state, so one engine can be
/// shared across threads. The only per-call input besides the frame is the
/// turn source used when no direction is safe.
#[derive(Clone, Debug)]
pub struct NavigationEngine {
    config: NavigationConfig,
    scorer: RegionScorer,
    policy: DecisionPolicy,
}

impl NavigationEngine {
    /// Build an engine. Invalid tunables are rejected here, never mid-cycle.
    pub fn new(config: NavigationConfig) -> Result<Self> {
        config.validate()?;
        log::info!(
            "navigation engine ready (band {:.2}..{:.2}, safe {}mm, clear {}mm, threshold {:.2}, tie-break {:?})",
            config.band_top,
            config.band_bottom,
            config.min_safe_mm,
            config.max_clear_mm,
            config.safety_threshold,
            config.tie_break
        );
        Ok(Self {
            scorer: RegionScorer::new(&config),
            policy: DecisionPolicy::new(&config),
            config,
        })
    }

    pub fn config(&self) -> &NavigationConfig {
        &self.config
    }

    pub fn scorer(&self) -> &RegionScorer {
        &self.scorer
    }

    pub fn policy(&self) -> &DecisionPolicy {
        &self.policy
    }

    /// Score the frame and decide. Never fails: unusable frames end in an exploratory turn.
    pub fn evaluate(&self, frame: &DepthFrame, turns: &mut dyn TurnSource) -> NavigationCommand {
        let scores = self.scorer.score(frame);
        self.decide(&scores, turns)
    }

    /// Decide from scores computed elsewhere (e.g. smoothed).
    pub fn decide(&self, scores: &RegionScores, turns: &mut dyn TurnSource) -> NavigationCommand {
        self.policy.decide(scores, turns)
    }
}
