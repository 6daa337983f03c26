//! Depth Navigator
//!
//! This crate turns one depth frame into one motion command for a ground robot.
//!
//! # Architecture
//!
//! Each control cycle is a pure function of the current frame:
//!
//! 1. **Region scoring**: the obstacle-height band is split into five columns,
//!    each reduced to a clearance score in `[0, 1]`.
//! 2. **Decision policy**: scores below the safety threshold are discarded,
//!    forward wins while it stays competitive with the best side, and an
//!    exploratory turn is issued when nothing qualifies.
//! 3. **Step sizing**: the step distance grows with clearance of the chosen
//!    path; speed always stays at the slowest tier.
//!
//! The engine keeps no state between frames. Cross-frame smoothing lives in
//! `smoothing` as an optional wrapper.
//!
//! # Module Structure
//!
//! - `frame`: Depth/color frame containers and the latest-frame hand-off slot
//! - `scoring`: Region geometry and clearance scoring
//! - `policy`: Safety filter, action selection, step sizing
//! - `engine`: Validated scorer + policy pair, one call per cycle
//! - `ingest`, `detect`, `actuate`, `narrate`: Capability seams to hardware and models
//! - Core types: Action, SpeedTier, NavigationCommand

use serde::{Deserialize, Serialize};
use std::fmt;

pub mod actuate;
pub mod config;
pub mod detect;
pub mod engine;
pub mod frame;
pub mod ingest;
pub mod narrate;
pub mod policy;
pub mod scoring;
pub mod smoothing;
pub mod ui;

pub use actuate::{LogSink, MotionSink, RecordingSink};
pub use config::{NavdConfig, NavigationConfig, TieBreak};
pub use detect::{Detection, DetectionResult, NullDetector, ObjectDetector};
pub use engine::NavigationEngine;
pub use frame::{ColorFrame, DepthFrame, LatestFrame};
pub use ingest::{
    open_source, spawn_capture, DepthSource, RawFileDepthSource, SourceStats, SyntheticDepthSource,
};
pub use narrate::{Narrator, ScoreNarrator};
pub use policy::{AlternatingTurns, DecisionPolicy, DecisionRule, FixedTurn, RandomTurns, TurnSource};
pub use scoring::{Region, RegionScorer, RegionScores, RegionStats};
pub use smoothing::{ScoreSmoother, SmoothedNavigator};

// -------------------- Actions --------------------

/// Discrete motion the robot should take this cycle.
///
/// Exploratory turns reuse `Left`/`Right`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Action {
    Forward,
    Left,
    Right,
}

impl Action {
    pub fn as_str(self) -> &'static str {
        match self {
            Action::Forward => "forward",
            Action::Left => "left",
            Action::Right => "right",
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

/// Coarse speed tier.
///
/// The policy only ever emits `Slow`; the faster tiers exist for consumers
/// that share this type with other planners.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SpeedTier {
    #[default]
    Slow,
    Medium,
    Fast,
}

// -------------------- Commands --------------------

/// The engine's only output per cycle. Owned by the caller.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct NavigationCommand {
    pub action: Action,
    pub speed: SpeedTier,
    /// Step distance in metres.
    pub distance: f32,
    /// Human-readable note naming the rule that fired. Diagnostics only.
    pub reasoning: String,
    pub rule: DecisionRule,
    /// Full per-region scores for downstream consumers.
    pub scores: RegionScores,
}

impl NavigationCommand {
    pub fn is_exploratory(&self) -> bool {
        self.rule == DecisionRule::NoSafePath
    }
}
