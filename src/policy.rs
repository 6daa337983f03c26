//! Decision policy.
//!
//! Turns five region scores into one `NavigationCommand`:
//!
//! 1. Aggregate: `left = max(left, far_left)`, `right = max(right, far_right)`.
//! 2. Safety filter: only actions scoring at least `safety_threshold` qualify.
//! 3. Select, first match wins:
//!    - nothing qualifies: exploratory turn from the injected `TurnSource`
//!    - forward qualifies and is at least `forward_ratio` of the best qualifying side: forward
//!    - otherwise: the higher qualifying side, ties settled by `TieBreak`
//! 4. Size the step from the chosen path's score. Speed is always `Slow`.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

use crate::config::{NavigationConfig, TieBreak};
use crate::scoring::{Region, RegionScores};
use crate::{Action, NavigationCommand, SpeedTier};

/// Which selection rule produced a command.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DecisionRule {
    /// No action met the safety threshold; exploratory turn.
    NoSafePath,
    /// Forward qualified and was competitive with the best side.
    ForwardCompetitive,
    /// Forward qualified but a side was clearly better.
    SideClearer,
    /// Forward did not qualify; best qualifying side taken.
    CenterBlocked,
}

// -------------------- Turn sources --------------------

/// Supplies the direction of an exploratory turn.
///
/// Only consulted when no action qualifies. Must return `Left` or `Right`.
pub trait TurnSource {
    fn exploratory_turn(&mut self) -> Action;
}

/// Uniform random left/right.
pub struct RandomTurns<R = StdRng> {
    rng: R,
}

impl RandomTurns<StdRng> {
    pub fn from_entropy() -> Self {
        Self {
            rng: StdRng::from_entropy(),
        }
    }

    /// Reproducible sequence of turns.
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl<R: Rng> RandomTurns<R> {
    pub fn with_rng(rng: R) -> Self {
        Self { rng }
    }
}

impl<R: Rng> TurnSource for RandomTurns<R> {
    fn exploratory_turn(&mut self) -> Action {
        if self.rng.gen_bool(0.5) {
            Action::Left
        } else {
            Action::Right
        }
    }
}

/// Always turns the same way.
#[derive(Clone, Copy, Debug)]
pub struct FixedTurn(Action);

impl FixedTurn {
    pub fn left() -> Self {
        Self(Action::Left)
    }

    pub fn right() -> Self {
        Self(Action::Right)
    }
}

impl TurnSource for FixedTurn {
    fn exploratory_turn(&mut self) -> Action {
        self.0
    }
}

/// Left, right, left, ...
#[derive(Clone, Copy, Debug)]
pub struct AlternatingTurns {
    next: Action,
}

impl AlternatingTurns {
    pub fn starting_left() -> Self {
        Self { next: Action::Left }
    }
}

impl Default for AlternatingTurns {
    fn default() -> Self {
        Self::starting_left()
    }
}

impl TurnSource for AlternatingTurns {
    fn exploratory_turn(&mut self) -> Action {
        let turn = self.next;
        self.next = match turn {
            Action::Left => Action::Right,
            _ => Action::Left,
        };
        turn
    }
}

// -------------------- Policy --------------------

#[derive(Clone, Debug)]
pub struct DecisionPolicy {
    safety_threshold: f32,
    forward_ratio: f32,
    long_step_score: f32,
    medium_step_score: f32,
    long_step_m: f32,
    medium_step_m: f32,
    short_step_m: f32,
    tie_break: TieBreak,
}

impl DecisionPolicy {
    /// Expects a config that already passed `NavigationConfig::validate`.
    pub fn new(config: &NavigationConfig) -> Self {
        Self {
            safety_threshold: config.safety_threshold,
            forward_ratio: config.forward_ratio,
            long_step_score: config.long_step_score,
            medium_step_score: config.medium_step_score,
            long_step_m: config.long_step_m,
            medium_step_m: config.medium_step_m,
            short_step_m: config.short_step_m,
            tie_break: config.tie_break,
        }
    }

    pub fn decide(&self, scores: &RegionScores, turns: &mut dyn TurnSource) -> NavigationCommand {
        let center = scores.get(Region::Center);
        let left = scores.get(Region::Left).max(scores.get(Region::FarLeft));
        let right = scores.get(Region::Right).max(scores.get(Region::FarRight));

        let forward_ok = center >= self.safety_threshold;
        let left_q = if left >= self.safety_threshold { left } else { 0.0 };
        let right_q = if right >= self.safety_threshold { right } else { 0.0 };
        let any_side = left >= self.safety_threshold || right >= self.safety_threshold;

        let (action, rule, reasoning) = if !forward_ok && !any_side {
            let turn = match turns.exploratory_turn() {
                Action::Forward => Action::Left,
                side => side,
            };
            (
                turn,
                DecisionRule::NoSafePath,
                format!(
                    "No safe path (C={}% L={}% R={}%) - exploring",
                    pct(center),
                    pct(left),
                    pct(right)
                ),
            )
        } else if forward_ok {
            let best_side = left_q.max(right_q);
            if center >= best_side * self.forward_ratio {
                (
                    Action::Forward,
                    DecisionRule::ForwardCompetitive,
                    format!(
                        "Forward safe & competitive (C={}% >= {}% of best={}%)",
                        pct(center),
                        pct(self.forward_ratio),
                        pct(best_side)
                    ),
                )
            } else {
                let side = self.better_side(left_q, right_q);
                let (tag, side_score) = side_label(side, left, right);
                (
                    side,
                    DecisionRule::SideClearer,
                    format!(
                        "{} much clearer ({}={}% >> C={}%)",
                        capitalized(side),
                        tag,
                        pct(side_score),
                        pct(center)
                    ),
                )
            }
        } else {
            let side = self.better_side(left_q, right_q);
            let (tag, side_score) = side_label(side, left, right);
            (
                side,
                DecisionRule::CenterBlocked,
                format!(
                    "Center blocked (C={}%), evading {} ({}={}%)",
                    pct(center),
                    side,
                    tag,
                    pct(side_score)
                ),
            )
        };

        let path_score = if action == Action::Forward {
            center
        } else {
            left.max(right)
        };

        log::debug!(
            "scores C={}% L={}% R={}% -> {}",
            pct(center),
            pct(scores.get(Region::Left)),
            pct(scores.get(Region::Right)),
            action.as_str().to_uppercase()
        );

        NavigationCommand {
            action,
            speed: SpeedTier::Slow,
            distance: self.step_distance(path_score),
            reasoning,
            rule,
            scores: scores.clone(),
        }
    }

    /// Step length for a path score. Takes one of three configured values.
    pub fn step_distance(&self, path_score: f32) -> f32 {
        if path_score > self.long_step_score {
            self.long_step_m
        } else if path_score > self.medium_step_score {
            self.medium_step_m
        } else {
            self.short_step_m
        }
    }

    fn better_side(&self, left: f32, right: f32) -> Action {
        if left > right {
            Action::Left
        } else if right > left {
            Action::Right
        } else {
            match self.tie_break {
                TieBreak::Left => Action::Left,
                TieBreak::Right => Action::Right,
            }
        }
    }
}

fn side_label(side: Action, left: f32, right: f32) -> (&'static str, f32) {
    match side {
        Action::Left => ("L", left),
        _ => ("R", right),
    }
}

fn capitalized(side: Action) -> &'static str {
    match side {
        Action::Forward => "Forward",
        Action::Left => "Left",
        Action::Right => "Right",
    }
}

/// Truncated percentage for log and reasoning text.
fn pct(score: f32) -> i32 {
    // Nudge past f32 representation error so 0.9 reads as 90, not 89.
    (score * 100.0 + 1e-4).floor() as i32
}

#[cfg(test)]
mod tests {
    use super::*;

    fn policy() -> DecisionPolicy {
        DecisionPolicy::new(&NavigationConfig::default())
    }

    fn scores(far_left: f32, left: f32, center: f32, right: f32, far_right: f32) -> RegionScores {
        [
            (Region::FarLeft, far_left),
            (Region::Left, left),
            (Region::Center, center),
            (Region::Right, right),
            (Region::FarRight, far_right),
        ]
        .into_iter()
        .collect()
    }

    #[test]
    fn all_clear_goes_forward_at_long_step() {
        let cmd = policy().decide(&RegionScores::uniform(1.0), &mut FixedTurn::left());
        assert_eq!(cmd.action, Action::Forward);
        assert_eq!(cmd.rule, DecisionRule::ForwardCompetitive);
        assert_eq!(cmd.distance, 0.30);
        assert_eq!(cmd.speed, SpeedTier::Slow);
        assert_eq!(cmd.reasoning, "Forward safe & competitive (C=100% >= 85% of best=100%)");
    }

    #[test]
    fn nothing_qualifies_uses_turn_source() {
        let s = scores(0.3, 0.0, 0.34, 0.2, 0.0);
        let cmd = policy().decide(&s, &mut FixedTurn::left());
        assert_eq!(cmd.action, Action::Left);
        assert_eq!(cmd.rule, DecisionRule::NoSafePath);
        assert!(cmd.is_exploratory());
        assert_eq!(cmd.distance, 0.15);
        assert_eq!(cmd.reasoning, "No safe path (C=34% L=30% R=20%) - exploring");

        let cmd = policy().decide(&s, &mut FixedTurn::right());
        assert_eq!(cmd.action, Action::Right);
    }

    #[test]
    fn forward_wins_when_competitive_not_only_when_maximal() {
        // 0.6 >= 0.85 * 0.7 = 0.595
        let cmd = policy().decide(&scores(0.0, 0.7, 0.6, 0.5, 0.0), &mut FixedTurn::left());
        assert_eq!(cmd.action, Action::Forward);
        assert_eq!(cmd.distance, 0.15);
    }

    #[test]
    fn much_clearer_side_beats_forward() {
        let cmd = policy().decide(&scores(1.0, 0.0, 0.5, 0.4, 0.0), &mut FixedTurn::right());
        assert_eq!(cmd.action, Action::Left);
        assert_eq!(cmd.rule, DecisionRule::SideClearer);
        assert_eq!(cmd.reasoning, "Left much clearer (L=100% >> C=50%)");
        assert_eq!(cmd.distance, 0.30);
    }

    #[test]
    fn non_qualifying_side_counts_as_zero_for_competitiveness() {
        // Right is 0.34 (below threshold): forward at 0.35 is compared with 0, not 0.34.
        let cmd = policy().decide(&scores(0.0, 0.0, 0.35, 0.34, 0.0), &mut FixedTurn::left());
        assert_eq!(cmd.action, Action::Forward);
    }

    #[test]
    fn blocked_center_evades_to_best_side() {
        let cmd = policy().decide(&scores(0.0, 0.4, 0.1, 0.0, 0.9), &mut FixedTurn::left());
        assert_eq!(cmd.action, Action::Right);
        assert_eq!(cmd.rule, DecisionRule::CenterBlocked);
        assert_eq!(cmd.reasoning, "Center blocked (C=10%), evading right (R=90%)");
        assert_eq!(cmd.distance, 0.30);
    }

    #[test]
    fn outer_zone_can_carry_a_side() {
        let cmd = policy().decide(&scores(0.9, 0.0, 0.0, 0.0, 0.0), &mut FixedTurn::right());
        assert_eq!(cmd.action, Action::Left);
    }

    #[test]
    fn exact_side_tie_follows_configured_rule() {
        let tied = scores(0.0, 1.0, 0.0, 1.0, 0.0);
        assert_eq!(policy().decide(&tied, &mut FixedTurn::left()).action, Action::Right);

        let left_biased = DecisionPolicy::new(&NavigationConfig {
            tie_break: TieBreak::Left,
            ..NavigationConfig::default()
        });
        assert_eq!(left_biased.decide(&tied, &mut FixedTurn::right()).action, Action::Left);
    }

    #[test]
    fn missing_regions_read_as_blocked() {
        let cmd = policy().decide(&RegionScores::new(), &mut FixedTurn::right());
        assert_eq!(cmd.action, Action::Right);
        assert_eq!(cmd.rule, DecisionRule::NoSafePath);
    }

    #[test]
    fn side_path_score_is_best_raw_side() {
        // Chosen side is left (0.7), but the path score uses max(left, right) raw.
        let p = policy();
        let cmd = p.decide(&scores(0.0, 0.7, 0.0, 0.0, 0.0), &mut FixedTurn::left());
        assert_eq!(cmd.distance, 0.20);
    }

    #[test]
    fn step_distance_is_monotone_over_three_values() {
        let p = policy();
        let mut last = 0.0;
        for i in 0..=100 {
            let d = p.step_distance(i as f32 / 100.0);
            assert!(d >= last);
            assert!([0.15, 0.20, 0.30].contains(&d));
            last = d;
        }
        assert_eq!(p.step_distance(0.8), 0.20);
        assert_eq!(p.step_distance(0.6), 0.15);
    }

    #[test]
    fn seeded_turns_repeat_and_cover_both_sides() {
        let mut a = RandomTurns::seeded(7);
        let mut b = RandomTurns::seeded(7);
        let run_a: Vec<Action> = (0..64).map(|_| a.exploratory_turn()).collect();
        let run_b: Vec<Action> = (0..64).map(|_| b.exploratory_turn()).collect();
        assert_eq!(run_a, run_b);
        assert!(run_a.contains(&Action::Left));
        assert!(run_a.contains(&Action::Right));
        assert!(!run_a.contains(&Action::Forward));
    }

    #[test]
    fn percentages_never_round_up_across_the_threshold() {
        assert_eq!(pct(0.34999), 34);
        assert_eq!(pct(0.35), 35);
        assert_eq!(pct(0.9), 90);

        let cmd = policy().decide(&scores(0.0, 0.0, 0.34999, 0.0, 0.0), &mut FixedTurn::left());
        assert_eq!(cmd.reasoning, "No safe path (C=34% L=0% R=0%) - exploring");
    }

    #[test]
    fn alternating_turns_flip() {
        let mut turns = AlternatingTurns::starting_left();
        assert_eq!(turns.exploratory_turn(), Action::Left);
        assert_eq!(turns.exploratory_turn(), Action::Right);
        assert_eq!(turns.exploratory_turn(), Action::Left);
    }
}
