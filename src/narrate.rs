//! Caption capability.
//!
//! Language layers (captioning, speech, VLM prompts) get qualitative context
//! from the command's scores rather than from raw depth.

use crate::scoring::Region;
use crate::{Action, NavigationCommand};

/// Scores closer than this are described as "about as clear".
const SIMILAR_MARGIN: f32 = 0.05;

/// Turns a command into a sentence for a speech or caption layer.
pub trait Narrator {
    fn describe(&self, command: &NavigationCommand) -> String;
}

/// Describes the lateral comparison and the chosen move from scores alone.
#[derive(Clone, Copy, Debug, Default)]
pub struct ScoreNarrator;

impl Narrator for ScoreNarrator {
    fn describe(&self, command: &NavigationCommand) -> String {
        let scores = &command.scores;
        let left = scores.get(Region::Left).max(scores.get(Region::FarLeft));
        let right = scores.get(Region::Right).max(scores.get(Region::FarRight));
        let center = scores.get(Region::Center);

        let lateral = if (left - right).abs() < SIMILAR_MARGIN {
            "left and right are about as clear".to_string()
        } else if left > right {
            "left is clearer than right".to_string()
        } else {
            "right is clearer than left".to_string()
        };
        let ahead = match center {
            c if c <= 0.0 => "the way ahead is blocked",
            c if c < 0.6 => "the way ahead is tight",
            _ => "the way ahead is open",
        };
        let movement = match (command.action, command.is_exploratory()) {
            (Action::Forward, _) => format!("moving forward {:.2} m", command.distance),
            (side, true) => format!("turning {} to look for a way out", side),
            (side, false) => format!("veering {} {:.2} m", side, command.distance),
        };
        format!("{}; {}; {}.", capitalize(ahead), lateral, movement)
    }
}

fn capitalize(text: &str) -> String {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::NavigationConfig;
    use crate::policy::{DecisionPolicy, FixedTurn};
    use crate::scoring::RegionScores;

    fn describe(scores: RegionScores) -> String {
        let cmd = DecisionPolicy::new(&NavigationConfig::default()).decide(&scores, &mut FixedTurn::left());
        ScoreNarrator.describe(&cmd)
    }

    #[test]
    fn describes_open_corridor() {
        assert_eq!(
            describe(RegionScores::uniform(1.0)),
            "The way ahead is open; left and right are about as clear; moving forward 0.30 m."
        );
    }

    #[test]
    fn describes_evasion() {
        let scores: RegionScores = [(Region::Left, 0.9), (Region::Right, 0.4)].into_iter().collect();
        assert_eq!(
            describe(scores),
            "The way ahead is blocked; left is clearer than right; veering left 0.30 m."
        );
    }

    #[test]
    fn describes_exploration() {
        assert_eq!(
            describe(RegionScores::new()),
            "The way ahead is blocked; left and right are about as clear; turning left to look for a way out."
        );
    }
}
