//! Motion command sinks.
//!
//! A sink receives one `NavigationCommand` per cycle and owns everything
//! after that: motor mapping, acceleration limits, odometry, and any
//! last-moment obstacle re-check before the step is executed.

use anyhow::Result;

use crate::NavigationCommand;

/// Consumer of navigation commands.
pub trait MotionSink {
    fn dispatch(&mut self, command: &NavigationCommand) -> Result<()>;
}

/// Logs each command at info level. Used when no drive base is attached.
#[derive(Default)]
pub struct LogSink {
    dispatched: u64,
}

impl LogSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn dispatched(&self) -> u64 {
        self.dispatched
    }
}

impl MotionSink for LogSink {
    fn dispatch(&mut self, command: &NavigationCommand) -> Result<()> {
        self.dispatched += 1;
        log::info!(
            "command #{}: {} {:?} {:.2}m ({})",
            self.dispatched,
            command.action,
            command.speed,
            command.distance,
            command.reasoning
        );
        Ok(())
    }
}

/// Keeps every command in memory.
#[derive(Default)]
pub struct RecordingSink {
    commands: Vec<NavigationCommand>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn commands(&self) -> &[NavigationCommand] {
        &self.commands
    }

    pub fn into_commands(self) -> Vec<NavigationCommand> {
        self.commands
    }
}

impl MotionSink for RecordingSink {
    fn dispatch(&mut self, command: &NavigationCommand) -> Result<()> {
        self.commands.push(command.clone());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::policy::DecisionRule;
    use crate::scoring::RegionScores;
    use crate::{Action, SpeedTier};

    fn command(action: Action) -> NavigationCommand {
        NavigationCommand {
            action,
            speed: SpeedTier::Slow,
            distance: 0.2,
            reasoning: "test".to_string(),
            rule: DecisionRule::ForwardCompetitive,
            scores: RegionScores::uniform(0.7),
        }
    }

    #[test]
    fn recording_sink_keeps_order() {
        let mut sink = RecordingSink::new();
        sink.dispatch(&command(Action::Forward)).unwrap();
        sink.dispatch(&command(Action::Left)).unwrap();
        let actions: Vec<Action> = sink.commands().iter().map(|c| c.action).collect();
        assert_eq!(actions, vec![Action::Forward, Action::Left]);
        assert_eq!(sink.into_commands().len(), 2);
    }

    #[test]
    fn log_sink_counts_dispatches() {
        let mut sink = LogSink::new();
        sink.dispatch(&command(Action::Right)).unwrap();
        assert_eq!(sink.dispatched(), 1);
    }
}
