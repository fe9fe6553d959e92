//! Tick-driven turn policy for automated players.
//!
//! An `AutoTurn` is armed when an automated player's turn starts and
//! stepped once per engine tick. It is a pure stage machine: each tick
//! yields the single action the controller should perform now, and the
//! controller reports back when the staged move has settled. Delays are
//! tick counts, so a seeded game plays out identically every run.
//!
//! One roll per turn: even when a double grants the player another
//! roll, the policy proceeds to settle and end the turn.

use tracing::trace;

/// What the controller should do on this tick.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AutoAction {
    /// Delay in progress; do nothing.
    Wait,
    /// Roll the dice and begin a staged move.
    RollAndMove,
    /// A staged move should be in flight; keep ticking it.
    AwaitMove,
    /// Attempt to buy the property under the player, if any.
    Purchase,
    /// End the turn.
    EndTurn,
    /// The policy has run its course.
    Idle,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Stage {
    Thinking { ticks_left: u32 },
    AwaitingMove,
    Settling { ticks_left: u32 },
    Ending,
    Done,
}

/// One automated player's turn, from think delay to end-turn.
#[derive(Clone, Debug)]
pub struct AutoTurn {
    stage: Stage,
    settle_ticks: u32,
}

impl AutoTurn {
    /// Arm a turn with the given think and post-move delays.
    #[must_use]
    pub fn new(think_ticks: u32, settle_ticks: u32) -> Self {
        Self {
            stage: Stage::Thinking {
                ticks_left: think_ticks,
            },
            settle_ticks,
        }
    }

    /// Advance one tick and report the action due now.
    pub fn tick(&mut self) -> AutoAction {
        let action = match self.stage {
            Stage::Thinking { ref mut ticks_left } => {
                if *ticks_left > 0 {
                    *ticks_left -= 1;
                    AutoAction::Wait
                } else {
                    self.stage = Stage::AwaitingMove;
                    AutoAction::RollAndMove
                }
            }
            Stage::AwaitingMove => AutoAction::AwaitMove,
            Stage::Settling { ref mut ticks_left } => {
                if *ticks_left > 0 {
                    *ticks_left -= 1;
                    AutoAction::Wait
                } else {
                    self.stage = Stage::Ending;
                    AutoAction::Purchase
                }
            }
            Stage::Ending => {
                self.stage = Stage::Done;
                AutoAction::EndTurn
            }
            Stage::Done => AutoAction::Idle,
        };

        trace!(stage = ?self.stage, ?action, "auto turn tick");
        action
    }

    /// Report that the staged move has settled; begins the post-move
    /// delay.
    pub fn move_settled(&mut self) {
        if self.stage == Stage::AwaitingMove {
            self.stage = Stage::Settling {
                ticks_left: self.settle_ticks,
            };
        }
    }

    /// Whether the policy has ended its turn.
    #[must_use]
    pub fn is_done(&self) -> bool {
        self.stage == Stage::Done
    }
}
