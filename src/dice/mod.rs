//! Dice: roll generation and double-streak tracking.
//!
//! Two independent uniform draws per roll. A double extends the streak;
//! a non-double breaks it. When the streak reaches the configured
//! threshold the roll is marked a triple double and the streak resets;
//! the turn controller reacts by relocating the player to jail.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::core::{GameConfig, GameRng};

/// The outcome of one roll of both dice.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiceRoll {
    pub die1: i32,
    pub die2: i32,
    pub total: i32,
    pub is_double: bool,
    /// Set when this roll completed the configured streak of doubles.
    pub is_triple_double: bool,
}

/// Roll generator with consecutive-double streak tracking.
///
/// The streak counter is the only internal state; it is owned by the
/// turn controller and reset at every turn boundary.
#[derive(Clone, Debug)]
pub struct DiceEngine {
    rng: GameRng,
    min: i32,
    max: i32,
    max_streak: u32,
    streak: u32,
    can_roll_again: bool,
}

impl DiceEngine {
    /// Create a dice engine from the game configuration.
    #[must_use]
    pub fn new(config: &GameConfig) -> Self {
        Self {
            rng: GameRng::new(config.seed),
            min: config.dice_min,
            max: config.dice_max,
            max_streak: config.max_double_streak,
            streak: 0,
            can_roll_again: false,
        }
    }

    /// Roll both dice and run the streak pipeline.
    pub fn roll(&mut self) -> DiceRoll {
        let die1 = self.rng.gen_range_inclusive(self.min..=self.max);
        let die2 = self.rng.gen_range_inclusive(self.min..=self.max);
        self.resolve(die1, die2)
    }

    /// Run the streak pipeline on externally supplied faces.
    ///
    /// Used for scripted scenarios and replays; behaves exactly like
    /// `roll` apart from where the faces come from. Faces a real roll
    /// could never produce would corrupt a replay, so they are rejected.
    ///
    /// ## Panics
    ///
    /// Panics if either face lies outside the configured dice range.
    pub fn roll_fixed(&mut self, die1: i32, die2: i32) -> DiceRoll {
        let range = self.min..=self.max;
        assert!(
            range.contains(&die1) && range.contains(&die2),
            "Fixed faces must lie within the configured dice range"
        );
        self.resolve(die1, die2)
    }

    fn resolve(&mut self, die1: i32, die2: i32) -> DiceRoll {
        let is_double = die1 == die2;
        let mut roll = DiceRoll {
            die1,
            die2,
            total: die1 + die2,
            is_double,
            is_triple_double: false,
        };

        if is_double {
            self.streak += 1;
            self.can_roll_again = true;

            if self.streak >= self.max_streak {
                roll.is_triple_double = true;
                self.streak = 0;
                self.can_roll_again = false;
            }
        } else {
            self.streak = 0;
            self.can_roll_again = false;
        }

        debug!(
            die1,
            die2,
            total = roll.total,
            is_double,
            streak = self.streak,
            "dice rolled"
        );

        roll
    }

    /// Current consecutive-double streak.
    #[must_use]
    pub fn streak(&self) -> u32 {
        self.streak
    }

    /// Whether the last roll was a double that did not end the turn.
    #[must_use]
    pub fn can_roll_again(&self) -> bool {
        self.can_roll_again
    }

    /// Clear the streak. Called at every turn boundary.
    pub fn reset(&mut self) {
        self.streak = 0;
        self.can_roll_again = false;
    }
}
