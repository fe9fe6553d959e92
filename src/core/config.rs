//! Game configuration.
//!
//! All tunables are fixed at initialization: board size, starting money,
//! dice range, the double-streak threshold, the jail index, and the
//! automated-policy pacing. The engine never reads configuration from
//! anywhere but this struct.

use serde::{Deserialize, Serialize};

/// Who drives a player's turns.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum PlayerKind {
    /// Turns are driven by external calls (roll, buy, end turn).
    Interactive,
    /// Turns are driven by the built-in fixed policy via `Game::tick`.
    Automated,
}

/// Roster entry: one player to create at game initialization.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerSpec {
    pub name: String,
    pub kind: PlayerKind,
}

impl PlayerSpec {
    /// An interactively controlled player.
    pub fn interactive(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: PlayerKind::Interactive,
        }
    }

    /// A player driven by the built-in automated policy.
    pub fn automated(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: PlayerKind::Automated,
        }
    }
}

/// Complete game configuration.
///
/// Defaults match the classic ruleset: 40 tiles, 1500 starting money,
/// 1..=6 dice, triple double at 3, jail at index 10, 200 pass-start bonus.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameConfig {
    /// Number of tiles on the ring.
    pub board_size: usize,

    /// Money each player starts with.
    pub starting_money: i64,

    /// Consecutive doubles that trigger the jail relocation.
    pub max_double_streak: u32,

    /// Smallest face a die can show.
    pub dice_min: i32,

    /// Largest face a die can show.
    pub dice_max: i32,

    /// Tile index players are relocated to on a triple double.
    pub jail_index: usize,

    /// Bonus credited when a move wraps past the start tile.
    pub pass_start_bonus: i64,

    /// RNG seed for dice draws.
    pub seed: u64,

    /// Ticks an automated player waits before rolling.
    pub think_delay_ticks: u32,

    /// Ticks an automated player waits between settling and buying.
    pub post_move_delay_ticks: u32,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            board_size: 40,
            starting_money: 1500,
            max_double_streak: 3,
            dice_min: 1,
            dice_max: 6,
            jail_index: 10,
            pass_start_bonus: 200,
            seed: 0,
            think_delay_ticks: 5,
            post_move_delay_ticks: 3,
        }
    }
}

impl GameConfig {
    /// Create a configuration with default rules.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the board size.
    #[must_use]
    pub fn with_board_size(mut self, size: usize) -> Self {
        assert!(size > 0, "Board must have at least 1 tile");
        self.board_size = size;
        self
    }

    /// Set the starting money.
    #[must_use]
    pub fn with_starting_money(mut self, money: i64) -> Self {
        self.starting_money = money;
        self
    }

    /// Set the double-streak threshold.
    #[must_use]
    pub fn with_max_double_streak(mut self, streak: u32) -> Self {
        assert!(streak > 0, "Streak threshold must be at least 1");
        self.max_double_streak = streak;
        self
    }

    /// Set the dice face range (inclusive).
    #[must_use]
    pub fn with_dice_range(mut self, min: i32, max: i32) -> Self {
        assert!(min >= 1 && max >= min, "Dice range must satisfy 1 <= min <= max");
        self.dice_min = min;
        self.dice_max = max;
        self
    }

    /// Set the jail tile index.
    #[must_use]
    pub fn with_jail_index(mut self, index: usize) -> Self {
        self.jail_index = index;
        self
    }

    /// Set the pass-start bonus.
    #[must_use]
    pub fn with_pass_start_bonus(mut self, bonus: i64) -> Self {
        self.pass_start_bonus = bonus;
        self
    }

    /// Set the dice RNG seed.
    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }
}
