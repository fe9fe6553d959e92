//! Typed failure results.
//!
//! Nothing in this crate is fatal: validation failures, transaction
//! failures, and concurrency violations all come back as a `GameError`
//! and leave state untouched (with one documented exception: a debit
//! that drives a balance negative, which is the bankruptcy trigger).

use thiserror::Error;

use super::PlayerId;

/// Every failure the rules engine can hand back to a caller.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum GameError {
    /// A money amount was negative.
    #[error("amount must not be negative: {0}")]
    NegativeAmount(i64),

    /// A step count was negative.
    #[error("steps must not be negative: {0}")]
    NegativeSteps(i32),

    /// A board position was outside `[0, board_size)`.
    #[error("position {position} is invalid for board size {board_size}")]
    InvalidPosition { position: usize, board_size: usize },

    /// No tile exists at the given index.
    #[error("no tile at index {0}")]
    NoSuchTile(usize),

    /// The tile at the given index is not a property.
    #[error("tile {0} is not a property")]
    NotAProperty(usize),

    /// The property already has an owner.
    #[error("property {tile} is already owned by {owner}")]
    AlreadyOwned { tile: usize, owner: PlayerId },

    /// The property has no owner.
    #[error("property {0} is unowned")]
    Unowned(usize),

    /// The acting player does not own the property.
    #[error("{player} does not own property {tile}")]
    NotTheOwner { player: PlayerId, tile: usize },

    /// The balance did not cover the amount. The deducting paths leave
    /// the balance negative when they report this; see `Player::debit`.
    #[error("{player} cannot cover {amount}")]
    InsufficientFunds { player: PlayerId, amount: i64 },

    /// A move was requested while another move was in flight.
    #[error("{0} is already moving")]
    MoveInProgress(PlayerId),

    /// The operation is not legal in the current game state.
    #[error("operation requires state {required:?}, game is {actual:?}")]
    WrongState {
        required: crate::turn::GameState,
        actual: crate::turn::GameState,
    },

    /// The acting player is bankrupt and excluded from play.
    #[error("{0} is bankrupt")]
    PlayerBankrupt(PlayerId),
}
