//! # tycoon-core
//!
//! A deterministic, headless board-economy engine for ring-board
//! trading games: dice, movement, property, rent, bankruptcy, and
//! turn sequencing.
//!
//! ## Design Principles
//!
//! 1. **Headless First**: No rendering, no assets, no real-time clock.
//!    Presentation hangs off two seams: the `GameEvent` bus and the
//!    `VisualSync` hook. Both work with zero subscribers.
//!
//! 2. **Deterministic**: All randomness flows through a single seeded
//!    RNG, and all pacing is tick counts. The same seed and the same
//!    call sequence replay the same game, roll for roll.
//!
//! 3. **Configuration Over Convention**: Board size, bankrolls, dice
//!    range, streak threshold, and policy pacing all live in
//!    `GameConfig`; the rules code reads tunables from nowhere else.
//!
//! ## Modules
//!
//! - `core`: Player identity, configuration, RNG, errors
//! - `board`: The position ring and tile registry
//! - `dice`: Roll generation and double-streak tracking
//! - `economy`: Player accounts and property transactions
//! - `events`: The typed event bus and presentation seams
//! - `turn`: Movement, the automated-turn policy, and the `Game`
//!   controller

pub mod board;
pub mod core;
pub mod dice;
pub mod economy;
pub mod events;
pub mod turn;

// Re-export commonly used types
pub use crate::core::{GameConfig, GameError, PlayerId, PlayerKind, PlayerMap, PlayerSpec};

pub use crate::board::{Board, PropertyTile, Tile, TileKind};

pub use crate::dice::{DiceEngine, DiceRoll};

pub use crate::economy::{Player, PurchaseReceipt, RentReceipt, SaleReceipt};

pub use crate::events::{EventBus, EventLog, EventSink, GameEvent, NoopVisualSync, VisualSync};

pub use crate::turn::{
    Game, GameState, LandingOutcome, MoveOutcome, RollOutcome, StagedMove, StepProgress,
};
