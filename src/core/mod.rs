//! Core engine types: player identity, configuration, RNG, errors.
//!
//! This module contains the building blocks the rest of the engine is
//! assembled from. Rule tunables live in `GameConfig` rather than in
//! constants scattered through the rules code.

pub mod config;
pub mod error;
pub mod player;
pub mod rng;

pub use config::{GameConfig, PlayerKind, PlayerSpec};
pub use error::GameError;
pub use player::{PlayerId, PlayerMap};
pub use rng::GameRng;
