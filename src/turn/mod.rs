//! Turn sequencing: movement, the automated-turn policy, and the game
//! controller that composes everything.

pub mod controller;
pub mod movement;
pub mod policy;

pub use controller::{Game, GameState, LandingOutcome, RollOutcome};
pub use movement::{execute_move, MoveOutcome, StagedMove, StepProgress};
pub use policy::{AutoAction, AutoTurn};
