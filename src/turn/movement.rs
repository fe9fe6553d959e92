//! Player movement: immediate and staged.
//!
//! Both paths share one commit function, so the staged (animated)
//! variant is bit-identical to the immediate one in every rule-relevant
//! effect: validation, the single pass-start bonus, and the final
//! position commit. A staged move's intermediate steps are a progress
//! stream for presentation only: they never mutate rule state and the
//! tiles crossed are never resolved.
//!
//! A player with a move in flight is a mutual-exclusion region: a
//! second move request fails fast with `MoveInProgress` and leaves the
//! in-flight move untouched.

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::board::Board;
use crate::core::{GameError, PlayerId};
use crate::economy::Player;

/// What a committed move did.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoveOutcome {
    pub from: usize,
    pub to: usize,
    /// Whether the wrap condition held and the bonus was credited.
    pub passed_start: bool,
}

/// Validate and commit a move in one call.
///
/// Fails, leaving the player untouched, on negative steps, an
/// out-of-range current position, or a move already in flight. Credits
/// `bonus` exactly once when the destination index is numerically less
/// than the origin (the literal single-wrap policy), then commits the
/// position. Landing resolution is the caller's job, exactly once, on
/// the destination only.
pub fn execute_move(
    player: &mut Player,
    steps: i32,
    board: &Board,
    bonus: i64,
) -> Result<MoveOutcome, GameError> {
    if player.is_moving() {
        warn!(player = %player.id(), "move rejected: already moving");
        return Err(GameError::MoveInProgress(player.id()));
    }

    if steps < 0 {
        warn!(player = %player.id(), steps, "move rejected: negative steps");
        return Err(GameError::NegativeSteps(steps));
    }

    let from = player.position();
    if !board.contains(from) {
        warn!(player = %player.id(), position = from, "move rejected: invalid position");
        return Err(GameError::InvalidPosition {
            position: from,
            board_size: board.size(),
        });
    }

    let to = board.new_position(from, steps);
    let passed_start = board.passes_start(from, to);

    if passed_start {
        player.credit(bonus)?;
    }

    player.set_position(to);

    Ok(MoveOutcome {
        from,
        to,
        passed_start,
    })
}

/// Progress report from one tick of a staged move.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StepProgress {
    /// Advanced one board-step. `position` is where the piece should be
    /// drawn; rule state is untouched.
    Stepped { position: usize },
    /// All steps taken; the move has been committed.
    Finished(MoveOutcome),
}

/// A move decomposed into per-tile steps, advanced by an external tick.
///
/// `begin` runs the same validation as `execute_move` and marks the
/// player as moving; each `tick` reports one intermediate position;
/// the final `tick` clears the moving flag and commits through
/// `execute_move` itself. Every move has a bounded, deterministic step
/// count; there is no cancellation.
#[derive(Clone, Debug)]
pub struct StagedMove {
    player: PlayerId,
    from: usize,
    steps: i32,
    taken: i32,
}

impl StagedMove {
    /// Validate and stage a move, marking the player as moving.
    pub fn begin(player: &mut Player, steps: i32, board: &Board) -> Result<Self, GameError> {
        if player.is_moving() {
            warn!(player = %player.id(), "staged move rejected: already moving");
            return Err(GameError::MoveInProgress(player.id()));
        }

        if steps < 0 {
            warn!(player = %player.id(), steps, "staged move rejected: negative steps");
            return Err(GameError::NegativeSteps(steps));
        }

        let from = player.position();
        if !board.contains(from) {
            warn!(player = %player.id(), position = from, "staged move rejected: invalid position");
            return Err(GameError::InvalidPosition {
                position: from,
                board_size: board.size(),
            });
        }

        player.set_moving(true);

        Ok(Self {
            player: player.id(),
            from,
            steps,
            taken: 0,
        })
    }

    /// The player this move belongs to.
    #[must_use]
    pub fn player(&self) -> PlayerId {
        self.player
    }

    /// Steps taken so far.
    #[must_use]
    pub fn steps_taken(&self) -> i32 {
        self.taken
    }

    /// Total steps in this move.
    #[must_use]
    pub fn steps_total(&self) -> i32 {
        self.steps
    }

    /// Advance one board-step, or commit if all steps are taken.
    ///
    /// `player` must be the player this move was begun for.
    pub fn tick(
        &mut self,
        player: &mut Player,
        board: &Board,
        bonus: i64,
    ) -> Result<StepProgress, GameError> {
        debug_assert_eq!(player.id(), self.player);

        if self.taken < self.steps {
            self.taken += 1;
            let position = board.new_position(self.from, self.taken);
            return Ok(StepProgress::Stepped { position });
        }

        player.set_moving(false);
        let outcome = execute_move(player, self.steps, board, bonus)?;
        Ok(StepProgress::Finished(outcome))
    }
}
