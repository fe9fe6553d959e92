//! The turn controller: game lifecycle, turn rotation, roll-and-move,
//! landing resolution, bankruptcy, and win conditions.
//!
//! `Game` is the composition root. It owns the board, the players, the
//! dice, the event bus, and the visual-sync hook; everything else in the
//! crate is driven from here. One logical thread: every method runs to
//! completion, and time advances only through explicit `tick` calls.

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::board::{Board, Tile, TileKind};
use crate::core::{GameConfig, GameError, PlayerId, PlayerKind, PlayerMap, PlayerSpec};
use crate::dice::{DiceEngine, DiceRoll};
use crate::economy::{transactions, Player, PurchaseReceipt, RentReceipt, SaleReceipt};
use crate::events::{EventBus, EventSink, GameEvent, NoopVisualSync, VisualSync};

use super::movement::{execute_move, MoveOutcome, StagedMove, StepProgress};
use super::policy::{AutoAction, AutoTurn};

/// Game lifecycle state.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameState {
    Initializing,
    Playing,
    Paused,
    GameOver,
}

/// What landing on the destination tile did.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum LandingOutcome {
    /// A non-property tile; nothing happens automatically.
    Passive,
    /// The player's own property; no rent due.
    OwnProperty { tile: usize },
    /// An unowned property the player may now buy.
    UnownedProperty { tile: usize, price: i64 },
    /// Rent transferred to the owner.
    RentPaid { tile: usize, owner: PlayerId, rent: i64 },
    /// Rent was due but unaffordable: the payer went negative and the
    /// owner was credited nothing.
    RentDefaulted { tile: usize, owner: PlayerId, rent: i64 },
}

/// What a roll request did.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum RollOutcome {
    /// Triple double: the player was relocated to jail with no landing
    /// resolution and the turn ended.
    SentToJail { roll: DiceRoll },
    /// The move committed immediately and the landing was resolved.
    Moved {
        roll: DiceRoll,
        movement: MoveOutcome,
        landing: LandingOutcome,
    },
    /// A staged move is now in flight; advance it with `tick`.
    MoveStaged { roll: DiceRoll },
}

impl RollOutcome {
    /// The dice roll behind this outcome.
    #[must_use]
    pub fn roll(&self) -> DiceRoll {
        match *self {
            RollOutcome::SentToJail { roll }
            | RollOutcome::Moved { roll, .. }
            | RollOutcome::MoveStaged { roll } => roll,
        }
    }
}

/// The complete game: rule state plus the seams to the outside world.
pub struct Game {
    config: GameConfig,
    board: Board,
    players: PlayerMap<Player>,
    dice: DiceEngine,
    state: GameState,
    current: usize,
    events: EventBus,
    visual: Box<dyn VisualSync>,
    pending_move: Option<StagedMove>,
    auto: Option<AutoTurn>,
    last_landing: Option<LandingOutcome>,
    winner: Option<PlayerId>,
}

impl Game {
    /// Create a game in the `Initializing` state with the default board
    /// registry for the configured size.
    ///
    /// ## Panics
    ///
    /// Panics if the roster is empty, exceeds 255 players, or the
    /// configured jail index is off the board.
    #[must_use]
    pub fn new(config: GameConfig, roster: &[PlayerSpec]) -> Self {
        let board = Board::new(config.board_size);
        Self::with_board(config, roster, board)
    }

    /// Create a game over a caller-assembled board.
    ///
    /// ## Panics
    ///
    /// Panics if the board size disagrees with the configuration, in
    /// addition to everything `new` panics on.
    #[must_use]
    pub fn with_board(config: GameConfig, roster: &[PlayerSpec], board: Board) -> Self {
        assert_eq!(
            board.size(),
            config.board_size,
            "Board size must match the configuration"
        );
        assert!(
            config.jail_index < config.board_size,
            "Jail index must be on the board"
        );

        let players = PlayerMap::new(roster.len(), |id| {
            let spec = &roster[id.index()];
            Player::new(id, spec.name.clone(), spec.kind, config.starting_money)
        });
        let dice = DiceEngine::new(&config);

        Self {
            config,
            board,
            players,
            dice,
            state: GameState::Initializing,
            current: 0,
            events: EventBus::new(),
            visual: Box::new(NoopVisualSync),
            pending_move: None,
            auto: None,
            last_landing: None,
            winner: None,
        }
    }

    /// Replace the visual-sync hook. Builder style, call before `start`.
    #[must_use]
    pub fn with_visual_sync(mut self, visual: Box<dyn VisualSync>) -> Self {
        self.visual = visual;
        self
    }

    /// Subscribe an event sink.
    pub fn subscribe(&mut self, sink: Box<dyn EventSink>) {
        self.events.subscribe(sink);
    }

    /// Leave `Initializing` and start the first turn.
    pub fn start(&mut self) -> Result<(), GameError> {
        self.require_state(GameState::Initializing)?;

        info!(players = self.players.player_count(), "game started");
        self.state = GameState::Playing;
        self.current = 0;
        self.begin_turn();
        Ok(())
    }

    /// Suspend play. Rolls, purchases, and ticks all fail or idle until
    /// `resume`.
    pub fn pause(&mut self) -> Result<(), GameError> {
        self.require_state(GameState::Playing)?;
        debug!("game paused");
        self.state = GameState::Paused;
        Ok(())
    }

    /// Resume from `Paused`. In-flight staged moves pick up where they
    /// left off.
    pub fn resume(&mut self) -> Result<(), GameError> {
        self.require_state(GameState::Paused)?;
        debug!("game resumed");
        self.state = GameState::Playing;
        Ok(())
    }

    // --- accessors ---

    #[must_use]
    pub fn state(&self) -> GameState {
        self.state
    }

    #[must_use]
    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    #[must_use]
    pub fn board(&self) -> &Board {
        &self.board
    }

    #[must_use]
    pub fn players(&self) -> &PlayerMap<Player> {
        &self.players
    }

    #[must_use]
    pub fn player(&self, id: PlayerId) -> &Player {
        &self.players[id]
    }

    #[must_use]
    pub fn current_player_id(&self) -> PlayerId {
        PlayerId::new(self.current as u8)
    }

    #[must_use]
    pub fn current_player(&self) -> &Player {
        &self.players[self.current_player_id()]
    }

    /// The tile a player currently stands on.
    #[must_use]
    pub fn player_tile(&self, player: PlayerId) -> Option<&Tile> {
        self.board.tile(self.players[player].position())
    }

    /// Current consecutive-double streak.
    #[must_use]
    pub fn dice_streak(&self) -> u32 {
        self.dice.streak()
    }

    /// Whether the last roll was a double that grants another roll.
    #[must_use]
    pub fn can_roll_again(&self) -> bool {
        self.dice.can_roll_again()
    }

    /// Whether a staged move is in flight.
    #[must_use]
    pub fn move_in_flight(&self) -> bool {
        self.pending_move.is_some()
    }

    /// The landing outcome of the most recent settled move this turn.
    #[must_use]
    pub fn last_landing(&self) -> Option<LandingOutcome> {
        self.last_landing
    }

    /// The winner, once the game is over. `None` while playing, and
    /// `None` after a game that ended without a winner.
    #[must_use]
    pub fn winner(&self) -> Option<PlayerId> {
        self.winner
    }

    /// The primary player: the first interactively controlled roster
    /// entry, if any.
    #[must_use]
    pub fn primary_player(&self) -> Option<PlayerId> {
        self.players
            .iter()
            .find(|(_, p)| p.kind() == PlayerKind::Interactive)
            .map(|(id, _)| id)
    }

    /// The unowned property under `player`, if they stand on one.
    #[must_use]
    pub fn purchasable_property(&self, player: PlayerId) -> Option<(usize, i64)> {
        let tile = self.players[player].position();
        match self.board.tile(tile).map(Tile::kind) {
            Some(TileKind::Property(p)) if !p.is_owned() => Some((tile, p.price())),
            _ => None,
        }
    }

    // --- rolling and moving ---

    /// Roll the dice and commit the move immediately, resolving the
    /// landing before returning.
    pub fn roll_and_move(&mut self) -> Result<RollOutcome, GameError> {
        self.guard_roll()?;
        let roll = self.dice.roll();
        self.apply_roll(roll, false)
    }

    /// `roll_and_move` with externally supplied faces. For scripted
    /// scenarios and replays; the streak pipeline runs as usual.
    pub fn roll_and_move_fixed(&mut self, die1: i32, die2: i32) -> Result<RollOutcome, GameError> {
        self.guard_roll()?;
        let roll = self.dice.roll_fixed(die1, die2);
        self.apply_roll(roll, false)
    }

    /// Roll the dice and stage the move; advance it with `tick`.
    pub fn begin_roll_and_move(&mut self) -> Result<RollOutcome, GameError> {
        self.guard_roll()?;
        let roll = self.dice.roll();
        self.apply_roll(roll, true)
    }

    /// `begin_roll_and_move` with externally supplied faces.
    pub fn begin_roll_and_move_fixed(
        &mut self,
        die1: i32,
        die2: i32,
    ) -> Result<RollOutcome, GameError> {
        self.guard_roll()?;
        let roll = self.dice.roll_fixed(die1, die2);
        self.apply_roll(roll, true)
    }

    fn guard_roll(&self) -> Result<(), GameError> {
        self.require_state(GameState::Playing)?;

        if let Some(mv) = &self.pending_move {
            return Err(GameError::MoveInProgress(mv.player()));
        }

        let player = self.current_player_id();
        if self.players[player].is_bankrupt() {
            return Err(GameError::PlayerBankrupt(player));
        }

        Ok(())
    }

    fn apply_roll(&mut self, roll: DiceRoll, staged: bool) -> Result<RollOutcome, GameError> {
        let player = self.current_player_id();
        self.emit(GameEvent::DiceRolled {
            die1: roll.die1,
            die2: roll.die2,
            total: roll.total,
            is_double: roll.is_double,
        });

        if roll.is_triple_double {
            // Relocation, not a move: no pass-start bonus, no landing
            // resolution, and the turn ends regardless of the double.
            info!(%player, "triple double, relocating to jail");
            self.emit(GameEvent::TripleDouble { player });

            let from = self.players[player].position();
            let to = self.config.jail_index;
            self.players[player].set_position(to);
            self.visual.update_visual_position(player, to);
            self.emit(GameEvent::PlayerMoved { player, from, to });

            self.end_turn()?;
            return Ok(RollOutcome::SentToJail { roll });
        }

        if staged {
            let mv = StagedMove::begin(&mut self.players[player], roll.total, &self.board)?;
            self.pending_move = Some(mv);
            return Ok(RollOutcome::MoveStaged { roll });
        }

        let movement = execute_move(
            &mut self.players[player],
            roll.total,
            &self.board,
            self.config.pass_start_bonus,
        )?;
        let landing = self.settle_move(player, movement);

        Ok(RollOutcome::Moved {
            roll,
            movement,
            landing,
        })
    }

    /// Post-commit bookkeeping shared by the immediate and staged paths:
    /// visual sync, the moved event, landing resolution, bankruptcy.
    fn settle_move(&mut self, player: PlayerId, movement: MoveOutcome) -> LandingOutcome {
        self.visual.update_visual_position(player, movement.to);
        self.emit(GameEvent::PlayerMoved {
            player,
            from: movement.from,
            to: movement.to,
        });

        let landing = self.resolve_landing(player);
        self.last_landing = Some(landing);
        self.check_bankruptcy(player);
        landing
    }

    /// Resolve the tile under `player`, exactly once per settled move.
    fn resolve_landing(&mut self, player: PlayerId) -> LandingOutcome {
        let tile = self.players[player].position();
        let (owner, price, rent) = match self.board.tile(tile).map(Tile::kind) {
            Some(TileKind::Property(p)) => (p.owner(), p.price(), p.rent()),
            _ => {
                debug!(%player, tile, "landed on a passive tile");
                return LandingOutcome::Passive;
            }
        };

        match owner {
            None => {
                debug!(%player, tile, price, "landed on an unowned property");
                LandingOutcome::UnownedProperty { tile, price }
            }
            Some(owner) if owner == player => {
                debug!(%player, tile, "landed on own property");
                LandingOutcome::OwnProperty { tile }
            }
            Some(owner) => {
                match transactions::pay_rent(&self.board, &mut self.players, tile, player) {
                    Ok(receipt) => {
                        self.emit(GameEvent::RentPaid {
                            payer: player,
                            receiver: owner,
                            tile,
                            rent: receipt.amount,
                        });
                        LandingOutcome::RentPaid {
                            tile,
                            owner,
                            rent: receipt.amount,
                        }
                    }
                    Err(_) => {
                        warn!(%player, tile, rent, "rent defaulted");
                        LandingOutcome::RentDefaulted { tile, owner, rent }
                    }
                }
            }
        }
    }

    // --- ticking ---

    /// Advance the engine by one tick.
    ///
    /// Ticks drive staged moves and the automated-turn policy, in that
    /// order. Returns `true` while there is tick-driven work pending;
    /// `false` means the engine is idle: waiting on interactive input,
    /// paused, or over.
    pub fn tick(&mut self) -> bool {
        if self.state != GameState::Playing {
            return false;
        }

        if self.pending_move.is_some() {
            self.advance_staged_move();
            return true;
        }

        let action = match self.auto.as_mut() {
            Some(auto) => auto.tick(),
            None => return false,
        };

        match action {
            AutoAction::Wait => {}
            AutoAction::RollAndMove => {
                if let Err(error) = self.begin_roll_and_move() {
                    warn!(%error, "automated roll failed");
                }
            }
            AutoAction::AwaitMove => {
                // The staged move settled on an earlier tick; release
                // the policy into its post-move delay.
                if let Some(auto) = self.auto.as_mut() {
                    auto.move_settled();
                }
            }
            AutoAction::Purchase => self.auto_purchase(),
            AutoAction::EndTurn => {
                if let Err(error) = self.end_turn() {
                    warn!(%error, "automated end turn failed");
                }
            }
            AutoAction::Idle => return false,
        }

        true
    }

    fn advance_staged_move(&mut self) {
        let Some(mut mv) = self.pending_move.take() else {
            return;
        };
        let player = mv.player();

        match mv.tick(
            &mut self.players[player],
            &self.board,
            self.config.pass_start_bonus,
        ) {
            Ok(StepProgress::Stepped { position }) => {
                self.visual.update_visual_position(player, position);
                self.pending_move = Some(mv);
            }
            Ok(StepProgress::Finished(movement)) => {
                self.settle_move(player, movement);
                // Stage-guarded: a policy armed for a new turn ignores it.
                if let Some(auto) = self.auto.as_mut() {
                    auto.move_settled();
                }
            }
            Err(error) => {
                warn!(%player, %error, "staged move aborted");
                self.players[player].set_moving(false);
            }
        }
    }

    fn auto_purchase(&mut self) {
        let player = self.current_player_id();
        let Some((tile, price)) = self.purchasable_property(player) else {
            return;
        };

        if !self.players[player].has_enough_money(price) {
            debug!(%player, tile, price, "automated purchase skipped: cannot afford");
            return;
        }

        if let Err(error) = self.buy_property_at(player, tile) {
            debug!(%player, tile, %error, "automated purchase failed");
        }
    }

    // --- transactions ---

    /// Buy the property under the current player.
    pub fn buy_property(&mut self) -> Result<PurchaseReceipt, GameError> {
        let player = self.current_player_id();
        let tile = self.players[player].position();
        self.buy_property_at(player, tile)
    }

    /// Buy the property at `tile` for `player`.
    pub fn buy_property_at(
        &mut self,
        player: PlayerId,
        tile: usize,
    ) -> Result<PurchaseReceipt, GameError> {
        self.require_state(GameState::Playing)?;

        if self.players[player].is_bankrupt() {
            return Err(GameError::PlayerBankrupt(player));
        }

        let receipt = transactions::purchase(&mut self.board, &mut self.players, tile, player)?;
        self.emit(GameEvent::PropertyPurchased { player, tile });
        Ok(receipt)
    }

    /// Sell the property at `tile` for `player`. `price` overrides the
    /// default of half the purchase price.
    pub fn sell_property(
        &mut self,
        player: PlayerId,
        tile: usize,
        price: Option<i64>,
    ) -> Result<SaleReceipt, GameError> {
        self.require_state(GameState::Playing)?;

        let receipt = transactions::sell(&mut self.board, &mut self.players, tile, player, price)?;
        self.emit(GameEvent::PropertySold {
            player,
            tile,
            price: receipt.price,
        });
        Ok(receipt)
    }

    /// Charge `player` rent for `tile`, outside of landing resolution.
    pub fn pay_rent(&mut self, player: PlayerId, tile: usize) -> Result<RentReceipt, GameError> {
        self.require_state(GameState::Playing)?;

        let receipt = match transactions::pay_rent(&self.board, &mut self.players, tile, player) {
            Ok(receipt) => receipt,
            Err(error) => {
                self.check_bankruptcy(player);
                return Err(error);
            }
        };

        if receipt.amount > 0 {
            self.emit(GameEvent::RentPaid {
                payer: player,
                receiver: receipt.owner,
                tile,
                rent: receipt.amount,
            });
        }

        self.check_bankruptcy(player);
        Ok(receipt)
    }

    // --- turn rotation ---

    /// End the current turn: reset the streak and rotate to the next
    /// non-bankrupt player, or end the game if none remains.
    pub fn end_turn(&mut self) -> Result<(), GameError> {
        self.require_state(GameState::Playing)?;

        if let Some(mv) = &self.pending_move {
            return Err(GameError::MoveInProgress(mv.player()));
        }

        let player = self.current_player_id();
        debug!(%player, "turn ended");
        self.emit(GameEvent::TurnEnded { player });

        self.dice.reset();
        self.auto = None;
        self.last_landing = None;
        self.advance_to_next_player();
        Ok(())
    }

    fn begin_turn(&mut self) {
        let player = self.current_player_id();
        if self.players[player].is_bankrupt() {
            self.advance_to_next_player();
            return;
        }

        debug!(%player, "turn started");
        self.emit(GameEvent::TurnStarted { player });

        self.auto = match self.players[player].kind() {
            PlayerKind::Automated => Some(AutoTurn::new(
                self.config.think_delay_ticks,
                self.config.post_move_delay_ticks,
            )),
            PlayerKind::Interactive => None,
        };
    }

    fn advance_to_next_player(&mut self) {
        if !self.has_active_players() {
            self.end_game(None);
            return;
        }

        let count = self.players.player_count();
        loop {
            self.current = (self.current + 1) % count;
            if !self.current_player().is_bankrupt() {
                break;
            }
        }

        self.begin_turn();
    }

    fn has_active_players(&self) -> bool {
        self.players.iter().any(|(_, p)| !p.is_bankrupt())
    }

    // --- bankruptcy and endgame ---

    /// React if `player` has gone bankrupt: announce it, force the turn
    /// over if it was theirs, and evaluate the win conditions.
    ///
    /// Safe to call on solvent players; does nothing then.
    pub fn check_bankruptcy(&mut self, player: PlayerId) {
        if self.state == GameState::GameOver {
            return;
        }
        if !self.players[player].is_bankrupt() {
            return;
        }

        warn!(%player, balance = self.players[player].money(), "player bankrupt");
        self.emit(GameEvent::PlayerBankrupt { player });

        if player == self.current_player_id()
            && self.state == GameState::Playing
            && self.pending_move.is_none()
        {
            if let Err(error) = self.end_turn() {
                warn!(%error, "failed to end bankrupt player's turn");
            }
        }

        self.evaluate_win_conditions();
    }

    /// Primary-player rules first, then the generic last-player rule.
    /// `end_game` is idempotent, so overlapping triggers are harmless.
    fn evaluate_win_conditions(&mut self) {
        if let Some(primary) = self.primary_player() {
            let primary_bankrupt = self.players[primary].is_bankrupt();
            let rivals_all_bankrupt = self
                .players
                .iter()
                .all(|(id, p)| id == primary || p.is_bankrupt());

            if primary_bankrupt {
                self.end_game(None);
            } else if rivals_all_bankrupt {
                self.end_game(Some(primary));
            }
        }

        let sole_active = {
            let mut active = self.players.iter().filter(|(_, p)| !p.is_bankrupt());
            match (active.next(), active.next()) {
                (Some((id, _)), None) => Some(id),
                _ => None,
            }
        };
        if let Some(player) = sole_active {
            self.end_game(Some(player));
        }
    }

    /// End the game. Idempotent: the first call wins, later calls are
    /// no-ops.
    ///
    /// With an explicit winner, that winner stands. With `None`, the
    /// non-bankrupt player with the highest total assets is chosen (ties
    /// go to the earlier roster position); if everyone is bankrupt there
    /// is no winner.
    pub fn end_game(&mut self, winner: Option<PlayerId>) {
        if self.state == GameState::GameOver {
            return;
        }

        let winner = winner.or_else(|| self.richest_active_player());

        self.state = GameState::GameOver;
        self.winner = winner;
        self.pending_move = None;
        self.auto = None;

        info!(?winner, "game over");
        self.emit(GameEvent::GameEnded { winner });
    }

    fn richest_active_player(&self) -> Option<PlayerId> {
        let mut best: Option<(PlayerId, i64)> = None;

        for (id, player) in self.players.iter() {
            if player.is_bankrupt() {
                continue;
            }
            let assets = player.total_assets(&self.board);
            if best.map_or(true, |(_, most)| assets > most) {
                best = Some((id, assets));
            }
        }

        best.map(|(id, _)| id)
    }

    // --- plumbing ---

    fn require_state(&self, required: GameState) -> Result<(), GameError> {
        if self.state == required {
            Ok(())
        } else {
            Err(GameError::WrongState {
                required,
                actual: self.state,
            })
        }
    }

    fn emit(&mut self, event: GameEvent) {
        self.events.emit(&event);
    }
}

impl std::fmt::Debug for Game {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Game")
            .field("state", &self.state)
            .field("current", &self.current)
            .field("players", &self.players.player_count())
            .field("board_size", &self.board.size())
            .field("winner", &self.winner)
            .finish_non_exhaustive()
    }
}
