//! The player account: money ledger, position, property set, bankruptcy.
//!
//! A player is exclusively owned by the simulation and mutated only
//! through these methods and the transaction functions. The ledger
//! policy worth reading twice: `debit` deducts unconditionally, and any
//! operation that leaves the balance negative flags bankruptcy: a
//! negative balance is the bankruptcy trigger, not an error state.

use im::HashSet as ImHashSet;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::board::Board;
use crate::core::{GameError, PlayerId, PlayerKind};

/// One player's complete rule-relevant state.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Player {
    id: PlayerId,
    name: String,
    kind: PlayerKind,
    money: i64,
    position: usize,
    bankrupt: bool,
    /// Owned property tile indices. Persistent set: cheap to clone,
    /// idempotent add/remove.
    properties: ImHashSet<usize>,
    moving: bool,
}

impl Player {
    /// Create a player at the start position with the given bankroll.
    #[must_use]
    pub fn new(id: PlayerId, name: impl Into<String>, kind: PlayerKind, money: i64) -> Self {
        Self {
            id,
            name: name.into(),
            kind,
            money,
            position: 0,
            bankrupt: false,
            properties: ImHashSet::new(),
            moving: false,
        }
    }

    #[must_use]
    pub fn id(&self) -> PlayerId {
        self.id
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn kind(&self) -> PlayerKind {
        self.kind
    }

    /// Current balance. May be negative once bankruptcy has triggered.
    #[must_use]
    pub fn money(&self) -> i64 {
        self.money
    }

    /// Current tile index.
    #[must_use]
    pub fn position(&self) -> usize {
        self.position
    }

    #[must_use]
    pub fn is_bankrupt(&self) -> bool {
        self.bankrupt
    }

    /// Whether a staged move is in flight for this player.
    #[must_use]
    pub fn is_moving(&self) -> bool {
        self.moving
    }

    /// Owned property tile indices.
    #[must_use]
    pub fn properties(&self) -> &ImHashSet<usize> {
        &self.properties
    }

    /// Whether the balance covers `amount`.
    #[must_use]
    pub fn has_enough_money(&self, amount: i64) -> bool {
        self.money >= amount
    }

    /// Add money. Rejects negative amounts, otherwise unconditional.
    pub fn credit(&mut self, amount: i64) -> Result<(), GameError> {
        if amount < 0 {
            warn!(player = %self.id, amount, "rejected negative credit");
            return Err(GameError::NegativeAmount(amount));
        }

        self.money += amount;
        Ok(())
    }

    /// Deduct money, unconditionally.
    ///
    /// If the resulting balance is negative the player is flagged
    /// bankrupt and `InsufficientFunds` is returned. The deduction
    /// stands either way; callers deciding between "charge" and
    /// "refuse" must check `has_enough_money` first (purchase does,
    /// rent deliberately does not).
    pub fn debit(&mut self, amount: i64) -> Result<(), GameError> {
        if amount < 0 {
            warn!(player = %self.id, amount, "rejected negative debit");
            return Err(GameError::NegativeAmount(amount));
        }

        self.money -= amount;

        if self.money < 0 {
            self.bankrupt = true;
            warn!(player = %self.id, balance = self.money, "balance negative, player bankrupt");
            return Err(GameError::InsufficientFunds {
                player: self.id,
                amount,
            });
        }

        Ok(())
    }

    /// Register an owned property. Idempotent.
    pub fn add_property(&mut self, tile: usize) {
        self.properties.insert(tile);
    }

    /// Deregister an owned property. Idempotent.
    pub fn remove_property(&mut self, tile: usize) {
        self.properties.remove(&tile);
    }

    /// Money plus the sum of purchase prices over owned properties.
    ///
    /// Literal valuation: purchase price, not sale or rent value.
    #[must_use]
    pub fn total_assets(&self, board: &Board) -> i64 {
        let property_value: i64 = self
            .properties
            .iter()
            .filter_map(|&tile| board.property(tile).ok())
            .map(|p| p.price())
            .sum();

        self.money + property_value
    }

    pub(crate) fn set_position(&mut self, position: usize) {
        debug!(player = %self.id, position, "position committed");
        self.position = position;
    }

    pub(crate) fn set_moving(&mut self, moving: bool) {
        self.moving = moving;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn player(money: i64) -> Player {
        Player::new(PlayerId::new(0), "Tester", PlayerKind::Interactive, money)
    }

    #[test]
    fn test_new_player() {
        let p = player(1500);

        assert_eq!(p.money(), 1500);
        assert_eq!(p.position(), 0);
        assert!(!p.is_bankrupt());
        assert!(!p.is_moving());
        assert!(p.properties().is_empty());
    }

    #[test]
    fn test_credit() {
        let mut p = player(100);

        assert!(p.credit(50).is_ok());
        assert_eq!(p.money(), 150);

        assert_eq!(p.credit(-1), Err(GameError::NegativeAmount(-1)));
        assert_eq!(p.money(), 150);
    }

    #[test]
    fn test_debit_sufficient() {
        let mut p = player(100);

        assert!(p.debit(60).is_ok());
        assert_eq!(p.money(), 40);
        assert!(!p.is_bankrupt());
    }

    #[test]
    fn test_debit_insufficient_goes_negative_and_bankrupts() {
        let mut p = player(100);

        let err = p.debit(150).unwrap_err();
        assert!(matches!(err, GameError::InsufficientFunds { .. }));
        assert_eq!(p.money(), -50);
        assert!(p.is_bankrupt());
        assert!(!p.has_enough_money(1));
    }

    #[test]
    fn test_debit_on_already_negative_balance() {
        let mut p = player(10);
        let _ = p.debit(30);
        assert_eq!(p.money(), -20);

        // Even a coverable-looking amount keeps the balance negative
        // and re-flags bankruptcy.
        let err = p.debit(0).unwrap_err();
        assert!(matches!(err, GameError::InsufficientFunds { .. }));
        assert!(p.is_bankrupt());
    }

    #[test]
    fn test_debit_negative_amount_rejected() {
        let mut p = player(100);

        assert_eq!(p.debit(-5), Err(GameError::NegativeAmount(-5)));
        assert_eq!(p.money(), 100);
        assert!(!p.is_bankrupt());
    }

    #[test]
    fn test_property_set_idempotent() {
        let mut p = player(0);

        p.add_property(5);
        p.add_property(5);
        assert_eq!(p.properties().len(), 1);

        p.remove_property(5);
        p.remove_property(5);
        assert!(p.properties().is_empty());
    }

    #[test]
    fn test_total_assets_uses_purchase_price() {
        let board = Board::new(40);
        let mut p = player(300);

        p.add_property(1); // price 150
        p.add_property(7); // price 450

        assert_eq!(p.total_assets(&board), 300 + 150 + 450);
    }

    #[test]
    fn test_total_assets_with_negative_balance() {
        let board = Board::new(40);
        let mut p = player(10);
        let _ = p.debit(60);
        p.add_property(1); // price 150

        assert_eq!(p.total_assets(&board), -50 + 150);
    }
}
