//! Property transactions: purchase, rent, sale.
//!
//! Each transaction validates everything it can before touching any
//! ledger or ownership state, so failures are all-or-nothing. The one
//! deliberate exception is rent: the payer is debited through the
//! unconditional `debit` path, so an unaffordable rent drives the
//! payer's balance negative (flagging bankruptcy) while the owner is
//! credited nothing.

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::board::Board;
use crate::core::{GameError, PlayerId, PlayerMap};

use super::Player;

/// Successful purchase summary.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PurchaseReceipt {
    pub tile: usize,
    pub buyer: PlayerId,
    pub price: i64,
}

/// Successful rent resolution. `amount` is 0 when the payer owns the
/// property (landing on your own tile is a free no-op).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RentReceipt {
    pub tile: usize,
    pub payer: PlayerId,
    pub owner: PlayerId,
    pub amount: i64,
}

/// Successful sale summary.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SaleReceipt {
    pub tile: usize,
    pub seller: PlayerId,
    pub price: i64,
}

/// Buy the property at `tile` for `buyer`.
///
/// Fails without any mutation if the tile is not a property, is already
/// owned, or the buyer cannot afford the listed price.
pub fn purchase(
    board: &mut Board,
    players: &mut PlayerMap<Player>,
    tile: usize,
    buyer: PlayerId,
) -> Result<PurchaseReceipt, GameError> {
    let property = board.property(tile)?;

    if let Some(owner) = property.owner() {
        warn!(%buyer, tile, %owner, "purchase rejected: already owned");
        return Err(GameError::AlreadyOwned { tile, owner });
    }

    let price = property.price();
    if !players[buyer].has_enough_money(price) {
        warn!(%buyer, tile, price, "purchase rejected: insufficient funds");
        return Err(GameError::InsufficientFunds {
            player: buyer,
            amount: price,
        });
    }

    // Affordability was checked above, so the debit cannot go negative.
    players[buyer].debit(price)?;
    players[buyer].add_property(tile);
    board.property_mut(tile)?.set_owner(Some(buyer));

    debug!(%buyer, tile, price, "property purchased");
    Ok(PurchaseReceipt { tile, buyer, price })
}

/// Resolve rent for `payer` landing on `tile`.
///
/// Owner landing on their own property succeeds with zero money
/// movement. Otherwise the payer is debited the flat rent, possibly
/// into a negative balance, and the owner is credited only if the
/// debit succeeded.
pub fn pay_rent(
    board: &Board,
    players: &mut PlayerMap<Player>,
    tile: usize,
    payer: PlayerId,
) -> Result<RentReceipt, GameError> {
    let property = board.property(tile)?;
    let owner = property.owner().ok_or_else(|| {
        warn!(%payer, tile, "rent rejected: property unowned");
        GameError::Unowned(tile)
    })?;

    if owner == payer {
        debug!(%payer, tile, "own property, no rent due");
        return Ok(RentReceipt {
            tile,
            payer,
            owner,
            amount: 0,
        });
    }

    let rent = property.rent();
    let (paying, receiving) = players.pair_mut(payer, owner);

    paying.debit(rent)?;
    receiving.credit(rent)?;

    debug!(%payer, %owner, tile, rent, "rent paid");
    Ok(RentReceipt {
        tile,
        payer,
        owner,
        amount: rent,
    })
}

/// Sell the property at `tile` for `seller`.
///
/// Fails if the property is unowned or the seller is not the owner.
/// `price` overrides the default sale price of purchase price / 2
/// (integer division).
pub fn sell(
    board: &mut Board,
    players: &mut PlayerMap<Player>,
    tile: usize,
    seller: PlayerId,
    price: Option<i64>,
) -> Result<SaleReceipt, GameError> {
    let property = board.property(tile)?;
    let owner = property.owner().ok_or_else(|| {
        warn!(%seller, tile, "sale rejected: property unowned");
        GameError::Unowned(tile)
    })?;

    if owner != seller {
        warn!(%seller, tile, %owner, "sale rejected: not the owner");
        return Err(GameError::NotTheOwner {
            player: seller,
            tile,
        });
    }

    let sale_price = price.unwrap_or(property.price() / 2);
    if sale_price < 0 {
        warn!(%seller, tile, sale_price, "sale rejected: negative price");
        return Err(GameError::NegativeAmount(sale_price));
    }

    players[seller].credit(sale_price)?;
    players[seller].remove_property(tile);
    board.property_mut(tile)?.set_owner(None);

    debug!(%seller, tile, sale_price, "property sold");
    Ok(SaleReceipt {
        tile,
        seller,
        price: sale_price,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::PlayerKind;

    fn setup(money: i64) -> (Board, PlayerMap<Player>) {
        let board = Board::new(40);
        let players = PlayerMap::new(2, |id| {
            Player::new(id, format!("Player {}", id.0), PlayerKind::Interactive, money)
        });
        (board, players)
    }

    const P0: PlayerId = PlayerId::new(0);
    const P1: PlayerId = PlayerId::new(1);

    #[test]
    fn test_purchase_success() {
        let (mut board, mut players) = setup(1500);

        let receipt = purchase(&mut board, &mut players, 7, P0).unwrap();
        assert_eq!(receipt.price, 450);
        assert_eq!(players[P0].money(), 1050);
        assert!(players[P0].properties().contains(&7));
        assert_eq!(board.property(7).unwrap().owner(), Some(P0));
    }

    #[test]
    fn test_purchase_already_owned() {
        let (mut board, mut players) = setup(1500);
        purchase(&mut board, &mut players, 7, P0).unwrap();

        let err = purchase(&mut board, &mut players, 7, P1).unwrap_err();
        assert_eq!(err, GameError::AlreadyOwned { tile: 7, owner: P0 });
        // No partial mutation
        assert_eq!(players[P1].money(), 1500);
        assert!(players[P1].properties().is_empty());
    }

    #[test]
    fn test_purchase_insufficient_funds_is_all_or_nothing() {
        let (mut board, mut players) = setup(100);

        let err = purchase(&mut board, &mut players, 7, P0).unwrap_err();
        assert!(matches!(err, GameError::InsufficientFunds { .. }));
        assert_eq!(players[P0].money(), 100);
        assert!(!players[P0].is_bankrupt());
        assert!(!board.property(7).unwrap().is_owned());
    }

    #[test]
    fn test_purchase_not_a_property() {
        let (mut board, mut players) = setup(1500);

        assert_eq!(
            purchase(&mut board, &mut players, 10, P0),
            Err(GameError::NotAProperty(10))
        );
    }

    #[test]
    fn test_rent_to_owner() {
        let (mut board, mut players) = setup(1500);
        purchase(&mut board, &mut players, 7, P0).unwrap();

        let receipt = pay_rent(&board, &mut players, 7, P1).unwrap();
        assert_eq!(receipt.amount, 45);
        assert_eq!(players[P1].money(), 1455);
        assert_eq!(players[P0].money(), 1050 + 45);
    }

    #[test]
    fn test_rent_on_own_property_is_free() {
        let (mut board, mut players) = setup(1500);
        purchase(&mut board, &mut players, 7, P0).unwrap();
        let before = players[P0].money();

        let receipt = pay_rent(&board, &mut players, 7, P0).unwrap();
        assert_eq!(receipt.amount, 0);
        assert_eq!(players[P0].money(), before);
    }

    #[test]
    fn test_rent_unowned() {
        let (board, mut players) = setup(1500);

        assert_eq!(
            pay_rent(&board, &mut players, 7, P0),
            Err(GameError::Unowned(7))
        );
    }

    #[test]
    fn test_unaffordable_rent_drives_payer_negative() {
        let (mut board, mut players) = setup(1500);
        purchase(&mut board, &mut players, 7, P0).unwrap();

        // Leave P1 with less than the rent of 45.
        players[P1].debit(1460).unwrap();
        assert_eq!(players[P1].money(), 40);
        let owner_before = players[P0].money();

        let err = pay_rent(&board, &mut players, 7, P1).unwrap_err();
        assert!(matches!(err, GameError::InsufficientFunds { .. }));
        assert_eq!(players[P1].money(), -5);
        assert!(players[P1].is_bankrupt());
        // Owner credited nothing on the failed payment.
        assert_eq!(players[P0].money(), owner_before);
    }

    #[test]
    fn test_sell_default_price() {
        let (mut board, mut players) = setup(1500);
        purchase(&mut board, &mut players, 7, P0).unwrap();

        let receipt = sell(&mut board, &mut players, 7, P0, None).unwrap();
        assert_eq!(receipt.price, 225); // 450 / 2

        assert_eq!(players[P0].money(), 1500 - 450 + 225);
        assert!(players[P0].properties().is_empty());
        assert!(!board.property(7).unwrap().is_owned());
    }

    #[test]
    fn test_sell_custom_price() {
        let (mut board, mut players) = setup(1500);
        purchase(&mut board, &mut players, 7, P0).unwrap();

        let receipt = sell(&mut board, &mut players, 7, P0, Some(400)).unwrap();
        assert_eq!(receipt.price, 400);
        assert_eq!(players[P0].money(), 1500 - 450 + 400);
    }

    #[test]
    fn test_sell_not_the_owner() {
        let (mut board, mut players) = setup(1500);
        purchase(&mut board, &mut players, 7, P0).unwrap();

        let err = sell(&mut board, &mut players, 7, P1, None).unwrap_err();
        assert_eq!(err, GameError::NotTheOwner { player: P1, tile: 7 });
        assert_eq!(board.property(7).unwrap().owner(), Some(P0));
    }

    #[test]
    fn test_sell_unowned() {
        let (mut board, mut players) = setup(1500);

        assert_eq!(
            sell(&mut board, &mut players, 7, P0, None),
            Err(GameError::Unowned(7))
        );
    }

    #[test]
    fn test_odd_price_sale_uses_integer_division() {
        // Price 150 at index 1: default sale yields 75; price 250 at
        // index 3 yields 125. Integer division applies to odd halves:
        // a custom board would floor, the default prices are even-half.
        let (mut board, mut players) = setup(1500);
        purchase(&mut board, &mut players, 3, P0).unwrap();

        let receipt = sell(&mut board, &mut players, 3, P0, None).unwrap();
        assert_eq!(receipt.price, board.property(3).unwrap().price() / 2);
    }
}
