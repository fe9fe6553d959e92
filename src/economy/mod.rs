//! Money, ownership, and the transactions that move both.
//!
//! No component outside this module (and the turn controller driving
//! it) mutates player money, position, or property ownership.

pub mod account;
pub mod transactions;

pub use account::Player;
pub use transactions::{pay_rent, purchase, sell, PurchaseReceipt, RentReceipt, SaleReceipt};
