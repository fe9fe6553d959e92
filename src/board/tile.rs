//! Board tiles.
//!
//! Tiles are a closed tagged variant rather than a type hierarchy: every
//! landing effect is an exhaustive match over `TileKind`, so adding a
//! kind is a compile error until every dispatch site handles it.

use serde::{Deserialize, Serialize};

use crate::core::PlayerId;

/// What a tile is, and the data that comes with it.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum TileKind {
    /// Index 0. Passing it (wrapping the ring) pays the pass-start bonus.
    Start,
    /// Just visiting; landing here has no effect.
    Jail,
    /// Landing here has no automatic effect. The relocation rule is the
    /// triple double, not this tile.
    GoToJail,
    /// Landing here has no effect.
    FreeParking,
    /// A purchasable property.
    Property(PropertyTile),
}

/// Purchasable property state.
///
/// Price and rent are fixed at board construction; only `owner` mutates.
/// The owner is a back-reference by ID; the player owns the relationship.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PropertyTile {
    price: i64,
    base_rent: i64,
    owner: Option<PlayerId>,
}

impl PropertyTile {
    /// Create an unowned property.
    #[must_use]
    pub fn new(price: i64, base_rent: i64) -> Self {
        Self {
            price,
            base_rent,
            owner: None,
        }
    }

    /// Purchase price.
    #[must_use]
    pub fn price(&self) -> i64 {
        self.price
    }

    /// Flat rent charged to non-owners who land here.
    ///
    /// Rent scaling by improvements is an unimplemented extension point;
    /// today this is always `base_rent`.
    #[must_use]
    pub fn rent(&self) -> i64 {
        self.base_rent
    }

    /// Current owner, if any.
    #[must_use]
    pub fn owner(&self) -> Option<PlayerId> {
        self.owner
    }

    /// Whether the property has an owner.
    #[must_use]
    pub fn is_owned(&self) -> bool {
        self.owner.is_some()
    }

    pub(crate) fn set_owner(&mut self, owner: Option<PlayerId>) {
        self.owner = owner;
    }
}

/// One tile on the ring. Immutable after board construction apart from
/// property ownership.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tile {
    index: usize,
    name: String,
    kind: TileKind,
}

impl Tile {
    /// Create a tile.
    pub fn new(index: usize, name: impl Into<String>, kind: TileKind) -> Self {
        Self {
            index,
            name: name.into(),
            kind,
        }
    }

    /// Position on the ring.
    #[must_use]
    pub fn index(&self) -> usize {
        self.index
    }

    /// Display name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Tile kind and payload.
    #[must_use]
    pub fn kind(&self) -> &TileKind {
        &self.kind
    }

    /// The property payload, if this tile is a property.
    #[must_use]
    pub fn as_property(&self) -> Option<&PropertyTile> {
        match &self.kind {
            TileKind::Property(p) => Some(p),
            _ => None,
        }
    }

    pub(crate) fn as_property_mut(&mut self) -> Option<&mut PropertyTile> {
        match &mut self.kind {
            TileKind::Property(p) => Some(p),
            _ => None,
        }
    }
}
