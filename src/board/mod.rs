//! Fixed-size position ring and tile registry.
//!
//! All position arithmetic lives here: wraparound movement, the
//! pass-start test, and forward distances. The registry is fixed at
//! construction; the engine never loads tiles from assets or files.
//!
//! ## Pass-start policy
//!
//! A move "passes start" exactly when the destination index is
//! numerically smaller than the origin index within the same move. That
//! accounts for exactly one wrap, never more, even when the step count
//! is a full lap or longer. This is deliberate, literal behavior.

pub mod tile;

use serde::{Deserialize, Serialize};

use crate::core::GameError;

pub use tile::{PropertyTile, Tile, TileKind};

/// The board: a ring of tiles indexed `0..size`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Board {
    tiles: Vec<Tile>,
}

impl Board {
    /// Build the default registry for a ring of `size` tiles.
    ///
    /// Index 0 is Start, 10 Jail, 20 Free Parking, 30 Go To Jail; every
    /// other index is a property with `price = 100 + (index % 10) * 50`
    /// and `base_rent = price / 10`. The formulas are deterministic so
    /// scripted scenarios reproduce exactly.
    #[must_use]
    pub fn new(size: usize) -> Self {
        assert!(size > 0, "Board must have at least 1 tile");

        let tiles = (0..size)
            .map(|index| match index {
                0 => Tile::new(index, "Start", TileKind::Start),
                10 => Tile::new(index, "Jail", TileKind::Jail),
                20 => Tile::new(index, "Free Parking", TileKind::FreeParking),
                30 => Tile::new(index, "Go To Jail", TileKind::GoToJail),
                _ => {
                    let price = 100 + (index as i64 % 10) * 50;
                    Tile::new(
                        index,
                        format!("Property {}", index),
                        TileKind::Property(PropertyTile::new(price, price / 10)),
                    )
                }
            })
            .collect();

        Self { tiles }
    }

    /// Build a board from already-constructed tiles.
    ///
    /// This is the seam for callers that assemble their own layout; the
    /// engine treats the tile list as authoritative.
    ///
    /// ## Panics
    ///
    /// Panics if `tiles` is empty or tile indices do not match positions.
    #[must_use]
    pub fn with_tiles(tiles: Vec<Tile>) -> Self {
        assert!(!tiles.is_empty(), "Board must have at least 1 tile");
        for (position, tile) in tiles.iter().enumerate() {
            assert_eq!(tile.index(), position, "Tile index must match its position");
        }
        Self { tiles }
    }

    /// Number of tiles on the ring.
    #[must_use]
    pub fn size(&self) -> usize {
        self.tiles.len()
    }

    /// Get a tile by index.
    #[must_use]
    pub fn tile(&self, index: usize) -> Option<&Tile> {
        self.tiles.get(index)
    }

    /// All tiles in ring order.
    #[must_use]
    pub fn tiles(&self) -> &[Tile] {
        &self.tiles
    }

    /// Get the property payload at `index`, or a typed error if the
    /// index is out of range or the tile is not a property.
    pub fn property(&self, index: usize) -> Result<&PropertyTile, GameError> {
        self.tiles
            .get(index)
            .ok_or(GameError::NoSuchTile(index))?
            .as_property()
            .ok_or(GameError::NotAProperty(index))
    }

    pub(crate) fn property_mut(&mut self, index: usize) -> Result<&mut PropertyTile, GameError> {
        self.tiles
            .get_mut(index)
            .ok_or(GameError::NoSuchTile(index))?
            .as_property_mut()
            .ok_or(GameError::NotAProperty(index))
    }

    /// Destination of a move of `steps` from `pos`, with wraparound.
    ///
    /// ## Panics
    ///
    /// Panics if `steps` is negative. Callers that take untrusted step
    /// counts reject them with `NegativeSteps` before arriving here.
    #[must_use]
    pub fn new_position(&self, pos: usize, steps: i32) -> usize {
        assert!(steps >= 0, "Steps must not be negative");
        (pos + steps as usize) % self.size()
    }

    /// Whether a move from `from` to `to` passed start.
    ///
    /// Literal single-wrap policy: true exactly when `to < from`.
    #[must_use]
    pub fn passes_start(&self, from: usize, to: usize) -> bool {
        to < from
    }

    /// Forward distance from `from` to `to`, with wraparound.
    #[must_use]
    pub fn steps_between(&self, from: usize, to: usize) -> usize {
        (to + self.size() - from) % self.size()
    }

    /// Whether `pos` is a valid position on this board.
    #[must_use]
    pub fn contains(&self, pos: usize) -> bool {
        pos < self.size()
    }
}
