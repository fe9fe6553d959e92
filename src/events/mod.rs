//! Typed notification channel and presentation seams.
//!
//! The engine reports everything that happens through `GameEvent`s
//! pushed to an explicit subscriber list. Delivery is synchronous,
//! best-effort, fire-and-forget: the engine never blocks on a
//! subscriber and functions correctly with zero subscribers.
//!
//! `VisualSync` is the other seam: a hook invoked after every committed
//! position change so a presentation layer can track pieces. Headless
//! operation uses the no-op implementation.

use serde::{Deserialize, Serialize};
use std::cell::RefCell;
use std::rc::Rc;
use tracing::debug;

use crate::core::PlayerId;

/// Everything the engine announces to the outside world.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameEvent {
    TurnStarted { player: PlayerId },
    TurnEnded { player: PlayerId },
    PlayerMoved { player: PlayerId, from: usize, to: usize },
    PlayerBankrupt { player: PlayerId },
    GameEnded { winner: Option<PlayerId> },
    PropertyPurchased { player: PlayerId, tile: usize },
    PropertySold { player: PlayerId, tile: usize, price: i64 },
    RentPaid { payer: PlayerId, receiver: PlayerId, tile: usize, rent: i64 },
    DiceRolled { die1: i32, die2: i32, total: i32, is_double: bool },
    TripleDouble { player: PlayerId },
}

/// A notification subscriber.
pub trait EventSink {
    fn on_event(&mut self, event: &GameEvent);
}

/// Explicit subscription list.
///
/// Single logical thread: subscribers run inline on the emitting call,
/// in subscription order.
#[derive(Default)]
pub struct EventBus {
    sinks: Vec<Box<dyn EventSink>>,
}

impl EventBus {
    /// Create an empty bus.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a subscriber.
    pub fn subscribe(&mut self, sink: Box<dyn EventSink>) {
        self.sinks.push(sink);
    }

    /// Number of subscribers.
    #[must_use]
    pub fn subscriber_count(&self) -> usize {
        self.sinks.len()
    }

    /// Deliver an event to every subscriber.
    pub fn emit(&mut self, event: &GameEvent) {
        debug!(?event, "event");
        for sink in &mut self.sinks {
            sink.on_event(event);
        }
    }
}

impl std::fmt::Debug for EventBus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventBus")
            .field("subscribers", &self.sinks.len())
            .finish()
    }
}

/// Recording sink: a cloneable handle to an in-memory event list.
///
/// Clone one handle into the bus and keep the other to inspect what the
/// engine emitted. Intended for tests and headless drivers.
#[derive(Clone, Debug, Default)]
pub struct EventLog {
    events: Rc<RefCell<Vec<GameEvent>>>,
}

impl EventLog {
    /// Create an empty log.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of every recorded event, in emission order.
    #[must_use]
    pub fn events(&self) -> Vec<GameEvent> {
        self.events.borrow().clone()
    }

    /// Number of recorded events.
    #[must_use]
    pub fn len(&self) -> usize {
        self.events.borrow().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.events.borrow().is_empty()
    }

    /// Drop all recorded events.
    pub fn clear(&self) {
        self.events.borrow_mut().clear();
    }
}

impl EventSink for EventLog {
    fn on_event(&mut self, event: &GameEvent) {
        self.events.borrow_mut().push(event.clone());
    }
}

/// Presentation hook invoked after every committed position change.
pub trait VisualSync {
    fn update_visual_position(&mut self, player: PlayerId, position: usize);
}

/// Headless operation: position changes go nowhere.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoopVisualSync;

impl VisualSync for NoopVisualSync {
    fn update_visual_position(&mut self, _player: PlayerId, _position: usize) {}
}
