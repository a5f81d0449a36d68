//! Command arbiter
//!
//! Owns the pending [`RequestSet`] and the single in-flight [`Slot`]. Both
//! contexts reach it only through `Panel`, which holds it inside a
//! critical section, so every method here runs with the completion event
//! masked.
//!
//! When a command finishes, [`Arbiter::complete`] releases the bus and
//! starts the next pending command before returning. Consecutive commands
//! are chained from inside the event handler with no round trip through
//! the background context.

use crate::command::{CommandKind, RequestSet};
use crate::traits::Transport;
use crate::transfer::{Progress, Resources, Transfer};

/// In-flight command slot
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Slot {
    /// Bus free
    #[default]
    Idle,
    /// A command owns the bus
    Active(Transfer),
}

/// Command arbiter for one panel bus
pub struct Arbiter<T> {
    /// Attached transport; requests made before attach stay pending
    bus: Option<T>,
    requested: RequestSet,
    slot: Slot,
}

impl<T> Default for Arbiter<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Arbiter<T> {
    /// Arbiter with no transport and nothing pending
    pub const fn new() -> Self {
        Self {
            bus: None,
            requested: RequestSet::new(),
            slot: Slot::Idle,
        }
    }

    /// Commands requested but not started
    pub fn pending(&self) -> RequestSet {
        self.requested
    }

    /// Command currently on the bus
    pub fn active(&self) -> Option<CommandKind> {
        match &self.slot {
            Slot::Idle => None,
            Slot::Active(transfer) => Some(transfer.kind()),
        }
    }

    /// Check if the bus is free
    pub fn is_idle(&self) -> bool {
        matches!(self.slot, Slot::Idle)
    }

}

impl<T: Transport> Arbiter<T> {
    /// Install `bus` and start any command requested before it
    ///
    /// A command cut short on the previous transport is dropped after its
    /// strobe is released. Returns the previous transport.
    pub fn attach(&mut self, bus: T, res: &Resources<'_>) -> Option<T> {
        let mut previous = self.bus.replace(bus);
        if let (Slot::Active(_), Some(old)) = (&self.slot, previous.as_mut()) {
            old.listen(false);
            old.deselect();
        }
        self.slot = Slot::Idle;
        self.dispatch(res);
        previous
    }

    /// Mark `kind` requested and start it if the bus is free
    ///
    /// Requests for a kind already pending or already in flight coalesce
    /// into the one that will run.
    pub fn request(&mut self, kind: CommandKind, res: &Resources<'_>) {
        if self.active() == Some(kind) {
            return;
        }
        self.requested.insert(kind);
        if self.is_idle() {
            self.dispatch(res);
        }
    }

    /// Handle one completion event
    ///
    /// Only the completion handler calls this.
    pub fn complete(&mut self, res: &Resources<'_>) {
        let Self { bus, slot, .. } = self;
        let Some(bus) = bus.as_mut() else {
            return;
        };

        let progress = match slot {
            Slot::Active(transfer) => transfer.advance(bus, res),
            Slot::Idle => {
                // Stray event with nothing in flight
                bus.acknowledge();
                bus.listen(false);
                return;
            }
        };

        if progress == Progress::Finished {
            // Frame must close before the next command selects the chip
            bus.deselect();
            *slot = Slot::Idle;
            self.dispatch(res);
        }
    }

    /// Start the highest-priority pending command, or go quiet
    fn dispatch(&mut self, res: &Resources<'_>) {
        let Some(bus) = self.bus.as_mut() else {
            return;
        };

        match self.requested.take_next() {
            Some(kind) => self.slot = Slot::Active(Transfer::begin(kind, bus, res)),
            None => bus.listen(false),
        }
    }
}
