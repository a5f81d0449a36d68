//! Panel bus implementations

pub mod strobed;

pub use strobed::{StrobedBus, DEFAULT_SETTLE_US};
