//! Hardware abstraction traits
//!
//! These traits define the interface between the command engine and
//! hardware-specific implementations.

pub mod transport;

pub use transport::{BusMode, Transport};
