//! LED&KEY Hardware Abstraction Layer
//!
//! Traits a chip-specific HAL implements so the generic panel bus in
//! `ledkey-drivers` can run on it.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │  ledkey-firmware                        │
//! └─────────────────────────────────────────┘
//!                     │
//!                     ▼
//! ┌─────────────────────────────────────────┐
//! │  ledkey-drivers::StrobedBus             │
//! └─────────────────────────────────────────┘
//!                     │
//!                     ▼
//! ┌─────────────────────────────────────────┐
//! │  ledkey-hal (this crate - traits)       │
//! └─────────────────────────────────────────┘
//!                     │
//!                     ▼
//! ┌─────────────────────────────────────────┐
//! │  ledkey-hal-rp2040                      │
//! └─────────────────────────────────────────┘
//! ```
//!
//! # Traits
//!
//! - [`spi::ByteShifter`] - Interrupt-driven single-byte shift register
//! - [`gpio::DataLine`] - Direction control of the shared data pin

#![no_std]
#![deny(unsafe_code)]

pub mod gpio;
pub mod spi;

pub use gpio::{DataLine, Direction};
pub use spi::{BitOrder, ByteShifter, Mode, Phase, Polarity, SpiConfig};
