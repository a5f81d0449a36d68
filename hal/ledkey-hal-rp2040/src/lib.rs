//! RP2040-specific HAL for the LED&KEY panel firmware
//!
//! This crate provides RP2040 implementations of the `ledkey-hal` traits:
//!
//! - SPI0 as an interrupt-driven byte shifter
//! - DIO turnaround through the GPIO output-enable override
//! - PWM slice setup for a 50 Hz servo frame

#![no_std]

pub mod dio;
pub mod servo;
pub mod spi;

pub use dio::DioLine;
pub use spi::SpiShifter;
