//! Hardware driver implementations
//!
//! This crate provides concrete implementations of the traits defined
//! in ledkey-core on top of `embedded-hal` and `ledkey-hal`:
//!
//! - Strobed panel bus (TM1638 transport)
//! - Servo pulse output

#![no_std]
#![deny(unsafe_code)]

pub mod bus;
pub mod servo;
