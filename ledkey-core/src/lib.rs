//! Board-agnostic core logic for the LED&KEY panel firmware
//!
//! This crate contains everything that does not depend on a specific
//! microcontroller:
//!
//! - Bus transport trait the command engine drives
//! - Command arbiter and per-command transfer state machine
//! - Transposed segment framebuffer and key snapshot
//! - Refresh scheduling glue and a deadline timer queue
//! - The pulse dial application logic
//!
//! # Architecture
//!
//! ```text
//!  background context              completion interrupt
//!  ──────────────────              ────────────────────
//!  Panel::request(kind) ──┐    ┌── Panel::on_transfer_complete()
//!                         ▼    ▼
//!               ┌──────────────────────┐
//!               │ critical section     │
//!               │  Arbiter             │
//!               │   RequestSet + Slot  │──► Transfer ──► Transport
//!               └──────────────────────┘        │
//!                                               ├─ reads SegmentFramebuffer
//!                                               ├─ reads DisplayControl
//!                                               └─ stores KeySnapshot
//! ```

#![no_std]
#![deny(unsafe_code)]

pub mod arbiter;
pub mod command;
pub mod config;
pub mod dial;
pub mod framebuffer;
pub mod keys;
pub mod panel;
pub mod protocol;
pub mod refresh;
pub mod timer;
pub mod traits;
pub mod transfer;

pub use command::{CommandKind, RequestSet};
pub use config::{ConfigError, DisplayControl, PanelConfig};
pub use dial::PulseDial;
pub use framebuffer::SegmentFramebuffer;
pub use keys::{KeySnapshot, KeyTracker};
pub use panel::Panel;
pub use refresh::{RefreshScheduler, RefreshTask};
pub use timer::{TimerError, TimerId, TimerQueue};
pub use traits::{BusMode, Transport};
