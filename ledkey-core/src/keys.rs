//! Key scan snapshot and edge detection

use portable_atomic::{AtomicU32, Ordering};

use crate::protocol::SCAN_BYTES;

/// Last complete key scan
///
/// Written once per finished key read, as a single word, so readers
/// never see bytes from two different scans. On targets without native
/// 32-bit atomics, `portable-atomic` routes the store through the
/// critical section.
pub struct KeySnapshot {
    word: AtomicU32,
}

impl Default for KeySnapshot {
    fn default() -> Self {
        Self::new()
    }
}

impl KeySnapshot {
    /// No keys pressed
    pub const fn new() -> Self {
        Self {
            word: AtomicU32::new(0),
        }
    }

    /// Replace the snapshot with a complete scan
    ///
    /// Scan byte `i` lands in bits `8i..8i+7`.
    pub fn publish(&self, scan: [u8; SCAN_BYTES]) {
        self.word.store(u32::from_le_bytes(scan), Ordering::Release);
    }

    /// Current key word
    pub fn get(&self) -> u32 {
        self.word.load(Ordering::Acquire)
    }

    /// Forget any pressed keys
    pub fn clear(&self) {
        self.word.store(0, Ordering::Release);
    }
}

/// Turns successive snapshots into key-down edges
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct KeyTracker {
    last: u32,
}

impl KeyTracker {
    /// Tracker that assumes no keys were held
    pub const fn new() -> Self {
        Self { last: 0 }
    }

    /// Feed a new snapshot; returns the keys that went down since the last call
    pub fn update(&mut self, keys: u32) -> u32 {
        let pressed = (self.last ^ keys) & keys;
        self.last = keys;
        pressed
    }

    /// Keys held in the last snapshot
    pub fn held(&self) -> u32 {
        self.last
    }
}
