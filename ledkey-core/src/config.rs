//! Display configuration and panel settings
//!
//! [`DisplayControl`] is the live on/off + brightness state sent by a
//! config write. [`PanelConfig`] holds the startup settings the firmware
//! reads from its configuration file.

use portable_atomic::{AtomicU8, Ordering};

use crate::protocol::{display_command, DISPLAY_BRIGHT, DISPLAY_ON, MAX_BRIGHTNESS};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Default brightness: half of the maximum
pub const DEFAULT_BRIGHTNESS: u8 = MAX_BRIGHTNESS / 2;

/// Longest refresh interval accepted, in milliseconds
pub const MAX_INTERVAL_MS: u32 = 60_000;

/// Live display control state
///
/// Stored as the display command byte itself so the completion handler
/// reads it with a single load.
pub struct DisplayControl {
    command: AtomicU8,
}

impl Default for DisplayControl {
    fn default() -> Self {
        Self::new()
    }
}

impl DisplayControl {
    /// Display on at half brightness
    pub const fn new() -> Self {
        Self {
            command: AtomicU8::new(display_command(true, DEFAULT_BRIGHTNESS)),
        }
    }

    /// Restore the power-on state (on, half brightness)
    pub fn reset(&self) {
        self.command
            .store(display_command(true, DEFAULT_BRIGHTNESS), Ordering::Relaxed);
    }

    /// Switch the display on or off, keeping the brightness
    pub fn set_enabled(&self, enabled: bool) {
        let current = self.command.load(Ordering::Relaxed);
        let next = (current & !DISPLAY_ON) | if enabled { DISPLAY_ON } else { 0 };
        self.command.store(next, Ordering::Relaxed);
    }

    /// Set brightness; only the low three bits are used
    pub fn set_brightness(&self, brightness: u8) {
        let current = self.command.load(Ordering::Relaxed);
        let next = (current & !DISPLAY_BRIGHT) | (brightness & DISPLAY_BRIGHT);
        self.command.store(next, Ordering::Relaxed);
    }

    /// Check if the display is switched on
    pub fn is_enabled(&self) -> bool {
        self.command.load(Ordering::Relaxed) & DISPLAY_ON != 0
    }

    /// Current brightness (0-7)
    pub fn brightness(&self) -> u8 {
        self.command.load(Ordering::Relaxed) & DISPLAY_BRIGHT
    }

    /// Display command byte for the next config write
    pub fn command(&self) -> u8 {
        self.command.load(Ordering::Relaxed)
    }
}

/// Configuration validation errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConfigError {
    /// Brightness above 7
    BrightnessOutOfRange,
    /// Refresh interval above [`MAX_INTERVAL_MS`]
    IntervalTooLong,
}

/// Panel startup settings
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct PanelConfig {
    /// Key rescan interval in ms (0 = no periodic scan)
    pub rescan_interval_ms: u32,
    /// Display repaint interval in ms (0 = no periodic repaint)
    pub repaint_interval_ms: u32,
    /// Startup brightness (0-7)
    pub brightness: u8,
    /// Display on at startup
    pub enabled: bool,
}

impl Default for PanelConfig {
    fn default() -> Self {
        Self {
            rescan_interval_ms: 10,
            repaint_interval_ms: 20,
            brightness: DEFAULT_BRIGHTNESS,
            enabled: true,
        }
    }
}

impl PanelConfig {
    /// Check ranges
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.brightness > MAX_BRIGHTNESS {
            return Err(ConfigError::BrightnessOutOfRange);
        }
        if self.rescan_interval_ms > MAX_INTERVAL_MS || self.repaint_interval_ms > MAX_INTERVAL_MS
        {
            return Err(ConfigError::IntervalTooLong);
        }
        Ok(())
    }
}
