//! Servo pulse dial
//!
//! The LED&KEY board's top row of keys nudges a servo pulse width up or
//! down in decades; the value is shown on the four rightmost digits.
//!
//! ```text
//! key bit      action        key bit      action
//! 0x0000_0002  +1000 us      0x0002_0000  -1000 us
//! 0x0000_0020   +100 us      0x0020_0000   -100 us
//! 0x0000_0200    +10 us      0x0200_0000    -10 us
//! 0x0000_2000     +1 us      0x2000_0000     -1 us
//! ```

use crate::framebuffer::SegmentFramebuffer;

/// Shortest pulse, in us
pub const MIN_PULSE_US: u16 = 500;
/// Longest pulse, in us
pub const MAX_PULSE_US: u16 = 2500;
/// Startup pulse: centre of the range
pub const CENTER_PULSE_US: u16 = (MIN_PULSE_US + MAX_PULSE_US) / 2;

/// PWM frame length in counts (50 Hz at 1 MHz)
pub const PWM_COUNTS: u16 = 20_000;
/// Counts at [`MIN_PULSE_US`]
pub const MIN_COUNTS: u16 = 1000;
/// Counts at [`MAX_PULSE_US`]
pub const MAX_COUNTS: u16 = 5000;

/// Key bits and the pulse change they apply
pub const STEPS: [(u32, i16); 8] = [
    (0x0002_0000, -1000),
    (0x0000_0002, 1000),
    (0x0020_0000, -100),
    (0x0000_0020, 100),
    (0x0200_0000, -10),
    (0x0000_0200, 10),
    (0x2000_0000, -1),
    (0x0000_2000, 1),
];

/// Map a pulse width onto PWM counts, linear between the range ends
///
/// Out-of-range pulses are clamped first.
pub fn pulse_counts(pulse_us: u16) -> u16 {
    let pulse = pulse_us.clamp(MIN_PULSE_US, MAX_PULSE_US);
    let span = u32::from(MAX_COUNTS - MIN_COUNTS);
    let offset = u32::from(pulse - MIN_PULSE_US) * span / u32::from(MAX_PULSE_US - MIN_PULSE_US);
    MIN_COUNTS + offset as u16
}

/// Pulse width selected with the panel keys
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PulseDial {
    pulse_us: u16,
}

impl Default for PulseDial {
    fn default() -> Self {
        Self::new()
    }
}

impl PulseDial {
    /// Dial at the centre of the range
    pub const fn new() -> Self {
        Self {
            pulse_us: CENTER_PULSE_US,
        }
    }

    /// Current pulse width in us
    pub fn pulse(&self) -> u16 {
        self.pulse_us
    }

    /// Apply newly pressed keys; returns `true` if the pulse changed
    ///
    /// All pressed steps are summed before the result is clamped, so
    /// opposite keys pressed together cancel anywhere in the range.
    pub fn apply(&mut self, pressed: u32) -> bool {
        let delta: i32 = STEPS
            .iter()
            .filter(|(bit, _)| pressed & bit != 0)
            .map(|&(_, delta)| i32::from(delta))
            .sum();
        let target = i32::from(self.pulse_us) + delta;
        let pulse = target.clamp(i32::from(MIN_PULSE_US), i32::from(MAX_PULSE_US)) as u16;

        let changed = pulse != self.pulse_us;
        self.pulse_us = pulse;
        changed
    }

    /// Show the pulse on digits 0 (ones) to 3 (thousands)
    ///
    /// Leading zeros are blanked; digit 0 always shows a value.
    pub fn render(&self, framebuffer: &SegmentFramebuffer) {
        let pulse = self.pulse_us;
        let mut scale = 1u16;
        for position in 0..4u8 {
            let value = if position > 0 && pulse < scale {
                -1
            } else {
                ((pulse / scale) % 10) as i8
            };
            framebuffer.write_digit(position, value);
            scale = scale.saturating_mul(10);
        }
    }
}
