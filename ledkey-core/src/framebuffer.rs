//! Transposed segment framebuffer
//!
//! The TM1638 display registers are organised by segment, not by digit:
//! register pair `2s, 2s+1` holds segment `s` for all sixteen grid
//! positions. The buffer keeps exactly that layout so a segment write can
//! stream it verbatim.
//!
//! ```text
//!      --a--
//!     |     |          bit 0: a    bit 4: e
//!     f     b          bit 1: b    bit 5: f
//!     |     |          bit 2: c    bit 6: g
//!      --g--           bit 3: d    bit 7: dp
//!     |     |
//!     e     c          byte 2s   = segment s, digits 0..7
//!     |     |          byte 2s+1 = segment s, digits 8..15
//!      --d-- * dp
//! ```
//!
//! Each register byte is an atomic. The background context is the only
//! writer; the completion handler reads bytes while a segment write is in
//! flight, so a racing write can tear one frame visually but never splits
//! a byte on the wire.

use portable_atomic::{AtomicU8, Ordering};

use crate::protocol::{MAX_DIGIT, MAX_VALUE, SEGMENT_BYTES};

/// Number of segments per digit (a..g plus dp)
pub const SEGMENTS: usize = 8;

/// Glyph with no segments lit
pub const BLANK: u8 = 0x00;

/// Decimal point bit
pub const SEG_DP: u8 = 1 << 7;

/// Hex digit glyphs, `0`..`F`
pub const DIGIT_GLYPHS: [u8; 16] = [
    0x3F, // 0
    0x06, // 1
    0x5B, // 2
    0x4F, // 3
    0x66, // 4
    0x6D, // 5
    0x7D, // 6
    0x07, // 7
    0x7F, // 8
    0x6F, // 9
    0x77, // A
    0x7C, // b
    0x39, // C
    0x5E, // d
    0x79, // E
    0x71, // F
];

/// Glyph for a digit value; anything outside `0..=15` is blank
pub fn glyph(value: i8) -> u8 {
    if (0..=MAX_VALUE).contains(&value) {
        DIGIT_GLYPHS[value as usize]
    } else {
        BLANK
    }
}

/// Segment framebuffer in wire order
pub struct SegmentFramebuffer {
    registers: [AtomicU8; SEGMENT_BYTES],
}

impl Default for SegmentFramebuffer {
    fn default() -> Self {
        Self::new()
    }
}

impl SegmentFramebuffer {
    /// Create a blank framebuffer
    pub const fn new() -> Self {
        Self {
            registers: [const { AtomicU8::new(0) }; SEGMENT_BYTES],
        }
    }

    /// Blank every digit, including the unused grid positions
    pub fn clear(&self) {
        for register in &self.registers {
            register.store(0, Ordering::Relaxed);
        }
    }

    /// Render a hex digit at `position`
    ///
    /// Positions above 9 are ignored. Values outside `0..=15` (the
    /// convention is `-1`) blank the digit.
    pub fn write_digit(&self, position: u8, value: i8) {
        self.write_pattern(position, glyph(value));
    }

    /// Write a raw segment pattern at `position`
    ///
    /// Bit `s` of `pattern` lights segment `s`. Positions above 9 are
    /// ignored.
    pub fn write_pattern(&self, position: u8, pattern: u8) {
        if position > MAX_DIGIT {
            return;
        }

        let (offset, mask) = Self::locate(position);
        for segment in 0..SEGMENTS {
            let register = &self.registers[2 * segment + offset];
            let current = register.load(Ordering::Relaxed);
            let next = if pattern & (1 << segment) != 0 {
                current | mask
            } else {
                current & !mask
            };
            register.store(next, Ordering::Relaxed);
        }
    }

    /// Decode the segment pattern currently shown at `position`
    ///
    /// Works for all sixteen grid positions; `None` above 15.
    pub fn digit(&self, position: u8) -> Option<u8> {
        if position as usize >= 2 * SEGMENTS {
            return None;
        }

        let (offset, mask) = Self::locate(position);
        let mut pattern = 0u8;
        for segment in 0..SEGMENTS {
            if self.registers[2 * segment + offset].load(Ordering::Relaxed) & mask != 0 {
                pattern |= 1 << segment;
            }
        }
        Some(pattern)
    }

    /// One bit-plane: bit `d` set iff `segment` is lit on digit `d`
    pub fn plane(&self, segment: usize) -> u16 {
        if segment >= SEGMENTS {
            return 0;
        }
        let low = self.registers[2 * segment].load(Ordering::Relaxed);
        let high = self.registers[2 * segment + 1].load(Ordering::Relaxed);
        u16::from_le_bytes([low, high])
    }

    /// Register byte `index` as it goes on the wire
    pub fn byte(&self, index: usize) -> u8 {
        self.registers
            .get(index)
            .map(|register| register.load(Ordering::Relaxed))
            .unwrap_or(0)
    }

    /// Copy of the whole register image
    pub fn snapshot(&self) -> [u8; SEGMENT_BYTES] {
        let mut image = [0u8; SEGMENT_BYTES];
        for (byte, register) in image.iter_mut().zip(self.registers.iter()) {
            *byte = register.load(Ordering::Relaxed);
        }
        image
    }

    /// Register offset within a plane pair and bit mask for a position
    fn locate(position: u8) -> (usize, u8) {
        ((position / 8) as usize, 1 << (position % 8))
    }
}
