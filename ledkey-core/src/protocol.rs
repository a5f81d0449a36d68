//! TM1638 command set
//!
//! The chip takes one command byte per strobe frame, optionally followed
//! by data bytes. Bits are shifted LSB first.
//!
//! | Command  | Byte                                    |
//! |----------|-----------------------------------------|
//! | Data     | `0x40 \| read(0x02) \| fixed(0x04)`      |
//! | Address  | `0xC0 \| addr(0..15)`                    |
//! | Display  | `0x80 \| on(0x08) \| brightness(0..7)`   |

/// Data command
pub const CMD_DATA: u8 = 0x40;
/// Address command
pub const CMD_ADDRESS: u8 = 0xC0;
/// Display control command
pub const CMD_DISPLAY: u8 = 0x80;

/// Data command: write to display registers
pub const DATA_WRITE: u8 = 0x00;
/// Data command: read key scan data
pub const DATA_READ: u8 = 0x02;
/// Data command: auto-increment address
pub const DATA_INCR: u8 = 0x00;

/// Address command field mask
pub const ADDRESS_MASK: u8 = 0x0F;

/// Display command brightness field
pub const DISPLAY_BRIGHT: u8 = 0x07;
/// Display command on bit
pub const DISPLAY_ON: u8 = 0x08;

/// Highest brightness level
pub const MAX_BRIGHTNESS: u8 = 7;
/// Highest digit position exposed by the panel
pub const MAX_DIGIT: u8 = 9;
/// Highest value `write_digit` renders (hex F)
pub const MAX_VALUE: i8 = 15;

/// Number of key scan bytes returned by a read
pub const SCAN_BYTES: usize = 4;
/// Number of display register bytes
pub const SEGMENT_BYTES: usize = 16;

/// Byte clocked out while receiving; DIO is released so the value is ignored
pub const RX_FILLER: u8 = 0xFF;

/// Opening byte of a key read
pub const fn read_keys_command() -> u8 {
    CMD_DATA | DATA_READ | DATA_INCR
}

/// Opening byte of a segment write
pub const fn write_segments_command() -> u8 {
    CMD_DATA | DATA_WRITE | DATA_INCR
}

/// Set-address byte for display register `addr`
pub const fn address_command(addr: u8) -> u8 {
    CMD_ADDRESS | (addr & ADDRESS_MASK)
}

/// Display control byte
pub const fn display_command(enabled: bool, brightness: u8) -> u8 {
    CMD_DISPLAY | (if enabled { DISPLAY_ON } else { 0 }) | (brightness & DISPLAY_BRIGHT)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_opcodes() {
        assert_eq!(write_segments_command(), 0x40);
        assert_eq!(read_keys_command(), 0x42);
        assert_eq!(address_command(0), 0xC0);
        assert_eq!(address_command(0x1F), 0xCF);
    }

    #[test]
    fn test_display_command() {
        assert_eq!(display_command(true, 3), 0x8B);
        assert_eq!(display_command(false, 7), 0x87);
        // Brightness is masked, never spills into the on bit
        assert_eq!(display_command(false, 8), 0x80);
    }
}
