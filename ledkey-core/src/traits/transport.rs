//! Byte transport trait for the panel bus
//!
//! The TM1638 shares one data line for both directions. A transport moves
//! exactly one byte per call to [`Transport::send`] and raises a completion
//! event (an interrupt on hardware) when that byte has been shifted. The
//! event handler forwards to `Panel::on_transfer_complete`.

/// Direction of the shared data line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum BusMode {
    /// Controller drives DIO
    Transmit,
    /// Controller releases DIO; the chip drives it while clocks are sent
    Receive,
}

/// Strobed, byte-at-a-time bus to the panel chip
///
/// Implementations never block waiting for a byte to finish. They are
/// assumed error-free once correctly clocked, so no method is fallible.
pub trait Transport {
    /// Assert chip-select (strobe low), including the settle delay
    fn select(&mut self);

    /// Deassert chip-select (strobe high), including the settle delay
    fn deselect(&mut self);

    /// Start shifting one byte
    ///
    /// In [`BusMode::Receive`] the byte only provides clocks.
    fn send(&mut self, byte: u8);

    /// Consume the pending completion event
    ///
    /// Returns the byte clocked in while the last byte was shifted.
    fn acknowledge(&mut self) -> u8;

    /// Switch the data line direction
    fn set_mode(&mut self, mode: BusMode);

    /// Enable or disable completion events
    fn listen(&mut self, enabled: bool);
}
