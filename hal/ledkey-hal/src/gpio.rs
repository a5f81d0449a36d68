//! Data pin direction control
//!
//! The TM1638 has a single bidirectional DIO pin. The controller drives it
//! while sending and must release it while the chip answers a key read.

/// Direction of a bidirectional pin
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Direction {
    /// Pin driven by the controller
    Output,
    /// Pin released (high impedance, pulled up)
    Input,
}

/// Bidirectional data line
///
/// Switching must take effect before the next byte is clocked.
pub trait DataLine {
    /// Set the pin direction
    fn set_direction(&mut self, direction: Direction);

    /// Drive the line
    fn drive(&mut self) {
        self.set_direction(Direction::Output);
    }

    /// Release the line
    fn release(&mut self) {
        self.set_direction(Direction::Input);
    }
}
