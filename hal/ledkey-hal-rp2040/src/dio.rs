//! DIO turnaround
//!
//! MOSI keeps its SPI function; releasing the line only forces the pad's
//! output enable off, so switching direction costs one register write.

use embassy_rp::pac;
use embassy_rp::pac::io::vals::Oeover;
use ledkey_hal::gpio::{DataLine, Direction};

/// Output-enable override on the GPIO that carries MOSI
pub struct DioLine {
    pin: usize,
}

impl DioLine {
    /// `pin` is the GPIO number of the MOSI pin
    pub fn new(pin: u8) -> Self {
        let mut line = Self { pin: pin as usize };
        line.set_direction(Direction::Output);
        line
    }
}

impl DataLine for DioLine {
    fn set_direction(&mut self, direction: Direction) {
        let oeover = match direction {
            Direction::Output => Oeover::NORMAL,
            Direction::Input => Oeover::DISABLE,
        };
        pac::IO_BANK0
            .gpio(self.pin)
            .ctrl()
            .modify(|w| w.set_oeover(oeover));
    }
}
