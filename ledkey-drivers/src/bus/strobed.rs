//! Strobed panel bus
//!
//! Builds a [`Transport`] from three pieces of hardware:
//!
//! - a [`ByteShifter`] for the clock and data bits
//! - a [`DataLine`] to turn DIO around for key reads
//! - an `embedded-hal` output pin for STB
//!
//! STB is active low. Every strobe edge is surrounded by a short settle
//! delay; the chip needs at least 1 us between STB and the first clock.
//!
//! ```ignore
//! let bus = StrobedBus::new(shifter, dio, stb, Delay, BitOrder::LsbFirst);
//! PANEL.init(bus, &mut scheduler, 10, 20)?;
//! ```

use core::convert::Infallible;

use embedded_hal::delay::DelayNs;
use embedded_hal::digital::OutputPin;
use ledkey_core::traits::{BusMode, Transport};
use ledkey_hal::{BitOrder, ByteShifter, DataLine};

/// Settle time around strobe edges, in us
pub const DEFAULT_SETTLE_US: u32 = 1;

/// Panel transport over a byte shifter and a strobe pin
pub struct StrobedBus<S, L, P, D> {
    shifter: S,
    data: L,
    strobe: P,
    delay: D,
    bit_order: BitOrder,
    settle_us: u32,
}

impl<S, L, P, D> StrobedBus<S, L, P, D>
where
    S: ByteShifter,
    L: DataLine,
    P: OutputPin<Error = Infallible>,
    D: DelayNs,
{
    /// Create a bus with STB released and DIO driven
    pub fn new(shifter: S, data: L, strobe: P, delay: D, bit_order: BitOrder) -> Self {
        let mut bus = Self {
            shifter,
            data,
            strobe,
            delay,
            bit_order,
            settle_us: DEFAULT_SETTLE_US,
        };
        let _ = bus.strobe.set_high();
        bus.data.drive();
        bus.shifter.set_interrupt(false);
        bus
    }

    /// Override the settle delay
    pub fn with_settle_us(mut self, settle_us: u32) -> Self {
        self.settle_us = settle_us;
        self
    }

    /// Release the hardware
    pub fn release(self) -> (S, L, P, D) {
        (self.shifter, self.data, self.strobe, self.delay)
    }

    fn settle(&mut self) {
        if self.settle_us > 0 {
            self.delay.delay_us(self.settle_us);
        }
    }
}

impl<S, L, P, D> Transport for StrobedBus<S, L, P, D>
where
    S: ByteShifter,
    L: DataLine,
    P: OutputPin<Error = Infallible>,
    D: DelayNs,
{
    fn select(&mut self) {
        self.settle();
        let _ = self.strobe.set_low();
        self.settle();
    }

    fn deselect(&mut self) {
        self.settle();
        let _ = self.strobe.set_high();
        self.settle();
    }

    fn send(&mut self, byte: u8) {
        self.shifter.start(self.bit_order.adapt(byte));
    }

    fn acknowledge(&mut self) -> u8 {
        self.bit_order.adapt(self.shifter.finish())
    }

    fn set_mode(&mut self, mode: BusMode) {
        match mode {
            BusMode::Transmit => self.data.drive(),
            BusMode::Receive => self.data.release(),
        }
    }

    fn listen(&mut self, enabled: bool) {
        self.shifter.set_interrupt(enabled);
    }
}
