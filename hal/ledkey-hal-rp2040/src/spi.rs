//! SPI0 as an interrupt-driven byte shifter
//!
//! embassy-rp sets up the pins, clock rate and mode through its blocking
//! driver. Byte transfers then go straight to the PL022 registers so every
//! byte can complete under interrupt.
//!
//! The PL022 has no "transfer done" interrupt. The receive timeout
//! interrupt (RTIM) fires once the RX FIFO has held data for 32 bit periods
//! without a read, which after a single byte means the byte is done. At
//! 500 kHz that adds 64 us per byte.

use embassy_rp::pac;
use embassy_rp::peripherals::SPI0;
use embassy_rp::spi::{self, Blocking, ClkPin, MisoPin, MosiPin, Spi};
use embassy_rp::Peri;
use ledkey_hal::spi::{ByteShifter, Phase, Polarity, SpiConfig};

/// SPI0 driven one byte at a time
///
/// The blocking driver is kept only so the pins stay configured. The
/// hardware shifts MSB first; bit order conversion is up to the caller.
pub struct SpiShifter {
    _spi: Spi<'static, SPI0, Blocking>,
}

impl SpiShifter {
    /// Configure SPI0 and mask all of its interrupts
    ///
    /// For the TM1638, wire MOSI to DIO through a 1k resistor and MISO
    /// straight to DIO.
    pub fn new(
        spi: Peri<'static, SPI0>,
        clk: Peri<'static, impl ClkPin<SPI0>>,
        mosi: Peri<'static, impl MosiPin<SPI0>>,
        miso: Peri<'static, impl MisoPin<SPI0>>,
        config: &SpiConfig,
    ) -> Self {
        let spi = Spi::new_blocking(spi, clk, mosi, miso, embassy_config(config));

        let regs = regs();
        regs.imsc().write(|_| {});
        regs.icr().write(|w| {
            w.set_rtic(true);
            w.set_roric(true);
        });

        Self { _spi: spi }
    }

    fn drain(&mut self) -> u8 {
        let regs = regs();
        let mut last = 0;
        while regs.sr().read().rne() {
            last = regs.dr().read().data() as u8;
        }
        last
    }
}

fn regs() -> pac::spi::Spi {
    pac::SPI0
}

impl ByteShifter for SpiShifter {
    fn start(&mut self, byte: u8) {
        regs().dr().write(|w| w.set_data(byte as u16));
    }

    fn finish(&mut self) -> u8 {
        let byte = self.drain();
        regs().icr().write(|w| w.set_rtic(true));
        byte
    }

    fn set_interrupt(&mut self, enabled: bool) {
        regs().imsc().modify(|w| w.set_rtim(enabled));
    }
}

fn embassy_config(config: &SpiConfig) -> spi::Config {
    let mut out = spi::Config::default();
    out.frequency = config.frequency;
    out.polarity = match config.polarity {
        Polarity::IdleLow => spi::Polarity::IdleLow,
        Polarity::IdleHigh => spi::Polarity::IdleHigh,
    };
    out.phase = match config.phase {
        Phase::CaptureOnFirstTransition => spi::Phase::CaptureOnFirstTransition,
        Phase::CaptureOnSecondTransition => spi::Phase::CaptureOnSecondTransition,
    };
    out
}
