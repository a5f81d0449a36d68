//! LED&KEY - TM1638 panel firmware
//!
//! Drives a TM1638 LED&KEY board from an RP2040. The panel command engine
//! runs from the SPI0 interrupt; embassy tasks only request work:
//!
//! - two refresh tasks request key scans and display repaints
//! - the dial task turns key presses into a servo pulse width
//! - the servo task applies it to a 50 Hz PWM output
//!
//! Wiring (TM1638 / RP2040):
//!
//! | Signal | GPIO | Function               |
//! |--------|------|------------------------|
//! | CLK    | 18   | SPI0 SCK               |
//! | DIO    | 19   | SPI0 TX (via 1k)       |
//! | DIO    | 16   | SPI0 RX                |
//! | STB    | 17   | GPIO output            |
//! | Servo  | 14   | PWM slice 7 channel A  |

#![no_std]
#![no_main]

use defmt::*;
use embassy_executor::Spawner;
use embassy_rp::gpio::{Level, Output};
use embassy_rp::interrupt;
use embassy_rp::interrupt::{InterruptExt, Priority};
use embassy_rp::pwm::Pwm;
use embassy_time::{Delay, Timer};
use {defmt_rtt as _, panic_probe as _};

use ledkey_core::{Panel, PanelConfig};
use ledkey_drivers::bus::StrobedBus;
use ledkey_drivers::servo::ServoOutput;
use ledkey_hal::BitOrder;
use ledkey_hal_rp2040::servo::servo_config;
use ledkey_hal_rp2040::{DioLine, SpiShifter};

mod config;
mod tasks;

/// GPIO carrying SPI0 TX, released during key reads
const DIO_TX_PIN: u8 = 19;

/// Concrete panel bus on this board
type PanelBus = StrobedBus<SpiShifter, DioLine, Output<'static>, Delay>;

/// The panel, shared by the tasks and the SPI0 interrupt
static PANEL: Panel<PanelBus> = Panel::new();

#[interrupt]
fn SPI0_IRQ() {
    PANEL.on_transfer_complete();
}

/// Main entry point
#[embassy_executor::main]
async fn main(spawner: Spawner) {
    info!("LED&KEY firmware starting...");

    let p = embassy_rp::init(Default::default());
    info!("Peripherals initialized");

    let mut panel_config = config::panel_config();
    if let Err(e) = panel_config.validate() {
        // build.rs checks the same ranges; only a stale build gets here
        warn!("Panel config rejected: {}, using defaults", e);
        panel_config = PanelConfig::default();
    }

    let spi_config = config::spi_config();
    info!(
        "Panel bus: {} Hz, rescan {} ms, repaint {} ms",
        spi_config.frequency, panel_config.rescan_interval_ms, panel_config.repaint_interval_ms
    );

    let shifter = SpiShifter::new(p.SPI0, p.PIN_18, p.PIN_19, p.PIN_16, &spi_config);
    let dio = DioLine::new(DIO_TX_PIN);
    let stb = Output::new(p.PIN_17, Level::High);
    let bus = StrobedBus::new(shifter, dio, stb, Delay, BitOrder::LsbFirst);

    interrupt::SPI0_IRQ.set_priority(Priority::P1);
    interrupt::SPI0_IRQ.unpend();
    // SAFETY: the handler only touches PANEL, which is initialised at compile time
    unsafe { interrupt::SPI0_IRQ.enable() };

    let mut refresh = tasks::EmbassyRefresh::new(spawner);
    PANEL.start(bus, &mut refresh, &panel_config).unwrap();
    info!("Panel started");

    let pwm = Pwm::new_output_a(
        p.PWM_SLICE7,
        p.PIN_14,
        servo_config(embassy_rp::clocks::clk_sys_freq()),
    );
    let (servo_pwm, _) = pwm.split();
    match servo_pwm {
        Some(servo_pwm) => {
            spawner
                .spawn(tasks::servo_task(ServoOutput::new(servo_pwm)))
                .unwrap();
        }
        None => warn!("Servo PWM channel unavailable"),
    }

    spawner
        .spawn(tasks::dial_task(config::DIAL_POLL_INTERVAL_MS))
        .unwrap();

    info!("All tasks spawned, firmware running");

    loop {
        Timer::after_secs(60).await;
        trace!(
            "Heartbeat: keys={:08x} pending={}",
            PANEL.get_keys(),
            PANEL.pending()
        );
    }
}
