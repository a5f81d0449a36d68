//! Build-time panel configuration
//!
//! `build.rs` validates `panel.toml` and emits the constants below.

use ledkey_core::PanelConfig;
use ledkey_hal::SpiConfig;

mod generated {
    include!(concat!(env!("OUT_DIR"), "/panel_config.rs"));
}

pub use generated::DIAL_POLL_INTERVAL_MS;

/// Panel startup settings from panel.toml
pub fn panel_config() -> PanelConfig {
    PanelConfig {
        rescan_interval_ms: generated::RESCAN_INTERVAL_MS,
        repaint_interval_ms: generated::REPAINT_INTERVAL_MS,
        brightness: generated::BRIGHTNESS,
        enabled: generated::ENABLED,
    }
}

/// TM1638 bus settings with the configured clock rate
pub fn spi_config() -> SpiConfig {
    SpiConfig {
        frequency: generated::SPI_FREQUENCY_HZ,
        ..SpiConfig::tm1638()
    }
}
