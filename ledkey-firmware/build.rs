//! Build script for ledkey-firmware
//!
//! - Sets up linker search paths for memory.x
//! - Validates panel.toml at compile time
//! - Generates `panel_config.rs` with the validated values

use std::env;
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

/// Highest brightness level the display accepts
const MAX_BRIGHTNESS: i64 = 7;
/// Longest refresh interval accepted
const MAX_INTERVAL_MS: i64 = 60_000;
/// TM1638 clock limit
const MAX_SPI_FREQUENCY_HZ: i64 = 1_000_000;

/// Validated panel settings
struct PanelSettings {
    rescan_interval_ms: i64,
    repaint_interval_ms: i64,
    brightness: i64,
    enabled: bool,
    spi_frequency_hz: i64,
    dial_poll_interval_ms: i64,
}

fn main() {
    setup_linker();
    let settings = validate_config();
    generate_config(&settings);
}

/// Set up linker search paths for memory.x
fn setup_linker() {
    let out_dir = PathBuf::from(env::var("OUT_DIR").unwrap());

    // Copy memory.x to the output directory
    let memory_x = include_bytes!("memory.x");
    let mut f = File::create(out_dir.join("memory.x")).unwrap();
    f.write_all(memory_x).unwrap();

    // Tell rustc where to find memory.x
    println!("cargo:rustc-link-search={}", out_dir.display());

    println!("cargo:rerun-if-changed=memory.x");
    println!("cargo:rerun-if-changed=build.rs");
}

/// Validate panel.toml configuration at compile time
fn validate_config() -> PanelSettings {
    println!("cargo:rerun-if-changed=panel.toml");

    let config_path = Path::new("panel.toml");

    if !config_path.exists() {
        panic!(
            "\n\
            ╔══════════════════════════════════════════════════════════════════╗\n\
            ║  ERROR: panel.toml not found!                                    ║\n\
            ║                                                                  ║\n\
            ║  The firmware requires a panel.toml configuration file.          ║\n\
            ║  Please create one in the ledkey-firmware directory.             ║\n\
            ╚══════════════════════════════════════════════════════════════════╝\n"
        );
    }

    let config_content = match fs::read_to_string(config_path) {
        Ok(content) => content,
        Err(e) => {
            panic!(
                "\n\
                ╔══════════════════════════════════════════════════════════════════╗\n\
                ║  ERROR: Failed to read panel.toml                                ║\n\
                ║                                                                  ║\n\
                ║  Error: {:<56} ║\n\
                ╚══════════════════════════════════════════════════════════════════╝\n",
                e
            );
        }
    };

    let config: toml::Value = match toml::from_str(&config_content) {
        Ok(value) => value,
        Err(e) => {
            let error_msg = e.to_string();
            panic!(
                "\n\
                ╔══════════════════════════════════════════════════════════════════╗\n\
                ║  ERROR: Invalid TOML syntax in panel.toml                        ║\n\
                ╠══════════════════════════════════════════════════════════════════╣\n\
                ║                                                                  ║\n\
                {}\n\
                ║                                                                  ║\n\
                ╚══════════════════════════════════════════════════════════════════╝\n",
                format_error_lines(&error_msg)
            );
        }
    };

    let mut errors = Vec::new();
    let settings = validate_settings(&config, &mut errors);

    if !errors.is_empty() {
        panic!(
            "\n\
            ╔══════════════════════════════════════════════════════════════════╗\n\
            ║  ERROR: Invalid panel configuration                              ║\n\
            ╠══════════════════════════════════════════════════════════════════╣\n\
            {}\n\
            ╚══════════════════════════════════════════════════════════════════╝\n",
            errors
                .iter()
                .map(|e| format!("║  • {:<62} ║", e))
                .collect::<Vec<_>>()
                .join("\n")
        );
    }

    println!("cargo:warning=panel.toml validated successfully");
    settings
}

/// Format error message lines with box drawing
fn format_error_lines(msg: &str) -> String {
    msg.lines()
        .map(|line| {
            let truncated = if line.len() > 64 {
                format!("{}...", &line[..61])
            } else {
                line.to_string()
            };
            format!("║  {:<64} ║", truncated)
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Check [panel] and [dial]; missing keys fall back to defaults
fn validate_settings(config: &toml::Value, errors: &mut Vec<String>) -> PanelSettings {
    let panel = match config.get("panel") {
        Some(toml::Value::Table(t)) => Some(t),
        Some(_) => {
            errors.push("[panel] must be a table".to_string());
            None
        }
        None => {
            errors.push("Missing [panel] section".to_string());
            None
        }
    };
    let dial = match config.get("dial") {
        Some(toml::Value::Table(t)) => Some(t),
        Some(_) => {
            errors.push("[dial] must be a table".to_string());
            None
        }
        None => None,
    };

    let rescan_interval_ms = integer(panel, "panel", "rescan_interval_ms", 10, 0, MAX_INTERVAL_MS, errors);
    let repaint_interval_ms = integer(panel, "panel", "repaint_interval_ms", 20, 0, MAX_INTERVAL_MS, errors);
    let brightness = integer(panel, "panel", "brightness", 3, 0, MAX_BRIGHTNESS, errors);
    let spi_frequency_hz = integer(
        panel,
        "panel",
        "spi_frequency_hz",
        500_000,
        10_000,
        MAX_SPI_FREQUENCY_HZ,
        errors,
    );
    let dial_poll_interval_ms = integer(dial, "dial", "poll_interval_ms", 10, 1, MAX_INTERVAL_MS, errors);

    let enabled = match panel.and_then(|t| t.get("enabled")) {
        None => true,
        Some(toml::Value::Boolean(b)) => *b,
        Some(_) => {
            errors.push("[panel] enabled must be true or false".to_string());
            true
        }
    };

    PanelSettings {
        rescan_interval_ms,
        repaint_interval_ms,
        brightness,
        enabled,
        spi_frequency_hz,
        dial_poll_interval_ms,
    }
}

/// Read an optional integer key and range-check it
fn integer(
    table: Option<&toml::map::Map<String, toml::Value>>,
    section: &str,
    key: &str,
    default: i64,
    min: i64,
    max: i64,
    errors: &mut Vec<String>,
) -> i64 {
    match table.and_then(|t| t.get(key)) {
        None => default,
        Some(toml::Value::Integer(value)) if (min..=max).contains(value) => *value,
        Some(toml::Value::Integer(_)) => {
            errors.push(format!("[{}] {} must be {}-{}", section, key, min, max));
            default
        }
        Some(_) => {
            errors.push(format!("[{}] {} must be an integer", section, key));
            default
        }
    }
}

/// Write the validated values as Rust constants
fn generate_config(settings: &PanelSettings) {
    let out_dir = PathBuf::from(env::var("OUT_DIR").unwrap());
    let mut f = File::create(out_dir.join("panel_config.rs")).unwrap();

    writeln!(f, "// Generated from panel.toml by build.rs").unwrap();
    writeln!(f, "pub const RESCAN_INTERVAL_MS: u32 = {};", settings.rescan_interval_ms).unwrap();
    writeln!(f, "pub const REPAINT_INTERVAL_MS: u32 = {};", settings.repaint_interval_ms).unwrap();
    writeln!(f, "pub const BRIGHTNESS: u8 = {};", settings.brightness).unwrap();
    writeln!(f, "pub const ENABLED: bool = {};", settings.enabled).unwrap();
    writeln!(f, "pub const SPI_FREQUENCY_HZ: u32 = {};", settings.spi_frequency_hz).unwrap();
    writeln!(f, "pub const DIAL_POLL_INTERVAL_MS: u32 = {};", settings.dial_poll_interval_ms).unwrap();
}
