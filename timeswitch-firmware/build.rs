//! Build script for timeswitch-firmware
//!
//! - Validates timeswitch.toml at compile time
//! - Generates `config.rs` with the validated settings as constants

use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use timeswitch_core::config::{ConfigError, FirmwareConfig};
use timeswitch_hal::twi::{scl_frequency, Prescaler};
use timeswitch_hal_avr::twi::clock_settings;
use timeswitch_hal_avr::PinSpec;

fn main() {
    println!("cargo:rerun-if-changed=build.rs");

    let config = load_config();
    let (bit_rate, prescaler) = validate_config(&config);
    generate_config(&config, bit_rate, prescaler);
}

/// Print a boxed error and abort the build
fn fail(title: &str, lines: &[String]) -> ! {
    panic!(
        "\n\
        ╔══════════════════════════════════════════════════════════════════╗\n\
        ║  ERROR: {:<56} ║\n\
        ╠══════════════════════════════════════════════════════════════════╣\n\
        {}\n\
        ╚══════════════════════════════════════════════════════════════════╝\n",
        title,
        format_error_lines(lines)
    );
}

/// Format error message lines with box drawing
fn format_error_lines(lines: &[String]) -> String {
    lines
        .iter()
        .flat_map(|msg| msg.lines())
        .map(|line| format!("║  {:<64} ║", truncate(line, 64)))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Shorten `line` to at most `width` characters, marking the cut with "..."
fn truncate(line: &str, width: usize) -> String {
    if line.chars().count() <= width {
        return line.to_string();
    }
    match line.char_indices().nth(width - 3) {
        Some((end, _)) => format!("{}...", &line[..end]),
        None => line.to_string(),
    }
}

/// Read and parse timeswitch.toml
fn load_config() -> FirmwareConfig {
    println!("cargo:rerun-if-changed=timeswitch.toml");

    let config_path = Path::new("timeswitch.toml");
    if !config_path.exists() {
        fail(
            "timeswitch.toml not found!",
            &["Create one in the timeswitch-firmware directory.".to_string()],
        );
    }

    let content = match fs::read_to_string(config_path) {
        Ok(content) => content,
        Err(e) => fail("Failed to read timeswitch.toml", &[e.to_string()]),
    };

    // Syntax first, so the message points at the line that is wrong
    let value: toml::Value = match toml::from_str(&content) {
        Ok(value) => value,
        Err(e) => fail("Invalid TOML syntax in timeswitch.toml", &[e.to_string()]),
    };

    match value.try_into() {
        Ok(config) => config,
        Err(e) => fail("Invalid setting in timeswitch.toml", &[e.to_string()]),
    }
}

/// Bit rate and prescaler, derived from `scl_hz` when it is set
fn bus_clock(config: &FirmwareConfig) -> Result<(u8, Prescaler), String> {
    let bus = &config.bus;
    match bus.scl_hz {
        Some(scl_hz) => clock_settings(config.cpu_hz, scl_hz).ok_or_else(|| {
            format!(
                "[bus] scl_hz {} cannot be reached from cpu_hz {}",
                scl_hz, config.cpu_hz
            )
        }),
        None => Ok((
            bus.bit_rate,
            Prescaler::from_divisor(bus.prescaler as u32).unwrap_or_default(),
        )),
    }
}

/// Validate settings and return the bus bit rate and prescaler
fn validate_config(config: &FirmwareConfig) -> (u8, Prescaler) {
    let mut errors = Vec::new();

    if let Err(e) = config.validate() {
        errors.push(match e {
            ConfigError::ZeroCpuClock => "cpu_hz must be non-zero".to_string(),
            ConfigError::InvalidPrescaler(p) => {
                format!("[bus] prescaler {} must be 1, 4, 16 or 64", p)
            }
            ConfigError::ZeroBusClock => "[bus] scl_hz must be non-zero".to_string(),
            ConfigError::ZeroMessageTicks => "[ui] message_ticks must be at least 1".to_string(),
            ConfigError::ZeroTickPeriod => "[ui] tick_ms must be non-zero".to_string(),
            ConfigError::DuplicatePin => "[pins] a pin is assigned twice".to_string(),
        });
    }

    for name in config.pins.all() {
        if PinSpec::parse(name).is_none() {
            errors.push(format!("[pins] '{}' is not a pin (PB0..PB7, PC0..PC6, PD0..PD7)", name));
        }
    }

    if config.pins.keys.iter().any(|name| name.starts_with("PC6")) {
        errors.push("[pins] PC6 is the reset pin and cannot read a key".to_string());
    }

    let mut clock = (0, Prescaler::default());
    if errors.is_empty() {
        match bus_clock(config) {
            Ok((bit_rate, prescaler)) => {
                let scl = scl_frequency(config.cpu_hz, bit_rate, prescaler);
                if scl > 400_000 {
                    errors.push(format!("[bus] SCL of {} Hz exceeds the 400 kHz DS3231 limit", scl));
                }
                clock = (bit_rate, prescaler);
            }
            Err(e) => errors.push(e),
        }
    }

    if !errors.is_empty() {
        fail(
            "Invalid configuration",
            &errors.iter().map(|e| format!("• {}", e)).collect::<Vec<_>>(),
        );
    }

    let (bit_rate, prescaler) = clock;
    println!(
        "cargo:warning=timeswitch.toml validated successfully (SCL {} Hz, bit_rate {}, prescaler {})",
        scl_frequency(config.cpu_hz, bit_rate, prescaler),
        bit_rate,
        prescaler.divisor()
    );
    clock
}

fn pin_literal(name: &str) -> String {
    // Names were checked by validate_config
    let spec = PinSpec::parse(name).unwrap();
    format!("PinSpec {{ port: Port::{:?}, bit: {} }}", spec.port, spec.bit)
}

fn pin_array(names: &[impl AsRef<str>]) -> String {
    let pins: Vec<_> = names.iter().map(|n| pin_literal(n.as_ref())).collect();
    format!("[{}]", pins.join(", "))
}

/// Write the settings as Rust constants to `$OUT_DIR/config.rs`
fn generate_config(config: &FirmwareConfig, bit_rate: u8, prescaler: Prescaler) {
    let out_dir = PathBuf::from(env::var("OUT_DIR").unwrap());
    let pins = &config.pins;

    let source = format!(
        "// Generated from timeswitch.toml by build.rs\n\
         \n\
         pub const CPU_HZ: u32 = {cpu_hz};\n\
         \n\
         pub const BUS_BIT_RATE: u8 = {bit_rate};\n\
         pub const BUS_PRESCALER: Prescaler = Prescaler::{prescaler:?};\n\
         pub const BUS_MAX_POLLS: u32 = {max_polls};\n\
         \n\
         pub const UI: UiConfig = UiConfig {{ message_ticks: {message_ticks}, tick_ms: {tick_ms} }};\n\
         \n\
         pub const KEY_PINS: [PinSpec; 3] = {keys};\n\
         pub const LCD_DATA_PINS: [PinSpec; 4] = {lcd_data};\n\
         pub const LCD_RS: PinSpec = {lcd_rs};\n\
         pub const LCD_RW: PinSpec = {lcd_rw};\n\
         pub const LCD_ENABLE: PinSpec = {lcd_enable};\n",
        cpu_hz = config.cpu_hz,
        bit_rate = bit_rate,
        prescaler = prescaler,
        max_polls = config.bus.max_polls,
        message_ticks = config.ui.message_ticks,
        tick_ms = config.ui.tick_ms,
        keys = pin_array(&pins.keys),
        lcd_data = pin_array(&pins.lcd_data),
        lcd_rs = pin_literal(&pins.lcd_rs),
        lcd_rw = pin_literal(&pins.lcd_rw),
        lcd_enable = pin_literal(&pins.lcd_enable),
    );

    fs::write(out_dir.join("config.rs"), source).unwrap();
}
