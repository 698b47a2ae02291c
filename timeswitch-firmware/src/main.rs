//! Timeswitch firmware
//!
//! Appliance timer for ATmega8 boards. A DS3231 clock switches the
//! appliance on through its alarm output at the on time; the firmware
//! clears the alarm at the off time. A 16x2 LCD and three buttons set
//! the clock and both switching times.
//!
//! There is no scheduler: the main loop samples the buttons, runs one
//! application tick and sleeps for the configured tick period.

#![no_std]
#![no_main]

use panic_halt as _;

use avr_device::atmega8::Peripherals;
use embedded_hal::delay::DelayNs;
use timeswitch_core::app::App;
use timeswitch_core::input::KeySet;
use timeswitch_drivers::lcd::{CursorStyle, Hd44780, LcdPins};
use timeswitch_drivers::rtc::Ds3231;
use timeswitch_drivers::twi::{TwiConfig, TwiMaster, WaitPolicy};
use timeswitch_hal::InputPin;
use timeswitch_hal_avr::{Atmega8Twi, BusyDelay, Pin};

/// Settings from timeswitch.toml
mod config {
    use timeswitch_core::config::UiConfig;
    use timeswitch_hal::Prescaler;
    use timeswitch_hal_avr::{PinSpec, Port};

    include!(concat!(env!("OUT_DIR"), "/config.rs"));
}

/// Time for the clock and the display to come out of reset
const POWER_UP_MS: u32 = 100;

fn bus_config() -> TwiConfig {
    let wait = match config::BUS_MAX_POLLS {
        0 => WaitPolicy::Spin,
        max_polls => WaitPolicy::Bounded { max_polls },
    };
    TwiConfig {
        bit_rate: config::BUS_BIT_RATE,
        prescaler: config::BUS_PRESCALER,
        wait,
    }
}

#[avr_device::entry]
fn main() -> ! {
    let mut delay = BusyDelay::new(config::CPU_HZ);

    // SAFETY: the entry point runs once and is the only place hardware
    // handles are created; every pin in the config is distinct.
    let (dp, keys, lcd_pins) = unsafe {
        let keys = config::KEY_PINS.map(|spec| Pin::pull_up_input(spec));
        let lcd_pins = LcdPins {
            data: config::LCD_DATA_PINS.map(|spec| Pin::output(spec)),
            rs: Pin::output(config::LCD_RS),
            rw: Pin::output(config::LCD_RW),
            enable: Pin::output(config::LCD_ENABLE),
        };
        (Peripherals::steal(), keys, lcd_pins)
    };

    let bus = TwiMaster::new(Atmega8Twi::new(dp.TWI), bus_config()).initialize();
    let mut rtc = Ds3231::new(bus);

    delay.delay_ms(POWER_UP_MS);

    let mut lcd = Hd44780::new(lcd_pins, delay);
    lcd.init(CursorStyle::Blink);

    // A missing clock shows up as "Clock Error" on the first tick
    let _ = rtc.init();

    let mut app = App::new(config::UI);
    loop {
        let [left, right, enter] = &keys;
        let held = KeySet::from_levels(left.is_low(), right.is_low(), enter.is_low());

        // Failures are already on screen; the next tick retries
        let _ = app.tick(held, &mut rtc, &mut lcd);

        delay.delay_ms(config::UI.tick_ms as u32);
    }
}
