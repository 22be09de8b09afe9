// This module handles board-specific pin mappings and initialization.
// Profiles are selected via Cargo features; the default profile matches the
// soldered clock board, "devkit" matches a bare ESP32-S3 devkit on a
// breadboard with the same peripherals.
//! The following wiring is assumed (default profile):
//! - Shift register DS (serial data) => GPIO4
//! - Shift register SHCP (shift clock) => GPIO5
//! - Shift register STCP (latch clock) => GPIO6
//! - HOURS button => GPIO15
//! - MINUTES button => GPIO16
//! - ZERO button => GPIO21
//! - DS1307 SDA => GPIO8, SCL => GPIO9
//! - DFPlayer RX <= GPIO17 (UART1 TX, 9600 baud)
//! - TEMT6000 light sensor => GPIO1 (ADC1)
//! Buttons connect to GND when pressed (internal pull-ups enabled).

use esp_backtrace as _;
use esp_hal::gpio::{Event, Input, InputConfig, Io, Level, Output, OutputConfig, Pull};
use esp_hal::peripherals::{Peripherals, ADC1, GPIO1, GPIO17, GPIO8, GPIO9, I2C0, UART1};

/// The three lines of the 74HC595 chain.
pub struct DisplayPins<'a> {
    pub data: Output<'a>,
    pub clock: Output<'a>,
    pub latch: Output<'a>,
}

pub struct BoardPins<'a> {
    pub btn_hours: Input<'a>,
    pub btn_minutes: Input<'a>,
    pub btn_zero: Input<'a>,
    pub display: DisplayPins<'a>,
}

/// I2C peripheral + pins for the RTC bus.
pub struct RtcBus<'a> {
    pub i2c0: I2C0<'a>,
    pub sda: GPIO8<'a>,
    pub scl: GPIO9<'a>,
}

/// UART peripheral + TX pin for the DFPlayer.
pub struct AudioPins<'a> {
    pub uart1: UART1<'a>,
    pub tx: GPIO17<'a>,
}

/// ADC peripheral + sense pin for the light sensor.
pub struct LightPins<'a> {
    pub adc1: ADC1<'a>,
    pub sense: GPIO1<'a>,
}

// Default profile
#[cfg(all(feature = "esp32s3", not(feature = "devkit")))]
pub fn init_board_pins<'a>(
    p: Peripherals,
) -> (Io<'a>, BoardPins<'a>, RtcBus<'a>, AudioPins<'a>, LightPins<'a>) {
    let io = Io::new(p.IO_MUX);

    // shift register lines, all idle low
    let data = Output::new(p.GPIO4, Level::Low, OutputConfig::default());
    let clock = Output::new(p.GPIO5, Level::Low, OutputConfig::default());
    let latch = Output::new(p.GPIO6, Level::Low, OutputConfig::default());

    // buttons
    let mut btn_hours = Input::new(p.GPIO15, InputConfig::default().with_pull(Pull::Up));
    let mut btn_minutes = Input::new(p.GPIO16, InputConfig::default().with_pull(Pull::Up));
    let mut btn_zero = Input::new(p.GPIO21, InputConfig::default().with_pull(Pull::Up));
    btn_hours.listen(Event::AnyEdge);
    btn_minutes.listen(Event::AnyEdge);
    btn_zero.listen(Event::AnyEdge);

    (
        io,
        BoardPins {
            btn_hours,
            btn_minutes,
            btn_zero,
            display: DisplayPins { data, clock, latch },
        },
        RtcBus {
            i2c0: p.I2C0,
            sda: p.GPIO8,
            scl: p.GPIO9,
        },
        AudioPins {
            uart1: p.UART1,
            tx: p.GPIO17,
        },
        LightPins {
            adc1: p.ADC1,
            sense: p.GPIO1,
        },
    )
}

// Breadboard profile (enable with --features devkit)
#[cfg(feature = "devkit")]
pub fn init_board_pins<'a>(
    p: Peripherals,
) -> (Io<'a>, BoardPins<'a>, RtcBus<'a>, AudioPins<'a>, LightPins<'a>) {
    let io = Io::new(p.IO_MUX);

    let data = Output::new(p.GPIO10, Level::Low, OutputConfig::default());
    let clock = Output::new(p.GPIO11, Level::Low, OutputConfig::default());
    let latch = Output::new(p.GPIO12, Level::Low, OutputConfig::default());

    let mut btn_hours = Input::new(p.GPIO0, InputConfig::default().with_pull(Pull::Up));
    let mut btn_minutes = Input::new(p.GPIO2, InputConfig::default().with_pull(Pull::Up));
    let mut btn_zero = Input::new(p.GPIO14, InputConfig::default().with_pull(Pull::Up));
    btn_hours.listen(Event::AnyEdge);
    btn_minutes.listen(Event::AnyEdge);
    btn_zero.listen(Event::AnyEdge);

    // RTC, DFPlayer and light sensor keep the soldered-board mapping so the
    // firmware is identical across profiles.
    (
        io,
        BoardPins {
            btn_hours,
            btn_minutes,
            btn_zero,
            display: DisplayPins { data, clock, latch },
        },
        RtcBus {
            i2c0: p.I2C0,
            sda: p.GPIO8,
            scl: p.GPIO9,
        },
        AudioPins {
            uart1: p.UART1,
            tx: p.GPIO17,
        },
        LightPins {
            adc1: p.ADC1,
            sense: p.GPIO1,
        },
    )
}
