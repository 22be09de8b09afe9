//! Shift-register 7-segment desk clock.
//!
//! Reads a DS1307 RTC over I2C, drives six 7-segment digits through a
//! 74HC595 chain, adjusts the clock with three buttons, and plays an hourly
//! chime through a DFPlayer Mini while the room is lit.

#![no_std]
#![no_main]

// Application descriptor for the bootloader.
esp_bootloader_esp_idf::esp_app_desc!();

// Module imports
use chimeclock::{
    clock::TimeOfDay,
    dfplayer::{Command, DfPlayer},
    display::TimeDisplay,
    input::{handle_button_generic, ButtonState},
    rtc_ds1307::Ds1307,
    shift_register::{ShiftRegister, DEFAULT_BIT_DELAY_US},
    wiring::{init_board_pins, BoardPins},
};

// Core imports
use core::sync::atomic::{AtomicBool, Ordering};
use esp_backtrace as _;

// ESP-HAL imports
use esp_hal::{
    analog::adc::{Adc, AdcConfig, Attenuation},
    delay::Delay,
    handler,
    i2c::master::{Config as I2cConfig, I2c},
    main, ram,
    time::Rate,
    timer::systimer::{SystemTimer, Unit},
    uart::{Config as UartConfig, UartTx},
    Config,
};

use esp_println::println;

// Button press flags, set in the interrupt handler, drained by the loop.
static HOURS_PRESSED: AtomicBool = AtomicBool::new(false);
static MINUTES_PRESSED: AtomicBool = AtomicBool::new(false);
static ZERO_PRESSED: AtomicBool = AtomicBool::new(false);

// Shared resources for the buttons
static BTN_HOURS: ButtonState<'static> = ButtonState::new("hours");
static BTN_MINUTES: ButtonState<'static> = ButtonState::new("minutes");
static BTN_ZERO: ButtonState<'static> = ButtonState::new("zero");

// Button debounce time (milliseconds)
const DEBOUNCE_MS: u64 = 240;

// Control loop period (milliseconds)
const TICK_MS: u32 = 200;

// Ambient-light gate for the chime. The sensor reads 0 in a dark room; any
// reading above this counts as lit.
const LIGHT_GATE: u16 = 0;

// Chime track: folder 01, file 002 on the player's card.
const CHIME: Command = Command::PlayFolderTrack {
    folder: 1,
    track: 2,
};

fn now_ms() -> u64 {
    let t = SystemTimer::unit_value(Unit::Unit0);
    t.saturating_mul(1000) / SystemTimer::ticks_per_second()
}

// Interrupt handler: debounce the buttons, set the flags, nothing else
#[handler]
#[ram]
fn handler() {
    let now = now_ms();

    handle_button_generic(&BTN_HOURS, now, DEBOUNCE_MS, || {
        HOURS_PRESSED.store(true, Ordering::Relaxed);
    });

    handle_button_generic(&BTN_MINUTES, now, DEBOUNCE_MS, || {
        MINUTES_PRESSED.store(true, Ordering::Relaxed);
    });

    handle_button_generic(&BTN_ZERO, now, DEBOUNCE_MS, || {
        ZERO_PRESSED.store(true, Ordering::Relaxed);
    });
}

#[main]
fn main() -> ! {
    // Initialize peripherals
    let peripherals = esp_hal::init(Config::default());

    // one call gives you the IO handler + all role pins from wiring.rs
    let (mut io, pins, rtc_bus, audio, light) = init_board_pins(peripherals);

    let BoardPins {
        btn_hours,
        btn_minutes,
        btn_zero,
        display: display_pins,
    } = pins;

    // Stash the button pins in shared state before enabling the handler
    critical_section::with(|cs| {
        BTN_HOURS.input.borrow_ref_mut(cs).replace(btn_hours);
        BTN_MINUTES.input.borrow_ref_mut(cs).replace(btn_minutes);
        BTN_ZERO.input.borrow_ref_mut(cs).replace(btn_zero);
    });
    io.set_interrupt_handler(handler);

    // -------------------- Display --------------------
    let shift = ShiftRegister::new(
        display_pins.data,
        display_pins.clock,
        display_pins.latch,
        Delay::new(),
        DEFAULT_BIT_DELAY_US,
    );
    let mut display = TimeDisplay::new(shift);
    // Pin writes are infallible on this target
    display.clear().ok();

    // -------------------- RTC --------------------
    let i2c = I2c::new(
        rtc_bus.i2c0,
        I2cConfig::default().with_frequency(Rate::from_khz(100)),
    )
    .expect("I2C init failed")
    .with_sda(rtc_bus.sda)
    .with_scl(rtc_bus.scl);
    let mut rtc = Ds1307::new(i2c);

    // -------------------- DFPlayer --------------------
    let tx = UartTx::new(audio.uart1, UartConfig::default().with_baudrate(9600))
        .expect("UART init failed")
        .with_tx(audio.tx);
    let mut player = DfPlayer::new(tx);

    // -------------------- Light sensor --------------------
    let mut adc_config = AdcConfig::new();
    let mut light_pin = adc_config.enable_pin(light.sense, Attenuation::_11dB);
    let mut adc = Adc::new(light.adc1, adc_config);

    // -------------------- Boot time --------------------
    // The RTC keeps running on its backup cell while the board is off. A
    // halted oscillator or garbage fields means the cell died; start over
    // from midnight and restart the chip.
    let mut time = match rtc.read_time() {
        Ok((t, false)) if t.is_valid() => t,
        Ok(_) => {
            println!("RTC halted or invalid, starting from 00:00:00");
            if rtc.set_time(&TimeOfDay::MIDNIGHT).is_err() {
                println!("RTC write failed");
            }
            TimeOfDay::MIDNIGHT
        }
        Err(e) => {
            println!("RTC read failed: {:?}", e);
            TimeOfDay::MIDNIGHT
        }
    };

    println!(
        "clock up at {:02}:{:02}:{:02}",
        time.hours, time.minutes, time.seconds
    );

    let delay = Delay::new();
    let mut last_chimed_hour: Option<u8> = None;

    // -------------------- Main loop --------------------
    loop {
        // Apply pending button presses before redrawing; each one writes the
        // RTC so the adjustment survives a power cycle.
        let mut adjusted = false;
        if HOURS_PRESSED.swap(false, Ordering::Acquire) {
            time = time.bump_hour();
            adjusted = true;
        }
        if MINUTES_PRESSED.swap(false, Ordering::Acquire) {
            time = time.bump_minute();
            adjusted = true;
        }
        if ZERO_PRESSED.swap(false, Ordering::Acquire) {
            time = time.zero_seconds();
            adjusted = true;
        }
        if adjusted {
            println!(
                "set {:02}:{:02}:{:02}",
                time.hours, time.minutes, time.seconds
            );
            if rtc.set_time(&time).is_err() {
                println!("RTC write failed");
            }
        }

        // The RTC is the time authority; on a glitched read keep showing the
        // last good value.
        match rtc.read_time() {
            Ok((t, false)) if t.is_valid() => time = t,
            Ok(_) => {}
            Err(e) => println!("RTC read failed: {:?}", e),
        }

        display.refresh(time).ok();

        // Hourly chime, gated on ambient light, at most once per boundary
        // (the loop revisits second 0 a few times per tick period).
        let light_raw: u16 = nb::block!(adc.read_oneshot(&mut light_pin)).unwrap_or(0);
        if time.at_hour_boundary()
            && light_raw > LIGHT_GATE
            && last_chimed_hour != Some(time.hours)
        {
            last_chimed_hour = Some(time.hours);
            println!("chime at {:02}:00", time.hours);
            if player.send(CHIME).is_err() {
                println!("DFPlayer write failed");
            }
        }

        delay.delay_millis(TICK_MS);
    }
}
