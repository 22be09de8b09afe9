//! Input handling for the three setting buttons.
//!
//! Buttons are wired active-low with pull-ups and fire a GPIO interrupt on
//! any edge. The interrupt handler calls `handle_button_generic`, which
//! debounces falling edges and runs a callback; callbacks only set atomic
//! flags that the control loop consumes between display refreshes, so no
//! clock mutation ever interleaves with a refresh.
//!
//! All input state is protected with `critical_section` for safe access from
//! both interrupt and main contexts.

use esp_backtrace as _;

use core::cell::{Cell, RefCell};
use critical_section::Mutex;

use esp_hal::gpio::Input;

// Button state struct
pub struct ButtonState<'a> {
    pub input: Mutex<RefCell<Option<Input<'a>>>>,
    pub last_level: Mutex<Cell<bool>>,
    pub last_interrupt: Mutex<Cell<u64>>,
    pub name: &'static str,
}

impl ButtonState<'static> {
    pub const fn new(name: &'static str) -> Self {
        Self {
            input: Mutex::new(RefCell::new(None)),
            last_level: Mutex::new(Cell::new(true)),
            last_interrupt: Mutex::new(Cell::new(0)),
            name,
        }
    }
}

// Handle button press events
pub fn handle_button_generic(btn: &ButtonState, now_ms: u64, debounce_ms: u64, on_press: impl Fn()) {
    critical_section::with(|cs| {
        let mut binding = btn.input.borrow_ref_mut(cs);
        let Some(input) = binding.as_mut() else {
            return;
        };

        // Only act if this pin's interrupt is actually pending
        if !input.is_interrupt_set() {
            return;
        }
        input.clear_interrupt();

        // Falling edge detection against the previously seen level
        let level_is_low = input.is_low();
        let last_high = btn.last_level.borrow(cs).get();
        btn.last_level.borrow(cs).set(!level_is_low);

        if last_high && level_is_low {
            // Debounce: ignore edges that follow too closely
            let last_debounce = btn.last_interrupt.borrow(cs).get();
            if now_ms.saturating_sub(last_debounce) > debounce_ms {
                btn.last_interrupt.borrow(cs).set(now_ms);
                on_press();
            }
        }
    });
}
