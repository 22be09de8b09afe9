//! Display refresh orchestration for the six-digit 7-segment module.

use embedded_hal::delay::DelayNs;
use embedded_hal::digital::OutputPin;

use crate::clock::TimeOfDay;
use crate::segments;
use crate::shift_register::ShiftRegister;

/// Digits in the chain, one shift-register byte each.
pub const DIGITS: usize = 6;

/// Six-digit display on a daisy-chained shift register.
///
/// The chain is wired leftmost digit first, so a frame goes out in display
/// order: hour tens down to second ones, then one latch pulse.
pub struct TimeDisplay<DATA, CLK, LATCH, D> {
    shift: ShiftRegister<DATA, CLK, LATCH, D>,
}

impl<DATA, CLK, LATCH, D, E> TimeDisplay<DATA, CLK, LATCH, D>
where
    DATA: OutputPin<Error = E>,
    CLK: OutputPin<Error = E>,
    LATCH: OutputPin<Error = E>,
    D: DelayNs,
{
    pub fn new(shift: ShiftRegister<DATA, CLK, LATCH, D>) -> Self {
        Self { shift }
    }

    /// Redraw the whole display from a time value.
    ///
    /// Stateless transmit pipeline: split into digits, encode, shift all six
    /// bytes, latch once. Latching only after the final byte keeps partial
    /// frames off the glass.
    pub fn refresh(&mut self, time: TimeOfDay) -> Result<(), E> {
        for digit in time.digits() {
            self.shift.send_byte(segments::pattern(digit))?;
        }
        self.shift.latch()
    }

    /// Blank all six digits. Used at power-on so the glass shows nothing
    /// until the first RTC read lands.
    pub fn clear(&mut self) -> Result<(), E> {
        for _ in 0..DIGITS {
            self.shift.send_byte(segments::BLANK)?;
        }
        self.shift.latch()
    }
}
