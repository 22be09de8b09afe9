//! Bit-banged driver for a chain of serial-in/parallel-out shift registers
//! (74HC595-class: one data line, one shift clock, one latch clock).
//!
//! Bytes are shifted in most significant bit first. Nothing reaches the
//! output drivers until `latch` pulses the storage clock, so a whole frame
//! can be clocked through the chain without intermediate bit states ever
//! becoming visible.

use embedded_hal::delay::DelayNs;
use embedded_hal::digital::OutputPin;

/// Default data settle / clock hold time, in microseconds.
pub const DEFAULT_BIT_DELAY_US: u32 = 1;

/// Driver over three output lines and a delay source.
///
/// The lines are owned exclusively for the lifetime of the driver; no other
/// code may drive them.
pub struct ShiftRegister<DATA, CLK, LATCH, D> {
    data: DATA,
    clock: CLK,
    latch: LATCH,
    delay: D,
    bit_delay_us: u32,
}

impl<DATA, CLK, LATCH, D, E> ShiftRegister<DATA, CLK, LATCH, D>
where
    DATA: OutputPin<Error = E>,
    CLK: OutputPin<Error = E>,
    LATCH: OutputPin<Error = E>,
    D: DelayNs,
{
    /// `bit_delay_us` is the settle/hold time between line transitions.
    /// 74HC595-class parts are comfortable at 1 us; long or unbuffered
    /// wiring may need more, so it is a parameter rather than a constant.
    pub fn new(data: DATA, clock: CLK, latch: LATCH, delay: D, bit_delay_us: u32) -> Self {
        Self {
            data,
            clock,
            latch,
            delay,
            bit_delay_us,
        }
    }

    /// Shift one byte into the chain, MSB first.
    ///
    /// Per bit: data line to the bit's value, settle, shift clock high,
    /// hold, shift clock low. The data line must be stable before the
    /// rising clock edge; that ordering is what the settle delay buys.
    pub fn send_byte(&mut self, value: u8) -> Result<(), E> {
        for bit in 0..8 {
            if value & (0x80 >> bit) != 0 {
                self.data.set_high()?;
            } else {
                self.data.set_low()?;
            }
            self.delay.delay_us(self.bit_delay_us);
            self.clock.set_high()?;
            self.delay.delay_us(self.bit_delay_us);
            self.clock.set_low()?;
        }
        Ok(())
    }

    /// Copy the shifted bits to the output drivers in one pulse.
    ///
    /// This is the only point at which the chain's outputs change.
    pub fn latch(&mut self) -> Result<(), E> {
        self.latch.set_high()?;
        self.delay.delay_us(self.bit_delay_us);
        self.latch.set_low()?;
        Ok(())
    }
}
