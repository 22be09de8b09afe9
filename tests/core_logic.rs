//! On-target test suite for the display and clock core.
//!
//! You can run this using `cargo test` as usual (probe-rs runner). Nothing
//! here touches board wiring; the drivers are exercised through recording
//! fakes implementing the embedded-hal traits.

#![no_std]
#![no_main]

esp_bootloader_esp_idf::esp_app_desc!();

#[cfg(test)]
#[embedded_test::tests]
mod tests {
    use core::cell::RefCell;
    use core::convert::Infallible;

    use defmt::{assert, assert_eq};
    use embedded_hal::delay::DelayNs;
    use embedded_hal::digital::{ErrorType, OutputPin};
    use heapless::Vec;

    use chimeclock::clock::{split, TimeOfDay};
    use chimeclock::dfplayer::{command_frame, Command};
    use chimeclock::display::TimeDisplay;
    use chimeclock::rtc_ds1307::{bcd_decode, bcd_encode};
    use chimeclock::segments::DIGIT_SEGMENTS;
    use chimeclock::shift_register::ShiftRegister;

    #[init]
    fn init() {
        let _ = esp_hal::init(esp_hal::Config::default());

        rtt_target::rtt_init_defmt!();
    }

    // ---------------- recording fakes ----------------

    /// Everything observable on the three lines: the data level sampled at
    /// each shift-clock rising edge, and the latch pulse count.
    struct Trace {
        data_level: bool,
        bits: Vec<bool, 128>,
        latches: usize,
    }

    impl Trace {
        fn new() -> RefCell<Self> {
            RefCell::new(Self {
                data_level: false,
                bits: Vec::new(),
                latches: 0,
            })
        }
    }

    struct DataLine<'a>(&'a RefCell<Trace>);
    struct ClockLine<'a>(&'a RefCell<Trace>);
    struct LatchLine<'a>(&'a RefCell<Trace>);
    struct NoDelay;

    impl ErrorType for DataLine<'_> {
        type Error = Infallible;
    }
    impl OutputPin for DataLine<'_> {
        fn set_low(&mut self) -> Result<(), Infallible> {
            self.0.borrow_mut().data_level = false;
            Ok(())
        }
        fn set_high(&mut self) -> Result<(), Infallible> {
            self.0.borrow_mut().data_level = true;
            Ok(())
        }
    }

    impl ErrorType for ClockLine<'_> {
        type Error = Infallible;
    }
    impl OutputPin for ClockLine<'_> {
        fn set_low(&mut self) -> Result<(), Infallible> {
            Ok(())
        }
        // The register samples the data line on the rising edge
        fn set_high(&mut self) -> Result<(), Infallible> {
            let mut trace = self.0.borrow_mut();
            let level = trace.data_level;
            let _ = trace.bits.push(level);
            Ok(())
        }
    }

    impl ErrorType for LatchLine<'_> {
        type Error = Infallible;
    }
    impl OutputPin for LatchLine<'_> {
        fn set_low(&mut self) -> Result<(), Infallible> {
            Ok(())
        }
        fn set_high(&mut self) -> Result<(), Infallible> {
            self.0.borrow_mut().latches += 1;
            Ok(())
        }
    }

    impl DelayNs for NoDelay {
        fn delay_ns(&mut self, _ns: u32) {}
    }

    fn rig(
        trace: &RefCell<Trace>,
    ) -> ShiftRegister<DataLine<'_>, ClockLine<'_>, LatchLine<'_>, NoDelay> {
        ShiftRegister::new(DataLine(trace), ClockLine(trace), LatchLine(trace), NoDelay, 0)
    }

    fn bytes_from_bits(bits: &[bool]) -> Vec<u8, 16> {
        let mut out = Vec::new();
        for chunk in bits.chunks(8) {
            let mut byte = 0u8;
            for &bit in chunk {
                byte = (byte << 1) | (bit as u8);
            }
            let _ = out.push(byte);
        }
        out
    }

    // ---------------- digit encoder ----------------

    #[test]
    fn digit_table_is_canonical() {
        let expected: [u8; 10] = [
            0xC0, 0xF9, 0xA4, 0xB0, 0x99, 0x92, 0x82, 0xF8, 0x80, 0x90,
        ];
        for digit in 0..10u8 {
            assert_eq!(
                chimeclock::segments::pattern(digit),
                expected[digit as usize]
            );
        }
        assert_eq!(DIGIT_SEGMENTS, expected);
    }

    // ---------------- splitter ----------------

    #[test]
    fn split_matches_integer_division() {
        assert_eq!(split(47), (4, 7));
        assert_eq!(split(0), (0, 0));
        assert_eq!(split(9), (0, 9));
        for value in 0..=99u8 {
            assert_eq!(split(value), (value / 10, value % 10));
        }
    }

    // ---------------- shift driver ----------------

    #[test]
    fn send_byte_shifts_msb_first() {
        let trace = Trace::new();
        let mut shift = rig(&trace);

        shift.send_byte(0b1011_0000).unwrap();

        let t = trace.borrow();
        assert_eq!(
            t.bits.as_slice(),
            &[true, false, true, true, false, false, false, false][..]
        );
        // Shifting alone never touches the outputs
        assert_eq!(t.latches, 0);
    }

    // ---------------- refresh orchestration ----------------

    #[test]
    fn refresh_transmits_six_bytes_then_latches_once() {
        let trace = Trace::new();
        let mut display = TimeDisplay::new(rig(&trace));

        display.refresh(TimeOfDay::new(1, 23, 45)).unwrap();

        let t = trace.borrow();
        let bytes = bytes_from_bits(&t.bits);
        assert_eq!(
            bytes.as_slice(),
            &[
                DIGIT_SEGMENTS[0],
                DIGIT_SEGMENTS[1],
                DIGIT_SEGMENTS[2],
                DIGIT_SEGMENTS[3],
                DIGIT_SEGMENTS[4],
                DIGIT_SEGMENTS[5],
            ][..]
        );
        assert_eq!(t.latches, 1);
    }

    #[test]
    fn refresh_of_midnight_repeats_digit_zero() {
        let trace = Trace::new();
        let mut display = TimeDisplay::new(rig(&trace));

        display.refresh(TimeOfDay::MIDNIGHT).unwrap();

        let t = trace.borrow();
        let bytes = bytes_from_bits(&t.bits);
        assert_eq!(bytes.as_slice(), &[DIGIT_SEGMENTS[0]; 6][..]);
        assert_eq!(t.latches, 1);
    }

    #[test]
    fn refresh_is_stateless() {
        let trace = Trace::new();
        let mut display = TimeDisplay::new(rig(&trace));
        let time = TimeOfDay::new(19, 8, 30);

        display.refresh(time).unwrap();
        display.refresh(time).unwrap();

        let t = trace.borrow();
        assert_eq!(t.bits.len(), 96);
        assert_eq!(&t.bits[..48], &t.bits[48..]);
        assert_eq!(t.latches, 2);
    }

    // ---------------- time-of-day operations ----------------

    #[test]
    fn button_operations_wrap_their_own_field() {
        let t = TimeOfDay::new(23, 59, 58);
        assert!(t.bump_hour() == TimeOfDay::new(0, 59, 58));
        assert!(t.bump_minute() == TimeOfDay::new(23, 0, 58));
        assert!(t.zero_seconds() == TimeOfDay::new(23, 59, 0));

        assert_eq!(TimeOfDay::new(1, 23, 45).digits(), [0, 1, 2, 3, 4, 5]);

        assert!(TimeOfDay::new(0, 0, 0).at_hour_boundary());
        assert!(!TimeOfDay::new(0, 0, 1).at_hour_boundary());
        assert!(!TimeOfDay::new(0, 1, 0).at_hour_boundary());

        assert!(TimeOfDay::new(23, 59, 59).is_valid());
        assert!(!TimeOfDay::new(24, 0, 0).is_valid());
        assert!(!TimeOfDay::new(0, 60, 0).is_valid());
    }

    // ---------------- BCD codec ----------------

    #[test]
    fn bcd_codec_round_trips() {
        for value in 0..60u8 {
            assert_eq!(bcd_decode(bcd_encode(value)), value);
        }
        assert_eq!(bcd_encode(45), 0x45);
        assert_eq!(bcd_decode(0x59), 59);
    }

    // ---------------- DFPlayer frames ----------------

    #[test]
    fn dfplayer_frames_match_the_module_protocol() {
        assert_eq!(
            command_frame(Command::PlayFolderTrack {
                folder: 1,
                track: 2
            }),
            [0x7E, 0xFF, 0x06, 0x0F, 0x00, 0x01, 0x02, 0xFE, 0xE9, 0xEF]
        );
        assert_eq!(
            command_frame(Command::Next),
            [0x7E, 0xFF, 0x06, 0x01, 0x00, 0x00, 0x00, 0xFE, 0xFA, 0xEF]
        );
        assert_eq!(
            command_frame(Command::Previous),
            [0x7E, 0xFF, 0x06, 0x02, 0x00, 0x00, 0x00, 0xFE, 0xF9, 0xEF]
        );
    }
}
