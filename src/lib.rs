#![no_std]

pub mod clock;
pub mod dfplayer;
pub mod display;
pub mod input;
pub mod rtc_ds1307;
pub mod segments;
pub mod shift_register;
pub mod wiring;
