//! DFPlayer Mini serial control.
//!
//! The player speaks a fixed 10-byte frame over UART at 9600 baud:
//! `7E FF 06 CMD FB PH PL CKH CKL EF`, where the 16-bit checksum is the
//! two's complement of the sum of bytes 1..=6. Commands here are
//! fire-and-forget; the feedback/ACK channel of the module is not wired.

use esp_hal::uart::{TxError, UartTx};
use esp_hal::Blocking;

/// Wire length of every DFPlayer command.
pub const FRAME_LEN: usize = 10;

const START: u8 = 0x7E;
const VERSION: u8 = 0xFF;
const LENGTH: u8 = 0x06;
const NO_FEEDBACK: u8 = 0x00;
const END: u8 = 0xEF;

/// Playback commands understood by the module.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Command {
    /// Skip to the next track.
    Next,
    /// Skip back to the previous track.
    Previous,
    /// Play one track out of a numbered folder on the card ("01".."99",
    /// files "001".."255").
    PlayFolderTrack { folder: u8, track: u8 },
}

impl Command {
    fn opcode(self) -> u8 {
        match self {
            Command::Next => 0x01,
            Command::Previous => 0x02,
            Command::PlayFolderTrack { .. } => 0x0F,
        }
    }

    fn param(self) -> u16 {
        match self {
            Command::Next | Command::Previous => 0,
            Command::PlayFolderTrack { folder, track } => {
                ((folder as u16) << 8) | track as u16
            }
        }
    }
}

/// Build the full wire frame for a command.
pub fn command_frame(cmd: Command) -> [u8; FRAME_LEN] {
    let param = cmd.param();
    let payload = [
        VERSION,
        LENGTH,
        cmd.opcode(),
        NO_FEEDBACK,
        (param >> 8) as u8,
        param as u8,
    ];
    let sum = payload.iter().map(|&b| b as u16).sum::<u16>();
    let checksum = 0u16.wrapping_sub(sum);
    [
        START,
        payload[0],
        payload[1],
        payload[2],
        payload[3],
        payload[4],
        payload[5],
        (checksum >> 8) as u8,
        checksum as u8,
        END,
    ]
}

/// Handle over a TX-only UART to the player.
pub struct DfPlayer<'a> {
    tx: UartTx<'a, Blocking>,
}

impl<'a> DfPlayer<'a> {
    pub fn new(tx: UartTx<'a, Blocking>) -> Self {
        Self { tx }
    }

    /// Send one command frame, blocking until it is fully queued.
    pub fn send(&mut self, cmd: Command) -> Result<(), TxError> {
        let frame = command_frame(cmd);
        let mut rest: &[u8] = &frame;
        while !rest.is_empty() {
            let written = self.tx.write(rest)?;
            rest = &rest[written..];
        }
        self.tx.flush()
    }
}
