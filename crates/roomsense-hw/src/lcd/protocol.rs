//! HD44780 protocol encoding for the PCF8574 I2C backpack.
//!
//! Backpack wiring:
//! - P0: RS (0 = command, 1 = data)
//! - P1: RW (held low, write-only)
//! - P2: EN (strobed high then low to latch a nibble)
//! - P3: backlight
//! - P4-P7: data nibble
//!
//! The controller runs in 4-bit mode: every byte is sent high nibble first,
//! each nibble as an EN-high/EN-low pair, so one byte expands to four bus
//! writes.

use crate::{LCD_COLS, LCD_ROWS};

/// Register-select bit (data register).
pub const RS_DATA: u8 = 0x01;

/// Enable strobe bit.
pub const ENABLE: u8 = 0x04;

/// Backlight bit (always kept on).
pub const BACKLIGHT: u8 = 0x08;

/// Clear display command.
pub const CMD_CLEAR: u8 = 0x01;

/// Function set: 4-bit bus, two rows, 5x8 font.
pub const CMD_FUNCTION_SET: u8 = 0x28;

/// Display on, cursor off, blink off.
pub const CMD_DISPLAY_ON: u8 = 0x0C;

/// Entry mode: increment cursor, no shift.
pub const CMD_ENTRY_MODE: u8 = 0x06;

/// Set DDRAM address command base.
pub const CMD_SET_DDRAM: u8 = 0x80;

/// DDRAM base addresses of the two rows.
const ROW_OFFSETS: [u8; LCD_ROWS] = [0x00, 0x40];

/// Expands one nibble into its EN-high/EN-low strobe pair.
fn strobe_pair(nibble: u8, flags: u8) -> [u8; 2] {
    let base = (nibble << 4) | flags | BACKLIGHT;
    [base | ENABLE, base]
}

/// Encodes one byte as the four bus writes of 4-bit mode.
pub fn encode_byte(value: u8, data: bool) -> [u8; 4] {
    let flags = if data { RS_DATA } else { 0 };
    let [h1, h2] = strobe_pair(value >> 4, flags);
    let [l1, l2] = strobe_pair(value & 0x0F, flags);
    [h1, h2, l1, l2]
}

/// Returns the DDRAM set-address command for a row.
pub fn row_address(row: usize) -> u8 {
    CMD_SET_DDRAM | ROW_OFFSETS[row.min(ROW_OFFSETS.len() - 1)]
}

/// Pads or truncates a line to the display width, replacing non-ASCII
/// characters (the HD44780 ROM is ASCII-ish beyond 0x7F).
pub fn pad_line(text: &str) -> [u8; LCD_COLS] {
    let mut out = [b' '; LCD_COLS];
    for (slot, ch) in out.iter_mut().zip(text.chars()) {
        *slot = if ch.is_ascii() { ch as u8 } else { b'?' };
    }
    out
}

/// Encodes a full row write: set the row address, then 16 padded characters.
pub fn encode_line(row: usize, text: &str) -> Vec<u8> {
    let mut out = Vec::with_capacity(4 * (1 + LCD_COLS));
    out.extend_from_slice(&encode_byte(row_address(row), false));
    for byte in pad_line(text) {
        out.extend_from_slice(&encode_byte(byte, true));
    }
    out
}

/// The 4-bit-mode initialization sequence, as raw bus writes.
///
/// Three 8-bit function-set strobes settle the interface, a fourth switches to
/// 4-bit mode, then the usual function set / display on / clear / entry mode.
pub fn init_sequence() -> Vec<u8> {
    let mut out = Vec::new();
    for _ in 0..3 {
        out.extend_from_slice(&strobe_pair(0x03, 0));
    }
    out.extend_from_slice(&strobe_pair(0x02, 0));
    for cmd in [CMD_FUNCTION_SET, CMD_DISPLAY_ON, CMD_CLEAR, CMD_ENTRY_MODE] {
        out.extend_from_slice(&encode_byte(cmd, false));
    }
    out
}
