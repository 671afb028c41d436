//! Shared integer literal parsing
//!
//! Every numeric field in the source (directive fields, `data` values and
//! `immd` nibbles) goes through `parse_int`. Literals are base-10 and may carry
//! a sign. Two ranges exist:
//!
//! - **Nibble**: `0 <= v < 16`, used by the `immd` operand
//! - **Byte**: `-127 <= v < 256`; negative values are stored in two's
//!   complement form (`v mod 256`), so `-56` and `200` are the same byte

use std::num::IntErrorKind;

use crate::assembler::error::AssemblerError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IntMode {
    Nibble,
    Byte,
}

impl IntMode {
    /// Inclusive lower and exclusive upper bound
    pub const fn bounds(self) -> (i64, i64) {
        match self {
            IntMode::Nibble => (0, 16),
            IntMode::Byte => (-127, 256),
        }
    }
}

/// Parse a decimal literal and validate it against `mode`
pub fn parse_int(text: &str, mode: IntMode, line: usize) -> Result<u8, AssemblerError> {
    let (min, max) = mode.bounds();
    let value = match text.parse::<i64>() {
        Ok(value) => value,
        Err(e) => {
            return Err(match e.kind() {
                IntErrorKind::PosOverflow => AssemblerError::RangeError(i64::MAX, min, max, line),
                IntErrorKind::NegOverflow => AssemblerError::RangeError(i64::MIN, min, max, line),
                _ => AssemblerError::SyntaxError(
                    format!("invalid integer literal '{}'", text),
                    line,
                ),
            })
        }
    };

    if !(min <= value && value < max) {
        return Err(AssemblerError::RangeError(value, min, max, line));
    }

    // Two's complement normalization: -127..-1 map onto 129..255
    Ok(value.rem_euclid(256) as u8)
}
