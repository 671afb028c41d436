// Positioning directives
// `ADDR:` moves the instruction pointer, `BANK:ADDR:` moves bank and pointer

use crate::assembler::error::AssemblerError;
use crate::assembler::normalizer::SourceLine;
use crate::assembler::numbers::{parse_int, IntMode};

pub const FIELD_SEPARATOR: char = ':';

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Directive {
    Address(u8),
    BankAddress(u8, u8), // bank, address
}

/// Where the next encoded byte will be placed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Position {
    pub bank: u8,
    pub ip: u8,
}

impl Position {
    pub fn new(bank: u8, ip: u8) -> Self {
        Position { bank, ip }
    }

    pub fn apply(&mut self, directive: Directive) {
        match directive {
            Directive::Address(ip) => self.ip = ip,
            Directive::BankAddress(bank, ip) => {
                self.bank = bank;
                self.ip = ip;
            }
        }
    }
}

pub fn is_directive(line: &SourceLine) -> bool {
    line.text.contains(FIELD_SEPARATOR)
}

/// Parse a directive line. The final field must be the empty marker left by
/// the trailing colon, so only `ADDR:` and `BANK:ADDR:` are accepted.
pub fn parse_directive(line: &SourceLine) -> Result<Directive, AssemblerError> {
    let fields: Vec<&str> = line.text.split(FIELD_SEPARATOR).map(str::trim).collect();

    let (marker, values) = match fields.split_last() {
        Some(split) => split,
        None => {
            return Err(AssemblerError::SyntaxError(
                "empty directive".to_string(),
                line.number,
            ))
        }
    };

    if !marker.is_empty() {
        return Err(AssemblerError::SyntaxError(
            format!("directive '{}' must end with '{}'", line.text, FIELD_SEPARATOR),
            line.number,
        ));
    }

    match values {
        [address] => Ok(Directive::Address(parse_int(
            address,
            IntMode::Byte,
            line.number,
        )?)),
        [bank, address] => Ok(Directive::BankAddress(
            parse_int(bank, IntMode::Byte, line.number)?,
            parse_int(address, IntMode::Byte, line.number)?,
        )),
        _ => Err(AssemblerError::SyntaxError(
            format!(
                "directive '{}' has {} fields, expected ADDR: or BANK:ADDR:",
                line.text,
                fields.len()
            ),
            line.number,
        )),
    }
}
