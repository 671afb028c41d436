// Instruction Encoder
// Classifies each non-directive line once, then encodes it to a single byte

use crate::assembler::error::AssemblerError;
use crate::assembler::normalizer::SourceLine;
use crate::assembler::numbers::{parse_int, IntMode};
use crate::assembler::opcodes::{self, BankTarget, Register};

pub const DATA_MNEMONIC: &str = "data";

/// A classified source line ready for encoding
///
/// `prefix` holds the modifier bits (`+` = 0x80, `!` = 0x40) and `base` the
/// opcode table value; operand variants carry already validated operands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Statement {
    Data(u8),
    Bank {
        prefix: u8,
        target: BankTarget,
    },
    Immd {
        prefix: u8,
        value: u8,
    },
    BitOnto {
        prefix: u8,
        base: u8,
        src: Register,
        dest: Register,
    },
    RegisterArg {
        prefix: u8,
        base: u8,
        register: Register,
    },
    NoArg {
        prefix: u8,
        base: u8,
    },
}

impl Statement {
    /// Combine base, modifier and operand fields into the machine byte
    pub fn encode(&self) -> u8 {
        let value: u16 = match *self {
            Statement::Data(byte) => byte as u16,
            Statement::Bank { prefix, target } => {
                prefix as u16 + opcodes::BANK as u16 + target.operand_bits() as u16
            }
            Statement::Immd { prefix, value } => {
                prefix as u16 + opcodes::IMMD as u16 + value as u16
            }
            Statement::BitOnto {
                prefix,
                base,
                src,
                dest,
            } => prefix as u16 + base as u16 + ((dest.code() as u16) << 2) + src.code() as u16,
            Statement::RegisterArg {
                prefix,
                base,
                register,
            } => prefix as u16 + base as u16 + register.code() as u16,
            Statement::NoArg { prefix, base } => prefix as u16 + base as u16,
        };

        // Fields are disjoint so the sum always fits
        debug_assert!(value <= 0xff, "encoded value {:#x} exceeds a byte", value);
        (value & 0xff) as u8
    }
}

/// Split leading `+`/`-` and `!` modifiers off a mnemonic
///
/// No sign prefix behaves exactly like `-`.
fn strip_prefixes(mnemonic: &str) -> (u8, &str) {
    let mut prefix = 0;
    let mut rest = mnemonic;

    if let Some(stripped) = rest.strip_prefix('+') {
        prefix += opcodes::SIGN_BIT;
        rest = stripped;
    } else if let Some(stripped) = rest.strip_prefix('-') {
        rest = stripped;
    }

    if let Some(stripped) = rest.strip_prefix('!') {
        prefix += opcodes::COND_BIT;
        rest = stripped;
    }

    (prefix, rest)
}

fn expect_operands(
    mnemonic: &str,
    operands: &[&str],
    expected: usize,
    line: usize,
) -> Result<(), AssemblerError> {
    if operands.len() != expected {
        return Err(AssemblerError::ArityError(
            mnemonic.to_string(),
            expected,
            operands.len(),
            line,
        ));
    }
    Ok(())
}

fn parse_register(mnemonic: &str, token: &str, line: usize) -> Result<Register, AssemblerError> {
    Register::from_token(token).ok_or_else(|| {
        AssemblerError::InvalidOperand(mnemonic.to_string(), token.to_string(), line)
    })
}

/// Resolve mnemonic, prefixes and operands of one instruction or data line
pub fn classify(line: &SourceLine) -> Result<Statement, AssemblerError> {
    let mut tokens = line.text.split_whitespace();
    let mnemonic = match tokens.next() {
        Some(token) => token,
        None => {
            return Err(AssemblerError::SyntaxError(
                "missing mnemonic".to_string(),
                line.number,
            ))
        }
    };
    let operands: Vec<&str> = tokens.collect();

    if mnemonic == DATA_MNEMONIC {
        expect_operands(mnemonic, &operands, 1, line.number)?;
        let value = parse_int(operands[0], IntMode::Byte, line.number)?;
        return Ok(Statement::Data(value));
    }

    let (prefix, name) = strip_prefixes(mnemonic);
    if name.is_empty() {
        return Err(AssemblerError::SyntaxError(
            format!("missing mnemonic after prefix '{}'", mnemonic),
            line.number,
        ));
    }

    let base = opcodes::base_opcode(name)
        .ok_or_else(|| AssemblerError::UnknownMnemonic(name.to_string(), line.number))?;

    let statement = match name {
        "bank" => {
            expect_operands(name, &operands, 1, line.number)?;
            let target = BankTarget::from_token(operands[0]).ok_or_else(|| {
                AssemblerError::InvalidOperand(
                    name.to_string(),
                    operands[0].to_string(),
                    line.number,
                )
            })?;
            Statement::Bank { prefix, target }
        }
        "immd" => {
            expect_operands(name, &operands, 1, line.number)?;
            let value = parse_int(operands[0], IntMode::Nibble, line.number)?;
            Statement::Immd { prefix, value }
        }
        "bit" | "onto" => {
            expect_operands(name, &operands, 2, line.number)?;
            let src = parse_register(name, operands[0], line.number)?;
            let dest = parse_register(name, operands[1], line.number)?;
            Statement::BitOnto {
                prefix,
                base,
                src,
                dest,
            }
        }
        "mix" | "inc" | "dec" => {
            expect_operands(name, &operands, 1, line.number)?;
            let register = parse_register(name, operands[0], line.number)?;
            Statement::RegisterArg {
                prefix,
                base,
                register,
            }
        }
        _ => {
            expect_operands(name, &operands, 0, line.number)?;
            Statement::NoArg { prefix, base }
        }
    };

    Ok(statement)
}

/// Classify and encode a line in one step
pub fn encode_line(line: &SourceLine) -> Result<u8, AssemblerError> {
    let statement = classify(line)?;
    let byte = statement.encode();
    log::debug!(
        "line {}: '{}' -> {:?} -> {:#04x}",
        line.number,
        line.text,
        statement,
        byte
    );
    Ok(byte)
}
