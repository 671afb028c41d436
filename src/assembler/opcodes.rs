//! Opcode and register tables
//!
//! Base values are the instruction byte with every modifier and operand bit
//! clear. An encoded byte is the sum of disjoint fields:
//!
//! ```text
//!   bit 7     bit 6     bits 0-5
//!   +  sign   ! cond    opcode base + operand bits
//! ```
//!
//! `bank` has base 0; its operand supplies the whole low field (0x2f / 0x3f),
//! which the CPU reads as the `bit [p] [p]` / `onto [p] [p]` slots.

use std::collections::HashMap;

/// Modifier bit set by a leading `+` on the mnemonic
pub const SIGN_BIT: u8 = 0x80;
/// Modifier bit set by a leading `!` on the mnemonic
pub const COND_BIT: u8 = 0x40;

pub const BANK: u8 = 0x00;
pub const IMMD: u8 = 0x00;
pub const BIT: u8 = 0x20;
pub const ONTO: u8 = 0x30;
pub const MIX: u8 = 0x14;
pub const INC: u8 = 0x18;
pub const DEC: u8 = 0x1c;
pub const LOAD: u8 = 0x10;
pub const INVALID11: u8 = 0x11;
pub const INVALID12: u8 = 0x12;
pub const HALT: u8 = 0x13;

/// Operand field of `bank ip` / `bank p`
pub const BANK_IP: u8 = 0x3f;
pub const BANK_P: u8 = 0x2f;

lazy_static! {
    pub static ref OPCODE_TABLE: HashMap<&'static str, u8> = {
        let mut m = HashMap::new();
        m.insert("bank", BANK);
        m.insert("immd", IMMD);
        m.insert("bit", BIT);
        m.insert("onto", ONTO);
        m.insert("mix", MIX);
        m.insert("inc", INC);
        m.insert("dec", DEC);
        m.insert("load", LOAD);
        m.insert("invalid11", INVALID11);
        m.insert("invalid12", INVALID12);
        m.insert("halt", HALT);
        m
    };
}

/// Look up the base opcode for a mnemonic with its prefixes already removed
pub fn base_opcode(mnemonic: &str) -> Option<u8> {
    OPCODE_TABLE.get(mnemonic).copied()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Register {
    A = 0,
    IP = 1,
    P = 2,
    IndirectP = 3,
}

impl Register {
    pub fn from_token(token: &str) -> Option<Register> {
        match token {
            "a" => Some(Register::A),
            "ip" => Some(Register::IP),
            "p" => Some(Register::P),
            "[p]" => Some(Register::IndirectP),
            _ => None,
        }
    }

    pub fn from_code(code: u8) -> Register {
        match code & 0x03 {
            0 => Register::A,
            1 => Register::IP,
            2 => Register::P,
            _ => Register::IndirectP,
        }
    }

    pub const fn code(self) -> u8 {
        self as u8
    }
}

/// Bank register selected by the `bank` instruction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BankTarget {
    IP,
    P,
}

impl BankTarget {
    pub fn from_token(token: &str) -> Option<BankTarget> {
        match token {
            "ip" => Some(BankTarget::IP),
            "p" => Some(BankTarget::P),
            _ => None,
        }
    }

    pub const fn operand_bits(self) -> u8 {
        match self {
            BankTarget::IP => BANK_IP,
            BankTarget::P => BANK_P,
        }
    }
}
