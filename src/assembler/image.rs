//! Memory image construction and serialization
//!
//! Encoded bytes are written into fixed 256-byte banks. Banks are created on
//! first write; every bank index up to the highest one referenced (by a
//! directive or a placement) is emitted, untouched ones as zero bytes.
//!
//! Output layout:
//! bank 0 bytes 0x00-0xff, bank 1 bytes 0x00-0xff, ... bank N bytes 0x00-0xff

use indexmap::IndexMap;

use crate::assembler::directive::Position;
use crate::assembler::error::AssemblerError;

pub const BANK_SIZE: usize = 256;

#[derive(Debug, Clone)]
pub struct Bank {
    pub number: u8,
    data: [u8; BANK_SIZE],
    written: [bool; BANK_SIZE],
}

impl Bank {
    pub fn new(number: u8) -> Self {
        Bank {
            number,
            data: [0; BANK_SIZE],
            written: [false; BANK_SIZE],
        }
    }

    pub fn data(&self) -> &[u8; BANK_SIZE] {
        &self.data
    }

    pub fn is_written(&self, addr: u8) -> bool {
        self.written[addr as usize]
    }

    fn write(&mut self, addr: u8, value: u8) -> bool {
        let overwrote = self.written[addr as usize];
        self.data[addr as usize] = value;
        self.written[addr as usize] = true;
        overwrote
    }
}

#[derive(Debug, Clone, Default)]
pub struct MemoryImage {
    banks: IndexMap<u8, Bank>, // insertion order = first write order
    max_bank: u8,
}

impl MemoryImage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record that `bank` was referenced so serialization covers it
    pub fn reference_bank(&mut self, bank: u8) {
        self.max_bank = self.max_bank.max(bank);
    }

    pub fn max_bank(&self) -> u8 {
        self.max_bank
    }

    pub fn bank(&self, number: u8) -> Option<&Bank> {
        self.banks.get(&number)
    }

    /// Number of banks that received at least one byte
    pub fn touched_banks(&self) -> usize {
        self.banks.len()
    }

    pub fn read(&self, bank: u8, addr: u8) -> u8 {
        self.banks
            .get(&bank)
            .map(|b| b.data[addr as usize])
            .unwrap_or(0)
    }

    /// Place `value` at the current position and advance the instruction
    /// pointer. Advancing past the last slot of a bank is an error: banks
    /// never roll over into the next one.
    pub fn place(
        &mut self,
        position: &mut Position,
        value: u8,
        line: usize,
    ) -> Result<(), AssemblerError> {
        self.reference_bank(position.bank);
        let bank = self
            .banks
            .entry(position.bank)
            .or_insert_with(|| Bank::new(position.bank));

        if bank.write(position.ip, value) {
            log::warn!(
                "line {}: overwriting byte at {:02x}:{:02x}",
                line,
                position.bank,
                position.ip
            );
        }
        log::debug!(
            "placed {:#04x} at {:02x}:{:02x}",
            value,
            position.bank,
            position.ip
        );

        // ip reaching 256 is an overflow even though the byte itself fit
        position.ip = position
            .ip
            .checked_add(1)
            .ok_or(AssemblerError::BankOverflow(position.bank, line))?;
        Ok(())
    }

    /// Concatenate banks 0..=max_bank; consumes the image
    pub fn serialize(self) -> Vec<u8> {
        let bank_count = self.max_bank as usize + 1;
        let mut output = Vec::with_capacity(bank_count * BANK_SIZE);
        for number in 0..bank_count {
            match self.banks.get(&(number as u8)) {
                Some(bank) => output.extend_from_slice(&bank.data),
                None => output.extend_from_slice(&[0; BANK_SIZE]),
            }
        }
        output
    }
}
