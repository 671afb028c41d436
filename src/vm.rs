use crate::assembler::image::BANK_SIZE;
use crate::assembler::opcodes::{self, Register};
use log::debug;
use std::fmt;

/// Number of addressable banks (bank registers are one byte wide)
pub const MAX_BANKS: usize = 256;

/// Byte-addressed, bank-selected memory seen by the CPU
pub trait Memory {
    fn read(&self, bank: u8, addr: u8) -> u8;
    fn write(&mut self, bank: u8, addr: u8, value: u8);
}

/// Memory backed by an assembled image; banks past the image read as zero
#[derive(Debug, Clone, Default)]
pub struct BankedMemory {
    banks: Vec<[u8; BANK_SIZE]>,
}

impl BankedMemory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load a serialized image (bank 0 first, 256 bytes per bank)
    pub fn from_image(image: &[u8]) -> Result<Self, String> {
        if image.len() % BANK_SIZE != 0 {
            return Err(format!(
                "Image size {} is not a multiple of the {}-byte bank size",
                image.len(),
                BANK_SIZE
            ));
        }
        if image.len() / BANK_SIZE > MAX_BANKS {
            return Err(format!(
                "Image holds {} banks, at most {} are addressable",
                image.len() / BANK_SIZE,
                MAX_BANKS
            ));
        }

        let banks = image
            .chunks_exact(BANK_SIZE)
            .map(|chunk| {
                let mut bank = [0u8; BANK_SIZE];
                bank.copy_from_slice(chunk);
                bank
            })
            .collect();
        Ok(BankedMemory { banks })
    }

    pub fn bank_count(&self) -> usize {
        self.banks.len()
    }
}

impl Memory for BankedMemory {
    fn read(&self, bank: u8, addr: u8) -> u8 {
        self.banks
            .get(bank as usize)
            .map(|b| b[addr as usize])
            .unwrap_or(0)
    }

    fn write(&mut self, bank: u8, addr: u8, value: u8) {
        let index = bank as usize;
        if index >= self.banks.len() {
            self.banks.resize(index + 1, [0; BANK_SIZE]);
        }
        self.banks[index][addr as usize] = value;
    }
}

/// Why a run stopped
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunOutcome {
    Halted { steps: u64 },
    StepLimit { steps: u64 },
}

/// CPU register state
///
/// `reg_i` is the immediate register: every executed instruction shifts it
/// left by a nibble, `immd` shifts its operand in, and `load` replaces it
/// with A. An instruction runs only when its top bit matches `condition`;
/// with bit 6 set it also replaces `condition` with its own result.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct Cpu {
    pub condition: bool,
    pub reg_i: u8,
    pub reg_a: u8,
    pub reg_ip: u8,
    pub reg_p: u8,
    pub bank_ip: u8,
    pub bank_p: u8,
    pub trace: bool,
}

impl Cpu {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start execution at address 0 of `bank`
    pub fn with_start_bank(bank: u8) -> Self {
        Cpu {
            bank_ip: bank,
            ..Self::default()
        }
    }

    fn read_reg<M: Memory>(&self, memory: &M, reg: Register) -> u8 {
        match reg {
            Register::A => self.reg_a,
            Register::IP => self.reg_ip,
            Register::P => self.reg_p,
            Register::IndirectP => memory.read(self.bank_p, self.reg_p),
        }
    }

    // Writes to IP go through next_ip so they take effect as the jump target
    fn write_reg<M: Memory>(&mut self, memory: &mut M, next_ip: &mut u8, reg: Register, value: u8) {
        match reg {
            Register::A => self.reg_a = value,
            Register::IP => *next_ip = value,
            Register::P => self.reg_p = value,
            Register::IndirectP => memory.write(self.bank_p, self.reg_p, value),
        }
    }

    /// Execute one instruction. Returns true if it was an executed halt.
    pub fn step<M: Memory>(&mut self, memory: &mut M) -> bool {
        let instruction = memory.read(self.bank_ip, self.reg_ip);
        let mut next_ip = self.reg_ip.wrapping_add(1);

        let runs = (instruction & opcodes::SIGN_BIT != 0) == self.condition;
        if self.trace {
            debug!(
                "{:02x}:{:02x} {:#04x}{} {:?}",
                self.bank_ip,
                self.reg_ip,
                instruction,
                if runs { "" } else { " (skipped)" },
                self
            );
        }
        if !runs {
            self.reg_ip = next_ip;
            return false;
        }

        let opcode = instruction & 0x3f;
        let mut next_i = self.reg_i << 4;
        let mut halt = false;

        let new_cond = match opcode {
            // immd N
            op if op & 0x30 == 0x00 => {
                next_i |= op & 0x0f;
                false
            }
            // bank p / bank ip occupy the [p] [p] slots of bit / onto
            opcodes::BANK_P => {
                self.bank_p = self.reg_i;
                false
            }
            opcodes::BANK_IP => {
                self.bank_ip = self.reg_i;
                false
            }
            // bit SRC DEST: per-bit truth table from the low nibble of I
            op if op & 0x30 == opcodes::BIT => {
                let dest = Register::from_code(op >> 2);
                let base = self.read_reg(memory, dest);
                let arg = self.read_reg(memory, Register::from_code(op));
                let mut value = 0u8;
                for bit in 0..8 {
                    let lookup = (((base >> bit) & 1) << 1) | ((arg >> bit) & 1);
                    value |= ((self.reg_i >> lookup) & 1) << bit;
                }
                self.write_reg(memory, &mut next_ip, dest, value);
                // I bits 4-6 pick a result bit, bit 7 is the value it is compared to
                let cond_bit = (self.reg_i & 0x70) >> 4;
                (value >> cond_bit) & 1 == self.reg_i >> 7
            }
            // onto SRC DEST: DEST += SRC + I
            op if op & 0x30 == opcodes::ONTO => {
                let dest = Register::from_code(op >> 2);
                let base = self.read_reg(memory, dest);
                let arg = self.read_reg(memory, Register::from_code(op));
                let (value, first_carry) = base.overflowing_add(arg);
                let (value, second_carry) = value.overflowing_add(self.reg_i);
                self.write_reg(memory, &mut next_ip, dest, value);
                first_carry || second_carry
            }
            // mix REG: each output bit pair is the input pair selected by I
            op if op & 0x3c == opcodes::MIX => {
                let reg = Register::from_code(op);
                let arg = self.read_reg(memory, reg);
                let mut value = 0u8;
                for pair in 0..4 {
                    let select = (self.reg_i >> (2 * pair)) & 0x03;
                    value |= ((arg >> (2 * select)) & 0x03) << (2 * pair);
                }
                self.write_reg(memory, &mut next_ip, reg, value);
                value == 0
            }
            op if op & 0x3c == opcodes::INC => {
                let reg = Register::from_code(op);
                let (value, carry) = self.read_reg(memory, reg).overflowing_add(self.reg_i);
                self.write_reg(memory, &mut next_ip, reg, value);
                carry
            }
            op if op & 0x3c == opcodes::DEC => {
                let reg = Register::from_code(op);
                let (value, borrow) = self.read_reg(memory, reg).overflowing_sub(self.reg_i);
                self.write_reg(memory, &mut next_ip, reg, value);
                borrow
            }
            opcodes::LOAD => {
                next_i = self.reg_a;
                !self.condition
            }
            opcodes::HALT => {
                halt = true;
                false
            }
            // invalid11 / invalid12 are no-ops
            _ => false,
        };

        if instruction & opcodes::COND_BIT != 0 {
            self.condition = new_cond;
        }
        self.reg_ip = next_ip;
        self.reg_i = next_i;
        halt
    }

    /// Step until a halt executes or `max_steps` instructions have run
    pub fn run<M: Memory>(&mut self, memory: &mut M, max_steps: u64) -> RunOutcome {
        let mut steps = 0;
        while steps < max_steps {
            steps += 1;
            if self.step(memory) {
                debug!("Halted after {} steps at {:02x}:{:02x}", steps, self.bank_ip, self.reg_ip);
                return RunOutcome::Halted { steps };
            }
        }
        log::warn!("Step limit of {} reached without halting", max_steps);
        RunOutcome::StepLimit { steps }
    }
}

impl fmt::Debug for Cpu {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Cpu")
            .field("condition", &self.condition)
            .field("reg_i", &self.reg_i)
            .field("reg_a", &self.reg_a)
            .field("reg_ip", &self.reg_ip)
            .field("reg_p", &self.reg_p)
            .field("bank_ip", &self.bank_ip)
            .field("bank_p", &self.bank_p)
            .finish()
    }
}

impl fmt::Display for Cpu {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "cond={} I={:02x} A={:02x} IP={:02x}:{:02x} P={:02x}:{:02x}",
            self.condition as u8,
            self.reg_i,
            self.reg_a,
            self.bank_ip,
            self.reg_ip,
            self.bank_p,
            self.reg_p
        )
    }
}
