// Bank Assembler Module
// Translates program text into a bank-addressed binary memory image

pub mod directive;
pub mod encoder;
pub mod error;
pub mod image;
pub mod normalizer;
pub mod numbers;
pub mod opcodes;

#[cfg(test)]
mod assembler_tests;
#[cfg(test)]
mod encoder_tests;

pub use directive::{Directive, Position};
pub use encoder::Statement;
pub use error::AssemblerError;
pub use image::{MemoryImage, BANK_SIZE};
pub use normalizer::SourceLine;

/// Main assembler structure
///
/// Holds the state that evolves line by line. A fresh assembler starts at
/// bank 0, address 0.
#[derive(Debug, Default)]
pub struct Assembler {
    position: Position,
    image: MemoryImage,
}

impl Assembler {
    pub fn new() -> Self {
        Assembler::default()
    }

    pub fn position(&self) -> Position {
        self.position
    }

    pub fn image(&self) -> &MemoryImage {
        &self.image
    }

    /// Process one normalized line: reposition on a directive, otherwise
    /// encode and place a byte
    pub fn process_line(&mut self, line: &SourceLine) -> Result<(), AssemblerError> {
        if directive::is_directive(line) {
            let parsed = directive::parse_directive(line)?;
            if let Directive::BankAddress(bank, _) = parsed {
                self.image.reference_bank(bank);
            }
            self.position.apply(parsed);
            log::debug!(
                "line {}: directive {:?}, now at {:02x}:{:02x}",
                line.number,
                parsed,
                self.position.bank,
                self.position.ip
            );
            return Ok(());
        }

        let byte = encoder::encode_line(line)?;
        self.image.place(&mut self.position, byte, line.number)
    }

    /// Run the translation pass over `source` and return the finished image
    pub fn build_image(mut self, source: &str) -> Result<MemoryImage, AssemblerError> {
        let lines = normalizer::normalize(source);
        log::info!("Assembling {} source lines", lines.len());

        for line in &lines {
            self.process_line(line)?;
        }

        log::info!(
            "Assembly pass complete: {} bank(s) written, highest bank {}",
            self.image.touched_banks(),
            self.image.max_bank()
        );
        Ok(self.image)
    }

    /// Assemble `source` to the raw output bytes. Nothing is returned unless
    /// every line translated successfully.
    pub fn assemble(self, source: &str) -> Result<Vec<u8>, AssemblerError> {
        let output = self.build_image(source)?.serialize();
        log::info!("Serialized image: {} bytes", output.len());
        Ok(output)
    }
}

/// Assemble program text with a fresh assembler
pub fn assemble(source: &str) -> Result<Vec<u8>, AssemblerError> {
    Assembler::new().assemble(source)
}
