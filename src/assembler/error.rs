// Assembler Error Handling

use std::fmt;

#[derive(Debug, Clone, PartialEq)]
pub enum AssemblerError {
    // Source format errors
    SyntaxError(String, usize), // message, line
    RangeError(i64, i64, i64, usize), // value, min, max (exclusive), line

    // Instruction errors
    UnknownMnemonic(String, usize),
    InvalidOperand(String, String, usize), // mnemonic, operand, line
    ArityError(String, usize, usize, usize), // mnemonic, expected, found, line

    // Placement errors
    BankOverflow(u8, usize), // bank, line

    // Boundary errors
    IOError(String),
    ConfigError(String),
}

impl AssemblerError {
    /// Source line (1-based) the error was raised on, if it came from the program text
    pub fn line(&self) -> Option<usize> {
        match self {
            AssemblerError::SyntaxError(_, line)
            | AssemblerError::RangeError(_, _, _, line)
            | AssemblerError::UnknownMnemonic(_, line)
            | AssemblerError::InvalidOperand(_, _, line)
            | AssemblerError::ArityError(_, _, _, line)
            | AssemblerError::BankOverflow(_, line) => Some(*line),
            AssemblerError::IOError(_) | AssemblerError::ConfigError(_) => None,
        }
    }
}

impl fmt::Display for AssemblerError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            AssemblerError::SyntaxError(msg, line) => {
                write!(f, "Syntax error on line {}: {}", line, msg)
            }
            AssemblerError::RangeError(value, min, max, line) => {
                write!(
                    f,
                    "Value {} out of range on line {}: expected {} <= value < {}",
                    value, line, min, max
                )
            }
            AssemblerError::UnknownMnemonic(mnemonic, line) => {
                write!(f, "Unknown mnemonic '{}' on line {}", mnemonic, line)
            }
            AssemblerError::InvalidOperand(mnemonic, operand, line) => {
                write!(
                    f,
                    "Invalid operand '{}' for '{}' on line {}",
                    operand, mnemonic, line
                )
            }
            AssemblerError::ArityError(mnemonic, expected, found, line) => {
                write!(
                    f,
                    "'{}' takes {} operand(s) but {} given on line {}",
                    mnemonic, expected, found, line
                )
            }
            AssemblerError::BankOverflow(bank, line) => {
                write!(
                    f,
                    "Bank {} overflow on line {}: a bank holds at most 256 bytes",
                    bank, line
                )
            }
            AssemblerError::IOError(msg) => {
                write!(f, "IO error: {}", msg)
            }
            AssemblerError::ConfigError(msg) => {
                write!(f, "Config error: {}", msg)
            }
        }
    }
}

impl std::error::Error for AssemblerError {}

impl From<std::io::Error> for AssemblerError {
    fn from(e: std::io::Error) -> Self {
        AssemblerError::IOError(e.to_string())
    }
}
