//! Assembler configuration
//!
//! Optional TOML file; every key has a default and command-line flags take
//! precedence over anything set here.
//!
//! ```toml
//! output = "program.bin"
//!
//! [vm]
//! max_steps = 100000
//! start_bank = 0
//! trace = false
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::assembler::AssemblerError;

pub const DEFAULT_MAX_STEPS: u64 = 100_000;

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AssemblerConfig {
    /// Where to write the image; stdout when unset
    pub output: Option<PathBuf>,
    pub vm: VmConfig,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct VmConfig {
    pub max_steps: u64,
    pub start_bank: u8,
    pub trace: bool,
}

impl Default for VmConfig {
    fn default() -> Self {
        VmConfig {
            max_steps: DEFAULT_MAX_STEPS,
            start_bank: 0,
            trace: false,
        }
    }
}

impl AssemblerConfig {
    pub fn from_toml_str(text: &str) -> Result<Self, AssemblerError> {
        toml::from_str(text).map_err(|e| AssemblerError::ConfigError(e.to_string()))
    }

    pub fn load(path: &Path) -> Result<Self, AssemblerError> {
        let text = fs::read_to_string(path).map_err(|e| {
            AssemblerError::IOError(format!("reading '{}': {}", path.display(), e))
        })?;
        let config = Self::from_toml_str(&text)?;
        log::debug!("Loaded config from {}: {:?}", path.display(), config);
        Ok(config)
    }
}
