#[macro_use]
extern crate lazy_static;

pub mod assembler;
pub mod config;
pub mod vm;

pub use assembler::{assemble, Assembler, AssemblerError};
