//! Error types for the machine and for the program loader.

use std::io;

use thiserror::Error;

use crate::bytecode::Operation;

/// Faults raised while executing an instruction. None of them are recoverable; the run that
/// raised one stops.
#[derive(Clone, Debug, Eq, PartialEq, Error)]
pub enum VmError {
  #[error("illegal instruction {0:#010b}")]
  IllegalInstruction(u8),
  #[error("invalid register R{0}")]
  InvalidRegister(usize),
  #[error("invalid memory address {0:#04x}")]
  InvalidAddress(usize),
  #[error("unsupported ALU operation {0}")]
  UnsupportedOperation(Operation),
  #[error("stack overflow (SP = {sp:#04x})")]
  StackOverflow { sp: u8 },
  #[error("stack underflow (SP = {sp:#04x})")]
  StackUnderflow { sp: u8 },
  #[error("step limit of {0} instructions exceeded")]
  StepLimitExceeded(u64),
}

/// A `VmError` together with where it happened.
#[derive(Clone, Debug, Eq, PartialEq, Error)]
#[error("fault at PC {pc:#04x}: {source}")]
pub struct Fault {
  pub pc: usize,
  /// The byte at `pc`, if `pc` is inside memory.
  pub opcode: Option<u8>,
  pub source: VmError,
}

#[derive(Debug, Error)]
pub enum LoadError {
  #[error("could not read program")]
  Io(#[from] io::Error),
  #[error("line {line}: expected a binary byte, found `{text}`")]
  Syntax { line: usize, text: String },
  #[error("program is {len} bytes, which does not fit in memory")]
  ProgramTooLarge { len: usize },
}
