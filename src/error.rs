//! The crate-wide [`Error`] type. Every variant is fatal to the `execute` call that raised it;
//! a machine that returned one of these must not be resumed.

use thiserror::Error;

use crate::bytecode::Word;

#[derive(Clone, Debug, Eq, PartialEq, Error)]
pub enum Error {
  /// The low two decimal digits of the word at `ip` name no known operation.
  #[error("unknown opcode {opcode} in word {word} at ip = {ip}")]
  InvalidOpcode { opcode: Word, word: Word, ip: usize },

  /// A parameter mode digit outside of position/immediate/relative.
  #[error("unknown mode {mode} for parameter {parameter} of word {word} at ip = {ip}")]
  InvalidMode { mode: Word, parameter: usize, word: Word, ip: usize },

  /// A destination parameter was given in immediate mode.
  #[error("destination parameter {parameter} is in immediate mode at ip = {ip}")]
  InvalidWriteMode { parameter: usize, ip: usize },

  /// An input instruction found an empty queue during a strict run.
  #[error("input queue exhausted at ip = {ip}")]
  InputUnderflow { ip: usize },

  /// An operand or jump target resolved to a negative address.
  #[error("negative address {address} at ip = {ip}")]
  NegativeAddress { address: Word, ip: usize },

  /// A write would grow memory past the configured limit.
  #[error("address {address} is beyond the memory limit of {limit} cells")]
  MemoryLimit { address: usize, limit: usize },

  /// Program text could not be read as a comma separated list of integers.
  #[error("malformed program text near `{near}`")]
  Parse { near: String },

  /// A pipeline stage ran without producing the value the next stage needs.
  #[error("pipeline stage {stage} produced no output")]
  NoOutput { stage: usize },
}

pub type Result<T> = std::result::Result<T, Error>;
