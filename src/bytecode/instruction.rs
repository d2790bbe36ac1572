use std::fmt::{Display, Formatter};

use crate::address::{Address, Location};
use crate::bytecode::{Mode, Operation, Word};
use crate::error::{Error, Result};
use crate::memory::Memory;

/// No operation takes more parameters than this.
pub const MAX_PARAMETERS: usize = 3;

/// One parameter word together with the mode its opcode word assigned to it.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, Hash)]
pub struct Parameter {
  pub mode: Mode,
  pub value: Word,
}

impl Parameter {
  /**
    Applies the parameter's mode. Position and relative parameters become memory addresses,
    immediate parameters stay literals. `ip` only serves error reporting.
  */
  pub fn locate(&self, base: Word, ip: usize) -> Result<Location> {
    let address = match self.mode {
      Mode::Immediate => return Ok(Location::Immediate(self.value)),
      Mode::Position  => self.value,
      Mode::Relative  => base.saturating_add(self.value),
    };
    Address::try_from_word(address)
      .map(Location::Memory)
      .ok_or(Error::NegativeAddress { address, ip })
  }
}

impl Display for Parameter {
  fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
    match self.mode {
      Mode::Position  => write!(f, "[{}]", self.value),
      Mode::Immediate => write!(f, "#{}", self.value),
      Mode::Relative if self.value < 0 => write!(f, "[rb{}]", self.value),
      Mode::Relative  => write!(f, "[rb+{}]", self.value),
    }
  }
}

/**
  Splits an opcode word into its operation and the modes of its parameters. The arithmetic is
  floored, so negative words decode the same way their Euclidean remainders would.
*/
pub fn decode_word(word: Word, ip: usize) -> Result<(Operation, [Mode; MAX_PARAMETERS])> {
  let opcode = word.rem_euclid(100);
  let operation = Operation::from_code(opcode as u8)
    .ok_or(Error::InvalidOpcode { opcode, word, ip })?;

  let mut modes = [Mode::Position; MAX_PARAMETERS];
  let mut divisor: Word = 100;
  for (parameter, mode) in modes.iter_mut().enumerate().take(operation.parameter_count()) {
    let digit = word.div_euclid(divisor).rem_euclid(10);
    *mode = Mode::from_digit(digit as u8)
      .ok_or(Error::InvalidMode { mode: digit, parameter, word, ip })?;
    divisor *= 10;
  }

  Ok((operation, modes))
}

/// The decoded view of one instruction in memory.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub struct Instruction {
  pub operation: Operation,
  /// The address of the opcode word.
  pub ip: usize,
  parameters: [Parameter; MAX_PARAMETERS],
}

impl Instruction {
  /// Decodes the instruction whose opcode word is at `ip`.
  pub fn fetch(memory: &Memory, ip: usize) -> Result<Instruction> {
    let (operation, modes) = decode_word(memory.read(Address(ip)), ip)?;

    let mut parameters = [Parameter::default(); MAX_PARAMETERS];
    for (offset, (parameter, mode)) in parameters.iter_mut()
                                                 .zip(modes.iter())
                                                 .enumerate()
                                                 .take(operation.parameter_count())
    {
      *parameter = Parameter {
        mode: *mode,
        value: memory.read(Address(ip) + (offset + 1)),
      };
    }

    Ok(Instruction { operation, ip, parameters })
  }

  pub fn parameters(&self) -> &[Parameter] {
    &self.parameters[..self.operation.parameter_count()]
  }

  pub fn parameter(&self, index: usize) -> Parameter {
    self.parameters[index]
  }

  pub fn length(&self) -> usize {
    self.operation.length()
  }

  /// The address of the instruction that follows this one when no jump is taken.
  pub fn next_ip(&self) -> usize {
    self.ip + self.length()
  }
}

impl Display for Instruction {
  fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
    write!(f, "{}", self.operation)?;

    let destination = self.operation.destination();
    let sources = self.parameters()
                      .iter()
                      .enumerate()
                      .filter(|(index, _)| Some(*index) != destination)
                      .map(|(_, parameter)| parameter.to_string())
                      .collect::<Vec<String>>();
    if !sources.is_empty() {
      write!(f, " {}", sources.join(", "))?;
    }
    if let Some(index) = destination {
      write!(f, " -> {}", self.parameters[index])?;
    }
    Ok(())
  }
}
