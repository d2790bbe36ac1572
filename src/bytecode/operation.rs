use std::convert::TryFrom;

use num_enum::{IntoPrimitive, TryFromPrimitive};
use strum_macros::{Display as StrumDisplay, EnumString, IntoStaticStr};

/**
  Operations of the virtual machine. The discriminant of each variant is its opcode, the low
  two decimal digits of an instruction word. The set is closed: any other opcode is an error.
  Order-dependencies:
      ```
      Operation::length()
      Operation::destination()
      ```
*/
#[derive(
StrumDisplay, IntoStaticStr, EnumString, TryFromPrimitive, IntoPrimitive,
Clone,        Copy,          Eq, PartialEq,  Debug,            Hash
)]
#[repr(u8)]
pub enum Operation {
  #[strum(serialize = "ADD")]
  Add = 1,         // add( a, b -> dst )
  #[strum(serialize = "MUL")]
  Mul = 2,         // mul( a, b -> dst )
  #[strum(serialize = "IN")]
  Input = 3,       // in( -> dst )
  #[strum(serialize = "OUT")]
  Output = 4,      // out( a )
  #[strum(serialize = "JNZ")]
  JmpTrue = 5,     // jnz( a, target )
  #[strum(serialize = "JZ")]
  JmpFalse = 6,    // jz( a, target )
  #[strum(serialize = "LT")]
  LessThan = 7,    // lt( a, b -> dst )
  #[strum(serialize = "EQ")]
  Equals = 8,      // eq( a, b -> dst )
  #[strum(serialize = "ARB")]
  BaseOffset = 9,  // arb( a )
  #[strum(serialize = "HLT")]
  Halt = 99,       // hlt
}

impl Operation {
  pub fn code(&self) -> u8 {
    Into::<u8>::into(*self)
  }

  /// Looks up an operation by its two digit opcode.
  pub fn from_code(code: u8) -> Option<Operation> {
    Operation::try_from(code).ok()
  }

  pub fn mnemonic(&self) -> &'static str {
    (*self).into()
  }

  /// Returns the size in words of the instruction, opcode word included.
  pub fn length(&self) -> usize {
    match self {
      Operation::Halt => 1,

      | Operation::Input
      | Operation::Output
      | Operation::BaseOffset => 2,

      | Operation::JmpTrue
      | Operation::JmpFalse => 3,

      | Operation::Add
      | Operation::Mul
      | Operation::LessThan
      | Operation::Equals => 4,
    }
  }

  pub fn parameter_count(&self) -> usize {
    self.length() - 1
  }

  /// The index of the parameter this operation writes to, if it writes at all.
  pub fn destination(&self) -> Option<usize> {
    match self {
      Operation::Input => Some(0),

      | Operation::Add
      | Operation::Mul
      | Operation::LessThan
      | Operation::Equals => Some(2),

      _ => None
    }
  }
}

/// How a parameter word is interpreted.
#[derive(
StrumDisplay, TryFromPrimitive, IntoPrimitive,
Clone,        Copy,             Eq, PartialEq, Debug, Hash
)]
#[repr(u8)]
pub enum Mode {
  /// The parameter is the address of the value.
  Position = 0,
  /// The parameter is the value.
  Immediate = 1,
  /// The parameter plus the relative base is the address of the value.
  Relative = 2,
}

impl Mode {
  pub fn from_digit(digit: u8) -> Option<Mode> {
    Mode::try_from(digit).ok()
  }
}

impl Default for Mode {
  fn default() -> Self {
    Mode::Position
  }
}
