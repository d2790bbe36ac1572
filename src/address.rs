//! An `Either` type that holds either an address into memory or a literal, with some
//! convenience functions for turning signed words into addresses.

use std::convert::TryFrom;
use std::fmt::{Display, Formatter};
use std::ops::Add;

use crate::bytecode::Word;

// `AddressNumberType` is `usize`, as it is naturally an index into a memory store.
pub type AddressNumberType = usize;

/// An index into `Memory`. Only non-negative words can become addresses.
#[derive(Copy, Clone, Ord, PartialOrd, Eq, PartialEq, Hash, Debug)]
pub struct Address(pub AddressNumberType);

impl Address {
  /// Converts the address to an index into memory.
  pub fn idx(&self) -> AddressNumberType {
    self.0
  }

  /// Interprets a signed word as an address. Returns `None` for negative words.
  pub fn try_from_word(word: Word) -> Option<Address> {
    AddressNumberType::try_from(word).ok().map(Address)
  }
}

impl Display for Address {
  fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
    write!(f, "[{}]", self.0)
  }
}

// Increment an address
impl Add<AddressNumberType> for Address {
  type Output = Address;
  fn add(self, rhs: AddressNumberType) -> Address {
    Address(self.0 + rhs)
  }
}

/// Where a parameter's value lives once its mode has been applied.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum Location {
  /// A cell of memory, reached through position or relative mode.
  Memory(Address),
  /// The parameter word itself, reached through immediate mode.
  Immediate(Word),
}

impl Display for Location {
  fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
    match self {
      Location::Memory(address) => write!(f, "{}", address),
      Location::Immediate(value) => write!(f, "#{}", value),
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn negative_words_are_not_addresses() {
    assert_eq!(Address::try_from_word(-1), None);
    assert_eq!(Address::try_from_word(0), Some(Address(0)));
    assert_eq!(Address::try_from_word(1_000), Some(Address(1_000)));
  }

  #[test]
  fn display() {
    assert_eq!(format!("{}", Address(4) + 3), "[7]");
    assert_eq!(format!("{}", Location::Immediate(-5)), "#-5");
    assert_eq!(format!("{}", Location::Memory(Address(2))), "[2]");
  }
}
