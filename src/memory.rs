//! The backing store shared by code and data. Cells past the end of the vector read as zero,
//! and writes past the end grow the vector, zero-filling the gap.

use std::ops::{Index, IndexMut};

use crate::address::Address;
use crate::bytecode::Word;
use crate::error::{Error, Result};

static ZERO: Word = 0;

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Memory {
  cells: Vec<Word>,
  /// Writes at or beyond this many cells are refused.
  limit: usize,
}

impl Memory {

  pub fn new(cells: Vec<Word>, limit: usize) -> Memory {
    Memory { cells, limit }
  }

  /// The number of cells currently backed by storage.
  pub fn len(&self) -> usize {
    self.cells.len()
  }

  pub fn is_empty(&self) -> bool {
    self.cells.is_empty()
  }

  pub fn limit(&self) -> usize {
    self.limit
  }

  pub fn as_slice(&self) -> &[Word] {
    &self.cells
  }

  /// Reads the cell at `address`. Never grows the store.
  pub fn read(&self, address: Address) -> Word {
    self.cells.get(address.idx()).copied().unwrap_or(0)
  }

  /**
    Sets the value at the given address, dynamically growing the store if the address is
    beyond its end.
  */
  pub fn write(&mut self, address: Address, value: Word) -> Result<()> {
    *self.cell_mut(address)? = value;
    Ok(())
  }

  /// Appends `count` zero cells, used for scratch space past a freshly loaded program.
  pub fn pad(&mut self, count: usize) {
    let length = self.cells.len().saturating_add(count).min(self.limit.max(self.cells.len()));
    self.cells.resize(length, 0);
  }

  fn cell_mut(&mut self, address: Address) -> Result<&mut Word> {
    let idx = address.idx();
    if idx >= self.cells.len() {
      if idx >= self.limit {
        return Err(Error::MemoryLimit { address: idx, limit: self.limit });
      }
      self.cells.resize(idx + 1, 0);
    }
    Ok(&mut self.cells[idx])
  }
}

impl Index<usize> for Memory {
  type Output = Word;

  fn index(&self, idx: usize) -> &Word {
    self.cells.get(idx).unwrap_or(&ZERO)
  }
}

/// Direct patching grows the store without checking the memory limit.
impl IndexMut<usize> for Memory {
  fn index_mut(&mut self, idx: usize) -> &mut Word {
    if idx >= self.cells.len() {
      self.cells.resize(idx + 1, 0);
    }
    &mut self.cells[idx]
  }
}
