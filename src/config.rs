//! Runtime knobs for a `Machine`. Compile time tracing is controlled separately by the
//! `trace_computation` feature.

/// Zero cells appended past a freshly loaded program.
pub const DEFAULT_SCRATCH: usize = 1024;
/// 16 Mi cells, 128 MiB of words.
pub const DEFAULT_MEMORY_LIMIT: usize = 1 << 24;

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct Config {
  /// Scratch space, in cells, allocated past the end of the program at load time.
  pub scratch: usize,
  /// Writes to addresses at or beyond this many cells fail with `Error::MemoryLimit`.
  pub memory_limit: usize,
  /**
    When set, at most this many of the most recent outputs are retained (never fewer than one).
    Reading the last `n` outputs never consumes them either way.
  */
  pub output_history: Option<usize>,
}

impl Default for Config {
  fn default() -> Self {
    Config {
      scratch: DEFAULT_SCRATCH,
      memory_limit: DEFAULT_MEMORY_LIMIT,
      output_history: None,
    }
  }
}

impl Config {
  pub fn scratch(mut self, cells: usize) -> Self {
    self.scratch = cells;
    self
  }

  pub fn memory_limit(mut self, cells: usize) -> Self {
    self.memory_limit = cells;
    self
  }

  pub fn output_history(mut self, outputs: usize) -> Self {
    self.output_history = Some(outputs.max(1));
    self
  }
}
