//! Structures and functions for the Intcode virtual machine: the fetch-decode-apply engine,
//! its input and output channels, and the suspend/resume protocol built on top of them.

use std::collections::VecDeque;
use std::fmt::{Display, Formatter};
use std::ops::{Index, IndexMut};
use std::str::FromStr;

use log::{debug, trace};
use prettytable::{format as TableFormat, Table};
use strum_macros::Display as StrumDisplay;

use crate::address::{Address, Location};
use crate::bytecode::{Instruction, Operation, Program, Word};
use crate::config::Config;
use crate::error::{Error, Result};
use crate::memory::Memory;

/// How many cells before the instruction pointer the state dump shows.
const DUMP_CELLS_BEFORE: usize = 4;
/// How many cells from the instruction pointer on the state dump shows.
const DUMP_CELLS_AFTER: usize = 12;
const DUMP_OUTPUTS: usize = 8;

#[derive(StrumDisplay, Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum State {
  /// Constructed or reset, never run.
  Ready,
  /// Inside the fetch-decode-apply loop.
  Running,
  /// Stopped at an input instruction that found the queue empty.
  Suspended,
  /// Executed a halt instruction. Terminal.
  Halted,
}

/// The outcome of a single `Machine::step`.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum Step {
  /// An instruction was applied.
  Continue,
  /// The next instruction needs input that is not queued. Nothing was applied.
  Paused,
  /// The machine is halted.
  Halted,
}

/// An instruction bound to everything it needs in order to be applied.
enum Fetched {
  Instruction(Instruction),
  /// An input instruction carrying the value it consumed from the queue.
  Input(Instruction, Word),
  /// An input instruction that found the queue empty; `ip` stays on it.
  Pause,
}

/**
  A single Intcode machine. Each machine exclusively owns its memory, registers and channels,
  so several machines can be driven side by side by an outside loop.

  Callers append inputs and call `execute` repeatedly. Every call runs until the program halts
  or an input instruction finds the queue empty, then returns the most recent output.
*/
#[derive(Clone, Debug)]
pub struct Machine {
  config: Config,
  /// The program as loaded, kept for `reset`.
  image: Program,
  memory: Memory,

  // Registers //
  ip: usize,
  base: Word,
  state: State,

  // Channels //
  inputs: VecDeque<Word>,
  outputs: Vec<Word>,
}

impl Machine {

  // region Construction

  pub fn new<P: Into<Program>>(program: P) -> Machine {
    Machine::with_config(program, Config::default())
  }

  pub fn with_config<P: Into<Program>>(program: P, config: Config) -> Machine {
    let image = program.into();
    let memory = Machine::load(&image, &config);
    Machine {
      config,
      image,
      memory,
      ip: 0,
      base: 0,
      state: State::Ready,
      inputs: VecDeque::new(),
      outputs: vec![],
    }
  }

  /// Presets the input queue.
  pub fn with_inputs<I: IntoIterator<Item = Word>>(mut self, inputs: I) -> Machine {
    self.inputs.extend(inputs);
    self
  }

  fn load(image: &Program, config: &Config) -> Memory {
    let mut memory = Memory::new(image.to_vec(), config.memory_limit);
    memory.pad(config.scratch);
    memory
  }

  /// Restores the loaded program and clears registers and both channels.
  pub fn reset(&mut self) {
    debug!("reset after {} outputs", self.outputs.len());
    self.memory = Machine::load(&self.image, &self.config);
    self.ip = 0;
    self.base = 0;
    self.state = State::Ready;
    self.inputs.clear();
    self.outputs.clear();
  }

  // endregion

  // region Accessors

  pub fn config(&self) -> &Config {
    &self.config
  }

  pub fn state(&self) -> State {
    self.state
  }

  /// Whether the machine executed a halt instruction.
  pub fn is_done(&self) -> bool {
    self.state == State::Halted
  }

  pub fn ip(&self) -> usize {
    self.ip
  }

  pub fn relative_base(&self) -> Word {
    self.base
  }

  pub fn memory(&self) -> &Memory {
    &self.memory
  }

  pub fn memory_mut(&mut self) -> &mut Memory {
    &mut self.memory
  }

  // endregion

  // region Channels

  pub fn push_input(&mut self, value: Word) {
    self.inputs.push_back(value);
  }

  pub fn extend_inputs<I: IntoIterator<Item = Word>>(&mut self, inputs: I) {
    self.inputs.extend(inputs);
  }

  /// Inputs queued but not consumed yet, oldest first.
  pub fn pending_inputs(&self) -> &VecDeque<Word> {
    &self.inputs
  }

  /// Every retained output, oldest first.
  pub fn outputs(&self) -> &[Word] {
    match self.config.output_history {
      Some(cap) if self.outputs.len() > cap.max(1) => {
        &self.outputs[self.outputs.len() - cap.max(1)..]
      }
      _ => &self.outputs
    }
  }

  pub fn last_output(&self) -> Option<Word> {
    self.outputs.last().copied()
  }

  /// The last `n` outputs, oldest first, or fewer if fewer are retained. Nothing is consumed.
  pub fn output(&self, n: usize) -> &[Word] {
    let outputs = self.outputs();
    &outputs[outputs.len().saturating_sub(n)..]
  }

  /// Removes and returns every retained output.
  pub fn take_outputs(&mut self) -> Vec<Word> {
    let taken = self.outputs().to_vec();
    self.outputs.clear();
    taken
  }

  fn push_output(&mut self, value: Word) {
    self.outputs.push(value);
    // Trimmed in batches once the buffer holds twice the cap.
    if let Some(cap) = self.config.output_history {
      let cap = cap.max(1);
      if self.outputs.len() >= cap.saturating_mul(2) {
        let excess = self.outputs.len() - cap;
        self.outputs.drain(..excess);
      }
    }
  }

  // endregion

  // region Execution

  /**
    Appends `inputs` to the queue and runs until the program halts or an input instruction
    finds the queue empty. Returns the most recent output, if there has been any.

    On a halted machine this does nothing but return the last output.
  */
  pub fn execute<I: IntoIterator<Item = Word>>(&mut self, inputs: I) -> Result<Option<Word>> {
    self.run(inputs, false)
  }

  /**
    Like `execute`, but the run must reach a halt instruction: an input instruction that finds
    the queue empty fails with `Error::InputUnderflow` instead of suspending.
  */
  pub fn execute_strict<I: IntoIterator<Item = Word>>(&mut self, inputs: I)
    -> Result<Option<Word>>
  {
    self.run(inputs, true)
  }

  fn run<I: IntoIterator<Item = Word>>(&mut self, inputs: I, strict: bool)
    -> Result<Option<Word>>
  {
    if self.is_done() {
      debug!("execute on a halted machine at ip = {}", self.ip);
      return Ok(self.last_output());
    }

    self.inputs.extend(inputs);
    if self.state == State::Suspended {
      debug!("resuming at ip = {} with {} queued inputs", self.ip, self.inputs.len());
    }

    loop {
      match self.step()? {
        Step::Continue => continue,

        Step::Paused if strict => {
          return Err(Error::InputUnderflow { ip: self.ip });
        }

        Step::Paused => {
          debug!("suspended at ip = {} waiting for input", self.ip);
          return Ok(self.last_output());
        }

        Step::Halted => {
          debug!("halted at ip = {} after {} outputs", self.ip, self.outputs.len());
          return Ok(self.last_output());
        }
      }
    }
  }

  /// Fetches, decodes and applies exactly one instruction.
  pub fn step(&mut self) -> Result<Step> {
    if self.is_done() {
      return Ok(Step::Halted);
    }
    self.state = State::Running;

    let (instruction, input) = match self.fetch()? {
      Fetched::Pause => {
        self.state = State::Suspended;
        return Ok(Step::Paused);
      }
      Fetched::Instruction(instruction) => (instruction, None),
      Fetched::Input(instruction, value) => (instruction, Some(value)),
    };
    trace!("{:>6}: {}", instruction.ip, instruction);

    if instruction.operation == Operation::Halt {
      self.state = State::Halted;
      return Ok(Step::Halted);
    }

    let jump = self.apply(&instruction, input)?;
    self.ip = jump.unwrap_or_else(|| instruction.next_ip());

    #[cfg(feature = "trace_computation")] trace!("\n{}", self);

    Ok(Step::Continue)
  }

  fn fetch(&mut self) -> Result<Fetched> {
    let instruction = Instruction::fetch(&self.memory, self.ip)?;

    match instruction.operation {
      Operation::Input => {
        match self.inputs.pop_front() {
          Some(value) => Ok(Fetched::Input(instruction, value)),
          None => Ok(Fetched::Pause)
        }
      }
      _ => Ok(Fetched::Instruction(instruction))
    }
  }

  /// Applies a fetched instruction. Returns the jump target if the instruction redirects `ip`.
  fn apply(&mut self, instruction: &Instruction, input: Option<Word>) -> Result<Option<usize>> {
    match instruction.operation {
      Operation::Add => {
        let value = self.read(instruction, 0)?.wrapping_add(self.read(instruction, 1)?);
        self.write(instruction, 2, value)?;
      }

      Operation::Mul => {
        let value = self.read(instruction, 0)?.wrapping_mul(self.read(instruction, 1)?);
        self.write(instruction, 2, value)?;
      }

      Operation::LessThan => {
        let value = self.read(instruction, 0)? < self.read(instruction, 1)?;
        self.write(instruction, 2, value as Word)?;
      }

      Operation::Equals => {
        let value = self.read(instruction, 0)? == self.read(instruction, 1)?;
        self.write(instruction, 2, value as Word)?;
      }

      Operation::JmpTrue => {
        if self.read(instruction, 0)? != 0 {
          return self.jump_target(instruction).map(Some);
        }
      }

      Operation::JmpFalse => {
        if self.read(instruction, 0)? == 0 {
          return self.jump_target(instruction).map(Some);
        }
      }

      Operation::Input => {
        // `fetch` only binds input instructions together with their value.
        if let Some(value) = input {
          self.write(instruction, 0, value)?;
        }
      }

      Operation::Output => {
        let value = self.read(instruction, 0)?;
        self.push_output(value);
      }

      Operation::BaseOffset => {
        self.base = self.base.wrapping_add(self.read(instruction, 0)?);
      }

      Operation::Halt => {}
    }

    Ok(None)
  }

  /// Resolves parameter `index` of `instruction` as a value to be read.
  fn read(&self, instruction: &Instruction, index: usize) -> Result<Word> {
    match instruction.parameter(index).locate(self.base, instruction.ip)? {
      Location::Memory(address) => Ok(self.memory.read(address)),
      Location::Immediate(value) => Ok(value),
    }
  }

  /// Resolves parameter `index` of `instruction` as a destination and stores `value` there.
  fn write(&mut self, instruction: &Instruction, index: usize, value: Word) -> Result<()> {
    match instruction.parameter(index).locate(self.base, instruction.ip)? {
      Location::Memory(address) => self.memory.write(address, value),
      Location::Immediate(_) => {
        Err(Error::InvalidWriteMode { parameter: index, ip: instruction.ip })
      }
    }
  }

  /// The second parameter of a jump, as an address.
  fn jump_target(&self, instruction: &Instruction) -> Result<usize> {
    let target = self.read(instruction, 1)?;
    Address::try_from_word(target)
      .map(|address| address.idx())
      .ok_or(Error::NegativeAddress { address: target, ip: instruction.ip })
  }

  // endregion

  // region Display methods

  fn make_cell_table<T>(
      name      : &str,
      cells     : &[T],
      highlight : Option<usize>,
      start     : usize
    ) -> Table
    where T: Display
  {
    let mut table = Table::new();

    table.set_format(*TABLE_DISPLAY_FORMAT);
    table.set_titles(row![ubr->"Address", ubl->"Contents"]);

    for (i, cell) in cells.iter().enumerate() {
      match Some(i + start) == highlight {

        true  => {
          table.add_row(
            row![r->format!("* --> {}[{}] =", name, i + start), format!("{}", cell)]
          );
        }

        false => {
          table.add_row(
            row![r->format!("{}[{}] =", name, i + start), format!("{}", cell)]
          );
        }

      } // end match on highlight
    } // end for
    table
  }

  fn make_register_table(&self) -> Table {
    let mut table = Table::new();

    table.set_format(*TABLE_DISPLAY_FORMAT);
    table.set_titles(row![ubr->"Register", ubl->"Contents"]);
    table.add_row(row![r->"ip =", self.ip]);
    table.add_row(row![r->"rb =", self.base]);
    table.add_row(row![r->"state =", self.state]);
    table.add_row(row![r->"queued =", self.inputs.len()]);
    table.add_row(row![r->"outputs =", self.outputs().len()]);
    table
  }

  // endregion
}

impl FromStr for Machine {
  type Err = Error;

  fn from_str(text: &str) -> Result<Machine> {
    Ok(Machine::new(text.parse::<Program>()?))
  }
}

impl Index<usize> for Machine {
  type Output = Word;

  fn index(&self, idx: usize) -> &Word {
    &self.memory[idx]
  }
}

impl IndexMut<usize> for Machine {
  fn index_mut(&mut self, idx: usize) -> &mut Word {
    &mut self.memory[idx]
  }
}

lazy_static! {
  static ref TABLE_DISPLAY_FORMAT: TableFormat::TableFormat =
    TableFormat::FormatBuilder::new()
      .column_separator('│')
      .borders(' ')
      .separator(
        TableFormat::LinePosition::Title,
        TableFormat::LineSeparator::new('─', '┼', ' ', ' ')
      )
      .separator(
        TableFormat::LinePosition::Bottom,
        TableFormat::LineSeparator::new('─', '┴', ' ', ' ')
      )
      .padding(1, 1)
      .build();
}

impl Display for Machine {
  fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
    let start = self.ip.saturating_sub(DUMP_CELLS_BEFORE).min(self.memory.len());
    let end = (self.ip + DUMP_CELLS_AFTER).min(self.memory.len()).max(start);
    let m_table = Machine::make_cell_table(
      "M", &self.memory.as_slice()[start..end], Some(self.ip), start
    );

    let outputs = self.outputs();
    let first_output = outputs.len().saturating_sub(DUMP_OUTPUTS);
    let o_table = Machine::make_cell_table("O", &outputs[first_output..], None, first_output);

    let r_table = self.make_register_table();

    let mut combined_table = table!([r_table, m_table, o_table]);

    combined_table.set_titles(row![ub->"Registers", ub->"Memory", ub->"Outputs"]);
    combined_table.set_format(*TABLE_DISPLAY_FORMAT);

    let next = match Instruction::fetch(&self.memory, self.ip) {
      Ok(instruction) => instruction.to_string(),
      Err(e) => e.to_string()
    };

    write!(f, "Next: {}\n{}", next, combined_table)
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  const QUINE: [Word; 16] = [
    109, 1, 204, -1, 1001, 100, 1, 100, 1008, 100, 16, 101, 1006, 101, 0, 99
  ];

  fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
  }

  fn run(program: &[Word], inputs: &[Word]) -> Machine {
    init_logging();
    let mut machine = Machine::new(program);
    machine.execute(inputs.iter().copied()).unwrap();
    machine
  }

  fn single_output(program: &str, input: Word) -> Word {
    let mut machine: Machine = program.parse().unwrap();
    machine.execute_strict(vec![input]).unwrap().unwrap()
  }

  #[test]
  fn self_add() {
    let machine = run(&[1, 0, 0, 0, 99], &[]);
    assert!(machine.is_done());
    assert_eq!(machine[0], 2);
  }

  #[test]
  fn add_and_multiply_by_position() {
    let machine = run(&[1, 9, 10, 3, 2, 3, 11, 0, 99, 30, 40, 50], &[]);
    assert_eq!(&machine.memory().as_slice()[..12], &[3500, 9, 10, 70, 2, 3, 11, 0, 99, 30, 40, 50]);
  }

  #[test]
  fn echo() {
    let machine = run(&[3, 0, 4, 0, 99], &[5]);
    assert!(machine.is_done());
    assert_eq!(machine.outputs(), &[5]);
  }

  #[test]
  fn multiply_immediate() {
    let machine = run(&[1002, 4, 3, 4, 33], &[]);
    assert!(machine.is_done());
    assert_eq!(machine[4], 99);
  }

  #[test]
  fn negative_immediate() {
    let machine = run(&[1101, 100, -1, 4, 0], &[]);
    assert!(machine.is_done());
    assert_eq!(machine[4], 99);
  }

  #[test]
  fn quine() {
    let machine = run(&QUINE, &[]);
    assert!(machine.is_done());
    assert_eq!(machine.outputs(), &QUINE[..]);
  }

  #[test]
  fn wide_integers() {
    let machine = run(&[104, 1125899906842624, 99], &[]);
    assert_eq!(machine.last_output(), Some(1125899906842624));

    let machine = run(&[1102, 34915192, 34915192, 7, 4, 7, 99, 0], &[]);
    assert_eq!(machine.last_output(), Some(1219070632396864));
  }

  #[test]
  fn comparisons_output_only_zero_or_one() {
    let equal_position = "3,9,8,9,10,9,4,9,99,-1,8";
    let less_position = "3,9,7,9,10,9,4,9,99,-1,8";
    let equal_immediate = "3,3,1108,-1,8,3,4,3,99";
    let less_immediate = "3,3,1107,-1,8,3,4,3,99";

    for &(input, equal, less) in &[(7, 0, 1), (8, 1, 0), (9, 0, 0)] {
      assert_eq!(single_output(equal_position, input), equal);
      assert_eq!(single_output(equal_immediate, input), equal);
      assert_eq!(single_output(less_position, input), less);
      assert_eq!(single_output(less_immediate, input), less);
    }
  }

  #[test]
  fn jumps() {
    let position = "3,12,6,12,15,1,13,14,13,4,13,99,-1,0,1,9";
    let immediate = "3,3,1105,-1,9,1101,0,0,12,4,12,99,1";
    for &(input, expected) in &[(0, 0), (5, 1), (-3, 1)] {
      assert_eq!(single_output(position, input), expected);
      assert_eq!(single_output(immediate, input), expected);
    }
  }

  #[test]
  fn compare_against_eight() {
    let program = "3,21,1008,21,8,20,1005,20,22,107,8,21,20,1006,20,31,\
                   1106,0,36,98,0,0,1002,21,125,20,4,20,1105,1,46,104,\
                   999,1105,1,46,1101,1000,1,20,4,20,1105,1,46,98,99";
    assert_eq!(single_output(program, 7), 999);
    assert_eq!(single_output(program, 8), 1000);
    assert_eq!(single_output(program, 9), 1001);
  }

  #[test]
  fn relative_base() {
    // ARB #-1 then OUT [rb+1], which reads cell 0.
    let machine = run(&[109, -1, 204, 1, 99], &[]);
    assert_eq!(machine.relative_base(), -1);
    assert_eq!(machine.outputs(), &[109]);

    // ARB #10 then IN -> [rb+3], so the input lands in cell 13.
    let machine = run(&[109, 10, 203, 3, 99], &[77]);
    assert_eq!(machine[13], 77);
  }

  #[test]
  fn suspend_and_resume() {
    init_logging();
    let mut machine = Machine::new(vec![3, 11, 3, 12, 1, 11, 12, 13, 4, 13, 99, 0, 0, 0]);
    assert_eq!(machine.state(), State::Ready);

    assert_eq!(machine.execute(None), Ok(None));
    assert_eq!(machine.state(), State::Suspended);
    assert_eq!(machine.ip(), 0);

    assert_eq!(machine.execute(vec![2]), Ok(None));
    assert_eq!(machine.state(), State::Suspended);
    assert_eq!(machine.ip(), 2);

    assert_eq!(machine.execute(vec![3]), Ok(Some(5)));
    assert!(machine.is_done());
  }

  #[test]
  fn resume_does_not_repeat_side_effects() {
    let mut machine = Machine::new(vec![104, 1, 3, 7, 4, 7, 99, 0]);
    assert_eq!(machine.execute(None), Ok(Some(1)));
    assert_eq!(machine.outputs(), &[1]);
    assert!(!machine.is_done());

    assert_eq!(machine.execute(vec![42]), Ok(Some(42)));
    assert_eq!(machine.outputs(), &[1, 42]);
    assert!(machine.is_done());
  }

  #[test]
  fn preset_inputs() {
    let mut machine = Machine::new(vec![3, 0, 3, 1, 4, 0, 4, 1, 99]).with_inputs(vec![6, 7]);
    assert_eq!(machine.pending_inputs().len(), 2);
    assert_eq!(machine.execute(None), Ok(Some(7)));
    assert_eq!(machine.outputs(), &[6, 7]);
    assert!(machine.pending_inputs().is_empty());
  }

  #[test]
  fn strict_fails_where_execute_suspends() {
    let program = [3, 0, 4, 0, 99];

    let mut pausing = Machine::new(&program[..]);
    assert_eq!(pausing.execute(None), Ok(None));
    assert!(!pausing.is_done());

    let mut strict = Machine::new(&program[..]);
    assert_eq!(strict.execute_strict(None), Err(Error::InputUnderflow { ip: 0 }));

    let mut strict = Machine::new(&program[..]);
    assert_eq!(strict.execute_strict(vec![3]), Ok(Some(3)));
    assert!(strict.is_done());
  }

  #[test]
  fn halted_machine_is_inert() {
    let mut machine = run(&[3, 0, 4, 0, 99], &[5]);
    let memory = machine.memory().clone();

    assert_eq!(machine.execute(vec![9]), Ok(Some(5)));
    assert_eq!(machine.execute_strict(None), Ok(Some(5)));
    assert_eq!(machine.step(), Ok(Step::Halted));
    assert_eq!(machine.memory(), &memory);
    assert_eq!(machine.outputs(), &[5]);
    assert!(machine.pending_inputs().is_empty());
  }

  #[test]
  fn single_steps() {
    let mut machine = Machine::new(vec![1101, 1, 1, 0, 3, 0, 99]);
    assert_eq!(machine.step(), Ok(Step::Continue));
    assert_eq!(machine[0], 2);
    assert_eq!(machine.state(), State::Running);
    assert_eq!(machine.step(), Ok(Step::Paused));
    assert_eq!(machine.state(), State::Suspended);
    machine.push_input(8);
    assert_eq!(machine.step(), Ok(Step::Continue));
    assert_eq!(machine.step(), Ok(Step::Halted));
    assert_eq!(machine.ip(), 6);
  }

  #[test]
  fn fatal_errors() {
    let mut machine = Machine::new(vec![98]);
    assert_eq!(
      machine.execute(None),
      Err(Error::InvalidOpcode { opcode: 98, word: 98, ip: 0 })
    );

    let mut machine = Machine::new(vec![11101, 1, 1, 5, 99]);
    assert_eq!(machine.execute(None), Err(Error::InvalidWriteMode { parameter: 2, ip: 0 }));

    let mut machine = Machine::new(vec![103, 0, 99]);
    assert_eq!(machine.execute(vec![1]), Err(Error::InvalidWriteMode { parameter: 0, ip: 0 }));

    let mut machine = Machine::new(vec![1, -1, 0, 0, 99]);
    assert_eq!(machine.execute(None), Err(Error::NegativeAddress { address: -1, ip: 0 }));

    let mut machine = Machine::new(vec![1105, 1, -5]);
    assert_eq!(machine.execute(None), Err(Error::NegativeAddress { address: -5, ip: 0 }));

    let mut machine = Machine::new(vec![109, -4, 1201, 0, 0, 0, 99]);
    assert_eq!(machine.execute(None), Err(Error::NegativeAddress { address: -4, ip: 2 }));
  }

  #[test]
  fn running_off_the_program_reads_zero() {
    let mut machine = Machine::with_config(vec![1101, 1, 1, 9], Config::default().scratch(0));
    assert_eq!(
      machine.execute(None),
      Err(Error::InvalidOpcode { opcode: 0, word: 0, ip: 4 })
    );
  }

  #[test]
  fn memory_grows_on_write() {
    let mut machine = Machine::with_config(vec![1101, 2, 3, 1000, 99], Config::default().scratch(0));
    assert_eq!(machine.memory().len(), 5);
    machine.execute(None).unwrap();
    assert_eq!(machine.memory().len(), 1001);
    assert_eq!(machine[1000], 5);
    assert_eq!(machine[999], 0);
  }

  #[test]
  fn memory_is_padded_at_load() {
    let machine = Machine::new(vec![99]);
    assert_eq!(machine.memory().len(), 1 + crate::config::DEFAULT_SCRATCH);
  }

  #[test]
  fn memory_limit() {
    let config = Config::default().scratch(0).memory_limit(16);
    let mut machine = Machine::with_config(vec![1101, 1, 1, 100, 99], config);
    assert_eq!(machine.execute(None), Err(Error::MemoryLimit { address: 100, limit: 16 }));
  }

  #[test]
  fn patching_memory_before_run() {
    let mut machine = Machine::new(vec![1, 0, 0, 0, 99]);
    machine[0] = 2;
    machine.execute(None).unwrap();
    assert_eq!(machine[0], 4);

    let mut machine = Machine::new(vec![1, 0, 0, 0, 99]);
    machine.memory_mut().write(Address(3), 5).unwrap();
    machine.execute(None).unwrap();
    assert_eq!(machine[5], 2);
  }

  #[test]
  fn reset_restores_program() {
    let mut machine = run(&[3, 0, 4, 0, 99], &[5]);
    assert_eq!(machine[0], 5);

    machine.reset();
    assert_eq!(machine.state(), State::Ready);
    assert_eq!(machine[0], 3);
    assert!(machine.outputs().is_empty());

    assert_eq!(machine.execute(vec![6]), Ok(Some(6)));
    assert_eq!(machine.outputs(), &[6]);
  }

  #[test]
  fn reading_outputs_does_not_consume_them() {
    let program = [104, 1, 104, 2, 104, 3, 104, 4, 104, 5, 99];
    let mut machine = run(&program, &[]);
    assert_eq!(machine.output(2), &[4, 5]);
    assert_eq!(machine.output(1), &[5]);
    assert_eq!(machine.output(10), &[1, 2, 3, 4, 5]);
    assert_eq!(machine.outputs(), &[1, 2, 3, 4, 5]);

    assert_eq!(machine.take_outputs(), vec![1, 2, 3, 4, 5]);
    assert!(machine.outputs().is_empty());
    assert_eq!(machine.last_output(), None);
  }

  #[test]
  fn output_history_cap() {
    let program = [104, 1, 104, 2, 104, 3, 104, 4, 104, 5, 99];
    let mut machine = Machine::with_config(&program[..], Config::default().output_history(2));
    assert_eq!(machine.execute(None), Ok(Some(5)));
    assert_eq!(machine.outputs(), &[4, 5]);
    assert_eq!(machine.output(5), &[4, 5]);
    assert_eq!(machine.output(1), &[5]);
    assert_eq!(machine.take_outputs(), vec![4, 5]);
  }

  #[test]
  fn parse_into_machine() {
    let mut machine: Machine = "3,0,4,0,99".parse().unwrap();
    assert_eq!(machine.execute(vec![-12]), Ok(Some(-12)));
    assert!("3,0,,99".parse::<Machine>().is_err());
  }

  #[test]
  fn independent_machines() {
    let program: Program = "3,0,4,0,99".parse().unwrap();
    let mut first = Machine::new(&program);
    let mut second = Machine::new(&program);
    first.execute(vec![1]).unwrap();
    assert_eq!(first[0], 1);
    assert_eq!(second[0], 3);
    assert_eq!(second.execute(vec![2]), Ok(Some(2)));
    assert_eq!(first.outputs(), &[1]);
  }

  #[test]
  fn state_dump() {
    let mut machine = Machine::new(vec![104, 17, 3, 0, 99]);
    machine.execute(None).unwrap();
    let dump = machine.to_string();
    assert!(dump.starts_with("Next: IN -> [0]"));
    assert!(dump.contains("Suspended"));
    assert!(dump.contains("* --> M[2] ="));
    assert!(dump.contains("O[0] ="));
  }
}
