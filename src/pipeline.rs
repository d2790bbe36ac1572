/*!
  Drives several independent machines as a chain. Every stage runs its own copy of one program
  and is primed with a phase setting, its first input. Signals then flow from each stage's
  freshest output into the next stage's input queue, either once down the chain (`run_series`)
  or round and round with the last stage feeding the first until every stage halts
  (`run_feedback`).
*/

use log::debug;

use crate::bytecode::{Program, Word};
use crate::config::Config;
use crate::error::{Error, Result};
use crate::machine::Machine;

#[derive(Clone, Debug)]
pub struct Pipeline {
  stages: Vec<Machine>,
}

impl Pipeline {
  pub fn new<P: Into<Program>>(program: P, phases: &[Word]) -> Result<Pipeline> {
    Pipeline::with_config(program, phases, Config::default())
  }

  /// Loads one machine per phase setting and runs each until it first waits for a signal.
  pub fn with_config<P: Into<Program>>(program: P, phases: &[Word], config: Config)
    -> Result<Pipeline>
  {
    let program = program.into();
    let mut stages = Vec::with_capacity(phases.len());

    for &phase in phases {
      let mut machine = Machine::with_config(&program, config);
      machine.execute(Some(phase))?;
      stages.push(machine);
    }

    debug!("primed {} stages with phases {:?}", stages.len(), phases);
    Ok(Pipeline { stages })
  }

  pub fn len(&self) -> usize {
    self.stages.len()
  }

  pub fn is_empty(&self) -> bool {
    self.stages.is_empty()
  }

  pub fn stage(&self, index: usize) -> Option<&Machine> {
    self.stages.get(index)
  }

  /// Whether every stage has halted.
  pub fn is_done(&self) -> bool {
    self.stages.iter().all(Machine::is_done)
  }

  /**
    Sends `seed` to the first stage and each stage's output on to the next, once. Returns the
    output of the last stage, or `seed` itself if there are no stages.
  */
  pub fn run_series(&mut self, seed: Word) -> Result<Word> {
    let mut signal = seed;
    for (stage, machine) in self.stages.iter_mut().enumerate() {
      signal = machine.execute(Some(signal))?
                      .ok_or(Error::NoOutput { stage })?;
    }
    Ok(signal)
  }

  /**
    Like `run_series`, but the output of the last stage is fed back into the first, round
    robin, until every stage has halted. Returns the final output of the last stage.
  */
  pub fn run_feedback(&mut self, seed: Word) -> Result<Word> {
    let mut signal = seed;
    let mut rounds = 0usize;

    while !self.is_done() {
      signal = self.run_series(signal)?;
      rounds += 1;
    }

    debug!("feedback loop settled after {} rounds", rounds);
    match self.stages.last() {
      Some(machine) => {
        machine.last_output().ok_or(Error::NoOutput { stage: self.stages.len() - 1 })
      }
      None => Ok(signal)
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::machine::State;

  const SERIES: &str = "3,15,3,16,1002,16,10,16,1,16,15,15,4,15,99,0,0";
  const FEEDBACK: &str =
    "3,26,1001,26,-4,26,3,27,1002,27,2,27,1,27,26,27,4,27,1001,28,-1,28,1005,28,6,99,0,0,5";
  const FEEDBACK_LONG: &str =
    "3,52,1001,52,-5,52,3,53,1,52,56,54,1007,54,5,55,1005,55,26,1001,54,\
     -5,54,1105,1,12,1,53,54,53,1008,54,0,55,1001,55,1,55,2,53,55,53,4,\
     53,1001,56,-1,56,1005,56,6,99,0,0,0,0,10";

  fn program(text: &str) -> Program {
    text.parse().unwrap()
  }

  fn permutations(items: &[Word]) -> Vec<Vec<Word>> {
    if items.len() <= 1 {
      return vec![items.to_vec()];
    }
    let mut result = vec![];
    for i in 0..items.len() {
      let mut rest = items.to_vec();
      let first = rest.remove(i);
      for mut tail in permutations(&rest) {
        tail.insert(0, first);
        result.push(tail);
      }
    }
    result
  }

  #[test]
  fn primed_stages_wait_for_a_signal() {
    let pipeline = Pipeline::new(program(SERIES), &[4, 3, 2, 1, 0]).unwrap();
    assert_eq!(pipeline.len(), 5);
    for index in 0..pipeline.len() {
      let stage = pipeline.stage(index).unwrap();
      assert_eq!(stage.state(), State::Suspended);
      assert_eq!(stage.last_output(), None);
    }
  }

  #[test]
  fn series() {
    let mut pipeline = Pipeline::new(program(SERIES), &[4, 3, 2, 1, 0]).unwrap();
    assert_eq!(pipeline.run_series(0), Ok(43210));
    assert!(pipeline.is_done());

    let text = "3,23,3,24,1002,24,10,24,1002,23,-1,23,101,5,23,23,1,24,23,23,4,23,99,0,0";
    let mut pipeline = Pipeline::new(program(text), &[0, 1, 2, 3, 4]).unwrap();
    assert_eq!(pipeline.run_series(0), Ok(54321));
  }

  #[test]
  fn best_series_phase_setting() {
    let program = program(SERIES);
    let best = permutations(&[0, 1, 2, 3, 4])
      .iter()
      .map(|phases| Pipeline::new(&program, phases).unwrap().run_series(0).unwrap())
      .max();
    assert_eq!(best, Some(43210));
  }

  #[test]
  fn feedback() {
    let mut pipeline = Pipeline::new(program(FEEDBACK), &[9, 8, 7, 6, 5]).unwrap();
    assert!(!pipeline.is_done());
    assert_eq!(pipeline.run_feedback(0), Ok(139629729));
    assert!(pipeline.is_done());
    for index in 0..pipeline.len() {
      assert!(pipeline.stage(index).unwrap().is_done());
    }

    let mut pipeline = Pipeline::new(program(FEEDBACK_LONG), &[9, 7, 8, 5, 6]).unwrap();
    assert_eq!(pipeline.run_feedback(0), Ok(18216));
  }

  #[test]
  fn feedback_on_finished_pipeline_is_stable() {
    let mut pipeline = Pipeline::new(program(FEEDBACK), &[9, 8, 7, 6, 5]).unwrap();
    assert_eq!(pipeline.run_feedback(0), Ok(139629729));
    assert_eq!(pipeline.run_feedback(0), Ok(139629729));
  }

  #[test]
  fn empty_pipeline_passes_seed_through() {
    let mut pipeline = Pipeline::new(program(SERIES), &[]).unwrap();
    assert!(pipeline.is_empty());
    assert_eq!(pipeline.run_series(7), Ok(7));
    assert_eq!(pipeline.run_feedback(7), Ok(7));
  }

  #[test]
  fn silent_stage() {
    // Reads its phase and its signal, then halts without output.
    let mut pipeline = Pipeline::new(program("3,0,3,0,99"), &[1, 2]).unwrap();
    assert_eq!(pipeline.run_series(0), Err(Error::NoOutput { stage: 0 }));
  }

  #[test]
  fn stage_errors_propagate() {
    let result = Pipeline::new(program("3,0,98"), &[1]);
    assert_eq!(result.err(), Some(Error::InvalidOpcode { opcode: 98, word: 98, ip: 2 }));
  }
}
