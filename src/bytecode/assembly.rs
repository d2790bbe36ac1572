/*!
  The textual forms of a program. Programs are read from the comma separated list of integers
  they are distributed as, and can be rendered back out either in the same form or as a
  disassembly listing that leverages the `strum` mnemonics of `Operation`.
*/

use std::fmt::{Display, Formatter};
use std::ops::Deref;
use std::str::FromStr;

use nom::{
  IResult,
  character::complete::{
    char as one_char,
    digit1,
    multispace0,
    one_of
  },
  combinator::{all_consuming, map_res, opt, recognize},
  multi::separated_list,
  sequence::{delimited, pair}
};

use crate::bytecode::{Instruction, Word};
use crate::error::{Error, Result};
use crate::memory::Memory;

/// How much of the unparsed remainder an `Error::Parse` quotes.
const ERROR_CONTEXT: usize = 24;

/// An initial memory image.
#[derive(Clone, Debug, Default, Eq, PartialEq, Hash)]
pub struct Program(Vec<Word>);

impl Program {
  pub fn new(words: Vec<Word>) -> Program {
    Program(words)
  }

  pub fn into_words(self) -> Vec<Word> {
    self.0
  }
}

impl Deref for Program {
  type Target = [Word];

  fn deref(&self) -> &[Word] {
    &self.0
  }
}

impl From<Vec<Word>> for Program {
  fn from(words: Vec<Word>) -> Program {
    Program(words)
  }
}

impl From<&[Word]> for Program {
  fn from(words: &[Word]) -> Program {
    Program(words.to_vec())
  }
}

impl From<&Program> for Program {
  fn from(program: &Program) -> Program {
    program.clone()
  }
}

impl FromStr for Program {
  type Err = Error;

  fn from_str(text: &str) -> Result<Program> {
    parse_program(text)
  }
}

impl Display for Program {
  fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
    write!(
      f,
      "{}",
      self.0
          .iter()
          .map(Word::to_string)
          .collect::<Vec<String>>()
          .join(",")
    )
  }
}

fn word_p(input: &str) -> IResult<&str, Word> {
  map_res(
    recognize(pair(opt(one_of("+-")), digit1)),
    |text: &str| text.parse::<Word>()
  )(input)
}

fn program_p(input: &str) -> IResult<&str, Vec<Word>> {
  all_consuming(
    delimited(
      multispace0,
      separated_list(
        delimited(multispace0, one_char(','), multispace0),
        word_p
      ),
      multispace0
    )
  )(input)
}

/// Parses program text: signed integers separated by commas, with any surrounding whitespace.
pub fn parse_program(text: &str) -> Result<Program> {
  match program_p(text) {
    Ok((_rest, words)) => Ok(Program(words)),

    Err(nom::Err::Error((rest, _kind))) | Err(nom::Err::Failure((rest, _kind))) => {
      Err(Error::Parse { near: rest.chars().take(ERROR_CONTEXT).collect() })
    }

    Err(nom::Err::Incomplete(_)) => Err(Error::Parse { near: String::new() }),
  }
}

/**
  Renders a listing of `words` starting at address zero, one line per instruction. A word that
  does not decode, or an instruction that would run past the end of `words`, is listed as a
  single `DATA` word and the listing continues with the next cell.
*/
pub fn disassemble(words: &[Word]) -> String {
  let memory = Memory::new(words.to_vec(), words.len());
  let mut listing = String::new();
  let mut ip = 0;

  while ip < words.len() {
    let line = match Instruction::fetch(&memory, ip) {
      Ok(instruction) if instruction.next_ip() <= words.len() => {
        let text = format!("{:>6}: {}\n", ip, instruction);
        ip = instruction.next_ip();
        text
      }
      _ => {
        let text = format!("{:>6}: DATA {}\n", ip, words[ip]);
        ip += 1;
        text
      }
    };
    listing.push_str(&line);
  }

  listing
}
