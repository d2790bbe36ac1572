use std::{fs, path::PathBuf, process};

use clap::Parser;
use log::info;

use intcode::{config, disassemble, Config, Machine, Program, Word};

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Arguments {
  /// File holding the comma separated program.
  program_file: PathBuf,
  /// A value to queue as input. Repeat for several.
  #[arg(short, long = "input", allow_negative_numbers = true)]
  inputs: Vec<Word>,
  /// Fail instead of stopping when the program waits for more input.
  #[arg(long)]
  strict: bool,
  /// Print the disassembled program instead of running it.
  #[arg(long)]
  disassemble: bool,
  /// Print the machine state after the run.
  #[arg(long)]
  dump: bool,
  /// Print outputs below 128 as characters.
  #[arg(long)]
  ascii: bool,
  /// Zero cells to allocate past the end of the program.
  #[arg(long, default_value_t = config::DEFAULT_SCRATCH)]
  scratch: usize,
  /// Largest number of memory cells a program may grow to.
  #[arg(long, default_value_t = config::DEFAULT_MEMORY_LIMIT)]
  memory_limit: usize,
}

fn run(args: Arguments) -> Result<(), Box<dyn std::error::Error>> {
  let text = fs::read_to_string(&args.program_file)?;
  let program: Program = text.parse()?;
  info!("loaded {} words from {}", program.len(), args.program_file.display());

  if args.disassemble {
    print!("{}", disassemble(&program));
    return Ok(());
  }

  let config = Config::default().scratch(args.scratch).memory_limit(args.memory_limit);
  let mut machine = Machine::with_config(program, config);
  match args.strict {
    true  => machine.execute_strict(args.inputs)?,
    false => machine.execute(args.inputs)?,
  };

  let outputs = machine.outputs();
  match args.ascii {
    true => {
      let text: String = outputs
        .iter()
        .map(|&value| match value {
          0..=127 => (value as u8 as char).to_string(),
          _ => format!("{}\n", value)
        })
        .collect();
      print!("{}", text);
    }
    false => {
      for value in outputs {
        println!("{}", value);
      }
    }
  }

  if args.dump {
    println!("{}", machine);
  }
  if !machine.is_done() {
    eprintln!("program is waiting for input at ip = {}", machine.ip());
  }
  Ok(())
}

fn main() {
  env_logger::init();

  if let Err(e) = run(Arguments::parse()) {
    eprintln!("error: {}", e);
    process::exit(1);
  }
}
