//! # Intcode
//!
//! A small stored-program virtual machine. Programs are sequences of signed integers that
//! serve as both code and data; instructions address their parameters by position, by
//! immediate value, or relative to an adjustable base register.
//!
//! Execution is cooperative. `Machine::execute` runs until the program halts or an input
//! instruction finds its queue empty, at which point the machine suspends and hands control
//! back to the caller, who can read outputs, queue more inputs and call `execute` again.
//! `Pipeline` chains several machines together this way.
//!
//! ```
//! use intcode::Machine;
//!
//! let mut machine: Machine = "3,0,4,0,99".parse().unwrap();
//! assert_eq!(machine.execute(None), Ok(None));
//! assert!(!machine.is_done());
//! assert_eq!(machine.execute(vec![5]), Ok(Some(5)));
//! assert!(machine.is_done());
//! ```

#[macro_use] extern crate prettytable;
#[macro_use] extern crate lazy_static;

pub mod address;
pub mod bytecode;
pub mod config;
pub mod error;
pub mod machine;
pub mod memory;
pub mod pipeline;

pub use bytecode::{disassemble, parse_program, Program, Word};
pub use config::Config;
pub use error::{Error, Result};
pub use machine::{Machine, State, Step};
pub use pipeline::Pipeline;
