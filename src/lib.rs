//! A small Brainfuck interpreter library.
//!
//! Source text goes through four stages:
//! 1. [`filter_source`] drops every character that is not one of `><+-.,[]`.
//! 2. [`tokenize`] maps the remaining symbols to [`Instruction`]s.
//! 3. [`validate`] checks that loops are balanced.
//! 4. [`Interpreter`] runs the instructions on a circular tape of byte cells
//!    (30,000 by default) with a single data pointer.
//!
//! [`Program::parse`] performs steps 2 and 3 together.
//!
//! Quick start:
//!
//! ```no_run
//! use tape_bf::{filter_source, Interpreter, Program};
//!
//! let code = filter_source("Print 'A': ++++++++[>++++++++<-]>+.");
//! let program = Program::parse(&code).expect("loops should be balanced");
//! let mut bf = Interpreter::new(program);
//! bf.run().expect("stdout should be writable");
//! println!();
//! ```

pub mod cli_util;
pub mod config;
mod engine;
mod program;
mod source;
mod token;
mod validate;

pub use engine::{Interpreter, Step, DEFAULT_TAPE_LENGTH};
pub use program::{Program, ProgramError};
pub use source::{filter_source, load_source, SourceError, SOURCE_EXTENSION};
pub use token::{tokenize, Instruction};
pub use validate::validate;
