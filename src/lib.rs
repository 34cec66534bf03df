//! A small line-oriented command interpreter.
//!
//! Each input line is split on whitespace into a command name and arguments. The
//! builtins `exit` and `env` run in-process; any other name is looked up in the
//! directories of `PATH` (names starting with `/` are used as-is) and run as a child
//! process the interpreter waits for.
//!
//! The main entry point is [`Interpreter`]. Lines come from a [`input::LineReader`]:
//! a line editor for terminals or a plain reader for pipes and files.

mod builtin;
pub mod command;
pub mod config;
pub mod env;
pub mod external;
pub mod input;
mod interpreter;
pub mod lexer;
pub mod logger;
pub mod signals;

pub use command::{ExitCode, Outcome};
pub use config::Config;
pub use env::Environment;
pub use external::PathResolver;
/// Just a convenient re-export of the interactive command runner.
///
/// See [`Interpreter`] for the high-level API and examples.
pub use interpreter::{Interpreter, NOT_FOUND};
