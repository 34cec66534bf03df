use crate::builtin;
use crate::command::{CommandFactory, EXIT_FAILURE, ExecutableCommand, ExitCode, Outcome};
use crate::env::Environment;
use crate::external::{PathResolver, SpawnError};
use crate::input::{Line, LineReader};
use crate::lexer::{self, DELIMITERS};
use anyhow::Result;
use std::io::Write;

/// Exit code recorded for a command that could not be found.
pub const NOT_FOUND: ExitCode = 127;

/// Factory allows creating instances of ExecutableCommand.
///
/// Used for the builtins, which need no state to be created.
pub(crate) struct Factory<T> {
    _phantom: std::marker::PhantomData<T>,
}

impl<T> Default for Factory<T> {
    fn default() -> Self {
        Self {
            _phantom: std::marker::PhantomData,
        }
    }
}

/// A minimal shell-like interpreter that runs built-in and external commands.
///
/// The interpreter owns a read-only [`Environment`] snapshot and a list of
/// [`CommandFactory`] objects that are queried, in order, to create commands by
/// name. It also counts the lines it has processed; the count labels the
/// "not found" diagnostic.
///
/// Example
/// ```
/// use hsh::{Environment, Interpreter, Outcome, PathResolver};
///
/// let env = Environment::from_entries(["PATH=/bin:/usr/bin"]);
/// let mut sh = Interpreter::with_resolver("hsh", env, PathResolver::default());
/// let mut out: Vec<u8> = Vec::new();
/// assert_eq!(sh.eval_line("definitely-not-a-command\n", &mut out).unwrap(), Outcome::Finished(127));
/// assert_eq!(out, b"hsh: 1: definitely-not-a-command: not found\n");
/// assert_eq!(sh.eval_line("exit\n", &mut out).unwrap(), Outcome::Exit);
/// ```
pub struct Interpreter {
    program_name: String,
    env: Environment,
    commands: Vec<Box<dyn CommandFactory>>,
    line_count: usize,
}

impl Interpreter {
    /// Create a new interpreter with a custom set of command factories.
    pub fn new(
        program_name: impl Into<String>,
        env: Environment,
        commands: Vec<Box<dyn CommandFactory>>,
    ) -> Self {
        Self {
            program_name: program_name.into(),
            env,
            commands,
            line_count: 0,
        }
    }

    /// Create an interpreter with the builtins (`exit`, `env`) followed by the
    /// PATH search done by `resolver`.
    pub fn with_resolver(
        program_name: impl Into<String>,
        env: Environment,
        resolver: PathResolver,
    ) -> Self {
        let mut commands = builtin::builtins();
        commands.push(Box::new(resolver));
        Self::new(program_name, env, commands)
    }

    /// Number of lines processed so far.
    pub fn line_count(&self) -> usize {
        self.line_count
    }

    pub fn environment(&self) -> &Environment {
        &self.env
    }

    fn create(&self, name: &str, args: &[&str]) -> Option<Box<dyn ExecutableCommand>> {
        self.commands
            .iter()
            .find_map(|factory| factory.try_create(&self.env, name, args))
    }

    /// Process one input line.
    ///
    /// An empty line does nothing. An unknown command prints
    /// `<program>: <line>: <command>: not found` to `stdout`. A failure to create the
    /// child process is reported on stderr. Neither stops the interpreter; errors
    /// returned from here are fatal.
    pub fn eval_line(&mut self, line: &str, stdout: &mut dyn Write) -> Result<Outcome> {
        self.line_count += 1;

        let Some(tokens) = lexer::split_into_tokens(line, DELIMITERS)? else {
            return Ok(Outcome::Finished(0));
        };

        let name = tokens.command();
        let Some(cmd) = self.create(name, tokens.args()) else {
            writeln!(
                stdout,
                "{}: {}: {}: not found",
                self.program_name, self.line_count, name
            )?;
            stdout.flush()?;
            return Ok(Outcome::Finished(NOT_FOUND));
        };

        match cmd.execute(stdout, &self.env) {
            Ok(outcome) => Ok(outcome),
            Err(e) => match e.downcast::<SpawnError>() {
                Ok(spawn_error) => {
                    log::error!("{}: {}", name, spawn_error);
                    eprintln!("{}", spawn_error);
                    Ok(Outcome::Finished(EXIT_FAILURE))
                }
                Err(e) => Err(e),
            },
        }
    }

    /// The read-eval loop.
    ///
    /// Runs until the `exit` builtin or the end of input. Neither is an error. A
    /// Ctrl-C while reading just asks for a new line. For interactive input a newline
    /// is written at end of input so the caller's prompt starts on a fresh line.
    pub fn repl(&mut self, input: &mut dyn LineReader, stdout: &mut dyn Write) -> Result<()> {
        loop {
            match input.read_line()? {
                Line::Text(line) => {
                    let outcome = self.eval_line(&line, stdout)?;
                    log::trace!("line {}: {:?}", self.line_count, outcome);
                    if outcome == Outcome::Exit {
                        break;
                    }
                }
                Line::Interrupted => {
                    log::debug!("read interrupted");
                }
                Line::Eof => {
                    if input.is_interactive() {
                        writeln!(stdout)?;
                    }
                    break;
                }
            }
        }
        stdout.flush()?;
        Ok(())
    }
}
