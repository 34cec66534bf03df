use crate::command::{CommandFactory, ExecutableCommand, Outcome};
use crate::env::Environment;
use crate::interpreter::Factory;
use anyhow::Result;
use std::io::Write;

/// Built-in commands known to the shell at compile time.
///
/// Builtins run in-process and take precedence over any program of the same name
/// found in `PATH`. Names match exactly and case-sensitively.
pub(crate) trait BuiltinCommand: Sized {
    /// Canonical name of the command, e.g. "exit" or "env".
    fn name() -> &'static str;

    /// Build the command from the tokens following its name.
    fn from_args(args: &[&str]) -> Self;

    /// Executes the command using the interpreter's output and environment.
    fn execute(self, stdout: &mut dyn Write, env: &Environment) -> Result<Outcome>;
}

impl<T: BuiltinCommand> ExecutableCommand for T {
    fn execute(self: Box<Self>, stdout: &mut dyn Write, env: &Environment) -> Result<Outcome> {
        match T::execute(*self, stdout, env) {
            Ok(x) => Ok(x),
            Err(e) => {
                log::warn!("{}: {:#}", T::name(), e);
                Ok(Outcome::Finished(1))
            }
        }
    }
}

impl<T: BuiltinCommand + 'static> CommandFactory for Factory<T> {
    fn try_create(
        &self,
        _env: &Environment,
        name: &str,
        args: &[&str],
    ) -> Option<Box<dyn ExecutableCommand>> {
        if name == T::name() {
            Some(Box::new(T::from_args(args)))
        } else {
            None
        }
    }
}

/// The table of built-ins, in lookup order.
pub(crate) fn builtins() -> Vec<Box<dyn CommandFactory>> {
    vec![
        Box::new(Factory::<Exit>::default()),
        Box::new(Factory::<Env>::default()),
    ]
}

/// Leave the interpreter.
///
/// Arguments are accepted and ignored: `exit 5` behaves like `exit`.
#[derive(Debug, Default)]
pub struct Exit;

impl BuiltinCommand for Exit {
    fn name() -> &'static str {
        "exit"
    }

    fn from_args(args: &[&str]) -> Self {
        if !args.is_empty() {
            log::debug!("exit: ignoring {} argument(s)", args.len());
        }
        Exit
    }

    fn execute(self, _stdout: &mut dyn Write, _env: &Environment) -> Result<Outcome> {
        Ok(Outcome::Exit)
    }
}

/// Print the inherited environment, one `NAME=value` per line.
#[derive(Debug, Default)]
pub struct Env;

impl BuiltinCommand for Env {
    fn name() -> &'static str {
        "env"
    }

    fn from_args(_args: &[&str]) -> Self {
        Env
    }

    fn execute(self, stdout: &mut dyn Write, env: &Environment) -> Result<Outcome> {
        env.write_entries(stdout)?;
        stdout.flush()?;
        Ok(Outcome::Finished(0))
    }
}
