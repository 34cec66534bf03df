use crate::env::Environment;
use anyhow::Result;
use std::io::Write;

/// Conventional process exit code type used by this crate.
///
/// A value of 0 indicates success; any non-zero value indicates failure.
pub type ExitCode = i32;

/// Status a child reports when it could not replace its image with the program.
pub const EXIT_FAILURE: ExitCode = 1;

/// What the read-eval loop should do after a command has run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// The command finished with the given exit code; keep reading lines.
    Finished(ExitCode),
    /// Stop the loop.
    Exit,
}

/// Object-safe trait for any command that can be executed by the shell.
///
/// Implemented by the built-ins and by external programs.
pub trait ExecutableCommand {
    /// Executes the command.
    ///
    /// `stdout` is the interpreter's own output stream. External programs inherit the
    /// process streams and do not write through it.
    fn execute(self: Box<Self>, stdout: &mut dyn Write, env: &Environment) -> Result<Outcome>;
}

/// Factory that tries to create a command from a name and its arguments.
///
/// Returns `None` when the factory doesn't recognize the `name`. Factories are queried
/// in order and the first hit wins, so built-ins are listed before the PATH search.
pub trait CommandFactory {
    /// Attempt to create a command instance for the provided name and arguments.
    fn try_create(
        &self,
        env: &Environment,
        name: &str,
        args: &[&str],
    ) -> Option<Box<dyn ExecutableCommand>>;
}
