use anyhow::{Context, Result};
use hsh::input::{Piped, Terminal};
use hsh::{Config, Environment, Interpreter, PathResolver, logger, signals};
use std::io::{self, IsTerminal};

fn main() -> Result<()> {
    // argv[0] names the interpreter in "not found" diagnostics.
    let program_name = std::env::args_os()
        .next()
        .map(|arg0| arg0.to_string_lossy().into_owned())
        .unwrap_or_else(|| "hsh".to_string());
    let config: Config = argh::from_env();

    logger::init(config.level()).context("cannot install logger")?;
    signals::install_interrupt_handler().context("cannot install SIGINT handler")?;

    let mut interpreter = Interpreter::with_resolver(
        program_name,
        Environment::from_process(),
        PathResolver::new(config.max_path_len),
    );

    let mut stdout = io::stdout();
    if io::stdin().is_terminal() {
        let mut input = Terminal::new(config.prompt)?;
        interpreter.repl(&mut input, &mut stdout)?;
    } else {
        let mut input = Piped::new(io::stdin().lock());
        interpreter.repl(&mut input, &mut stdout)?;
    }
    Ok(())
}
