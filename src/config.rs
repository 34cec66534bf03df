use crate::external::DEFAULT_MAX_PATH_LEN;
use crate::input::DEFAULT_PROMPT;
use argh::FromArgs;
use log::LevelFilter;
use std::str::FromStr;

#[derive(FromArgs, Debug)]
/// Read commands from standard input, one per line, and run them.
pub struct Config {
    #[argh(option, default = "DEFAULT_MAX_PATH_LEN")]
    /// longest path, in bytes, tried while searching PATH (default 1024)
    pub max_path_len: usize,

    #[argh(option, default = "DEFAULT_PROMPT.to_string()")]
    /// prompt shown when reading from a terminal
    pub prompt: String,

    #[argh(option, default = "LevelFilter::Warn", from_str_fn(parse_level))]
    /// diagnostics written to stderr: off, error, warn, info, debug or trace
    pub log_level: LevelFilter,

    #[argh(switch, short = 'v')]
    /// log more; repeat for more detail (-v info, -vv debug, -vvv trace)
    pub verbose: u8,
}

fn parse_level(value: &str) -> Result<LevelFilter, String> {
    LevelFilter::from_str(value).map_err(|_| format!("unknown log level: {}", value))
}

impl Config {
    /// Effective log level: each `-v` raises `--log-level` by one step, up to trace.
    pub fn level(&self) -> LevelFilter {
        LevelFilter::iter()
            .nth(self.log_level as usize + usize::from(self.verbose))
            .unwrap_or(LevelFilter::max())
    }
}
