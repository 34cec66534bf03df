use crate::command::{CommandFactory, EXIT_FAILURE, ExecutableCommand, ExitCode, Outcome};
use crate::env::Environment;
use anyhow::Result;
use nix::errno::Errno;
use nix::libc::{self, c_char};
use nix::sys::wait::{WaitStatus, waitpid};
use nix::unistd::{AccessFlags, ForkResult, Pid, access, fork};
use std::ffi::{CString, NulError, OsStr, OsString};
use std::fmt;
use std::io::{self, Write};
use std::os::unix::ffi::{OsStrExt, OsStringExt};
use std::path::{Path, PathBuf};

/// Default bound on a candidate path, terminating NUL included.
pub const DEFAULT_MAX_PATH_LEN: usize = 1024;

/// Process creation failed before any program could run.
#[derive(Debug)]
pub enum SpawnError {
    /// An argument or variable contains a NUL byte and cannot be passed to `execve`.
    Nul(NulError),
    /// The OS refused to create a child (e.g. out of processes or memory).
    Fork(io::Error),
    /// Waiting for the child failed.
    Wait(io::Error),
}

impl fmt::Display for SpawnError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SpawnError::Nul(e) => write!(f, "exec: {}", e),
            SpawnError::Fork(e) => write!(f, "fork: {}", e),
            SpawnError::Wait(e) => write!(f, "wait: {}", e),
        }
    }
}

impl std::error::Error for SpawnError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            SpawnError::Nul(e) => Some(e),
            SpawnError::Fork(e) | SpawnError::Wait(e) => Some(e),
        }
    }
}

/// Finds programs in the directories listed by `PATH`.
#[derive(Debug, Clone, Copy)]
pub struct PathResolver {
    max_path_len: usize,
}

impl Default for PathResolver {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_PATH_LEN)
    }
}

impl PathResolver {
    /// `max_path_len` bounds the candidate path, counting its terminating NUL.
    pub fn new(max_path_len: usize) -> Self {
        Self { max_path_len }
    }

    pub fn max_path_len(&self) -> usize {
        self.max_path_len
    }

    /// Resolve a bare command name using the `PATH` of `env`.
    ///
    /// Returns `None` when `PATH` is not set: there is no fallback directory list.
    pub fn resolve(&self, env: &Environment, command: &str) -> Option<PathBuf> {
        let Some(search_paths) = env.lookup("PATH") else {
            log::debug!("{}: PATH is not set", command);
            return None;
        };
        self.find_in_path(search_paths, command)
    }

    /// Search each directory of the colon-separated `search_paths`, in order, and
    /// return the first `dir/command` that is an executable regular file.
    ///
    /// Empty entries are skipped. So is any directory for which the candidate path
    /// would exceed the length bound.
    pub fn find_in_path(&self, search_paths: &OsStr, command: &str) -> Option<PathBuf> {
        if command.is_empty() {
            return None;
        }

        for dir in split_paths(search_paths) {
            // dir + '/' + command + NUL
            let total_len = dir.len() + command.len() + 2;
            if total_len > self.max_path_len {
                log::trace!(
                    "skipping {}: candidate needs {} bytes, limit is {}",
                    Path::new(dir).display(),
                    total_len,
                    self.max_path_len
                );
                continue;
            }

            // Plain concatenation: `/bin/` gives `/bin//ls`, like any other shell.
            let mut candidate = dir.as_bytes().to_vec();
            candidate.push(b'/');
            candidate.extend_from_slice(command.as_bytes());
            let candidate = PathBuf::from(OsString::from_vec(candidate));
            if is_executable(&candidate) {
                log::debug!("{} resolved to {}", command, candidate.display());
                return Some(candidate);
            }
            log::trace!("{} is not executable", candidate.display());
        }

        log::debug!("{}: no match in PATH", command);
        None
    }
}

fn split_paths(search_paths: &OsStr) -> impl Iterator<Item = &OsStr> {
    search_paths
        .as_bytes()
        .split(|b| *b == b':')
        .filter(|dir| !dir.is_empty())
        .map(OsStr::from_bytes)
}

fn is_executable(path: &Path) -> bool {
    path.is_file() && access(path, AccessFlags::X_OK).is_ok()
}

impl CommandFactory for PathResolver {
    fn try_create(
        &self,
        env: &Environment,
        name: &str,
        args: &[&str],
    ) -> Option<Box<dyn ExecutableCommand>> {
        let cmd = ExternalCommand::resolve(self, env, name, args)?;
        Some(Box::new(cmd))
    }
}

/// Command that is not a builtin: a program path plus its arguments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExternalCommand {
    program: PathBuf,
    args: Vec<OsString>,
}

impl ExternalCommand {
    pub fn new(program: impl Into<PathBuf>, args: Vec<OsString>) -> Self {
        Self {
            program: program.into(),
            args,
        }
    }

    /// Turn a command name into a runnable command.
    ///
    /// A name starting with `/` is taken as already resolved and is not checked.
    /// Anything else goes through the PATH search.
    pub fn resolve(
        resolver: &PathResolver,
        env: &Environment,
        name: &str,
        args: &[&str],
    ) -> Option<Self> {
        let program = if name.starts_with('/') {
            PathBuf::from(name)
        } else {
            resolver.resolve(env, name)?
        };
        Some(Self::new(program, args.iter().map(OsString::from).collect()))
    }

    pub fn program(&self) -> &Path {
        &self.program
    }

    /// The full argument vector; element 0 is the program path.
    pub fn argv(&self) -> Vec<&OsStr> {
        std::iter::once(self.program.as_os_str())
            .chain(self.args.iter().map(OsString::as_os_str))
            .collect()
    }

    /// Start the program in a child process without waiting for it.
    ///
    /// The child replaces its image with the program, receiving the entries of `env`
    /// in their original order (duplicates included) and the inherited standard
    /// streams. If that fails, the child exits with [`EXIT_FAILURE`].
    pub fn spawn(&self, env: &Environment) -> Result<Pid, SpawnError> {
        // Everything the child needs is allocated before forking.
        let image = ExecImage::new(self, env).map_err(SpawnError::Nul)?;

        // SAFETY: the child only calls async-signal-safe functions before exec.
        match unsafe { fork() } {
            Ok(ForkResult::Child) => unsafe {
                libc::execve(
                    image.program.as_ptr(),
                    image.argv_ptrs.as_ptr(),
                    image.envp_ptrs.as_ptr(),
                );
                libc::_exit(EXIT_FAILURE)
            },
            Ok(ForkResult::Parent { child }) => {
                log::info!("started {} (pid {})", self.program.display(), child);
                Ok(child)
            }
            Err(errno) => Err(SpawnError::Fork(errno.into())),
        }
    }

    /// Run the program in a child process and wait for it to terminate.
    ///
    /// A program that cannot be executed at all (missing, not executable, bad format)
    /// shows up as a child exiting with [`EXIT_FAILURE`].
    pub fn run(&self, env: &Environment) -> Result<ExitCode, SpawnError> {
        let pid = match self.spawn(env) {
            Ok(pid) => pid,
            Err(SpawnError::Nul(e)) => {
                log::info!("{}: cannot execute: {}", self.program.display(), e);
                return Ok(EXIT_FAILURE);
            }
            Err(e) => return Err(e),
        };

        let code = wait_for(pid)?;
        log::info!("{} exited with {}", self.program.display(), code);
        Ok(code)
    }
}

impl ExecutableCommand for ExternalCommand {
    fn execute(self: Box<Self>, stdout: &mut dyn Write, env: &Environment) -> Result<Outcome> {
        // The child writes straight to the inherited stream.
        stdout.flush()?;
        let code = self.run(env)?;
        Ok(Outcome::Finished(code))
    }
}

/// `execve` arguments, built up front so the forked child does not allocate.
struct ExecImage {
    program: CString,
    argv_ptrs: Vec<*const c_char>,
    envp_ptrs: Vec<*const c_char>,
    // Owners of the strings the pointer vectors refer to.
    _argv: Vec<CString>,
    _envp: Vec<CString>,
}

impl ExecImage {
    fn new(cmd: &ExternalCommand, env: &Environment) -> Result<Self, NulError> {
        let program = CString::new(cmd.program.as_os_str().as_bytes())?;
        let argv = cmd
            .argv()
            .into_iter()
            .map(|arg| CString::new(arg.as_bytes()))
            .collect::<Result<Vec<_>, _>>()?;
        let envp = env
            .list_all()
            .map(|(name, value)| {
                let mut entry = name.as_bytes().to_vec();
                entry.push(b'=');
                entry.extend_from_slice(value.as_bytes());
                CString::new(entry)
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            program,
            argv_ptrs: null_terminated(&argv),
            envp_ptrs: null_terminated(&envp),
            _argv: argv,
            _envp: envp,
        })
    }
}

fn null_terminated(strings: &[CString]) -> Vec<*const c_char> {
    strings
        .iter()
        .map(|s| s.as_ptr())
        .chain(std::iter::once(std::ptr::null()))
        .collect()
}

/// Block until `pid` terminates. A child killed by a signal reports `128 + signal`.
fn wait_for(pid: Pid) -> Result<ExitCode, SpawnError> {
    loop {
        match waitpid(pid, None) {
            Ok(WaitStatus::Exited(_, code)) => return Ok(code),
            Ok(WaitStatus::Signaled(_, signal, _)) => return Ok(128 + signal as i32),
            Ok(_) | Err(Errno::EINTR) => continue,
            Err(errno) => return Err(SpawnError::Wait(errno.into())),
        }
    }
}
