use std::env as stdenv;
use std::ffi::{OsStr, OsString};
use std::io::{self, Write};
use std::os::unix::ffi::OsStrExt;

/// Read-only snapshot of the environment inherited by the interpreter.
///
/// Entries keep the order in which the process received them, so listing them
/// reproduces the inherited `NAME=value` table as-is. The snapshot is captured once
/// and then only borrowed: nothing in the crate mutates it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Environment {
    vars: Vec<(OsString, OsString)>,
}

impl Environment {
    /// Capture the current process environment.
    pub fn from_process() -> Self {
        Self {
            vars: stdenv::vars_os().collect(),
        }
    }

    /// Build a table from raw `NAME=value` entries.
    ///
    /// The first `=` separates the name from the value. Entries without `=` are skipped.
    pub fn from_entries<I, S>(entries: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let vars = entries
            .into_iter()
            .filter_map(|entry| {
                let (name, value) = entry.as_ref().split_once('=')?;
                Some((name.into(), value.into()))
            })
            .collect();
        Self { vars }
    }

    /// Get the value of an environment variable.
    ///
    /// Names are compared in full: `PATHOLOGY=x` is not a match for `PATH`.
    pub fn lookup(&self, name: &str) -> Option<&OsStr> {
        let name = OsStr::new(name);
        self.vars
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_os_str())
    }

    /// All variables in inherited order.
    pub fn list_all(&self) -> impl Iterator<Item = (&OsStr, &OsStr)> {
        self.vars
            .iter()
            .map(|(name, value)| (name.as_os_str(), value.as_os_str()))
    }

    /// Write every variable as a `NAME=value` line.
    pub fn write_entries(&self, out: &mut dyn Write) -> io::Result<()> {
        for (name, value) in self.list_all() {
            out.write_all(name.as_bytes())?;
            out.write_all(b"=")?;
            out.write_all(value.as_bytes())?;
            out.write_all(b"\n")?;
        }
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.vars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vars.is_empty()
    }
}
