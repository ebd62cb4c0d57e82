//! Where command lines come from.

use seqexec_common::{ExecError, ExecResult};
use std::ffi::{OsStr, OsString};
use std::io::BufRead;
use std::os::unix::ffi::OsStrExt;

/// Commands run after the input stream is exhausted, when enabled.
pub const DEFAULT_BUILTIN_COMMANDS: &[&str] = &[
    "wc names.txt",
    "wc names_long_redundant.txt",
    "wc afilethatdoesnotexist",
    "sleep 10",
];

/// A finite, ordered supply of command lines.
pub trait CommandSource {
    /// Short label used in logs.
    fn name(&self) -> &str;

    /// The next command line, or `None` once the source is exhausted.
    fn next_command(&mut self) -> ExecResult<Option<OsString>>;
}

/// Reads one command per line until end of input.
///
/// The line terminator (`\n` or `\r\n`) is removed. The rest of the line is
/// kept byte for byte; it need not be UTF-8.
pub struct LineSource<R> {
    reader: R,
    name: String,
    buf: Vec<u8>,
}

impl<R: BufRead> LineSource<R> {
    pub fn new(reader: R, name: impl Into<String>) -> Self {
        Self {
            reader,
            name: name.into(),
            buf: Vec::new(),
        }
    }
}

impl<R: BufRead> CommandSource for LineSource<R> {
    fn name(&self) -> &str {
        &self.name
    }

    fn next_command(&mut self) -> ExecResult<Option<OsString>> {
        self.buf.clear();
        let read = self
            .reader
            .read_until(b'\n', &mut self.buf)
            .map_err(|e| ExecError::input_read(&self.name, e))?;
        if read == 0 {
            return Ok(None);
        }

        if self.buf.last() == Some(&b'\n') {
            self.buf.pop();
            if self.buf.last() == Some(&b'\r') {
                self.buf.pop();
            }
        }
        Ok(Some(OsStr::from_bytes(&self.buf).to_os_string()))
    }
}

/// A fixed list of command lines.
#[derive(Debug, Clone)]
pub struct BuiltinSource {
    commands: Vec<OsString>,
    position: usize,
}

impl BuiltinSource {
    pub fn new<I, S>(commands: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<OsString>,
    {
        Self {
            commands: commands.into_iter().map(Into::into).collect(),
            position: 0,
        }
    }

    /// The compiled-in list.
    pub fn defaults() -> Self {
        Self::new(DEFAULT_BUILTIN_COMMANDS.iter().copied())
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }
}

impl CommandSource for BuiltinSource {
    fn name(&self) -> &str {
        "builtin"
    }

    fn next_command(&mut self) -> ExecResult<Option<OsString>> {
        let next = self.commands.get(self.position).cloned();
        if next.is_some() {
            self.position += 1;
        }
        Ok(next)
    }
}
