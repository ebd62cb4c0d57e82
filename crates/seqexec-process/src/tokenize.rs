//! Command-line tokenization.
//!
//! Splitting is on ASCII whitespace runs only. There is no quoting or
//! escaping, so an argument can never contain a space. Lines are handled as
//! raw bytes: an argument reaches exec exactly as it was read, whatever its
//! encoding.

use seqexec_common::{ExecError, ExecResult};
use std::ffi::{CString, OsStr, OsString};
use std::os::unix::ffi::OsStrExt;

/// Default upper bound on tokens per command (program name included).
pub const DEFAULT_MAX_ARGS: usize = 255;

/// Split a command line into tokens, in input order.
///
/// Trailing newline and whitespace are ignored. A blank line yields an
/// empty vector.
///
/// ```
/// use seqexec_process::tokenize;
///
/// assert_eq!(tokenize("wc  -l names.txt\n"), vec!["wc", "-l", "names.txt"]);
/// assert!(tokenize(" \t\n").is_empty());
/// ```
pub fn tokenize<S: AsRef<OsStr> + ?Sized>(line: &S) -> Vec<OsString> {
    line.as_ref()
        .as_bytes()
        .split(u8::is_ascii_whitespace)
        .filter(|token| !token.is_empty())
        .map(|token| OsStr::from_bytes(token).to_os_string())
        .collect()
}

/// Ordered, non-empty sequence of tokens: program first, then its arguments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArgumentVector {
    tokens: Vec<OsString>,
}

impl ArgumentVector {
    /// Tokenize `line` and check it can be handed to exec.
    ///
    /// Fails with `MalformedCommand` on zero tokens, `TooManyArguments` when
    /// the token count exceeds `max_args`, and `InvalidArgument` when a token
    /// contains a NUL byte.
    pub fn parse<S: AsRef<OsStr> + ?Sized>(line: &S, max_args: usize) -> ExecResult<Self> {
        let tokens = tokenize(line);

        if tokens.is_empty() {
            return Err(ExecError::malformed_command(line.as_ref().to_string_lossy()));
        }
        if tokens.len() > max_args {
            return Err(ExecError::too_many_arguments(tokens.len(), max_args));
        }
        if let Some(bad) = tokens.iter().find(|token| token.as_bytes().contains(&0)) {
            return Err(ExecError::invalid_argument(bad.to_string_lossy()));
        }

        Ok(Self { tokens })
    }

    /// The executable name.
    pub fn program(&self) -> &OsStr {
        &self.tokens[0]
    }

    /// Arguments after the program name.
    pub fn args(&self) -> &[OsString] {
        &self.tokens[1..]
    }

    /// Number of tokens, program name included.
    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    /// Exec-ready copy of the tokens, byte for byte.
    pub fn to_c_args(&self) -> ExecResult<Vec<CString>> {
        self.tokens
            .iter()
            .map(|token| {
                CString::new(token.as_bytes())
                    .map_err(|_| ExecError::invalid_argument(token.to_string_lossy()))
            })
            .collect()
    }
}
