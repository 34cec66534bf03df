//! A module implementing lexical analysis (tokenization) of a command line.
//!
//! There is no quoting or escaping: a token is any maximal run of characters that
//! are not delimiters.

use std::collections::TryReserveError;
use std::fmt;

/// Delimiters used by the interpreter to split an input line.
pub const DELIMITERS: &[char] = &[' ', '\t', '\r', '\n'];

/// Errors that can occur during the lexical analysis process.
#[derive(Debug)]
pub enum LexingError {
    /// Storage for the tokens could not be reserved.
    OutOfMemory(TryReserveError),
}

impl fmt::Display for LexingError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LexingError::OutOfMemory(e) => write!(f, "cannot allocate tokens: {}", e),
        }
    }
}

impl std::error::Error for LexingError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            LexingError::OutOfMemory(e) => Some(e),
        }
    }
}

/// A non-empty, ordered sequence of tokens borrowed from one input line.
///
/// The first token is the command name; the remaining ones are its arguments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tokens<'a> {
    words: Vec<&'a str>,
}

impl<'a> Tokens<'a> {
    /// The command name (first token).
    pub fn command(&self) -> &'a str {
        self.words[0]
    }

    /// Everything after the command name.
    pub fn args(&self) -> &[&'a str] {
        &self.words[1..]
    }

    /// All tokens, command name included.
    pub fn as_slice(&self) -> &[&'a str] {
        &self.words
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    /// Always `false`: a `Tokens` is only built for a line with at least a command name.
    pub fn is_empty(&self) -> bool {
        false
    }
}

fn is_delimiter(delimiters: &[char], ch: char) -> bool {
    delimiters.contains(&ch)
}

fn words<'a>(line: &'a str, delimiters: &[char]) -> impl Iterator<Item = &'a str> {
    line.split(move |ch| is_delimiter(delimiters, ch))
        .filter(|word| !word.is_empty())
}

/// Count how many tokens `line` contains without allocating anything.
pub fn count_tokens(line: &str, delimiters: &[char]) -> usize {
    words(line, delimiters).count()
}

/// Split `line` into tokens separated by any of `delimiters`.
///
/// Consecutive delimiters collapse, so no token is ever empty. A line that is empty
/// or consists only of delimiters yields `Ok(None)`: callers can tell "nothing was
/// entered" apart from a command.
///
/// The number of tokens is counted first and storage for exactly that many is
/// reserved up front. Failing to reserve it is returned as
/// [`LexingError::OutOfMemory`].
pub fn split_into_tokens<'a>(
    line: &'a str,
    delimiters: &[char],
) -> Result<Option<Tokens<'a>>, LexingError> {
    let count = count_tokens(line, delimiters);
    if count == 0 {
        return Ok(None);
    }

    let mut tokens = Vec::new();
    tokens
        .try_reserve_exact(count)
        .map_err(LexingError::OutOfMemory)?;
    tokens.extend(words(line, delimiters));

    Ok(Some(Tokens { words: tokens }))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn split(line: &str) -> Option<Vec<&str>> {
        split_into_tokens(line, DELIMITERS)
            .unwrap()
            .map(|t| t.as_slice().to_vec())
    }

    #[test]
    fn test_empty_line_is_absent() {
        assert_eq!(split(""), None);
    }

    #[test]
    fn test_only_delimiters_is_absent() {
        assert_eq!(split("\n"), None);
        assert_eq!(split(" \t \r\n"), None);
    }

    #[test]
    fn test_tokens_always_hold_a_command() {
        let tokens = split_into_tokens("  ls\n", DELIMITERS).unwrap().unwrap();
        assert!(!tokens.is_empty());
        assert_eq!(tokens.len(), 1);
        assert_eq!(tokens.command(), "ls");
    }

    #[test]
    fn test_collapses_repeated_delimiters() {
        assert_eq!(split("ls  -la\n"), Some(vec!["ls", "-la"]));
    }

    #[test]
    fn test_leading_and_trailing_delimiters() {
        assert_eq!(
            split("\t  /bin/echo hi\r\n"),
            Some(vec!["/bin/echo", "hi"])
        );
    }

    #[test]
    fn test_word_without_delimiters_is_single_token() {
        for word in ["ls", "a", "--long-flag=1", "ünïcödé", "x/y/z"] {
            assert_eq!(split(word), Some(vec![word]));
        }
    }

    #[test]
    fn test_preserves_order() {
        let tokens = split_into_tokens("one two\tthree\rfour\n", DELIMITERS)
            .unwrap()
            .unwrap();
        assert_eq!(tokens.command(), "one");
        assert_eq!(tokens.args(), &["two", "three", "four"]);
        assert_eq!(tokens.len(), 4);
    }

    #[test]
    fn test_custom_delimiters() {
        let tokens = split_into_tokens("/bin::/usr/bin:", &[':'])
            .unwrap()
            .unwrap();
        assert_eq!(tokens.as_slice(), &["/bin", "/usr/bin"]);
    }

    #[test]
    fn test_count_matches_split() {
        let line = "  a b   c \n";
        assert_eq!(count_tokens(line, DELIMITERS), 3);
        assert_eq!(count_tokens("", DELIMITERS), 0);
    }
}
