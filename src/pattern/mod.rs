//! Pattern matching for expect operations

use crate::result::ExpectError;
use regex::Regex;

/// Location of a pattern match within an accumulated buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Match {
    /// Start byte offset of the match.
    pub start: usize,
    /// End byte offset of the match.
    pub end: usize,
}

/// A reusable matching predicate over an accumulating output buffer.
///
/// A `Pattern` wraps a compiled regular expression. Expect calls compile the
/// textual pattern once and then probe the growing buffer with it after every
/// chunk, so a match that straddles chunk boundaries is still found: the search
/// always runs over the entire buffer, never just the newest chunk.
///
/// Searching is deterministic and side-effect-free; repeated calls over the
/// same buffer return the same leftmost match.
///
/// # Examples
///
/// ```
/// use expectcore::Pattern;
///
/// let pattern = Pattern::new("expected string").unwrap();
/// let m = pattern.find("test expected string test").unwrap();
/// assert_eq!((m.start, m.end), (5, 20));
/// ```
#[derive(Debug, Clone)]
pub struct Pattern {
    regex: Regex,
}

impl Pattern {
    /// Compile a textual pattern.
    ///
    /// # Errors
    ///
    /// Returns [`ExpectError::Pattern`] if `pattern` is not a valid regular
    /// expression.
    pub fn new(pattern: &str) -> Result<Self, ExpectError> {
        Ok(Self {
            regex: Regex::new(pattern)?,
        })
    }

    /// Find the leftmost match in `buffer`, or `None` if nothing matches yet.
    pub fn find(&self, buffer: &str) -> Option<Match> {
        self.regex.find(buffer).map(|m| Match {
            start: m.start(),
            end: m.end(),
        })
    }

    /// The textual form the pattern was compiled from.
    pub fn as_str(&self) -> &str {
        self.regex.as_str()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn finds_leftmost_match() {
        let pattern = Pattern::new("test").unwrap();
        let m = pattern.find("test and test again").unwrap();
        assert_eq!((m.start, m.end), (0, 4));
    }

    #[test]
    fn no_match_returns_none() {
        let pattern = Pattern::new(r"\d+").unwrap();
        assert!(pattern.find("no numbers here").is_none());
    }

    #[test]
    fn regex_syntax_is_supported() {
        let pattern = Pattern::new(r"(?i)ready\.?$").unwrap();
        let m = pattern.find("system READY").unwrap();
        assert_eq!(m.start, 7);
    }

    #[test]
    fn invalid_pattern_is_rejected() {
        assert!(matches!(
            Pattern::new("[invalid("),
            Err(ExpectError::Pattern(_))
        ));
    }

    #[test]
    fn repeated_search_is_deterministic() {
        let pattern = Pattern::new("expected string").unwrap();
        let buffer = "test expected string test";
        assert_eq!(pattern.find(buffer), pattern.find(buffer));
    }

    #[test]
    fn matches_utf8_buffers() {
        let pattern = Pattern::new("世界").unwrap();
        let m = pattern.find("hello 世界!").unwrap();
        assert_eq!(&"hello 世界!"[m.start..m.end], "世界");
    }
}
