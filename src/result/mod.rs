//! Result types for expect operations

mod error;

pub use error::ExpectError;

/// Result of a successful pattern match.
///
/// Describes the first (leftmost) match found in the output accumulated by one
/// expect call: the matched text itself, its byte offsets into that buffer,
/// and everything that preceded it.
///
/// # Examples
///
/// ```no_run
/// use expectcore::{ProcessSpawnable, Session};
///
/// # fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let mut session = expectcore::spawn(ProcessSpawnable::new("sh"))?;
/// session.send("uptime\n")?;
///
/// let result = session.expect(r"load average.*\n", |_| {})?;
/// println!("Matched: {}", result.matched);
/// println!("Before match: {}", result.before);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct MatchResult {
    /// The full matched substring. This is also the value handed to the
    /// reaction callback.
    pub matched: String,

    /// Start position of the match in the accumulated output (byte offset).
    pub start: usize,

    /// End position of the match in the accumulated output (byte offset).
    pub end: usize,

    /// Output that appeared before the match within this expect call.
    ///
    /// Often the most useful part for extracting command output that precedes
    /// a prompt.
    pub before: String,
}
