//! Error types for expect operations

use std::time::Duration;
use thiserror::Error;

/// Errors that can occur while driving an automated session.
///
/// Most methods return `Result<T, ExpectError>`. The variants follow the
/// failure taxonomy of the library: configuration problems are reported
/// synchronously at the point of the offending call, a missed deadline is a
/// distinct [`ExpectError::Timeout`], and endpoint I/O failures are propagated
/// to the caller unmodified.
///
/// # Examples
///
/// ```no_run
/// use expectcore::{ExpectError, ProcessSpawnable, Session};
///
/// # fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let mut session = expectcore::spawn(ProcessSpawnable::new("ftp example.com"))?;
///
/// match session.expect("login: ", |_| {}) {
///     Ok(result) => println!("Matched: {}", result.matched),
///     Err(ExpectError::Timeout { duration }) => {
///         eprintln!("No prompt after {duration:?}");
///     }
///     Err(e) => return Err(e.into()),
/// }
/// # Ok(())
/// # }
/// ```
#[derive(Error, Debug)]
pub enum ExpectError {
    /// Timeout waiting for pattern.
    ///
    /// Returned when the accumulated output never matched the pattern within
    /// the configured deadline. Carries no partial match; the reaction is not
    /// invoked on this path.
    #[error("timeout waiting for pattern (after {duration:?})")]
    Timeout {
        /// The timeout that was configured when the deadline expired.
        duration: Duration,
    },

    /// Rejected timeout reconfiguration.
    ///
    /// Returned by [`Session::set_timeout_ms`](crate::Session::set_timeout_ms)
    /// for negative values. The previously configured timeout stays in effect.
    #[error("invalid timeout value: {value} ms")]
    InvalidTimeout {
        /// The rejected value, in milliseconds.
        value: i64,
    },

    /// Invalid pattern.
    ///
    /// Returned when an expect call is given a pattern that does not compile
    /// as a regular expression.
    #[error("invalid pattern: {0}")]
    Pattern(#[from] regex::Error),

    /// Process spawning error.
    ///
    /// Returned by `start()` when the endpoint is misconfigured (missing or
    /// empty command) or the OS refuses to launch it. Never produced from
    /// inside a match loop.
    #[error("failed to spawn process: {0}")]
    Spawn(String),

    /// Endpoint used before `start()`.
    #[error("endpoint has not been started")]
    NotStarted,

    /// I/O error.
    ///
    /// A read or write failure surfaced by the endpoint, propagated without
    /// modification. The library does not retry failed I/O.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
