//! Session management: the matching and timeout engine

use crate::pattern::{Match, Pattern};
use crate::result::{ExpectError, MatchResult};
use crate::spawnable::Spawnable;
use std::time::{Duration, Instant};
use tracing::{debug, trace};

/// Default expect timeout, in milliseconds.
const DEFAULT_TIMEOUT_MS: u64 = 2500;

/// One scripted dialogue with a spawnable endpoint.
///
/// A `Session` exclusively owns its endpoint for its whole lifetime and drives
/// the expect loop over it: pull a chunk, append it to the accumulated output,
/// test the whole buffer against the pattern, and either invoke the reaction
/// on a match or fail once the deadline passes. The blocking ([`expect`]) and
/// suspendable ([`expect_async`]) variants share these matching semantics;
/// they differ only in how the wait is scheduled.
///
/// The accumulated output is reset at the start of every expect call, so one
/// call never matches on output a previous call already consumed.
///
/// Expect calls are not reentrant: starting a second expect on the same
/// session before the first resolves is a caller error. The session performs
/// at most one read at a time, so the buffer never has concurrent writers.
///
/// No teardown of the endpoint happens when the session is dropped; ending the
/// spawned process remains the endpoint's or the caller's responsibility.
///
/// [`expect`]: Session::expect
/// [`expect_async`]: Session::expect_async
///
/// # Examples
///
/// ```no_run
/// use expectcore::ProcessSpawnable;
///
/// # fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let mut session = expectcore::spawn(ProcessSpawnable::new("ftp example.com"))?;
/// session.expect("Name .*: ", |_| {})?;
/// session.send("anonymous\n")?;
/// session.expect("Password:", |_| {})?;
/// # Ok(())
/// # }
/// ```
pub struct Session {
    spawnable: Box<dyn Spawnable>,
    output: String,
    timeout: Duration,
}

impl Session {
    /// Create a session over an already-started endpoint.
    ///
    /// Use [`crate::spawn`] to start the endpoint and build the session in
    /// one step.
    pub fn new(spawnable: impl Spawnable + 'static) -> Self {
        Self {
            spawnable: Box::new(spawnable),
            output: String::new(),
            timeout: Duration::from_millis(DEFAULT_TIMEOUT_MS),
        }
    }

    /// The configured expect timeout, in milliseconds.
    pub fn timeout_ms(&self) -> u64 {
        self.timeout.as_millis() as u64
    }

    /// Reconfigure the expect timeout.
    ///
    /// A timeout of zero still performs one read attempt per expect call: the
    /// pattern must already be present in the first chunk read.
    ///
    /// # Errors
    ///
    /// Negative values are rejected with [`ExpectError::InvalidTimeout`] and
    /// the previously configured timeout stays in effect.
    pub fn set_timeout_ms(&mut self, ms: i64) -> Result<(), ExpectError> {
        if ms < 0 {
            return Err(ExpectError::InvalidTimeout { value: ms });
        }
        self.timeout = Duration::from_millis(ms as u64);
        Ok(())
    }

    /// Write `command` verbatim to the endpoint.
    ///
    /// No newline is appended; callers who need line semantics include their
    /// own. Endpoint failures propagate unmodified.
    pub fn send(&mut self, command: &str) -> Result<(), ExpectError> {
        trace!(len = command.len(), "send");
        self.spawnable.write(command)
    }

    /// Wait for `pattern` to appear in the output, blocking the caller.
    ///
    /// Pulls chunks with the endpoint's blocking read and tests the entire
    /// accumulated output after each one, so a match may straddle chunk
    /// boundaries. On a match the `reaction` is invoked exactly once with the
    /// matched substring and the call returns the corresponding
    /// [`MatchResult`]. Once the deadline passes without a match the call
    /// fails with [`ExpectError::Timeout`] and the reaction is never invoked.
    ///
    /// Empty chunks are non-matches; an endpoint that never produces more
    /// data makes this call wait until the timeout fires, which is bounded by
    /// the deadline rather than an iteration count.
    ///
    /// # Errors
    ///
    /// [`ExpectError::Pattern`] for an invalid pattern,
    /// [`ExpectError::Timeout`] when the deadline expires, and any endpoint
    /// read failure, unmodified.
    pub fn expect<F>(&mut self, pattern: &str, reaction: F) -> Result<MatchResult, ExpectError>
    where
        F: FnOnce(&str),
    {
        let pattern = Pattern::new(pattern)?;
        debug!(pattern = pattern.as_str(), timeout = ?self.timeout, "expect");
        self.output.clear();
        let start = Instant::now();

        loop {
            let chunk = self.spawnable.read_chunk()?;
            self.output.push_str(&chunk);
            trace!(chunk = chunk.len(), buffered = self.output.len(), "chunk");

            if let Some(m) = pattern.find(&self.output) {
                let result = self.resolve(m);
                debug!(matched = %result.matched, "pattern matched");
                reaction(&result.matched);
                return Ok(result);
            }
            if start.elapsed() >= self.timeout {
                debug!(pattern = pattern.as_str(), "expect timed out");
                return Err(ExpectError::Timeout {
                    duration: self.timeout,
                });
            }
        }
    }

    /// Wait for `pattern` to appear in the output, suspending cooperatively.
    ///
    /// Matching semantics are identical to [`expect`](Session::expect); only
    /// the scheduling differs. Each read is raced against the remaining
    /// deadline. If the timer wins before a match was found, the call fails
    /// with the same [`ExpectError::Timeout`] as the blocking variant and the
    /// pending read is abandoned fire-and-forget; the endpoint guarantees an
    /// abandoned read cannot lose or corrupt buffered output.
    ///
    /// # Errors
    ///
    /// Same as [`expect`](Session::expect).
    pub async fn expect_async<F>(
        &mut self,
        pattern: &str,
        reaction: F,
    ) -> Result<MatchResult, ExpectError>
    where
        F: FnOnce(&str),
    {
        let pattern = Pattern::new(pattern)?;
        debug!(pattern = pattern.as_str(), timeout = ?self.timeout, "expect_async");
        self.output.clear();
        let deadline = Instant::now() + self.timeout;

        loop {
            let remaining = deadline.saturating_duration_since(Instant::now());
            let chunk = match tokio::time::timeout(remaining, self.spawnable.read_chunk_async())
                .await
            {
                Ok(read) => read?,
                Err(_) => {
                    debug!(pattern = pattern.as_str(), "expect_async timed out");
                    return Err(ExpectError::Timeout {
                        duration: self.timeout,
                    });
                }
            };
            self.output.push_str(&chunk);
            trace!(chunk = chunk.len(), buffered = self.output.len(), "chunk");

            if let Some(m) = pattern.find(&self.output) {
                let result = self.resolve(m);
                debug!(matched = %result.matched, "pattern matched");
                reaction(&result.matched);
                return Ok(result);
            }
            if Instant::now() >= deadline {
                debug!(pattern = pattern.as_str(), "expect_async timed out");
                return Err(ExpectError::Timeout {
                    duration: self.timeout,
                });
            }
        }
    }

    fn resolve(&self, m: Match) -> MatchResult {
        MatchResult {
            matched: self.output[m.start..m.end].to_string(),
            start: m.start,
            end: m.end,
            before: self.output[..m.start].to_string(),
        }
    }
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("output", &self.output)
            .field("timeout", &self.timeout)
            .finish_non_exhaustive()
    }
}
