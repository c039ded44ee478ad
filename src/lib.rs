//! expectcore: automation core for interactive command-line sessions
//!
//! expectcore drives interactive programs (installers, shells, REPLs) without
//! a human at the keyboard, in the tradition of the Unix `expect` utility: it
//! spawns a child process or other byte-stream endpoint, sends input, and
//! waits until the accumulated output matches a pattern, then invokes a
//! caller-supplied reaction.
//!
//! # Features
//!
//! - **Blocking and async**: the same matching semantics behind a blocking
//!   [`Session::expect`] and a cooperative [`Session::expect_async`]
//! - **Boundary-agnostic matching**: patterns are tested against the whole
//!   accumulated buffer after every chunk, so matches may straddle chunk
//!   boundaries
//! - **Deadline-bounded waits**: every expect call races against a configured
//!   timeout and fails with a distinct timeout error when it expires
//! - **Transport-agnostic**: sessions drive anything implementing the
//!   [`Spawnable`] capability; a piped-process endpoint is included
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use expectcore::ProcessSpawnable;
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let mut session = expectcore::spawn(ProcessSpawnable::new("ftp example.com"))?;
//!
//!     session.expect("Name .*: ", |_| {})?;
//!     session.send("anonymous\n")?;
//!     session.expect("Password:", |_| {})?;
//!     session.send("guest\n")?;
//!     session.expect("ftp> ", |matched| println!("logged in at {matched:?}"))?;
//!
//!     Ok(())
//! }
//! ```
//!
//! # Patterns and reactions
//!
//! Patterns are regular expressions compiled once per expect call and searched
//! over the entire accumulated output; the first (leftmost) match wins. The
//! reaction receives the full matched substring and runs exactly once, only on
//! a successful match, never on a timeout or any other failure:
//!
//! ```rust,no_run
//! # fn example(session: &mut expectcore::Session) -> Result<(), expectcore::ExpectError> {
//! session.send("uptime\n")?;
//! session.expect(r"load average: [\d.]+", |matched| {
//!     println!("{matched}");
//! })?;
//! # Ok(())
//! # }
//! ```
//!
//! # Timeouts
//!
//! Each session carries one timeout (default 2500 ms) applied to every expect
//! call. It can be reconfigured at any point between calls; negative values
//! are rejected and leave the previous value in effect:
//!
//! ```rust,no_run
//! # fn example(session: &mut expectcore::Session) -> Result<(), expectcore::ExpectError> {
//! session.set_timeout_ms(10_000)?;
//! assert_eq!(session.timeout_ms(), 10_000);
//! assert!(session.set_timeout_ms(-1).is_err());
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]

mod pattern;
mod result;
mod session;
mod spawnable;

// Public API exports
pub use pattern::{Match, Pattern};
pub use result::{ExpectError, MatchResult};
pub use session::Session;
pub use spawnable::{ProcessSpawnable, ReadChunk, Spawnable};

/// Start `spawnable` and wrap it in a ready [`Session`].
///
/// The endpoint's one-time setup runs here, so configuration problems (such
/// as an empty command) surface before any expect call is made.
///
/// # Errors
///
/// Propagates the endpoint's [`start`](Spawnable::start) failure.
///
/// # Examples
///
/// ```no_run
/// use expectcore::ProcessSpawnable;
///
/// # fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let mut session = expectcore::spawn(ProcessSpawnable::new("sh"))?;
/// session.send("echo ready\n")?;
/// session.expect("ready", |_| {})?;
/// # Ok(())
/// # }
/// ```
pub fn spawn(mut spawnable: impl Spawnable + 'static) -> Result<Session, ExpectError> {
    spawnable.start()?;
    Ok(Session::new(spawnable))
}
