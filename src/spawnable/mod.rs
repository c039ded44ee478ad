//! Spawnable endpoint capability consumed by [`Session`](crate::Session)

mod process;

pub use process::ProcessSpawnable;

use crate::result::ExpectError;
use std::future::Future;
use std::pin::Pin;

/// Future returned by [`Spawnable::read_chunk_async`].
pub type ReadChunk<'a> = Pin<Box<dyn Future<Output = Result<String, ExpectError>> + Send + 'a>>;

/// A byte-stream endpoint a [`Session`](crate::Session) can drive.
///
/// The session depends only on this capability surface, so a real OS process
/// ([`ProcessSpawnable`]) and a scripted test double are interchangeable.
/// Transport details (local process, remote shell, serial line) are the
/// implementor's business.
///
/// A session performs at most one read at a time and never interleaves a
/// write with an active read loop, so implementations do not need internal
/// synchronization for correctness of the session protocol.
pub trait Spawnable: Send {
    /// Perform one-time setup, e.g. launching the target process.
    ///
    /// # Errors
    ///
    /// Fails with [`ExpectError::Spawn`] when required configuration is
    /// missing (such as an empty command), reported synchronously and never
    /// from inside a match loop.
    fn start(&mut self) -> Result<(), ExpectError>;

    /// Send `text` to the endpoint's input channel, verbatim and unframed.
    ///
    /// Output that an earlier, already-completed read cycle buffered but never
    /// delivered is discarded first, so stale output cannot leak into the next
    /// expect call's match window. Issuing a write while a read is still
    /// outstanding is a caller error.
    fn write(&mut self, text: &str) -> Result<(), ExpectError>;

    /// Return the next chunk of combined output, blocking the caller.
    ///
    /// The primary and secondary output channels (stdout and stderr for a
    /// process) race; whichever produces data first supplies the chunk. When
    /// no data arrives within a short internal poll window the call returns an
    /// empty chunk instead of blocking indefinitely, which lets the session
    /// loop re-check its deadline. Callers treat an empty chunk as a
    /// non-match.
    fn read_chunk(&mut self) -> Result<String, ExpectError>;

    /// Same contract as [`read_chunk`](Spawnable::read_chunk), expressed as a
    /// suspendable operation usable inside a cooperative race against a timer.
    ///
    /// The returned future may be abandoned mid-flight (fire-and-forget) when
    /// the timer wins the race. Abandonment must not lose or corrupt buffered
    /// output: a chunk the abandoned read would have delivered is observed by
    /// the next read instead.
    fn read_chunk_async(&mut self) -> ReadChunk<'_>;
}
