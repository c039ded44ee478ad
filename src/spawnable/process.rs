//! Process-backed spawnable endpoint

use super::{ReadChunk, Spawnable};
use crate::result::ExpectError;
use std::io::{self, Read, Write};
use std::process::{Child, ChildStdin, Command, Stdio};
use std::thread;
use std::time::Duration;
use tokio::sync::mpsc::{self, error::TryRecvError};
use tracing::{debug, trace};

/// Bytes read from a stream per chunk. Chunk boundaries carry no meaning;
/// matching always runs over the accumulated buffer.
const READ_CHUNK_SIZE: usize = 4096;

/// Bounded wait used by the blocking read when no data is available, and by
/// both reads once the output streams have closed.
const POLL_WINDOW: Duration = Duration::from_millis(20);

/// A spawnable endpoint backed by a local child process.
///
/// The child is launched with piped stdin/stdout/stderr. Both output streams
/// are pumped by dedicated reader threads into a single channel, so a read
/// returns whichever stream produces data first. Stdout and stderr therefore
/// share one match window, the way an operator at a terminal would see them.
///
/// Dropping the endpoint closes the child's stdin; the process itself is not
/// killed. Lifecycle management beyond spawning stays with the caller.
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
/// # Ok(())
/// # }
/// ```
pub struct ProcessSpawnable {
    program: String,
    args: Vec<String>,
    child: Option<Child>,
    stdin: Option<ChildStdin>,
    chunks: Option<mpsc::UnboundedReceiver<io::Result<String>>>,
}

impl ProcessSpawnable {
    /// Create an endpoint from a whitespace-split command line.
    ///
    /// The first token is the program, the rest are its arguments. Validation
    /// happens in [`start`](Spawnable::start), not here.
    pub fn new(command: &str) -> Self {
        let mut parts = command.split_whitespace().map(str::to_owned);
        Self {
            program: parts.next().unwrap_or_default(),
            args: parts.collect(),
            child: None,
            stdin: None,
            chunks: None,
        }
    }

    /// Create an endpoint from a program and explicit arguments, for commands
    /// whose arguments contain whitespace.
    pub fn with_args<I, S>(program: impl Into<String>, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            program: program.into(),
            args: args.into_iter().map(Into::into).collect(),
            child: None,
            stdin: None,
            chunks: None,
        }
    }

    /// The configured program.
    pub fn program(&self) -> &str {
        &self.program
    }

    /// The configured arguments.
    pub fn args(&self) -> &[String] {
        &self.args
    }

    /// Process id of the running child, if started.
    pub fn id(&self) -> Option<u32> {
        self.child.as_ref().map(Child::id)
    }
}

/// Pump one output stream into the shared chunk channel until EOF or a read
/// error, which is forwarded to the consumer once.
fn pump(mut stream: impl Read, tx: mpsc::UnboundedSender<io::Result<String>>) {
    let mut buf = [0u8; READ_CHUNK_SIZE];
    loop {
        match stream.read(&mut buf) {
            Ok(0) => break,
            Ok(n) => {
                let chunk = String::from_utf8_lossy(&buf[..n]).into_owned();
                if tx.send(Ok(chunk)).is_err() {
                    break;
                }
            }
            Err(e) => {
                let _ = tx.send(Err(e));
                break;
            }
        }
    }
}

impl Spawnable for ProcessSpawnable {
    fn start(&mut self) -> Result<(), ExpectError> {
        if self.program.is_empty() {
            return Err(ExpectError::Spawn("command cannot be empty".to_string()));
        }

        let mut child = Command::new(&self.program)
            .args(&self.args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| ExpectError::Spawn(e.to_string()))?;

        let stdout = child
            .stdout
            .take()
            .ok_or_else(|| ExpectError::Spawn("stdout pipe unavailable".to_string()))?;
        let stderr = child
            .stderr
            .take()
            .ok_or_else(|| ExpectError::Spawn("stderr pipe unavailable".to_string()))?;
        self.stdin = child.stdin.take();

        // Both streams feed one channel; the first to produce data wins the
        // race for the next chunk. Reader threads exit on EOF or when the
        // receiver side is dropped.
        let (tx, rx) = mpsc::unbounded_channel();
        let err_tx = tx.clone();
        thread::spawn(move || pump(stdout, tx));
        thread::spawn(move || pump(stderr, err_tx));

        debug!(program = %self.program, pid = child.id(), "process started");
        self.chunks = Some(rx);
        self.child = Some(child);
        Ok(())
    }

    fn write(&mut self, text: &str) -> Result<(), ExpectError> {
        let chunks = self.chunks.as_mut().ok_or(ExpectError::NotStarted)?;

        // Discard output buffered since the previous read cycle completed, so
        // it cannot leak into the next expect call's match window.
        let mut discarded = 0usize;
        while let Ok(chunk) = chunks.try_recv() {
            discarded += chunk.map(|c| c.len()).unwrap_or(0);
        }
        if discarded > 0 {
            trace!(bytes = discarded, "discarded stale output before write");
        }

        let stdin = self.stdin.as_mut().ok_or(ExpectError::NotStarted)?;
        stdin.write_all(text.as_bytes())?;
        stdin.flush()?;
        Ok(())
    }

    fn read_chunk(&mut self) -> Result<String, ExpectError> {
        let chunks = self.chunks.as_mut().ok_or(ExpectError::NotStarted)?;

        match chunks.try_recv() {
            Ok(chunk) => return Ok(chunk?),
            Err(TryRecvError::Empty) => {}
            Err(TryRecvError::Disconnected) => {
                // Streams closed; keep the empty-chunk cadence so the session
                // loop still reaches its deadline.
                thread::sleep(POLL_WINDOW);
                return Ok(String::new());
            }
        }

        thread::sleep(POLL_WINDOW);
        match chunks.try_recv() {
            Ok(chunk) => Ok(chunk?),
            Err(_) => Ok(String::new()),
        }
    }

    fn read_chunk_async(&mut self) -> ReadChunk<'_> {
        Box::pin(async move {
            let chunks = self.chunks.as_mut().ok_or(ExpectError::NotStarted)?;

            // recv() is cancel safe: a chunk an abandoned read would have
            // delivered stays queued for the next read.
            match chunks.recv().await {
                Some(chunk) => Ok(chunk?),
                None => {
                    tokio::time::sleep(POLL_WINDOW).await;
                    Ok(String::new())
                }
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splits_command_line_into_program_and_args() {
        let proc = ProcessSpawnable::new("ftp -v example.com");
        assert_eq!(proc.program(), "ftp");
        assert_eq!(proc.args(), ["-v", "example.com"]);
    }

    #[test]
    fn single_token_command_has_no_args() {
        let proc = ProcessSpawnable::new("cat");
        assert_eq!(proc.program(), "cat");
        assert!(proc.args().is_empty());
    }

    #[test]
    fn with_args_keeps_arguments_verbatim() {
        let proc = ProcessSpawnable::with_args("sh", ["-c", "echo hello world"]);
        assert_eq!(proc.program(), "sh");
        assert_eq!(proc.args(), ["-c", "echo hello world"]);
    }

    #[test]
    fn start_rejects_empty_command() {
        let mut proc = ProcessSpawnable::new("");
        assert!(matches!(proc.start(), Err(ExpectError::Spawn(_))));
    }

    #[test]
    fn start_rejects_unknown_program() {
        let mut proc = ProcessSpawnable::new("definitely_not_a_real_command_12345");
        assert!(matches!(proc.start(), Err(ExpectError::Spawn(_))));
    }

    #[test]
    fn write_before_start_fails() {
        let mut proc = ProcessSpawnable::new("cat");
        assert!(matches!(proc.write("hi"), Err(ExpectError::NotStarted)));
    }

    #[test]
    fn read_before_start_fails() {
        let mut proc = ProcessSpawnable::new("cat");
        assert!(matches!(proc.read_chunk(), Err(ExpectError::NotStarted)));
    }
}
