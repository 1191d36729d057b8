//! Line input for interactive sessions.
//!
//! Reads happen on a plain OS thread that forwards lines over a channel.
//! A blocked read never holds up runtime shutdown: once the receiver is
//! dropped the thread exits on its next line, and the process can exit
//! without waiting for it.

use std::io::{self, BufRead};
use std::thread;

use tokio::sync::mpsc;

pub struct LineSource {
    receiver: mpsc::UnboundedReceiver<io::Result<String>>,
}

impl LineSource {
    /// Lines from the process's standard input.
    pub fn stdin() -> io::Result<Self> {
        Self::spawn(|| io::stdin().lock())
    }

    /// Lines from any buffered reader, read on a dedicated thread.
    pub fn from_reader<R>(reader: R) -> io::Result<Self>
    where
        R: BufRead + Send + 'static,
    {
        Self::spawn(move || reader)
    }

    fn spawn<R, F>(open: F) -> io::Result<Self>
    where
        R: BufRead,
        F: FnOnce() -> R + Send + 'static,
    {
        let (tx, receiver) = mpsc::unbounded_channel();
        thread::Builder::new()
            .name("triagem-input".to_string())
            .spawn(move || {
                for line in open().lines() {
                    let failed = line.is_err();
                    if tx.send(line).is_err() || failed {
                        break;
                    }
                }
                tracing::debug!("input reader finished");
            })?;
        Ok(Self { receiver })
    }

    /// Next line without its terminator. `None` once input is exhausted.
    /// Cancel safe.
    pub async fn next_line(&mut self) -> Option<io::Result<String>> {
        self.receiver.recv().await
    }
}
