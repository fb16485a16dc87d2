//! Dedicated stdin reader thread.
//!
//! Reads raw bytes from stdin and forwards them over a channel; decoding
//! happens on the receiving side so the reader never blocks the engine.

use std::io::{self, Read};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{self, Receiver, Sender};
use std::thread::{self, JoinHandle};

use tracing::debug;

/// Raw bytes read from stdin.
pub enum StdinMessage {
    /// A chunk of raw bytes.
    Data(Vec<u8>),
    /// stdin reached EOF or failed.
    Closed,
}

/// Handle for the reader thread; stops it on drop.
pub struct StdinReader {
    handle: Option<JoinHandle<()>>,
    running: Arc<AtomicBool>,
}

impl StdinReader {
    /// Spawn the reader thread, returning the handle and the byte channel.
    pub fn spawn() -> io::Result<(Self, Receiver<StdinMessage>)> {
        let (tx, rx) = mpsc::channel();
        let running = Arc::new(AtomicBool::new(true));
        let flag = running.clone();

        let handle = thread::Builder::new()
            .name("weft-stdin".to_string())
            .spawn(move || Self::read_loop(flag, tx))?;

        Ok((
            Self {
                handle: Some(handle),
                running,
            },
            rx,
        ))
    }

    fn read_loop(running: Arc<AtomicBool>, tx: Sender<StdinMessage>) {
        let stdin = io::stdin();
        let mut buf = [0u8; 256];

        while running.load(Ordering::SeqCst) {
            match stdin.lock().read(&mut buf) {
                Ok(0) => {
                    debug!("stdin reached EOF");
                    let _ = tx.send(StdinMessage::Closed);
                    break;
                }
                Ok(n) => {
                    if tx.send(StdinMessage::Data(buf[..n].to_vec())).is_err() {
                        break;
                    }
                }
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => {
                    debug!(error = %e, "stdin read failed");
                    let _ = tx.send(StdinMessage::Closed);
                    break;
                }
            }
        }
    }

    /// Ask the thread to stop. It may still be blocked in `read`; it exits
    /// on the next chunk, on EOF, or when the process ends.
    pub fn stop(&mut self) {
        self.running.store(false, Ordering::SeqCst);
        if let Some(handle) = self.handle.take() {
            let _ = handle;
        }
    }
}

impl Drop for StdinReader {
    fn drop(&mut self) {
        self.stop();
    }
}
