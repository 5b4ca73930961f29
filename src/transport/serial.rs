//! Serial device boundary.
//!
//! `serialport` reads are blocking, so the port lives in a dedicated thread
//! that bridges to the async pipeline over channels: incoming chunks flow
//! through a tokio mpsc channel, outbound writes through a std mpsc queue
//! drained between reads. The port thread owns the handle exclusively, which
//! keeps reads and writes serialized without a mutex.
//!
//! Liveness: EOF or a non-timeout read error ends the thread, which drops
//! the chunk sender; the supervisor observes the closed channel as loss of
//! the device.

use std::io::{Read, Write};
use std::sync::mpsc as std_mpsc;
use std::time::Duration;

use tokio::sync::mpsc;
use tracing::{debug, warn};

use crate::error::{BridgeError, Result};

/// Read timeout of the blocking port. Short enough that transmit requests
/// are picked up promptly between reads.
const READ_TIMEOUT: Duration = Duration::from_millis(50);

/// Size of the read scratch buffer. Serial reads may return as little as
/// one byte regardless.
const READ_CHUNK: usize = 256;

/// Capacity of the inbound chunk channel.
const CHUNK_CHANNEL_CAPACITY: usize = 64;

/// An open serial connection to the controller.
///
/// Dropping the link closes the transmit queue, which stops the port thread
/// at its next iteration and releases the device handle.
pub struct SerialLink {
    chunks: mpsc::Receiver<Vec<u8>>,
    transmit: std_mpsc::Sender<Vec<u8>>,
}

impl SerialLink {
    /// Open the device with raw byte semantics and spawn its port thread.
    pub fn open(path: &str, baud_rate: u32) -> Result<Self> {
        let port = serialport::new(path, baud_rate)
            .timeout(READ_TIMEOUT)
            .open()?;

        let (chunk_tx, chunk_rx) = mpsc::channel(CHUNK_CHANNEL_CAPACITY);
        let (transmit_tx, transmit_rx) = std_mpsc::channel();

        let path = path.to_string();
        std::thread::spawn(move || {
            debug!(device = %path, "port thread started");
            run_port_loop(port, chunk_tx, transmit_rx);
            debug!(device = %path, "port thread exited");
        });

        Ok(Self {
            chunks: chunk_rx,
            transmit: transmit_tx,
        })
    }

    /// Receive the next chunk of raw bytes.
    ///
    /// Returns `None` once the device is gone.
    pub async fn recv_chunk(&mut self) -> Option<Vec<u8>> {
        self.chunks.recv().await
    }

    /// Queue raw bytes for transmission.
    pub fn send(&self, bytes: Vec<u8>) -> Result<()> {
        self.transmit
            .send(bytes)
            .map_err(|_| BridgeError::ConnectionClosed)
    }
}

/// Blocking port loop: drain pending writes, then read one chunk.
///
/// Generic over the port so the loop is testable with an in-memory fake;
/// the real instantiation is the boxed `serialport` handle.
fn run_port_loop<P: Read + Write>(
    mut port: P,
    chunk_tx: mpsc::Sender<Vec<u8>>,
    transmit_rx: std_mpsc::Receiver<Vec<u8>>,
) {
    let mut buf = [0u8; READ_CHUNK];

    loop {
        // Pending transmit requests go out before the next read blocks.
        loop {
            match transmit_rx.try_recv() {
                Ok(bytes) => {
                    if let Err(err) = port.write_all(&bytes).and_then(|_| port.flush()) {
                        warn!(error = %err, "serial write failed");
                        return;
                    }
                }
                Err(std_mpsc::TryRecvError::Empty) => break,
                Err(std_mpsc::TryRecvError::Disconnected) => {
                    debug!("link handle dropped, closing port");
                    return;
                }
            }
        }

        match port.read(&mut buf) {
            Ok(0) => {
                warn!("serial port reported end of stream");
                return;
            }
            Ok(n) => {
                if chunk_tx.blocking_send(buf[..n].to_vec()).is_err() {
                    return;
                }
            }
            Err(ref err) if err.kind() == std::io::ErrorKind::TimedOut => {
                // Expected between frames; loop back to service transmits.
            }
            Err(err) => {
                warn!(error = %err, "serial read failed");
                return;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::VecDeque;
    use std::io;
    use std::sync::{Arc, Mutex};

    /// In-memory port: scripted reads, recorded writes.
    struct FakePort {
        reads: VecDeque<io::Result<Vec<u8>>>,
        written: Arc<Mutex<Vec<u8>>>,
    }

    impl Read for FakePort {
        fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
            match self.reads.pop_front() {
                Some(Ok(bytes)) => {
                    buf[..bytes.len()].copy_from_slice(&bytes);
                    Ok(bytes.len())
                }
                Some(Err(err)) => Err(err),
                None => Ok(0),
            }
        }
    }

    impl Write for FakePort {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.written.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    fn timeout_err() -> io::Error {
        io::Error::new(io::ErrorKind::TimedOut, "read timed out")
    }

    #[tokio::test]
    async fn test_chunks_flow_until_eof_closes_channel() {
        let written = Arc::new(Mutex::new(Vec::new()));
        let port = FakePort {
            reads: VecDeque::from([
                Ok(vec![0x06]),
                Err(timeout_err()),
                Ok(vec![0x01, 0x03]),
            ]),
            written: written.clone(),
        };

        let (chunk_tx, mut chunk_rx) = mpsc::channel(8);
        let (_transmit_tx, transmit_rx) = std_mpsc::channel::<Vec<u8>>();
        let handle = std::thread::spawn(move || run_port_loop(port, chunk_tx, transmit_rx));

        assert_eq!(chunk_rx.recv().await, Some(vec![0x06]));
        assert_eq!(chunk_rx.recv().await, Some(vec![0x01, 0x03]));
        // Script exhausted: the port reports EOF and the channel closes.
        assert_eq!(chunk_rx.recv().await, None);
        handle.join().unwrap();
    }

    #[tokio::test]
    async fn test_transmit_requests_are_written_out() {
        let written = Arc::new(Mutex::new(Vec::new()));
        let port = FakePort {
            reads: VecDeque::from([Err(timeout_err()), Err(timeout_err())]),
            written: written.clone(),
        };

        let (chunk_tx, mut chunk_rx) = mpsc::channel(8);
        let (transmit_tx, transmit_rx) = std_mpsc::channel();

        // Queue the write, then drop the sender: the loop flushes the queue
        // and stops on the disconnected channel before its first read.
        transmit_tx.send(vec![0x06]).unwrap();
        drop(transmit_tx);

        let handle = std::thread::spawn(move || run_port_loop(port, chunk_tx, transmit_rx));

        assert_eq!(chunk_rx.recv().await, None);
        handle.join().unwrap();
        assert_eq!(*written.lock().unwrap(), vec![0x06]);
    }

    #[tokio::test]
    async fn test_fatal_read_error_ends_the_loop() {
        let written = Arc::new(Mutex::new(Vec::new()));
        let port = FakePort {
            reads: VecDeque::from([Err(io::Error::new(
                io::ErrorKind::BrokenPipe,
                "device unplugged",
            ))]),
            written,
        };

        let (chunk_tx, mut chunk_rx) = mpsc::channel(8);
        let (_transmit_tx, transmit_rx) = std_mpsc::channel::<Vec<u8>>();
        let handle = std::thread::spawn(move || run_port_loop(port, chunk_tx, transmit_rx));

        assert_eq!(chunk_rx.recv().await, None);
        handle.join().unwrap();
    }
}
