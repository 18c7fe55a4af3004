// SPDX-FileCopyrightText: 2026 Mattia Egloff <mattia.egloff@pm.me>
//
// SPDX-License-Identifier: GPL-3.0-or-later

//! In-Memory Transport
//!
//! Channel-backed duplex connections and a rendezvous hub that pairs two
//! callers presenting the same token. Both peers draw the token from their
//! invitation pseudo-random stream, so only peers holding the same pair of
//! invitation codes meet.

use std::collections::HashMap;
use std::io::{self, Read, Write};
use std::sync::atomic::{AtomicBool, AtomicU64, AtomicUsize, Ordering};
use std::sync::mpsc::{self, Receiver, RecvTimeoutError, Sender};
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::Duration;

use tracing::debug;

use super::{DuplexConnection, InvitationTransport, TransportId};
use crate::crypto::PseudoRandom;

/// Number of pseudo-random bytes used as the rendezvous token.
pub const RENDEZVOUS_TOKEN_LENGTH: usize = 16;

struct ChannelReader {
    rx: Option<Receiver<Vec<u8>>>,
    pending: Vec<u8>,
    pos: usize,
}

impl Read for ChannelReader {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        if buf.is_empty() {
            return Ok(0);
        }
        if self.pos == self.pending.len() {
            let rx = self
                .rx
                .as_ref()
                .ok_or_else(|| io::Error::new(io::ErrorKind::NotConnected, "connection closed"))?;
            match rx.recv() {
                Ok(chunk) => {
                    self.pending = chunk;
                    self.pos = 0;
                }
                // Peer hung up: end of stream
                Err(_) => return Ok(0),
            }
        }
        let n = buf.len().min(self.pending.len() - self.pos);
        buf[..n].copy_from_slice(&self.pending[self.pos..self.pos + n]);
        self.pos += n;
        Ok(n)
    }
}

struct ChannelWriter {
    tx: Option<Sender<Vec<u8>>>,
}

impl Write for ChannelWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let tx = self
            .tx
            .as_ref()
            .ok_or_else(|| io::Error::new(io::ErrorKind::NotConnected, "connection closed"))?;
        tx.send(buf.to_vec())
            .map_err(|_| io::Error::new(io::ErrorKind::BrokenPipe, "peer closed the connection"))?;
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// One end of an in-memory duplex pipe.
pub struct MemoryConnection {
    reader: ChannelReader,
    writer: ChannelWriter,
    closed: Arc<AtomicBool>,
}

impl MemoryConnection {
    /// Creates two connected ends.
    pub fn pair() -> (MemoryConnection, MemoryConnection) {
        let (a_tx, b_rx) = mpsc::channel();
        let (b_tx, a_rx) = mpsc::channel();
        (Self::from_channels(a_rx, a_tx), Self::from_channels(b_rx, b_tx))
    }

    fn from_channels(rx: Receiver<Vec<u8>>, tx: Sender<Vec<u8>>) -> Self {
        MemoryConnection {
            reader: ChannelReader {
                rx: Some(rx),
                pending: Vec::new(),
                pos: 0,
            },
            writer: ChannelWriter { tx: Some(tx) },
            closed: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Returns a flag that becomes true once this end is closed.
    pub fn closed_flag(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.closed)
    }

    /// Whether this end has been closed.
    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::SeqCst)
    }
}

impl DuplexConnection for MemoryConnection {
    fn reader(&mut self) -> &mut dyn Read {
        &mut self.reader
    }

    fn writer(&mut self) -> &mut dyn Write {
        &mut self.writer
    }

    fn close(&mut self, exception: bool) {
        debug!(exception, "Closing memory connection");
        self.writer.tx = None;
        self.reader.rx = None;
        self.closed.store(true, Ordering::SeqCst);
    }
}

/// Pairs callers that present the same rendezvous token.
#[derive(Default)]
pub struct MemoryRendezvous {
    waiting: Mutex<HashMap<Vec<u8>, (u64, Sender<MemoryConnection>)>>,
    next_waiter: AtomicU64,
    meetings: AtomicUsize,
}

impl MemoryRendezvous {
    /// Creates an empty rendezvous hub.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of connections this hub has created.
    pub fn meetings(&self) -> usize {
        self.meetings.load(Ordering::SeqCst)
    }

    /// Waits up to `timeout` for another caller with the same token.
    pub fn meet(&self, token: &[u8], timeout: Duration) -> Option<MemoryConnection> {
        let (tx, rx) = mpsc::channel();
        let waiter_id = self.next_waiter.fetch_add(1, Ordering::SeqCst);

        {
            let mut waiting = self.waiting.lock().ok()?;
            if let Some((_, peer)) = waiting.remove(token) {
                let (ours, theirs) = MemoryConnection::pair();
                if peer.send(theirs).is_ok() {
                    self.meetings.fetch_add(1, Ordering::SeqCst);
                    return Some(ours);
                }
                // The waiter gave up between timing out and deregistering
            }
            waiting.insert(token.to_vec(), (waiter_id, tx));
        }

        match rx.recv_timeout(timeout) {
            Ok(connection) => Some(connection),
            Err(RecvTimeoutError::Timeout) | Err(RecvTimeoutError::Disconnected) => {
                let mut waiting = self.waiting.lock().ok()?;
                if matches!(waiting.get(token), Some((id, _)) if *id == waiter_id) {
                    waiting.remove(token);
                }
                drop(waiting);
                // A peer may have matched us just before we deregistered
                rx.try_recv().ok()
            }
        }
    }
}

/// Invitation transport backed by a shared [`MemoryRendezvous`].
pub struct MemoryTransport {
    id: TransportId,
    rendezvous: Arc<MemoryRendezvous>,
    connect_delay: Option<Duration>,
    supports_invitations: bool,
    failing: bool,
}

impl MemoryTransport {
    /// Creates a transport meeting peers at `rendezvous`.
    pub fn new(id: &str, rendezvous: Arc<MemoryRendezvous>) -> Self {
        MemoryTransport {
            id: TransportId::new(id),
            rendezvous,
            connect_delay: None,
            supports_invitations: true,
            failing: false,
        }
    }

    /// Delays every connection attempt (simulates slow discovery).
    pub fn with_connect_delay(mut self, delay: Duration) -> Self {
        self.connect_delay = Some(delay);
        self
    }

    /// Marks the transport as unable to carry invitations.
    pub fn without_invitations(mut self) -> Self {
        self.supports_invitations = false;
        self
    }

    /// Makes every connection attempt fail.
    pub fn failing(mut self) -> Self {
        self.failing = true;
        self
    }
}

impl InvitationTransport for MemoryTransport {
    fn id(&self) -> TransportId {
        self.id.clone()
    }

    fn supports_invitations(&self) -> bool {
        self.supports_invitations
    }

    fn create_invitation_connection(
        &self,
        random: &mut PseudoRandom,
        timeout: Duration,
        alice: bool,
    ) -> Option<Box<dyn DuplexConnection>> {
        // Scope the token to this transport so peers meet over the same one
        let mut token = self.id.as_str().as_bytes().to_vec();
        token.extend_from_slice(&random.next_bytes(RENDEZVOUS_TOKEN_LENGTH));
        if let Some(delay) = self.connect_delay {
            thread::sleep(delay);
        }
        if self.failing {
            debug!(transport = %self.id, alice, "Simulated connection failure");
            return None;
        }
        let connection = self.rendezvous.meet(&token, timeout)?;
        Some(Box::new(connection))
    }
}
