//! Channel module - one persistent duplex request/response connection.
//!
//! The connection is opened lazily on first use. A spawned I/O task owns the
//! socket; requests reach it over an mpsc queue, so calls issued while the
//! connection is still being established are flushed in arrival order once it
//! opens. The wire protocol answers every request line with exactly one
//! response line, in order, and the task correlates them positionally: each
//! written request occupies one slot in a FIFO, and each response line pops
//! the front slot. A newer request supersedes interest in every earlier one
//! (their waiters resolve to no-answer at once), but the superseded slots
//! stay in the FIFO so their eventual response lines are consumed and
//! discarded, never misdelivered to a later request. Any transport failure
//! (connect error, write error, closed socket) releases every queued or
//! pending call with no-answer immediately; nothing ever blocks past the
//! per-request timeout and nothing escapes as a crash.

use std::collections::VecDeque;
use std::time::Duration;

use anyhow::anyhow;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::net::TcpStream;
use tokio::sync::{mpsc, oneshot};

struct PendingRequest {
    line: String,
    reply: oneshot::Sender<Option<String>>,
}

/// Handle to one request/response channel. Owned exclusively by the
/// [`crate::oracle::OracleManager`].
pub struct RequestChannel {
    name: &'static str,
    addr: String,
    timeout: Duration,
    tx: Option<mpsc::UnboundedSender<PendingRequest>>,
}

/// Detached sender for one channel: cheap to clone and free to move into a
/// spawned task, so issuing a request never borrows the channel (or anything
/// owning it) across the await.
#[derive(Clone)]
pub struct ChannelRequester {
    timeout: Duration,
    tx: mpsc::UnboundedSender<PendingRequest>,
}

impl ChannelRequester {
    /// Send one JSON line and await the matching response line.
    ///
    /// Resolves to None on timeout, transport failure, supersession by a
    /// newer request, or when the channel is closed mid-flight. Never
    /// retries; the caller decides what no-answer means.
    pub async fn request(self, line: String) -> Option<String> {
        let (reply_tx, reply_rx) = oneshot::channel();
        self.tx
            .send(PendingRequest {
                line,
                reply: reply_tx,
            })
            .ok()?;
        match tokio::time::timeout(self.timeout, reply_rx).await {
            Ok(Ok(answer)) => answer,
            // Elapsed, or the I/O task dropped the waiter.
            _ => None,
        }
    }
}

impl RequestChannel {
    pub fn new(name: &'static str, addr: impl Into<String>, timeout: Duration) -> Self {
        Self {
            name,
            addr: addr.into(),
            timeout,
            tx: None,
        }
    }

    /// Whether a connection task is live (it may still be connecting).
    pub fn is_open(&self) -> bool {
        self.tx.as_ref().is_some_and(|tx| !tx.is_closed())
    }

    /// Requester bound to the live connection, opening it lazily first.
    pub fn requester(&mut self) -> ChannelRequester {
        let tx = match self.tx.as_ref().filter(|tx| !tx.is_closed()) {
            Some(tx) => tx.clone(),
            None => self.open(),
        };
        ChannelRequester {
            timeout: self.timeout,
            tx,
        }
    }

    /// Drop the connection. The I/O task exits and every in-flight or queued
    /// call resolves to no-answer; the next request reopens lazily.
    pub fn close(&mut self) {
        if self.tx.take().is_some() {
            println!("[Oracle] {} channel closed", self.name);
        }
    }

    fn open(&mut self) -> mpsc::UnboundedSender<PendingRequest> {
        let (tx, rx) = mpsc::unbounded_channel();
        tokio::spawn(channel_task(self.name, self.addr.clone(), rx));
        self.tx = Some(tx.clone());
        tx
    }
}

impl Drop for RequestChannel {
    fn drop(&mut self) {
        self.tx.take();
    }
}

/// Owns the socket for one channel. Exits on transport failure or when the
/// handle is closed; dropping the request queue on exit releases every waiter.
async fn channel_task(
    name: &'static str,
    addr: String,
    rx: mpsc::UnboundedReceiver<PendingRequest>,
) {
    if let Err(err) = run_channel(name, &addr, rx).await {
        eprintln!("[Oracle] {name} channel failed: {err}");
    }
    // `rx` (and any pending waiter) is gone now, so every in-flight call
    // resolves with no-answer.
}

async fn run_channel(
    name: &'static str,
    addr: &str,
    mut rx: mpsc::UnboundedReceiver<PendingRequest>,
) -> anyhow::Result<()> {
    let stream = TcpStream::connect(addr)
        .await
        .map_err(|e| anyhow!("connect {addr} failed: {e}"))?;
    println!("[Oracle] {name} channel connected to {addr}");

    let (read_half, mut write_half) = stream.into_split();
    let mut lines = BufReader::new(read_half).lines();
    // One slot per written request, in write order. A None slot marks a
    // superseded request whose response line must still be consumed.
    let mut pending: VecDeque<Option<oneshot::Sender<Option<String>>>> = VecDeque::new();

    loop {
        tokio::select! {
            req = rx.recv() => {
                let Some(PendingRequest { line, reply }) = req else {
                    // Handle closed.
                    return Ok(());
                };
                // A newer request supersedes interest in every earlier one,
                // but each earlier slot keeps its place in the FIFO.
                for slot in pending.iter_mut() {
                    if let Some(old) = slot.take() {
                        let _ = old.send(None);
                    }
                }
                pending.push_back(Some(reply));
                write_half.write_all(line.as_bytes()).await?;
                write_half.write_all(b"\n").await?;
                write_half.flush().await?;
            }
            line = lines.next_line() => {
                match line? {
                    Some(answer) => {
                        // Responses arrive in request order: this line
                        // belongs to the front slot and to nothing else. A
                        // superseded slot, or a waiter whose caller already
                        // timed out, swallows the line.
                        if let Some(Some(waiter)) = pending.pop_front() {
                            let _ = waiter.send(Some(answer));
                        }
                    }
                    // Peer closed the connection.
                    None => return Ok(()),
                }
            }
        }
    }
}
