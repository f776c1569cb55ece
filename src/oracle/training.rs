//! Training module - one-way progress stream for oracle retraining.
//!
//! Opened on demand with the generation/population parameters; the server
//! then pushes progress events until a terminal completion or error event.
//! Transport failures surface as a locally raised error event, never as a
//! fault, and are never retried automatically. Dropping the stream releases
//! the connection even mid-run.

use anyhow::anyhow;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::net::TcpStream;
use tokio::sync::mpsc;

use crate::oracle::protocol::{TrainingEvent, TrainingRequest};

/// Observer handle for one retraining run.
pub struct TrainingStream {
    rx: mpsc::UnboundedReceiver<TrainingEvent>,
}

impl TrainingStream {
    /// Connect and start the run. The returned stream yields events until a
    /// terminal one, then ends.
    pub fn open(addr: &str, request: TrainingRequest) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        tokio::spawn(training_task(addr.to_string(), request, tx));
        Self { rx }
    }

    /// Next event; None once the terminal event has been delivered.
    pub async fn next_event(&mut self) -> Option<TrainingEvent> {
        self.rx.recv().await
    }
}

async fn training_task(
    addr: String,
    request: TrainingRequest,
    tx: mpsc::UnboundedSender<TrainingEvent>,
) {
    if let Err(err) = run_training(&addr, request, &tx).await {
        // A transport failure is one error event to the observer, never a
        // fault, and never retried.
        let _ = tx.send(TrainingEvent::error(err.to_string()));
    }
}

async fn run_training(
    addr: &str,
    request: TrainingRequest,
    tx: &mpsc::UnboundedSender<TrainingEvent>,
) -> anyhow::Result<()> {
    let stream = TcpStream::connect(addr)
        .await
        .map_err(|e| anyhow!("connect failed: {e}"))?;

    let (read_half, mut write_half) = stream.into_split();
    let params = serde_json::to_string(&request)?;
    write_half
        .write_all(params.as_bytes())
        .await
        .map_err(|e| anyhow!("request failed: {e}"))?;
    write_half
        .write_all(b"\n")
        .await
        .map_err(|e| anyhow!("request failed: {e}"))?;
    write_half
        .flush()
        .await
        .map_err(|e| anyhow!("request failed: {e}"))?;

    let mut lines = BufReader::new(read_half).lines();
    loop {
        tokio::select! {
            // Observer gone: stop reading and release the connection.
            () = tx.closed() => return Ok(()),
            line = lines.next_line() => {
                let line = line
                    .map_err(|e| anyhow!("connection lost: {e}"))?
                    .ok_or_else(|| anyhow!("connection lost"))?;
                let event: TrainingEvent = serde_json::from_str(&line)
                    .map_err(|e| anyhow!("malformed event: {e}"))?;
                let terminal = event.is_terminal();
                if tx.send(event).is_err() || terminal {
                    return Ok(());
                }
            }
        }
    }
}
