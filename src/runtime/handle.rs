use serde::{Deserialize, Serialize};
use tokio::sync::{broadcast, mpsc, oneshot};
use tracing::{info, warn};

use crate::{
    engine::{
        dedup::{DedupKey, ScanOutcome, ScanSession},
        projector::SheetWriter,
        traits::SheetSink,
    },
    record::Record,
};

use super::events::ScanEvent;

#[derive(Debug, thiserror::Error)]
pub enum RuntimeError {
    #[error("scanner loop has stopped")]
    ChannelClosed,
}

/// When accepted records are written to the sheet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RelayMode {
    /// Append each record while its frame is processed.
    #[default]
    Immediate,
    /// Collect for the whole run, append everything on quit.
    OnQuit,
}

#[derive(Debug, Clone)]
pub struct ScannerConfig {
    pub relay_mode: RelayMode,
    pub command_queue_bound: usize,
    pub event_capacity: usize,
}

impl Default for ScannerConfig {
    fn default() -> Self {
        Self {
            relay_mode: RelayMode::Immediate,
            command_queue_bound: 64,
            event_capacity: 1024,
        }
    }
}

/// Totals for one scanning run.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ScanSummary {
    /// Unique records in acceptance order.
    pub accepted: Vec<Record>,
    pub duplicates: usize,
    pub malformed: usize,
    pub appended: usize,
    pub append_failures: usize,
}

pub struct ScannerHandle {
    cmd_tx: mpsc::Sender<Command>,
    events_tx: broadcast::Sender<ScanEvent>,
}

impl Clone for ScannerHandle {
    fn clone(&self) -> Self {
        Self {
            cmd_tx: self.cmd_tx.clone(),
            events_tx: self.events_tx.clone(),
        }
    }
}

enum Command {
    Frame {
        payloads: Vec<String>,
        resp: oneshot::Sender<Vec<ScanOutcome>>,
    },
    Quit {
        resp: oneshot::Sender<ScanSummary>,
    },
}

/// Starts the single-writer scanner loop.
///
/// Frames are handled one at a time. In [`RelayMode::Immediate`] the sheet
/// append runs inline on the loop, so a slow sink delays the next frame.
pub fn spawn_scanner(sink: Box<dyn SheetSink>, config: ScannerConfig) -> ScannerHandle {
    let (cmd_tx, mut cmd_rx) = mpsc::channel::<Command>(config.command_queue_bound);
    let (events_tx, _) = broadcast::channel::<ScanEvent>(config.event_capacity);

    let events_tx_loop = events_tx.clone();

    tokio::spawn(async move {
        let mut relay = Relay {
            writer: SheetWriter::new(sink),
            session: ScanSession::new(),
            summary: ScanSummary::default(),
            events_tx: events_tx_loop,
            mode: config.relay_mode,
        };

        while let Some(cmd) = cmd_rx.recv().await {
            match cmd {
                Command::Frame { payloads, resp } => {
                    let outcomes: Vec<_> =
                        payloads.iter().map(|p| relay.handle_payload(p)).collect();
                    let _ = resp.send(outcomes);
                }
                Command::Quit { resp } => {
                    let _ = resp.send(relay.finish());
                    break;
                }
            }
        }
    });

    ScannerHandle { cmd_tx, events_tx }
}

impl ScannerHandle {
    pub fn subscribe(&self) -> broadcast::Receiver<ScanEvent> {
        self.events_tx.subscribe()
    }

    /// Hands over the decoded strings of one camera frame, ordered left to right.
    pub async fn submit_frame(
        &self,
        payloads: Vec<String>,
    ) -> Result<Vec<ScanOutcome>, RuntimeError> {
        let (tx, rx) = oneshot::channel();
        self.cmd_tx
            .send(Command::Frame { payloads, resp: tx })
            .await
            .map_err(|_| RuntimeError::ChannelClosed)?;
        rx.await.map_err(|_| RuntimeError::ChannelClosed)
    }

    /// Stops the loop, flushing deferred appends in [`RelayMode::OnQuit`].
    pub async fn quit(&self) -> Result<ScanSummary, RuntimeError> {
        let (tx, rx) = oneshot::channel();
        self.cmd_tx
            .send(Command::Quit { resp: tx })
            .await
            .map_err(|_| RuntimeError::ChannelClosed)?;
        rx.await.map_err(|_| RuntimeError::ChannelClosed)
    }
}

struct Relay {
    writer: SheetWriter<Box<dyn SheetSink>>,
    session: ScanSession,
    summary: ScanSummary,
    events_tx: broadcast::Sender<ScanEvent>,
    mode: RelayMode,
}

impl Relay {
    fn handle_payload(&mut self, payload: &str) -> ScanOutcome {
        let outcome = self.session.ingest(payload);
        match &outcome {
            ScanOutcome::Accepted(record) => {
                let key = DedupKey::of(record);
                let _ = self.events_tx.send(ScanEvent::Accepted { key });
                self.summary.accepted.push(record.clone());
                if self.mode == RelayMode::Immediate {
                    self.append(record);
                }
            }
            ScanOutcome::Duplicate(key) => {
                self.summary.duplicates += 1;
                let _ = self.events_tx.send(ScanEvent::Duplicate { key: key.clone() });
            }
            ScanOutcome::Malformed(reason) => {
                self.summary.malformed += 1;
                let _ = self.events_tx.send(ScanEvent::Malformed {
                    reason: reason.clone(),
                });
            }
        }
        outcome
    }

    fn append(&mut self, record: &Record) {
        let key = DedupKey::of(record);
        match self.writer.append(record) {
            Ok(_) => {
                self.summary.appended += 1;
                let _ = self.events_tx.send(ScanEvent::Appended { key });
            }
            Err(err) => {
                warn!(%key, %err, "sheet append failed");
                self.summary.append_failures += 1;
                let _ = self.events_tx.send(ScanEvent::AppendFailed {
                    key,
                    reason: err.to_string(),
                });
            }
        }
    }

    fn finish(mut self) -> ScanSummary {
        if self.mode == RelayMode::OnQuit {
            let pending = self.summary.accepted.clone();
            for record in &pending {
                self.append(record);
            }
        }
        info!(
            accepted = self.summary.accepted.len(),
            duplicates = self.summary.duplicates,
            appended = self.summary.appended,
            "scanner stopped"
        );
        self.summary
    }
}
