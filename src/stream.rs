//! Activity broadcaster: turns agent-channel deltas into SSE text frames.
//!
//! Each tick pulls the last `batch_size` agent events, keeps those newer
//! than the watermark, and emits them as one frame. The loop ends when the
//! sink fails or the cancellation token fires; reconnecting is the
//! caller's job.

use chrono::{DateTime, Utc};
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tokio::io::AsyncWriteExt;
use tokio::sync::mpsc;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;

use crate::config::StreamConfig;
use crate::error::StreamError;
use crate::sensory::{AGENT_ACTIVITY, SensoryEvent, SensoryStore};

/// Destination for encoded frames.
pub trait FrameSink: Send {
    fn send_frame(
        &mut self,
        frame: String,
    ) -> impl Future<Output = Result<(), StreamError>> + Send;
}

impl FrameSink for mpsc::Sender<String> {
    async fn send_frame(&mut self, frame: String) -> Result<(), StreamError> {
        self.send(frame).await.map_err(|_| StreamError::SinkClosed)
    }
}

/// Writes frames to any async writer (stdout for the CLI).
pub struct WriterSink<W> {
    writer: W,
}

impl<W> WriterSink<W> {
    pub fn new(writer: W) -> Self {
        Self { writer }
    }
}

impl<W: tokio::io::AsyncWrite + Unpin + Send> FrameSink for WriterSink<W> {
    async fn send_frame(&mut self, frame: String) -> Result<(), StreamError> {
        self.writer.write_all(frame.as_bytes()).await?;
        self.writer.flush().await?;
        Ok(())
    }
}

/// Why a broadcaster loop stopped without error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StreamExit {
    Cancelled,
}

/// Encode one batch as a self-delimited SSE frame.
pub fn encode_frame(batch: &[SensoryEvent]) -> Result<String, StreamError> {
    let json = serde_json::to_string(batch)?;
    Ok(format!("data: {json}\n\n"))
}

pub struct StreamBroadcaster {
    store: Arc<SensoryStore>,
    interval: Duration,
    batch_size: usize,
    watermark: Option<DateTime<Utc>>,
}

impl StreamBroadcaster {
    pub fn new(store: Arc<SensoryStore>, config: &StreamConfig) -> Self {
        Self {
            store,
            interval: Duration::from_millis(config.interval_ms),
            batch_size: config.batch_size,
            watermark: None,
        }
    }

    pub fn watermark(&self) -> Option<DateTime<Utc>> {
        self.watermark
    }

    /// One tick: events newer than the watermark among the last
    /// `batch_size`, advancing the watermark when any are returned.
    pub fn poll(&mut self) -> Option<Vec<SensoryEvent>> {
        let watermark = self.watermark;
        let batch: Vec<SensoryEvent> = self
            .store
            .recent(AGENT_ACTIVITY, self.batch_size)
            .into_iter()
            .filter(|event| watermark.is_none_or(|mark| event.timestamp > mark))
            .collect();

        let last = batch.last()?.timestamp;
        self.watermark = Some(watermark.map_or(last, |mark| mark.max(last)));
        Some(batch)
    }

    pub async fn run<S: FrameSink>(
        mut self,
        mut sink: S,
        cancel: CancellationToken,
    ) -> Result<StreamExit, StreamError> {
        let mut ticker = tokio::time::interval(self.interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        tracing::info!(
            interval_ms = u64::try_from(self.interval.as_millis()).unwrap_or(u64::MAX),
            batch_size = self.batch_size,
            "stream.start"
        );

        loop {
            tokio::select! {
                biased;
                () = cancel.cancelled() => {
                    tracing::info!("stream.cancelled");
                    return Ok(StreamExit::Cancelled);
                }
                _ = ticker.tick() => {
                    let Some(batch) = self.poll() else {
                        continue;
                    };
                    let frame = encode_frame(&batch)?;
                    if let Err(e) = sink.send_frame(frame).await {
                        tracing::warn!(error = %e, "stream.sink_failed");
                        return Err(e);
                    }
                    tracing::debug!(events = batch.len(), "stream.frame");
                }
            }
        }
    }
}
