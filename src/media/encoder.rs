use anyhow::{bail, Result};
use bytes::{BufMut, Bytes, BytesMut};
use std::time::Duration;
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;
use tracing::{error, info};

use super::stream::{MediaStream, VideoFrame};

/// Media encoder trait
///
/// Wraps the platform's recording facility: once started it delivers encoded
/// chunks over a channel in encoding order. `stop()` must flush any pending
/// data as a final chunk and then close the channel.
#[async_trait::async_trait]
pub trait MediaEncoder: Send + Sync {
    /// Start encoding `stream`
    ///
    /// Returns a channel receiver that will receive encoded chunks
    async fn start(&mut self, stream: &MediaStream) -> Result<mpsc::Receiver<Bytes>>;

    /// Stop encoding, flushing the final chunk
    async fn stop(&mut self) -> Result<()>;

    /// Check if encoder is currently running
    fn is_encoding(&self) -> bool;

    /// Encoder name for logging
    fn name(&self) -> &str;
}

/// Encoder for synthetic streams
///
/// Emits one chunk per timeslice holding the latest preview frame
/// (`timestamp_ms: u64 LE | width: u32 LE | height: u32 LE | rgba`), or a
/// block of silent 16kHz PCM for audio-only streams.
pub struct SyntheticEncoder {
    timeslice: Duration,
    stop_tx: Option<oneshot::Sender<()>>,
    task: Option<JoinHandle<()>>,
}

const SILENCE_SAMPLES: usize = 1600;

impl SyntheticEncoder {
    pub fn new(timeslice_ms: u64) -> Self {
        Self {
            timeslice: Duration::from_millis(timeslice_ms.max(1)),
            stop_tx: None,
            task: None,
        }
    }

    fn encode(frame: Option<&VideoFrame>) -> Bytes {
        match frame {
            Some(frame) => {
                let mut buf = BytesMut::with_capacity(16 + frame.rgba.len());
                buf.put_u64_le(frame.timestamp_ms);
                buf.put_u32_le(frame.width);
                buf.put_u32_le(frame.height);
                buf.put_slice(&frame.rgba);
                buf.freeze()
            }
            None => Bytes::from(vec![0u8; SILENCE_SAMPLES * 2]),
        }
    }
}

#[async_trait::async_trait]
impl MediaEncoder for SyntheticEncoder {
    async fn start(&mut self, stream: &MediaStream) -> Result<mpsc::Receiver<Bytes>> {
        if self.task.is_some() {
            bail!("Already encoding");
        }

        let (chunk_tx, chunk_rx) = mpsc::channel(100);
        let (stop_tx, mut stop_rx) = oneshot::channel();
        let preview = stream.preview();
        let timeslice = self.timeslice;

        info!(
            "Starting synthetic encoder for stream {} ({}ms timeslice)",
            stream.id(),
            timeslice.as_millis()
        );

        let task = tokio::spawn(async move {
            let mut ticker = tokio::time::interval(timeslice);
            ticker.tick().await;
            let mut emitted = 0usize;

            loop {
                tokio::select! {
                    _ = ticker.tick() => {}
                    _ = &mut stop_rx => break,
                }

                let frame = preview.as_ref().and_then(|rx| rx.borrow().clone());
                if chunk_tx.send(SyntheticEncoder::encode(frame.as_ref())).await.is_err() {
                    error!("Chunk receiver dropped; stopping encoder");
                    return;
                }
                emitted += 1;
            }

            // Final flush, like a recorder's last dataavailable before stop
            let frame = preview.as_ref().and_then(|rx| rx.borrow().clone());
            if chunk_tx.send(SyntheticEncoder::encode(frame.as_ref())).await.is_ok() {
                emitted += 1;
            }

            info!("Synthetic encoder stopped ({} chunks)", emitted);
        });

        self.stop_tx = Some(stop_tx);
        self.task = Some(task);

        Ok(chunk_rx)
    }

    async fn stop(&mut self) -> Result<()> {
        let Some(task) = self.task.take() else {
            return Ok(());
        };

        if let Some(stop_tx) = self.stop_tx.take() {
            let _ = stop_tx.send(());
        }

        if let Err(e) = task.await {
            error!("Encoder task panicked: {}", e);
        }

        Ok(())
    }

    fn is_encoding(&self) -> bool {
        self.task.is_some()
    }

    fn name(&self) -> &str {
        "synthetic encoder"
    }
}
