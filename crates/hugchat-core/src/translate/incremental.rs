use bytes::Bytes;
use hugchat_types::StreamEvent;
use tokio::sync::mpsc;

use super::frames::{content_chunk, sse_line, stop_chunk, ChunkHeader, DONE_FRAME};
use crate::error::{GatewayError, GatewayResult};

/// Turn the event feed into SSE frames on `frames`.
///
/// Waits on two sources at once: the next event, and the frame receiver
/// being dropped (the client went away). A disconnect stops reading events
/// and returns `ClientDisconnected`; the remote submission is left running.
/// An `Error` event is forwarded as an `Err` item, which ends the body.
pub async fn pump_sse_frames(
    mut events: mpsc::Receiver<StreamEvent>,
    header: ChunkHeader,
    frames: mpsc::Sender<GatewayResult<Bytes>>,
) -> GatewayResult<()> {
    loop {
        let event = tokio::select! {
            biased;
            _ = frames.closed() => return Err(GatewayError::ClientDisconnected),
            event = events.recv() => event,
        };

        let Some(event) = event else {
            tracing::debug!("[Translate] Feed closed for {}", header.id);
            return Ok(());
        };

        match event {
            StreamEvent::TokenDelta { token } => {
                let frame = sse_line(&content_chunk(&header, &token));
                send(&frames, Bytes::from(frame)).await?;
            },
            StreamEvent::FinalAnswer { .. } => {
                send(&frames, Bytes::from(sse_line(&stop_chunk(&header)))).await?;
                send(&frames, Bytes::from_static(DONE_FRAME.as_bytes())).await?;
            },
            StreamEvent::Error { cause } => {
                tracing::warn!("[Translate] Remote feed error for {}: {}", header.id, cause);
                let _ = frames.send(Err(GatewayError::Stream(cause.clone()))).await;
                return Err(GatewayError::Stream(cause));
            },
            StreamEvent::Unknown => tracing::warn!("[Translate] Unknown stream event ignored"),
            other @ (StreamEvent::Status { .. }
            | StreamEvent::FileAttachment { .. }
            | StreamEvent::ToolEvent { .. }
            | StreamEvent::Title { .. }
            | StreamEvent::Reasoning { .. }) => {
                tracing::debug!("[Translate] '{}' event absorbed for {}", other.kind(), header.id);
            },
        }
    }
}

async fn send(frames: &mpsc::Sender<GatewayResult<Bytes>>, frame: Bytes) -> GatewayResult<()> {
    frames.send(Ok(frame)).await.map_err(|_| GatewayError::ClientDisconnected)
}
