use axum::{
    body::{Body, Bytes},
    extract::State,
    http::{header, HeaderMap},
    response::{IntoResponse, Response},
    Json,
};
use futures::StreamExt;
use hugchat_types::protocol::ChatCompletionRequest;
use tokio::sync::mpsc;
use tokio_stream::wrappers::ReceiverStream;

use super::{identity, open_session};
use crate::chat::{TurnHandle, EVENT_CHANNEL_CAPACITY};
use crate::error::{GatewayError, GatewayResult};
use crate::server::AppState;
use crate::translate::{collect_completion, pump_sse_frames, response_header};

/// `POST /v1/chat/completions`.
pub async fn handle_chat_completions(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> GatewayResult<Response> {
    let identity = identity(&headers)?;
    let request: ChatCompletionRequest = serde_json::from_slice(&body)
        .map_err(|e| GatewayError::InvalidRequest(e.to_string()))?;
    let session = open_session(&state, identity).await?;

    tracing::info!(
        "[Server] Chat completion: model={} messages={} stream={}",
        request.model,
        request.messages.len(),
        request.stream
    );

    let handle = session.start_turn(&request.model, &request.messages).await?;
    if request.stream {
        stream_completion(handle).await
    } else {
        let response = collect_completion(handle.events, &handle.meta, &state.domain).await?;
        Ok(Json(response).into_response())
    }
}

/// Start the SSE pump and hold the response until the first frame is known.
/// A failure before any frame becomes an ordinary error response; after that
/// it can only end the body.
async fn stream_completion(handle: TurnHandle) -> GatewayResult<Response> {
    let chunk_header = response_header(&handle.meta);
    let response_id = chunk_header.id.clone();
    let (frame_tx, mut frame_rx) = mpsc::channel(EVENT_CHANNEL_CAPACITY);

    tokio::spawn(async move {
        match pump_sse_frames(handle.events, chunk_header, frame_tx).await {
            Ok(()) => tracing::info!("[Server] Stream {} finished", response_id),
            Err(GatewayError::ClientDisconnected) => {
                tracing::info!("[Server] Client left stream {}", response_id);
            },
            Err(e) => tracing::error!("[Server] Stream {} aborted: {}", response_id, e),
        }
    });

    let first = match frame_rx.recv().await {
        Some(Err(e)) => return Err(e),
        Some(Ok(frame)) => Some(Ok::<Bytes, GatewayError>(frame)),
        None => None,
    };
    let frames = futures::stream::iter(first).chain(ReceiverStream::new(frame_rx));

    Ok((
        [
            (header::CONTENT_TYPE, "text/event-stream"),
            (header::CACHE_CONTROL, "no-cache"),
            (header::CONNECTION, "keep-alive"),
        ],
        Body::from_stream(frames),
    )
        .into_response())
}
