//! Split a byte stream into newline-terminated lines.

use bytes::{Bytes, BytesMut};
use futures::{Stream, StreamExt};

use super::LineStream;
use crate::error::GatewayError;

/// Yield each line of `body` without its terminator. A trailing line with no
/// newline is yielded at EOF. Transport errors end the stream after being
/// yielded once.
pub fn ndjson_lines<S, E>(body: S) -> LineStream
where
    S: Stream<Item = Result<Bytes, E>> + Send + 'static,
    E: Into<GatewayError> + Send + 'static,
{
    let stream = async_stream::stream! {
        let mut buffer = BytesMut::new();
        let mut body = Box::pin(body);

        while let Some(item) = body.next().await {
            match item {
                Ok(bytes) => {
                    buffer.extend_from_slice(&bytes);
                    while let Some(pos) = buffer.iter().position(|&b| b == b'\n') {
                        let line = buffer.split_to(pos + 1);
                        yield Ok::<String, GatewayError>(String::from_utf8_lossy(&line[..pos]).into_owned());
                    }
                },
                Err(e) => {
                    yield Err::<String, GatewayError>(e.into());
                    return;
                },
            }
        }

        if !buffer.is_empty() {
            yield Ok::<String, GatewayError>(String::from_utf8_lossy(&buffer).into_owned());
        }
    };

    Box::pin(stream)
}
