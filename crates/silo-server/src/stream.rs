//! Framed response bodies for streamed reads.
//!
//! A read runs on its own task and pushes encoded frames into a bounded
//! channel; the response body drains the channel. An error raised before
//! the first frame becomes a plain HTTP error response. One raised later
//! is sent as a final `Error` frame.

use std::convert::Infallible;

use async_trait::async_trait;
use axum::body::Body;
use axum::response::{IntoResponse, Response};
use bytes::Bytes;
use silo_object::{GetResponseStream, ObjectError, ObjectResult, RangeResponseStream};
use silo_protocol::{ErrorResponse, GetPart, SiloMessage, WireCodec};
use silo_store::HeaderView;
use tokio::sync::mpsc;
use tracing::warn;

use crate::error::ServerError;

/// Frames buffered between the read task and the response body.
const STREAM_BUFFER: usize = 16;

type Frame = Result<Vec<u8>, ObjectError>;

/// Sink handed to the object service; encodes every part as a frame.
pub struct FrameSink {
    tx: mpsc::Sender<Frame>,
}

impl FrameSink {
    async fn send(&mut self, msg: SiloMessage) -> ObjectResult<()> {
        let frame = WireCodec::encode(&msg).map_err(|e| ObjectError::Stream(e.to_string()))?;
        self.tx
            .send(Ok(frame))
            .await
            .map_err(|_| ObjectError::SinkClosed("client went away".into()))
    }
}

#[async_trait]
impl GetResponseStream for FrameSink {
    async fn send_header(&mut self, header: HeaderView) -> ObjectResult<()> {
        self.send(SiloMessage::Get(GetPart::Init(header))).await
    }

    async fn send_chunk(&mut self, chunk: Vec<u8>) -> ObjectResult<()> {
        self.send(SiloMessage::Get(GetPart::Chunk(chunk))).await
    }
}

#[async_trait]
impl RangeResponseStream for FrameSink {
    async fn send_chunk(&mut self, chunk: Vec<u8>) -> ObjectResult<()> {
        self.send(SiloMessage::RangeChunk(chunk)).await
    }
}

/// Run `read` on a task feeding a [`FrameSink`] and turn its output into
/// a response.
pub async fn framed_response<F, Fut>(read: F) -> Response
where
    F: FnOnce(FrameSink) -> Fut,
    Fut: std::future::Future<Output = ObjectResult<()>> + Send + 'static,
{
    let (tx, mut rx) = mpsc::channel::<Frame>(STREAM_BUFFER);
    let errors = tx.clone();
    let task = read(FrameSink { tx });
    tokio::spawn(async move {
        if let Err(e) = task.await {
            // The receiver may already be gone; nothing left to report to.
            let _ = errors.send(Err(e)).await;
        }
    });

    let first = match rx.recv().await {
        None => return Body::empty().into_response(),
        Some(Err(e)) => return ServerError::from(e).into_response(),
        Some(Ok(frame)) => frame,
    };

    let stream = futures::stream::unfold((Some(first), rx), |(pending, mut rx)| async move {
        if let Some(frame) = pending {
            return Some((Ok::<_, Infallible>(Bytes::from(frame)), (None, rx)));
        }
        match rx.recv().await {
            None => None,
            Some(Ok(frame)) => Some((Ok(Bytes::from(frame)), (None, rx))),
            Some(Err(e)) => {
                warn!(error = %e, "stream aborted after first frame");
                rx.close();
                Some((Ok(Bytes::from(error_frame(&e))), (None, rx)))
            }
        }
    });
    Body::from_stream(stream).into_response()
}

fn error_frame(err: &ObjectError) -> Vec<u8> {
    let msg = SiloMessage::Error(ErrorResponse::new(err.code(), err.to_string()));
    WireCodec::encode(&msg).unwrap_or_default()
}
