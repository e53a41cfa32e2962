//! Buffered HTTP output sink.
//!
//! Decoder output accumulates in a shared [`Buffer`]; a single route `/`
//! serves the buffered bytes, and `?flush=true` clears them once the
//! response snapshot is taken.

use std::sync::Arc;

use axum::extract::{Query, State};
use axum::routing::get;
use axum::Router;
use serde::Deserialize;
use tracing::info;

use crate::util::Buffer;

/// Query parameters of the output route.
#[derive(Debug, Default, Deserialize)]
struct OutputParams {
    flush: Option<String>,
}

/// Serve the buffered output; flush clears the buffer after the
/// snapshot.
async fn output(State(buffer): State<Arc<Buffer>>, Query(params): Query<OutputParams>) -> Vec<u8> {
    let snapshot = buffer.snapshot();
    if params.flush.as_deref() == Some("true") {
        buffer.reset();
    }
    snapshot
}

/// Build the single-route router serving buffer.
pub fn router(buffer: Arc<Buffer>) -> Router {
    Router::new().route("/", get(output)).with_state(buffer)
}

/// Serve the output buffer on address until the server fails.
pub async fn serve(address: &str, buffer: Arc<Buffer>) -> std::io::Result<()> {
    let listener = tokio::net::TcpListener::bind(address).await?;
    info!(addr = %listener.local_addr()?, "serving decoder output");
    axum::serve(listener, router(buffer)).await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_output_returns_buffer() {
        let buffer = Arc::new(Buffer::new());
        buffer.write(b"decoded message\n");

        let body = output(
            State(Arc::clone(&buffer)),
            Query(OutputParams::default()),
        )
        .await;
        assert_eq!(body, b"decoded message\n");

        // no flush requested, contents stay
        assert_eq!(buffer.snapshot(), b"decoded message\n");
    }

    #[tokio::test]
    async fn test_output_flush_clears_buffer() {
        let buffer = Arc::new(Buffer::new());
        buffer.write(b"decoded message\n");

        let body = output(
            State(Arc::clone(&buffer)),
            Query(OutputParams {
                flush: Some("true".to_string()),
            }),
        )
        .await;
        assert_eq!(body, b"decoded message\n");

        // the response still carried the old snapshot, the buffer is empty
        assert!(buffer.is_empty());
    }

    #[tokio::test]
    async fn test_output_flush_other_value_keeps_buffer() {
        let buffer = Arc::new(Buffer::new());
        buffer.write(b"x");

        output(
            State(Arc::clone(&buffer)),
            Query(OutputParams {
                flush: Some("1".to_string()),
            }),
        )
        .await;
        assert_eq!(buffer.len(), 1);
    }
}
