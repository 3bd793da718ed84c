use std::time::{Duration, Instant};

use tokio::sync::mpsc::UnboundedSender;
use tokio_util::sync::CancellationToken;

use crate::error::AppError;
use crate::event::{Event, SendResult};
use crate::state::response_state::CapturedResponse;
use super::transport::{OutgoingRequest, Transport};

/// Run one send and post its outcome, tagged with `generation`, back to the
/// event loop. Exactly one `Event::Response` is posted per call.
pub async fn execute<T: Transport>(
    transport: T,
    request: OutgoingRequest,
    generation: u64,
    tx: UnboundedSender<Event>,
    cancel: CancellationToken,
) {
    let result = tokio::select! {
        res = timed_send(&transport, request) => res,
        _ = cancel.cancelled() => Err(AppError::Cancelled),
    };
    let _ = tx.send(Event::Response(SendResult { generation, result }));
}

async fn timed_send<T: Transport>(
    transport: &T,
    request: OutgoingRequest,
) -> Result<(CapturedResponse, Duration), AppError> {
    tracing::info!(method = %request.method, url = %request.url, "sending request");
    let start = Instant::now();
    let response = transport.send(request).await?;
    let elapsed = start.elapsed();
    tracing::info!(status = response.status, elapsed_ms = elapsed.as_millis() as u64, "response received");
    Ok((response, elapsed))
}
