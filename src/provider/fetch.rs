use std::future::Future;
use std::time::Duration;

use futures::future::{select, Either};
use worker::*;

use crate::error::AppError;

/// Resolves with `work`, or with [`AppError::Timeout`] if `deadline` fires first.
async fn race_deadline<T, W, D>(
    work: W,
    deadline: D,
    timeout_ms: u64,
) -> std::result::Result<T, AppError>
where
    W: Future<Output = std::result::Result<T, AppError>>,
    D: Future<Output = ()>,
{
    let outcome = select(Box::pin(work), Box::pin(deadline)).await;
    match outcome {
        Either::Left((result, _)) => result,
        Either::Right(((), _)) => Err(AppError::Timeout { millis: timeout_ms }),
    }
}

/// Races `work` against a `Delay`, aborting `controller` when time runs out.
async fn with_deadline<T, W>(
    work: W,
    controller: AbortController,
    timeout_ms: u64,
) -> std::result::Result<T, AppError>
where
    W: Future<Output = std::result::Result<T, AppError>>,
{
    let deadline = Delay::from(Duration::from_millis(timeout_ms));
    let result = race_deadline(work, deadline, timeout_ms).await;
    if matches!(result, Err(AppError::Timeout { .. })) {
        controller.abort();
    }
    result
}

/// Sends `request`, giving up if the response head takes longer than
/// `timeout_ms`. The body is left to stream.
///
/// Network failures come back as [`AppError::Internal`].
pub async fn fetch_with_timeout(
    request: Request,
    timeout_ms: u64,
) -> std::result::Result<Response, AppError> {
    let controller = AbortController::default();
    let signal = controller.signal();

    let work = async move {
        let fetch = Fetch::Request(request);
        fetch.send_with_signal(&signal).await.map_err(AppError::from)
    };

    with_deadline(work, controller, timeout_ms).await
}

/// Sends `request` and reads the whole body as text, both within `timeout_ms`.
pub async fn fetch_text_with_timeout(
    request: Request,
    timeout_ms: u64,
) -> std::result::Result<(u16, String), AppError> {
    let controller = AbortController::default();
    let signal = controller.signal();

    let work = async move {
        let fetch = Fetch::Request(request);
        let mut resp = fetch.send_with_signal(&signal).await?;
        let text = resp.text().await?;
        Ok::<_, AppError>((resp.status_code(), text))
    };

    with_deadline(work, controller, timeout_ms).await
}
