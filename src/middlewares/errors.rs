use crate::errors::ActionError;
use axum::{
    body::{Body, to_bytes},
    extract::Request,
    http::StatusCode,
    middleware::Next,
    response::{IntoResponse, Response},
};
use std::convert::Infallible;
use tracing::Instrument;
use uuid::Uuid;

/// Logs every request under its own span and folds anything that is neither
/// a success, a `404` nor one of our `400`s into the plain-text `400` the
/// Actions protocol expects. Extractor rejections (`413`, `415`, `405`, ...)
/// end up here too.
pub async fn error_middleware(request: Request, next: Next) -> Result<Response, Infallible> {
    let request_id = Uuid::new_v4();
    let method = request.method().clone();
    let request_path = request.uri().path().to_string();
    let request_uri = request.uri().to_string();

    let span = tracing::info_span!(
        "request",
        %request_id,
        %method,
        path = %request_path,
    );

    async move {
        tracing::debug!(uri = %request_uri, "Received");

        let response = next.run(request).await;
        let status_code = response.status();

        if status_code.is_success() || status_code == StatusCode::NOT_FOUND {
            tracing::debug!(status = %status_code, "Responded");
            return Ok(response);
        }

        if status_code == StatusCode::BAD_REQUEST {
            return log_client_error(response, &request_uri, status_code).await;
        }

        let detail = match to_bytes(response.into_body(), usize::MAX).await {
            Ok(bytes) => String::from_utf8_lossy(&bytes).into_owned(),
            Err(e) => format!("failed to read response body: {e}"),
        };

        Ok(ActionError::unknown(format!(
            "{method} {request_path} responded {status_code}: {detail}"
        ))
        .into_response())
    }
    .instrument(span)
    .await
}

async fn log_client_error(
    response: Response,
    request_uri: &str,
    status_code: StatusCode,
) -> Result<Response, Infallible> {
    let (parts, body) = response.into_parts();

    match to_bytes(body, usize::MAX).await {
        Ok(bytes) => {
            tracing::warn!(
                uri = %request_uri,
                status = %status_code,
                "Client error: {}",
                String::from_utf8_lossy(&bytes),
            );

            // Reconstruct the response with the original body
            Ok(Response::from_parts(parts, Body::from(bytes)))
        },
        Err(e) => Ok(ActionError::unknown(format!("failed to read response body: {e}"))
            .into_response()),
    }
}
