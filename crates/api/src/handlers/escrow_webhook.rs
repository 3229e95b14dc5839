use axum::body::Bytes;
use axum::extract::State;
use http::{HeaderMap, StatusCode};
use packmule_core::services::webhook_service::{WebhookOutcome, WebhookService};
use packmule_core::AppState;
use packmule_primitives::error::{ApiError, ApiErrorResponse};
use secrecy::ExposeSecret;
use std::sync::Arc;
use tracing::info;

#[utoipa::path(
    post,
    path = "/api/webhooks/escrow",
    request_body(
        content = String,
        description = "Raw JSON escrow event. The signature over the raw body \
                       is verified before any parsing.",
    ),
    responses(
        (status = 200, description = "Event acknowledged (processed, duplicate, or ignored)"),
        (status = 400, description = "Bad signature or malformed payload", body = ApiErrorResponse),
        (status = 500, description = "Internal error; the processor will redeliver", body = ApiErrorResponse)
    ),
    security(()),
    tag = "Webhooks"
)]
pub async fn escrow_webhook(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<StatusCode, ApiError> {
    let signature = headers
        .get("x-escrow-signature")
        .and_then(|v| v.to_str().ok())
        .ok_or(ApiError::Webhook("Missing escrow signature".into()))?;

    WebhookService::verify_signature(
        state.config.escrow_details.webhook_secret.expose_secret(),
        &body,
        signature,
    )?;

    let payload = WebhookService::parse_event(&body)?;

    match WebhookService::handle_event(&state, payload).await? {
        WebhookOutcome::Processed => {
            info!("Escrow webhook processed");
            Ok(StatusCode::OK)
        }
        WebhookOutcome::Ignored => {
            info!("Escrow webhook ignored");
            Ok(StatusCode::OK)
        }
    }
}
