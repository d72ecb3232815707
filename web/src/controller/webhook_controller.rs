//! Controller for the payment provider's webhook callbacks.
//!
//! This endpoint carries no session auth: authenticity comes from the
//! signature header verified against the endpoint secret. The handler body
//! must see the raw request bytes, because the signature covers the payload
//! exactly as transmitted.

use crate::{AppState, Error};

use axum::body::Bytes;
use axum::extract::State;
use axum::http::{HeaderMap, StatusCode};
use axum::response::IntoResponse;
use axum::Json;

use domain::pago::{self as PagoApi, WebhookOutcome};
use log::*;
use serde::Serialize;

/// Acknowledgment body the provider expects.
#[derive(Debug, Serialize)]
pub struct WebhookResponse {
    pub received: bool,
}

/// POST /webhooks/stripe
///
/// Verifies the signature, deduplicates by event id, and processes
/// `checkout.session.completed` events. Errors surface as non-2xx responses
/// so the provider retries delivery; duplicates and unknown event types are
/// acknowledged without side effects.
pub async fn stripe_webhook(
    State(app_state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<impl IntoResponse, Error> {
    let signature_header = headers
        .get("stripe-signature")
        .and_then(|v| v.to_str().ok())
        .unwrap_or("");

    let outcome = PagoApi::process_webhook_event(
        app_state.db_conn_ref(),
        &app_state.config,
        &body,
        signature_header,
    )
    .await?;

    match outcome {
        WebhookOutcome::Processed => debug!("Webhook event processed"),
        WebhookOutcome::Duplicate => debug!("Webhook event was a duplicate delivery"),
        WebhookOutcome::Ignored => debug!("Webhook event acknowledged and ignored"),
    }

    Ok((StatusCode::OK, Json(WebhookResponse { received: true })))
}
