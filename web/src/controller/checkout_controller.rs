use crate::controller::ApiResponse;
use crate::extractors::compare_api_version::CompareApiVersion;
use crate::{AppState, Error};
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use domain::{pago as PagoApi, Id};
use log::*;
use serde::Serialize;
use service::config::ApiVersion;
use utoipa::ToSchema;

#[derive(Debug, Serialize, ToSchema)]
pub(crate) struct CheckoutSessionResponse {
    /// Hosted checkout page the client is redirected to
    pub url: String,
}

/// POST create a checkout session for a Caso
///
/// Open to anonymous draft requesters; authenticated callers must own the
/// caso. On success the caso moves to `esperando_pago`.
#[utoipa::path(
    post,
    path = "/casos/{id}/checkout_session",
    params(
        ApiVersion,
        ("id" = Id, Path, description = "Caso id to collect payment for")
    ),
    responses(
        (status = 201, description = "Checkout session created", body = CheckoutSessionResponse),
        (status = 400, description = "Caso is not awaiting checkout"),
        (status = 404, description = "Not found"),
        (status = 502, description = "Payment provider unavailable")
    )
)]
pub async fn create(
    CompareApiVersion(_v): CompareApiVersion,
    State(app_state): State<AppState>,
    auth_session: domain::profile::AuthSession,
    Path(id): Path<Id>,
) -> Result<impl IntoResponse, Error> {
    debug!("POST checkout session for Caso {id}");

    let url = PagoApi::create_checkout_session(
        app_state.db_conn_ref(),
        &app_state.config,
        auth_session.user.as_ref(),
        id,
    )
    .await?;

    Ok(Json(ApiResponse::new(
        StatusCode::CREATED.into(),
        CheckoutSessionResponse { url },
    )))
}
