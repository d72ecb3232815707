use crate::controller::ApiResponse;
use crate::extractors::{
    authenticated_user::AuthenticatedUser, compare_api_version::CompareApiVersion,
};
use crate::params::solicitud_abogado::RejectParams;
use crate::{AppState, Error};
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use domain::{
    solicitud_abogado as SolicitudApi, solicitudes_abogado, solicitudes_abogado::Model, Id,
};
use log::*;
use service::config::ApiVersion;

/// POST a lawyer sign-up application (public intake)
#[utoipa::path(
    post,
    path = "/solicitudes_abogado",
    params(ApiVersion),
    request_body = solicitudes_abogado::Model,
    responses(
        (status = 201, description = "Application submitted", body = solicitudes_abogado::Model),
        (status = 400, description = "Bad request")
    )
)]
pub async fn create(
    CompareApiVersion(_v): CompareApiVersion,
    State(app_state): State<AppState>,
    Json(solicitud_model): Json<Model>,
) -> Result<impl IntoResponse, Error> {
    debug!("POST new solicitud de abogado from {}", solicitud_model.email);

    let solicitud = SolicitudApi::create(app_state.db_conn_ref(), solicitud_model).await?;

    Ok(Json(ApiResponse::new(StatusCode::CREATED.into(), solicitud)))
}

/// GET pending applications (staff review queue)
#[utoipa::path(
    get,
    path = "/solicitudes_abogado",
    params(ApiVersion),
    responses(
        (status = 200, description = "Pending applications", body = [solicitudes_abogado::Model]),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden")
    ),
    security(
        ("cookie_auth" = [])
    )
)]
pub async fn index(
    CompareApiVersion(_v): CompareApiVersion,
    AuthenticatedUser(_user): AuthenticatedUser,
    State(app_state): State<AppState>,
) -> Result<impl IntoResponse, Error> {
    let solicitudes = SolicitudApi::find_pendientes(app_state.db_conn_ref()).await?;

    Ok(Json(ApiResponse::new(StatusCode::OK.into(), solicitudes)))
}

/// POST approve an application: creates the lawyer profile and queues the
/// approval + welcome emails
#[utoipa::path(
    post,
    path = "/solicitudes_abogado/{id}/aprobar",
    params(
        ApiVersion,
        ("id" = Id, Path, description = "Solicitud id to approve")
    ),
    responses(
        (status = 200, description = "Application approved", body = solicitudes_abogado::Model),
        (status = 400, description = "Already reviewed"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden"),
        (status = 404, description = "Not found")
    ),
    security(
        ("cookie_auth" = [])
    )
)]
pub async fn approve(
    CompareApiVersion(_v): CompareApiVersion,
    AuthenticatedUser(user): AuthenticatedUser,
    State(app_state): State<AppState>,
    Path(id): Path<Id>,
) -> Result<impl IntoResponse, Error> {
    debug!("POST approve solicitud {id}");

    let solicitud = SolicitudApi::approve(
        app_state.db_conn_ref(),
        &app_state.config,
        &user,
        id,
    )
    .await?;

    Ok(Json(ApiResponse::new(StatusCode::OK.into(), solicitud)))
}

/// POST reject an application with a reason
#[utoipa::path(
    post,
    path = "/solicitudes_abogado/{id}/rechazar",
    params(
        ApiVersion,
        ("id" = Id, Path, description = "Solicitud id to reject")
    ),
    request_body = RejectParams,
    responses(
        (status = 200, description = "Application rejected", body = solicitudes_abogado::Model),
        (status = 400, description = "Already reviewed or missing reason"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden"),
        (status = 404, description = "Not found")
    ),
    security(
        ("cookie_auth" = [])
    )
)]
pub async fn reject(
    CompareApiVersion(_v): CompareApiVersion,
    AuthenticatedUser(user): AuthenticatedUser,
    State(app_state): State<AppState>,
    Path(id): Path<Id>,
    Json(params): Json<RejectParams>,
) -> Result<impl IntoResponse, Error> {
    debug!("POST reject solicitud {id}");

    let solicitud = SolicitudApi::reject(
        app_state.db_conn_ref(),
        &app_state.config,
        &user,
        id,
        params.motivo_rechazo,
    )
    .await?;

    Ok(Json(ApiResponse::new(StatusCode::OK.into(), solicitud)))
}
