use crate::controller::ApiResponse;
use crate::extractors::{
    authenticated_user::AuthenticatedUser, compare_api_version::CompareApiVersion,
};
use crate::{AppState, Error};
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use domain::{notificacion as NotificacionApi, notificaciones, Id};
use log::*;
use service::config::ApiVersion;

/// GET the caller's notifications, newest first
#[utoipa::path(
    get,
    path = "/notificaciones",
    params(ApiVersion),
    responses(
        (status = 200, description = "Notifications of the caller", body = [notificaciones::Model]),
        (status = 401, description = "Unauthorized")
    ),
    security(
        ("cookie_auth" = [])
    )
)]
pub async fn index(
    CompareApiVersion(_v): CompareApiVersion,
    AuthenticatedUser(user): AuthenticatedUser,
    State(app_state): State<AppState>,
) -> Result<impl IntoResponse, Error> {
    debug!("GET notificaciones for {:?}", user.id);

    let notificaciones =
        NotificacionApi::find_for_actor(app_state.db_conn_ref(), &user).await?;

    Ok(Json(ApiResponse::new(StatusCode::OK.into(), notificaciones)))
}

/// PUT mark one of the caller's notifications as read
#[utoipa::path(
    put,
    path = "/notificaciones/{id}/leida",
    params(
        ApiVersion,
        ("id" = Id, Path, description = "Notificacion id")
    ),
    responses(
        (status = 200, description = "Notification marked as read", body = notificaciones::Model),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden"),
        (status = 404, description = "Not found")
    ),
    security(
        ("cookie_auth" = [])
    )
)]
pub async fn mark_leida(
    CompareApiVersion(_v): CompareApiVersion,
    AuthenticatedUser(user): AuthenticatedUser,
    State(app_state): State<AppState>,
    Path(id): Path<Id>,
) -> Result<impl IntoResponse, Error> {
    let notificacion = NotificacionApi::mark_leida(app_state.db_conn_ref(), &user, id).await?;

    Ok(Json(ApiResponse::new(StatusCode::OK.into(), notificacion)))
}
