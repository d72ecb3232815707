use crate::controller::ApiResponse;
use crate::extractors::{
    authenticated_user::AuthenticatedUser, compare_api_version::CompareApiVersion,
};
use crate::params::profile::UpdateParams;
use crate::{AppState, Error};
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use domain::{profile as ProfileApi, profiles, Id};
use service::config::ApiVersion;

/// GET a profile: self, or any profile for super admins
#[utoipa::path(
    get,
    path = "/profiles/{id}",
    params(
        ApiVersion,
        ("id" = Id, Path, description = "Profile id")
    ),
    responses(
        (status = 200, description = "Profile", body = profiles::Model),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden"),
        (status = 404, description = "Not found")
    ),
    security(
        ("cookie_auth" = [])
    )
)]
pub async fn read(
    CompareApiVersion(_v): CompareApiVersion,
    AuthenticatedUser(user): AuthenticatedUser,
    State(app_state): State<AppState>,
    Path(id): Path<Id>,
) -> Result<impl IntoResponse, Error> {
    if user.id != id && !user.is_super_admin() {
        return Ok((StatusCode::FORBIDDEN, "FORBIDDEN").into_response());
    }

    let profile = ProfileApi::find_by_id(app_state.db_conn_ref(), id).await?;

    Ok(Json(ApiResponse::new(StatusCode::OK.into(), profile)).into_response())
}

/// PUT update a profile's own editable fields
#[utoipa::path(
    put,
    path = "/profiles/{id}",
    params(
        ApiVersion,
        ("id" = Id, Path, description = "Profile id")
    ),
    request_body = UpdateParams,
    responses(
        (status = 200, description = "Profile updated", body = profiles::Model),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden")
    ),
    security(
        ("cookie_auth" = [])
    )
)]
pub async fn update(
    CompareApiVersion(_v): CompareApiVersion,
    AuthenticatedUser(user): AuthenticatedUser,
    State(app_state): State<AppState>,
    Path(id): Path<Id>,
    Json(params): Json<UpdateParams>,
) -> Result<impl IntoResponse, Error> {
    if user.id != id && !user.is_super_admin() {
        return Ok((StatusCode::FORBIDDEN, "FORBIDDEN").into_response());
    }

    let profile = ProfileApi::update(app_state.db_conn_ref(), id, params).await?;

    Ok(Json(ApiResponse::new(StatusCode::OK.into(), profile)).into_response())
}
