use crate::controller::ApiResponse;
use crate::extractors::{
    authenticated_user::AuthenticatedUser, compare_api_version::CompareApiVersion,
};
use crate::params::asignacion::AssignParams;
use crate::params::caso::{IndexParams, UpdateParams};
use crate::{AppState, Error};
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use domain::{
    asignacion as AsignacionApi, asignaciones_casos, caso as CasoApi, casos, casos::Model, Id,
};
use service::config::ApiVersion;

use log::*;

#[utoipa::path(
    get,
    path = "/casos",
    params(
        ApiVersion,
        IndexParams
    ),
    responses(
        (status = 200, description = "Successfully retrieved the Casos visible to the caller", body = [casos::Model]),
        (status = 401, description = "Unauthorized"),
        (status = 405, description = "Method not allowed")
    ),
    security(
        ("cookie_auth" = [])
    )
)]
pub async fn index(
    CompareApiVersion(_v): CompareApiVersion,
    AuthenticatedUser(user): AuthenticatedUser,
    State(app_state): State<AppState>,
    Query(params): Query<IndexParams>,
) -> Result<impl IntoResponse, Error> {
    debug!("GET all Casos, filter params: {params:?}");

    // Filtered listings are an admin surface; everyone else gets the
    // role-scoped listing (drafts never reach a lawyer's view).
    let casos = if user.is_super_admin() && !params.is_empty() {
        CasoApi::find_by(app_state.db_conn_ref(), params).await?
    } else {
        CasoApi::find_for_actor(app_state.db_conn_ref(), &user).await?
    };

    debug!("Found {} casos", casos.len());

    Ok(Json(ApiResponse::new(StatusCode::OK.into(), casos)))
}

#[utoipa::path(
    get,
    path = "/casos/{id}",
    params(
        ApiVersion,
        ("id" = Id, Path, description = "Caso id to retrieve")
    ),
    responses(
        (status = 200, description = "Successfully retrieved a Caso", body = casos::Model),
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
    debug!("GET Caso by id: {id}");

    let caso = CasoApi::read(app_state.db_conn_ref(), &user, id).await?;

    Ok(Json(ApiResponse::new(StatusCode::OK.into(), caso)))
}

/// POST create a new Caso draft
#[utoipa::path(
    post,
    path = "/casos",
    params(ApiVersion),
    request_body = casos::Model,
    responses(
        (status = 201, description = "Successfully created a new Caso draft", body = casos::Model),
        (status = 400, description = "Bad request"),
        (status = 405, description = "Method not allowed")
    )
)]
pub async fn create(
    CompareApiVersion(_v): CompareApiVersion,
    State(app_state): State<AppState>,
    auth_session: domain::profile::AuthSession,
    Json(caso_model): Json<Model>,
) -> Result<impl IntoResponse, Error> {
    debug!("POST create a new Caso draft from: {caso_model:?}");

    // Draft intake is open to anonymous requesters; an authenticated client
    // gets the caso linked to their profile.
    let caso = CasoApi::create_draft(
        app_state.db_conn_ref(),
        auth_session.user.as_ref(),
        caso_model,
    )
    .await?;

    debug!("New Caso: {caso:?}");

    Ok(Json(ApiResponse::new(StatusCode::CREATED.into(), caso)))
}

/// PUT update a Caso
#[utoipa::path(
    put,
    path = "/casos/{id}",
    params(
        ApiVersion,
        ("id" = Id, Path, description = "Caso id to update")
    ),
    request_body = UpdateParams,
    responses(
        (status = 200, description = "Successfully updated a Caso", body = casos::Model),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden"),
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
    let caso = CasoApi::update(app_state.db_conn_ref(), &user, id, params).await?;
    Ok(Json(ApiResponse::new(StatusCode::OK.into(), caso)))
}

/// POST assign a Caso to a lawyer (staff action)
#[utoipa::path(
    post,
    path = "/casos/{id}/asignar",
    params(
        ApiVersion,
        ("id" = Id, Path, description = "Caso id to assign")
    ),
    request_body = AssignParams,
    responses(
        (status = 200, description = "Successfully assigned the Caso", body = asignaciones_casos::Model),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden"),
        (status = 404, description = "Not found")
    ),
    security(
        ("cookie_auth" = [])
    )
)]
pub async fn assign(
    CompareApiVersion(_v): CompareApiVersion,
    AuthenticatedUser(user): AuthenticatedUser,
    State(app_state): State<AppState>,
    Path(id): Path<Id>,
    Json(params): Json<AssignParams>,
) -> Result<impl IntoResponse, Error> {
    debug!(
        "POST assign Caso {id} to abogado {:?}",
        params.abogado_id
    );

    let asignacion = AsignacionApi::assign(
        app_state.db_conn_ref(),
        &app_state.config,
        &user,
        id,
        params.abogado_id,
        params.notas_asignacion,
    )
    .await?;

    Ok(Json(ApiResponse::new(StatusCode::OK.into(), asignacion)))
}

/// POST close a Caso
#[utoipa::path(
    post,
    path = "/casos/{id}/cerrar",
    params(
        ApiVersion,
        ("id" = Id, Path, description = "Caso id to close")
    ),
    responses(
        (status = 200, description = "Successfully closed the Caso", body = casos::Model),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden"),
        (status = 404, description = "Not found")
    ),
    security(
        ("cookie_auth" = [])
    )
)]
pub async fn close(
    CompareApiVersion(_v): CompareApiVersion,
    AuthenticatedUser(user): AuthenticatedUser,
    State(app_state): State<AppState>,
    Path(id): Path<Id>,
) -> Result<impl IntoResponse, Error> {
    debug!("POST close Caso {id}");

    let caso = AsignacionApi::close(app_state.db_conn_ref(), &user, id).await?;

    Ok(Json(ApiResponse::new(StatusCode::OK.into(), caso)))
}

/// POST park a Caso as agotado once its credits are spent
#[utoipa::path(
    post,
    path = "/casos/{id}/agotar",
    params(
        ApiVersion,
        ("id" = Id, Path, description = "Caso id to mark agotado")
    ),
    responses(
        (status = 200, description = "Successfully marked the Caso agotado", body = casos::Model),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden"),
        (status = 404, description = "Not found")
    ),
    security(
        ("cookie_auth" = [])
    )
)]
pub async fn agotar(
    CompareApiVersion(_v): CompareApiVersion,
    AuthenticatedUser(user): AuthenticatedUser,
    State(app_state): State<AppState>,
    Path(id): Path<Id>,
) -> Result<impl IntoResponse, Error> {
    let caso = CasoApi::mark_agotado(app_state.db_conn_ref(), &user, id).await?;
    Ok(Json(ApiResponse::new(StatusCode::OK.into(), caso)))
}
