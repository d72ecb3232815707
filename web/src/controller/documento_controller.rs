use crate::controller::ApiResponse;
use crate::extractors::{
    authenticated_user::AuthenticatedUser, compare_api_version::CompareApiVersion,
};
use crate::params::documento::OrigenParams;
use crate::{AppState, Error};
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use domain::documento::{self as DocumentoApi, Documento, NuevoDocumento};
use domain::Id;
use log::*;
use serde::Serialize;
use service::config::ApiVersion;
use utoipa::ToSchema;

#[derive(Debug, Serialize, ToSchema)]
pub(crate) struct SignedUrlResponse {
    /// Time-limited download URL; never persisted
    pub url: String,
}

/// GET documents attached to a Caso (both origins)
#[utoipa::path(
    get,
    path = "/casos/{id}/documentos",
    params(
        ApiVersion,
        ("id" = Id, Path, description = "Caso id")
    ),
    responses(
        (status = 200, description = "Documents of the caso", body = [Documento]),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden"),
        (status = 404, description = "Not found")
    ),
    security(
        ("cookie_auth" = [])
    )
)]
pub async fn index(
    CompareApiVersion(_v): CompareApiVersion,
    AuthenticatedUser(user): AuthenticatedUser,
    State(app_state): State<AppState>,
    Path(caso_id): Path<Id>,
) -> Result<impl IntoResponse, Error> {
    debug!("GET documentos for caso {caso_id}");

    let documentos =
        DocumentoApi::find_by_caso(app_state.db_conn_ref(), &user, caso_id).await?;

    Ok(Json(ApiResponse::new(StatusCode::OK.into(), documentos)))
}

/// POST attach a document to a Caso
#[utoipa::path(
    post,
    path = "/casos/{id}/documentos",
    params(
        ApiVersion,
        ("id" = Id, Path, description = "Caso id to attach to")
    ),
    request_body = NuevoDocumento,
    responses(
        (status = 201, description = "Document stored and registered", body = Documento),
        (status = 400, description = "Validation failure (size, extension, encoding)"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden"),
        (status = 404, description = "Not found")
    ),
    security(
        ("cookie_auth" = [])
    )
)]
pub async fn create(
    CompareApiVersion(_v): CompareApiVersion,
    AuthenticatedUser(user): AuthenticatedUser,
    State(app_state): State<AppState>,
    Path(caso_id): Path<Id>,
    Json(nuevo): Json<NuevoDocumento>,
) -> Result<impl IntoResponse, Error> {
    debug!(
        "POST attach documento '{}' to caso {caso_id}",
        nuevo.nombre_archivo
    );

    let documento = DocumentoApi::attach(
        app_state.db_conn_ref(),
        &app_state.config,
        &user,
        caso_id,
        nuevo,
    )
    .await?;

    Ok(Json(ApiResponse::new(StatusCode::CREATED.into(), documento)))
}

/// GET a fresh signed URL for a document
#[utoipa::path(
    get,
    path = "/documentos/{id}/url_firmada",
    params(
        ApiVersion,
        OrigenParams,
        ("id" = Id, Path, description = "Documento id")
    ),
    responses(
        (status = 200, description = "Signed URL minted", body = SignedUrlResponse),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden"),
        (status = 404, description = "Not found")
    ),
    security(
        ("cookie_auth" = [])
    )
)]
pub async fn signed_url(
    CompareApiVersion(_v): CompareApiVersion,
    AuthenticatedUser(user): AuthenticatedUser,
    State(app_state): State<AppState>,
    Path(documento_id): Path<Id>,
    Query(params): Query<OrigenParams>,
) -> Result<impl IntoResponse, Error> {
    let url = DocumentoApi::signed_url(
        app_state.db_conn_ref(),
        &app_state.config,
        &user,
        params.origen,
        documento_id,
    )
    .await?;

    Ok(Json(ApiResponse::new(
        StatusCode::OK.into(),
        SignedUrlResponse { url },
    )))
}

/// DELETE a document (blob first, then metadata)
#[utoipa::path(
    delete,
    path = "/documentos/{id}",
    params(
        ApiVersion,
        OrigenParams,
        ("id" = Id, Path, description = "Documento id")
    ),
    responses(
        (status = 204, description = "Document removed"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden"),
        (status = 404, description = "Not found")
    ),
    security(
        ("cookie_auth" = [])
    )
)]
pub async fn delete(
    CompareApiVersion(_v): CompareApiVersion,
    AuthenticatedUser(user): AuthenticatedUser,
    State(app_state): State<AppState>,
    Path(documento_id): Path<Id>,
    Query(params): Query<OrigenParams>,
) -> Result<impl IntoResponse, Error> {
    debug!("DELETE documento {documento_id} ({:?})", params.origen);

    DocumentoApi::delete(
        app_state.db_conn_ref(),
        &app_state.config,
        &user,
        params.origen,
        documento_id,
    )
    .await?;

    Ok(StatusCode::NO_CONTENT)
}
