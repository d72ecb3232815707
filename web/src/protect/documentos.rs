use crate::params::documento::OrigenParams;
use crate::{extractors::authenticated_user::AuthenticatedUser, AppState};
use axum::{
    extract::{Path, Query, Request, State},
    http::StatusCode,
    middleware::Next,
    response::IntoResponse,
};
use domain::access::{self, Decision, Operation};
use domain::documento::DocumentoOrigen;
use domain::Id;
use log::error;

/// Resolves a document id to its caso before asking the gate. The decision is
/// made against the DOCUMENT's caso, never the actor's general role alone.
async fn gate_documento(
    app_state: AppState,
    user: domain::profiles::Model,
    origen: DocumentoOrigen,
    documento_id: Id,
    operation: Operation,
    request: Request,
    next: Next,
) -> axum::response::Response {
    let db = app_state.db_conn_ref();

    let caso_id = match domain::documento::find_by_id(db, origen, documento_id).await {
        Ok(documento) => documento.caso_id,
        Err(e) => {
            error!("Authorization error loading documento {documento_id:?}: {e:?}");
            return (StatusCode::NOT_FOUND, "NOT FOUND").into_response();
        }
    };

    match access::can_access(db, &user, caso_id, operation).await {
        Ok(Decision::Allowed) => next.run(request).await,
        Ok(Decision::Denied) => (StatusCode::FORBIDDEN, "FORBIDDEN").into_response(),
        Err(e) => {
            error!("Authorization error loading caso {caso_id:?}: {e:?}");
            (StatusCode::NOT_FOUND, "NOT FOUND").into_response()
        }
    }
}

/// Gate for GET /documentos/:id/url_firmada.
pub(crate) async fn read(
    State(app_state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    Path(documento_id): Path<Id>,
    Query(params): Query<OrigenParams>,
    request: Request,
    next: Next,
) -> impl IntoResponse {
    gate_documento(
        app_state,
        user,
        params.origen,
        documento_id,
        Operation::Read,
        request,
        next,
    )
    .await
}

/// Gate for DELETE /documentos/:id.
pub(crate) async fn delete(
    State(app_state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    Path(documento_id): Path<Id>,
    Query(params): Query<OrigenParams>,
    request: Request,
    next: Next,
) -> impl IntoResponse {
    gate_documento(
        app_state,
        user,
        params.origen,
        documento_id,
        Operation::DeleteDocument,
        request,
        next,
    )
    .await
}
