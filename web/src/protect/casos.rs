use crate::{extractors::authenticated_user::AuthenticatedUser, AppState};
use axum::{
    extract::{Path, Request, State},
    http::StatusCode,
    middleware::Next,
    response::IntoResponse,
};
use domain::access::{self, Decision, Operation};
use domain::Id;
use log::error;

async fn gate(
    app_state: AppState,
    user: domain::profiles::Model,
    caso_id: Id,
    operation: Operation,
    request: Request,
    next: Next,
) -> axum::response::Response {
    match access::can_access(app_state.db_conn_ref(), &user, caso_id, operation).await {
        Ok(Decision::Allowed) => next.run(request).await,
        Ok(Decision::Denied) => (StatusCode::FORBIDDEN, "FORBIDDEN").into_response(),
        Err(e) => {
            error!("Authorization error loading caso {caso_id:?}: {e:?}");
            (StatusCode::NOT_FOUND, "NOT FOUND").into_response()
        }
    }
}

/// Gate for GET /casos/:id.
/// Intended to be given to axum::middleware::from_fn_with_state in the router
pub(crate) async fn read(
    State(app_state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    Path(caso_id): Path<Id>,
    request: Request,
    next: Next,
) -> impl IntoResponse {
    gate(app_state, user, caso_id, Operation::Read, request, next).await
}

/// Gate for PUT /casos/:id.
pub(crate) async fn update(
    State(app_state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    Path(caso_id): Path<Id>,
    request: Request,
    next: Next,
) -> impl IntoResponse {
    gate(app_state, user, caso_id, Operation::Update, request, next).await
}

/// Gate for POST /casos/:id/asignar (staff action).
pub(crate) async fn assign(
    State(app_state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    Path(caso_id): Path<Id>,
    request: Request,
    next: Next,
) -> impl IntoResponse {
    gate(app_state, user, caso_id, Operation::Assign, request, next).await
}

/// Gate for POST /casos/:id/cerrar.
pub(crate) async fn close(
    State(app_state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    Path(caso_id): Path<Id>,
    request: Request,
    next: Next,
) -> impl IntoResponse {
    gate(app_state, user, caso_id, Operation::Close, request, next).await
}

/// Gate for POST /casos/:id/documentos.
pub(crate) async fn attach_documento(
    State(app_state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    Path(caso_id): Path<Id>,
    request: Request,
    next: Next,
) -> impl IntoResponse {
    gate(
        app_state,
        user,
        caso_id,
        Operation::AttachDocument,
        request,
        next,
    )
    .await
}
