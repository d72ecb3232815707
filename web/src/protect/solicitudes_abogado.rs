use crate::extractors::authenticated_user::AuthenticatedUser;
use axum::{extract::Request, http::StatusCode, middleware::Next, response::IntoResponse};
use domain::access;

/// Application review is a staff surface: only super admins pass.
/// Intended to be given to axum::middleware::from_fn in the router
pub(crate) async fn review(
    AuthenticatedUser(user): AuthenticatedUser,
    request: Request,
    next: Next,
) -> impl IntoResponse {
    match access::ensure_super_admin(&user) {
        Ok(()) => next.run(request).await,
        Err(_) => (StatusCode::FORBIDDEN, "FORBIDDEN").into_response(),
    }
}
