use axum::{
    extract::Request,
    http::StatusCode,
    middleware::Next,
    response::{IntoResponse, Response},
};
use axum_login::AuthSession;

/// Authentication middleware that returns 401 Unauthorized for unauthenticated requests.
///
/// This replaces axum-login's `login_required!` macro which redirects to login URLs.
/// For API endpoints, we want to return proper HTTP status codes instead of redirects.
pub async fn require_auth(
    auth_session: AuthSession<domain::profile::Backend>,
    request: Request,
    next: Next,
) -> Response {
    match auth_session.user {
        Some(_user) => {
            // User is authenticated, continue to the handler
            next.run(request).await
        }
        None => {
            // User is not authenticated or session expired
            (StatusCode::UNAUTHORIZED, "Unauthorized").into_response()
        }
    }
}
