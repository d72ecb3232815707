use crate::controller::ApiResponse;
use crate::Error;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::{Form, Json};
use domain::profile::{AuthSession, Credentials};
use domain::profiles;
use log::*;

/// POST /login
///
/// Form-based session login. On success the session cookie is set via the
/// auth layer and the authenticated profile is returned.
#[utoipa::path(
    post,
    path = "/login",
    request_body = Credentials,
    responses(
        (status = 200, description = "Logged in", body = profiles::Model),
        (status = 401, description = "Invalid credentials")
    )
)]
pub async fn login(
    mut auth_session: AuthSession,
    Form(creds): Form<Credentials>,
) -> Result<impl IntoResponse, Error> {
    let user = match auth_session.authenticate(creds.clone()).await {
        Ok(Some(user)) => user,
        Ok(None) => {
            return Ok((StatusCode::UNAUTHORIZED, "UNAUTHORIZED").into_response());
        }
        Err(e) => {
            warn!("Authentication failed: {e:?}");
            return Ok((StatusCode::UNAUTHORIZED, "UNAUTHORIZED").into_response());
        }
    };

    if let Err(e) = auth_session.login(&user).await {
        error!("Failed to establish session: {e:?}");
        return Ok((StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL SERVER ERROR").into_response());
    }

    debug!("Session established for {:?}", user.id);

    Ok(Json(ApiResponse::new(StatusCode::OK.into(), user)).into_response())
}

/// DELETE /delete
///
/// Destroys the caller's session.
#[utoipa::path(
    delete,
    path = "/delete",
    responses(
        (status = 204, description = "Session destroyed"),
        (status = 401, description = "Unauthorized")
    ),
    security(
        ("cookie_auth" = [])
    )
)]
pub async fn delete(mut auth_session: AuthSession) -> Result<impl IntoResponse, Error> {
    match auth_session.logout().await {
        Ok(_) => Ok(StatusCode::NO_CONTENT.into_response()),
        Err(e) => {
            error!("Failed to destroy session: {e:?}");
            Ok((StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL SERVER ERROR").into_response())
        }
    }
}
