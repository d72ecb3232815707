use crate::controller::ApiResponse;
use crate::extractors::compare_api_version::CompareApiVersion;
use crate::{AppState, Error};
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use domain::{especialidad as EspecialidadApi, especialidades};
use service::config::ApiVersion;

/// GET the specialty catalog used to classify casos
#[utoipa::path(
    get,
    path = "/especialidades",
    params(ApiVersion),
    responses(
        (status = 200, description = "Specialty catalog", body = [especialidades::Model])
    )
)]
pub async fn index(
    CompareApiVersion(_v): CompareApiVersion,
    State(app_state): State<AppState>,
) -> Result<impl IntoResponse, Error> {
    let especialidades = EspecialidadApi::find_all(app_state.db_conn_ref()).await?;

    Ok(Json(ApiResponse::new(StatusCode::OK.into(), especialidades)))
}
