use serde::Deserialize;
use utoipa::ToSchema;

/// Body of `POST /solicitudes_abogado/:id/rechazar`.
#[derive(Debug, Deserialize, ToSchema)]
pub(crate) struct RejectParams {
    pub(crate) motivo_rechazo: String,
}
