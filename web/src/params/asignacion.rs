use domain::Id;
use serde::Deserialize;
use utoipa::ToSchema;

/// Body of `POST /casos/:id/asignar`.
#[derive(Debug, Deserialize, ToSchema)]
pub(crate) struct AssignParams {
    pub(crate) abogado_id: Id,
    pub(crate) notas_asignacion: Option<String>,
}
