use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Review state of a lawyer sign-up application.
#[derive(
    Debug, Clone, Copy, Eq, PartialEq, EnumIter, Deserialize, Default, Serialize, DeriveActiveEnum, ToSchema,
)]
#[serde(rename_all = "snake_case")]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "solicitud_status")]
pub enum SolicitudStatus {
    #[sea_orm(string_value = "pendiente")]
    #[default]
    Pendiente,
    #[sea_orm(string_value = "aprobada")]
    Aprobada,
    #[sea_orm(string_value = "rechazada")]
    Rechazada,
}

impl std::fmt::Display for SolicitudStatus {
    fn fmt(&self, fmt: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SolicitudStatus::Pendiente => write!(fmt, "pendiente"),
            SolicitudStatus::Aprobada => write!(fmt, "aprobada"),
            SolicitudStatus::Rechazada => write!(fmt, "rechazada"),
        }
    }
}
