use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// State of a case assignment.
#[derive(
    Debug, Clone, Copy, Eq, PartialEq, EnumIter, Deserialize, Default, Serialize, DeriveActiveEnum, ToSchema,
)]
#[serde(rename_all = "snake_case")]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "assignment_status")]
pub enum AssignmentStatus {
    /// The lawyer is currently responsible for the case
    #[sea_orm(string_value = "activa")]
    #[default]
    Activa,
    /// The lawyer closed the case; the link is kept for history and access
    #[sea_orm(string_value = "completada")]
    Completada,
}

impl std::fmt::Display for AssignmentStatus {
    fn fmt(&self, fmt: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AssignmentStatus::Activa => write!(fmt, "activa"),
            AssignmentStatus::Completada => write!(fmt, "completada"),
        }
    }
}
