use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Delivery state of an outbox email row.
#[derive(
    Debug, Clone, Copy, Eq, PartialEq, EnumIter, Deserialize, Default, Serialize, DeriveActiveEnum, ToSchema,
)]
#[serde(rename_all = "snake_case")]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "outbox_status")]
pub enum OutboxStatus {
    #[sea_orm(string_value = "pendiente")]
    #[default]
    Pendiente,
    #[sea_orm(string_value = "enviado")]
    Enviado,
    #[sea_orm(string_value = "fallido")]
    Fallido,
}

impl std::fmt::Display for OutboxStatus {
    fn fmt(&self, fmt: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OutboxStatus::Pendiente => write!(fmt, "pendiente"),
            OutboxStatus::Enviado => write!(fmt, "enviado"),
            OutboxStatus::Fallido => write!(fmt, "fallido"),
        }
    }
}
