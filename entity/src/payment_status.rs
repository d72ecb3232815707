use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Provider-reported state of a payment.
#[derive(
    Debug, Clone, Copy, Eq, PartialEq, EnumIter, Deserialize, Default, Serialize, DeriveActiveEnum, ToSchema,
)]
#[serde(rename_all = "snake_case")]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "payment_status")]
pub enum PaymentStatus {
    #[sea_orm(string_value = "procesando")]
    #[default]
    Procesando,
    #[sea_orm(string_value = "exitoso")]
    Exitoso,
    #[sea_orm(string_value = "fallido")]
    Fallido,
}

impl std::fmt::Display for PaymentStatus {
    fn fmt(&self, fmt: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PaymentStatus::Procesando => write!(fmt, "procesando"),
            PaymentStatus::Exitoso => write!(fmt, "exitoso"),
            PaymentStatus::Fallido => write!(fmt, "fallido"),
        }
    }
}
