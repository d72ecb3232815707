use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Primary role of a profile.
#[derive(
    Debug, Clone, Copy, Eq, PartialEq, EnumIter, Deserialize, Default, Serialize, DeriveActiveEnum, ToSchema,
)]
#[serde(rename_all = "snake_case")]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "role")]
pub enum Role {
    #[sea_orm(string_value = "cliente")]
    #[default]
    Cliente,
    #[sea_orm(string_value = "abogado")]
    Abogado,
}

impl std::fmt::Display for Role {
    fn fmt(&self, fmt: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Role::Cliente => write!(fmt, "cliente"),
            Role::Abogado => write!(fmt, "abogado"),
        }
    }
}

/// Sub-role for lawyer profiles. Super admins have unrestricted access to
/// every case; regular lawyers are scoped by their assignments.
#[derive(
    Debug, Clone, Copy, Eq, PartialEq, EnumIter, Deserialize, Default, Serialize, DeriveActiveEnum, ToSchema,
)]
#[serde(rename_all = "snake_case")]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "lawyer_type")]
pub enum LawyerType {
    #[sea_orm(string_value = "regular")]
    #[default]
    Regular,
    #[sea_orm(string_value = "super_admin")]
    SuperAdmin,
}

impl std::fmt::Display for LawyerType {
    fn fmt(&self, fmt: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LawyerType::Regular => write!(fmt, "regular"),
            LawyerType::SuperAdmin => write!(fmt, "super_admin"),
        }
    }
}
