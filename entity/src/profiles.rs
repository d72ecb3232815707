use crate::roles::{LawyerType, Role};
use crate::Id;
use axum_login::AuthUser;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, ToSchema, Serialize, Deserialize)]
#[schema(as = domain::profiles::Model)]
#[sea_orm(schema_name = "klamai", table_name = "profiles")]
pub struct Model {
    #[serde(skip_deserializing)]
    #[sea_orm(primary_key)]
    #[schema(value_type = String, format = Uuid)]
    pub id: Id,

    pub email: String,
    pub nombre: String,
    pub apellido: String,

    #[serde(skip_serializing)]
    pub password: String,

    pub role: Role,

    /// Only set for lawyer profiles
    pub tipo_abogado: Option<LawyerType>,

    /// Consultation credits remaining for client profiles
    pub creditos_disponibles: i32,

    /// Firm name for lawyer profiles
    pub nombre_bufete: Option<String>,

    #[serde(skip_deserializing)]
    #[schema(value_type = String, format = DateTime)]
    pub created_at: DateTimeWithTimeZone,

    #[serde(skip_deserializing)]
    #[schema(value_type = String, format = DateTime)]
    pub updated_at: DateTimeWithTimeZone,
}

impl Model {
    /// Whether this profile is a lawyer with unrestricted platform access.
    pub fn is_super_admin(&self) -> bool {
        self.role == Role::Abogado && self.tipo_abogado == Some(LawyerType::SuperAdmin)
    }

    /// Whether this profile is a lawyer scoped by assignments.
    pub fn is_regular_lawyer(&self) -> bool {
        self.role == Role::Abogado && self.tipo_abogado != Some(LawyerType::SuperAdmin)
    }
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::casos::Entity")]
    Casos,
    #[sea_orm(has_many = "super::asignaciones_casos::Entity")]
    AsignacionesCasos,
    #[sea_orm(has_many = "super::notificaciones::Entity")]
    Notificaciones,
}

impl Related<super::casos::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Casos.def()
    }
}

impl Related<super::asignaciones_casos::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::AsignacionesCasos.def()
    }
}

impl Related<super::notificaciones::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Notificaciones.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl AuthUser for Model {
    type Id = Id;

    fn id(&self) -> Self::Id {
        self.id
    }

    fn session_auth_hash(&self) -> &[u8] {
        self.password.as_bytes()
    }
}
