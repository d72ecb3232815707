//! SeaORM Entity for the solicitudes_abogado table.
//! Lawyer sign-up applications reviewed by super admins.

use crate::solicitud_status::SolicitudStatus;
use crate::Id;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, ToSchema, Serialize, Deserialize)]
#[schema(as = domain::solicitudes_abogado::Model)]
#[sea_orm(schema_name = "klamai", table_name = "solicitudes_abogado")]
pub struct Model {
    #[serde(skip_deserializing)]
    #[sea_orm(primary_key)]
    #[schema(value_type = String, format = Uuid)]
    pub id: Id,

    pub nombre: String,
    pub apellido: String,
    pub email: String,

    pub colegio_profesional: Option<String>,
    pub numero_colegiado: Option<String>,

    #[serde(default)]
    pub estado: SolicitudStatus,
    pub motivo_rechazo: Option<String>,

    /// Reviewing super admin
    #[schema(value_type = Option<String>, format = Uuid)]
    pub revisado_por: Option<Id>,

    #[schema(value_type = Option<String>, format = DateTime)]
    pub fecha_revision: Option<DateTimeWithTimeZone>,

    #[serde(skip_deserializing)]
    #[schema(value_type = String, format = DateTime)]
    pub created_at: DateTimeWithTimeZone,

    #[serde(skip_deserializing)]
    #[schema(value_type = String, format = DateTime)]
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::profiles::Entity",
        from = "Column::RevisadoPor",
        to = "super::profiles::Column::Id",
        on_update = "NoAction",
        on_delete = "NoAction"
    )]
    Profiles,
}

impl Related<super::profiles::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Profiles.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
