//! SeaORM Entity for the asignaciones_casos table.
//! Links a caso to the lawyer responsible for it. At most one `activa`
//! assignment may exist per caso (partial unique index).

use crate::assignment_status::AssignmentStatus;
use crate::Id;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, ToSchema, Serialize, Deserialize)]
#[schema(as = domain::asignaciones_casos::Model)]
#[sea_orm(schema_name = "klamai", table_name = "asignaciones_casos")]
pub struct Model {
    #[serde(skip_deserializing)]
    #[sea_orm(primary_key)]
    #[schema(value_type = String, format = Uuid)]
    pub id: Id,

    #[schema(value_type = String, format = Uuid)]
    pub caso_id: Id,
    #[schema(value_type = String, format = Uuid)]
    pub abogado_id: Id,

    /// Staff actor that performed the assignment
    #[schema(value_type = Option<String>, format = Uuid)]
    pub asignado_por: Option<Id>,

    pub notas_asignacion: Option<String>,

    pub estado: AssignmentStatus,

    #[schema(value_type = String, format = DateTime)]
    pub fecha_asignacion: DateTimeWithTimeZone,

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
        belongs_to = "super::casos::Entity",
        from = "Column::CasoId",
        to = "super::casos::Column::Id",
        on_update = "NoAction",
        on_delete = "Cascade"
    )]
    Casos,
    #[sea_orm(
        belongs_to = "super::profiles::Entity",
        from = "Column::AbogadoId",
        to = "super::profiles::Column::Id",
        on_update = "NoAction",
        on_delete = "NoAction"
    )]
    Profiles,
}

impl Related<super::casos::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Casos.def()
    }
}

impl Related<super::profiles::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Profiles.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
