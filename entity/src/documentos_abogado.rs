//! SeaORM Entity for the documentos_abogado table.
//! Lawyer-provided documents attached to a caso; see documentos_cliente for
//! the client-side counterpart.

use crate::Id;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, ToSchema, Serialize, Deserialize)]
#[schema(as = domain::documentos_abogado::Model)]
#[sea_orm(schema_name = "klamai", table_name = "documentos_abogado")]
pub struct Model {
    #[serde(skip_deserializing)]
    #[sea_orm(primary_key)]
    #[schema(value_type = String, format = Uuid)]
    pub id: Id,

    #[schema(value_type = String, format = Uuid)]
    pub caso_id: Id,
    #[schema(value_type = String, format = Uuid)]
    pub abogado_id: Id,

    pub tipo_documento: String,
    pub nombre_archivo: String,

    /// Path inside the blob store; never exposed directly to clients
    #[serde(skip_serializing)]
    pub ruta_archivo: String,

    pub tamano_archivo: i64,
    pub descripcion: Option<String>,

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
