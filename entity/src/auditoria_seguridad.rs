use crate::Id;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, ToSchema, Serialize, Deserialize)]
#[schema(as = domain::auditoria_seguridad::Model)]
#[sea_orm(schema_name = "klamai", table_name = "auditoria_seguridad")]
pub struct Model {
    #[serde(skip_deserializing)]
    #[sea_orm(primary_key)]
    #[schema(value_type = String, format = Uuid)]
    pub id: Id,

    /// Acting profile; null for anonymous or system actions
    #[schema(value_type = Option<String>, format = Uuid)]
    pub usuario_id: Option<Id>,

    pub accion: String,
    pub tabla_afectada: Option<String>,
    #[schema(value_type = Option<String>, format = Uuid)]
    pub registro_id: Option<Id>,
    pub detalle: Option<String>,

    #[serde(skip_deserializing)]
    #[schema(value_type = String, format = DateTime)]
    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
