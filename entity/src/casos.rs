//! SeaORM Entity for the casos table.
//! A caso is a client's legal matter record and its lifecycle state.

use crate::case_status::CaseStatus;
use crate::Id;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, ToSchema, Serialize, Deserialize)]
#[schema(as = domain::casos::Model)]
#[sea_orm(schema_name = "klamai", table_name = "casos")]
pub struct Model {
    #[serde(skip_deserializing)]
    #[sea_orm(primary_key)]
    #[schema(value_type = String, format = Uuid)]
    pub id: Id,

    /// Owning client profile. Null while the case is an anonymous draft.
    #[schema(value_type = Option<String>, format = Uuid)]
    pub cliente_id: Option<Id>,

    /// Requester details captured before a profile exists
    pub nombre_borrador: Option<String>,
    pub email_borrador: Option<String>,
    pub telefono_borrador: Option<String>,

    /// Specialty classification of the matter
    #[schema(value_type = Option<String>, format = Uuid)]
    pub especialidad_id: Option<Id>,

    /// Free-text consultation description
    pub motivo_consulta: String,

    /// Current lifecycle state
    #[serde(default)]
    pub estado: CaseStatus,

    /// Checkout session identifier the payment webhook matches against
    pub checkout_session_id: Option<String>,

    #[schema(value_type = Option<String>, format = DateTime)]
    pub fecha_cierre: Option<DateTimeWithTimeZone>,

    /// Profile that closed the case
    #[schema(value_type = Option<String>, format = Uuid)]
    pub cerrado_por: Option<Id>,

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
        from = "Column::ClienteId",
        to = "super::profiles::Column::Id",
        on_update = "NoAction",
        on_delete = "NoAction"
    )]
    Profiles,
    #[sea_orm(
        belongs_to = "super::especialidades::Entity",
        from = "Column::EspecialidadId",
        to = "super::especialidades::Column::Id",
        on_update = "NoAction",
        on_delete = "NoAction"
    )]
    Especialidades,
    #[sea_orm(has_many = "super::asignaciones_casos::Entity")]
    AsignacionesCasos,
    #[sea_orm(has_many = "super::pagos::Entity")]
    Pagos,
    #[sea_orm(has_many = "super::documentos_cliente::Entity")]
    DocumentosCliente,
    #[sea_orm(has_many = "super::documentos_abogado::Entity")]
    DocumentosAbogado,
}

impl Related<super::profiles::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Profiles.def()
    }
}

impl Related<super::especialidades::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Especialidades.def()
    }
}

impl Related<super::asignaciones_casos::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::AsignacionesCasos.def()
    }
}

impl Related<super::pagos::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Pagos.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
