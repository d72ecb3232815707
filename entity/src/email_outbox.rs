//! SeaORM Entity for the email_outbox table.
//! Durable queue of outbound transactional emails. Rows are written in the
//! same transaction as the state change that triggers them and drained by a
//! background worker, giving at-least-once delivery.

use crate::outbox_status::OutboxStatus;
use crate::Id;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, ToSchema, Serialize, Deserialize)]
#[schema(as = domain::email_outbox::Model)]
#[sea_orm(schema_name = "klamai", table_name = "email_outbox")]
pub struct Model {
    #[serde(skip_deserializing)]
    #[sea_orm(primary_key)]
    #[schema(value_type = String, format = Uuid)]
    pub id: Id,

    pub destinatario: String,
    pub asunto: String,

    /// Template kind the worker renders (welcome, aprobacion, ...)
    pub plantilla: String,

    /// JSON-encoded personalization payload
    pub datos: String,

    pub estado: OutboxStatus,
    pub intentos: i32,
    pub ultimo_error: Option<String>,

    #[schema(value_type = Option<String>, format = DateTime)]
    pub enviado_at: Option<DateTimeWithTimeZone>,

    #[serde(skip_deserializing)]
    #[schema(value_type = String, format = DateTime)]
    pub created_at: DateTimeWithTimeZone,

    #[serde(skip_deserializing)]
    #[schema(value_type = String, format = DateTime)]
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
