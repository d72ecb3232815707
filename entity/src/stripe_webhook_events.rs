//! SeaORM Entity for the stripe_webhook_events table.
//! Dedup ledger for inbound webhook deliveries: the provider-assigned event
//! id carries a uniqueness constraint so replays are detected before any
//! processing happens.

use crate::Id;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, ToSchema, Serialize, Deserialize)]
#[schema(as = domain::stripe_webhook_events::Model)]
#[sea_orm(schema_name = "klamai", table_name = "stripe_webhook_events")]
pub struct Model {
    #[serde(skip_deserializing)]
    #[sea_orm(primary_key)]
    #[schema(value_type = String, format = Uuid)]
    pub id: Id,

    /// Externally-assigned event identifier (unique)
    pub stripe_event_id: String,

    pub event_type: String,

    #[schema(value_type = Option<String>, format = DateTime)]
    pub processed_at: Option<DateTimeWithTimeZone>,

    #[serde(skip_deserializing)]
    #[schema(value_type = String, format = DateTime)]
    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
