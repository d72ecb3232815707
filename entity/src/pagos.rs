//! SeaORM Entity for the pagos table.
//! A row is created by the webhook handler when the payment provider
//! confirms a checkout session.

use crate::payment_status::PaymentStatus;
use crate::Id;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, ToSchema, Serialize, Deserialize)]
#[schema(as = domain::pagos::Model)]
#[sea_orm(schema_name = "klamai", table_name = "pagos")]
pub struct Model {
    #[serde(skip_deserializing)]
    #[sea_orm(primary_key)]
    #[schema(value_type = String, format = Uuid)]
    pub id: Id,

    #[schema(value_type = String, format = Uuid)]
    pub caso_id: Id,

    /// Paying profile; null for anonymous draft checkouts
    #[schema(value_type = Option<String>, format = Uuid)]
    pub usuario_id: Option<Id>,

    /// Amount in the currency's minor units
    pub monto_centavos: i64,

    /// ISO 4217 currency code
    pub moneda: String,

    pub stripe_session_id: String,
    pub stripe_payment_intent_id: Option<String>,

    pub estado: PaymentStatus,

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
        on_delete = "NoAction"
    )]
    Casos,
    #[sea_orm(
        belongs_to = "super::profiles::Entity",
        from = "Column::UsuarioId",
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
