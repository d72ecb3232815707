use super::error::Error;
use entity::{
    pagos::{ActiveModel, Column, Entity, Model},
    payment_status::PaymentStatus,
    Id,
};
use log::debug;
use sea_orm::{entity::prelude::*, QueryOrder, Set, TryIntoModel};

/// Records a confirmed payment against a caso. Only the webhook handler
/// creates these rows.
pub async fn create(db: &impl ConnectionTrait, pago_model: Model) -> Result<Model, Error> {
    debug!(
        "New Pago to be inserted for caso {:?} (session {:?})",
        pago_model.caso_id, pago_model.stripe_session_id
    );

    let now = chrono::Utc::now();

    let pago_active_model: ActiveModel = ActiveModel {
        caso_id: Set(pago_model.caso_id),
        usuario_id: Set(pago_model.usuario_id),
        monto_centavos: Set(pago_model.monto_centavos),
        moneda: Set(pago_model.moneda),
        stripe_session_id: Set(pago_model.stripe_session_id),
        stripe_payment_intent_id: Set(pago_model.stripe_payment_intent_id),
        estado: Set(PaymentStatus::Exitoso),
        created_at: Set(now.into()),
        updated_at: Set(now.into()),
        ..Default::default()
    };

    Ok(pago_active_model.save(db).await?.try_into_model()?)
}

pub async fn find_by_caso(db: &impl ConnectionTrait, caso_id: Id) -> Result<Vec<Model>, Error> {
    Ok(Entity::find()
        .filter(Column::CasoId.eq(caso_id))
        .order_by_desc(Column::CreatedAt)
        .all(db)
        .await?)
}

#[cfg(test)]
// We need to gate seaORM's mock feature behind conditional compilation because
// the feature removes the Clone trait implementation from seaORM's DatabaseConnection.
// see https://github.com/SeaQL/sea-orm/issues/830
#[cfg(feature = "mock")]
mod tests {
    use super::*;
    use sea_orm::{DatabaseBackend, MockDatabase};

    #[tokio::test]
    async fn create_returns_an_exitoso_pago() -> Result<(), Error> {
        let now = chrono::Utc::now();
        let pago = Model {
            id: Id::new_v4(),
            caso_id: Id::new_v4(),
            usuario_id: Some(Id::new_v4()),
            monto_centavos: 4995,
            moneda: "eur".to_string(),
            stripe_session_id: "cs_test_123".to_string(),
            stripe_payment_intent_id: Some("pi_test_456".to_string()),
            estado: PaymentStatus::Exitoso,
            created_at: now.into(),
            updated_at: now.into(),
        };

        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results(vec![vec![pago.clone()]])
            .into_connection();

        let created = create(&db, pago.clone()).await?;

        assert_eq!(created.estado, PaymentStatus::Exitoso);
        assert_eq!(created.monto_centavos, 4995);
        assert_eq!(created.stripe_session_id, "cs_test_123");

        Ok(())
    }
}
