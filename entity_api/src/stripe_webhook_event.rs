use super::error::Error;
use entity::{
    stripe_webhook_events::{ActiveModel, Column, Entity, Model},
    Id,
};
use sea_orm::{entity::prelude::*, Set, TryIntoModel};

pub async fn find_by_event_id(
    db: &impl ConnectionTrait,
    stripe_event_id: &str,
) -> Result<Option<Model>, Error> {
    Ok(Entity::find()
        .filter(Column::StripeEventId.eq(stripe_event_id))
        .one(db)
        .await?)
}

/// Records an inbound event id before processing. The unique constraint on
/// `stripe_event_id` makes a concurrent duplicate delivery fail here rather
/// than after side effects have been written.
pub async fn record(
    db: &impl ConnectionTrait,
    stripe_event_id: String,
    event_type: String,
) -> Result<Model, Error> {
    let now = chrono::Utc::now();

    let event_active_model = ActiveModel {
        stripe_event_id: Set(stripe_event_id),
        event_type: Set(event_type),
        processed_at: Set(None),
        created_at: Set(now.into()),
        ..Default::default()
    };

    Ok(event_active_model.save(db).await?.try_into_model()?)
}

pub async fn mark_processed(db: &impl ConnectionTrait, event: Model) -> Result<Model, Error> {
    let mut event_active_model: ActiveModel = event.into();
    event_active_model.processed_at = Set(Some(chrono::Utc::now().into()));
    Ok(event_active_model.update(db).await?)
}

#[cfg(test)]
// We need to gate seaORM's mock feature behind conditional compilation because
// the feature removes the Clone trait implementation from seaORM's DatabaseConnection.
// see https://github.com/SeaQL/sea-orm/issues/830
#[cfg(feature = "mock")]
mod tests {
    use super::*;
    use sea_orm::{DatabaseBackend, MockDatabase, Transaction};

    #[tokio::test]
    async fn find_by_event_id_filters_on_the_external_id() -> Result<(), Error> {
        let db = MockDatabase::new(DatabaseBackend::Postgres).into_connection();

        let _ = find_by_event_id(&db, "evt_test_123").await;

        assert_eq!(
            db.into_transaction_log(),
            [Transaction::from_sql_and_values(
                DatabaseBackend::Postgres,
                r#"SELECT "stripe_webhook_events"."id", "stripe_webhook_events"."stripe_event_id", "stripe_webhook_events"."event_type", "stripe_webhook_events"."processed_at", "stripe_webhook_events"."created_at" FROM "klamai"."stripe_webhook_events" WHERE "stripe_webhook_events"."stripe_event_id" = $1 LIMIT $2"#,
                [
                    "evt_test_123".into(),
                    sea_orm::Value::BigUnsigned(Some(1))
                ]
            )]
        );

        Ok(())
    }

    #[tokio::test]
    async fn record_returns_the_seen_event() -> Result<(), Error> {
        let now = chrono::Utc::now();
        let event = Model {
            id: Id::new_v4(),
            stripe_event_id: "evt_test_123".to_string(),
            event_type: "checkout.session.completed".to_string(),
            processed_at: None,
            created_at: now.into(),
        };

        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results(vec![vec![event.clone()]])
            .into_connection();

        let recorded = record(
            &db,
            "evt_test_123".to_string(),
            "checkout.session.completed".to_string(),
        )
        .await?;

        assert_eq!(recorded.stripe_event_id, "evt_test_123");
        assert!(recorded.processed_at.is_none());

        Ok(())
    }
}
