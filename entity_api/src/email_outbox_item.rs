use super::error::Error;
use entity::{
    email_outbox::{ActiveModel, Column, Entity, Model},
    outbox_status::OutboxStatus,
};
use sea_orm::{entity::prelude::*, QueryOrder, QuerySelect, Set, TryIntoModel};

/// Enqueues an email for the outbox worker. Written in the same transaction
/// as the state change that triggers the email wherever one exists.
pub async fn enqueue(
    db: &impl ConnectionTrait,
    destinatario: String,
    asunto: String,
    plantilla: String,
    datos: String,
) -> Result<Model, Error> {
    let now = chrono::Utc::now();

    let outbox_active_model = ActiveModel {
        destinatario: Set(destinatario),
        asunto: Set(asunto),
        plantilla: Set(plantilla),
        datos: Set(datos),
        estado: Set(OutboxStatus::Pendiente),
        intentos: Set(0),
        created_at: Set(now.into()),
        updated_at: Set(now.into()),
        ..Default::default()
    };

    Ok(outbox_active_model.save(db).await?.try_into_model()?)
}

/// Oldest-first batch of rows still awaiting delivery.
pub async fn find_pendientes(db: &impl ConnectionTrait, limit: u64) -> Result<Vec<Model>, Error> {
    Ok(Entity::find()
        .filter(Column::Estado.eq(OutboxStatus::Pendiente))
        .order_by_asc(Column::CreatedAt)
        .limit(limit)
        .all(db)
        .await?)
}

pub async fn mark_enviado(db: &impl ConnectionTrait, item: Model) -> Result<Model, Error> {
    let now = chrono::Utc::now();
    let intentos = item.intentos + 1;
    let mut outbox_active_model: ActiveModel = item.into();
    outbox_active_model.estado = Set(OutboxStatus::Enviado);
    outbox_active_model.intentos = Set(intentos);
    outbox_active_model.enviado_at = Set(Some(now.into()));
    outbox_active_model.updated_at = Set(now.into());
    Ok(outbox_active_model.update(db).await?)
}

/// Failed attempts stay `pendiente` until `max_intentos` is reached, then the
/// row is parked as `fallido` for operator attention.
pub async fn mark_intento_fallido(
    db: &impl ConnectionTrait,
    item: Model,
    error: String,
    max_intentos: i32,
) -> Result<Model, Error> {
    let intentos = item.intentos + 1;
    let estado = if intentos >= max_intentos {
        OutboxStatus::Fallido
    } else {
        OutboxStatus::Pendiente
    };
    let mut outbox_active_model: ActiveModel = item.into();
    outbox_active_model.estado = Set(estado);
    outbox_active_model.intentos = Set(intentos);
    outbox_active_model.ultimo_error = Set(Some(error));
    outbox_active_model.updated_at = Set(chrono::Utc::now().into());
    Ok(outbox_active_model.update(db).await?)
}

#[cfg(test)]
// We need to gate seaORM's mock feature behind conditional compilation because
// the feature removes the Clone trait implementation from seaORM's DatabaseConnection.
// see https://github.com/SeaQL/sea-orm/issues/830
#[cfg(feature = "mock")]
mod tests {
    use super::*;
    use entity::Id;
    use sea_orm::{DatabaseBackend, MockDatabase};

    fn outbox_model(estado: OutboxStatus, intentos: i32) -> Model {
        let now = chrono::Utc::now();
        Model {
            id: Id::new_v4(),
            destinatario: "lucia@example.com".to_string(),
            asunto: "Bienvenida a KlamAI".to_string(),
            plantilla: "bienvenida".to_string(),
            datos: r#"{"nombre":"Lucía"}"#.to_string(),
            estado,
            intentos,
            ultimo_error: None,
            enviado_at: None,
            created_at: now.into(),
            updated_at: now.into(),
        }
    }

    #[tokio::test]
    async fn mark_intento_fallido_keeps_row_pendiente_below_cap() -> Result<(), Error> {
        let item = outbox_model(OutboxStatus::Pendiente, 0);

        let mut failed_once = item.clone();
        failed_once.intentos = 1;
        failed_once.ultimo_error = Some("timeout".to_string());

        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results(vec![vec![failed_once]])
            .into_connection();

        let updated = mark_intento_fallido(&db, item, "timeout".to_string(), 5).await?;

        assert_eq!(updated.estado, OutboxStatus::Pendiente);
        assert_eq!(updated.intentos, 1);

        Ok(())
    }

    #[tokio::test]
    async fn mark_intento_fallido_parks_row_at_attempt_cap() -> Result<(), Error> {
        let item = outbox_model(OutboxStatus::Pendiente, 4);

        let mut parked = item.clone();
        parked.estado = OutboxStatus::Fallido;
        parked.intentos = 5;

        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results(vec![vec![parked]])
            .into_connection();

        let updated = mark_intento_fallido(&db, item, "timeout".to_string(), 5).await?;

        assert_eq!(updated.estado, OutboxStatus::Fallido);

        Ok(())
    }
}
