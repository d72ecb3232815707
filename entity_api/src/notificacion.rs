use super::error::Error;
use entity::{
    notificaciones::{ActiveModel, Column, Entity, Model},
    Id,
};
use sea_orm::{entity::prelude::*, QueryOrder, Set, TryIntoModel};

pub async fn create(
    db: &impl ConnectionTrait,
    usuario_id: Id,
    mensaje: String,
    url_destino: Option<String>,
) -> Result<Model, Error> {
    let now = chrono::Utc::now();

    let notificacion_active_model = ActiveModel {
        usuario_id: Set(usuario_id),
        mensaje: Set(mensaje),
        url_destino: Set(url_destino),
        leida: Set(false),
        created_at: Set(now.into()),
        updated_at: Set(now.into()),
        ..Default::default()
    };

    Ok(notificacion_active_model.save(db).await?.try_into_model()?)
}

pub async fn find_by_usuario(db: &impl ConnectionTrait, usuario_id: Id) -> Result<Vec<Model>, Error> {
    Ok(Entity::find()
        .filter(Column::UsuarioId.eq(usuario_id))
        .order_by_desc(Column::CreatedAt)
        .all(db)
        .await?)
}

pub async fn mark_leida(db: &impl ConnectionTrait, notificacion: Model) -> Result<Model, Error> {
    let mut notificacion_active_model: ActiveModel = notificacion.into();
    notificacion_active_model.leida = Set(true);
    notificacion_active_model.updated_at = Set(chrono::Utc::now().into());
    Ok(notificacion_active_model.update(db).await?)
}

pub async fn find_by_id(db: &impl ConnectionTrait, id: Id) -> Result<Model, Error> {
    Entity::find_by_id(id)
        .one(db)
        .await?
        .ok_or_else(Error::not_found)
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
    async fn find_by_usuario_filters_and_orders_by_recency() -> Result<(), Error> {
        let db = MockDatabase::new(DatabaseBackend::Postgres).into_connection();

        let usuario_id = Id::new_v4();
        let _ = find_by_usuario(&db, usuario_id).await;

        assert_eq!(
            db.into_transaction_log(),
            [Transaction::from_sql_and_values(
                DatabaseBackend::Postgres,
                r#"SELECT "notificaciones"."id", "notificaciones"."usuario_id", "notificaciones"."mensaje", "notificaciones"."url_destino", "notificaciones"."leida", "notificaciones"."created_at", "notificaciones"."updated_at" FROM "klamai"."notificaciones" WHERE "notificaciones"."usuario_id" = $1 ORDER BY "notificaciones"."created_at" DESC"#,
                [usuario_id.into()]
            )]
        );

        Ok(())
    }

    #[tokio::test]
    async fn create_returns_an_unread_notificacion() -> Result<(), Error> {
        let now = chrono::Utc::now();
        let notificacion = Model {
            id: Id::new_v4(),
            usuario_id: Id::new_v4(),
            mensaje: "Tu caso ya está disponible para asignación".to_string(),
            url_destino: Some("/casos/123".to_string()),
            leida: false,
            created_at: now.into(),
            updated_at: now.into(),
        };

        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results(vec![vec![notificacion.clone()]])
            .into_connection();

        let created = create(
            &db,
            notificacion.usuario_id,
            notificacion.mensaje.clone(),
            notificacion.url_destino.clone(),
        )
        .await?;

        assert!(!created.leida);
        assert_eq!(created.mensaje, notificacion.mensaje);

        Ok(())
    }
}
