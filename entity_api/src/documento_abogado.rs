use super::error::Error;
use entity::{
    documentos_abogado::{ActiveModel, Column, Entity, Model},
    Id,
};
use sea_orm::{entity::prelude::*, QueryOrder, Set, TryIntoModel};

pub async fn create(db: &impl ConnectionTrait, documento_model: Model) -> Result<Model, Error> {
    let now = chrono::Utc::now();

    let documento_active_model: ActiveModel = ActiveModel {
        caso_id: Set(documento_model.caso_id),
        abogado_id: Set(documento_model.abogado_id),
        tipo_documento: Set(documento_model.tipo_documento),
        nombre_archivo: Set(documento_model.nombre_archivo),
        ruta_archivo: Set(documento_model.ruta_archivo),
        tamano_archivo: Set(documento_model.tamano_archivo),
        descripcion: Set(documento_model.descripcion),
        created_at: Set(now.into()),
        updated_at: Set(now.into()),
        ..Default::default()
    };

    Ok(documento_active_model.save(db).await?.try_into_model()?)
}

pub async fn find_by_id(db: &impl ConnectionTrait, id: Id) -> Result<Model, Error> {
    Entity::find_by_id(id)
        .one(db)
        .await?
        .ok_or_else(Error::not_found)
}

pub async fn find_by_caso(db: &impl ConnectionTrait, caso_id: Id) -> Result<Vec<Model>, Error> {
    Ok(Entity::find()
        .filter(Column::CasoId.eq(caso_id))
        .order_by_desc(Column::CreatedAt)
        .all(db)
        .await?)
}

pub async fn delete(db: &impl ConnectionTrait, documento_id: Id) -> Result<(), Error> {
    Entity::delete_by_id(documento_id).exec(db).await?;
    Ok(())
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
    async fn delete_deletes_a_single_record() -> Result<(), Error> {
        let db = MockDatabase::new(DatabaseBackend::Postgres).into_connection();

        let documento_id = Id::new_v4();
        let _ = delete(&db, documento_id).await;

        assert_eq!(
            db.into_transaction_log(),
            [Transaction::from_sql_and_values(
                DatabaseBackend::Postgres,
                r#"DELETE FROM "klamai"."documentos_abogado" WHERE "documentos_abogado"."id" = $1"#,
                [documento_id.into()]
            )]
        );

        Ok(())
    }
}
