use super::error::Error;
use entity::{
    especialidades::{Column, Entity, Model},
    Id,
};
use sea_orm::{entity::prelude::*, QueryOrder};

pub async fn find_all(db: &impl ConnectionTrait) -> Result<Vec<Model>, Error> {
    Ok(Entity::find().order_by_asc(Column::Nombre).all(db).await?)
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
    async fn find_all_orders_by_nombre() -> Result<(), Error> {
        let db = MockDatabase::new(DatabaseBackend::Postgres).into_connection();

        let _ = find_all(&db).await;

        assert_eq!(
            db.into_transaction_log(),
            [Transaction::from_sql_and_values(
                DatabaseBackend::Postgres,
                r#"SELECT "especialidades"."id", "especialidades"."nombre", "especialidades"."created_at" FROM "klamai"."especialidades" ORDER BY "especialidades"."nombre" ASC"#,
                Vec::<sea_orm::Value>::new()
            )]
        );

        Ok(())
    }
}
