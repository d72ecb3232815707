use crate::error::Error;
use entity::especialidades::Model;
use sea_orm::DatabaseConnection;

pub use entity_api::especialidad::find_by_id;

pub async fn find_all(db: &DatabaseConnection) -> Result<Vec<Model>, Error> {
    Ok(entity_api::especialidad::find_all(db).await?)
}
