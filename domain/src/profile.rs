use crate::{error::Error, profiles, Id};
use entity_api::{mutate, profile};
use sea_orm::DatabaseConnection;
use sea_orm::IntoActiveModel;

pub use entity_api::profile::{
    create, find_abogados, find_by_email, find_by_id, AuthSession, Backend, Credentials,
};

pub async fn update(
    db: &DatabaseConnection,
    profile_id: Id,
    params: impl mutate::IntoUpdateMap,
) -> Result<profiles::Model, Error> {
    let existing_profile = find_by_id(db, profile_id).await?;
    let active_model = existing_profile.into_active_model();
    Ok(mutate::update::<profiles::ActiveModel, profiles::Column>(
        db,
        active_model,
        params.into_update_map(),
    )
    .await?)
}
