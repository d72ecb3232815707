use super::error::{EntityApiErrorKind, Error};
use async_trait::async_trait;
use axum_login::{AuthnBackend, UserId};
use chrono::Utc;

use entity::profiles::{ActiveModel, Column, Entity, Model};
use entity::roles::{LawyerType, Role};
use entity::Id;
use log::*;
use password_auth;
use sea_orm::{entity::prelude::*, DatabaseConnection, Set};
use serde::Deserialize;
use std::sync::Arc;
use utoipa::{IntoParams, ToSchema};

pub async fn create(db: &impl ConnectionTrait, profile_model: Model) -> Result<Model, Error> {
    debug!("New Profile Model to be inserted: {:?}", profile_model.email);

    let now = Utc::now();
    let profile_active_model: ActiveModel = ActiveModel {
        email: Set(profile_model.email),
        nombre: Set(profile_model.nombre),
        apellido: Set(profile_model.apellido),
        password: Set(generate_hash(profile_model.password)),
        role: Set(profile_model.role),
        tipo_abogado: Set(profile_model.tipo_abogado),
        creditos_disponibles: Set(profile_model.creditos_disponibles),
        nombre_bufete: Set(profile_model.nombre_bufete),
        created_at: Set(now.into()),
        updated_at: Set(now.into()),
        ..Default::default()
    };

    Ok(profile_active_model.insert(db).await?)
}

pub async fn find_by_email(db: &impl ConnectionTrait, email: &str) -> Result<Option<Model>, Error> {
    Ok(Entity::find()
        .filter(Column::Email.eq(email))
        .one(db)
        .await?)
}

pub async fn find_by_id(db: &impl ConnectionTrait, id: Id) -> Result<Model, Error> {
    Entity::find_by_id(id)
        .one(db)
        .await?
        .ok_or_else(Error::not_found)
}

pub async fn find_abogados(db: &impl ConnectionTrait) -> Result<Vec<Model>, Error> {
    Ok(Entity::find()
        .filter(Column::Role.eq(Role::Abogado))
        .all(db)
        .await?)
}

pub async fn verify_password(password_to_verify: &str, password_hash: &str) -> Result<(), Error> {
    match password_auth::verify_password(password_to_verify, password_hash) {
        Ok(_) => Ok(()),
        Err(_) => Err(Error {
            source: None,
            error_kind: EntityApiErrorKind::RecordUnauthenticated,
        }),
    }
}

pub fn generate_hash(password: String) -> String {
    password_auth::generate_hash(password)
}

async fn authenticate_profile(creds: Credentials, profile: Model) -> Result<Option<Model>, Error> {
    match password_auth::verify_password(creds.password, &profile.password) {
        Ok(_) => Ok(Some(profile)),
        Err(_) => Err(Error {
            source: None,
            error_kind: EntityApiErrorKind::RecordUnauthenticated,
        }),
    }
}

/// Convenience constructor for lawyer profiles created from an approved
/// application.
pub fn new_abogado_model(
    email: String,
    nombre: String,
    apellido: String,
    password: String,
    nombre_bufete: Option<String>,
) -> Model {
    let now = Utc::now();
    Model {
        id: Id::new_v4(),
        email,
        nombre,
        apellido,
        password,
        role: Role::Abogado,
        tipo_abogado: Some(LawyerType::Regular),
        creditos_disponibles: 0,
        nombre_bufete,
        created_at: now.into(),
        updated_at: now.into(),
    }
}

#[derive(Debug, Clone)]
pub struct Backend {
    db: Arc<DatabaseConnection>,
}

#[derive(Debug, Clone, ToSchema, IntoParams, Deserialize)]
#[schema(as = domain::profile::Credentials)] // OpenAPI schema
pub struct Credentials {
    pub email: String,
    pub password: String,
    pub next: Option<String>,
}

impl Backend {
    pub fn new(db: &Arc<DatabaseConnection>) -> Self {
        Self {
            // Arc is cloned, but the source DatabaseConnection refers to the same instance
            // as the one passed in to new() (see the Arc documentation for more info)
            db: Arc::clone(db),
        }
    }
}

#[async_trait]
impl AuthnBackend for Backend {
    type User = Model;
    type Credentials = Credentials;
    type Error = Error;

    async fn authenticate(
        &self,
        creds: Self::Credentials,
    ) -> Result<Option<Self::User>, Self::Error> {
        match find_by_email(self.db.as_ref(), &creds.email).await? {
            Some(profile) => authenticate_profile(creds, profile).await,
            None => Err(Error {
                source: None,
                error_kind: EntityApiErrorKind::RecordUnauthenticated,
            }),
        }
    }

    async fn get_user(&self, user_id: &UserId<Self>) -> Result<Option<Self::User>, Self::Error> {
        Ok(Entity::find_by_id(*user_id).one(self.db.as_ref()).await?)
    }
}

pub type AuthSession = axum_login::AuthSession<Backend>;

#[cfg(test)]
// We need to gate seaORM's mock feature behind conditional compilation because
// the feature removes the Clone trait implementation from seaORM's DatabaseConnection.
// see https://github.com/SeaQL/sea-orm/issues/830
#[cfg(feature = "mock")]
mod tests {
    use super::*;
    use sea_orm::{DatabaseBackend, MockDatabase};

    fn profile_model(role: Role, tipo: Option<LawyerType>) -> Model {
        let now = Utc::now();
        Model {
            id: Id::new_v4(),
            email: "someone@example.com".to_string(),
            nombre: "Nombre".to_string(),
            apellido: "Apellido".to_string(),
            password: password_auth::generate_hash("password"),
            role,
            tipo_abogado: tipo,
            creditos_disponibles: 3,
            nombre_bufete: None,
            created_at: now.into(),
            updated_at: now.into(),
        }
    }

    #[tokio::test]
    async fn verify_password_rejects_wrong_password() {
        let hash = password_auth::generate_hash("right");
        assert!(verify_password("wrong", &hash).await.is_err());
        assert!(verify_password("right", &hash).await.is_ok());
    }

    #[tokio::test]
    async fn authenticate_fails_for_unknown_email() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results(vec![Vec::<Model>::new()])
                .into_connection(),
        );
        let backend = Backend::new(&db);

        let result = backend
            .authenticate(Credentials {
                email: "nobody@example.com".to_string(),
                password: "password".to_string(),
                next: None,
            })
            .await;

        assert_eq!(
            result.unwrap_err().error_kind,
            EntityApiErrorKind::RecordUnauthenticated
        );
    }

    #[tokio::test]
    async fn authenticate_returns_profile_on_matching_credentials() -> Result<(), Error> {
        let profile = profile_model(Role::Cliente, None);
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results(vec![vec![profile.clone()]])
                .into_connection(),
        );
        let backend = Backend::new(&db);

        let authenticated = backend
            .authenticate(Credentials {
                email: profile.email.clone(),
                password: "password".to_string(),
                next: None,
            })
            .await?;

        assert_eq!(authenticated.map(|p| p.id), Some(profile.id));

        Ok(())
    }

}
