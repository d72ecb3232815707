use crate::error::Error;
use crate::Id;
use entity::notificaciones::Model;
use entity::profiles;
use entity_api::notificacion;
use sea_orm::DatabaseConnection;

/// A user's notifications, newest first. Recipients only ever see their own.
pub async fn find_for_actor(
    db: &DatabaseConnection,
    actor: &profiles::Model,
) -> Result<Vec<Model>, Error> {
    Ok(notificacion::find_by_usuario(db, actor.id).await?)
}

/// Marks one of the actor's notifications as read. A notification addressed
/// to someone else is denied, not surfaced.
pub async fn mark_leida(
    db: &DatabaseConnection,
    actor: &profiles::Model,
    notificacion_id: Id,
) -> Result<Model, Error> {
    let notificacion = notificacion::find_by_id(db, notificacion_id).await?;
    if notificacion.usuario_id != actor.id {
        return Err(Error::access_denied());
    }
    Ok(notificacion::mark_leida(db, notificacion).await?)
}

#[cfg(test)]
// We need to gate seaORM's mock feature behind conditional compilation because
// the feature removes the Clone trait implementation from seaORM's DatabaseConnection.
// see https://github.com/SeaQL/sea-orm/issues/830
#[cfg(feature = "mock")]
mod tests {
    use super::*;
    use crate::error::{DomainErrorKind, InternalErrorKind};
    use entity::roles::Role;
    use sea_orm::{DatabaseBackend, MockDatabase};

    fn actor() -> profiles::Model {
        let now = chrono::Utc::now();
        profiles::Model {
            id: Id::new_v4(),
            email: "marcos@example.com".to_string(),
            nombre: "Marcos".to_string(),
            apellido: "Ruiz".to_string(),
            password: "hash".to_string(),
            role: Role::Cliente,
            tipo_abogado: None,
            creditos_disponibles: 3,
            nombre_bufete: None,
            created_at: now.into(),
            updated_at: now.into(),
        }
    }

    #[tokio::test]
    async fn mark_leida_rejects_notifications_of_other_users() {
        let actor = actor();
        let now = chrono::Utc::now();
        let ajena = Model {
            id: Id::new_v4(),
            usuario_id: Id::new_v4(),
            mensaje: "No es tuya".to_string(),
            url_destino: None,
            leida: false,
            created_at: now.into(),
            updated_at: now.into(),
        };

        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results(vec![vec![ajena]])
            .into_connection();

        let result = mark_leida(&db, &actor, Id::new_v4()).await;

        assert_eq!(
            result.unwrap_err().error_kind,
            DomainErrorKind::Internal(InternalErrorKind::AccessDenied)
        );
    }
}
