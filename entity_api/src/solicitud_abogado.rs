use super::error::Error;
use entity::{
    solicitud_status::SolicitudStatus,
    solicitudes_abogado::{ActiveModel, Column, Entity, Model},
    Id,
};
use sea_orm::{entity::prelude::*, QueryOrder, Set, TryIntoModel};

pub async fn create(db: &impl ConnectionTrait, solicitud_model: Model) -> Result<Model, Error> {
    let now = chrono::Utc::now();

    let solicitud_active_model: ActiveModel = ActiveModel {
        nombre: Set(solicitud_model.nombre),
        apellido: Set(solicitud_model.apellido),
        email: Set(solicitud_model.email),
        colegio_profesional: Set(solicitud_model.colegio_profesional),
        numero_colegiado: Set(solicitud_model.numero_colegiado),
        estado: Set(SolicitudStatus::Pendiente),
        created_at: Set(now.into()),
        updated_at: Set(now.into()),
        ..Default::default()
    };

    Ok(solicitud_active_model.save(db).await?.try_into_model()?)
}

pub async fn find_by_id(db: &impl ConnectionTrait, id: Id) -> Result<Model, Error> {
    Entity::find_by_id(id)
        .one(db)
        .await?
        .ok_or_else(Error::not_found)
}

pub async fn find_pendientes(db: &impl ConnectionTrait) -> Result<Vec<Model>, Error> {
    Ok(Entity::find()
        .filter(Column::Estado.eq(SolicitudStatus::Pendiente))
        .order_by_asc(Column::CreatedAt)
        .all(db)
        .await?)
}

/// Records the review outcome: who reviewed, when, and (on rejection) why.
pub async fn review(
    db: &impl ConnectionTrait,
    solicitud: Model,
    estado: SolicitudStatus,
    revisado_por: Id,
    motivo_rechazo: Option<String>,
) -> Result<Model, Error> {
    let now = chrono::Utc::now();
    let mut solicitud_active_model: ActiveModel = solicitud.into();
    solicitud_active_model.estado = Set(estado);
    solicitud_active_model.revisado_por = Set(Some(revisado_por));
    solicitud_active_model.fecha_revision = Set(Some(now.into()));
    solicitud_active_model.motivo_rechazo = Set(motivo_rechazo);
    solicitud_active_model.updated_at = Set(now.into());
    Ok(solicitud_active_model.update(db).await?)
}

#[cfg(test)]
// We need to gate seaORM's mock feature behind conditional compilation because
// the feature removes the Clone trait implementation from seaORM's DatabaseConnection.
// see https://github.com/SeaQL/sea-orm/issues/830
#[cfg(feature = "mock")]
mod tests {
    use super::*;
    use sea_orm::{DatabaseBackend, MockDatabase};

    fn solicitud_model(estado: SolicitudStatus) -> Model {
        let now = chrono::Utc::now();
        Model {
            id: Id::new_v4(),
            nombre: "Lucía".to_string(),
            apellido: "Fernández".to_string(),
            email: "lucia@example.com".to_string(),
            colegio_profesional: Some("ICAM".to_string()),
            numero_colegiado: Some("12345".to_string()),
            estado,
            motivo_rechazo: None,
            revisado_por: None,
            fecha_revision: None,
            created_at: now.into(),
            updated_at: now.into(),
        }
    }

    #[tokio::test]
    async fn create_returns_a_pendiente_solicitud() -> Result<(), Error> {
        let solicitud = solicitud_model(SolicitudStatus::Pendiente);

        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results(vec![vec![solicitud.clone()]])
            .into_connection();

        let created = create(&db, solicitud).await?;

        assert_eq!(created.estado, SolicitudStatus::Pendiente);

        Ok(())
    }

    #[tokio::test]
    async fn review_records_reviewer_and_rejection_reason() -> Result<(), Error> {
        let solicitud = solicitud_model(SolicitudStatus::Pendiente);
        let reviewer_id = Id::new_v4();

        let mut reviewed_model = solicitud.clone();
        reviewed_model.estado = SolicitudStatus::Rechazada;
        reviewed_model.revisado_por = Some(reviewer_id);
        reviewed_model.fecha_revision = Some(chrono::Utc::now().into());
        reviewed_model.motivo_rechazo = Some("Colegiación no verificable".to_string());

        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results(vec![vec![reviewed_model]])
            .into_connection();

        let reviewed = review(
            &db,
            solicitud,
            SolicitudStatus::Rechazada,
            reviewer_id,
            Some("Colegiación no verificable".to_string()),
        )
        .await?;

        assert_eq!(reviewed.estado, SolicitudStatus::Rechazada);
        assert_eq!(reviewed.revisado_por, Some(reviewer_id));
        assert!(reviewed.fecha_revision.is_some());

        Ok(())
    }
}
