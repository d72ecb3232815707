use super::error::{EntityApiErrorKind, Error};
use entity::{
    asignaciones_casos,
    case_status::CaseStatus,
    casos::{ActiveModel, Column, Entity, Model, Relation},
    Id,
};
use log::debug;
use sea_orm::{entity::prelude::*, JoinType, QueryOrder, QuerySelect, Set, TryIntoModel};

pub async fn create(db: &impl ConnectionTrait, caso_model: Model) -> Result<Model, Error> {
    debug!("New Caso Model to be inserted: {caso_model:?}");

    let now = chrono::Utc::now();

    let caso_active_model: ActiveModel = ActiveModel {
        cliente_id: Set(caso_model.cliente_id),
        nombre_borrador: Set(caso_model.nombre_borrador),
        email_borrador: Set(caso_model.email_borrador),
        telefono_borrador: Set(caso_model.telefono_borrador),
        especialidad_id: Set(caso_model.especialidad_id),
        motivo_consulta: Set(caso_model.motivo_consulta),
        estado: Set(CaseStatus::Borrador),
        created_at: Set(now.into()),
        updated_at: Set(now.into()),
        ..Default::default()
    };

    Ok(caso_active_model.save(db).await?.try_into_model()?)
}

pub async fn find_by_id(db: &impl ConnectionTrait, id: Id) -> Result<Model, Error> {
    Entity::find_by_id(id)
        .one(db)
        .await?
        .ok_or_else(Error::not_found)
}

/// Looks up the caso a checkout-session identifier was stored on. This is the
/// webhook handler's only way to correlate a provider event with a caso.
pub async fn find_by_checkout_session_id(
    db: &impl ConnectionTrait,
    session_id: &str,
) -> Result<Option<Model>, Error> {
    Ok(Entity::find()
        .filter(Column::CheckoutSessionId.eq(session_id))
        .one(db)
        .await?)
}

/// Moves a caso to a new lifecycle state. Transition legality is the domain
/// layer's responsibility; this only persists the change.
pub async fn update_estado(
    db: &impl ConnectionTrait,
    caso: Model,
    estado: CaseStatus,
) -> Result<Model, Error> {
    let mut caso_active_model: ActiveModel = caso.into();
    caso_active_model.estado = Set(estado);
    caso_active_model.updated_at = Set(chrono::Utc::now().into());
    Ok(caso_active_model.update(db).await?)
}

/// Stores the provider checkout-session id and parks the caso in
/// `esperando_pago`.
pub async fn set_checkout_session(
    db: &impl ConnectionTrait,
    caso: Model,
    session_id: String,
) -> Result<Model, Error> {
    let mut caso_active_model: ActiveModel = caso.into();
    caso_active_model.checkout_session_id = Set(Some(session_id));
    caso_active_model.estado = Set(CaseStatus::EsperandoPago);
    caso_active_model.updated_at = Set(chrono::Utc::now().into());
    Ok(caso_active_model.update(db).await?)
}

/// Marks a caso closed, recording when and by whom.
pub async fn close(db: &impl ConnectionTrait, caso: Model, cerrado_por: Id) -> Result<Model, Error> {
    let now = chrono::Utc::now();
    let mut caso_active_model: ActiveModel = caso.into();
    caso_active_model.estado = Set(CaseStatus::Cerrado);
    caso_active_model.fecha_cierre = Set(Some(now.into()));
    caso_active_model.cerrado_por = Set(Some(cerrado_por));
    caso_active_model.updated_at = Set(now.into());
    Ok(caso_active_model.update(db).await?)
}

pub async fn find_by_cliente(db: &impl ConnectionTrait, cliente_id: Id) -> Result<Vec<Model>, Error> {
    Ok(Entity::find()
        .filter(Column::ClienteId.eq(cliente_id))
        .order_by_desc(Column::CreatedAt)
        .all(db)
        .await?)
}

/// Casos a lawyer may browse for pick-up: only `disponible`. Drafts and
/// payment-pending casos never appear here.
pub async fn find_disponibles(db: &impl ConnectionTrait) -> Result<Vec<Model>, Error> {
    Ok(Entity::find()
        .filter(Column::Estado.eq(CaseStatus::Disponible))
        .order_by_desc(Column::CreatedAt)
        .all(db)
        .await?)
}

/// Casos linked to a lawyer through an assignment row, active or completed.
pub async fn find_by_abogado(db: &impl ConnectionTrait, abogado_id: Id) -> Result<Vec<Model>, Error> {
    Ok(Entity::find()
        .join(JoinType::InnerJoin, Relation::AsignacionesCasos.def())
        .filter(asignaciones_casos::Column::AbogadoId.eq(abogado_id))
        .order_by_desc(Column::CreatedAt)
        .all(db)
        .await?)
}

pub async fn find_all(db: &impl ConnectionTrait) -> Result<Vec<Model>, Error> {
    Ok(Entity::find().order_by_desc(Column::CreatedAt).all(db).await?)
}

/// A caso must exist and not be in a terminal state before any mutation.
pub fn ensure_mutable(caso: &Model) -> Result<(), Error> {
    if caso.estado.is_terminal() {
        return Err(Error {
            source: None,
            error_kind: EntityApiErrorKind::ValidationError,
        });
    }
    Ok(())
}

#[cfg(test)]
// We need to gate seaORM's mock feature behind conditional compilation because
// the feature removes the Clone trait implementation from seaORM's DatabaseConnection.
// see https://github.com/SeaQL/sea-orm/issues/830
#[cfg(feature = "mock")]
mod tests {
    use super::*;
    use sea_orm::{DatabaseBackend, MockDatabase};

    fn caso_model(estado: CaseStatus) -> Model {
        let now = chrono::Utc::now();
        Model {
            id: Id::new_v4(),
            cliente_id: Some(Id::new_v4()),
            nombre_borrador: None,
            email_borrador: None,
            telefono_borrador: None,
            especialidad_id: None,
            motivo_consulta: "Despido improcedente".to_string(),
            estado,
            checkout_session_id: None,
            fecha_cierre: None,
            cerrado_por: None,
            created_at: now.into(),
            updated_at: now.into(),
        }
    }

    #[tokio::test]
    async fn create_returns_a_new_caso_model_in_borrador() -> Result<(), Error> {
        let caso = caso_model(CaseStatus::Borrador);

        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results(vec![vec![caso.clone()]])
            .into_connection();

        let created = create(&db, caso.clone()).await?;

        assert_eq!(created.id, caso.id);
        assert_eq!(created.estado, CaseStatus::Borrador);

        Ok(())
    }

    #[tokio::test]
    async fn find_by_id_returns_record_not_found_when_missing() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results(vec![Vec::<Model>::new()])
            .into_connection();

        let result = find_by_id(&db, Id::new_v4()).await;

        assert_eq!(
            result.unwrap_err().error_kind,
            EntityApiErrorKind::RecordNotFound
        );
    }

    #[tokio::test]
    async fn find_by_checkout_session_id_returns_matching_caso() -> Result<(), Error> {
        let mut caso = caso_model(CaseStatus::EsperandoPago);
        caso.checkout_session_id = Some("cs_test_123".to_string());

        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results(vec![vec![caso.clone()]])
            .into_connection();

        let found = find_by_checkout_session_id(&db, "cs_test_123").await?;

        assert_eq!(found, Some(caso));

        Ok(())
    }

    #[tokio::test]
    async fn close_sets_fecha_cierre_and_cerrado_por() -> Result<(), Error> {
        let caso = caso_model(CaseStatus::Asignado);
        let closer_id = Id::new_v4();

        let mut closed_model = caso.clone();
        closed_model.estado = CaseStatus::Cerrado;
        closed_model.fecha_cierre = Some(chrono::Utc::now().into());
        closed_model.cerrado_por = Some(closer_id);

        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results(vec![vec![closed_model.clone()]])
            .into_connection();

        let closed = close(&db, caso, closer_id).await?;

        assert_eq!(closed.estado, CaseStatus::Cerrado);
        assert!(closed.fecha_cierre.is_some());
        assert_eq!(closed.cerrado_por, Some(closer_id));

        Ok(())
    }

    #[tokio::test]
    async fn ensure_mutable_rejects_cerrado() {
        let caso = caso_model(CaseStatus::Cerrado);
        let result = ensure_mutable(&caso);
        assert_eq!(
            result.unwrap_err().error_kind,
            EntityApiErrorKind::ValidationError
        );
    }

    #[tokio::test]
    async fn ensure_mutable_accepts_non_terminal_states() {
        for estado in [
            CaseStatus::Borrador,
            CaseStatus::EsperandoPago,
            CaseStatus::Disponible,
            CaseStatus::Asignado,
            CaseStatus::Agotado,
        ] {
            assert!(ensure_mutable(&caso_model(estado)).is_ok());
        }
    }
}
