use crate::access::{self, Operation};
use crate::casos::Model;
use crate::error::Error;
use crate::Id;
use entity::case_status::CaseStatus;
use entity::profiles;
use entity::roles::Role;
use entity_api::{auditoria, caso, casos, mutate, query, IntoQueryFilterMap};
use log::*;
use sea_orm::{DatabaseConnection, IntoActiveModel};

pub use entity_api::caso::{find_by_checkout_session_id, find_by_id};

/// Rejects lifecycle moves the state machine does not permit.
pub(crate) fn ensure_transition(from: CaseStatus, to: CaseStatus) -> Result<(), Error> {
    if from.can_transition_to(to) {
        Ok(())
    } else {
        warn!("Rejected caso transition {from} -> {to}");
        Err(Error::validation("transición de estado no permitida"))
    }
}

/// Creates a new caso in `borrador`. When the caller is authenticated the
/// caso is linked to their profile; anonymous intake keeps only the draft
/// requester fields.
pub async fn create_draft(
    db: &DatabaseConnection,
    actor: Option<&profiles::Model>,
    mut caso_model: Model,
) -> Result<Model, Error> {
    if caso_model.motivo_consulta.trim().is_empty() {
        return Err(Error::validation("motivo_consulta es obligatorio"));
    }
    if let Some(actor) = actor {
        caso_model.cliente_id = Some(actor.id);
    } else if caso_model.email_borrador.is_none() {
        return Err(Error::validation(
            "email_borrador es obligatorio para borradores anónimos",
        ));
    }

    let caso = caso::create(db, caso_model).await?;

    auditoria::record(
        db,
        actor.map(|a| a.id),
        "caso_creado",
        Some("casos"),
        Some(caso.id),
        None,
    )
    .await?;

    Ok(caso)
}

/// Lists casos scoped by the actor's role: super admins see everything,
/// regular lawyers see the marketplace plus their own assigned casos, and
/// clients see only their own. Drafts never reach a lawyer's listing.
pub async fn find_for_actor(
    db: &DatabaseConnection,
    actor: &profiles::Model,
) -> Result<Vec<Model>, Error> {
    if actor.is_super_admin() {
        return Ok(caso::find_all(db).await?);
    }

    match actor.role {
        Role::Abogado => {
            let mut casos = caso::find_disponibles(db).await?;
            let asignados = caso::find_by_abogado(db, actor.id).await?;
            for asignado in asignados {
                if !casos.iter().any(|c| c.id == asignado.id) {
                    casos.push(asignado);
                }
            }
            Ok(casos)
        }
        Role::Cliente => Ok(caso::find_by_cliente(db, actor.id).await?),
    }
}

pub async fn find_by(
    db: &DatabaseConnection,
    params: impl IntoQueryFilterMap,
) -> Result<Vec<Model>, Error> {
    let casos =
        query::find_by::<casos::Entity, casos::Column>(db, params.into_query_filter_map()).await?;

    Ok(casos)
}

/// Reads a caso through the access gate.
pub async fn read(
    db: &DatabaseConnection,
    actor: &profiles::Model,
    id: Id,
) -> Result<Model, Error> {
    let caso = caso::find_by_id(db, id).await?;
    access::ensure_access(db, actor, &caso, Operation::Read).await?;
    Ok(caso)
}

/// Applies a partial update. Closed casos reject every update; the access
/// gate runs before anything is written.
pub async fn update(
    db: &DatabaseConnection,
    actor: &profiles::Model,
    id: Id,
    params: impl mutate::IntoUpdateMap + std::fmt::Debug,
) -> Result<Model, Error> {
    debug!("Update Caso {id:?} with params: {params:?}");

    let existing_caso = caso::find_by_id(db, id).await?;
    access::ensure_access(db, actor, &existing_caso, Operation::Update).await?;
    caso::ensure_mutable(&existing_caso)?;

    let active_model = existing_caso.into_active_model();
    Ok(
        mutate::update::<casos::ActiveModel, casos::Column>(db, active_model, params.into_update_map())
            .await?,
    )
}

/// Parks a `disponible` caso as `agotado` once its consultation credits are
/// spent.
pub async fn mark_agotado(
    db: &DatabaseConnection,
    actor: &profiles::Model,
    id: Id,
) -> Result<Model, Error> {
    let caso = caso::find_by_id(db, id).await?;
    access::ensure_access(db, actor, &caso, Operation::Update).await?;
    ensure_transition(caso.estado, CaseStatus::Agotado)?;

    let updated = caso::update_estado(db, caso, CaseStatus::Agotado).await?;

    auditoria::record(
        db,
        Some(actor.id),
        "caso_agotado",
        Some("casos"),
        Some(updated.id),
        None,
    )
    .await?;

    Ok(updated)
}
