//! Assignment and closure of casos.
//!
//! Both operations mutate several tables (caso state, assignment row,
//! notification, audit trail) and therefore run inside a single database
//! transaction: either every write lands or none does.

use crate::access::{self, Operation};
use crate::caso::ensure_transition;
use crate::error::Error;
use crate::{emails, Id};
use entity::asignaciones_casos::Model;
use entity::case_status::CaseStatus;
use entity::profiles;
use entity::roles::Role;
use entity_api::{asignacion, auditoria, caso, notificacion, profile};
use log::*;
use sea_orm::{DatabaseConnection, TransactionTrait};
use service::config::Config;

pub use entity_api::asignacion::{find_active_by_caso, find_by_abogado, find_by_caso_and_abogado};

/// Assigns a caso to a lawyer.
///
/// Preconditions: the actor passes the gate for `Assign` (staff only), the
/// target profile is a lawyer, and the caso is `disponible` (or already
/// `asignado`, for reassignment). Effects, atomically: the assignment row is
/// upserted as `activa`, any previous active assignment to another lawyer is
/// completed, the caso moves to `asignado`, the lawyer is notified, and an
/// assignment email is queued.
pub async fn assign(
    db: &DatabaseConnection,
    config: &Config,
    actor: &profiles::Model,
    caso_id: Id,
    abogado_id: Id,
    notas_asignacion: Option<String>,
) -> Result<Model, Error> {
    let txn = db.begin().await.map_err(Error::db_transaction)?;

    let caso = caso::find_by_id(&txn, caso_id).await?;
    access::ensure_access(&txn, actor, &caso, Operation::Assign).await?;
    caso::ensure_mutable(&caso)?;

    let abogado = profile::find_by_id(&txn, abogado_id).await?;
    if abogado.role != Role::Abogado {
        return Err(Error::validation("el perfil destino no es un abogado"));
    }

    if caso.estado != CaseStatus::Asignado {
        ensure_transition(caso.estado, CaseStatus::Asignado)?;
    }

    // Reassignment: retire the previous lawyer's active link first so the
    // one-active-assignment-per-caso constraint holds.
    if let Some(previous) = asignacion::find_active_by_caso(&txn, caso.id).await? {
        if previous.abogado_id != abogado_id {
            asignacion::complete(&txn, previous).await?;
        }
    }

    let asignacion =
        asignacion::upsert(&txn, caso.id, abogado_id, actor.id, notas_asignacion).await?;

    if caso.estado != CaseStatus::Asignado {
        caso::update_estado(&txn, caso.clone(), CaseStatus::Asignado).await?;
    }

    notificacion::create(
        &txn,
        abogado_id,
        "Se te ha asignado un nuevo caso".to_string(),
        Some(format!("/abogados/casos/{}", caso.id)),
    )
    .await?;

    emails::enqueue_caso_asignado(&txn, config, &abogado, &caso).await?;

    auditoria::record(
        &txn,
        Some(actor.id),
        "caso_asignado",
        Some("asignaciones_casos"),
        Some(asignacion.id),
        Some(format!("abogado {abogado_id}")),
    )
    .await?;

    txn.commit().await.map_err(Error::db_transaction)?;

    info!("Caso {caso_id:?} asignado a abogado {abogado_id:?}");

    Ok(asignacion)
}

/// Closes a caso.
///
/// Only the assigned lawyer or a super admin passes the gate. Atomically:
/// the caso is marked `cerrado` with closure timestamp and closer identity,
/// a regular lawyer's own assignment flips to `completada`, the client is
/// notified, and an audit row is written.
pub async fn close(
    db: &DatabaseConnection,
    actor: &profiles::Model,
    caso_id: Id,
) -> Result<entity::casos::Model, Error> {
    let txn = db.begin().await.map_err(Error::db_transaction)?;

    let caso = caso::find_by_id(&txn, caso_id).await?;
    access::ensure_access(&txn, actor, &caso, Operation::Close).await?;
    ensure_transition(caso.estado, CaseStatus::Cerrado)?;

    let closed = caso::close(&txn, caso, actor.id).await?;

    if actor.is_regular_lawyer() {
        if let Some(own) = asignacion::find_by_caso_and_abogado(&txn, closed.id, actor.id).await? {
            asignacion::complete(&txn, own).await?;
        }
    }

    if let Some(cliente_id) = closed.cliente_id {
        notificacion::create(
            &txn,
            cliente_id,
            "Tu caso ha sido cerrado".to_string(),
            Some(format!("/casos/{}", closed.id)),
        )
        .await?;
    }

    auditoria::record(
        &txn,
        Some(actor.id),
        "caso_cerrado",
        Some("casos"),
        Some(closed.id),
        None,
    )
    .await?;

    txn.commit().await.map_err(Error::db_transaction)?;

    info!("Caso {caso_id:?} cerrado por {:?}", actor.id);

    Ok(closed)
}
