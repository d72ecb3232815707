//! Lawyer sign-up applications and their review by super admins.

use crate::access;
use crate::error::Error;
use crate::{emails, Id};
use entity::solicitud_status::SolicitudStatus;
use entity::solicitudes_abogado::Model;
use entity::profiles;
use entity_api::{auditoria, profile, solicitud_abogado};
use log::*;
use rand::distributions::Alphanumeric;
use rand::Rng;
use sea_orm::{DatabaseConnection, TransactionTrait};
use service::config::Config;

pub use entity_api::solicitud_abogado::{find_by_id, find_pendientes};

/// Public intake: anyone may apply. Only field validation happens here.
pub async fn create(db: &DatabaseConnection, solicitud_model: Model) -> Result<Model, Error> {
    if solicitud_model.email.trim().is_empty() {
        return Err(Error::validation("email es obligatorio"));
    }
    if solicitud_model.nombre.trim().is_empty() || solicitud_model.apellido.trim().is_empty() {
        return Err(Error::validation("nombre y apellido son obligatorios"));
    }

    Ok(solicitud_abogado::create(db, solicitud_model).await?)
}

fn generate_initial_password() -> String {
    rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(16)
        .map(char::from)
        .collect()
}

/// Approves a pending application: atomically marks it `aprobada`, creates
/// the lawyer profile with a generated initial password, and queues the
/// approval and welcome emails.
pub async fn approve(
    db: &DatabaseConnection,
    config: &Config,
    actor: &profiles::Model,
    solicitud_id: Id,
) -> Result<Model, Error> {
    access::ensure_super_admin(actor)?;

    let txn = db.begin().await.map_err(Error::db_transaction)?;

    let solicitud = solicitud_abogado::find_by_id(&txn, solicitud_id).await?;
    if solicitud.estado != SolicitudStatus::Pendiente {
        return Err(Error::validation("la solicitud ya fue revisada"));
    }

    if profile::find_by_email(&txn, &solicitud.email).await?.is_some() {
        return Err(Error::validation("ya existe un perfil con ese email"));
    }

    let initial_password = generate_initial_password();
    let abogado = profile::create(
        &txn,
        profile::new_abogado_model(
            solicitud.email.clone(),
            solicitud.nombre.clone(),
            solicitud.apellido.clone(),
            initial_password.clone(),
            solicitud.colegio_profesional.clone(),
        ),
    )
    .await?;

    let reviewed = solicitud_abogado::review(
        &txn,
        solicitud,
        SolicitudStatus::Aprobada,
        actor.id,
        None,
    )
    .await?;

    emails::enqueue_solicitud_aprobada(&txn, config, &reviewed).await?;
    emails::enqueue_bienvenida(&txn, config, &abogado, &initial_password).await?;

    auditoria::record(
        &txn,
        Some(actor.id),
        "solicitud_aprobada",
        Some("solicitudes_abogado"),
        Some(reviewed.id),
        None,
    )
    .await?;

    txn.commit().await.map_err(Error::db_transaction)?;

    info!("Solicitud {solicitud_id:?} aprobada; perfil de abogado {:?} creado", abogado.id);

    Ok(reviewed)
}

/// Rejects a pending application with a reason and queues the rejection
/// email.
pub async fn reject(
    db: &DatabaseConnection,
    config: &Config,
    actor: &profiles::Model,
    solicitud_id: Id,
    motivo_rechazo: String,
) -> Result<Model, Error> {
    access::ensure_super_admin(actor)?;

    if motivo_rechazo.trim().is_empty() {
        return Err(Error::validation("motivo_rechazo es obligatorio"));
    }

    let txn = db.begin().await.map_err(Error::db_transaction)?;

    let solicitud = solicitud_abogado::find_by_id(&txn, solicitud_id).await?;
    if solicitud.estado != SolicitudStatus::Pendiente {
        return Err(Error::validation("la solicitud ya fue revisada"));
    }

    let reviewed = solicitud_abogado::review(
        &txn,
        solicitud,
        SolicitudStatus::Rechazada,
        actor.id,
        Some(motivo_rechazo.clone()),
    )
    .await?;

    emails::enqueue_solicitud_rechazada(&txn, config, &reviewed, &motivo_rechazo).await?;

    auditoria::record(
        &txn,
        Some(actor.id),
        "solicitud_rechazada",
        Some("solicitudes_abogado"),
        Some(reviewed.id),
        None,
    )
    .await?;

    txn.commit().await.map_err(Error::db_transaction)?;

    Ok(reviewed)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generated_password_is_long_enough_and_alphanumeric() {
        let password = generate_initial_password();
        assert_eq!(password.len(), 16);
        assert!(password.chars().all(|c| c.is_ascii_alphanumeric()));
    }
}
