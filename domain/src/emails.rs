//! Typed enqueue functions for outbound transactional email.
//!
//! Nothing here talks to the email provider. Each function writes a row to
//! the durable outbox, inside the caller's transaction when one is in
//! flight, and the background worker (see [`crate::outbox`]) delivers it.

use crate::error::Error;
use entity::{casos, profiles, solicitudes_abogado};
use entity_api::email_outbox_item;
use log::*;
use sea_orm::ConnectionTrait;
use serde_json::json;
use service::config::Config;

pub const PLANTILLA_BIENVENIDA: &str = "bienvenida";
pub const PLANTILLA_SOLICITUD_APROBADA: &str = "solicitud_aprobada";
pub const PLANTILLA_SOLICITUD_RECHAZADA: &str = "solicitud_rechazada";
pub const PLANTILLA_PAGO_RECIBIDO: &str = "pago_recibido";
pub const PLANTILLA_CASO_ASIGNADO: &str = "caso_asignado";

fn caso_link(config: &Config, path: &str) -> Option<String> {
    config
        .frontend_base_url()
        .map(|base| format!("{base}{path}"))
}

/// Welcome email for a freshly created lawyer profile, carrying the initial
/// password the reviewer generated.
pub async fn enqueue_bienvenida(
    db: &impl ConnectionTrait,
    _config: &Config,
    profile: &profiles::Model,
    initial_password: &str,
) -> Result<(), Error> {
    debug!("Queueing welcome email for {}", profile.email);

    let datos = json!({
        "nombre": profile.nombre,
        "apellido": profile.apellido,
        "password_inicial": initial_password,
    });

    email_outbox_item::enqueue(
        db,
        profile.email.clone(),
        "Bienvenido a KlamAI".to_string(),
        PLANTILLA_BIENVENIDA.to_string(),
        datos.to_string(),
    )
    .await?;

    Ok(())
}

pub async fn enqueue_solicitud_aprobada(
    db: &impl ConnectionTrait,
    _config: &Config,
    solicitud: &solicitudes_abogado::Model,
) -> Result<(), Error> {
    let datos = json!({
        "nombre": solicitud.nombre,
        "apellido": solicitud.apellido,
    });

    email_outbox_item::enqueue(
        db,
        solicitud.email.clone(),
        "Tu solicitud de alta como abogado ha sido aprobada".to_string(),
        PLANTILLA_SOLICITUD_APROBADA.to_string(),
        datos.to_string(),
    )
    .await?;

    Ok(())
}

pub async fn enqueue_solicitud_rechazada(
    db: &impl ConnectionTrait,
    _config: &Config,
    solicitud: &solicitudes_abogado::Model,
    motivo: &str,
) -> Result<(), Error> {
    let datos = json!({
        "nombre": solicitud.nombre,
        "motivo": motivo,
    });

    email_outbox_item::enqueue(
        db,
        solicitud.email.clone(),
        "Sobre tu solicitud de alta como abogado".to_string(),
        PLANTILLA_SOLICITUD_RECHAZADA.to_string(),
        datos.to_string(),
    )
    .await?;

    Ok(())
}

/// Payment receipt for a confirmed checkout.
pub async fn enqueue_pago_recibido(
    db: &impl ConnectionTrait,
    config: &Config,
    destinatario: &str,
    caso: &casos::Model,
) -> Result<(), Error> {
    let datos = json!({
        "caso_id": caso.id,
        "url": caso_link(config, &format!("/casos/{}", caso.id)),
    });

    email_outbox_item::enqueue(
        db,
        destinatario.to_string(),
        "Pago recibido: tu consulta ya está en marcha".to_string(),
        PLANTILLA_PAGO_RECIBIDO.to_string(),
        datos.to_string(),
    )
    .await?;

    Ok(())
}

/// Assignment notice for the lawyer taking over a caso.
pub async fn enqueue_caso_asignado(
    db: &impl ConnectionTrait,
    config: &Config,
    abogado: &profiles::Model,
    caso: &casos::Model,
) -> Result<(), Error> {
    let datos = json!({
        "nombre": abogado.nombre,
        "caso_id": caso.id,
        "url": caso_link(config, &format!("/abogados/casos/{}", caso.id)),
    });

    email_outbox_item::enqueue(
        db,
        abogado.email.clone(),
        "Se te ha asignado un nuevo caso".to_string(),
        PLANTILLA_CASO_ASIGNADO.to_string(),
        datos.to_string(),
    )
    .await?;

    Ok(())
}
