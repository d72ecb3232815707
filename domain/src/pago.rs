//! Checkout-session creation and payment-webhook processing.
//!
//! The webhook path is the single externally-authoritative lifecycle
//! transition in the platform: only a signature-verified
//! `checkout.session.completed` event moves a caso from `esperando_pago` to
//! `disponible`.

use crate::access::{self, Operation};
use crate::caso::ensure_transition;
use crate::error::Error;
use crate::gateway::stripe::{self, CreateCheckoutSession, StripeClient};
use crate::{emails, Id};
use entity::case_status::CaseStatus;
use entity::{pagos, profiles};
use entity_api::{caso, notificacion, pago, profile, stripe_webhook_event};
use log::*;
use sea_orm::{ConnectionTrait, DatabaseConnection, TransactionTrait};
use serde::Deserialize;
use service::config::Config;

pub use entity_api::pago::find_by_caso;

/// Inbound webhook event envelope.
#[derive(Debug, Deserialize)]
pub struct StripeEvent {
    pub id: String,
    #[serde(rename = "type")]
    pub event_type: String,
    pub data: StripeEventData,
}

#[derive(Debug, Deserialize)]
pub struct StripeEventData {
    pub object: CheckoutSessionObject,
}

/// The session object carried by checkout events.
#[derive(Debug, Deserialize)]
pub struct CheckoutSessionObject {
    pub id: String,
    #[serde(default)]
    pub amount_total: Option<i64>,
    #[serde(default)]
    pub currency: Option<String>,
    #[serde(default)]
    pub payment_intent: Option<String>,
}

/// How a verified webhook delivery was handled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WebhookOutcome {
    /// A caso changed state and a pago row was written
    Processed,
    /// The event id was already seen; nothing was written
    Duplicate,
    /// Unknown event type or unmatched session; acknowledged and skipped
    Ignored,
}

/// Creates a hosted checkout session for a caso in `borrador` and parks the
/// caso in `esperando_pago` with the session id stored for webhook matching.
/// Returns the provider's redirect URL.
pub async fn create_checkout_session(
    db: &DatabaseConnection,
    config: &Config,
    actor: Option<&profiles::Model>,
    caso_id: Id,
) -> Result<String, Error> {
    let caso = caso::find_by_id(db, caso_id).await?;

    // Authenticated callers must own the caso; anonymous draft intake has no
    // actor to check.
    if let Some(actor) = actor {
        access::ensure_access(db, actor, &caso, Operation::Read).await?;
    }

    ensure_transition(caso.estado, CaseStatus::EsperandoPago)?;

    let frontend_base_url = config
        .frontend_base_url()
        .ok_or_else(|| Error::config("frontend_base_url is not configured"))?;

    let client = StripeClient::new(config)?;
    let session = client
        .create_checkout_session(CreateCheckoutSession {
            amount_centavos: config.consulta_price_centavos,
            currency: config.consulta_currency.clone(),
            product_name: "Consulta legal KlamAI".to_string(),
            success_url: format!("{frontend_base_url}/pago/exito?caso={}", caso.id),
            cancel_url: format!("{frontend_base_url}/pago/cancelado?caso={}", caso.id),
            client_reference_id: caso.id.to_string(),
        })
        .await?;

    let redirect_url = session
        .url
        .clone()
        .ok_or_else(|| Error::validation("la sesión de checkout no trae URL"))?;

    caso::set_checkout_session(db, caso, session.id).await?;

    Ok(redirect_url)
}

/// Verifies, deduplicates, and processes one webhook delivery.
///
/// Any error returned here surfaces as a non-2xx response so the provider
/// redelivers; the transaction guarantees redelivery never observes a
/// half-processed event. Racing duplicate deliveries that pass the fast-path
/// check collide on the unique event id inside the transaction instead.
pub async fn process_webhook_event(
    db: &DatabaseConnection,
    config: &Config,
    payload: &[u8],
    signature_header: &str,
) -> Result<WebhookOutcome, Error> {
    let secret = config
        .stripe_webhook_secret()
        .ok_or_else(|| Error::config("stripe_webhook_secret is not configured"))?;

    stripe::verify_signature(
        payload,
        signature_header,
        &secret,
        chrono::Utc::now().timestamp(),
    )?;

    let event: StripeEvent = serde_json::from_slice(payload)?;

    if stripe_webhook_event::find_by_event_id(db, &event.id)
        .await?
        .is_some()
    {
        info!("Duplicate webhook event {}; skipping", event.id);
        return Ok(WebhookOutcome::Duplicate);
    }

    let txn = db.begin().await.map_err(Error::db_transaction)?;

    let seen =
        stripe_webhook_event::record(&txn, event.id.clone(), event.event_type.clone()).await?;

    let outcome = match event.event_type.as_str() {
        "checkout.session.completed" => {
            handle_checkout_completed(&txn, config, &event.data.object).await?
        }
        _ => {
            debug!("Ignoring unhandled webhook event type: {}", event.event_type);
            WebhookOutcome::Ignored
        }
    };

    stripe_webhook_event::mark_processed(&txn, seen).await?;

    txn.commit().await.map_err(Error::db_transaction)?;

    Ok(outcome)
}

async fn handle_checkout_completed(
    txn: &impl ConnectionTrait,
    config: &Config,
    object: &CheckoutSessionObject,
) -> Result<WebhookOutcome, Error> {
    let caso = match caso::find_by_checkout_session_id(txn, &object.id).await? {
        Some(caso) => caso,
        None => {
            warn!("Webhook for unknown checkout session {}", object.id);
            return Ok(WebhookOutcome::Ignored);
        }
    };

    ensure_transition(caso.estado, CaseStatus::Disponible)?;
    let caso = caso::update_estado(txn, caso, CaseStatus::Disponible).await?;

    let now = chrono::Utc::now();
    pago::create(
        txn,
        pagos::Model {
            id: Id::new_v4(),
            caso_id: caso.id,
            usuario_id: caso.cliente_id,
            monto_centavos: object.amount_total.unwrap_or(config.consulta_price_centavos),
            moneda: object
                .currency
                .clone()
                .unwrap_or_else(|| config.consulta_currency.clone()),
            stripe_session_id: object.id.clone(),
            stripe_payment_intent_id: object.payment_intent.clone(),
            estado: entity::payment_status::PaymentStatus::Exitoso,
            created_at: now.into(),
            updated_at: now.into(),
        },
    )
    .await?;

    if let Some(cliente_id) = caso.cliente_id {
        notificacion::create(
            txn,
            cliente_id,
            "Hemos recibido tu pago; tu caso ya está disponible para asignación".to_string(),
            Some(format!("/casos/{}", caso.id)),
        )
        .await?;
    }

    // Receipt goes to the profile email when the caso is linked, otherwise to
    // the draft requester address.
    let destinatario = match caso.cliente_id {
        Some(cliente_id) => Some(profile::find_by_id(txn, cliente_id).await?.email),
        None => caso.email_borrador.clone(),
    };
    if let Some(destinatario) = destinatario {
        emails::enqueue_pago_recibido(txn, config, &destinatario, &caso).await?;
    }

    info!("Caso {:?} disponible tras pago confirmado", caso.id);

    Ok(WebhookOutcome::Processed)
}

#[cfg(test)]
// We need to gate seaORM's mock feature behind conditional compilation because
// the feature removes the Clone trait implementation from seaORM's DatabaseConnection.
// see https://github.com/SeaQL/sea-orm/issues/830
#[cfg(feature = "mock")]
mod tests {
    use super::*;
    use entity::{notificaciones, stripe_webhook_events};
    use hmac::{Hmac, Mac};
    use sea_orm::{DatabaseBackend, MockDatabase};
    use serial_test::serial;
    use sha2::Sha256;

    fn signed_header(payload: &[u8], secret: &str) -> String {
        let timestamp = chrono::Utc::now().timestamp();
        let mut mac = Hmac::<Sha256>::new_from_slice(secret.as_bytes()).unwrap();
        mac.update(format!("{timestamp}.").as_bytes());
        mac.update(payload);
        format!("t={timestamp},v1={}", hex::encode(mac.finalize().into_bytes()))
    }

    fn webhook_config(secret: &str) -> Config {
        std::env::set_var("STRIPE_WEBHOOK_SECRET", secret);
        Config::default()
    }

    fn seen_event(event_id: &str, event_type: &str) -> stripe_webhook_events::Model {
        stripe_webhook_events::Model {
            id: Id::new_v4(),
            stripe_event_id: event_id.to_string(),
            event_type: event_type.to_string(),
            processed_at: None,
            created_at: chrono::Utc::now().into(),
        }
    }

    fn caso_esperando_pago(session_id: &str) -> entity::casos::Model {
        let now = chrono::Utc::now();
        entity::casos::Model {
            id: Id::new_v4(),
            cliente_id: None,
            nombre_borrador: Some("Laura".to_string()),
            email_borrador: Some("laura@example.com".to_string()),
            telefono_borrador: None,
            especialidad_id: None,
            motivo_consulta: "Consulta sobre alquiler".to_string(),
            estado: CaseStatus::EsperandoPago,
            checkout_session_id: Some(session_id.to_string()),
            fecha_cierre: None,
            cerrado_por: None,
            created_at: now.into(),
            updated_at: now.into(),
        }
    }

    #[tokio::test]
    #[serial]
    async fn invalid_signature_is_rejected_before_any_lookup() {
        let config = webhook_config("whsec_test");
        let payload = br#"{"id":"evt_1","type":"checkout.session.completed","data":{"object":{"id":"cs_1"}}}"#;

        let db = MockDatabase::new(DatabaseBackend::Postgres).into_connection();

        let result =
            process_webhook_event(&db, &config, payload, "t=1,v1=deadbeef").await;

        assert!(result.is_err());
    }

    #[tokio::test]
    #[serial]
    async fn replayed_event_id_short_circuits_without_writes() -> Result<(), Error> {
        let config = webhook_config("whsec_test");
        let payload = br#"{"id":"evt_1","type":"checkout.session.completed","data":{"object":{"id":"cs_1"}}}"#;
        let header = signed_header(payload, "whsec_test");

        // The dedup lookup finds the event already recorded; nothing further
        // is queried.
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results(vec![vec![seen_event(
                "evt_1",
                "checkout.session.completed",
            )]])
            .into_connection();

        let outcome = process_webhook_event(&db, &config, payload, &header).await?;

        assert_eq!(outcome, WebhookOutcome::Duplicate);

        Ok(())
    }

    #[tokio::test]
    #[serial]
    async fn unknown_event_type_is_acknowledged_and_ignored() -> Result<(), Error> {
        let config = webhook_config("whsec_test");
        let payload =
            br#"{"id":"evt_2","type":"invoice.created","data":{"object":{"id":"in_1"}}}"#;
        let header = signed_header(payload, "whsec_test");

        let seen = seen_event("evt_2", "invoice.created");
        let mut processed = seen.clone();
        processed.processed_at = Some(chrono::Utc::now().into());

        let db = MockDatabase::new(DatabaseBackend::Postgres)
            // dedup lookup: nothing seen yet
            .append_query_results(vec![Vec::<stripe_webhook_events::Model>::new()])
            // record the event id
            .append_query_results(vec![vec![seen]])
            // mark processed
            .append_query_results(vec![vec![processed]])
            .into_connection();

        let outcome = process_webhook_event(&db, &config, payload, &header).await?;

        assert_eq!(outcome, WebhookOutcome::Ignored);

        Ok(())
    }

    #[tokio::test]
    #[serial]
    async fn checkout_completed_transitions_caso_and_records_exactly_one_pago() -> Result<(), Error>
    {
        let config = webhook_config("whsec_test");
        let payload = br#"{"id":"evt_3","type":"checkout.session.completed","data":{"object":{"id":"cs_1","amount_total":4995,"currency":"eur","payment_intent":"pi_1"}}}"#;
        let header = signed_header(payload, "whsec_test");

        let caso = caso_esperando_pago("cs_1");
        let mut caso_disponible = caso.clone();
        caso_disponible.estado = CaseStatus::Disponible;

        let seen = seen_event("evt_3", "checkout.session.completed");
        let mut processed = seen.clone();
        processed.processed_at = Some(chrono::Utc::now().into());

        let now = chrono::Utc::now();
        let pago_row = pagos::Model {
            id: Id::new_v4(),
            caso_id: caso.id,
            usuario_id: None,
            monto_centavos: 4995,
            moneda: "eur".to_string(),
            stripe_session_id: "cs_1".to_string(),
            stripe_payment_intent_id: Some("pi_1".to_string()),
            estado: entity::payment_status::PaymentStatus::Exitoso,
            created_at: now.into(),
            updated_at: now.into(),
        };

        let db = MockDatabase::new(DatabaseBackend::Postgres)
            // dedup lookup: nothing seen yet
            .append_query_results(vec![Vec::<stripe_webhook_events::Model>::new()])
            // record the event id
            .append_query_results(vec![vec![seen]])
            // caso lookup by session id
            .append_query_results(vec![vec![caso.clone()]])
            // estado update returning the disponible caso
            .append_query_results(vec![vec![caso_disponible]])
            // exactly one pago insert
            .append_query_results(vec![vec![pago_row]])
            // outbox enqueue for the draft requester's receipt
            .append_query_results(vec![vec![entity::email_outbox::Model {
                id: Id::new_v4(),
                destinatario: "laura@example.com".to_string(),
                asunto: "Pago recibido".to_string(),
                plantilla: "pago_recibido".to_string(),
                datos: "{}".to_string(),
                estado: entity::outbox_status::OutboxStatus::Pendiente,
                intentos: 0,
                ultimo_error: None,
                enviado_at: None,
                created_at: now.into(),
                updated_at: now.into(),
            }]])
            // mark processed
            .append_query_results(vec![vec![processed]])
            .into_connection();

        let outcome = process_webhook_event(&db, &config, payload, &header).await?;

        assert_eq!(outcome, WebhookOutcome::Processed);

        Ok(())
    }

    #[tokio::test]
    #[serial]
    async fn checkout_completed_for_unknown_session_is_ignored() -> Result<(), Error> {
        let config = webhook_config("whsec_test");
        let payload = br#"{"id":"evt_4","type":"checkout.session.completed","data":{"object":{"id":"cs_unknown"}}}"#;
        let header = signed_header(payload, "whsec_test");

        let seen = seen_event("evt_4", "checkout.session.completed");
        let mut processed = seen.clone();
        processed.processed_at = Some(chrono::Utc::now().into());

        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results(vec![Vec::<stripe_webhook_events::Model>::new()])
            .append_query_results(vec![vec![seen]])
            // no caso stored that session id
            .append_query_results(vec![Vec::<entity::casos::Model>::new()])
            .append_query_results(vec![vec![processed]])
            .into_connection();

        let outcome = process_webhook_event(&db, &config, payload, &header).await?;

        assert_eq!(outcome, WebhookOutcome::Ignored);

        Ok(())
    }

    #[tokio::test]
    #[serial]
    async fn notificacion_row_is_written_for_linked_cliente() -> Result<(), Error> {
        let config = webhook_config("whsec_test");
        let payload = br#"{"id":"evt_5","type":"checkout.session.completed","data":{"object":{"id":"cs_2","amount_total":4995,"currency":"eur"}}}"#;
        let header = signed_header(payload, "whsec_test");

        let cliente_id = Id::new_v4();
        let mut caso = caso_esperando_pago("cs_2");
        caso.cliente_id = Some(cliente_id);
        caso.email_borrador = None;
        let mut caso_disponible = caso.clone();
        caso_disponible.estado = CaseStatus::Disponible;

        let seen = seen_event("evt_5", "checkout.session.completed");
        let mut processed = seen.clone();
        processed.processed_at = Some(chrono::Utc::now().into());

        let now = chrono::Utc::now();
        let cliente = entity::profiles::Model {
            id: cliente_id,
            email: "marcos@example.com".to_string(),
            nombre: "Marcos".to_string(),
            apellido: "Ruiz".to_string(),
            password: "hash".to_string(),
            role: entity::roles::Role::Cliente,
            tipo_abogado: None,
            creditos_disponibles: 3,
            nombre_bufete: None,
            created_at: now.into(),
            updated_at: now.into(),
        };

        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results(vec![Vec::<stripe_webhook_events::Model>::new()])
            .append_query_results(vec![vec![seen]])
            .append_query_results(vec![vec![caso.clone()]])
            .append_query_results(vec![vec![caso_disponible]])
            .append_query_results(vec![vec![pagos::Model {
                id: Id::new_v4(),
                caso_id: caso.id,
                usuario_id: Some(cliente_id),
                monto_centavos: 4995,
                moneda: "eur".to_string(),
                stripe_session_id: "cs_2".to_string(),
                stripe_payment_intent_id: None,
                estado: entity::payment_status::PaymentStatus::Exitoso,
                created_at: now.into(),
                updated_at: now.into(),
            }]])
            // exactly one notification for the client
            .append_query_results(vec![vec![notificaciones::Model {
                id: Id::new_v4(),
                usuario_id: cliente_id,
                mensaje: "Hemos recibido tu pago".to_string(),
                url_destino: None,
                leida: false,
                created_at: now.into(),
                updated_at: now.into(),
            }]])
            // profile lookup for the receipt address
            .append_query_results(vec![vec![cliente]])
            // outbox enqueue
            .append_query_results(vec![vec![entity::email_outbox::Model {
                id: Id::new_v4(),
                destinatario: "marcos@example.com".to_string(),
                asunto: "Pago recibido".to_string(),
                plantilla: "pago_recibido".to_string(),
                datos: "{}".to_string(),
                estado: entity::outbox_status::OutboxStatus::Pendiente,
                intentos: 0,
                ultimo_error: None,
                enviado_at: None,
                created_at: now.into(),
                updated_at: now.into(),
            }]])
            .append_query_results(vec![vec![processed]])
            .into_connection();

        let outcome = process_webhook_event(&db, &config, payload, &header).await?;

        assert_eq!(outcome, WebhookOutcome::Processed);

        Ok(())
    }
}
