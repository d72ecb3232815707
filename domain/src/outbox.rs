//! Background worker that drains the email outbox.
//!
//! State-changing operations enqueue email rows transactionally; this worker
//! polls for pending rows, renders each through the MailerSend gateway, and
//! records the outcome. Rows that keep failing are parked as `fallido` after
//! a configurable number of attempts, so delivery is at-least-once and
//! failures stay visible instead of being swallowed inline.

use crate::error::Error;
use crate::gateway::mailersend::{EmailRecipient, EmailSender, MailerSendClient, SendEmailRequest};
use entity::email_outbox::Model;
use entity_api::email_outbox_item;
use log::*;
use sea_orm::DatabaseConnection;
use serde_json::Value;
use service::config::Config;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;

pub struct Worker {
    db: Arc<DatabaseConnection>,
    config: Config,
}

impl Worker {
    pub fn new(db: Arc<DatabaseConnection>, config: Config) -> Self {
        Self { db, config }
    }

    /// Runs the worker loop on its own task until the process exits.
    pub fn spawn(self) -> JoinHandle<()> {
        tokio::spawn(async move {
            let mut interval =
                tokio::time::interval(Duration::from_secs(self.config.outbox_poll_interval_secs));
            info!(
                "Email outbox worker started (every {}s, batch {})",
                self.config.outbox_poll_interval_secs, self.config.outbox_batch_size
            );
            loop {
                interval.tick().await;
                match self.drain_once().await {
                    Ok(0) => {}
                    Ok(sent) => info!("Outbox drained {sent} email(s)"),
                    Err(e) => warn!("Outbox drain failed: {e:?}"),
                }
            }
        })
    }

    /// Processes one batch of pending rows. Returns how many were delivered.
    pub async fn drain_once(&self) -> Result<usize, Error> {
        let pendientes =
            email_outbox_item::find_pendientes(self.db.as_ref(), self.config.outbox_batch_size)
                .await?;

        if pendientes.is_empty() {
            return Ok(0);
        }

        let client = MailerSendClient::new(&self.config)?;
        let mut sent = 0;

        for item in pendientes {
            let request = render(&self.config, &item);
            match client.send_email(request).await {
                Ok(_) => {
                    email_outbox_item::mark_enviado(self.db.as_ref(), item).await?;
                    sent += 1;
                }
                Err(e) => {
                    warn!("Failed to deliver outbox row {:?}: {e:?}", item.id);
                    email_outbox_item::mark_intento_fallido(
                        self.db.as_ref(),
                        item,
                        e.to_string(),
                        self.config.outbox_max_intentos,
                    )
                    .await?;
                }
            }
        }

        Ok(sent)
    }
}

/// Renders an outbox row into a provider request. Bodies are plain text
/// assembled from the row's template kind and JSON payload.
fn render(config: &Config, item: &Model) -> SendEmailRequest {
    let datos: Value = serde_json::from_str(&item.datos).unwrap_or(Value::Null);
    let nombre = datos
        .get("nombre")
        .and_then(|v| v.as_str())
        .unwrap_or("")
        .to_string();
    let url = datos.get("url").and_then(|v| v.as_str()).unwrap_or("");

    let saludo = if nombre.is_empty() {
        "Hola,".to_string()
    } else {
        format!("Hola {nombre},")
    };

    let cuerpo = match item.plantilla.as_str() {
        crate::emails::PLANTILLA_BIENVENIDA => {
            let password = datos
                .get("password_inicial")
                .and_then(|v| v.as_str())
                .unwrap_or("");
            format!(
                "{saludo}\n\nTu cuenta de abogado en KlamAI ya está activa. \
                 Tu contraseña inicial es: {password}\nCámbiala en tu primer acceso."
            )
        }
        crate::emails::PLANTILLA_SOLICITUD_APROBADA => format!(
            "{saludo}\n\nTu solicitud de alta como abogado ha sido aprobada. \
             En breve recibirás tus credenciales de acceso."
        ),
        crate::emails::PLANTILLA_SOLICITUD_RECHAZADA => {
            let motivo = datos.get("motivo").and_then(|v| v.as_str()).unwrap_or("");
            format!(
                "{saludo}\n\nLamentamos comunicarte que tu solicitud ha sido rechazada. \
                 Motivo: {motivo}"
            )
        }
        crate::emails::PLANTILLA_PAGO_RECIBIDO => format!(
            "{saludo}\n\nHemos recibido tu pago y tu consulta ya está en marcha. \
             Puedes seguir su estado aquí: {url}"
        ),
        crate::emails::PLANTILLA_CASO_ASIGNADO => format!(
            "{saludo}\n\nSe te ha asignado un nuevo caso. Revísalo aquí: {url}"
        ),
        _ => format!("{saludo}\n\n{}", item.asunto),
    };

    SendEmailRequest {
        from: EmailSender {
            email: config.email_from_address.clone(),
            name: Some("KlamAI".to_string()),
        },
        to: vec![EmailRecipient {
            email: item.destinatario.clone(),
            name: None,
        }],
        subject: item.asunto.clone(),
        text: Some(cuerpo),
        html: None,
    }
}

#[cfg(test)]
// We need to gate seaORM's mock feature behind conditional compilation because
// the feature removes the Clone trait implementation from seaORM's DatabaseConnection.
// see https://github.com/SeaQL/sea-orm/issues/830
#[cfg(feature = "mock")]
mod tests {
    use super::*;
    use entity::{outbox_status::OutboxStatus, Id};
    use sea_orm::{DatabaseBackend, MockDatabase};
    use serial_test::serial;

    fn outbox_row(plantilla: &str) -> Model {
        let now = chrono::Utc::now();
        Model {
            id: Id::new_v4(),
            destinatario: "lucia@example.com".to_string(),
            asunto: "Se te ha asignado un nuevo caso".to_string(),
            plantilla: plantilla.to_string(),
            datos: r#"{"nombre":"Lucía","url":"https://app.klamai.com/abogados/casos/1"}"#
                .to_string(),
            estado: OutboxStatus::Pendiente,
            intentos: 0,
            ultimo_error: None,
            enviado_at: None,
            created_at: now.into(),
            updated_at: now.into(),
        }
    }

    #[test]
    #[serial]
    fn render_personalizes_the_body() {
        std::env::set_var("MAILERSEND_API_KEY", "test_key");
        let config = Config::default();

        let request = render(&config, &outbox_row(crate::emails::PLANTILLA_CASO_ASIGNADO));

        assert_eq!(request.to[0].email, "lucia@example.com");
        let body = request.text.unwrap();
        assert!(body.contains("Hola Lucía,"));
        assert!(body.contains("https://app.klamai.com/abogados/casos/1"));
    }

    #[tokio::test]
    #[serial]
    async fn drain_once_delivers_pending_rows_and_marks_them_enviado() -> Result<(), Error> {
        let mut server = mockito::Server::new_async().await;
        std::env::set_var("MAILERSEND_API_KEY", "test_key");
        std::env::set_var("MAILERSEND_BASE_URL", server.url());
        let config = Config::default();

        let mock = server
            .mock("POST", "/email")
            .match_header("authorization", "Bearer test_key")
            .with_status(202)
            .with_header("x-message-id", "msg_1")
            .create_async()
            .await;

        let row = outbox_row(crate::emails::PLANTILLA_CASO_ASIGNADO);
        let mut delivered = row.clone();
        delivered.estado = OutboxStatus::Enviado;
        delivered.intentos = 1;

        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                // pending batch
                .append_query_results(vec![vec![row]])
                // mark_enviado update
                .append_query_results(vec![vec![delivered]])
                .into_connection(),
        );

        let worker = Worker::new(db, config);
        let sent = worker.drain_once().await?;

        assert_eq!(sent, 1);
        mock.assert_async().await;

        Ok(())
    }

    #[tokio::test]
    #[serial]
    async fn drain_once_records_failed_attempts() -> Result<(), Error> {
        let mut server = mockito::Server::new_async().await;
        std::env::set_var("MAILERSEND_API_KEY", "test_key");
        std::env::set_var("MAILERSEND_BASE_URL", server.url());
        let config = Config::default();

        let _mock = server
            .mock("POST", "/email")
            .with_status(500)
            .create_async()
            .await;

        let row = outbox_row(crate::emails::PLANTILLA_PAGO_RECIBIDO);
        let mut failed = row.clone();
        failed.intentos = 1;
        failed.ultimo_error = Some("network".to_string());

        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results(vec![vec![row]])
                .append_query_results(vec![vec![failed]])
                .into_connection(),
        );

        let worker = Worker::new(db, config);
        let sent = worker.drain_once().await?;

        assert_eq!(sent, 0);

        Ok(())
    }
}
