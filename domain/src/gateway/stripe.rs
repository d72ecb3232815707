use crate::error::{DomainErrorKind, Error, ExternalErrorKind, InternalErrorKind};
use hmac::{Hmac, Mac};
use log::*;
use serde::Deserialize;
use service::config::Config;
use sha2::Sha256;
use std::time::Duration;

type HmacSha256 = Hmac<Sha256>;

/// Signed webhook deliveries older than this are rejected.
const SIGNATURE_TOLERANCE_SECS: i64 = 300;

/// Transient checkout-session failures are retried this many times with
/// exponential backoff before giving up.
const MAX_RETRIES: u32 = 3;
const BASE_DELAY_SECS: u64 = 1;
const MAX_DELAY_SECS: u64 = 60;

/// Stripe API client for creating hosted checkout sessions.
pub struct StripeClient {
    client: reqwest::Client,
    base_url: String,
}

/// Parameters for a hosted checkout session.
#[derive(Debug, Clone)]
pub struct CreateCheckoutSession {
    pub amount_centavos: i64,
    pub currency: String,
    pub product_name: String,
    pub success_url: String,
    pub cancel_url: String,
    /// Caso id carried through to the webhook via client_reference_id
    pub client_reference_id: String,
}

/// The subset of the provider's session object the platform uses.
#[derive(Debug, Deserialize)]
pub struct CheckoutSession {
    pub id: String,
    pub url: Option<String>,
}

impl StripeClient {
    /// Create a new Stripe client with authentication
    pub fn new(config: &Config) -> Result<Self, Error> {
        let client = build_client(config)?;
        let base_url = config.stripe_base_url().to_string();

        Ok(Self { client, base_url })
    }

    /// Creates a hosted checkout session, retrying transient failures with
    /// exponential backoff capped at [`MAX_RETRIES`] attempts.
    pub async fn create_checkout_session(
        &self,
        request: CreateCheckoutSession,
    ) -> Result<CheckoutSession, Error> {
        let url = format!("{}/checkout/sessions", self.base_url);
        let unit_amount = request.amount_centavos.to_string();
        let params: Vec<(&str, &str)> = vec![
            ("mode", "payment"),
            ("success_url", &request.success_url),
            ("cancel_url", &request.cancel_url),
            ("client_reference_id", &request.client_reference_id),
            ("line_items[0][quantity]", "1"),
            ("line_items[0][price_data][currency]", &request.currency),
            (
                "line_items[0][price_data][product_data][name]",
                &request.product_name,
            ),
            ("line_items[0][price_data][unit_amount]", &unit_amount),
        ];

        let mut attempt: u32 = 0;
        loop {
            let response = self.client.post(&url).form(&params).send().await;

            match response {
                Ok(response) if response.status().is_success() => {
                    return Ok(response.json::<CheckoutSession>().await?);
                }
                Ok(response) if response.status().is_server_error() && attempt < MAX_RETRIES => {
                    warn!(
                        "Checkout session attempt {} failed with {}, retrying",
                        attempt + 1,
                        response.status()
                    );
                }
                Ok(response) => {
                    let status = response.status();
                    let error_text = response.text().await.unwrap_or_default();
                    warn!("Failed to create checkout session: {status} - {error_text}");
                    return Err(Error {
                        source: None,
                        error_kind: DomainErrorKind::External(ExternalErrorKind::Network),
                    });
                }
                Err(e) if attempt < MAX_RETRIES => {
                    warn!("Checkout session attempt {} failed: {e:?}, retrying", attempt + 1);
                }
                Err(e) => return Err(e.into()),
            }

            tokio::time::sleep(backoff_delay(attempt)).await;
            attempt += 1;
        }
    }
}

/// Exponential backoff delay for the given zero-based attempt number.
fn backoff_delay(attempt: u32) -> Duration {
    let delay = BASE_DELAY_SECS.saturating_mul(2u64.saturating_pow(attempt));
    Duration::from_secs(delay.min(MAX_DELAY_SECS))
}

/// Build HTTP client with Stripe authentication
fn build_client(config: &Config) -> Result<reqwest::Client, Error> {
    let api_key = config.stripe_secret_key().ok_or_else(|| {
        warn!("Failed to get Stripe secret key from config");
        Error {
            source: None,
            error_kind: DomainErrorKind::Internal(InternalErrorKind::Config),
        }
    })?;

    let mut headers = reqwest::header::HeaderMap::new();
    let auth_value = format!("Bearer {}", api_key);
    let mut auth_header = reqwest::header::HeaderValue::from_str(&auth_value).map_err(|err| {
        warn!("Failed to create authorization header value: {err:?}");
        Error {
            source: Some(Box::new(err)),
            error_kind: DomainErrorKind::Internal(InternalErrorKind::Other(
                "Failed to create authorization header value".to_string(),
            )),
        }
    })?;
    auth_header.set_sensitive(true);
    headers.insert(reqwest::header::AUTHORIZATION, auth_header);

    Ok(reqwest::Client::builder()
        .use_rustls_tls()
        .default_headers(headers)
        .build()?)
}

/// Verifies a `Stripe-Signature` header against the endpoint secret.
///
/// The header carries `t=<unix timestamp>,v1=<hex hmac>` pairs; the signature
/// is HMAC-SHA256 over `"{t}.{payload}"`. Verification is constant-time via
/// the hmac crate and rejects timestamps outside the tolerance window.
/// `now_unix` is injected so the tolerance check is testable.
pub fn verify_signature(
    payload: &[u8],
    signature_header: &str,
    secret: &str,
    now_unix: i64,
) -> Result<(), Error> {
    let mut timestamp: Option<i64> = None;
    let mut signatures: Vec<Vec<u8>> = Vec::new();

    for part in signature_header.split(',') {
        match part.trim().split_once('=') {
            Some(("t", value)) => timestamp = value.parse().ok(),
            Some(("v1", value)) => {
                if let Ok(decoded) = hex::decode(value) {
                    signatures.push(decoded);
                }
            }
            _ => {}
        }
    }

    let timestamp = timestamp.ok_or_else(|| Error::validation("firma sin marca de tiempo"))?;
    if signatures.is_empty() {
        return Err(Error::validation("firma sin componente v1"));
    }

    if (now_unix - timestamp).abs() > SIGNATURE_TOLERANCE_SECS {
        return Err(Error::validation("marca de tiempo fuera de tolerancia"));
    }

    let mut signed_payload = Vec::with_capacity(payload.len() + 16);
    signed_payload.extend_from_slice(timestamp.to_string().as_bytes());
    signed_payload.push(b'.');
    signed_payload.extend_from_slice(payload);

    for signature in &signatures {
        let mut mac = HmacSha256::new_from_slice(secret.as_bytes())
            .map_err(|_| Error::validation("secreto de webhook inválido"))?;
        mac.update(&signed_payload);
        if mac.verify_slice(signature).is_ok() {
            return Ok(());
        }
    }

    Err(Error::validation("la firma no coincide"))
}
