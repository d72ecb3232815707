//! Client for the document blob store.
//!
//! Documents live in a bucket addressed by path; retrieval always goes
//! through a provider-minted signed URL with a bounded lifetime, so raw
//! storage paths never leave the backend.

use crate::error::{DomainErrorKind, Error, ExternalErrorKind, InternalErrorKind};
use log::*;
use serde::Deserialize;
use serde_json::json;
use service::config::Config;

pub struct BlobStoreClient {
    client: reqwest::Client,
    base_url: String,
    bucket: String,
}

#[derive(Debug, Deserialize)]
struct SignedUrlResponse {
    #[serde(rename = "signedURL")]
    signed_url: String,
}

impl BlobStoreClient {
    pub fn new(config: &Config) -> Result<Self, Error> {
        let base_url = config.storage_base_url().ok_or_else(|| {
            warn!("Failed to get blob store base URL from config");
            Error {
                source: None,
                error_kind: DomainErrorKind::Internal(InternalErrorKind::Config),
            }
        })?;

        let client = build_client(config)?;

        Ok(Self {
            client,
            base_url,
            bucket: config.storage_bucket.clone(),
        })
    }

    /// Uploads a document body under `path`.
    pub async fn put_object(&self, path: &str, bytes: Vec<u8>) -> Result<(), Error> {
        let url = format!("{}/object/{}/{}", self.base_url, self.bucket, path);

        let response = self
            .client
            .post(&url)
            .header(reqwest::header::CONTENT_TYPE, "application/octet-stream")
            .body(bytes)
            .send()
            .await?;

        if response.status().is_success() {
            Ok(())
        } else {
            let status = response.status();
            warn!("Blob upload failed for {path}: {status}");
            Err(Error {
                source: None,
                error_kind: DomainErrorKind::External(ExternalErrorKind::Network),
            })
        }
    }

    /// Removes the blob under `path`.
    pub async fn delete_object(&self, path: &str) -> Result<(), Error> {
        let url = format!("{}/object/{}/{}", self.base_url, self.bucket, path);

        let response = self.client.delete(&url).send().await?;

        if response.status().is_success() {
            Ok(())
        } else {
            let status = response.status();
            warn!("Blob delete failed for {path}: {status}");
            Err(Error {
                source: None,
                error_kind: DomainErrorKind::External(ExternalErrorKind::Network),
            })
        }
    }

    /// Mints a time-limited signed URL for `path`. The URL is returned to the
    /// caller for a single view/download and never persisted.
    pub async fn create_signed_url(&self, path: &str, expires_in_secs: u64) -> Result<String, Error> {
        let url = format!("{}/object/sign/{}/{}", self.base_url, self.bucket, path);

        let response = self
            .client
            .post(&url)
            .json(&json!({ "expiresIn": expires_in_secs }))
            .send()
            .await?;

        if response.status().is_success() {
            let signed: SignedUrlResponse = response.json().await?;
            Ok(format!("{}{}", self.base_url, signed.signed_url))
        } else {
            let status = response.status();
            warn!("Signed URL mint failed for {path}: {status}");
            Err(Error {
                source: None,
                error_kind: DomainErrorKind::External(ExternalErrorKind::Network),
            })
        }
    }
}

fn build_client(config: &Config) -> Result<reqwest::Client, Error> {
    let service_key = config.storage_service_key().ok_or_else(|| {
        warn!("Failed to get blob store service key from config");
        Error {
            source: None,
            error_kind: DomainErrorKind::Internal(InternalErrorKind::Config),
        }
    })?;

    let mut headers = reqwest::header::HeaderMap::new();
    let auth_value = format!("Bearer {}", service_key);
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

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    fn config_with_mock(server_url: &str) -> Config {
        std::env::set_var("STORAGE_BASE_URL", server_url);
        std::env::set_var("STORAGE_SERVICE_KEY", "service_key_123");
        Config::default()
    }

    #[tokio::test]
    #[serial]
    async fn put_object_uploads_under_bucket_and_path() {
        let mut server = mockito::Server::new_async().await;
        let config = config_with_mock(&server.url());

        let mock = server
            .mock(
                "POST",
                "/object/documentos_legales/casos/abc/contrato.pdf",
            )
            .match_header("authorization", "Bearer service_key_123")
            .with_status(200)
            .create_async()
            .await;

        let client = BlobStoreClient::new(&config).unwrap();
        client
            .put_object("casos/abc/contrato.pdf", b"pdf bytes".to_vec())
            .await
            .unwrap();

        mock.assert_async().await;
    }

    #[tokio::test]
    #[serial]
    async fn create_signed_url_returns_absolute_url() {
        let mut server = mockito::Server::new_async().await;
        let config = config_with_mock(&server.url());

        let _mock = server
            .mock(
                "POST",
                "/object/sign/documentos_legales/casos/abc/contrato.pdf",
            )
            .with_status(200)
            .with_body(r#"{"signedURL":"/object/sign/documentos_legales/casos/abc/contrato.pdf?token=tkn"}"#)
            .create_async()
            .await;

        let client = BlobStoreClient::new(&config).unwrap();
        let url = client
            .create_signed_url("casos/abc/contrato.pdf", 3600)
            .await
            .unwrap();

        assert!(url.starts_with(&server.url()));
        assert!(url.contains("token=tkn"));
    }

    #[tokio::test]
    #[serial]
    async fn delete_object_surfaces_provider_failure() {
        let mut server = mockito::Server::new_async().await;
        let config = config_with_mock(&server.url());

        let _mock = server
            .mock(
                "DELETE",
                "/object/documentos_legales/casos/abc/contrato.pdf",
            )
            .with_status(500)
            .create_async()
            .await;

        let client = BlobStoreClient::new(&config).unwrap();
        let result = client.delete_object("casos/abc/contrato.pdf").await;

        assert!(result.is_err());
    }
}
