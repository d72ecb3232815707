//! Case document attachment, retrieval, and deletion.
//!
//! Binaries live in the blob store under a content-addressed path; only
//! metadata rows reference them, split across the client-side and
//! lawyer-side tables. Retrieval mints a time-limited signed URL per
//! request. Every operation runs through the access gate against the
//! document's caso.

use crate::access::{self, Operation};
use crate::error::Error;
use crate::gateway::blob_store::BlobStoreClient;
use crate::Id;
use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
use entity::roles::Role;
use entity::{documentos_abogado, documentos_cliente, profiles};
use entity_api::{auditoria, caso, documento_abogado, documento_cliente};
use log::*;
use sea_orm::DatabaseConnection;
use serde::{Deserialize, Serialize};
use service::config::Config;
use sha2::{Digest, Sha256};
use utoipa::ToSchema;

/// Uploads above this size are rejected.
pub const MAX_DOCUMENT_BYTES: usize = 10 * 1024 * 1024;

/// Static allow-list of uploadable file extensions.
pub const ALLOWED_EXTENSIONS: &[&str] = &["pdf", "doc", "docx", "txt", "jpg", "jpeg", "png"];

/// Which of the two parallel document tables a row lives in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum DocumentoOrigen {
    Cliente,
    Abogado,
}

/// Upload payload: file bytes arrive base64-encoded in the request body.
#[derive(Debug, Deserialize, ToSchema)]
pub struct NuevoDocumento {
    pub tipo_documento: String,
    pub nombre_archivo: String,
    pub descripcion: Option<String>,
    pub contenido_base64: String,
}

/// Uniform read view over both document tables. Storage paths stay internal.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct Documento {
    pub id: Id,
    pub caso_id: Id,
    pub origen: DocumentoOrigen,
    pub tipo_documento: String,
    pub nombre_archivo: String,
    pub tamano_archivo: i64,
    pub descripcion: Option<String>,
}

impl From<documentos_cliente::Model> for Documento {
    fn from(model: documentos_cliente::Model) -> Self {
        Self {
            id: model.id,
            caso_id: model.caso_id,
            origen: DocumentoOrigen::Cliente,
            tipo_documento: model.tipo_documento,
            nombre_archivo: model.nombre_archivo,
            tamano_archivo: model.tamano_archivo,
            descripcion: model.descripcion,
        }
    }
}

impl From<documentos_abogado::Model> for Documento {
    fn from(model: documentos_abogado::Model) -> Self {
        Self {
            id: model.id,
            caso_id: model.caso_id,
            origen: DocumentoOrigen::Abogado,
            tipo_documento: model.tipo_documento,
            nombre_archivo: model.nombre_archivo,
            tamano_archivo: model.tamano_archivo,
            descripcion: model.descripcion,
        }
    }
}

fn extension_of(nombre_archivo: &str) -> Option<String> {
    nombre_archivo
        .rsplit_once('.')
        .map(|(_, ext)| ext.to_ascii_lowercase())
        .filter(|ext| !ext.is_empty())
}

/// Size and extension checks for an upload.
pub(crate) fn validate_upload(nombre_archivo: &str, bytes: &[u8]) -> Result<(), Error> {
    if bytes.is_empty() {
        return Err(Error::validation("el archivo está vacío"));
    }
    if bytes.len() > MAX_DOCUMENT_BYTES {
        return Err(Error::validation("el archivo supera el tamaño máximo"));
    }
    match extension_of(nombre_archivo) {
        Some(ext) if ALLOWED_EXTENSIONS.contains(&ext.as_str()) => Ok(()),
        _ => Err(Error::validation("tipo de archivo no permitido")),
    }
}

/// Content-addressed blob path: the digest prefix makes re-uploads of the
/// same bytes land on the same object and keeps names collision-free.
pub(crate) fn content_path(caso_id: Id, nombre_archivo: &str, bytes: &[u8]) -> String {
    let digest = Sha256::digest(bytes);
    format!("casos/{}/{}_{}", caso_id, hex::encode(&digest[..8]), nombre_archivo)
}

/// Stores an upload and inserts its metadata row in the table matching the
/// uploader's role.
pub async fn attach(
    db: &DatabaseConnection,
    config: &Config,
    actor: &profiles::Model,
    caso_id: Id,
    nuevo: NuevoDocumento,
) -> Result<Documento, Error> {
    let caso = caso::find_by_id(db, caso_id).await?;
    access::ensure_access(db, actor, &caso, Operation::AttachDocument).await?;
    caso::ensure_mutable(&caso)?;

    let bytes = BASE64
        .decode(nuevo.contenido_base64.as_bytes())
        .map_err(|_| Error::validation("contenido_base64 no es base64 válido"))?;
    validate_upload(&nuevo.nombre_archivo, &bytes)?;

    let ruta_archivo = content_path(caso_id, &nuevo.nombre_archivo, &bytes);
    let tamano_archivo = bytes.len() as i64;

    let blob_store = BlobStoreClient::new(config)?;
    blob_store.put_object(&ruta_archivo, bytes).await?;

    let now = chrono::Utc::now();
    let documento: Documento = match actor.role {
        Role::Cliente => documento_cliente::create(
            db,
            documentos_cliente::Model {
                id: Id::new_v4(),
                caso_id,
                cliente_id: actor.id,
                tipo_documento: nuevo.tipo_documento,
                nombre_archivo: nuevo.nombre_archivo,
                ruta_archivo,
                tamano_archivo,
                descripcion: nuevo.descripcion,
                created_at: now.into(),
                updated_at: now.into(),
            },
        )
        .await?
        .into(),
        Role::Abogado => documento_abogado::create(
            db,
            documentos_abogado::Model {
                id: Id::new_v4(),
                caso_id,
                abogado_id: actor.id,
                tipo_documento: nuevo.tipo_documento,
                nombre_archivo: nuevo.nombre_archivo,
                ruta_archivo,
                tamano_archivo,
                descripcion: nuevo.descripcion,
                created_at: now.into(),
                updated_at: now.into(),
            },
        )
        .await?
        .into(),
    };

    auditoria::record(
        db,
        Some(actor.id),
        "documento_adjuntado",
        Some(match documento.origen {
            DocumentoOrigen::Cliente => "documentos_cliente",
            DocumentoOrigen::Abogado => "documentos_abogado",
        }),
        Some(documento.id),
        None,
    )
    .await?;

    Ok(documento)
}

struct LoadedDocumento {
    documento: Documento,
    ruta_archivo: String,
}

async fn load(
    db: &DatabaseConnection,
    origen: DocumentoOrigen,
    documento_id: Id,
) -> Result<LoadedDocumento, Error> {
    match origen {
        DocumentoOrigen::Cliente => {
            let model = documento_cliente::find_by_id(db, documento_id).await?;
            Ok(LoadedDocumento {
                ruta_archivo: model.ruta_archivo.clone(),
                documento: model.into(),
            })
        }
        DocumentoOrigen::Abogado => {
            let model = documento_abogado::find_by_id(db, documento_id).await?;
            Ok(LoadedDocumento {
                ruta_archivo: model.ruta_archivo.clone(),
                documento: model.into(),
            })
        }
    }
}

/// Metadata view of a single document, used by the route guards to resolve
/// the owning caso.
pub async fn find_by_id(
    db: &DatabaseConnection,
    origen: DocumentoOrigen,
    documento_id: Id,
) -> Result<Documento, Error> {
    Ok(load(db, origen, documento_id).await?.documento)
}

/// Mints a fresh time-limited signed URL for a document view/download.
pub async fn signed_url(
    db: &DatabaseConnection,
    config: &Config,
    actor: &profiles::Model,
    origen: DocumentoOrigen,
    documento_id: Id,
) -> Result<String, Error> {
    let loaded = load(db, origen, documento_id).await?;

    let caso = caso::find_by_id(db, loaded.documento.caso_id).await?;
    access::ensure_access(db, actor, &caso, Operation::Read).await?;

    let blob_store = BlobStoreClient::new(config)?;
    blob_store
        .create_signed_url(&loaded.ruta_archivo, config.signed_url_expiry_secs)
        .await
}

/// Deletes a document: the gate is re-checked against the DOCUMENT's caso
/// before anything is removed, then the blob goes first and the metadata row
/// second. A denied gate leaves both blob and row intact.
pub async fn delete(
    db: &DatabaseConnection,
    config: &Config,
    actor: &profiles::Model,
    origen: DocumentoOrigen,
    documento_id: Id,
) -> Result<(), Error> {
    let loaded = load(db, origen, documento_id).await?;

    let caso = caso::find_by_id(db, loaded.documento.caso_id).await?;
    access::ensure_access(db, actor, &caso, Operation::DeleteDocument).await?;

    let blob_store = BlobStoreClient::new(config)?;
    blob_store.delete_object(&loaded.ruta_archivo).await?;

    match origen {
        DocumentoOrigen::Cliente => documento_cliente::delete(db, documento_id).await?,
        DocumentoOrigen::Abogado => documento_abogado::delete(db, documento_id).await?,
    }

    auditoria::record(
        db,
        Some(actor.id),
        "documento_eliminado",
        Some(match origen {
            DocumentoOrigen::Cliente => "documentos_cliente",
            DocumentoOrigen::Abogado => "documentos_abogado",
        }),
        Some(documento_id),
        None,
    )
    .await?;

    info!("Documento {documento_id:?} eliminado por {:?}", actor.id);

    Ok(())
}

/// All documents of a caso, both origins merged, gated on caso read access.
pub async fn find_by_caso(
    db: &DatabaseConnection,
    actor: &profiles::Model,
    caso_id: Id,
) -> Result<Vec<Documento>, Error> {
    let caso = caso::find_by_id(db, caso_id).await?;
    access::ensure_access(db, actor, &caso, Operation::Read).await?;

    let mut documentos: Vec<Documento> = documento_cliente::find_by_caso(db, caso_id)
        .await?
        .into_iter()
        .map(Into::into)
        .collect();
    documentos.extend(
        documento_abogado::find_by_caso(db, caso_id)
            .await?
            .into_iter()
            .map(Documento::from),
    );

    Ok(documentos)
}

#[cfg(test)]
// We need to gate seaORM's mock feature behind conditional compilation because
// the feature removes the Clone trait implementation from seaORM's DatabaseConnection.
// see https://github.com/SeaQL/sea-orm/issues/830
#[cfg(feature = "mock")]
mod mock_tests {
    use super::*;
    use crate::error::{DomainErrorKind, InternalErrorKind};
    use entity::case_status::CaseStatus;
    use entity::roles::{LawyerType, Role};
    use sea_orm::{DatabaseBackend, MockDatabase};
    use serial_test::serial;
    use service::config::Config;

    #[tokio::test]
    #[serial]
    async fn delete_by_unrelated_lawyer_is_denied_before_any_removal() {
        let now = chrono::Utc::now();
        let caso_id = Id::new_v4();

        let documento = documentos_cliente::Model {
            id: Id::new_v4(),
            caso_id,
            cliente_id: Id::new_v4(),
            tipo_documento: "contrato".to_string(),
            nombre_archivo: "contrato.pdf".to_string(),
            ruta_archivo: format!("casos/{caso_id}/abc_contrato.pdf"),
            tamano_archivo: 1024,
            descripcion: None,
            created_at: now.into(),
            updated_at: now.into(),
        };

        let caso = entity::casos::Model {
            id: caso_id,
            cliente_id: Some(documento.cliente_id),
            nombre_borrador: None,
            email_borrador: None,
            telefono_borrador: None,
            especialidad_id: None,
            motivo_consulta: "Consulta".to_string(),
            estado: CaseStatus::Asignado,
            checkout_session_id: None,
            fecha_cierre: None,
            cerrado_por: None,
            created_at: now.into(),
            updated_at: now.into(),
        };

        // A regular lawyer with no assignment linking them to the caso
        let abogado_ajeno = profiles::Model {
            id: Id::new_v4(),
            email: "otro@example.com".to_string(),
            nombre: "Otro".to_string(),
            apellido: "Abogado".to_string(),
            password: "hash".to_string(),
            role: Role::Abogado,
            tipo_abogado: Some(LawyerType::Regular),
            creditos_disponibles: 0,
            nombre_bufete: None,
            created_at: now.into(),
            updated_at: now.into(),
        };

        let db = MockDatabase::new(DatabaseBackend::Postgres)
            // documento lookup
            .append_query_results(vec![vec![documento]])
            // caso lookup
            .append_query_results(vec![vec![caso]])
            // no assignment row links this lawyer to the caso
            .append_query_results(vec![Vec::<entity::asignaciones_casos::Model>::new()])
            .into_connection();

        let config = Config::default();

        let result = delete(
            &db,
            &config,
            &abogado_ajeno,
            DocumentoOrigen::Cliente,
            Id::new_v4(),
        )
        .await;

        // Denied before the blob store client is even constructed, so neither
        // the blob nor the metadata row is touched.
        assert_eq!(
            result.unwrap_err().error_kind,
            DomainErrorKind::Internal(InternalErrorKind::AccessDenied)
        );
    }
}
