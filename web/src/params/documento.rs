use domain::documento::DocumentoOrigen;
use serde::Deserialize;
use utoipa::IntoParams;

/// Discriminates which of the two parallel document tables a path id refers
/// to; carried as a query parameter on document routes.
#[derive(Debug, Deserialize, IntoParams)]
pub(crate) struct OrigenParams {
    pub(crate) origen: DocumentoOrigen,
}
