use super::error::Error;
use entity::{
    auditoria_seguridad::{ActiveModel, Model},
    Id,
};
use sea_orm::{entity::prelude::*, Set, TryIntoModel};

/// Appends a security-audit row. Callers pass the acting profile (if any),
/// the action name, and the affected table/record.
pub async fn record(
    db: &impl ConnectionTrait,
    usuario_id: Option<Id>,
    accion: &str,
    tabla_afectada: Option<&str>,
    registro_id: Option<Id>,
    detalle: Option<String>,
) -> Result<Model, Error> {
    let auditoria_active_model = ActiveModel {
        usuario_id: Set(usuario_id),
        accion: Set(accion.to_string()),
        tabla_afectada: Set(tabla_afectada.map(|t| t.to_string())),
        registro_id: Set(registro_id),
        detalle: Set(detalle),
        created_at: Set(chrono::Utc::now().into()),
        ..Default::default()
    };

    Ok(auditoria_active_model.save(db).await?.try_into_model()?)
}
