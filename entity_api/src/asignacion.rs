use super::error::Error;
use entity::{
    asignaciones_casos::{ActiveModel, Column, Entity, Model},
    assignment_status::AssignmentStatus,
    Id,
};
use log::debug;
use sea_orm::{entity::prelude::*, sea_query::OnConflict, QueryOrder, Set};

/// Inserts or refreshes the assignment row keyed by `(caso_id, abogado_id)`.
///
/// The upsert, combined with the partial unique index on active assignments,
/// is what keeps "at most one activa assignment per caso" true even against
/// racing writers.
pub async fn upsert(
    db: &impl ConnectionTrait,
    caso_id: Id,
    abogado_id: Id,
    asignado_por: Id,
    notas_asignacion: Option<String>,
) -> Result<Model, Error> {
    debug!("Upserting asignacion for caso {caso_id:?} and abogado {abogado_id:?}");

    let now = chrono::Utc::now();

    let asignacion_active_model = ActiveModel {
        caso_id: Set(caso_id),
        abogado_id: Set(abogado_id),
        asignado_por: Set(Some(asignado_por)),
        notas_asignacion: Set(notas_asignacion),
        estado: Set(AssignmentStatus::Activa),
        fecha_asignacion: Set(now.into()),
        created_at: Set(now.into()),
        updated_at: Set(now.into()),
        ..Default::default()
    };

    Ok(Entity::insert(asignacion_active_model)
        .on_conflict(
            OnConflict::columns([Column::CasoId, Column::AbogadoId])
                .update_columns([
                    Column::AsignadoPor,
                    Column::NotasAsignacion,
                    Column::Estado,
                    Column::FechaAsignacion,
                    Column::UpdatedAt,
                ])
                .to_owned(),
        )
        .exec_with_returning(db)
        .await?)
}

pub async fn find_active_by_caso(
    db: &impl ConnectionTrait,
    caso_id: Id,
) -> Result<Option<Model>, Error> {
    Ok(Entity::find()
        .filter(Column::CasoId.eq(caso_id))
        .filter(Column::Estado.eq(AssignmentStatus::Activa))
        .one(db)
        .await?)
}

/// The access gate treats both active and completed assignments as evidence
/// that a lawyer is linked to a caso, so this returns either.
pub async fn find_by_caso_and_abogado(
    db: &impl ConnectionTrait,
    caso_id: Id,
    abogado_id: Id,
) -> Result<Option<Model>, Error> {
    Ok(Entity::find()
        .filter(Column::CasoId.eq(caso_id))
        .filter(Column::AbogadoId.eq(abogado_id))
        .one(db)
        .await?)
}

pub async fn find_by_abogado(
    db: &impl ConnectionTrait,
    abogado_id: Id,
) -> Result<Vec<Model>, Error> {
    Ok(Entity::find()
        .filter(Column::AbogadoId.eq(abogado_id))
        .order_by_desc(Column::FechaAsignacion)
        .all(db)
        .await?)
}

/// Flips an assignment to `completada` when the assigned lawyer closes the
/// caso.
pub async fn complete(db: &impl ConnectionTrait, asignacion: Model) -> Result<Model, Error> {
    let mut asignacion_active_model: ActiveModel = asignacion.into();
    asignacion_active_model.estado = Set(AssignmentStatus::Completada);
    asignacion_active_model.updated_at = Set(chrono::Utc::now().into());
    Ok(asignacion_active_model.update(db).await?)
}
