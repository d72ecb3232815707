use domain::{Id, IntoQueryFilterMap, IntoUpdateMap, QueryFilterMap, UpdateMap};
use sea_orm::Value;
use serde::Deserialize;
use utoipa::{IntoParams, ToSchema};

/// Admin-side listing filters. Only provided fields become query filters.
#[derive(Debug, Deserialize, IntoParams)]
pub(crate) struct IndexParams {
    pub(crate) cliente_id: Option<Id>,
    pub(crate) especialidad_id: Option<Id>,
    pub(crate) estado: Option<String>,
}

impl IndexParams {
    pub(crate) fn is_empty(&self) -> bool {
        self.cliente_id.is_none() && self.especialidad_id.is_none() && self.estado.is_none()
    }
}

impl IntoQueryFilterMap for IndexParams {
    fn into_query_filter_map(self) -> QueryFilterMap {
        let mut query_filter_map = QueryFilterMap::new();
        query_filter_map.insert(
            "cliente_id".to_string(),
            self.cliente_id
                .map(|id| Value::Uuid(Some(Box::new(id)))),
        );
        query_filter_map.insert(
            "especialidad_id".to_string(),
            self.especialidad_id
                .map(|id| Value::Uuid(Some(Box::new(id)))),
        );
        query_filter_map.insert(
            "estado".to_string(),
            self.estado
                .map(|estado| Value::String(Some(Box::new(estado)))),
        );
        query_filter_map
    }
}

#[derive(Debug, Deserialize, ToSchema)]
pub(crate) struct UpdateParams {
    pub(crate) motivo_consulta: Option<String>,
    pub(crate) especialidad_id: Option<Id>,
    pub(crate) telefono_borrador: Option<String>,
}

impl IntoUpdateMap for UpdateParams {
    fn into_update_map(self) -> UpdateMap {
        let mut update_map = UpdateMap::new();
        update_map.insert(
            "motivo_consulta".to_string(),
            self.motivo_consulta
                .map(|motivo| Value::String(Some(Box::new(motivo)))),
        );
        update_map.insert(
            "especialidad_id".to_string(),
            self.especialidad_id
                .map(|id| Value::Uuid(Some(Box::new(id)))),
        );
        update_map.insert(
            "telefono_borrador".to_string(),
            self.telefono_borrador
                .map(|telefono| Value::String(Some(Box::new(telefono)))),
        );
        update_map
    }
}
