use domain::{IntoUpdateMap, UpdateMap};
use sea_orm::Value;
use serde::Deserialize;
use utoipa::ToSchema;

#[derive(Debug, Deserialize, ToSchema)]
pub(crate) struct UpdateParams {
    pub(crate) nombre: Option<String>,
    pub(crate) apellido: Option<String>,
    pub(crate) nombre_bufete: Option<String>,
}

impl IntoUpdateMap for UpdateParams {
    fn into_update_map(self) -> UpdateMap {
        let mut update_map = UpdateMap::new();
        update_map.insert(
            "nombre".to_string(),
            self.nombre.map(|nombre| Value::String(Some(Box::new(nombre)))),
        );
        update_map.insert(
            "apellido".to_string(),
            self.apellido
                .map(|apellido| Value::String(Some(Box::new(apellido)))),
        );
        update_map.insert(
            "nombre_bufete".to_string(),
            self.nombre_bufete
                .map(|bufete| Value::String(Some(Box::new(bufete)))),
        );
        update_map
    }
}
