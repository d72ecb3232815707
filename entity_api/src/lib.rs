use chrono::Utc;
use password_auth::generate_hash;
use sea_orm::{ActiveModelTrait, DatabaseConnection, Set, Value};
use std::collections::HashMap;

pub use entity::{
    asignaciones_casos, auditoria_seguridad, casos, documentos_abogado, documentos_cliente,
    email_outbox, especialidades, notificaciones, pagos, profiles, solicitudes_abogado,
    stripe_webhook_events, Id,
};

pub mod asignacion;
pub mod auditoria;
pub mod caso;
pub mod documento_abogado;
pub mod documento_cliente;
pub mod email_outbox_item;
pub mod error;
pub mod especialidad;
pub mod mutate;
pub mod notificacion;
pub mod pago;
pub mod profile;
pub mod query;
pub mod solicitud_abogado;
pub mod stripe_webhook_event;

pub(crate) fn uuid_parse_str(uuid_str: &str) -> Result<Id, error::Error> {
    Id::parse_str(uuid_str).map_err(|_| error::Error {
        source: None,
        error_kind: error::EntityApiErrorKind::InvalidQueryTerm,
    })
}

/// `QueryFilterMap` is a data structure that serves as a bridge for translating
/// filter parameters between different layers of the application. It wraps a
/// `HashMap` whose keys are filter parameter names and whose values are
/// optional `sea_orm::Value`s.
///
/// It exists so that web-layer parameter structs can be passed down to the
/// query layer in a type-safe and organized manner.
///
/// # Example
///
/// ```
/// use sea_orm::Value;
/// use entity_api::QueryFilterMap;
///
/// let mut query_filter_map = QueryFilterMap::new();
/// query_filter_map.insert("caso_id".to_string(), Some(Value::String(Some(Box::new("a_caso_id".to_string())))));
/// let filter_value = query_filter_map.get("caso_id");
/// ```
pub struct QueryFilterMap {
    map: HashMap<String, Option<Value>>,
}

impl QueryFilterMap {
    pub fn new() -> Self {
        Self {
            map: HashMap::new(),
        }
    }

    pub fn get(&self, key: &str) -> Option<Value> {
        // HashMap.get returns an Option and so we need to "flatten" this to a single Option
        self.map
            .get(key)
            .and_then(|inner_option| inner_option.clone())
    }

    pub fn insert(&mut self, key: String, value: Option<Value>) {
        self.map.insert(key, value);
    }
}

impl Default for QueryFilterMap {
    fn default() -> Self {
        Self::new()
    }
}

/// `IntoQueryFilterMap` converts a typed parameter struct into a
/// [`QueryFilterMap`]. Implementing it for endpoint param structs defines how
/// their fields map onto filterable columns.
pub trait IntoQueryFilterMap {
    fn into_query_filter_map(self) -> QueryFilterMap;
}

pub async fn seed_database(db: &DatabaseConnection) {
    let now = Utc::now();

    let admin = profiles::ActiveModel {
        email: Set("admin@klamai.com".to_owned()),
        nombre: Set("Admin".to_owned()),
        apellido: Set("KlamAI".to_owned()),
        password: Set(generate_hash("k7mNw#2pQz!vR4sX")),
        role: Set(entity::roles::Role::Abogado),
        tipo_abogado: Set(Some(entity::roles::LawyerType::SuperAdmin)),
        creditos_disponibles: Set(0),
        nombre_bufete: Set(Some("KlamAI".to_owned())),
        created_at: Set(now.into()),
        updated_at: Set(now.into()),
        ..Default::default()
    }
    .save(db)
    .await
    .unwrap();

    let abogada = profiles::ActiveModel {
        email: Set("lucia.fernandez@example.com".to_owned()),
        nombre: Set("Lucía".to_owned()),
        apellido: Set("Fernández".to_owned()),
        password: Set(generate_hash("password")),
        role: Set(entity::roles::Role::Abogado),
        tipo_abogado: Set(Some(entity::roles::LawyerType::Regular)),
        creditos_disponibles: Set(0),
        nombre_bufete: Set(Some("Fernández & Asociados".to_owned())),
        created_at: Set(now.into()),
        updated_at: Set(now.into()),
        ..Default::default()
    }
    .save(db)
    .await
    .unwrap();

    let cliente = profiles::ActiveModel {
        email: Set("marcos.ruiz@example.com".to_owned()),
        nombre: Set("Marcos".to_owned()),
        apellido: Set("Ruiz".to_owned()),
        password: Set(generate_hash("password")),
        role: Set(entity::roles::Role::Cliente),
        tipo_abogado: Set(None),
        creditos_disponibles: Set(3),
        nombre_bufete: Set(None),
        created_at: Set(now.into()),
        updated_at: Set(now.into()),
        ..Default::default()
    }
    .save(db)
    .await
    .unwrap();

    let laboral = especialidades::ActiveModel {
        nombre: Set("Derecho Laboral".to_owned()),
        created_at: Set(now.into()),
        ..Default::default()
    }
    .save(db)
    .await
    .unwrap();

    especialidades::ActiveModel {
        nombre: Set("Derecho Civil".to_owned()),
        created_at: Set(now.into()),
        ..Default::default()
    }
    .save(db)
    .await
    .unwrap();

    // One case already paid and available for assignment
    casos::ActiveModel {
        cliente_id: Set(Some(cliente.id.clone().unwrap())),
        especialidad_id: Set(Some(laboral.id.clone().unwrap())),
        motivo_consulta: Set("Despido sin indemnización tras diez años en la empresa".to_owned()),
        estado: Set(entity::case_status::CaseStatus::Disponible),
        created_at: Set(now.into()),
        updated_at: Set(now.into()),
        ..Default::default()
    }
    .save(db)
    .await
    .unwrap();

    // A case assigned to the regular lawyer
    let caso_asignado = casos::ActiveModel {
        cliente_id: Set(Some(cliente.id.clone().unwrap())),
        especialidad_id: Set(Some(laboral.id.clone().unwrap())),
        motivo_consulta: Set("Reclamación de horas extraordinarias no abonadas".to_owned()),
        estado: Set(entity::case_status::CaseStatus::Asignado),
        created_at: Set(now.into()),
        updated_at: Set(now.into()),
        ..Default::default()
    }
    .save(db)
    .await
    .unwrap();

    asignaciones_casos::ActiveModel {
        caso_id: Set(caso_asignado.id.clone().unwrap()),
        abogado_id: Set(abogada.id.clone().unwrap()),
        asignado_por: Set(Some(admin.id.clone().unwrap())),
        notas_asignacion: Set(Some("Cliente con documentación completa".to_owned())),
        estado: Set(entity::assignment_status::AssignmentStatus::Activa),
        fecha_asignacion: Set(now.into()),
        created_at: Set(now.into()),
        updated_at: Set(now.into()),
        ..Default::default()
    }
    .save(db)
    .await
    .unwrap();

    // A draft still waiting on checkout, invisible to lawyers
    casos::ActiveModel {
        nombre_borrador: Set(Some("Laura".to_owned())),
        email_borrador: Set(Some("laura@example.com".to_owned())),
        motivo_consulta: Set("Consulta sobre contrato de alquiler".to_owned()),
        estado: Set(entity::case_status::CaseStatus::Borrador),
        created_at: Set(now.into()),
        updated_at: Set(now.into()),
        ..Default::default()
    }
    .save(db)
    .await
    .unwrap();
}
