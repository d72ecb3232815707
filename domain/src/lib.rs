//! This module re-exports various items from the `entity_api` crate.
//!
//! The purpose of this re-export is to ensure that consumers of the `domain` crate do not need to
//! directly depend on the `entity_api` crate. By re-exporting these items, we provide a clear and
//! consistent interface for working with query filters within the domain layer, while the
//! underlying implementation details remain in the `entity_api` crate.
pub use entity_api::{
    mutate::{IntoUpdateMap, UpdateMap},
    IntoQueryFilterMap, QueryFilterMap,
};

// Re-exports from `entity` crate via `entity_api`
pub use entity_api::{
    asignaciones_casos, auditoria_seguridad, casos, documentos_abogado, documentos_cliente,
    email_outbox, especialidades, notificaciones, pagos, profiles, solicitudes_abogado,
    stripe_webhook_events, Id,
};
pub use entity::{
    assignment_status, case_status, outbox_status, payment_status, roles, solicitud_status,
};

pub mod access;
pub mod asignacion;
pub mod caso;
pub mod documento;
pub mod emails;
pub mod error;
pub mod especialidad;
pub mod notificacion;
pub mod outbox;
pub mod pago;
pub mod profile;
pub mod solicitud_abogado;

pub mod gateway;
