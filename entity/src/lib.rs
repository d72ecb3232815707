use uuid::Uuid;

// Core entities
pub mod asignaciones_casos;
pub mod casos;
pub mod documentos_abogado;
pub mod documentos_cliente;
pub mod especialidades;
pub mod notificaciones;
pub mod pagos;
pub mod profiles;
pub mod solicitudes_abogado;

// Billing / delivery infrastructure entities
pub mod auditoria_seguridad;
pub mod email_outbox;
pub mod stripe_webhook_events;

// Typed status enums
pub mod assignment_status;
pub mod case_status;
pub mod outbox_status;
pub mod payment_status;
pub mod roles;
pub mod solicitud_status;

/// A type alias that represents any Entity's internal id field data type.
/// Aliased so that it's easy to change the underlying type if necessary.
pub type Id = Uuid;
