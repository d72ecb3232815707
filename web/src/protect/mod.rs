//! Route-level authorization middlewares.
//!
//! These are thin adapters between the router and the single authorization
//! authority in `domain::access`: each middleware loads the path's resource,
//! asks the gate for a decision, and translates the outcome to 403/404. None
//! of them carries its own rules, so every route is governed by the same
//! precedence (super admin > assigned lawyer > owning client).

pub(crate) mod casos;
pub(crate) mod documentos;
pub(crate) mod solicitudes_abogado;
