//! The single authorization authority for caso operations.
//!
//! Every mutating entry point routes through this module instead of carrying
//! its own role checks. The decision is a pure function of the actor, the
//! caso, the assignment evidence linking them, and the attempted operation,
//! which keeps the rules unit-testable without a database. `can_access` is
//! the async wrapper that loads the evidence rows and evaluates.
//!
//! Precedence of the rules:
//! 1. A super admin is allowed every operation on every caso.
//! 2. A regular lawyer is allowed only when an `activa` or `completada`
//!    assignment row links them to the caso (and never `Assign`, which is a
//!    staff action).
//! 3. A client is allowed only on their own casos, and never `Assign` or
//!    `Close`.
//! 4. Everything else is denied.

use crate::error::Error;
use entity::{asignaciones_casos, casos, profiles, roles::Role, Id};
use entity_api::{asignacion, caso};
use sea_orm::ConnectionTrait;

/// Operations the gate arbitrates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Read,
    Update,
    Assign,
    Close,
    AttachDocument,
    DeleteDocument,
}

/// Capability decision returned by the gate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    Allowed,
    Denied,
}

impl Decision {
    pub fn is_allowed(&self) -> bool {
        *self == Decision::Allowed
    }
}

/// Pure evaluation of the authorization rules.
///
/// `asignacion` is the assignment row linking `actor` to `caso`, when one
/// exists; callers that already hold it avoid a second lookup.
pub fn evaluate(
    actor: &profiles::Model,
    caso: &casos::Model,
    asignacion: Option<&asignaciones_casos::Model>,
    operation: Operation,
) -> Decision {
    if actor.is_super_admin() {
        return Decision::Allowed;
    }

    match actor.role {
        Role::Abogado => {
            let linked = asignacion
                .map(|a| a.caso_id == caso.id && a.abogado_id == actor.id)
                .unwrap_or(false);
            if linked && operation != Operation::Assign {
                Decision::Allowed
            } else {
                Decision::Denied
            }
        }
        Role::Cliente => {
            let owns = caso.cliente_id == Some(actor.id);
            let permitted = matches!(
                operation,
                Operation::Read
                    | Operation::Update
                    | Operation::AttachDocument
                    | Operation::DeleteDocument
            );
            if owns && permitted {
                Decision::Allowed
            } else {
                Decision::Denied
            }
        }
    }
}

/// Loads the evidence rows for `actor`/`caso_id` and evaluates the gate.
pub async fn can_access(
    db: &impl ConnectionTrait,
    actor: &profiles::Model,
    caso_id: Id,
    operation: Operation,
) -> Result<Decision, Error> {
    let caso = caso::find_by_id(db, caso_id).await?;
    can_access_caso(db, actor, &caso, operation).await
}

/// Gate evaluation for a caso the caller has already loaded.
pub async fn can_access_caso(
    db: &impl ConnectionTrait,
    actor: &profiles::Model,
    caso: &casos::Model,
    operation: Operation,
) -> Result<Decision, Error> {
    // Only regular lawyers need assignment evidence; skip the lookup otherwise.
    let asignacion = if actor.is_regular_lawyer() {
        asignacion::find_by_caso_and_abogado(db, caso.id, actor.id).await?
    } else {
        None
    };
    Ok(evaluate(actor, caso, asignacion.as_ref(), operation))
}

/// Staff-only operations that are not scoped to a caso (application review,
/// platform listings) gate on the super-admin sub-role directly.
pub fn ensure_super_admin(actor: &profiles::Model) -> Result<(), Error> {
    if actor.is_super_admin() {
        Ok(())
    } else {
        Err(Error::access_denied())
    }
}

/// Like [`can_access_caso`] but converts a denial into an `AccessDenied`
/// error, for call sites that have no branch to take on denial.
pub async fn ensure_access(
    db: &impl ConnectionTrait,
    actor: &profiles::Model,
    caso: &casos::Model,
    operation: Operation,
) -> Result<(), Error> {
    match can_access_caso(db, actor, caso, operation).await? {
        Decision::Allowed => Ok(()),
        Decision::Denied => Err(Error::access_denied()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use entity::assignment_status::AssignmentStatus;
    use entity::case_status::CaseStatus;
    use entity::roles::LawyerType;

    fn profile(role: Role, tipo: Option<LawyerType>) -> profiles::Model {
        let now = chrono::Utc::now();
        profiles::Model {
            id: Id::new_v4(),
            email: "actor@example.com".to_string(),
            nombre: "Actor".to_string(),
            apellido: "Prueba".to_string(),
            password: "hash".to_string(),
            role,
            tipo_abogado: tipo,
            creditos_disponibles: 0,
            nombre_bufete: None,
            created_at: now.into(),
            updated_at: now.into(),
        }
    }

    fn caso_of(cliente_id: Option<Id>) -> casos::Model {
        let now = chrono::Utc::now();
        casos::Model {
            id: Id::new_v4(),
            cliente_id,
            nombre_borrador: None,
            email_borrador: None,
            telefono_borrador: None,
            especialidad_id: None,
            motivo_consulta: "Consulta".to_string(),
            estado: CaseStatus::Disponible,
            checkout_session_id: None,
            fecha_cierre: None,
            cerrado_por: None,
            created_at: now.into(),
            updated_at: now.into(),
        }
    }

    fn asignacion_of(
        caso: &casos::Model,
        abogado: &profiles::Model,
        estado: AssignmentStatus,
    ) -> asignaciones_casos::Model {
        let now = chrono::Utc::now();
        asignaciones_casos::Model {
            id: Id::new_v4(),
            caso_id: caso.id,
            abogado_id: abogado.id,
            asignado_por: None,
            notas_asignacion: None,
            estado,
            fecha_asignacion: now.into(),
            created_at: now.into(),
            updated_at: now.into(),
        }
    }

    const ALL_OPERATIONS: [Operation; 6] = [
        Operation::Read,
        Operation::Update,
        Operation::Assign,
        Operation::Close,
        Operation::AttachDocument,
        Operation::DeleteDocument,
    ];

    #[test]
    fn super_admin_is_allowed_every_operation_on_every_caso() {
        let super_admin = profile(Role::Abogado, Some(LawyerType::SuperAdmin));
        let caso = caso_of(Some(Id::new_v4()));

        for operation in ALL_OPERATIONS {
            assert_eq!(
                evaluate(&super_admin, &caso, None, operation),
                Decision::Allowed,
                "super admin denied {operation:?}"
            );
        }
    }

    #[test]
    fn regular_lawyer_without_assignment_is_denied() {
        let abogado = profile(Role::Abogado, Some(LawyerType::Regular));
        let caso = caso_of(Some(Id::new_v4()));

        for operation in ALL_OPERATIONS {
            assert_eq!(
                evaluate(&abogado, &caso, None, operation),
                Decision::Denied,
                "unassigned lawyer allowed {operation:?}"
            );
        }
    }

    #[test]
    fn regular_lawyer_with_active_assignment_is_allowed() {
        let abogado = profile(Role::Abogado, Some(LawyerType::Regular));
        let caso = caso_of(Some(Id::new_v4()));
        let asignacion = asignacion_of(&caso, &abogado, AssignmentStatus::Activa);

        assert_eq!(
            evaluate(&abogado, &caso, Some(&asignacion), Operation::Close),
            Decision::Allowed
        );
        assert_eq!(
            evaluate(&abogado, &caso, Some(&asignacion), Operation::AttachDocument),
            Decision::Allowed
        );
    }

    #[test]
    fn regular_lawyer_with_completed_assignment_keeps_access() {
        let abogado = profile(Role::Abogado, Some(LawyerType::Regular));
        let caso = caso_of(Some(Id::new_v4()));
        let asignacion = asignacion_of(&caso, &abogado, AssignmentStatus::Completada);

        assert_eq!(
            evaluate(&abogado, &caso, Some(&asignacion), Operation::Read),
            Decision::Allowed
        );
    }

    #[test]
    fn regular_lawyer_may_never_assign() {
        let abogado = profile(Role::Abogado, Some(LawyerType::Regular));
        let caso = caso_of(Some(Id::new_v4()));
        let asignacion = asignacion_of(&caso, &abogado, AssignmentStatus::Activa);

        assert_eq!(
            evaluate(&abogado, &caso, Some(&asignacion), Operation::Assign),
            Decision::Denied
        );
    }

    #[test]
    fn assignment_for_a_different_caso_is_not_evidence() {
        let abogado = profile(Role::Abogado, Some(LawyerType::Regular));
        let caso = caso_of(Some(Id::new_v4()));
        let other_caso = caso_of(Some(Id::new_v4()));
        let asignacion = asignacion_of(&other_caso, &abogado, AssignmentStatus::Activa);

        assert_eq!(
            evaluate(&abogado, &caso, Some(&asignacion), Operation::Read),
            Decision::Denied
        );
    }

    #[test]
    fn client_is_allowed_on_own_caso_only() {
        let cliente = profile(Role::Cliente, None);
        let own_caso = caso_of(Some(cliente.id));
        let other_caso = caso_of(Some(Id::new_v4()));

        assert_eq!(
            evaluate(&cliente, &own_caso, None, Operation::Read),
            Decision::Allowed
        );
        assert_eq!(
            evaluate(&cliente, &own_caso, None, Operation::AttachDocument),
            Decision::Allowed
        );
        assert_eq!(
            evaluate(&cliente, &other_caso, None, Operation::Read),
            Decision::Denied
        );
    }

    #[test]
    fn client_may_never_assign_or_close() {
        let cliente = profile(Role::Cliente, None);
        let own_caso = caso_of(Some(cliente.id));

        assert_eq!(
            evaluate(&cliente, &own_caso, None, Operation::Assign),
            Decision::Denied
        );
        assert_eq!(
            evaluate(&cliente, &own_caso, None, Operation::Close),
            Decision::Denied
        );
    }

    #[test]
    fn client_is_denied_on_anonymous_draft() {
        let cliente = profile(Role::Cliente, None);
        let draft = caso_of(None);

        assert_eq!(
            evaluate(&cliente, &draft, None, Operation::Read),
            Decision::Denied
        );
    }
}
