use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Lifecycle state of a caso.
///
/// `borrador → esperando_pago → disponible → asignado → cerrado`, with
/// `agotado` reachable from `disponible` when consultation credits run out.
/// `cerrado` is terminal.
#[derive(
    Debug, Clone, Copy, Eq, PartialEq, EnumIter, Deserialize, Default, Serialize, DeriveActiveEnum, ToSchema,
)]
#[serde(rename_all = "snake_case")]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "case_status")]
pub enum CaseStatus {
    /// Initial intake state, not yet paid for nor visible to lawyers
    #[sea_orm(string_value = "borrador")]
    #[default]
    Borrador,
    /// A checkout session exists; waiting on the payment provider
    #[sea_orm(string_value = "esperando_pago")]
    EsperandoPago,
    /// Paid and eligible for lawyer assignment
    #[sea_orm(string_value = "disponible")]
    Disponible,
    /// Linked to a lawyer through an active assignment
    #[sea_orm(string_value = "asignado")]
    Asignado,
    /// Consultation credits exhausted
    #[sea_orm(string_value = "agotado")]
    Agotado,
    /// Closed; no further mutation permitted
    #[sea_orm(string_value = "cerrado")]
    Cerrado,
}

impl CaseStatus {
    /// Whether the lifecycle permits moving from `self` to `next`.
    pub fn can_transition_to(&self, next: CaseStatus) -> bool {
        matches!(
            (self, next),
            (CaseStatus::Borrador, CaseStatus::EsperandoPago)
                | (CaseStatus::EsperandoPago, CaseStatus::Disponible)
                | (CaseStatus::Disponible, CaseStatus::Asignado)
                | (CaseStatus::Disponible, CaseStatus::Agotado)
                | (CaseStatus::Disponible, CaseStatus::Cerrado)
                | (CaseStatus::Asignado, CaseStatus::Cerrado)
        )
    }

    /// Terminal states accept no further mutation.
    pub fn is_terminal(&self) -> bool {
        matches!(self, CaseStatus::Cerrado)
    }

    /// States in which a case is visible to the lawyer marketplace.
    pub fn visible_to_lawyers(&self) -> bool {
        matches!(self, CaseStatus::Disponible | CaseStatus::Asignado)
    }
}

impl std::fmt::Display for CaseStatus {
    fn fmt(&self, fmt: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CaseStatus::Borrador => write!(fmt, "borrador"),
            CaseStatus::EsperandoPago => write!(fmt, "esperando_pago"),
            CaseStatus::Disponible => write!(fmt, "disponible"),
            CaseStatus::Asignado => write!(fmt, "asignado"),
            CaseStatus::Agotado => write!(fmt, "agotado"),
            CaseStatus::Cerrado => write!(fmt, "cerrado"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn legal_transitions_are_accepted() {
        assert!(CaseStatus::Borrador.can_transition_to(CaseStatus::EsperandoPago));
        assert!(CaseStatus::EsperandoPago.can_transition_to(CaseStatus::Disponible));
        assert!(CaseStatus::Disponible.can_transition_to(CaseStatus::Asignado));
        assert!(CaseStatus::Disponible.can_transition_to(CaseStatus::Agotado));
        assert!(CaseStatus::Disponible.can_transition_to(CaseStatus::Cerrado));
        assert!(CaseStatus::Asignado.can_transition_to(CaseStatus::Cerrado));
    }

    #[test]
    fn illegal_transitions_are_rejected() {
        assert!(!CaseStatus::Borrador.can_transition_to(CaseStatus::Disponible));
        assert!(!CaseStatus::Borrador.can_transition_to(CaseStatus::Asignado));
        assert!(!CaseStatus::EsperandoPago.can_transition_to(CaseStatus::Asignado));
        assert!(!CaseStatus::Asignado.can_transition_to(CaseStatus::Disponible));
        assert!(!CaseStatus::Agotado.can_transition_to(CaseStatus::Disponible));
    }

    #[test]
    fn cerrado_is_terminal() {
        assert!(CaseStatus::Cerrado.is_terminal());
        for next in [
            CaseStatus::Borrador,
            CaseStatus::EsperandoPago,
            CaseStatus::Disponible,
            CaseStatus::Asignado,
            CaseStatus::Agotado,
        ] {
            assert!(!CaseStatus::Cerrado.can_transition_to(next));
        }
    }

    #[test]
    fn borrador_is_not_visible_to_lawyers() {
        assert!(!CaseStatus::Borrador.visible_to_lawyers());
        assert!(!CaseStatus::EsperandoPago.visible_to_lawyers());
        assert!(CaseStatus::Disponible.visible_to_lawyers());
        assert!(CaseStatus::Asignado.visible_to_lawyers());
    }
}
