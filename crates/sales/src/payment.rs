//! How a glasses sale is paid.

use serde::{Deserialize, Serialize};

use opticpos_core::{DomainError, DomainResult, ValueObject};

vocabulary! {
    /// Accepted payment methods.
    pub enum PaymentMethod ("payment method") {
        Credit => "Crédito",
        Debit => "Débito",
        Pix => "Pix",
        Cash => "Dinheiro",
    }
}

/// Stored label for a single payment.
pub const LUMP_SUM: &str = "lump-sum";
/// Stored label for a payment split over several installments.
pub const INSTALLMENTS: &str = "installments";

/// Fewest installments a split payment can have.
pub const MIN_INSTALLMENTS: u32 = 2;
/// Most installments the shop offers (2x, 3x or 4x).
pub const MAX_INSTALLMENTS: u32 = 4;

/// Payment schedule of a glasses sale.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum InstallmentPlan {
    /// Paid at once (stored with an installment count of 1).
    #[default]
    LumpSum,
    /// Paid in 2 to 4 installments.
    Installments(u32),
}

impl InstallmentPlan {
    /// Build a plan from its stored/form parts.
    ///
    /// A missing type means lump-sum. The count is ignored for lump-sum and
    /// must be between [`MIN_INSTALLMENTS`] and [`MAX_INSTALLMENTS`] for
    /// installments.
    pub fn from_parts(installment_type: Option<&str>, count: Option<u32>) -> DomainResult<Self> {
        match installment_type.map(str::trim).filter(|t| !t.is_empty()) {
            None | Some(LUMP_SUM) => Ok(Self::LumpSum),
            Some(INSTALLMENTS) => match count {
                Some(n) if (MIN_INSTALLMENTS..=MAX_INSTALLMENTS).contains(&n) => {
                    Ok(Self::Installments(n))
                }
                Some(n) => Err(DomainError::validation(format!(
                    "installment count must be between {MIN_INSTALLMENTS} and {MAX_INSTALLMENTS}, got {n}"
                ))),
                None => Err(DomainError::validation(
                    "installment count is required for installments",
                )),
            },
            Some(other) => Err(DomainError::validation(format!(
                "installment type must be {LUMP_SUM:?} or {INSTALLMENTS:?}, got {other:?}"
            ))),
        }
    }

    pub fn installment_type(&self) -> &'static str {
        match self {
            Self::LumpSum => LUMP_SUM,
            Self::Installments(_) => INSTALLMENTS,
        }
    }

    pub fn installment_count(&self) -> u32 {
        match self {
            Self::LumpSum => 1,
            Self::Installments(n) => *n,
        }
    }
}

impl ValueObject for InstallmentPlan {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn payment_methods_parse_from_stored_labels() {
        assert_eq!(PaymentMethod::parse("Pix").unwrap(), PaymentMethod::Pix);
        assert_eq!(PaymentMethod::parse(" Crédito ").unwrap(), PaymentMethod::Credit);
        assert_eq!(PaymentMethod::Cash.as_str(), "Dinheiro");
        assert_eq!(PaymentMethod::ALL.len(), 4);
    }

    #[test]
    fn unknown_payment_method_is_rejected() {
        let err = PaymentMethod::parse("Boleto").unwrap_err();
        match err {
            DomainError::Validation(msg) => assert!(msg.contains("payment method")),
            _ => panic!("Expected Validation error for unknown payment method"),
        }
        assert!(PaymentMethod::parse("").is_err());
    }

    #[test]
    fn payment_method_serializes_as_label() {
        let json = serde_json::to_string(&PaymentMethod::Debit).unwrap();
        assert_eq!(json, "\"Débito\"");
    }

    #[test]
    fn lump_sum_ignores_count() {
        let plan = InstallmentPlan::from_parts(Some("lump-sum"), Some(7)).unwrap();
        assert_eq!(plan, InstallmentPlan::LumpSum);
        assert_eq!(plan.installment_count(), 1);
        assert_eq!(InstallmentPlan::from_parts(None, None).unwrap(), InstallmentPlan::LumpSum);
    }

    #[test]
    fn installments_require_at_least_two() {
        assert_eq!(
            InstallmentPlan::from_parts(Some("installments"), Some(3)).unwrap(),
            InstallmentPlan::Installments(3)
        );
        assert!(matches!(
            InstallmentPlan::from_parts(Some("installments"), Some(1)),
            Err(DomainError::Validation(_))
        ));
        assert!(matches!(
            InstallmentPlan::from_parts(Some("installments"), None),
            Err(DomainError::Validation(_))
        ));
    }

    #[test]
    fn installments_are_capped_at_four() {
        assert_eq!(
            InstallmentPlan::from_parts(Some("installments"), Some(4)).unwrap(),
            InstallmentPlan::Installments(4)
        );
        let err = InstallmentPlan::from_parts(Some("installments"), Some(5)).unwrap_err();
        match err {
            DomainError::Validation(msg) => assert!(msg.contains("between 2 and 4")),
            _ => panic!("Expected Validation error for too many installments"),
        }
        assert!(InstallmentPlan::from_parts(Some("installments"), Some(12)).is_err());
    }

    #[test]
    fn unknown_installment_type_is_rejected() {
        assert!(matches!(
            InstallmentPlan::from_parts(Some("monthly"), Some(2)),
            Err(DomainError::Validation(_))
        ));
    }
}
