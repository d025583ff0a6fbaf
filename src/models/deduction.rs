//! Payroll deduction records

use serde::{Deserialize, Serialize};

use super::{lenient, RecordId, Resource};
use crate::validation::{Checker, Validate, ValidationErrors};

/// Whether a deduction is taken before or after taxes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeductionKind {
    PreTax,
    PostTax,
}

impl std::fmt::Display for DeductionKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DeductionKind::PreTax => write!(f, "pre_tax"),
            DeductionKind::PostTax => write!(f, "post_tax"),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Deduction {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<RecordId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub business_id: Option<RecordId>,
    /// Absent for deductions applied to every employee of the business
    #[serde(skip_serializing_if = "Option::is_none")]
    pub employee_id: Option<RecordId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub kind: Option<DeductionKind>,
    #[serde(
        deserialize_with = "lenient::opt_f64",
        skip_serializing_if = "Option::is_none"
    )]
    pub amount: Option<f64>,
    /// When set, `amount` is a percentage of gross pay
    #[serde(
        deserialize_with = "lenient::opt_bool",
        skip_serializing_if = "Option::is_none"
    )]
    pub is_percentage: Option<bool>,
    #[serde(
        deserialize_with = "lenient::opt_bool",
        skip_serializing_if = "Option::is_none"
    )]
    pub active: Option<bool>,
}

impl Resource for Deduction {
    const PATH: &'static str = "deductions";
    const SINGULAR: &'static str = "deduction";
    const COLLECTION_KEYS: &'static [&'static str] = &["deductions"];
    const LABEL: &'static str = "Deduction";

    fn id(&self) -> Option<&RecordId> {
        self.id.as_ref()
    }
}

impl Validate for Deduction {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut checker = Checker::new();
        checker
            .required_str("name", self.name.as_deref())
            .required("amount", self.amount.as_ref())
            .at_least("amount", self.amount, 0.0);

        if self.is_percentage == Some(true) {
            checker.at_most("amount", self.amount, 100.0);
        }

        checker.finish()
    }
}
