//! Tip-credit configuration

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::{lenient, RecordId, Resource};
use crate::validation::{check_tip_credit, Validate, ValidationErrors};

/// Wage-law tip credit: tipped employees may be paid `cash_wage`, with
/// reported tips covering the `tip_credit` up to `minimum_wage`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TipCreditConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<RecordId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub business_id: Option<RecordId>,
    #[serde(
        deserialize_with = "lenient::opt_f64",
        skip_serializing_if = "Option::is_none"
    )]
    pub minimum_wage: Option<f64>,
    #[serde(
        deserialize_with = "lenient::opt_f64",
        skip_serializing_if = "Option::is_none"
    )]
    pub cash_wage: Option<f64>,
    #[serde(
        deserialize_with = "lenient::opt_f64",
        skip_serializing_if = "Option::is_none"
    )]
    pub tip_credit: Option<f64>,
    #[serde(
        deserialize_with = "lenient::opt_date",
        skip_serializing_if = "Option::is_none"
    )]
    pub effective_date: Option<NaiveDate>,
    /// Two-letter state code the rule applies in
    #[serde(skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,
}

impl TipCreditConfig {
    /// Tip credit implied by the wages, for pre-filling the form
    pub fn implied_tip_credit(&self) -> Option<f64> {
        match (self.minimum_wage, self.cash_wage) {
            (Some(min), Some(cash)) if min >= cash => Some(((min - cash) * 100.0).round() / 100.0),
            _ => None,
        }
    }
}

impl Resource for TipCreditConfig {
    const PATH: &'static str = "tip-credit-configs";
    const SINGULAR: &'static str = "tip_credit_config";
    const COLLECTION_KEYS: &'static [&'static str] = &["tip_credit_configs", "configs"];
    const LABEL: &'static str = "Tip credit";

    fn id(&self) -> Option<&RecordId> {
        self.id.as_ref()
    }
}

impl Validate for TipCreditConfig {
    fn validate(&self) -> Result<(), ValidationErrors> {
        check_tip_credit(self.minimum_wage, self.cash_wage, self.tip_credit)
    }
}
