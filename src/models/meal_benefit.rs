//! Meal-benefit credit configuration

use serde::{Deserialize, Serialize};

use super::{lenient, RecordId, Resource};
use crate::validation::{Checker, Validate, ValidationErrors};

/// A taxable credit added to payroll when an employee works at least
/// `min_hours` in a day.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MealBenefitConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<RecordId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub business_id: Option<RecordId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(
        deserialize_with = "lenient::opt_f64",
        skip_serializing_if = "Option::is_none"
    )]
    pub credit_amount: Option<f64>,
    #[serde(
        deserialize_with = "lenient::opt_f64",
        skip_serializing_if = "Option::is_none"
    )]
    pub min_hours: Option<f64>,
    #[serde(
        deserialize_with = "lenient::opt_bool",
        skip_serializing_if = "Option::is_none"
    )]
    pub taxable: Option<bool>,
    #[serde(
        deserialize_with = "lenient::opt_bool",
        skip_serializing_if = "Option::is_none"
    )]
    pub active: Option<bool>,
}

impl MealBenefitConfig {
    /// Whether a day with `worked_hours` earns the credit
    pub fn applies_to(&self, worked_hours: f64) -> bool {
        self.active != Some(false)
            && worked_hours >= self.min_hours.unwrap_or(0.0)
            && worked_hours > 0.0
    }
}

impl Resource for MealBenefitConfig {
    const PATH: &'static str = "meal-benefit-configs";
    const SINGULAR: &'static str = "meal_benefit_config";
    const COLLECTION_KEYS: &'static [&'static str] = &["meal_benefit_configs", "configs"];
    const LABEL: &'static str = "Meal benefit";

    fn id(&self) -> Option<&RecordId> {
        self.id.as_ref()
    }
}

impl Validate for MealBenefitConfig {
    fn validate(&self) -> Result<(), ValidationErrors> {
        Checker::new()
            .required_str("name", self.name.as_deref())
            .required("credit_amount", self.credit_amount.as_ref())
            .at_least("credit_amount", self.credit_amount, 0.0)
            .at_least("min_hours", self.min_hours, 0.0)
            .at_most("min_hours", self.min_hours, 24.0)
            .finish()
    }
}
