//! Pay rate records

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::{lenient, RecordId, Resource};
use crate::validation::{Checker, Validate, ValidationErrors};

/// How a pay rate is expressed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RateType {
    Hourly,
    Salary,
}

impl std::fmt::Display for RateType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RateType::Hourly => write!(f, "hourly"),
            RateType::Salary => write!(f, "salary"),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PayRate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<RecordId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub business_id: Option<RecordId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub employee_id: Option<RecordId>,
    #[serde(
        deserialize_with = "lenient::opt_f64",
        skip_serializing_if = "Option::is_none"
    )]
    pub rate: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rate_type: Option<RateType>,
    #[serde(
        deserialize_with = "lenient::opt_date",
        skip_serializing_if = "Option::is_none"
    )]
    pub effective_date: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl Resource for PayRate {
    const PATH: &'static str = "pay-rates";
    const SINGULAR: &'static str = "pay_rate";
    const COLLECTION_KEYS: &'static [&'static str] = &["pay_rates", "payRates"];
    const LABEL: &'static str = "Pay rate";

    fn id(&self) -> Option<&RecordId> {
        self.id.as_ref()
    }
}

impl Validate for PayRate {
    fn validate(&self) -> Result<(), ValidationErrors> {
        Checker::new()
            .required("employee_id", self.employee_id.as_ref())
            .positive("rate", self.rate)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rate_must_be_positive() {
        let rate = PayRate {
            employee_id: Some(RecordId::from(1)),
            rate: Some(0.0),
            ..Default::default()
        };
        assert!(rate.validate().unwrap_err().has_field("rate"));
    }

    #[test]
    fn test_unknown_rate_type_is_rejected_on_decode() {
        let result: Result<PayRate, _> = serde_json::from_str(r#"{"rate_type": "weekly"}"#);
        assert!(result.is_err());

        let rate: PayRate =
            serde_json::from_str(r#"{"rate": "15.5", "rate_type": "hourly"}"#).unwrap();
        assert_eq!(rate.rate, Some(15.5));
        assert_eq!(rate.rate_type, Some(RateType::Hourly));
    }
}
