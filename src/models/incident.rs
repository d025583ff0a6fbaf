//! Incident records (tips, bonuses, penalties)

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::{lenient, RecordId, Resource};
use crate::validation::{Checker, Validate, ValidationErrors};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IncidentType {
    Tip,
    Bonus,
    Penalty,
    Other,
}

impl std::fmt::Display for IncidentType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            IncidentType::Tip => write!(f, "tip"),
            IncidentType::Bonus => write!(f, "bonus"),
            IncidentType::Penalty => write!(f, "penalty"),
            IncidentType::Other => write!(f, "other"),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Incident {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<RecordId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub business_id: Option<RecordId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub employee_id: Option<RecordId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub incident_type: Option<IncidentType>,
    #[serde(
        deserialize_with = "lenient::opt_f64",
        skip_serializing_if = "Option::is_none"
    )]
    pub amount: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(
        deserialize_with = "lenient::opt_date",
        skip_serializing_if = "Option::is_none"
    )]
    pub date: Option<NaiveDate>,
}

impl Resource for Incident {
    const PATH: &'static str = "incidents";
    const SINGULAR: &'static str = "incident";
    const COLLECTION_KEYS: &'static [&'static str] = &["incidents"];
    const LABEL: &'static str = "Incident";

    fn id(&self) -> Option<&RecordId> {
        self.id.as_ref()
    }
}

impl Validate for Incident {
    fn validate(&self) -> Result<(), ValidationErrors> {
        Checker::new()
            .required("employee_id", self.employee_id.as_ref())
            .required("incident_type", self.incident_type.as_ref())
            .at_least("amount", self.amount, 0.0)
            .finish()
    }
}
