//! Business (tenant) records

use serde::{Deserialize, Serialize};

use super::{lenient, RecordId, Resource};
use crate::validation::{Checker, Validate, ValidationErrors};

/// A business customer account. Most other resources belong to one.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Business {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<RecordId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub legal_name: Option<String>,
    /// Employer identification number
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ein: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    /// IANA timezone name (e.g. "America/New_York")
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timezone: Option<String>,
    #[serde(
        deserialize_with = "lenient::opt_f64",
        skip_serializing_if = "Option::is_none"
    )]
    pub minimum_wage: Option<f64>,
    #[serde(
        deserialize_with = "lenient::opt_bool",
        skip_serializing_if = "Option::is_none"
    )]
    pub active: Option<bool>,
}

impl Resource for Business {
    const PATH: &'static str = "businesses";
    const SINGULAR: &'static str = "business";
    const COLLECTION_KEYS: &'static [&'static str] = &["businesses"];
    const LABEL: &'static str = "Business";
    const TENANT_SCOPED: bool = false;

    fn id(&self) -> Option<&RecordId> {
        self.id.as_ref()
    }
}

impl Validate for Business {
    fn validate(&self) -> Result<(), ValidationErrors> {
        Checker::new()
            .required_str("name", self.name.as_deref())
            .at_least("minimum_wage", self.minimum_wage, 0.0)
            .email("email", self.email.as_deref())
            .finish()
    }
}
