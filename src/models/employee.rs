//! Employee records

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::{lenient, RecordId, Resource};
use crate::format;
use crate::validation::{Checker, Validate, ValidationErrors};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Employee {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<RecordId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub business_id: Option<RecordId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub position: Option<String>,
    #[serde(
        deserialize_with = "lenient::opt_date",
        skip_serializing_if = "Option::is_none"
    )]
    pub hire_date: Option<NaiveDate>,
    #[serde(
        deserialize_with = "lenient::opt_f64",
        skip_serializing_if = "Option::is_none"
    )]
    pub hourly_rate: Option<f64>,
    /// "hourly" or "salary"
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pay_type: Option<String>,
    #[serde(
        deserialize_with = "lenient::opt_bool",
        skip_serializing_if = "Option::is_none"
    )]
    pub active: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub photo_url: Option<String>,
}

impl Employee {
    /// Display name, falling back to the id when no name is on file
    pub fn display_name(&self) -> String {
        let name = format::full_name(self.first_name.as_deref(), self.last_name.as_deref());
        if name.is_empty() {
            self.id
                .as_ref()
                .map(|id| format!("#{}", id))
                .unwrap_or_default()
        } else {
            name
        }
    }
}

impl Resource for Employee {
    const PATH: &'static str = "employees";
    const SINGULAR: &'static str = "employee";
    const COLLECTION_KEYS: &'static [&'static str] = &["employees"];
    const LABEL: &'static str = "Employee";

    fn id(&self) -> Option<&RecordId> {
        self.id.as_ref()
    }
}

impl Validate for Employee {
    fn validate(&self) -> Result<(), ValidationErrors> {
        Checker::new()
            .required_str("first_name", self.first_name.as_deref())
            .required_str("last_name", self.last_name.as_deref())
            .email("email", self.email.as_deref())
            .at_least("hourly_rate", self.hourly_rate, 0.0)
            .one_of("pay_type", self.pay_type.as_deref(), &["hourly", "salary"])
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn employee(first: &str, last: &str) -> Employee {
        Employee {
            first_name: Some(first.to_string()),
            last_name: Some(last.to_string()),
            ..Default::default()
        }
    }

    #[test]
    fn test_display_name() {
        assert_eq!(employee("Ana", "Ruiz").display_name(), "Ana Ruiz");

        let anonymous = Employee {
            id: Some(RecordId::from(12)),
            ..Default::default()
        };
        assert_eq!(anonymous.display_name(), "#12");
    }

    #[test]
    fn test_validation() {
        assert!(employee("Ana", "Ruiz").validate().is_ok());

        let mut bad = employee("Ana", "");
        bad.email = Some("ana-at-example".to_string());
        bad.hourly_rate = Some(-3.0);
        let err = bad.validate().unwrap_err();
        assert!(err.has_field("last_name"));
        assert!(err.has_field("email"));
        assert!(err.has_field("hourly_rate"));
    }

    #[test]
    fn test_create_body_omits_empty_fields() {
        let body = serde_json::to_value(employee("Ana", "Ruiz")).unwrap();
        assert_eq!(
            body,
            serde_json::json!({"first_name": "Ana", "last_name": "Ruiz"})
        );
    }
}
