//! Form Validation
//!
//! Client-side checks run before any create/update request leaves the
//! process. A record that fails validation is never sent.

use regex::Regex;
use std::sync::OnceLock;
use thiserror::Error;

/// Largest accepted gap between `cash_wage + tip_credit` and `minimum_wage`
pub const WAGE_TOLERANCE: f64 = 0.005;

/// A single field-level validation failure
#[derive(Debug, Clone, PartialEq)]
pub struct FieldError {
    pub field: &'static str,
    pub message: String,
}

impl std::fmt::Display for FieldError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// All validation failures for one record
#[derive(Debug, Clone, PartialEq, Error)]
#[error("{}", join_errors(.errors))]
pub struct ValidationErrors {
    pub errors: Vec<FieldError>,
}

fn join_errors(errors: &[FieldError]) -> String {
    errors
        .iter()
        .map(|e| e.to_string())
        .collect::<Vec<_>>()
        .join("; ")
}

impl ValidationErrors {
    /// Check whether a given field failed
    pub fn has_field(&self, field: &str) -> bool {
        self.errors.iter().any(|e| e.field == field)
    }
}

/// Records that can be checked before submission
pub trait Validate {
    fn validate(&self) -> Result<(), ValidationErrors>;
}

/// Accumulates field errors for one record
#[derive(Debug, Default)]
pub struct Checker {
    errors: Vec<FieldError>,
}

impl Checker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record an arbitrary failure
    pub fn fail(&mut self, field: &'static str, message: impl Into<String>) -> &mut Self {
        self.errors.push(FieldError {
            field,
            message: message.into(),
        });
        self
    }

    /// Field must be present and not blank
    pub fn required_str(&mut self, field: &'static str, value: Option<&str>) -> &mut Self {
        match value {
            Some(v) if !v.trim().is_empty() => self,
            _ => self.fail(field, "is required"),
        }
    }

    /// Field must be present
    pub fn required<T>(&mut self, field: &'static str, value: Option<&T>) -> &mut Self {
        if value.is_none() {
            self.fail(field, "is required");
        }
        self
    }

    /// When present, value must be >= `min`
    pub fn at_least(&mut self, field: &'static str, value: Option<f64>, min: f64) -> &mut Self {
        if let Some(v) = value {
            if !v.is_finite() || v < min {
                self.fail(field, format!("must be at least {}", min));
            }
        }
        self
    }

    /// When present, value must be <= `max`
    pub fn at_most(&mut self, field: &'static str, value: Option<f64>, max: f64) -> &mut Self {
        if let Some(v) = value {
            if !v.is_finite() || v > max {
                self.fail(field, format!("must be at most {}", max));
            }
        }
        self
    }

    /// Value must be present and strictly positive
    pub fn positive(&mut self, field: &'static str, value: Option<f64>) -> &mut Self {
        match value {
            Some(v) if v.is_finite() && v > 0.0 => self,
            Some(_) => self.fail(field, "must be greater than zero"),
            None => self.fail(field, "is required"),
        }
    }

    /// When present and not blank, value must look like an email address
    pub fn email(&mut self, field: &'static str, value: Option<&str>) -> &mut Self {
        if let Some(v) = value.map(str::trim).filter(|v| !v.is_empty()) {
            if !email_pattern().is_match(v) {
                self.fail(field, "is not a valid email address");
            }
        }
        self
    }

    /// When present, value must be one of `allowed`
    pub fn one_of(
        &mut self,
        field: &'static str,
        value: Option<&str>,
        allowed: &[&str],
    ) -> &mut Self {
        if let Some(v) = value {
            if !allowed.contains(&v) {
                self.fail(field, format!("must be one of: {}", allowed.join(", ")));
            }
        }
        self
    }

    pub fn finish(&mut self) -> Result<(), ValidationErrors> {
        if self.errors.is_empty() {
            Ok(())
        } else {
            Err(ValidationErrors {
                errors: std::mem::take(&mut self.errors),
            })
        }
    }
}

fn email_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").expect("email pattern is valid")
    })
}

/// Check the tip-credit wage rule: cash wage + tip credit must equal the
/// minimum wage (to the cent), with every component non-negative.
pub fn check_tip_credit(
    minimum_wage: Option<f64>,
    cash_wage: Option<f64>,
    tip_credit: Option<f64>,
) -> Result<(), ValidationErrors> {
    let mut checker = Checker::new();
    checker
        .positive("minimum_wage", minimum_wage)
        .required("cash_wage", cash_wage.as_ref())
        .at_least("cash_wage", cash_wage, 0.0)
        .required("tip_credit", tip_credit.as_ref())
        .at_least("tip_credit", tip_credit, 0.0);

    if let (Some(min), Some(cash), Some(tip)) = (minimum_wage, cash_wage, tip_credit) {
        if ((cash + tip) - min).abs() > WAGE_TOLERANCE {
            checker.fail(
                "tip_credit",
                format!(
                    "cash wage ({:.2}) + tip credit ({:.2}) must equal minimum wage ({:.2})",
                    cash, tip, min
                ),
            );
        }
    }

    checker.finish()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_required_str_rejects_blank() {
        let err = Checker::new()
            .required_str("name", Some("   "))
            .required_str("other", None)
            .finish()
            .unwrap_err();
        assert_eq!(err.errors.len(), 2);
        assert!(err.has_field("name"));
        assert!(err.has_field("other"));
    }

    #[test]
    fn test_email_format() {
        assert!(Checker::new()
            .email("email", Some("ana@example.com"))
            .finish()
            .is_ok());
        assert!(Checker::new().email("email", Some("")).finish().is_ok());
        assert!(Checker::new()
            .email("email", Some("not-an-email"))
            .finish()
            .is_err());
    }

    #[test]
    fn test_tip_credit_rule() {
        assert!(check_tip_credit(Some(7.25), Some(2.13), Some(5.12)).is_ok());

        let err = check_tip_credit(Some(7.25), Some(2.13), Some(5.00)).unwrap_err();
        assert!(err.has_field("tip_credit"));
        assert!(err.to_string().contains("must equal minimum wage"));
    }

    #[test]
    fn test_tip_credit_rejects_negative_and_missing() {
        let err = check_tip_credit(Some(7.25), Some(-1.0), None).unwrap_err();
        assert!(err.has_field("cash_wage"));
        assert!(err.has_field("tip_credit"));

        let err = check_tip_credit(Some(0.0), Some(0.0), Some(0.0)).unwrap_err();
        assert!(err.has_field("minimum_wage"));
    }

    #[test]
    fn test_error_display_joins_fields() {
        let err = Checker::new()
            .fail("a", "bad")
            .fail("b", "worse")
            .finish()
            .unwrap_err();
        assert_eq!(err.to_string(), "a: bad; b: worse");
    }
}
