//! UI Language
//!
//! The console ships English and Spanish strings for its fixed messages.
//! Server-provided messages are shown untranslated.

use serde::{Deserialize, Serialize};

use crate::summary::PunchKind;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    #[default]
    En,
    Es,
}

/// Fixed user-facing messages
#[derive(Debug, Clone, PartialEq)]
pub enum Message<'a> {
    Created(&'a str),
    Updated(&'a str),
    Deleted(&'a str),
    PunchRecorded(PunchKind),
    EmployeeRegistered,
    ValidationFailed,
    Unavailable,
    Timeout,
    GenericFailure,
}

impl Language {
    /// Parse a language code such as `"en"`, `"ES"` or `"es-MX"`
    pub fn from_code(code: &str) -> Option<Self> {
        let primary = code.trim().split(['-', '_']).next()?.to_lowercase();
        match primary.as_str() {
            "en" => Some(Self::En),
            "es" => Some(Self::Es),
            _ => None,
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            Self::En => "en",
            Self::Es => "es",
        }
    }

    /// Render a fixed message
    pub fn text(&self, message: &Message<'_>) -> String {
        match (self, message) {
            (Self::En, Message::Created(what)) => format!("{} created", what),
            (Self::Es, Message::Created(what)) => format!("{}: creado correctamente", what),
            (Self::En, Message::Updated(what)) => format!("{} updated", what),
            (Self::Es, Message::Updated(what)) => format!("{}: actualizado correctamente", what),
            (Self::En, Message::Deleted(what)) => format!("{} deleted", what),
            (Self::Es, Message::Deleted(what)) => format!("{}: eliminado correctamente", what),
            (_, Message::PunchRecorded(kind)) => match self {
                Self::En => format!("{} recorded", self.punch_label(*kind)),
                Self::Es => format!("{} registrada", self.punch_label(*kind)),
            },
            (Self::En, Message::EmployeeRegistered) => "Employee registered".to_string(),
            (Self::Es, Message::EmployeeRegistered) => "Empleado registrado".to_string(),
            (Self::En, Message::ValidationFailed) => "Please correct the highlighted fields".to_string(),
            (Self::Es, Message::ValidationFailed) => "Corrija los campos marcados".to_string(),
            (Self::En, Message::Unavailable) => "Cannot reach the payroll server".to_string(),
            (Self::Es, Message::Unavailable) => "No se puede conectar con el servidor de nómina".to_string(),
            (Self::En, Message::Timeout) => "The server took too long to respond".to_string(),
            (Self::Es, Message::Timeout) => "El servidor tardó demasiado en responder".to_string(),
            (Self::En, Message::GenericFailure) => "Something went wrong. Please try again.".to_string(),
            (Self::Es, Message::GenericFailure) => "Algo salió mal. Inténtelo de nuevo.".to_string(),
        }
    }

    /// Display label for a punch kind
    pub fn punch_label(&self, kind: PunchKind) -> &'static str {
        match (self, kind) {
            (Self::En, PunchKind::CheckIn) => "Check-in",
            (Self::En, PunchKind::CheckOut) => "Check-out",
            (Self::En, PunchKind::BreakStart) => "Break start",
            (Self::En, PunchKind::BreakEnd) => "Break end",
            (Self::Es, PunchKind::CheckIn) => "Entrada",
            (Self::Es, PunchKind::CheckOut) => "Salida",
            (Self::Es, PunchKind::BreakStart) => "Inicio de descanso",
            (Self::Es, PunchKind::BreakEnd) => "Fin de descanso",
        }
    }
}

impl std::fmt::Display for Language {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.code())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_code() {
        assert_eq!(Language::from_code("en"), Some(Language::En));
        assert_eq!(Language::from_code("ES"), Some(Language::Es));
        assert_eq!(Language::from_code("es-MX"), Some(Language::Es));
        assert_eq!(Language::from_code("fr"), None);
    }

    #[test]
    fn test_messages() {
        assert_eq!(Language::En.text(&Message::Created("Employee")), "Employee created");
        assert_eq!(
            Language::Es.text(&Message::PunchRecorded(PunchKind::CheckIn)),
            "Entrada registrada"
        );
        assert_ne!(
            Language::En.text(&Message::GenericFailure),
            Language::Es.text(&Message::GenericFailure)
        );
    }

    #[test]
    fn test_deserialize() {
        #[derive(Deserialize)]
        struct Ui {
            language: Language,
        }
        let ui: Ui = toml::from_str("language = \"es\"").unwrap();
        assert_eq!(ui.language, Language::Es);
    }
}
