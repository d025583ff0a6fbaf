//! Multipart Uploads
//!
//! Employee registration and time-clock punches carry a photograph.
//! Images are sent as-is; any resizing happens before they reach here.

use reqwest::multipart::{Form, Part};
use std::path::Path;

use super::ClientError;
use crate::models::{Employee, RecordId};
use crate::summary::PunchKind;
use crate::validation::{Checker, Validate, ValidationErrors};

/// An image attached to a multipart request
#[derive(Debug, Clone, PartialEq)]
pub struct Photo {
    pub file_name: String,
    pub mime_type: String,
    pub bytes: Vec<u8>,
}

impl Photo {
    pub fn new(file_name: impl Into<String>, mime_type: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            file_name: file_name.into(),
            mime_type: mime_type.into(),
            bytes,
        }
    }

    /// Read a photo from disk, guessing its type from the extension
    pub async fn from_path(path: &Path) -> Result<Self, ClientError> {
        let bytes = tokio::fs::read(path).await?;
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| "photo".to_string());
        let mime_type = mime_for(path).to_string();

        Ok(Self {
            file_name,
            mime_type,
            bytes,
        })
    }

    fn into_part(self) -> Result<Part, ClientError> {
        Ok(Part::bytes(self.bytes)
            .file_name(self.file_name)
            .mime_str(&self.mime_type)?)
    }
}

fn mime_for(path: &Path) -> &'static str {
    let ext = path
        .extension()
        .map(|e| e.to_string_lossy().to_lowercase())
        .unwrap_or_default();
    match ext.as_str() {
        "jpg" | "jpeg" => "image/jpeg",
        "png" => "image/png",
        "webp" => "image/webp",
        "gif" => "image/gif",
        "heic" => "image/heic",
        _ => "application/octet-stream",
    }
}

/// A time-clock punch submitted from the console
#[derive(Debug, Clone)]
pub struct PunchRequest {
    pub employee_id: RecordId,
    pub kind: PunchKind,
    pub notes: Option<String>,
    pub photo: Option<Photo>,
}

impl PunchRequest {
    pub fn new(employee_id: RecordId, kind: PunchKind) -> Self {
        Self {
            employee_id,
            kind,
            notes: None,
            photo: None,
        }
    }

    /// Builder method: attach notes
    pub fn notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = Some(notes.into());
        self
    }

    /// Builder method: attach a photo
    pub fn photo(mut self, photo: Photo) -> Self {
        self.photo = Some(photo);
        self
    }

    pub(crate) fn into_form(self) -> Result<Form, ClientError> {
        let mut form = Form::new()
            .text("employee_id", self.employee_id.to_string())
            .text("punch_type", self.kind.as_str());

        if let Some(notes) = self.notes {
            form = form.text("notes", notes);
        }
        if let Some(photo) = self.photo {
            form = form.part("photo", photo.into_part()?);
        }

        Ok(form)
    }
}

impl Validate for PunchRequest {
    fn validate(&self) -> Result<(), ValidationErrors> {
        Checker::new()
            .required_str("employee_id", Some(self.employee_id.as_str()))
            .finish()
    }
}

/// Multipart body for employee registration: the record as JSON in `data`
/// plus an optional `photo`
pub(crate) fn registration_form(employee: &Employee, photo: Option<Photo>) -> Result<Form, ClientError> {
    let data = serde_json::to_string(employee)?;
    let mut form = Form::new().text("data", data);
    if let Some(photo) = photo {
        form = form.part("photo", photo.into_part()?);
    }
    Ok(form)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_mime_guess() {
        assert_eq!(mime_for(Path::new("face.JPG")), "image/jpeg");
        assert_eq!(mime_for(Path::new("face.png")), "image/png");
        assert_eq!(mime_for(Path::new("face")), "application/octet-stream");
    }

    #[tokio::test]
    async fn test_photo_from_path() {
        let mut file = tempfile::Builder::new().suffix(".webp").tempfile().unwrap();
        file.write_all(b"RIFF0000WEBP").unwrap();

        let photo = Photo::from_path(file.path()).await.unwrap();
        assert_eq!(photo.mime_type, "image/webp");
        assert_eq!(photo.bytes, b"RIFF0000WEBP");
        assert!(photo.file_name.ends_with(".webp"));
    }

    #[test]
    fn test_punch_request_validation() {
        let ok = PunchRequest::new(RecordId::from(3), PunchKind::CheckIn).notes("front door");
        assert!(ok.validate().is_ok());
        assert!(ok.into_form().is_ok());

        let blank = PunchRequest::new(RecordId::new("  "), PunchKind::CheckOut);
        assert!(blank.validate().unwrap_err().has_field("employee_id"));
    }
}
