//! Request fragments shared by several handlers.

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Value, json};
use utoipa::ToSchema;

use crate::domain::{Error, PhotoUpload, PrincipalId};

/// Photo file carried inline in a JSON body.
///
/// Example JSON:
/// `{"fileName":"me.jpg","contentType":"image/jpeg","data":"/9j/4AAQ..."}`
#[derive(Debug, Clone, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PhotoPayload {
    /// Original file name; its extension names the stored object.
    pub file_name: String,
    /// MIME type; inferred from the extension when absent.
    #[serde(default)]
    pub content_type: Option<String>,
    /// Standard base64 file contents.
    pub data: String,
}

impl PhotoPayload {
    /// Decode the inline bytes into a staged upload.
    pub fn decode(self) -> Result<PhotoUpload, Error> {
        if self.file_name.trim().is_empty() {
            return Err(invalid_field("photo", "required", "photo file name is required"));
        }
        let bytes = STANDARD.decode(self.data.as_bytes()).map_err(|err| {
            invalid_field("photo", "invalid", &format!("photo data is not base64: {err}"))
        })?;
        Ok(PhotoUpload::new(self.file_name, self.content_type, bytes))
    }
}

/// Parse a principal id taken from the request path.
pub fn principal_from_path(raw: &str) -> Result<PrincipalId, Error> {
    PrincipalId::new(raw).map_err(|err| invalid_field("id", "invalid", &err.to_string()))
}

/// Build a 400 carrying the offending field and a machine-readable code.
pub fn invalid_field(field: &str, code: &str, message: &str) -> Error {
    Error::invalid_request(message).with_details(json!({ "field": field, "code": code }))
}

/// Accept either a JSON string or a JSON number, keeping the typed text.
///
/// Numeric inputs such as age arrive from form fields as either shape.
pub fn text_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::Null => Ok(String::new()),
        Value::String(text) => Ok(text),
        Value::Number(number) => Ok(number.to_string()),
        other => Err(serde::de::Error::custom(format!(
            "expected a string or number, found {other}"
        ))),
    }
}
