use std::collections::HashMap;

use axum::http::HeaderMap;

use crate::models::Attachment;

/// Raw form contents: text fields by name and file parts in arrival order.
#[derive(Debug, Default)]
pub struct RegistrationForm {
    pub fields: HashMap<String, String>,
    pub attachments: Vec<Attachment>,
}

impl RegistrationForm {
    pub fn field(&self, name: &str) -> Option<&str> {
        self.fields.get(name).map(|s| s.as_str())
    }

    /// The first file part sent under `field`.
    pub fn attachment(&self, field: &str) -> Option<&Attachment> {
        self.attachments.iter().find(|a| a.field == field)
    }
}

/// Parse a non-multipart body. Anything that is not multipart is read as
/// urlencoded form data and carries no attachments.
pub fn parse_body(content_type: Option<&str>, body: &[u8]) -> Result<RegistrationForm, String> {
    if content_type.is_some_and(|ct| ct.contains("multipart/form-data")) {
        return Err("multipart".to_string());
    }
    parse_form_urlencoded(body)
}

fn parse_form_urlencoded(body: &[u8]) -> Result<RegistrationForm, String> {
    let body_str = std::str::from_utf8(body).map_err(|e| format!("Invalid UTF-8: {e}"))?;
    let mut fields = HashMap::new();
    for (k, v) in form_urlencoded::parse(body_str.as_bytes()) {
        fields.entry(k.into_owned()).or_insert_with(|| v.into_owned());
    }

    Ok(RegistrationForm {
        fields,
        attachments: Vec::new(),
    })
}

/// Parse multipart form data using multer. Parts with a filename become attachments.
/// A repeated text field keeps its first value.
pub async fn parse_multipart(headers: &HeaderMap, body: bytes::Bytes) -> Result<RegistrationForm, String> {
    let boundary = headers
        .get("content-type")
        .and_then(|v| v.to_str().ok())
        .and_then(|ct| multer::parse_boundary(ct).ok())
        .ok_or_else(|| "Missing multipart boundary".to_string())?;

    let stream = futures_util::stream::once(async { Ok::<_, std::io::Error>(body) });
    let mut multipart = multer::Multipart::new(stream, boundary);

    let mut form = RegistrationForm::default();
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| format!("Multipart error: {e}"))?
    {
        let name = field.name().unwrap_or("unknown").to_string();

        match field.file_name().map(|s| s.to_string()) {
            Some(filename) => {
                let content_type = field.content_type().map(|m| m.to_string());
                let content = field
                    .bytes()
                    .await
                    .map_err(|e| format!("File read error: {e}"))?;
                form.attachments.push(Attachment {
                    field: name,
                    filename,
                    content_type,
                    content,
                });
            }
            None => {
                let value = field
                    .text()
                    .await
                    .map_err(|e| format!("Field read error: {e}"))?;
                form.fields.entry(name).or_insert(value);
            }
        }
    }

    Ok(form)
}
