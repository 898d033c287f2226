use bytes::Bytes;

/// A file part received with the registration form. Lives for one request.
#[derive(Debug, Clone)]
pub struct Attachment {
    /// Form field the file was sent under, e.g. `rut`.
    pub field: String,
    /// Filename as supplied by the client, unsanitized.
    pub filename: String,
    pub content_type: Option<String>,
    pub content: Bytes,
}

impl Attachment {
    pub fn size(&self) -> u64 {
        self.content.len() as u64
    }
}
