use chrono::{DateTime, NaiveDate, Utc};

use super::parser::RegistrationForm;
use crate::graph::path::sanitize_segment;
use crate::models::{Attachment, Submission};

/// Text fields recorded in `metadata.json`, in output order.
pub const TEXT_FIELDS: [&str; 15] = [
    "razon_social",
    "tipo_documento",
    "numero_documento",
    "departamento",
    "ciudad",
    "telefonos",
    "correo",
    "tipo_empresa",
    "fecha_constitucion",
    "codigo_ciiu",
    "primer_apellido",
    "segundo_apellido",
    "nombres_rl",
    "tipo_documento_rl",
    "numero_documento_rl",
];

/// File fields uploaded to the vendor folder, in upload order.
pub const ATTACHMENT_FIELDS: [&str; 5] = [
    "camara_comercio",
    "doc_identidad",
    "composicion_accionaria",
    "rut",
    "autorizacion_datos",
];

/// Trimmed values for every catalogue field; missing ones are recorded empty.
pub fn build_submission(form: &RegistrationForm, received_at: DateTime<Utc>) -> Submission {
    let fields = TEXT_FIELDS
        .iter()
        .map(|name| {
            let value = form.field(name).unwrap_or("").trim().to_string();
            (name.to_string(), value)
        })
        .collect();

    Submission::new(fields, received_at)
}

/// Catalogue attachments that carry a filename, in catalogue order.
pub fn select_attachments(form: &RegistrationForm) -> Vec<&Attachment> {
    ATTACHMENT_FIELDS
        .iter()
        .filter_map(|field| form.attachment(field))
        .filter(|a| !a.filename.trim().is_empty())
        .collect()
}

/// Soft checks. Returns warnings (doesn't reject).
pub fn validate(submission: &Submission) -> Vec<String> {
    let mut warnings = Vec::new();

    for name in ["razon_social", "numero_documento"] {
        if submission.get(name).unwrap_or("").is_empty() {
            warnings.push(format!("Required field is empty: {name}"));
        }
    }

    if let Some(correo) = submission.get("correo").filter(|s| !s.is_empty()) {
        let valid = correo
            .split_once('@')
            .is_some_and(|(user, domain)| !user.is_empty() && domain.contains('.'));
        if !valid {
            warnings.push("Invalid email format: correo".to_string());
        }
    }

    if let Some(fecha) = submission.get("fecha_constitucion").filter(|s| !s.is_empty()) {
        if NaiveDate::parse_from_str(fecha, "%Y-%m-%d").is_err() {
            warnings.push("Invalid date format: fecha_constitucion".to_string());
        }
    }

    warnings
}

/// Vendor subfolder: `{numero_documento} - {razon_social}` with placeholders for blanks.
pub fn folder_name(submission: &Submission) -> String {
    let doc = match submission.get("numero_documento").unwrap_or("") {
        "" => format!("sin_doc_{}", submission.timestamp_utc.timestamp()),
        doc => doc.to_string(),
    };
    let razon = match submission.get("razon_social").unwrap_or("") {
        "" => "sin_razon",
        razon => razon,
    };

    format!("{} - {}", sanitize_segment(&doc), sanitize_segment(razon))
}
