use bytes::Bytes;
use chrono::Utc;
use uuid::Uuid;

use crate::graph::types::DriveItem;
use crate::error::AppError;
use crate::graph::path;
use crate::state::SharedState;

use super::fields;
use super::parser::RegistrationForm;

pub const METADATA_FILE: &str = "metadata.json";

pub struct PipelineResult {
    pub submission_id: Uuid,
    /// Drive path of the vendor folder.
    pub folder: String,
    /// Uploaded attachments followed by `metadata.json`.
    pub files: Vec<DriveItem>,
}

/// Store one registration: vendor folder, attachments, then `metadata.json`.
pub async fn run(state: &SharedState, form: RegistrationForm) -> Result<PipelineResult, AppError> {
    let submission = fields::build_submission(&form, Utc::now());

    let warnings = fields::validate(&submission);
    if !warnings.is_empty() {
        tracing::debug!("Validation warnings for submission {}: {:?}", submission.id, warnings);
    }

    let graph = &state.graph;
    let token = graph.access_token().await?;

    let folder = path::join(&state.config.base_folder, &fields::folder_name(&submission));
    graph.ensure_folder_tree(&folder, &token).await?;

    let mut files = Vec::new();
    for attachment in fields::select_attachments(&form) {
        if let Some(item) = graph.upload_any_size(&folder, attachment, &token).await? {
            tracing::info!(
                "Stored {} for submission {} as {} ({} bytes)",
                attachment.field,
                submission.id,
                item.name,
                attachment.size()
            );
            files.push(item);
        }
    }

    let metadata = submission.to_json_bytes()?;
    let item = graph
        .upload_small(
            &path::join(&folder, METADATA_FILE),
            Bytes::from(metadata),
            Some("application/json"),
            &token,
        )
        .await?;
    files.push(item);

    tracing::info!(
        "Submission {} stored in {folder} ({} files)",
        submission.id,
        files.len()
    );

    Ok(PipelineResult {
        submission_id: submission.id,
        folder,
        files,
    })
}
