use reqwest::StatusCode;

use super::path;
use super::types::{CreateFolderRequest, DriveItem};
use super::{status_error, GraphClient, GraphError};

impl GraphClient {
    /// Look up the folder at `folder_path`, creating it under its parent when missing.
    ///
    /// Creation uses conflict-rename, so two requests racing on the same name
    /// never overwrite each other.
    pub async fn ensure_folder(&self, folder_path: &str, token: &str) -> Result<DriveItem, GraphError> {
        let resp = self
            .http
            .get(self.item_url(folder_path))
            .bearer_auth(token)
            .send()
            .await?;

        match resp.status() {
            StatusCode::OK => return Ok(resp.json().await?),
            StatusCode::NOT_FOUND => {}
            _ => return Err(status_error(format!("Folder lookup for {folder_path}"), resp).await),
        }

        let (parent, name) = path::split_parent(folder_path);
        let body = CreateFolderRequest {
            name,
            folder: serde_json::Map::new(),
            conflict_behavior: "rename",
        };

        let resp = self
            .http
            .post(self.children_url(parent))
            .bearer_auth(token)
            .json(&body)
            .send()
            .await?;

        if !resp.status().is_success() {
            return Err(status_error(format!("Folder creation for {folder_path}"), resp).await);
        }

        let item: DriveItem = resp.json().await?;
        tracing::info!("Created folder {folder_path} (id={}, name={})", item.id, item.name);
        Ok(item)
    }

    /// Ensure every folder along `folder_path`, outermost first. Returns the innermost.
    pub async fn ensure_folder_tree(&self, folder_path: &str, token: &str) -> Result<DriveItem, GraphError> {
        let mut last = None;
        for prefix in path::prefixes(folder_path) {
            last = Some(self.ensure_folder(&prefix, token).await?);
        }
        last.ok_or_else(|| GraphError::InvalidPath(folder_path.to_string()))
    }
}
