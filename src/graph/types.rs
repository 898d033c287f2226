use serde::{Deserialize, Serialize};

/// Response from the identity provider token endpoint.
#[derive(Debug, Deserialize)]
pub struct TokenResponse {
    pub access_token: Option<String>,
    pub expires_in: Option<u64>,
}

/// Graph `driveItem`, trimmed to what the service reports back.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DriveItem {
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub web_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub folder: Option<serde_json::Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file: Option<serde_json::Value>,
}

impl DriveItem {
    pub fn is_folder(&self) -> bool {
        self.folder.is_some()
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadSession {
    pub upload_url: String,
    #[serde(default)]
    pub expiration_date_time: Option<String>,
}

/// Body for `POST .../children`.
#[derive(Debug, Serialize)]
pub struct CreateFolderRequest<'a> {
    pub name: &'a str,
    pub folder: serde_json::Map<String, serde_json::Value>,
    #[serde(rename = "@microsoft.graph.conflictBehavior")]
    pub conflict_behavior: &'a str,
}

/// Body for `POST .../createUploadSession`.
#[derive(Debug, Serialize)]
pub struct CreateSessionRequest<'a> {
    #[serde(rename = "@microsoft.graph.conflictBehavior")]
    pub conflict_behavior: &'a str,
}
