//! Microsoft Graph drive client.
//!
//! One `GraphClient` is built at start-up and shared by every request. It owns
//! the HTTP client, the cached client-credentials token and the upload tuning.

pub mod folders;
pub mod path;
pub mod token;
pub mod types;
pub mod upload;

use std::time::Duration;

use reqwest::{Client, Response, StatusCode};

use crate::config::GraphConfig;
use token::TokenProvider;

#[derive(Debug)]
pub enum GraphError {
    Auth(String),
    Http(reqwest::Error),
    Status {
        context: String,
        status: StatusCode,
        body: String,
    },
    EmptySource(String),
    InvalidPath(String),
    Upload(String),
    Io(std::io::Error),
}

impl std::fmt::Display for GraphError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GraphError::Auth(msg) => write!(f, "Graph authentication failed: {msg}"),
            GraphError::Http(err) => write!(f, "Graph request failed: {err}"),
            GraphError::Status {
                context,
                status,
                body,
            } => write!(f, "{context} failed ({status}): {body}"),
            GraphError::EmptySource(path) => {
                write!(f, "Cannot open an upload session for empty file: {path}")
            }
            GraphError::InvalidPath(path) => write!(f, "Invalid drive path: {path:?}"),
            GraphError::Upload(msg) => write!(f, "Upload failed: {msg}"),
            GraphError::Io(err) => write!(f, "Failed to read upload source: {err}"),
        }
    }
}

impl std::error::Error for GraphError {}

impl From<reqwest::Error> for GraphError {
    fn from(err: reqwest::Error) -> Self {
        GraphError::Http(err)
    }
}

impl From<std::io::Error> for GraphError {
    fn from(err: std::io::Error) -> Self {
        GraphError::Io(err)
    }
}

pub struct GraphClient {
    http: Client,
    drive_url: String,
    tokens: TokenProvider,
    chunk_size: u64,
    retry_delay: Duration,
}

impl GraphClient {
    pub fn new(config: &GraphConfig) -> Result<Self, GraphError> {
        let http = Client::builder().timeout(config.request_timeout).build()?;

        let drive_url = match &config.target_user {
            Some(user) => format!(
                "{}/users/{}/drive",
                config.api_url,
                urlencoding::encode(user)
            ),
            None => format!("{}/me/drive", config.api_url),
        };

        Ok(Self {
            tokens: TokenProvider::new(http.clone(), config),
            http,
            drive_url,
            chunk_size: config.chunk_size,
            retry_delay: config.retry_delay,
        })
    }

    /// Bearer token for the Graph API, served from cache while it is fresh.
    pub async fn access_token(&self) -> Result<String, GraphError> {
        self.tokens.token().await
    }

    pub fn chunk_size(&self) -> u64 {
        self.chunk_size
    }

    /// `.../drive/root:/{path}`
    fn item_url(&self, drive_path: &str) -> String {
        format!("{}/root:/{}", self.drive_url, path::encode(drive_path))
    }

    /// Children collection of `parent`, or of the drive root.
    fn children_url(&self, parent: Option<&str>) -> String {
        match parent {
            Some(parent) => format!("{}:/children", self.item_url(parent)),
            None => format!("{}/root/children", self.drive_url),
        }
    }
}

/// Turn a non-success response into `GraphError::Status`, keeping the body text.
async fn status_error(context: String, resp: Response) -> GraphError {
    let status = resp.status();
    let body = resp
        .text()
        .await
        .unwrap_or_default()
        .chars()
        .take(1024)
        .collect::<String>();
    GraphError::Status {
        context,
        status,
        body,
    }
}
