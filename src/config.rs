use std::net::IpAddr;
use std::time::Duration;

use crate::graph::upload::{CHUNK_ALIGNMENT, DEFAULT_CHUNK_SIZE};

#[derive(Debug, Clone)]
pub struct Config {
    pub host: IpAddr,
    pub port: u16,
    pub base_folder: String,
    pub static_dir: String,
    pub max_body_size: usize,
    pub log_level: String,
    pub graph: GraphConfig,
}

#[derive(Debug, Clone)]
pub struct GraphConfig {
    pub client_id: String,
    pub client_secret: String,
    pub tenant_id: String,
    /// User whose drive receives the uploads. `None` addresses `/me/drive`.
    pub target_user: Option<String>,
    pub api_url: String,
    pub authority_url: String,
    pub chunk_size: u64,
    pub retry_delay: Duration,
    /// Per-request limit for every outbound call, token requests included.
    pub request_timeout: Duration,
}

impl Config {
    pub fn from_env() -> Result<Self, String> {
        let host: IpAddr = env_or("REGISTRO_HOST", "0.0.0.0")
            .parse()
            .map_err(|e| format!("Invalid REGISTRO_HOST: {e}"))?;

        let port: u16 = env_or("PORT", "8000")
            .parse()
            .map_err(|e| format!("Invalid PORT: {e}"))?;

        let base_folder = env_or("REGISTRO_BASE_FOLDER", "Registro")
            .trim_matches('/')
            .to_string();
        if base_folder.is_empty() {
            return Err("REGISTRO_BASE_FOLDER must not be empty".to_string());
        }

        let static_dir = env_or("REGISTRO_STATIC_DIR", "static");

        let max_body_size: usize = env_or("REGISTRO_MAX_BODY_SIZE", "104857600")
            .parse()
            .map_err(|e| format!("Invalid REGISTRO_MAX_BODY_SIZE: {e}"))?;

        let log_level = env_or("REGISTRO_LOG_LEVEL", "info");

        Ok(Config {
            host,
            port,
            base_folder,
            static_dir,
            max_body_size,
            log_level,
            graph: GraphConfig::from_env()?,
        })
    }
}

impl GraphConfig {
    pub fn from_env() -> Result<Self, String> {
        let client_id = env_required("CLIENT_ID")?;
        let client_secret = env_required("CLIENT_SECRET")?;
        let tenant_id = env_required("TENANT_ID")?;

        let target_user = std::env::var("GRAPH_TARGET_USER")
            .ok()
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty());

        let api_url = env_or("GRAPH_API_URL", "https://graph.microsoft.com/v1.0")
            .trim_end_matches('/')
            .to_string();
        let authority_url = env_or("GRAPH_AUTHORITY_URL", "https://login.microsoftonline.com")
            .trim_end_matches('/')
            .to_string();

        let chunk_size: u64 = env_or("REGISTRO_CHUNK_SIZE", &DEFAULT_CHUNK_SIZE.to_string())
            .parse()
            .map_err(|e| format!("Invalid REGISTRO_CHUNK_SIZE: {e}"))?;
        validate_chunk_size(chunk_size)?;

        let retry_delay_ms: u64 = env_or("REGISTRO_RETRY_DELAY_MS", "1000")
            .parse()
            .map_err(|e| format!("Invalid REGISTRO_RETRY_DELAY_MS: {e}"))?;

        let request_timeout_ms: u64 = env_or("REGISTRO_REQUEST_TIMEOUT_MS", "60000")
            .parse()
            .map_err(|e| format!("Invalid REGISTRO_REQUEST_TIMEOUT_MS: {e}"))?;

        Ok(GraphConfig {
            client_id,
            client_secret,
            tenant_id,
            target_user,
            api_url,
            authority_url,
            chunk_size,
            retry_delay: Duration::from_millis(retry_delay_ms),
            request_timeout: Duration::from_millis(request_timeout_ms),
        })
    }
}

/// Upload session ranges must be a positive multiple of 320 KiB.
pub fn validate_chunk_size(chunk_size: u64) -> Result<(), String> {
    if chunk_size == 0 || chunk_size % CHUNK_ALIGNMENT != 0 {
        return Err(format!(
            "Invalid REGISTRO_CHUNK_SIZE: {chunk_size} is not a positive multiple of {CHUNK_ALIGNMENT}"
        ));
    }
    Ok(())
}

fn env_required(key: &str) -> Result<String, String> {
    std::env::var(key)
        .ok()
        .filter(|v| !v.trim().is_empty())
        .ok_or_else(|| format!("Missing required environment variable: {key}"))
}

fn env_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}
