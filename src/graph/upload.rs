use std::io::{Cursor, SeekFrom};

use bytes::Bytes;
use reqwest::header::{CONTENT_RANGE, CONTENT_TYPE};
use reqwest::Response;
use tokio::io::{AsyncRead, AsyncReadExt, AsyncSeek, AsyncSeekExt};

use super::path;
use super::types::{CreateSessionRequest, DriveItem, UploadSession};
use super::{status_error, GraphClient, GraphError};
use crate::models::Attachment;

/// Largest file sent as a single PUT.
pub const SMALL_UPLOAD_LIMIT: u64 = 4 * 1024 * 1024;
pub const DEFAULT_CHUNK_SIZE: u64 = 5 * 1024 * 1024;
/// Upload session ranges must be multiples of this.
pub const CHUNK_ALIGNMENT: u64 = 320 * 1024;

const OCTET_STREAM: &str = "application/octet-stream";

impl GraphClient {
    /// Single-shot `PUT .../root:/{path}:/content`.
    pub async fn upload_small(
        &self,
        drive_path: &str,
        content: Bytes,
        content_type: Option<&str>,
        token: &str,
    ) -> Result<DriveItem, GraphError> {
        let resp = self
            .http
            .put(format!("{}:/content", self.item_url(drive_path)))
            .bearer_auth(token)
            .header(CONTENT_TYPE, content_type.unwrap_or(OCTET_STREAM))
            .body(content)
            .send()
            .await?;

        if !resp.status().is_success() {
            return Err(status_error(format!("Upload of {drive_path}"), resp).await);
        }

        Ok(resp.json().await?)
    }

    /// Stream `source` into a resumable upload session, `chunk_size` bytes per PUT.
    ///
    /// Each range is retried once after the configured delay. A second failure
    /// aborts the transfer and leaves the session to expire on the server.
    pub async fn upload_large<R>(
        &self,
        drive_path: &str,
        source: &mut R,
        token: &str,
        chunk_size: u64,
    ) -> Result<DriveItem, GraphError>
    where
        R: AsyncRead + AsyncSeek + Unpin,
    {
        if chunk_size == 0 {
            return Err(GraphError::Upload("chunk size must be positive".to_string()));
        }

        let total = source.seek(SeekFrom::End(0)).await?;
        if total == 0 {
            return Err(GraphError::EmptySource(drive_path.to_string()));
        }
        source.seek(SeekFrom::Start(0)).await?;

        let session = self.create_upload_session(drive_path, token).await?;
        tracing::debug!(
            "Upload session opened for {drive_path} ({total} bytes, expires {})",
            session.expiration_date_time.as_deref().unwrap_or("unknown")
        );

        let mut start = 0u64;
        let mut last = None;
        while start < total {
            let end = (start + chunk_size - 1).min(total - 1);
            let mut buf = vec![0u8; (end - start + 1) as usize];
            source.read_exact(&mut buf).await?;

            let resp = self
                .put_range_with_retry(&session.upload_url, Bytes::from(buf), start, end, total)
                .await?;
            last = Some(resp);
            start = end + 1;
        }

        let Some(resp) = last else {
            return Err(GraphError::EmptySource(drive_path.to_string()));
        };

        match resp.status().as_u16() {
            200 | 201 => Ok(resp.json().await?),
            status => Err(GraphError::Upload(format!(
                "session for {drive_path} ended with status {status} after the last range"
            ))),
        }
    }

    /// Upload one attachment into `folder`, choosing the path by size.
    /// Attachments without a filename are skipped.
    pub async fn upload_any_size(
        &self,
        folder: &str,
        attachment: &Attachment,
        token: &str,
    ) -> Result<Option<DriveItem>, GraphError> {
        if attachment.filename.trim().is_empty() {
            return Ok(None);
        }

        let drive_path = path::join(folder, &path::sanitize_segment(&attachment.filename));
        let size = attachment.size();

        let item = if size <= SMALL_UPLOAD_LIMIT {
            tracing::debug!("Uploading {drive_path} ({size} bytes) in one request");
            self.upload_small(
                &drive_path,
                attachment.content.clone(),
                attachment.content_type.as_deref(),
                token,
            )
            .await?
        } else {
            tracing::debug!("Uploading {drive_path} ({size} bytes) through an upload session");
            let mut source = Cursor::new(attachment.content.clone());
            self.upload_large(&drive_path, &mut source, token, self.chunk_size)
                .await?
        };

        Ok(Some(item))
    }

    async fn create_upload_session(
        &self,
        drive_path: &str,
        token: &str,
    ) -> Result<UploadSession, GraphError> {
        let resp = self
            .http
            .post(format!("{}:/createUploadSession", self.item_url(drive_path)))
            .bearer_auth(token)
            .json(&CreateSessionRequest {
                conflict_behavior: "replace",
            })
            .send()
            .await?;

        if !resp.status().is_success() {
            return Err(status_error(format!("Upload session for {drive_path}"), resp).await);
        }

        Ok(resp.json().await?)
    }

    async fn put_range_with_retry(
        &self,
        upload_url: &str,
        chunk: Bytes,
        start: u64,
        end: u64,
        total: u64,
    ) -> Result<Response, GraphError> {
        match self.put_range(upload_url, chunk.clone(), start, end, total).await {
            Ok(resp) => Ok(resp),
            Err(e) => {
                tracing::warn!(
                    "Range {start}-{end}/{total} failed, retrying in {:?}: {e}",
                    self.retry_delay
                );
                tokio::time::sleep(self.retry_delay).await;
                self.put_range(upload_url, chunk, start, end, total).await
            }
        }
    }

    /// The session URL is pre-authorized: no bearer header.
    async fn put_range(
        &self,
        upload_url: &str,
        chunk: Bytes,
        start: u64,
        end: u64,
        total: u64,
    ) -> Result<Response, GraphError> {
        let resp = self
            .http
            .put(upload_url)
            .header(CONTENT_RANGE, format!("bytes {start}-{end}/{total}"))
            .body(chunk)
            .send()
            .await?;

        match resp.status().as_u16() {
            200 | 201 | 202 => Ok(resp),
            _ => Err(status_error(format!("Range {start}-{end}/{total}"), resp).await),
        }
    }
}
