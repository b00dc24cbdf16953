use reqwest::header::CONTENT_TYPE;
use reqwest::StatusCode;
use transfer_logging::{transfer_debug, transfer_info, transfer_warn, truncate_for_log};

use crate::client::{build_client, classify_reqwest_error, read_body};
use crate::multipart::{guess_content_type, MultipartBody};
use crate::{FailureKind, TransferJob, TransferSettings};

/// Path appended to the endpoint for uploads.
const UPLOAD_PATH: &str = "/files";

#[async_trait::async_trait]
pub trait Uploader: Send + Sync {
    /// Send one job's file to `{endpoint}/files`.
    async fn upload(&self, endpoint: &str, job: &TransferJob) -> Result<(), FailureKind>;
}

/// Uploads over plain HTTP with the whole file buffered in memory.
#[derive(Debug, Clone, Default)]
pub struct ReqwestUploader {
    settings: TransferSettings,
}

impl ReqwestUploader {
    pub fn new(settings: TransferSettings) -> Self {
        Self { settings }
    }
}

#[async_trait::async_trait]
impl Uploader for ReqwestUploader {
    async fn upload(&self, endpoint: &str, job: &TransferJob) -> Result<(), FailureKind> {
        let path = &job.source_path;
        let data = tokio::fs::read(path)
            .await
            .map_err(|err| FailureKind::Io(format!("{}: {err}", path.display())))?;
        let filename = path
            .file_name()
            .and_then(|name| name.to_str())
            .ok_or_else(|| {
                FailureKind::unexpected(
                    "encoding",
                    format!("{} has no UTF-8 file name", path.display()),
                )
            })?;

        let content_type = guess_content_type(filename);
        let multipart = MultipartBody::single_file(&data, filename, &content_type);
        let url = format!("{endpoint}{UPLOAD_PATH}");
        transfer_info!(
            "Uploading {:?} from {} ({} bytes, {}) to {}",
            job.title,
            path.display(),
            data.len(),
            content_type,
            url
        );

        let client = build_client(&self.settings, self.settings.request_timeout)?;
        let response = client
            .post(&url)
            .header(CONTENT_TYPE, multipart.content_type_header())
            .body(multipart.into_body())
            .send()
            .await
            .map_err(|err| {
                let kind = classify_reqwest_error(&err);
                transfer_warn!("Upload of {:?} to {} failed: {}", job.title, url, kind);
                kind
            })?;

        let status = response.status();
        let body = read_body(response).await;
        transfer_debug!(
            "Upload response for {:?}: status={} body={:?}",
            job.title,
            status.as_u16(),
            truncate_for_log(&body, self.settings.log_body_limit)
        );

        if status == StatusCode::OK {
            Ok(())
        } else {
            Err(FailureKind::HttpStatus(status.as_u16()))
        }
    }
}
