//! publish::upload
//!
//! Multipart upload of a descriptor to the registry, and classification of
//! the registry's answer.
//!
//! # Protocol
//!
//! `POST {registry}/api/v1/publish/` with multipart fields:
//! - `core_file` - the descriptor (required)
//! - `signature_file` - `<descriptor>.sig` (only if it exists)
//!
//! | Status | Body | Outcome |
//! |--------|------|---------|
//! | 2xx | ignored | [`UploadOutcome::Success`] |
//! | 409 | `{"error": "..."}` | [`UploadOutcome::Conflict`] |
//! | other | any JSON | [`UploadOutcome::HttpFailure`] |
//!
//! Files are read fully into memory before the request is built, so no file
//! handle outlives [`upload`], whatever the outcome. The same bytes are sent
//! again when the registry answers 307 or 308.

use std::io;
use std::path::{Path, PathBuf};

use reqwest::multipart::{Form, Part};
use reqwest::header::LOCATION;
use reqwest::{Client, Response, StatusCode, Url};
use serde::Deserialize;
use thiserror::Error;

use crate::core::descriptor::CoreDescriptor;
use crate::core::types::CoreIdentifier;
use crate::ui::output::{self, Verbosity};

/// Registry endpoint, relative to the registry base URI.
pub const PUBLISH_PATH: &str = "/api/v1/publish/";

/// Multipart field carrying the descriptor.
pub const CORE_FILE_FIELD: &str = "core_file";

/// Multipart field carrying the detached signature.
pub const SIGNATURE_FILE_FIELD: &str = "signature_file";

/// Errors that prevent an upload from getting an answer.
#[derive(Debug, Error)]
pub enum UploadError {
    /// A file to upload could not be read.
    #[error("failed to read '{}': {source}", path.display())]
    ReadFile {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Network or connection error.
    #[error("request to {url} failed: {message}")]
    Network { url: String, message: String },
}

/// How the registry answered an upload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UploadOutcome {
    /// The core was accepted.
    Success { core: CoreIdentifier },
    /// The registry refused the core (e.g. version already published).
    Conflict { message: String },
    /// Any other non-success status.
    HttpFailure {
        /// HTTP status code
        status: u16,
        /// Canonical reason phrase
        reason: String,
        /// Response body, pretty-printed if it is JSON
        body: String,
    },
}

/// Error body sent with a 409.
#[derive(Debug, Deserialize)]
struct ConflictBody {
    error: String,
}

/// Full URL of the publish endpoint for `registry`.
///
/// # Example
///
/// ```
/// use corepub::publish::upload::publish_url;
///
/// assert_eq!(
///     publish_url("https://cores.example.com/"),
///     "https://cores.example.com/api/v1/publish/"
/// );
/// ```
pub fn publish_url(registry: &str) -> String {
    format!("{}{}", registry.trim_end_matches('/'), PUBLISH_PATH)
}

/// Redirects that re-send the files before giving up.
const MAX_REDIRECTS: usize = 10;

/// Upload `core` to `registry` and classify the answer.
///
/// The client follows 301, 302 and 303 itself. A 307 or 308 must repeat
/// the POST with its body, which the client cannot do for a multipart
/// form, so those are followed here by rebuilding the form from the bytes
/// already read.
pub async fn upload(
    client: &Client,
    registry: &str,
    core: &CoreDescriptor,
    verbosity: Verbosity,
) -> Result<UploadOutcome, UploadError> {
    let payload = Payload::read(core, verbosity).await?;
    let mut url = publish_url(registry);

    for _ in 0..=MAX_REDIRECTS {
        output::debug(format!("POST to {}", url), verbosity);
        let response = client
            .post(&url)
            .multipart(payload.form())
            .send()
            .await
            .map_err(|e| network(&url, e))?;

        match resend_target(&response) {
            Some(next) => {
                output::debug(
                    format!("{} redirect to {}", response.status(), next),
                    verbosity,
                );
                url = next.to_string();
            }
            None => {
                return interpret(response, &core.id)
                    .await
                    .map_err(|e| network(&url, e))
            }
        }
    }

    Err(UploadError::Network {
        url,
        message: format!("more than {} redirects", MAX_REDIRECTS),
    })
}

fn network(url: &str, e: reqwest::Error) -> UploadError {
    UploadError::Network {
        url: url.to_string(),
        message: e.to_string(),
    }
}

/// Where a 307 or 308 answer asks for the POST to be repeated.
fn resend_target(response: &Response) -> Option<Url> {
    let status = response.status();
    if status != StatusCode::TEMPORARY_REDIRECT && status != StatusCode::PERMANENT_REDIRECT {
        return None;
    }
    let location = response.headers().get(LOCATION)?.to_str().ok()?;
    response.url().join(location).ok()
}

/// A file read into memory for the form.
struct FileData {
    name: String,
    data: Vec<u8>,
}

impl FileData {
    async fn read(path: &Path) -> Result<Self, UploadError> {
        let data = tokio::fs::read(path)
            .await
            .map_err(|e| UploadError::ReadFile {
                path: path.to_path_buf(),
                source: e,
            })?;
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        Ok(Self { name, data })
    }

    fn part(&self) -> Part {
        Part::bytes(self.data.clone()).file_name(self.name.clone())
    }
}

/// Everything sent in one upload.
struct Payload {
    core_file: FileData,
    signature_file: Option<FileData>,
}

impl Payload {
    async fn read(core: &CoreDescriptor, verbosity: Verbosity) -> Result<Self, UploadError> {
        let core_file = FileData::read(&core.core_file).await?;

        let signature = core.signature_file();
        let signature_file = if signature.is_file() {
            output::print(
                format!("and signature file: {}", signature.display()),
                verbosity,
            );
            Some(FileData::read(&signature).await?)
        } else {
            output::print("(without signature file)", verbosity);
            None
        };

        Ok(Self {
            core_file,
            signature_file,
        })
    }

    fn form(&self) -> Form {
        let form = Form::new().part(CORE_FILE_FIELD, self.core_file.part());
        match &self.signature_file {
            Some(signature) => form.part(SIGNATURE_FILE_FIELD, signature.part()),
            None => form,
        }
    }
}

/// Consume `response` and classify it.
async fn interpret(
    response: Response,
    core: &CoreIdentifier,
) -> Result<UploadOutcome, reqwest::Error> {
    let status = response.status();
    let body = response.text().await?;
    Ok(classify(status, &body, core))
}

/// Classify a registry answer from its status and body.
pub fn classify(status: StatusCode, body: &str, core: &CoreIdentifier) -> UploadOutcome {
    if status.is_success() {
        return UploadOutcome::Success { core: core.clone() };
    }

    if status == StatusCode::CONFLICT {
        let message = match serde_json::from_str::<ConflictBody>(body) {
            Ok(conflict) => conflict.error,
            Err(_) => body.trim().to_string(),
        };
        return UploadOutcome::Conflict { message };
    }

    let body = match serde_json::from_str::<serde_json::Value>(body) {
        Ok(json) => serde_json::to_string_pretty(&json).unwrap_or_else(|_| body.to_string()),
        Err(_) => body.trim().to_string(),
    };
    UploadOutcome::HttpFailure {
        status: status.as_u16(),
        reason: status.canonical_reason().unwrap_or("Unknown").to_string(),
        body,
    }
}
