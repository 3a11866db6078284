//! Upload request handling
//!
//! **Flow:** multipart body → [`UploadedFile`] (extension checked before the
//! bytes are read) → extractor on a blocking worker → [`UploadOutcome`].
//!
//! Every failure ends up as an outcome value; nothing here panics or
//! returns early with an HTTP error, so the page can always be re-rendered.

use axum::body::Bytes;
use axum::extract::multipart::{Multipart, MultipartError, MultipartRejection};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use mfcc_extractor::{Extraction, MfccMatrix};
use serde::Serialize;
use std::fmt;
use thiserror::Error;
use tracing::{error, info, info_span, warn, Instrument};
use uuid::Uuid;

use crate::AppState;

/// Multipart field carrying the audio file
pub const FILE_FIELD: &str = "file";

/// Audio container extensions the interface accepts
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AllowedExtension {
    Wav,
    Mp3,
    Flac,
}

impl AllowedExtension {
    pub const ALL: [AllowedExtension; 3] = [Self::Wav, Self::Mp3, Self::Flac];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Wav => "wav",
            Self::Mp3 => "mp3",
            Self::Flac => "flac",
        }
    }

    /// Match the extension of `file_name`, case-insensitively
    pub fn from_file_name(file_name: &str) -> Option<Self> {
        let (_, extension) = file_name.rsplit_once('.')?;
        let extension = extension.to_ascii_lowercase();
        Self::ALL.into_iter().find(|e| e.as_str() == extension)
    }

    /// Value for the HTML `accept` attribute, e.g. `.wav,.mp3,.flac`
    pub fn accept_attribute() -> String {
        Self::ALL
            .iter()
            .map(|e| format!(".{}", e.as_str()))
            .collect::<Vec<_>>()
            .join(",")
    }
}

impl fmt::Display for AllowedExtension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

fn allowed_list() -> String {
    AllowedExtension::ALL
        .iter()
        .map(|e| e.as_str())
        .collect::<Vec<_>>()
        .join(", ")
}

/// An upload that passed the allow-list, read fully into memory
#[derive(Debug, Clone)]
pub struct UploadedFile {
    pub file_name: String,
    pub extension: AllowedExtension,
    pub bytes: Bytes,
}

/// Reasons an upload never reaches the extractor
#[derive(Debug, Error)]
pub enum UploadError {
    #[error("No file was uploaded (expected a 'file' field)")]
    MissingFile,

    #[error("Unsupported file type for '{file_name}': expected one of {}", allowed_list())]
    UnsupportedExtension { file_name: String },

    #[error("Malformed upload: {0}")]
    InvalidForm(String),

    #[error("Failed to read upload: {0}")]
    Multipart(#[from] MultipartError),
}

/// Pull the audio file out of a multipart body
///
/// The extension is checked on the field header, before the file contents
/// are buffered.
pub async fn receive_upload(mut multipart: Multipart) -> Result<UploadedFile, UploadError> {
    while let Some(field) = multipart.next_field().await? {
        if field.name() != Some(FILE_FIELD) {
            continue;
        }

        // Browsers send an empty filename when nothing was picked
        let file_name = match field.file_name() {
            Some(name) if !name.is_empty() => name.to_string(),
            _ => return Err(UploadError::MissingFile),
        };

        let extension = AllowedExtension::from_file_name(&file_name)
            .ok_or_else(|| UploadError::UnsupportedExtension {
                file_name: file_name.clone(),
            })?;

        let bytes = field.bytes().await?;
        return Ok(UploadedFile {
            file_name,
            extension,
            bytes,
        });
    }

    Err(UploadError::MissingFile)
}

/// Successful extraction, ready to display
#[derive(Debug, Clone, Serialize)]
pub struct UploadSuccess {
    pub file_name: String,
    pub sample_rate: u32,
    pub channels: usize,
    pub duration_seconds: f64,
    /// [coefficients, frames]
    pub shape: [usize; 2],
    pub mfcc: MfccMatrix,
}

impl UploadSuccess {
    fn new(file_name: String, extraction: Extraction) -> Self {
        let (rows, cols) = extraction.mfcc.shape();
        Self {
            file_name,
            sample_rate: extraction.sample_rate,
            channels: extraction.channels,
            duration_seconds: extraction.duration_seconds,
            shape: [rows, cols],
            mfcc: extraction.mfcc,
        }
    }
}

/// Result of one upload interaction
///
/// The HTML and JSON renderers both switch on this.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum UploadOutcome {
    Success(UploadSuccess),
    /// Stopped before extraction (missing file, bad extension, bad body)
    Rejected { message: String },
    /// Extraction ran and failed
    Failed { message: String },
}

impl UploadOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success(_))
    }

    /// Status code for the JSON API
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::Success(_) => StatusCode::OK,
            Self::Rejected { .. } => StatusCode::BAD_REQUEST,
            Self::Failed { .. } => StatusCode::UNPROCESSABLE_ENTITY,
        }
    }
}

impl IntoResponse for UploadOutcome {
    fn into_response(self) -> Response {
        (self.status_code(), Json(self)).into_response()
    }
}

/// Handle one upload event end to end
pub async fn handle_upload(
    state: &AppState,
    upload: Result<Multipart, MultipartRejection>,
) -> UploadOutcome {
    let request_id = Uuid::new_v4();
    let span = info_span!("upload", %request_id);

    async move {
        let received = match upload {
            Ok(multipart) => receive_upload(multipart).await,
            Err(rejection) => Err(UploadError::InvalidForm(rejection.body_text())),
        };

        let file = match received {
            Ok(file) => file,
            Err(e) => {
                warn!(error = %e, "Upload rejected");
                return UploadOutcome::Rejected {
                    message: e.to_string(),
                };
            }
        };

        info!(
            file_name = %file.file_name,
            bytes = file.bytes.len(),
            extension = %file.extension,
            "Upload received"
        );

        extract(state, file).await
    }
    .instrument(span)
    .await
}

/// Run the extractor on a blocking worker and fold the result into an outcome
async fn extract(state: &AppState, file: UploadedFile) -> UploadOutcome {
    let extractor = state.extractor.clone();
    let UploadedFile {
        file_name,
        extension,
        bytes,
    } = file;

    // Unshared upload buffers convert without copying
    let audio = Vec::<u8>::from(bytes);
    let result =
        tokio::task::spawn_blocking(move || extractor.extract(audio, Some(extension.as_str())))
            .await;

    match result {
        Ok(Ok(extraction)) => {
            let (rows, cols) = extraction.mfcc.shape();
            info!(
                sample_rate = extraction.sample_rate,
                rows,
                cols,
                "MFCC extraction succeeded"
            );
            UploadOutcome::Success(UploadSuccess::new(file_name, extraction))
        }
        Ok(Err(e)) => {
            warn!(error = %e, "MFCC extraction failed");
            UploadOutcome::Failed {
                message: e.to_string(),
            }
        }
        Err(join_error) => {
            error!(error = %join_error, "Extraction worker did not complete");
            UploadOutcome::Failed {
                message: format!("Extraction worker did not complete: {}", join_error),
            }
        }
    }
}
