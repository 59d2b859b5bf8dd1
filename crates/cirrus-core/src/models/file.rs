//! File metadata models for the upload pipeline.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use super::upload::UploadTarget;
use crate::error::{Error, Result};

/// Lifecycle status of a stored file, as reported by the API.
///
/// Serialized as the platform's numeric codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "i32", into = "i32")]
pub enum FileStatus {
    Requested = 1,
    Uploaded = 2,
    Pinned = 3,
    Replicated = 4,
}

impl FileStatus {
    /// Human-readable name, for presentation only.
    pub fn label(&self) -> &'static str {
        match self {
            FileStatus::Requested => "requested",
            FileStatus::Uploaded => "uploaded",
            FileStatus::Pinned => "pinned",
            FileStatus::Replicated => "replicated",
        }
    }
}

impl From<FileStatus> for i32 {
    fn from(status: FileStatus) -> i32 {
        status as i32
    }
}

impl TryFrom<i32> for FileStatus {
    type Error = String;

    fn try_from(value: i32) -> std::result::Result<Self, Self::Error> {
        match value {
            1 => Ok(FileStatus::Requested),
            2 => Ok(FileStatus::Uploaded),
            3 => Ok(FileStatus::Pinned),
            4 => Ok(FileStatus::Replicated),
            other => Err(format!("unknown file status code: {}", other)),
        }
    }
}

/// A file the caller wants uploaded.
///
/// Content comes either from an in-memory buffer or from a source path
/// read at upload time; exactly one of the two must be set. The
/// `(path, file_name)` pair identifies the file within one upload and is
/// the key used to pair it with its server-assigned upload target.
#[derive(Debug, Clone)]
pub struct FileMetadata {
    /// Bare file name, without any directory component.
    pub file_name: String,
    /// Virtual directory path relative to the upload root. Empty for files
    /// at the root itself.
    pub path: String,
    pub content_type: Option<String>,
    /// In-memory content.
    pub content: Option<Vec<u8>>,
    /// Local file to read the content from.
    pub source: Option<PathBuf>,
}

impl FileMetadata {
    /// Metadata backed by an in-memory buffer.
    pub fn from_bytes(
        file_name: impl Into<String>,
        path: impl AsRef<str>,
        content_type: Option<String>,
        content: Vec<u8>,
    ) -> Self {
        Self {
            file_name: file_name.into(),
            path: normalize_virtual_path(path.as_ref()),
            content_type,
            content: Some(content),
            source: None,
        }
    }

    /// Metadata backed by a local file, read lazily at upload time.
    pub fn from_source(
        file_name: impl Into<String>,
        path: impl AsRef<str>,
        source: PathBuf,
    ) -> Self {
        Self {
            file_name: file_name.into(),
            path: normalize_virtual_path(path.as_ref()),
            content_type: None,
            content: None,
            source: Some(source),
        }
    }

    /// Compound identity of this file within one upload.
    pub fn key(&self) -> (String, String) {
        (self.path.clone(), self.file_name.clone())
    }

    pub fn validate(&self) -> Result<()> {
        if self.file_name.is_empty() {
            return Err(Error::validation("file name must not be empty"));
        }
        if self.file_name.contains('/') || self.file_name.contains('\\') {
            return Err(Error::validation(format!(
                "file name '{}' must not contain path separators",
                self.file_name
            )));
        }
        match (&self.content, &self.source) {
            (None, None) => Err(Error::validation(format!(
                "file '{}' has neither content nor a source path",
                self.file_name
            ))),
            (Some(_), Some(_)) => Err(Error::validation(format!(
                "file '{}' has both content and a source path",
                self.file_name
            ))),
            _ => Ok(()),
        }
    }
}

/// Normalize a caller-supplied virtual path: forward slashes only, no
/// leading or trailing separator.
fn normalize_virtual_path(path: &str) -> String {
    path.replace('\\', "/").trim_matches('/').to_string()
}

/// One uploaded file as returned to the caller.
///
/// The transient upload URL is dropped by construction; it is single-use
/// and of no value after the byte transfer.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadedFile {
    pub file_uuid: String,
    pub file_name: String,
    #[serde(default)]
    pub path: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file_status: Option<FileStatus>,
    /// Content identifier. Only present for flat (unwrapped) uploads.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cid: Option<String>,
    /// Public gateway link. Only present for flat (unwrapped) uploads.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub link: Option<String>,
}

impl UploadedFile {
    /// Combine submitted metadata with its reconciled upload target.
    ///
    /// Identity fields come from the submitted metadata, the server-assigned
    /// uuid and status from the target. Fields the server omitted stay at
    /// their defaults rather than shifting values between files.
    pub fn from_parts(
        metadata: &FileMetadata,
        target: &UploadTarget,
        cid: Option<String>,
        link: Option<String>,
    ) -> Self {
        Self {
            file_uuid: target.file_uuid.clone(),
            file_name: metadata.file_name.clone(),
            path: metadata.path.clone(),
            content_type: metadata
                .content_type
                .clone()
                .or_else(|| target.content_type.clone()),
            file_status: target.file_status,
            cid,
            link,
        }
    }
}
