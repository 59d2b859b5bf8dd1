//! Wire types for the bulk upload endpoints.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::file::{FileStatus, UploadedFile};

/// Options controlling one bulk upload invocation.
///
/// This struct doubles as the body of the session-end request, which is
/// why the wrap fields serialize in wire casing.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadParams {
    /// Wrap the whole file set into a single directory on the remote side.
    /// Wrapped uploads carry no per-file content identifiers.
    pub wrap_with_directory: bool,
    /// Virtual path of the wrapping directory. Required when
    /// `wrap_with_directory` is set.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub directory_path: Option<String>,
    /// Honor the root `.gitignore` and built-in exclusions when uploading
    /// a folder. On by default.
    #[serde(skip)]
    pub ignore_files: bool,
}

impl Default for UploadParams {
    fn default() -> Self {
        Self {
            wrap_with_directory: false,
            directory_path: None,
            ignore_files: true,
        }
    }
}

/// One file entry in an upload-target request. Content bytes never travel
/// through this endpoint; only descriptive metadata does.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadRequestFile {
    pub file_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content_type: Option<String>,
    /// Pre-computed content identifier. Sent for flat uploads only.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cid: Option<String>,
}

/// Body of `POST {prefix}/upload`: one batch of at most
/// [`UPLOAD_BATCH_SIZE`](crate::constants::UPLOAD_BATCH_SIZE) files.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadRequest {
    pub files: Vec<UploadRequestFile>,
    pub session_uuid: String,
}

/// One server-assigned upload target.
///
/// The response order is not guaranteed to match the request order;
/// targets are paired with submitted files by `(path, file_name)`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadTarget {
    pub file_uuid: String,
    pub file_name: String,
    #[serde(default)]
    pub path: Option<String>,
    #[serde(default)]
    pub content_type: Option<String>,
    #[serde(default)]
    pub file_status: Option<FileStatus>,
    /// Single-use URL the file bytes are PUT to.
    pub url: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadTargetsResponse {
    pub files: Vec<UploadTarget>,
}

/// Body of `POST /storage/link-on-ipfs-multiple`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IpfsLinksRequest {
    pub cids: Vec<String>,
}

/// Gateway links, in the same order as the requested identifiers.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IpfsLinksResponse {
    pub links: Vec<String>,
}

/// Final result of a bulk upload: the session that grouped the batches
/// and one entry per file, in submission order.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadOutcome {
    pub session_uuid: Uuid,
    pub files: Vec<UploadedFile>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_params_default_honors_ignore_rules() {
        let params = UploadParams::default();
        assert!(params.ignore_files);
        assert!(!params.wrap_with_directory);
        assert!(params.directory_path.is_none());
    }

    #[test]
    fn test_params_serialize_in_wire_casing() {
        let params = UploadParams {
            wrap_with_directory: true,
            directory_path: Some("site".to_string()),
            ignore_files: false,
        };
        let json = serde_json::to_value(&params).unwrap();
        assert_eq!(json["wrapWithDirectory"], true);
        assert_eq!(json["directoryPath"], "site");
        // Local-only option never reaches the wire.
        assert!(json.get("ignoreFiles").is_none());
    }

    #[test]
    fn test_params_omit_unset_directory_path() {
        let json = serde_json::to_value(UploadParams::default()).unwrap();
        assert!(json.get("directoryPath").is_none());
    }

    #[test]
    fn test_upload_request_uses_wire_field_names() {
        let request = UploadRequest {
            files: vec![UploadRequestFile {
                file_name: "index.html".to_string(),
                path: Some("public".to_string()),
                content_type: None,
                cid: None,
            }],
            session_uuid: "s-1".to_string(),
        };
        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["sessionUuid"], "s-1");
        assert_eq!(json["files"][0]["fileName"], "index.html");
        assert_eq!(json["files"][0]["path"], "public");
        assert!(json["files"][0].get("contentType").is_none());
    }

    #[test]
    fn test_target_deserializes_with_missing_optionals() {
        let target: UploadTarget = serde_json::from_str(
            r#"{"fileUuid":"u1","fileName":"a.txt","url":"https://s.example.com/u1"}"#,
        )
        .unwrap();
        assert_eq!(target.file_uuid, "u1");
        assert!(target.path.is_none());
        assert!(target.file_status.is_none());
    }
}
