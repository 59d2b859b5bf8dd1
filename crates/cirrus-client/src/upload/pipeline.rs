//! Batch upload orchestration.

use std::collections::{HashMap, HashSet};
use std::path::PathBuf;

use cirrus_core::constants::UPLOAD_BATCH_SIZE;
use cirrus_core::models::{
    FileMetadata, IpfsLinksRequest, IpfsLinksResponse, UploadOutcome, UploadParams, UploadRequest,
    UploadRequestFile, UploadTarget, UploadTargetsResponse, UploadedFile,
};
use cirrus_core::{Error, Result};
use futures::future::try_join_all;
use tracing::{debug, info, warn};

use super::cid::compute_cid;
use super::ignore::IgnoreRuleSet;
use super::session::UploadSession;
use super::walker::list_files;
use crate::{ensure_success, ApiClient};

/// Where the files of one upload invocation come from.
#[derive(Debug, Clone)]
pub enum FileSource {
    /// Enumerate a local directory tree, honoring ignore rules unless
    /// disabled in the params.
    Folder(PathBuf),
    /// Caller-assembled metadata, in-memory or path-backed.
    Files(Vec<FileMetadata>),
}

/// Upload a set of files under one API area.
///
/// The set is partitioned into sequential batches of
/// [`UPLOAD_BATCH_SIZE`]; within a batch, byte transfers run
/// concurrently. Every batch travels under one session, closed exactly
/// once after the last batch. Returns one entry per file, in submission
/// order.
///
/// The upload is all-or-nothing: the first failing step aborts the whole
/// call with the underlying error, never a partial result.
pub async fn upload_files(
    client: &ApiClient,
    api_prefix: &str,
    params: &UploadParams,
    source: FileSource,
) -> Result<UploadOutcome> {
    let files = resolve_source(params, source)?;
    validate_files(params, &files)?;

    let session = UploadSession::open();
    info!(
        session_uuid = %session.uuid(),
        files = files.len(),
        wrap = params.wrap_with_directory,
        "Starting upload session"
    );

    let mut uploaded = Vec::with_capacity(files.len());
    let mut completed_groups = 0usize;

    for group in files.chunks(UPLOAD_BATCH_SIZE) {
        let result = if params.wrap_with_directory {
            upload_group_wrapped(client, api_prefix, &session, group).await
        } else {
            upload_group_flat(client, api_prefix, &session, group).await
        };

        match result {
            Ok(mut group_files) => {
                uploaded.append(&mut group_files);
                completed_groups += 1;
            }
            Err(err) => {
                // Batches already submitted live on the server; close the
                // session so they are not left dangling, then surface the
                // original failure.
                if completed_groups > 0 {
                    if let Err(close_err) = session.close(client, api_prefix, params).await {
                        warn!(
                            session_uuid = %session.uuid(),
                            error = %close_err,
                            "Failed to close session after upload error"
                        );
                    }
                }
                return Err(err);
            }
        }
    }

    session.close(client, api_prefix, params).await?;
    info!(
        session_uuid = %session.uuid(),
        files = uploaded.len(),
        "Upload session closed"
    );

    Ok(UploadOutcome {
        session_uuid: session.uuid(),
        files: uploaded,
    })
}

fn resolve_source(params: &UploadParams, source: FileSource) -> Result<Vec<FileMetadata>> {
    match source {
        FileSource::Files(files) => Ok(files),
        FileSource::Folder(root) => {
            let rules = if params.ignore_files {
                IgnoreRuleSet::load(&root)?
            } else {
                IgnoreRuleSet::empty()
            };
            let listed = list_files(&root, &rules)?;
            Ok(listed
                .into_iter()
                .map(|f| FileMetadata::from_source(f.file_name, f.path, f.source))
                .collect())
        }
    }
}

fn validate_files(params: &UploadParams, files: &[FileMetadata]) -> Result<()> {
    if files.is_empty() {
        return Err(Error::validation("nothing to upload: the file set is empty"));
    }
    if params.wrap_with_directory
        && params
            .directory_path
            .as_deref()
            .map_or(true, |p| p.is_empty())
    {
        return Err(Error::validation(
            "directoryPath is required when wrapWithDirectory is set",
        ));
    }

    let mut seen: HashSet<(String, String)> = HashSet::with_capacity(files.len());
    for file in files {
        file.validate()?;
        if !seen.insert(file.key()) {
            return Err(Error::validation(format!(
                "duplicate file '{}' at path '{}' in one upload",
                file.file_name, file.path
            )));
        }
    }

    Ok(())
}

/// Flat upload of one batch: each file keeps its own content identifier
/// and gateway link.
async fn upload_group_flat(
    client: &ApiClient,
    api_prefix: &str,
    session: &UploadSession,
    group: &[FileMetadata],
) -> Result<Vec<UploadedFile>> {
    let contents = try_join_all(group.iter().map(load_content)).await?;
    let cids: Vec<String> = contents
        .iter()
        .map(|bytes| compute_cid(bytes).to_string())
        .collect();
    let links = resolve_ipfs_links(client, &cids).await?;

    let request_files = group
        .iter()
        .zip(&cids)
        .map(|(file, cid)| request_file(file, Some(cid.clone())))
        .collect();
    let targets = request_targets(client, api_prefix, session, request_files).await?;
    let ordered = reconcile_targets(group, targets, session)?;

    put_group(client, &ordered, contents).await?;

    Ok(group
        .iter()
        .zip(&ordered)
        .zip(cids.into_iter().zip(links))
        .map(|((file, target), (cid, link))| {
            UploadedFile::from_parts(file, target, Some(cid), Some(link))
        })
        .collect())
}

/// Wrapped upload of one batch: the files become members of a remote
/// directory, so no per-file identifiers or links exist.
async fn upload_group_wrapped(
    client: &ApiClient,
    api_prefix: &str,
    session: &UploadSession,
    group: &[FileMetadata],
) -> Result<Vec<UploadedFile>> {
    let request_files = group.iter().map(|file| request_file(file, None)).collect();
    let targets = request_targets(client, api_prefix, session, request_files).await?;
    let ordered = reconcile_targets(group, targets, session)?;

    let contents = try_join_all(group.iter().map(load_content)).await?;
    put_group(client, &ordered, contents).await?;

    Ok(group
        .iter()
        .zip(&ordered)
        .map(|(file, target)| UploadedFile::from_parts(file, target, None, None))
        .collect())
}

fn request_file(file: &FileMetadata, cid: Option<String>) -> UploadRequestFile {
    UploadRequestFile {
        file_name: file.file_name.clone(),
        path: if file.path.is_empty() {
            None
        } else {
            Some(file.path.clone())
        },
        content_type: file.content_type.clone(),
        cid,
    }
}

async fn request_targets(
    client: &ApiClient,
    api_prefix: &str,
    session: &UploadSession,
    files: Vec<UploadRequestFile>,
) -> Result<Vec<UploadTarget>> {
    let request = UploadRequest {
        files,
        session_uuid: session.uuid().to_string(),
    };
    debug!(
        session_uuid = %session.uuid(),
        files = request.files.len(),
        "Requesting upload targets"
    );

    let response: UploadTargetsResponse = client
        .post_json(&format!("{}/upload", api_prefix), &request)
        .await?;
    Ok(response.files)
}

/// Pair the server's targets with the submitted batch by the
/// `(path, file name)` compound key; response order is not trusted.
/// Returns the targets re-ordered to match `group`. A file without a
/// target, a target without a file, and a duplicated target all abort
/// the upload.
fn reconcile_targets(
    group: &[FileMetadata],
    targets: Vec<UploadTarget>,
    session: &UploadSession,
) -> Result<Vec<UploadTarget>> {
    let mut by_key: HashMap<(String, String), UploadTarget> =
        HashMap::with_capacity(targets.len());
    for target in targets {
        let key = (
            target.path.clone().unwrap_or_default(),
            target.file_name.clone(),
        );
        if let Some(duplicate) = by_key.insert(key, target) {
            return Err(reconciliation_error(
                &duplicate.file_name,
                duplicate.path.as_deref().unwrap_or_default(),
                session,
            ));
        }
    }

    let mut ordered = Vec::with_capacity(group.len());
    for file in group {
        match by_key.remove(&file.key()) {
            Some(target) => ordered.push(target),
            None => return Err(reconciliation_error(&file.file_name, &file.path, session)),
        }
    }

    if let Some(((path, file_name), _)) = by_key.into_iter().next() {
        return Err(reconciliation_error(&file_name, &path, session));
    }

    Ok(ordered)
}

fn reconciliation_error(file_name: &str, path: &str, session: &UploadSession) -> Error {
    Error::Reconciliation {
        file_name: file_name.to_string(),
        path: path.to_string(),
        session_uuid: session.uuid().to_string(),
    }
}

/// PUT the bytes of one batch to their one-shot URLs concurrently.
async fn put_group(
    client: &ApiClient,
    targets: &[UploadTarget],
    contents: Vec<Vec<u8>>,
) -> Result<()> {
    try_join_all(
        targets
            .iter()
            .zip(contents)
            .map(|(target, bytes)| put_object(client, target, bytes)),
    )
    .await?;
    Ok(())
}

/// Transfer one file's bytes to its upload target. Goes straight to
/// object storage: no API auth headers, no extra headers of any kind.
async fn put_object(client: &ApiClient, target: &UploadTarget, bytes: Vec<u8>) -> Result<()> {
    let size = bytes.len();
    let response = client.client().put(&target.url).body(bytes).send().await?;
    ensure_success(&target.url, response).await?;

    debug!(file_name = %target.file_name, size, "Uploaded file bytes");
    Ok(())
}

/// Resolve a file's bytes: in-memory content directly, otherwise read
/// from the source path.
async fn load_content(file: &FileMetadata) -> Result<Vec<u8>> {
    if let Some(content) = &file.content {
        return Ok(content.clone());
    }
    let source = file.source.as_ref().ok_or_else(|| {
        Error::validation(format!(
            "file '{}' has neither content nor a source path",
            file.file_name
        ))
    })?;
    tokio::fs::read(source)
        .await
        .map_err(|e| Error::filesystem(source, e))
}

/// Fetch public gateway links for a batch of content identifiers. The
/// response must carry exactly one link per identifier, in order.
async fn resolve_ipfs_links(client: &ApiClient, cids: &[String]) -> Result<Vec<String>> {
    const ENDPOINT: &str = "/storage/link-on-ipfs-multiple";

    let response: IpfsLinksResponse = client
        .post_json(ENDPOINT, &IpfsLinksRequest { cids: cids.to_vec() })
        .await?;

    if response.links.len() != cids.len() {
        return Err(Error::RemoteApi {
            status: 200,
            endpoint: ENDPOINT.to_string(),
            code: None,
            message: format!(
                "expected {} gateway links, got {}",
                cids.len(),
                response.links.len()
            ),
        });
    }

    Ok(response.links)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn file(name: &str, path: &str) -> FileMetadata {
        FileMetadata::from_bytes(name, path, None, name.as_bytes().to_vec())
    }

    fn target(uuid: &str, name: &str, path: &str) -> UploadTarget {
        UploadTarget {
            file_uuid: uuid.to_string(),
            file_name: name.to_string(),
            path: if path.is_empty() {
                None
            } else {
                Some(path.to_string())
            },
            content_type: None,
            file_status: None,
            url: format!("https://storage.example.com/{}", uuid),
        }
    }

    #[test]
    fn test_validate_rejects_empty_set() {
        let err = validate_files(&UploadParams::default(), &[]).unwrap_err();
        assert!(matches!(err, Error::Validation(_)));
    }

    #[test]
    fn test_validate_rejects_wrap_without_directory_path() {
        let params = UploadParams {
            wrap_with_directory: true,
            directory_path: None,
            ignore_files: true,
        };
        let files = [file("a.txt", "")];
        assert!(matches!(
            validate_files(&params, &files),
            Err(Error::Validation(_))
        ));

        let params = UploadParams {
            directory_path: Some(String::new()),
            ..params
        };
        assert!(matches!(
            validate_files(&params, &files),
            Err(Error::Validation(_))
        ));
    }

    #[test]
    fn test_validate_rejects_duplicate_keys() {
        let files = [file("a.txt", "docs"), file("a.txt", "docs")];
        let err = validate_files(&UploadParams::default(), &files).unwrap_err();
        assert!(err.to_string().contains("duplicate"));
    }

    #[test]
    fn test_validate_allows_same_name_under_different_paths() {
        let files = [file("index.html", ""), file("index.html", "docs")];
        assert!(validate_files(&UploadParams::default(), &files).is_ok());
    }

    #[test]
    fn test_request_file_omits_empty_path() {
        let entry = request_file(&file("a.txt", ""), None);
        assert!(entry.path.is_none());

        let entry = request_file(&file("a.txt", "docs"), Some("bafkrei1".to_string()));
        assert_eq!(entry.path.as_deref(), Some("docs"));
        assert_eq!(entry.cid.as_deref(), Some("bafkrei1"));
    }

    #[test]
    fn test_reconcile_reorders_shuffled_targets() {
        let session = UploadSession::open();
        let group = [file("a.txt", ""), file("b.txt", "docs")];
        let targets = vec![target("u-b", "b.txt", "docs"), target("u-a", "a.txt", "")];

        let ordered = reconcile_targets(&group, targets, &session).unwrap();
        assert_eq!(ordered[0].file_uuid, "u-a");
        assert_eq!(ordered[1].file_uuid, "u-b");
    }

    #[test]
    fn test_reconcile_pairs_by_path_not_name_alone() {
        let session = UploadSession::open();
        let group = [file("index.html", ""), file("index.html", "docs")];
        let targets = vec![
            target("u-docs", "index.html", "docs"),
            target("u-root", "index.html", ""),
        ];

        let ordered = reconcile_targets(&group, targets, &session).unwrap();
        assert_eq!(ordered[0].file_uuid, "u-root");
        assert_eq!(ordered[1].file_uuid, "u-docs");
    }

    #[test]
    fn test_reconcile_fails_on_missing_target() {
        let session = UploadSession::open();
        let group = [file("a.txt", ""), file("b.txt", "")];
        let targets = vec![target("u-a", "a.txt", "")];

        let err = reconcile_targets(&group, targets, &session).unwrap_err();
        match err {
            Error::Reconciliation { file_name, .. } => assert_eq!(file_name, "b.txt"),
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_reconcile_fails_on_unmatched_target() {
        let session = UploadSession::open();
        let group = [file("a.txt", "")];
        let targets = vec![target("u-a", "a.txt", ""), target("u-x", "stray.txt", "")];

        let err = reconcile_targets(&group, targets, &session).unwrap_err();
        match err {
            Error::Reconciliation { file_name, .. } => assert_eq!(file_name, "stray.txt"),
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_reconcile_fails_on_duplicated_target() {
        let session = UploadSession::open();
        let group = [file("a.txt", "")];
        let targets = vec![target("u-1", "a.txt", ""), target("u-2", "a.txt", "")];

        assert!(matches!(
            reconcile_targets(&group, targets, &session),
            Err(Error::Reconciliation { .. })
        ));
    }
}
