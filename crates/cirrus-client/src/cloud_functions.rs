//! Cloud function deployment: bundle the source, upload it, create a job.

use std::path::Path;

use cirrus_core::models::{CreateJobRequest, FileMetadata, FunctionJob, UploadParams};
use cirrus_core::{Error, Result};
use tracing::info;

use crate::archive::compress_tree;
use crate::upload::{upload_files, FileSource};
use crate::ApiClient;

impl ApiClient {
    /// Deploy a function from a local source tree.
    ///
    /// The tree is compressed into a single tar.gz (manifest required,
    /// ignore rules honored), uploaded through the regular pipeline, and
    /// a deployment job is created pointing at that upload session.
    pub async fn deploy_function(
        &self,
        function_uuid: &str,
        source_dir: &Path,
    ) -> Result<FunctionJob> {
        let staging = tempfile::tempdir()
            .map_err(|e| Error::filesystem(std::env::temp_dir(), e))?;
        let bundle_name = format!("{}.tar.gz", function_uuid);
        let bundle_path = staging.path().join(&bundle_name);

        let bundled = compress_tree(source_dir, &bundle_path).await?;
        info!(function_uuid, files = bundled, "Bundled function source");

        let content = tokio::fs::read(&bundle_path)
            .await
            .map_err(|e| Error::filesystem(&bundle_path, e))?;
        let bundle = FileMetadata::from_bytes(
            bundle_name,
            "",
            Some("application/gzip".to_string()),
            content,
        );

        let prefix = format!("/cloud-functions/{}", function_uuid);
        let outcome = upload_files(
            self,
            &prefix,
            &UploadParams::default(),
            FileSource::Files(vec![bundle]),
        )
        .await?;

        let job: FunctionJob = self
            .post_json(
                &format!("{}/jobs", prefix),
                &CreateJobRequest {
                    session_uuid: outcome.session_uuid.to_string(),
                },
            )
            .await?;
        info!(
            function_uuid,
            job_uuid = %job.job_uuid,
            "Deployment job created"
        );
        Ok(job)
    }
}
