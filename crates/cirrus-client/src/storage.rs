//! Storage bucket operations.

use cirrus_core::models::{UploadOutcome, UploadParams};
use cirrus_core::Result;

use crate::upload::{upload_files, FileSource};
use crate::ApiClient;

impl ApiClient {
    /// Upload files into a storage bucket.
    ///
    /// `source` is either a local folder to enumerate or caller-assembled
    /// metadata; see [`upload_files`] for the batching and session
    /// contract.
    pub async fn upload_to_bucket(
        &self,
        bucket_uuid: &str,
        params: &UploadParams,
        source: FileSource,
    ) -> Result<UploadOutcome> {
        let prefix = format!("/storage/buckets/{}", bucket_uuid);
        upload_files(self, &prefix, params, source).await
    }
}
