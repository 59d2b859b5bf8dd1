//! Upload session lifecycle.

use cirrus_core::models::UploadParams;
use cirrus_core::Result;
use uuid::Uuid;

use crate::ApiClient;

/// A client-generated grouping of upload batches.
///
/// Opening a session is purely local: the identifier is minted before any
/// network traffic, and the server first learns of it from the first
/// batch request. Closing tells the API that every batch has been
/// submitted; wrapped uploads are assembled into their directory at that
/// point.
#[derive(Debug, Clone)]
pub struct UploadSession {
    uuid: Uuid,
}

impl UploadSession {
    /// Open a session with a fresh random identifier. No network.
    pub fn open() -> Self {
        Self {
            uuid: Uuid::new_v4(),
        }
    }

    pub fn uuid(&self) -> Uuid {
        self.uuid
    }

    /// Close the session under the given API area. Sent exactly once per
    /// upload, after the last batch.
    pub async fn close(
        &self,
        client: &ApiClient,
        api_prefix: &str,
        params: &UploadParams,
    ) -> Result<()> {
        let path = format!("{}/upload/{}/end", api_prefix, self.uuid);
        client.post_unit(&path, params).await
    }
}
