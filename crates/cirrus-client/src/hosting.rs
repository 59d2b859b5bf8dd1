//! Website hosting operations: content upload and deployments.

use cirrus_core::models::{
    DeployRequest, Deployment, DeploymentEnvironment, UploadOutcome, UploadParams,
};
use cirrus_core::Result;
use tracing::info;

use crate::upload::{upload_files, FileSource};
use crate::ApiClient;

impl ApiClient {
    /// Upload website content. The files land in the website's staging
    /// area; nothing is served until a deployment is triggered.
    pub async fn upload_to_website(
        &self,
        website_uuid: &str,
        params: &UploadParams,
        source: FileSource,
    ) -> Result<UploadOutcome> {
        let prefix = format!("/hosting/websites/{}", website_uuid);
        upload_files(self, &prefix, params, source).await
    }

    /// Deploy the website's last uploaded content to an environment.
    pub async fn deploy_website(
        &self,
        website_uuid: &str,
        environment: DeploymentEnvironment,
    ) -> Result<Deployment> {
        let deployment: Deployment = self
            .post_json(
                &format!("/hosting/websites/{}/deploy", website_uuid),
                &DeployRequest { environment },
            )
            .await?;
        info!(
            deployment_uuid = %deployment.deployment_uuid,
            environment = environment.label(),
            "Deployment triggered"
        );
        Ok(deployment)
    }

    /// Fetch the current state of one deployment.
    pub async fn get_deployment(
        &self,
        website_uuid: &str,
        deployment_uuid: &str,
    ) -> Result<Deployment> {
        self.get(&format!(
            "/hosting/websites/{}/deployments/{}",
            website_uuid, deployment_uuid
        ))
        .await
    }
}
