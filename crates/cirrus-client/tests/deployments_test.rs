//! Website deployment and cloud function deployment tests against a mock
//! HTTP server.

use std::fs;
use std::path::Path;

use cirrus_client::{ApiClient, Auth};
use cirrus_core::models::{DeploymentEnvironment, DeploymentStatus, JobStatus};
use cirrus_core::Error;
use mockito::{Matcher, Server, ServerGuard};
use serde_json::json;

fn test_client(server: &ServerGuard) -> ApiClient {
    ApiClient::new(server.url(), Auth::XApiKey("test-key".to_string())).unwrap()
}

fn write_file(path: &Path, content: &str) {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(path, content).unwrap();
}

#[tokio::test]
async fn test_deploy_website_to_production() {
    let mut server = Server::new_async().await;

    let deploy = server
        .mock("POST", "/hosting/websites/w-1/deploy")
        .match_header("x-api-key", "test-key")
        .match_body(Matcher::Json(json!({ "environment": 2 })))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(
            json!({
                "deploymentUuid": "d-1",
                "websiteUuid": "w-1",
                "environment": 2,
                "deploymentStatus": 0,
                "createTime": "2024-03-01T10:00:00Z"
            })
            .to_string(),
        )
        .expect(1)
        .create_async()
        .await;

    let client = test_client(&server);
    let deployment = client
        .deploy_website("w-1", DeploymentEnvironment::Production)
        .await
        .unwrap();

    assert_eq!(deployment.deployment_uuid, "d-1");
    assert_eq!(deployment.environment, DeploymentEnvironment::Production);
    assert_eq!(deployment.deployment_status, DeploymentStatus::Pending);
    assert!(!deployment.deployment_status.is_finished());

    deploy.assert_async().await;
}

#[tokio::test]
async fn test_get_deployment_reports_terminal_state() {
    let mut server = Server::new_async().await;

    let get = server
        .mock("GET", "/hosting/websites/w-1/deployments/d-1")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(
            json!({
                "deploymentUuid": "d-1",
                "websiteUuid": "w-1",
                "environment": 1,
                "deploymentStatus": 10,
                "cid": "bafybeidirectory",
                "updateTime": "2024-03-01T10:05:00Z"
            })
            .to_string(),
        )
        .expect(1)
        .create_async()
        .await;

    let client = test_client(&server);
    let deployment = client.get_deployment("w-1", "d-1").await.unwrap();

    assert_eq!(deployment.deployment_status, DeploymentStatus::Successful);
    assert!(deployment.deployment_status.is_finished());
    assert_eq!(deployment.cid.as_deref(), Some("bafybeidirectory"));

    get.assert_async().await;
}

#[tokio::test]
async fn test_deploy_function_bundles_uploads_and_creates_job() {
    let mut server = Server::new_async().await;
    let url = server.url();

    // A deployable source tree with a manifest and some noise to ignore.
    let dir = tempfile::tempdir().unwrap();
    write_file(&dir.path().join("package.json"), r#"{"name":"fn"}"#);
    write_file(&dir.path().join("index.js"), "module.exports = {}");
    write_file(&dir.path().join("node_modules/dep/index.js"), "ignored");
    write_file(&dir.path().join(".env"), "SECRET=1");

    // The pipeline uploads exactly one file: the tar.gz bundle.
    let targets = server
        .mock("POST", "/cloud-functions/f-1/upload")
        .match_body(Matcher::Regex(r"f-1\.tar\.gz".to_string()))
        .with_status(201)
        .with_header("content-type", "application/json")
        .with_body(
            json!({
                "files": [{
                    "fileUuid": "u-bundle",
                    "fileName": "f-1.tar.gz",
                    "contentType": "application/gzip",
                    "url": format!("{}/blob/bundle", url),
                }]
            })
            .to_string(),
        )
        .expect(1)
        .create_async()
        .await;
    let put = server
        .mock("PUT", "/blob/bundle")
        .with_status(200)
        .expect(1)
        .create_async()
        .await;
    let links = server
        .mock("POST", "/storage/link-on-ipfs-multiple")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(json!({"links": ["https://gw.example.com/ipfs/bundle"]}).to_string())
        .expect(1)
        .create_async()
        .await;
    let end = server
        .mock(
            "POST",
            Matcher::Regex(r"^/cloud-functions/f-1/upload/[0-9a-f-]+/end$".to_string()),
        )
        .with_status(200)
        .with_body("{}")
        .expect(1)
        .create_async()
        .await;
    let jobs = server
        .mock("POST", "/cloud-functions/f-1/jobs")
        .match_body(Matcher::Regex("sessionUuid".to_string()))
        .with_status(201)
        .with_header("content-type", "application/json")
        .with_body(
            json!({
                "jobUuid": "j-1",
                "functionUuid": "f-1",
                "name": "fn",
                "jobStatus": 1,
                "createTime": "2024-03-01T10:00:00Z"
            })
            .to_string(),
        )
        .expect(1)
        .create_async()
        .await;

    let client = test_client(&server);
    let job = client.deploy_function("f-1", dir.path()).await.unwrap();

    assert_eq!(job.job_uuid, "j-1");
    assert_eq!(job.function_uuid, "f-1");
    assert_eq!(job.job_status, JobStatus::Pending);

    targets.assert_async().await;
    put.assert_async().await;
    links.assert_async().await;
    end.assert_async().await;
    jobs.assert_async().await;
}

#[tokio::test]
async fn test_deploy_function_without_manifest_fails_locally() {
    // No server: a missing manifest must be caught before any request.
    let dir = tempfile::tempdir().unwrap();
    write_file(&dir.path().join("index.js"), "module.exports = {}");

    let client = ApiClient::new(
        "http://127.0.0.1:9".to_string(),
        Auth::XApiKey("test-key".to_string()),
    )
    .unwrap();

    let err = client.deploy_function("f-1", dir.path()).await.unwrap_err();
    assert!(matches!(err, Error::Filesystem { .. }));
    assert!(err.to_string().contains("package.json"));
}
