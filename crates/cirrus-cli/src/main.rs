//! Cirrus CLI — command-line client for the Cirrus platform API.
//!
//! Set CIRRUS_API_KEY and CIRRUS_API_URL. Uses X-API-Key auth.

use std::path::PathBuf;

use anyhow::Context;
use cirrus_cli::{init_tracing, shorten_middle};
use cirrus_client::upload::FileSource;
use cirrus_client::ApiClient;
use cirrus_core::models::{DeploymentEnvironment, UploadOutcome, UploadParams};
use clap::{Parser, Subcommand};
use serde::Serialize;

#[derive(Parser)]
#[command(name = "cirrus", about = "Cirrus platform CLI")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Storage bucket operations
    Storage {
        #[command(subcommand)]
        sub: StorageCommands,
    },
    /// Website hosting operations
    Hosting {
        #[command(subcommand)]
        sub: HostingCommands,
    },
    /// Cloud function operations
    Functions {
        #[command(subcommand)]
        sub: FunctionCommands,
    },
}

#[derive(Subcommand)]
enum StorageCommands {
    /// Upload a local folder into a bucket
    Upload {
        /// Bucket UUID
        bucket_uuid: String,
        /// Folder to upload
        folder: PathBuf,
        /// Wrap the files into a single remote directory
        #[arg(long)]
        wrap: bool,
        /// Virtual path of the wrapping directory (required with --wrap)
        #[arg(long)]
        directory_path: Option<String>,
        /// Upload everything, skipping .gitignore handling
        #[arg(long)]
        no_ignore: bool,
        /// Output format: json or table
        #[arg(long, default_value = "table")]
        format: String,
    },
}

#[derive(Subcommand)]
enum HostingCommands {
    /// Upload website content from a local folder
    Upload {
        /// Website UUID
        website_uuid: String,
        /// Folder to upload
        folder: PathBuf,
        /// Output format: json or table
        #[arg(long, default_value = "table")]
        format: String,
    },
    /// Deploy the last uploaded content to an environment
    Deploy {
        /// Website UUID
        website_uuid: String,
        /// Target environment: staging or production
        #[arg(long, default_value = "staging")]
        env: String,
    },
    /// Show the state of one deployment
    Status {
        /// Website UUID
        website_uuid: String,
        /// Deployment UUID
        deployment_uuid: String,
    },
}

#[derive(Subcommand)]
enum FunctionCommands {
    /// Bundle a source tree and deploy it as a function job
    Deploy {
        /// Function UUID
        function_uuid: String,
        /// Source directory (must contain package.json)
        source: PathBuf,
    },
}

fn print_json(value: &impl Serialize) -> anyhow::Result<()> {
    let out = serde_json::to_string_pretty(value).context("Serialize response")?;
    println!("{}", out);
    Ok(())
}

fn print_upload_table(outcome: &UploadOutcome) {
    println!("\n=== Upload Result ===\n");
    println!("Session: {}", outcome.session_uuid);
    println!("Files:   {}", outcome.files.len());

    println!(
        "\n{:<28} {:<16} {:<10} {:<26} {:<44}",
        "File", "Path", "Status", "CID", "Link"
    );
    println!("{}", "-".repeat(128));

    for file in &outcome.files {
        let path = if file.path.is_empty() {
            "/"
        } else {
            file.path.as_str()
        };
        let status = file.file_status.map(|s| s.label()).unwrap_or("-");
        let cid = file
            .cid
            .as_deref()
            .map(|c| shorten_middle(c, 26))
            .unwrap_or_else(|| "-".to_string());
        let link = file
            .link
            .as_deref()
            .map(|l| shorten_middle(l, 44))
            .unwrap_or_else(|| "-".to_string());

        println!(
            "{:<28} {:<16} {:<10} {:<26} {:<44}",
            shorten_middle(&file.file_name, 28),
            shorten_middle(path, 16),
            status,
            cid,
            link
        );
    }

    println!();
}

fn report_upload(outcome: &UploadOutcome, format: &str) -> anyhow::Result<()> {
    match format {
        "json" => print_json(outcome),
        _ => {
            print_upload_table(outcome);
            Ok(())
        }
    }
}

fn parse_environment(value: &str) -> anyhow::Result<DeploymentEnvironment> {
    match value.to_lowercase().as_str() {
        "staging" => Ok(DeploymentEnvironment::Staging),
        "production" => Ok(DeploymentEnvironment::Production),
        _ => Err(anyhow::anyhow!(
            "Invalid environment. Must be: staging or production"
        )),
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();
    dotenvy::dotenv().ok();

    let client = ApiClient::from_env()
        .context("Failed to create API client. Set CIRRUS_API_KEY and CIRRUS_API_URL")?;

    let cli = Cli::parse();

    match cli.command {
        Commands::Storage { sub } => match sub {
            StorageCommands::Upload {
                bucket_uuid,
                folder,
                wrap,
                directory_path,
                no_ignore,
                format,
            } => {
                let params = UploadParams {
                    wrap_with_directory: wrap,
                    directory_path,
                    ignore_files: !no_ignore,
                };
                let outcome = client
                    .upload_to_bucket(&bucket_uuid, &params, FileSource::Folder(folder))
                    .await?;
                report_upload(&outcome, &format)?;
            }
        },
        Commands::Hosting { sub } => match sub {
            HostingCommands::Upload {
                website_uuid,
                folder,
                format,
            } => {
                let outcome = client
                    .upload_to_website(
                        &website_uuid,
                        &UploadParams::default(),
                        FileSource::Folder(folder),
                    )
                    .await?;
                report_upload(&outcome, &format)?;
            }
            HostingCommands::Deploy { website_uuid, env } => {
                let environment = parse_environment(&env)?;
                let deployment = client.deploy_website(&website_uuid, environment).await?;
                println!(
                    "Deployment {} to {} is {}",
                    deployment.deployment_uuid,
                    deployment.environment.label(),
                    deployment.deployment_status.label()
                );
                print_json(&deployment)?;
            }
            HostingCommands::Status {
                website_uuid,
                deployment_uuid,
            } => {
                let deployment = client
                    .get_deployment(&website_uuid, &deployment_uuid)
                    .await?;
                println!(
                    "Deployment {} is {}",
                    deployment.deployment_uuid,
                    deployment.deployment_status.label()
                );
                print_json(&deployment)?;
            }
        },
        Commands::Functions { sub } => match sub {
            FunctionCommands::Deploy {
                function_uuid,
                source,
            } => {
                let job = client.deploy_function(&function_uuid, &source).await?;
                println!("Job {} is {}", job.job_uuid, job.job_status.label());
                print_json(&job)?;
            }
        },
    }

    Ok(())
}
