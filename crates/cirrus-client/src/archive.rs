//! Source tree compression for function deployments.

use std::fs::{self, File};
use std::path::Path;

use cirrus_core::constants::FUNCTION_MANIFEST;
use cirrus_core::{Error, Result};
use flate2::write::GzEncoder;
use flate2::Compression;
use tracing::debug;

use crate::upload::{list_files, IgnoreRuleSet};

/// Compress `source_dir` into a gzipped tar at `dest`, honoring the
/// tree's ignore rules and built-in exclusions. Entry names are the
/// `/`-separated paths relative to the root. Returns the number of files
/// archived.
///
/// The walk and compression are blocking work and run on the blocking
/// thread pool. No output file is created when the tree is rejected.
pub async fn compress_tree(source_dir: &Path, dest: &Path) -> Result<u64> {
    let source_dir = source_dir.to_path_buf();
    let dest = dest.to_path_buf();

    tokio::task::spawn_blocking(move || compress_tree_blocking(&source_dir, &dest))
        .await
        .map_err(|e| Error::Compression(format!("compression task failed: {}", e)))?
}

fn compress_tree_blocking(source_dir: &Path, dest: &Path) -> Result<u64> {
    if !source_dir.is_dir() {
        return Err(Error::filesystem(source_dir, "directory not found"));
    }
    let manifest = source_dir.join(FUNCTION_MANIFEST);
    if !manifest.is_file() {
        return Err(Error::filesystem(manifest, "manifest not found"));
    }

    let rules = IgnoreRuleSet::load(source_dir)?;
    let files = list_files(source_dir, &rules)?;
    if files.is_empty() {
        return Err(Error::Compression(
            "source tree is empty after ignore filtering".to_string(),
        ));
    }

    if let Some(parent) = dest.parent() {
        fs::create_dir_all(parent).map_err(|e| Error::filesystem(parent, e))?;
    }
    let output = File::create(dest).map_err(|e| Error::filesystem(dest, e))?;
    let encoder = GzEncoder::new(output, Compression::default());
    let mut builder = tar::Builder::new(encoder);

    let mut count = 0u64;
    for entry in &files {
        let name = if entry.path.is_empty() {
            entry.file_name.clone()
        } else {
            format!("{}/{}", entry.path, entry.file_name)
        };
        builder
            .append_path_with_name(&entry.source, &name)
            .map_err(|e| Error::filesystem(&entry.source, e))?;
        count += 1;
    }

    let encoder = builder
        .into_inner()
        .map_err(|e| Error::Compression(format!("failed to finalize tar stream: {}", e)))?;
    encoder
        .finish()
        .map_err(|e| Error::Compression(format!("failed to finalize gzip stream: {}", e)))?;

    debug!(files = count, dest = %dest.display(), "Compressed source tree");
    Ok(count)
}
