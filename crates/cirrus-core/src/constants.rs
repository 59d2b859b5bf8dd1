//! Constants shared across the client and pipeline.

/// Maximum number of files submitted in a single upload-target request.
/// Larger file sets are partitioned into sequential groups of this size.
pub const UPLOAD_BATCH_SIZE: usize = 200;

/// Name of the ignore-declaration file read from the root of an upload
/// folder or deployable source tree.
pub const IGNORE_FILE_NAME: &str = ".gitignore";

/// Patterns excluded from every folder upload regardless of whether an
/// ignore file is present.
pub const DEFAULT_IGNORE_PATTERNS: [&str; 4] = [".git", ".gitignore", "node_modules", ".env"];

/// Manifest file that must exist at the root of a deployable function
/// source tree before it is bundled.
pub const FUNCTION_MANIFEST: &str = "package.json";

/// Fallback API endpoint used when `CIRRUS_API_URL` is unset.
pub const DEFAULT_API_URL: &str = "https://api.cirrus.cloud";
