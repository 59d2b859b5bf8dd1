//! Bulk file upload pipeline.
//!
//! Uploading is a three-step negotiation with the platform: request
//! one-shot upload targets for a batch of file metadata, PUT the bytes to
//! the returned URLs, then close the session that grouped the batches.
//! Large file sets are partitioned into sequential batches; the files
//! within one batch transfer concurrently.
//!
//! Folder uploads honor gitignore-style exclusion rules and enumerate
//! the tree deterministically, so identical inputs always produce the
//! same batches.

mod cid;
mod ignore;
mod pipeline;
mod session;
mod walker;

pub use cid::compute_cid;
pub use ignore::IgnoreRuleSet;
pub use pipeline::{upload_files, FileSource};
pub use session::UploadSession;
pub use walker::{list_files, LocalFile};
