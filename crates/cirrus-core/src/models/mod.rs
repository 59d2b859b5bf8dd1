//! Data models for the Cirrus client
//!
//! Wire types use camelCase field names to match the platform API.
//! Each sub-module covers one feature area.

mod file;
mod functions;
mod hosting;
mod upload;

// Re-export all models for convenient imports
pub use file::*;
pub use functions::*;
pub use hosting::*;
pub use upload::*;
