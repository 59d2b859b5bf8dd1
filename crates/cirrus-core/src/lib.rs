//! Core types for the Cirrus platform client.
//!
//! This crate holds the pieces shared by the API client and the CLI:
//! the error taxonomy, wire models, and pipeline constants. It performs
//! no I/O of its own.

pub mod constants;
pub mod error;
pub mod models;

pub use error::{Error, Result};
