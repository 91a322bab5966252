//! Core types and configuration for the thaw bundle inspector
//!
//! This crate provides the foundational types used throughout the workspace.

pub mod config;
pub mod error;
pub mod types;

pub use config::{CleanupConfig, Config, ScanConfig};
pub use error::{Error, Result};
pub use types::*;
