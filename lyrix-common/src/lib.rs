//! # lyrix Common Library
//!
//! Shared code for the lyrix workspace:
//! - Error type used across crates
//! - TOML bootstrap configuration loading
//! - Atomic file replacement for persisted snapshots

pub mod config;
pub mod error;
pub mod file_utils;

pub use error::{Error, Result};
