//! lyrix-harvest library interface
//!
//! Resumable harvesting of an artist's lyrics from the Genius catalog into
//! an append-only text corpus. Exposed as a library for integration testing.

pub mod config;
pub mod error;
pub mod models;
pub mod services;

pub use crate::error::{HarvestError, HarvestResult};
