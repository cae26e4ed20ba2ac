//! # Roster Common Library
//!
//! Shared code for the roster enrichment tools:
//! - Error types
//! - TOML configuration loading and resolution
//! - Tracing initialization
//! - Tabular sheet storage (A1 addressing, CSV backend)

pub mod config;
pub mod error;
pub mod logging;
pub mod sheet;

pub use error::{Error, Result};
