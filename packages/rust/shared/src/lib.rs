//! Shared types, error model, and configuration for cratemaker.
//!
//! This crate is the foundation depended on by the other cratemaker crates.
//! It provides:
//! - [`CrateMakerError`], the unified error type
//! - Domain types ([`Creator`], [`CreatorList`]) and well-known names
//! - Configuration ([`AppConfig`], config loading)

pub mod config;
pub mod error;
pub mod types;

// Re-export public API at crate root for ergonomic imports.
pub use config::{
    AppConfig, DefaultsConfig, NotebooksConfig, RepositoryConfig, config_dir, config_file_path,
    init_config, load_config, load_config_from,
};
pub use error::{CrateMakerError, Result};
pub use types::{
    CRATE_METADATA_FILE, Creator, CreatorList, METADATA_FIELDS, NOTEBOOK_EXTENSION,
    NOTEBOOK_MEDIA_TYPE, ORCID_RESOLVER, RO_CRATE_CONTEXT, RO_CRATE_PROFILE,
};
