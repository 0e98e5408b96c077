//! `inline-menu-config`: configuration of the inline menu runtime.
//!
//! Provides:
//! - Typed config schema (root path, choice layout, navigation texts, logging)
//! - YAML read/write
//! - Default value application
//! - Validation with field paths

pub mod defaults;
pub mod io;
pub mod schema;
pub mod validation;

pub use defaults::apply_all_defaults;
pub use io::{config_dir, config_file_path, load_config, write_config};
pub use schema::{ChoicesConfig, LoggingConfig, MenuConfig, NavigationConfig};
pub use validation::{validate, ConfigValidationError, ValidationReport};

use anyhow::{bail, Result};
use std::path::Path;

/// Load a config file, apply defaults and validate it.
///
/// Warnings are logged; any validation error fails the load.
pub async fn load_and_prepare(path: &Path) -> Result<MenuConfig> {
    let config = apply_all_defaults(load_config(path).await?);

    let report = validate(&config);
    for warning in &report.warnings {
        tracing::warn!(path = %warning.path, message = %warning.message, "Config warning");
    }
    for error in &report.errors {
        tracing::error!(path = %error.path, message = %error.message, "Config error");
    }
    if let Some(first) = report.errors.first() {
        bail!("{} ({} error(s) in {})", first, report.errors.len(), path.display());
    }

    Ok(config)
}
