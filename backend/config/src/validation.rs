//! Config validation with field paths in every message.

use crate::schema::MenuConfig;
use thiserror::Error;

/// A config validation error with field path and message.
#[derive(Debug, Error)]
#[error("Config validation error at '{path}': {message}")]
pub struct ConfigValidationError {
    pub path: String,
    pub message: String,
}

/// All errors and warnings found in one pass.
#[derive(Debug, Default)]
pub struct ValidationReport {
    pub errors: Vec<ConfigValidationError>,
    pub warnings: Vec<ConfigValidationError>,
}

impl ValidationReport {
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    fn error(&mut self, path: impl Into<String>, message: impl Into<String>) {
        self.errors.push(ConfigValidationError {
            path: path.into(),
            message: message.into(),
        });
    }

    fn warn(&mut self, path: impl Into<String>, message: impl Into<String>) {
        self.warnings.push(ConfigValidationError {
            path: path.into(),
            message: message.into(),
        });
    }
}

pub fn validate(config: &MenuConfig) -> ValidationReport {
    let mut report = ValidationReport::default();
    validate_root_path(config, &mut report);
    validate_choices(config, &mut report);
    validate_navigation(config, &mut report);
    validate_logging(config, &mut report);
    report
}

/// The root path is a single segment ending with its only slash.
fn validate_root_path(config: &MenuConfig, report: &mut ValidationReport) {
    let Some(root) = &config.root_path else { return };
    if !root.ends_with('/') {
        report.error("rootPath", format!("Root path '{root}' has to end with a slash, for example '/'"));
    } else if root.matches('/').count() != 1 {
        report.error("rootPath", format!("Root path '{root}' can only contain one slash"));
    }
}

fn validate_choices(config: &MenuConfig, report: &mut ValidationReport) {
    let Some(choices) = &config.choices else { return };
    if choices.columns == Some(0) {
        report.error("choices.columns", "columns must be >= 1");
    }
    if choices.max_rows == Some(0) {
        report.error("choices.maxRows", "maxRows must be >= 1");
    }
}

fn validate_navigation(config: &MenuConfig, report: &mut ValidationReport) {
    let Some(navigation) = &config.navigation else { return };
    if navigation.back_text.as_deref().is_some_and(|t| t.trim().is_empty()) {
        report.warn("navigation.backText", "Empty button text; Telegram rejects buttons without text");
    }
    if navigation.main_menu_text.as_deref().is_some_and(|t| t.trim().is_empty()) {
        report.warn("navigation.mainMenuText", "Empty button text; Telegram rejects buttons without text");
    }
}

fn validate_logging(config: &MenuConfig, report: &mut ValidationReport) {
    let Some(level) = config.logging.as_ref().and_then(|l| l.level.as_deref()) else { return };
    if !matches!(level, "trace" | "debug" | "info" | "warn" | "error") {
        report.error(
            "logging.level",
            format!("Unknown log level '{level}'. Use 'trace', 'debug', 'info', 'warn' or 'error'"),
        );
    }
}
