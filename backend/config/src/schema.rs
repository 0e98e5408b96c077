//! Inline menu configuration schema.
//!
//! Every field is optional so partial YAML files deserialize; the accessors
//! fall back to the defaults from [`crate::defaults`].

use serde::{Deserialize, Serialize};

use crate::defaults::{
    DEFAULT_BACK_TEXT, DEFAULT_CHOICE_COLUMNS, DEFAULT_CHOICE_MAX_ROWS, DEFAULT_LOG_LEVEL,
    DEFAULT_MAIN_MENU_TEXT, DEFAULT_ROOT_PATH,
};

// ---------------------------------------------------------------------------
// Top-level config
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MenuConfig {
    /// Literal path of the root menu, e.g. `/` or `main/`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub root_path: Option<String>,

    /// Layout of choose/select buttons
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub choices: Option<ChoicesConfig>,

    /// Texts of the back / main menu row
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub navigation: Option<NavigationConfig>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub logging: Option<LoggingConfig>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChoicesConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub columns: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_rows: Option<usize>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NavigationConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub back_text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub main_menu_text: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoggingConfig {
    /// `trace`, `debug`, `info`, `warn` or `error`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub level: Option<String>,
    /// Directory for the JSON log files; console only when unset.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dir: Option<String>,
}

// ---------------------------------------------------------------------------
// Accessors
// ---------------------------------------------------------------------------

impl MenuConfig {
    pub fn root_path(&self) -> &str {
        self.root_path.as_deref().unwrap_or(DEFAULT_ROOT_PATH)
    }

    pub fn choice_columns(&self) -> usize {
        self.choices.as_ref().and_then(|c| c.columns).unwrap_or(DEFAULT_CHOICE_COLUMNS)
    }

    pub fn choice_max_rows(&self) -> usize {
        self.choices.as_ref().and_then(|c| c.max_rows).unwrap_or(DEFAULT_CHOICE_MAX_ROWS)
    }

    pub fn back_text(&self) -> &str {
        self.navigation
            .as_ref()
            .and_then(|n| n.back_text.as_deref())
            .unwrap_or(DEFAULT_BACK_TEXT)
    }

    pub fn main_menu_text(&self) -> &str {
        self.navigation
            .as_ref()
            .and_then(|n| n.main_menu_text.as_deref())
            .unwrap_or(DEFAULT_MAIN_MENU_TEXT)
    }

    pub fn log_level(&self) -> &str {
        self.logging
            .as_ref()
            .and_then(|l| l.level.as_deref())
            .unwrap_or(DEFAULT_LOG_LEVEL)
    }

    pub fn log_dir(&self) -> Option<&str> {
        self.logging.as_ref().and_then(|l| l.dir.as_deref())
    }
}
