//! Config defaults: fills in every unset value of a parsed config.

use crate::schema::{ChoicesConfig, LoggingConfig, MenuConfig, NavigationConfig};

pub const DEFAULT_ROOT_PATH: &str = "/";

/// Buttons per row of a choice control.
pub const DEFAULT_CHOICE_COLUMNS: usize = 6;

/// Rows per page of a choice control.
pub const DEFAULT_CHOICE_MAX_ROWS: usize = 10;

pub const DEFAULT_BACK_TEXT: &str = "🔙back";
pub const DEFAULT_MAIN_MENU_TEXT: &str = "🔝main menu";
pub const DEFAULT_LOG_LEVEL: &str = "info";

/// Apply all defaults to a freshly loaded config.
pub fn apply_all_defaults(config: MenuConfig) -> MenuConfig {
    let config = apply_root_defaults(config);
    let config = apply_choice_defaults(config);
    let config = apply_navigation_defaults(config);
    apply_logging_defaults(config)
}

fn apply_root_defaults(mut config: MenuConfig) -> MenuConfig {
    if config.root_path.is_none() {
        config.root_path = Some(DEFAULT_ROOT_PATH.to_string());
    }
    config
}

fn apply_choice_defaults(mut config: MenuConfig) -> MenuConfig {
    let choices = config.choices.get_or_insert_with(ChoicesConfig::default);
    if choices.columns.is_none() {
        choices.columns = Some(DEFAULT_CHOICE_COLUMNS);
    }
    if choices.max_rows.is_none() {
        choices.max_rows = Some(DEFAULT_CHOICE_MAX_ROWS);
    }
    config
}

fn apply_navigation_defaults(mut config: MenuConfig) -> MenuConfig {
    let navigation = config.navigation.get_or_insert_with(NavigationConfig::default);
    if navigation.back_text.is_none() {
        navigation.back_text = Some(DEFAULT_BACK_TEXT.to_string());
    }
    if navigation.main_menu_text.is_none() {
        navigation.main_menu_text = Some(DEFAULT_MAIN_MENU_TEXT.to_string());
    }
    config
}

fn apply_logging_defaults(mut config: MenuConfig) -> MenuConfig {
    let logging = config.logging.get_or_insert_with(LoggingConfig::default);
    if logging.level.is_none() {
        logging.level = Some(DEFAULT_LOG_LEVEL.to_string());
    }
    config
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fills_every_section() {
        let cfg = apply_all_defaults(MenuConfig::default());
        assert_eq!(cfg.root_path.as_deref(), Some("/"));
        assert_eq!(cfg.choices.unwrap().columns, Some(DEFAULT_CHOICE_COLUMNS));
        assert_eq!(cfg.navigation.unwrap().back_text.as_deref(), Some(DEFAULT_BACK_TEXT));
        assert_eq!(cfg.logging.unwrap().level.as_deref(), Some("info"));
    }

    #[test]
    fn does_not_override_user_values() {
        let mut cfg = MenuConfig::default();
        cfg.choices = Some(ChoicesConfig { columns: Some(2), ..Default::default() });
        cfg.root_path = Some("main/".to_string());

        let cfg = apply_all_defaults(cfg);
        let choices = cfg.choices.unwrap();
        assert_eq!(choices.columns, Some(2));
        assert_eq!(choices.max_rows, Some(DEFAULT_CHOICE_MAX_ROWS));
        assert_eq!(cfg.root_path.as_deref(), Some("main/"));
    }

    #[test]
    fn log_dir_stays_unset() {
        let cfg = apply_all_defaults(MenuConfig::default());
        assert!(cfg.log_dir().is_none());
    }
}
