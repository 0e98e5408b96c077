//! The back / main menu row.
use inline_menu_config::MenuConfig;
pub use inline_menu_config::defaults::{DEFAULT_BACK_TEXT, DEFAULT_MAIN_MENU_TEXT};

use crate::context::MenuContext;
use crate::keyboard::{rows_fn, ButtonTemplate, RowsFn};
use crate::path::root_of_path;

/// Buttons for the menu at `path`: `..` below the root, the root itself when
/// two or more levels deep.
pub fn back_main_menu_row(path: &str, back_text: &str, main_menu_text: &str) -> Vec<ButtonTemplate> {
    let mut row = Vec::new();
    // "/a/" splits into three parts
    let depth = path.split('/').count();
    if depth >= 3 {
        row.push(ButtonTemplate::callback(back_text, ".."));
    }
    if depth > 3 {
        row.push(ButtonTemplate::callback(main_menu_text, root_of_path(path)));
    }
    row
}

pub fn create_back_main_menu_buttons<C: MenuContext>(
    back_text: impl Into<String>,
    main_menu_text: impl Into<String>,
) -> RowsFn<C> {
    let back_text = back_text.into();
    let main_menu_text = main_menu_text.into();
    rows_fn(move |_ctx: C, path: String| {
        let row = back_main_menu_row(&path, &back_text, &main_menu_text);
        async move { Ok(vec![row]) }
    })
}

/// Same row with the texts from the `navigation` config section.
pub fn back_main_menu_buttons_from_config<C: MenuContext>(config: &MenuConfig) -> RowsFn<C> {
    create_back_main_menu_buttons(config.back_text(), config.main_menu_text())
}
