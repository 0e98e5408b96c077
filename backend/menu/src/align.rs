//! Arranging a flat list of buttons into pages of rows.
use inline_menu_config::defaults::{DEFAULT_CHOICE_COLUMNS, DEFAULT_CHOICE_MAX_ROWS};
use inline_menu_config::MenuConfig;

/// Columns and rows of one page of choice buttons.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChoiceLayout {
    pub columns: usize,
    pub max_rows: usize,
}

impl Default for ChoiceLayout {
    fn default() -> Self {
        Self { columns: DEFAULT_CHOICE_COLUMNS, max_rows: DEFAULT_CHOICE_MAX_ROWS }
    }
}

impl From<&MenuConfig> for ChoiceLayout {
    fn from(config: &MenuConfig) -> Self {
        Self { columns: config.choice_columns(), max_rows: config.choice_max_rows() }
    }
}

impl ChoiceLayout {
    pub fn per_page(&self) -> usize {
        maximum_buttons_per_page(self.columns, self.max_rows)
    }
}

pub fn maximum_buttons_per_page(columns: usize, max_rows: usize) -> usize {
    columns.max(1) * max_rows.max(1)
}

/// Buttons on `page` (1-based, clamped to the existing pages).
pub fn get_buttons_of_page<T>(buttons: &[T], columns: usize, max_rows: usize, page: u32) -> &[T] {
    let page_length = maximum_buttons_per_page(columns, max_rows);
    let total_pages = buttons.len().div_ceil(page_length);
    let selected = (page as usize).clamp(1, total_pages.max(1));
    let start = (selected - 1) * page_length;
    let end = (start + page_length).min(buttons.len());
    &buttons[start.min(end)..end]
}

pub fn get_rows_of_buttons<T: Clone>(buttons: &[T], columns: usize, max_rows: usize, page: u32) -> Vec<Vec<T>> {
    get_buttons_of_page(buttons, columns, max_rows, page)
        .chunks(columns.max(1))
        .map(<[T]>::to_vec)
        .collect()
}
