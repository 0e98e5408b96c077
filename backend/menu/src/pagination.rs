//! Page-number buttons.
use std::collections::BTreeMap;
use std::future::Future;
use std::sync::Arc;

use tracing::debug;

use crate::action::{action_fn, ActionRegistry, Navigation};
use crate::choices::ensure_action_prefix;
use crate::context::{hide_fn, is_hidden, key_fn, path_fn, HideFn, KeyFn, MenuContext, PathFn};
use crate::error::Result;
use crate::keyboard::{rows_fn, ButtonTemplate, RowsFn};
use crate::path::{last_segment, menu_of_path};
use crate::trigger::Trigger;

/// Page buttons for `current_page` out of `total_pages`.
///
/// Shows the current page with its neighbours, plus the first and last page
/// when they are further away. A single page needs no buttons at all.
pub fn create_pagination_choices(total_pages: f64, current_page: Option<f64>) -> BTreeMap<u32, String> {
    let mut buttons = BTreeMap::new();

    let total = total_pages.ceil();
    if !total.is_finite() || total < 2.0 {
        return buttons;
    }
    let total = total.min(f64::from(u32::MAX)) as u32;

    let current = current_page
        .filter(|page| page.is_finite())
        .unwrap_or(1.0)
        .floor()
        .clamp(1.0, f64::from(total)) as u32;

    if current > 1 {
        let before = current - 1;
        if before > 1 {
            buttons.insert(1, "1 ⏪".to_string());
        }
        buttons.insert(before, format!("{before} ◀️"));
    }

    buttons.insert(current, current.to_string());

    if current < total {
        let after = current + 1;
        buttons.insert(after, format!("▶️ {after}"));
        if after < total {
            buttons.insert(total, format!("⏩ {total}"));
        }
    }

    buttons
}

/// Row of page buttons with relative paths `{prefix}:{page}`.
pub(crate) fn page_buttons(prefix: &str, choices: &BTreeMap<u32, String>) -> Vec<ButtonTemplate> {
    choices
        .iter()
        .map(|(page, text)| ButtonTemplate::callback(text.clone(), format!("{prefix}:{page}")))
        .collect()
}

/// Trigger matching `{prefix}:{page}`.
pub(crate) fn page_trigger(prefix: &str) -> Result<Trigger> {
    Trigger::pattern(format!("{}:(\\d+)$", regex::escape(prefix)))
}

/// Page number from an action path ending in `{prefix}:{page}`.
pub(crate) fn page_of_path(prefix: &str, path: &str) -> Option<u32> {
    last_segment(path)
        .strip_prefix(prefix)?
        .strip_prefix(':')?
        .parse()
        .ok()
}

/// Register the page action that calls `set_page`.
pub(crate) fn register_page_action<C: MenuContext>(
    prefix: &str,
    set_page: KeyFn<C, u32, Navigation>,
    hide: Option<HideFn<C>>,
    actions: &mut ActionRegistry<C>,
) -> Result<()> {
    let owned_prefix = prefix.to_string();
    let handler = action_fn(move |ctx: C, path: String| {
        let set_page = Arc::clone(&set_page);
        let page = page_of_path(&owned_prefix, &path);
        async move {
            match page {
                Some(page) => set_page(ctx, page).await,
                // \d+ that does not fit into u32
                None => Ok(Navigation::Refresh),
            }
        }
    });
    actions.add(page_trigger(prefix)?, handler, hide)
}

// ---------------------------------------------------------------------------
// Generator
// ---------------------------------------------------------------------------

pub struct PaginationOptions<C> {
    pub get_total_pages: PathFn<C, f64>,
    pub get_current_page: PathFn<C, f64>,
    pub set_page: KeyFn<C, u32, Navigation>,
    pub hide: Option<HideFn<C>>,
}

impl<C: MenuContext> PaginationOptions<C> {
    pub fn new<T, TFut, G, GFut, S, SFut>(get_total_pages: T, get_current_page: G, set_page: S) -> Self
    where
        T: Fn(C, String) -> TFut + Send + Sync + 'static,
        TFut: Future<Output = anyhow::Result<f64>> + Send + 'static,
        G: Fn(C, String) -> GFut + Send + Sync + 'static,
        GFut: Future<Output = anyhow::Result<f64>> + Send + 'static,
        S: Fn(C, u32) -> SFut + Send + Sync + 'static,
        SFut: Future<Output = anyhow::Result<Navigation>> + Send + 'static,
    {
        Self {
            get_total_pages: path_fn(get_total_pages),
            get_current_page: path_fn(get_current_page),
            set_page: key_fn(set_page),
            hide: None,
        }
    }

    pub fn hide<F, Fut>(mut self, hide: F) -> Self
    where
        F: Fn(C, String) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = anyhow::Result<bool>> + Send + 'static,
    {
        self.hide = Some(hide_fn(hide));
        self
    }
}

/// Register the page trigger and return the row generator.
pub(crate) fn pagination<C: MenuContext>(
    prefix: &str,
    options: PaginationOptions<C>,
    actions: &mut ActionRegistry<C>,
) -> Result<RowsFn<C>> {
    ensure_action_prefix(prefix)?;
    let PaginationOptions { get_total_pages, get_current_page, set_page, hide } = options;
    register_page_action(prefix, set_page, hide.clone(), actions)?;

    let prefix = prefix.to_string();
    Ok(rows_fn(move |ctx: C, path: String| {
        let prefix = prefix.clone();
        let hide = hide.clone();
        let get_total_pages = Arc::clone(&get_total_pages);
        let get_current_page = Arc::clone(&get_current_page);
        async move {
            if is_hidden(hide.as_ref(), &ctx, &path).await? {
                return Ok(Vec::new());
            }
            let total = get_total_pages(ctx.clone(), path.clone()).await?;
            let current = get_current_page(ctx, path.clone()).await?;
            let choices = create_pagination_choices(total, Some(current));
            debug!("[Menu] {} page buttons for {}", choices.len(), menu_of_path(&path));
            Ok(vec![page_buttons(&prefix, &choices)])
        }
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn expected(pairs: &[(u32, &str)]) -> BTreeMap<u32, String> {
        pairs.iter().map(|(k, v)| (*k, v.to_string())).collect()
    }

    #[test]
    fn middle_page() {
        assert_eq!(
            create_pagination_choices(5.0, Some(3.0)),
            expected(&[(1, "1 ⏪"), (2, "2 ◀️"), (3, "3"), (4, "▶️ 4"), (5, "⏩ 5")])
        );
    }

    #[test]
    fn single_page_has_no_buttons() {
        assert!(create_pagination_choices(1.0, Some(1.0)).is_empty());
        assert!(create_pagination_choices(0.0, None).is_empty());
    }

    #[test]
    fn first_and_last_page() {
        assert_eq!(
            create_pagination_choices(5.0, Some(1.0)),
            expected(&[(1, "1"), (2, "▶️ 2"), (5, "⏩ 5")])
        );
        assert_eq!(
            create_pagination_choices(5.0, Some(5.0)),
            expected(&[(1, "1 ⏪"), (4, "4 ◀️"), (5, "5")])
        );
    }

    #[test]
    fn two_pages() {
        assert_eq!(create_pagination_choices(2.0, Some(2.0)), expected(&[(1, "1 ◀️"), (2, "2")]));
    }

    #[test]
    fn total_is_rounded_up() {
        assert_eq!(
            create_pagination_choices(2.2, Some(3.0)),
            expected(&[(2, "2 ◀️"), (3, "3")])
        );
    }

    #[test]
    fn current_page_is_clamped() {
        assert_eq!(create_pagination_choices(3.0, Some(f64::NAN)), create_pagination_choices(3.0, Some(1.0)));
        assert_eq!(create_pagination_choices(3.0, Some(-4.0)), create_pagination_choices(3.0, Some(1.0)));
        assert_eq!(create_pagination_choices(3.0, Some(42.0)), create_pagination_choices(3.0, Some(3.0)));
        assert!(create_pagination_choices(f64::INFINITY, Some(1.0)).is_empty());
    }

    #[test]
    fn page_from_path() {
        assert_eq!(page_of_path("p", "/menu/p:12"), Some(12));
        assert_eq!(page_of_path("p", "/menu/q:12"), None);
        assert!(page_trigger("p").unwrap().is_match("/menu/p:3"));
        assert!(!page_trigger("p").unwrap().is_match("/menu/p:x"));
    }
}
