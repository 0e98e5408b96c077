//! One button per choice key, shared by `choose`, `choose_into_submenu` and
//! `select`.
use std::future::Future;
use std::sync::Arc;

use tracing::{debug, warn};

use crate::action::{action_fn, ActionRegistry, Navigation};
use crate::align::{get_buttons_of_page, ChoiceLayout};
use crate::choices::{ensure_action_prefix, ensure_correct_choice_keys, Choices};
use crate::context::{hide_fn, is_hidden, key_fn, path_fn, ContextValue, HideFn, KeyFn, MenuContext, PathFn};
use crate::error::Result;
use crate::keyboard::{rows_fn, ButtonRow, ButtonTemplate, RowsFn};
use crate::pagination::{create_pagination_choices, page_buttons, register_page_action};
use crate::path::{combine_path, last_segment, menu_of_path};
use crate::trigger::Trigger;

// ---------------------------------------------------------------------------
// Options
// ---------------------------------------------------------------------------

#[derive(Clone)]
struct ChoicePaging<C> {
    get_current_page: PathFn<C, u32>,
    set_page: KeyFn<C, u32, Navigation>,
}

/// Where the choices come from and how they are laid out.
#[derive(Clone)]
pub struct ChoiceOptions<C> {
    choices: ContextValue<C, Choices>,
    hide: Option<HideFn<C>>,
    layout: ChoiceLayout,
    paging: Option<ChoicePaging<C>>,
    disable_choice_exists_check: bool,
}

impl<C: MenuContext> ChoiceOptions<C> {
    pub fn new(choices: impl Into<Choices>) -> Self {
        Self::from_value(ContextValue::Static(choices.into()))
    }

    /// Choices computed per render from `(context, menu path)`.
    pub fn computed<F, Fut>(f: F) -> Self
    where
        F: Fn(C, String) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = anyhow::Result<Choices>> + Send + 'static,
    {
        Self::from_value(ContextValue::dynamic(f))
    }

    fn from_value(choices: ContextValue<C, Choices>) -> Self {
        Self {
            choices,
            hide: None,
            layout: ChoiceLayout::default(),
            paging: None,
            disable_choice_exists_check: false,
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

    pub fn layout(mut self, layout: ChoiceLayout) -> Self {
        self.layout = layout;
        self
    }

    pub fn columns(mut self, columns: usize) -> Self {
        self.layout.columns = columns;
        self
    }

    pub fn max_rows(mut self, max_rows: usize) -> Self {
        self.layout.max_rows = max_rows;
        self
    }

    /// Split the choices into pages once they exceed one page.
    pub fn paging<G, GFut, S, SFut>(mut self, get_current_page: G, set_page: S) -> Self
    where
        G: Fn(C, String) -> GFut + Send + Sync + 'static,
        GFut: Future<Output = anyhow::Result<u32>> + Send + 'static,
        S: Fn(C, u32) -> SFut + Send + Sync + 'static,
        SFut: Future<Output = anyhow::Result<Navigation>> + Send + 'static,
    {
        self.paging = Some(ChoicePaging {
            get_current_page: path_fn(get_current_page),
            set_page: key_fn(set_page),
        });
        self
    }

    /// Pass keys that are no longer among the choices to the handler.
    pub fn disable_choice_exists_check(mut self) -> Self {
        self.disable_choice_exists_check = true;
        self
    }

    pub(crate) fn hide_fn(&self) -> Option<HideFn<C>> {
        self.hide.clone()
    }

    /// Check prefix and static keys, register the page action if paging.
    pub(crate) fn prepare(&self, prefix: &str, actions: &mut ActionRegistry<C>) -> Result<()> {
        ensure_action_prefix(prefix)?;
        if let ContextValue::Static(choices) = &self.choices {
            ensure_correct_choice_keys(choices.keys())?;
        }
        if let Some(paging) = &self.paging {
            register_page_action(
                &paging_prefix(prefix),
                Arc::clone(&paging.set_page),
                self.hide.clone(),
                actions,
            )?;
        }
        Ok(())
    }

    /// The choices for the menu at `path`, `None` when the control is hidden.
    pub(crate) async fn visible_choices(&self, ctx: &C, path: &str) -> anyhow::Result<Option<Choices>> {
        if is_hidden(self.hide.as_ref(), ctx, path).await? {
            return Ok(None);
        }
        let choices = self.choices.resolve(ctx, path).await?;
        if matches!(self.choices, ContextValue::Dynamic(_)) {
            ensure_correct_choice_keys(choices.keys())?;
        }
        Ok(Some(choices))
    }

    /// Whether a pressed key still exists (always true with the check disabled).
    pub(crate) async fn accepts_key(&self, ctx: &C, menu_path: &str, key: &str) -> anyhow::Result<bool> {
        if self.disable_choice_exists_check {
            return Ok(true);
        }
        let choices = self.choices.resolve(ctx, menu_path).await?;
        Ok(choices.contains_key(key))
    }

    /// The entries on the current page and the pagination row, if any.
    pub(crate) async fn page(
        &self,
        ctx: &C,
        path: &str,
        prefix: &str,
        choices: &Choices,
    ) -> anyhow::Result<ChoicePage> {
        let entries: Vec<(String, String)> =
            choices.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect();

        let Some(paging) = &self.paging else {
            let first = get_buttons_of_page(&entries, self.layout.columns, self.layout.max_rows, 1);
            return Ok(ChoicePage { entries: first.to_vec(), pagination: None });
        };

        let current = (paging.get_current_page)(ctx.clone(), path.to_string()).await?;
        let on_page = get_buttons_of_page(&entries, self.layout.columns, self.layout.max_rows, current).to_vec();

        let per_page = self.layout.per_page();
        let pagination = if entries.len() > per_page {
            let total_pages = entries.len() as f64 / per_page as f64;
            let pages = create_pagination_choices(total_pages, Some(f64::from(current)));
            Some(page_buttons(&paging_prefix(prefix), &pages))
        } else {
            None
        };
        Ok(ChoicePage { entries: on_page, pagination })
    }

    /// Arrange buttons in rows of `columns` and append the pagination row.
    pub(crate) fn rows(&self, buttons: Vec<ButtonTemplate>, pagination: Option<ButtonRow>) -> Vec<ButtonRow> {
        let mut rows: Vec<ButtonRow> = buttons
            .chunks(self.layout.columns.max(1))
            .map(<[ButtonTemplate]>::to_vec)
            .collect();
        rows.extend(pagination);
        rows
    }
}

pub(crate) struct ChoicePage {
    pub entries: Vec<(String, String)>,
    pub pagination: Option<ButtonRow>,
}

fn paging_prefix(prefix: &str) -> String {
    format!("{prefix}P")
}

/// Key of a path whose last segment is `{prefix}:{key}`.
pub(crate) fn key_of_path<'p>(prefix: &str, path: &'p str) -> Option<&'p str> {
    last_segment(path).strip_prefix(prefix)?.strip_prefix(':')
}

// ---------------------------------------------------------------------------
// Choose
// ---------------------------------------------------------------------------

/// Register the choice action and return the row generator.
pub(crate) fn choose<C: MenuContext>(
    prefix: &str,
    options: ChoiceOptions<C>,
    do_fn: KeyFn<C, String, Navigation>,
    actions: &mut ActionRegistry<C>,
) -> Result<RowsFn<C>> {
    options.prepare(prefix, actions)?;

    let handler = {
        let options = options.clone();
        let prefix = prefix.to_string();
        action_fn(move |ctx: C, path: String| {
            let options = options.clone();
            let do_fn = Arc::clone(&do_fn);
            let key = key_of_path(&prefix, &path).map(str::to_string);
            async move {
                let Some(key) = key else {
                    return Ok(Navigation::Refresh);
                };
                if !options.accepts_key(&ctx, menu_of_path(&path), &key).await? {
                    warn!("[Menu] Choice {} is gone, refreshing {}", key, menu_of_path(&path));
                    return Ok(Navigation::Refresh);
                }
                do_fn(ctx, key).await
            }
        })
    };
    let trigger = Trigger::pattern(format!("{}:([^/]+)$", regex::escape(prefix)))?;
    actions.add(trigger, handler, options.hide_fn())?;

    let prefix = prefix.to_string();
    Ok(rows_fn(move |ctx: C, path: String| {
        let options = options.clone();
        let prefix = prefix.clone();
        async move {
            let Some(choices) = options.visible_choices(&ctx, &path).await? else {
                return Ok(Vec::new());
            };
            let page = options.page(&ctx, &path, &prefix, &choices).await?;
            debug!("[Menu] {} choices of {} on {}", page.entries.len(), prefix, path);
            let buttons = page
                .entries
                .into_iter()
                .map(|(key, text)| ButtonTemplate::callback(text, format!("{prefix}:{key}")))
                .collect();
            Ok(options.rows(buttons, page.pagination))
        }
    }))
}

// ---------------------------------------------------------------------------
// Choose into submenu
// ---------------------------------------------------------------------------

/// Trigger, hide predicate and row generator of a choice submenu.
pub(crate) struct ChoiceSubmenu<C> {
    pub trigger: Trigger,
    pub hide: HideFn<C>,
    pub rows: RowsFn<C>,
}

/// Buttons `{prefix}:{key}/` leading into one shared submenu.
pub(crate) fn choose_into_submenu<C: MenuContext>(
    prefix: &str,
    options: ChoiceOptions<C>,
    actions: &mut ActionRegistry<C>,
) -> Result<ChoiceSubmenu<C>> {
    options.prepare(prefix, actions)?;
    let trigger = Trigger::pattern(format!("{}:([^/]+)/", regex::escape(prefix)))?;

    // Evaluated with the matched submenu prefix, e.g. `/menu/item:3/`.
    let hide = {
        let options = options.clone();
        let prefix = prefix.to_string();
        hide_fn(move |ctx: C, path: String| {
            let options = options.clone();
            let key = key_of_path(&prefix, &path).map(str::to_string);
            let parent = combine_path(&path, "..");
            async move {
                let parent = parent?;
                if is_hidden(options.hide.as_ref(), &ctx, &parent).await? {
                    return Ok(true);
                }
                match key {
                    Some(key) => Ok(!options.accepts_key(&ctx, &parent, &key).await?),
                    None => Ok(true),
                }
            }
        })
    };

    let prefix = prefix.to_string();
    let rows = rows_fn(move |ctx: C, path: String| {
        let options = options.clone();
        let prefix = prefix.clone();
        async move {
            let Some(choices) = options.visible_choices(&ctx, &path).await? else {
                return Ok(Vec::new());
            };
            let page = options.page(&ctx, &path, &prefix, &choices).await?;
            let buttons = page
                .entries
                .into_iter()
                .map(|(key, text)| ButtonTemplate::callback(text, format!("{prefix}:{key}/")))
                .collect();
            Ok(options.rows(buttons, page.pagination))
        }
    });

    Ok(ChoiceSubmenu { trigger, hide, rows })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::keyboard::Keyboard;
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::sync::Mutex;

    #[derive(Clone)]
    struct Ctx;

    impl MenuContext for Ctx {
        fn callback_data(&self) -> Option<&str> {
            None
        }
    }

    async fn render(rows: RowsFn<Ctx>, path: &str) -> Vec<Vec<(String, String)>> {
        let mut keyboard = Keyboard::new();
        keyboard.add_creator(rows);
        let markup = keyboard.render(&Ctx, path).await.unwrap();
        markup
            .inline_keyboard
            .into_iter()
            .map(|row| {
                row.into_iter()
                    .map(|b| (b.text.clone(), b.callback_data().unwrap_or_default().to_string()))
                    .collect()
            })
            .collect()
    }

    fn record_into(calls: Arc<Mutex<Vec<String>>>) -> KeyFn<Ctx, String, Navigation> {
        key_fn(move |_ctx: Ctx, key: String| {
            let calls = Arc::clone(&calls);
            async move {
                calls.lock().unwrap().push(key);
                Ok(Navigation::Done)
            }
        })
    }

    #[tokio::test]
    async fn buttons_per_key() {
        let calls = Arc::new(Mutex::new(Vec::new()));
        let mut actions = ActionRegistry::new();
        let options = ChoiceOptions::new(Choices::from_pairs([("de", "Deutsch"), ("en", "English")]));
        let rows = choose("lang", options, record_into(calls), &mut actions).unwrap();

        assert_eq!(
            render(rows, "/settings/").await,
            vec![vec![
                ("Deutsch".to_string(), "/settings/lang:de".to_string()),
                ("English".to_string(), "/settings/lang:en".to_string()),
            ]]
        );
        assert_eq!(actions.len(), 1);
    }

    #[tokio::test]
    async fn stale_key_refreshes() {
        let calls = Arc::new(Mutex::new(Vec::new()));
        let mut actions = ActionRegistry::new();
        let options = ChoiceOptions::new(vec!["a", "b"]);
        choose("c", options, record_into(Arc::clone(&calls)), &mut actions).unwrap();

        let entries = actions.list(&Trigger::pattern("^/").unwrap()).unwrap();
        let action = &entries[0];
        assert!(action.trigger().is_match("/c:a"));

        let stale = action.invoke(&Ctx, "/c:z").await.unwrap();
        assert_eq!(stale, crate::action::Invocation::Executed(Navigation::Refresh));
        let fresh = action.invoke(&Ctx, "/c:b").await.unwrap();
        assert_eq!(fresh, crate::action::Invocation::Executed(Navigation::Done));
        assert_eq!(*calls.lock().unwrap(), vec!["b".to_string()]);
    }

    #[tokio::test]
    async fn disabled_check_passes_unknown_keys() {
        let calls = Arc::new(Mutex::new(Vec::new()));
        let mut actions = ActionRegistry::new();
        let options = ChoiceOptions::new(vec!["a"]).disable_choice_exists_check();
        choose("c", options, record_into(Arc::clone(&calls)), &mut actions).unwrap();

        let entries = actions.list(&Trigger::pattern("^/").unwrap()).unwrap();
        entries[0].invoke(&Ctx, "/c:z").await.unwrap();
        assert_eq!(*calls.lock().unwrap(), vec!["z".to_string()]);
    }

    #[tokio::test]
    async fn hidden_choices_skip_the_choice_function() {
        let evaluated = Arc::new(AtomicU32::new(0));
        let counter = Arc::clone(&evaluated);
        let options = ChoiceOptions::computed(move |_ctx: Ctx, _path: String| {
            let counter = Arc::clone(&counter);
            async move {
                counter.fetch_add(1, Ordering::SeqCst);
                Ok(Choices::from_keys(["x"]))
            }
        })
        .hide(|_ctx: Ctx, _path: String| async { Ok(true) });

        let mut actions = ActionRegistry::new();
        let rows = choose("c", options, record_into(Arc::default()), &mut actions).unwrap();
        assert!(render(rows, "/").await.is_empty());
        assert_eq!(evaluated.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn invalid_static_keys_fail_early() {
        let mut actions = ActionRegistry::new();
        let options = ChoiceOptions::new(vec!["a/b"]);
        assert!(choose("c", options, record_into(Arc::default()), &mut actions).is_err());
        assert!(actions.is_empty());
    }

    #[tokio::test]
    async fn paging_adds_a_page_row() {
        let keys: Vec<String> = (1..=5).map(|i| i.to_string()).collect();
        let options = ChoiceOptions::new(keys)
            .columns(2)
            .max_rows(1)
            .paging(
                |_ctx: Ctx, _path: String| async { Ok(2) },
                |_ctx: Ctx, _page: u32| async { Ok(Navigation::Refresh) },
            );

        let mut actions = ActionRegistry::new();
        let rows = choose("n", options, record_into(Arc::default()), &mut actions).unwrap();
        let rendered = render(rows, "/").await;

        assert_eq!(rendered.len(), 2);
        let first_row: Vec<&str> = rendered[0].iter().map(|(text, _)| text.as_str()).collect();
        assert_eq!(first_row, vec!["3", "4"]);
        let page_row: Vec<&str> = rendered[1].iter().map(|(_, data)| data.as_str()).collect();
        assert_eq!(page_row, vec!["/nP:1", "/nP:2", "/nP:3"]);
        // choice action + page action
        assert_eq!(actions.len(), 2);
    }

    #[tokio::test]
    async fn submenu_buttons_and_hide() {
        let mut actions = ActionRegistry::new();
        let options = ChoiceOptions::new(vec!["a", "b"]);
        let submenu = choose_into_submenu("item", options, &mut actions).unwrap();

        let rendered = render(Arc::clone(&submenu.rows), "/list/").await;
        assert_eq!(rendered[0][0].1, "/list/item:a/");
        assert!(actions.is_empty());

        assert!(!(submenu.hide)(Ctx, "/list/item:a/".into()).await.unwrap());
        assert!((submenu.hide)(Ctx, "/list/item:zz/".into()).await.unwrap());
    }
}
