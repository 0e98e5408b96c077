//! Multi-select over a set of choices.
use std::future::Future;
use std::sync::Arc;

use tracing::warn;

use crate::action::{action_fn, ActionRegistry, Navigation};
use crate::choose::ChoiceOptions;
use crate::context::{key_fn, KeyFn, MenuContext};
use crate::error::Result;
use crate::keyboard::{rows_fn, ButtonTemplate, RowsFn};
use crate::path::{last_segment, menu_of_path};
use crate::toggle::{format_state, FormatStateFn};
use crate::trigger::Trigger;

pub struct SelectOptions<C> {
    pub choices: ChoiceOptions<C>,
    pub is_set: KeyFn<C, String, bool>,
    pub set: KeyFn<C, (String, bool), Navigation>,
    pub show_false_emoji: bool,
    pub format_state: Option<FormatStateFn>,
}

impl<C: MenuContext> SelectOptions<C> {
    pub fn new<I, IFut, S, SFut>(choices: ChoiceOptions<C>, is_set: I, set: S) -> Self
    where
        I: Fn(C, String) -> IFut + Send + Sync + 'static,
        IFut: Future<Output = anyhow::Result<bool>> + Send + 'static,
        S: Fn(C, String, bool) -> SFut + Send + Sync + 'static,
        SFut: Future<Output = anyhow::Result<Navigation>> + Send + 'static,
    {
        let set = Arc::new(set);
        Self {
            choices,
            is_set: key_fn(is_set),
            set: key_fn(move |ctx: C, (key, state): (String, bool)| set(ctx, key, state)),
            show_false_emoji: false,
            format_state: None,
        }
    }

    pub fn show_false_emoji(mut self) -> Self {
        self.show_false_emoji = true;
        self
    }

    pub fn format_state<F>(mut self, f: F) -> Self
    where
        F: Fn(&str, bool) -> String + Send + Sync + 'static,
    {
        self.format_state = Some(Arc::new(f));
        self
    }
}

/// `(key, new state)` of a path whose last segment is `{prefix}T:{key}` or
/// `{prefix}F:{key}`.
fn selection_of_path<'p>(prefix: &str, path: &'p str) -> Option<(&'p str, bool)> {
    let rest = last_segment(path).strip_prefix(prefix)?;
    if let Some(key) = rest.strip_prefix("T:") {
        Some((key, true))
    } else {
        rest.strip_prefix("F:").map(|key| (key, false))
    }
}

/// Register the select action and return the row generator.
pub(crate) fn select<C: MenuContext>(
    prefix: &str,
    options: SelectOptions<C>,
    actions: &mut ActionRegistry<C>,
) -> Result<RowsFn<C>> {
    let SelectOptions { choices, is_set, set, show_false_emoji, format_state: format } = options;
    choices.prepare(prefix, actions)?;

    let handler = {
        let choices = choices.clone();
        let prefix = prefix.to_string();
        action_fn(move |ctx: C, path: String| {
            let choices = choices.clone();
            let set = Arc::clone(&set);
            let selection = selection_of_path(&prefix, &path).map(|(key, state)| (key.to_string(), state));
            async move {
                let Some((key, state)) = selection else {
                    return Ok(Navigation::Refresh);
                };
                if !choices.accepts_key(&ctx, menu_of_path(&path), &key).await? {
                    warn!("[Menu] Selection {} is gone, refreshing {}", key, menu_of_path(&path));
                    return Ok(Navigation::Refresh);
                }
                set(ctx, (key, state)).await
            }
        })
    };
    let trigger = Trigger::pattern(format!("{}([TF]):([^/]+)$", regex::escape(prefix)))?;
    actions.add(trigger, handler, choices.hide_fn())?;

    let prefix = prefix.to_string();
    Ok(rows_fn(move |ctx: C, path: String| {
        let choices = choices.clone();
        let prefix = prefix.clone();
        let is_set = Arc::clone(&is_set);
        let format = format.clone();
        async move {
            let Some(available) = choices.visible_choices(&ctx, &path).await? else {
                return Ok(Vec::new());
            };
            let page = choices.page(&ctx, &path, &prefix, &available).await?;

            let mut buttons = Vec::with_capacity(page.entries.len());
            for (key, text) in page.entries {
                let state = is_set(ctx.clone(), key.clone()).await?;
                let label = match &format {
                    Some(format) => format(&text, state),
                    None => format_state(&text, state, show_false_emoji),
                };
                let next = if state { 'F' } else { 'T' };
                buttons.push(ButtonTemplate::callback(label, format!("{prefix}{next}:{key}")));
            }
            Ok(choices.rows(buttons, page.pagination))
        }
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::action::Invocation;
    use crate::keyboard::Keyboard;
    use std::collections::BTreeSet;
    use std::sync::Mutex;

    #[derive(Clone, Default)]
    struct Ctx(Arc<Mutex<BTreeSet<String>>>);

    impl MenuContext for Ctx {
        fn callback_data(&self) -> Option<&str> {
            None
        }
    }

    fn options(choices: ChoiceOptions<Ctx>) -> SelectOptions<Ctx> {
        SelectOptions::new(
            choices,
            |ctx: Ctx, key: String| async move { Ok(ctx.0.lock().unwrap().contains(&key)) },
            |ctx: Ctx, key: String, state: bool| async move {
                let mut selected = ctx.0.lock().unwrap();
                if state {
                    selected.insert(key);
                } else {
                    selected.remove(&key);
                }
                Ok(Navigation::Refresh)
            },
        )
    }

    #[tokio::test]
    async fn buttons_encode_the_new_state() {
        let ctx = Ctx::default();
        ctx.0.lock().unwrap().insert("b".to_string());

        let mut actions = ActionRegistry::new();
        let rows = select("s", options(ChoiceOptions::new(vec!["a", "b"])), &mut actions).unwrap();
        let mut keyboard = Keyboard::new();
        keyboard.add_creator(rows);
        let markup = keyboard.render(&ctx, "/pick/").await.unwrap();

        let row = &markup.inline_keyboard[0];
        assert_eq!(row[0].text, "a");
        assert_eq!(row[0].callback_data(), Some("/pick/sT:a"));
        assert_eq!(row[1].text, "✅ b");
        assert_eq!(row[1].callback_data(), Some("/pick/sF:b"));
    }

    #[tokio::test]
    async fn show_false_emoji() {
        let ctx = Ctx::default();
        let mut actions = ActionRegistry::new();
        let rows = select("s", options(ChoiceOptions::new(vec!["a"])).show_false_emoji(), &mut actions).unwrap();
        let rendered = rows(ctx, "/".into()).await.unwrap();
        assert_eq!(rendered, vec![vec![ButtonTemplate::callback("🚫 a", "sT:a")]]);
    }

    #[tokio::test]
    async fn pressing_selects_and_deselects() {
        let ctx = Ctx::default();
        let mut actions = ActionRegistry::new();
        select("s", options(ChoiceOptions::new(vec!["a"])), &mut actions).unwrap();
        let entries = actions.list(&Trigger::pattern("^/").unwrap()).unwrap();
        let action = &entries[0];

        action.invoke(&ctx, "/sT:a").await.unwrap();
        assert!(ctx.0.lock().unwrap().contains("a"));
        action.invoke(&ctx, "/sF:a").await.unwrap();
        assert!(ctx.0.lock().unwrap().is_empty());

        let stale = action.invoke(&ctx, "/sT:gone").await.unwrap();
        assert_eq!(stale, Invocation::Executed(Navigation::Refresh));
        assert!(ctx.0.lock().unwrap().is_empty());
    }

    #[test]
    fn selection_parsing() {
        assert_eq!(selection_of_path("s", "/m/sT:key"), Some(("key", true)));
        assert_eq!(selection_of_path("s", "/m/sF:key"), Some(("key", false)));
        assert_eq!(selection_of_path("s", "/m/sX:key"), None);
    }
}
