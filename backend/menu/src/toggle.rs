//! On/off buttons.
use std::future::Future;
use std::sync::Arc;

use tracing::debug;

use crate::action::{action_fn, ActionRegistry, Navigation};
use crate::choices::ensure_action_prefix;
use crate::context::{hide_fn, is_hidden, key_fn, path_fn, ContextValue, HideFn, KeyFn, MenuContext, PathFn};
use crate::error::Result;
use crate::keyboard::{ButtonFn, ButtonTemplate};
use crate::trigger::Trigger;

/// Decorates a button text with its current state.
pub type FormatStateFn = Arc<dyn Fn(&str, bool) -> String + Send + Sync>;

/// `✅ text` when set; `🚫 text` or the plain text when not.
pub fn format_state(text: &str, state: bool, show_false_emoji: bool) -> String {
    match (state, show_false_emoji) {
        (true, _) => format!("✅ {text}"),
        (false, true) => format!("🚫 {text}"),
        (false, false) => text.to_string(),
    }
}

pub struct ToggleOptions<C> {
    pub text: ContextValue<C, String>,
    pub is_set: PathFn<C, bool>,
    pub set: KeyFn<C, bool, Navigation>,
    pub hide: Option<HideFn<C>>,
    pub format_state: Option<FormatStateFn>,
}

impl<C: MenuContext> ToggleOptions<C> {
    pub fn new<I, IFut, S, SFut>(text: impl Into<ContextValue<C, String>>, is_set: I, set: S) -> Self
    where
        I: Fn(C, String) -> IFut + Send + Sync + 'static,
        IFut: Future<Output = anyhow::Result<bool>> + Send + 'static,
        S: Fn(C, bool) -> SFut + Send + Sync + 'static,
        SFut: Future<Output = anyhow::Result<Navigation>> + Send + 'static,
    {
        Self {
            text: text.into(),
            is_set: path_fn(is_set),
            set: key_fn(set),
            hide: None,
            format_state: None,
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

    pub fn format_state<F>(mut self, f: F) -> Self
    where
        F: Fn(&str, bool) -> String + Send + Sync + 'static,
    {
        self.format_state = Some(Arc::new(f));
        self
    }
}

/// Register `{prefix}:true` and `{prefix}:false` and return the button.
pub(crate) fn toggle<C: MenuContext>(
    prefix: &str,
    options: ToggleOptions<C>,
    actions: &mut ActionRegistry<C>,
) -> Result<ButtonFn<C>> {
    ensure_action_prefix(prefix)?;
    let ToggleOptions { text, is_set, set, hide, format_state: format } = options;

    for state in [true, false] {
        let set = Arc::clone(&set);
        let handler = action_fn(move |ctx: C, _path: String| {
            let set = Arc::clone(&set);
            async move { set(ctx, state).await }
        });
        let trigger = Trigger::pattern(format!("{}:{state}$", regex::escape(prefix)))?;
        actions.add(trigger, handler, hide.clone())?;
    }

    let prefix = prefix.to_string();
    Ok(path_fn(move |ctx: C, path: String| {
        let prefix = prefix.clone();
        let text = text.clone();
        let is_set = Arc::clone(&is_set);
        let hide = hide.clone();
        let format = format.clone();
        async move {
            if is_hidden(hide.as_ref(), &ctx, &path).await? {
                return Ok(None);
            }
            let text = text.resolve(&ctx, &path).await?;
            let state = is_set(ctx, path.clone()).await?;
            debug!("[Menu] Toggle {} on {} is {}", prefix, path, state);
            let label = match &format {
                Some(format) => format(&text, state),
                None => format_state(&text, state, true),
            };
            Ok(Some(ButtonTemplate::callback(label, format!("{prefix}:{}", !state))))
        }
    }))
}
