//! Menu templates: a body, a keyboard, the actions behind its buttons and
//! the submenus it leads to.
use std::fmt;
use std::future::Future;
use std::sync::Arc;

use async_trait::async_trait;

use crate::action::{action_fn, ActionEntry, ActionRegistry, Navigation};
use crate::body::Body;
use crate::choose::{self, ChoiceOptions};
use crate::context::{either_hidden, hide_fn, is_hidden, key_fn, path_fn, ContextValue, HideFn, MenuContext};
use crate::error::{MenuError, Result};
use crate::keyboard::{ButtonSource, ButtonTemplate, InlineKeyboardButton, InlineKeyboardMarkup, Keyboard, RowsFn};
use crate::pagination::{self, PaginationOptions};
use crate::select::{self, SelectOptions};
use crate::toggle::{self, ToggleOptions};
use crate::trigger::{ensure_submenu_trigger, Trigger};

// ---------------------------------------------------------------------------
// MenuLike
// ---------------------------------------------------------------------------

/// Anything the dispatcher can render and route into.
#[async_trait]
pub trait MenuLike<C: MenuContext>: Send + Sync {
    async fn render_body(&self, ctx: &C, path: &str) -> Result<Body>;

    async fn render_keyboard(&self, ctx: &C, path: &str) -> Result<InlineKeyboardMarkup>;

    /// Action handlers with triggers combined against the absolute `prefix`.
    fn render_action_handlers(&self, prefix: &Trigger) -> Result<Vec<ActionEntry<C>>>;

    fn list_submenus(&self) -> Vec<Submenu<C>>;
}

/// A submenu edge: relative trigger, hide predicate and the target menu.
pub struct Submenu<C> {
    pub trigger: Trigger,
    pub hide: Option<HideFn<C>>,
    pub menu: Arc<dyn MenuLike<C>>,
}

impl<C> Clone for Submenu<C> {
    fn clone(&self) -> Self {
        Self {
            trigger: self.trigger.clone(),
            hide: self.hide.clone(),
            menu: Arc::clone(&self.menu),
        }
    }
}

impl<C> fmt::Debug for Submenu<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Submenu")
            .field("trigger", &self.trigger.source())
            .field("hidable", &self.hide.is_some())
            .finish()
    }
}

// ---------------------------------------------------------------------------
// Button options
// ---------------------------------------------------------------------------

/// Per-button settings shared by all template methods.
pub struct ButtonOptions<C> {
    hide: Option<HideFn<C>>,
    join_last_row: bool,
}

impl<C: MenuContext> ButtonOptions<C> {
    pub fn new() -> Self {
        Self { hide: None, join_last_row: false }
    }

    /// Hide the button (and disable what it triggers) while `hide` is true.
    pub fn hide<F, Fut>(mut self, hide: F) -> Self
    where
        F: Fn(C, String) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = anyhow::Result<bool>> + Send + 'static,
    {
        self.hide = Some(hide_fn(hide));
        self
    }

    /// Put the button into the previous row instead of a new one.
    pub fn join_last_row(mut self) -> Self {
        self.join_last_row = true;
        self
    }
}

impl<C: MenuContext> Default for ButtonOptions<C> {
    fn default() -> Self {
        Self::new()
    }
}

// ---------------------------------------------------------------------------
// MenuTemplate
// ---------------------------------------------------------------------------

/// Builder for one menu. Methods are called during setup only; the finished
/// template is shared behind an `Arc`.
pub struct MenuTemplate<C> {
    body: ContextValue<C, Body>,
    keyboard: Keyboard<C>,
    actions: ActionRegistry<C>,
    submenus: Vec<Submenu<C>>,
}

impl<C: MenuContext> MenuTemplate<C> {
    pub fn new(body: impl Into<Body>) -> Self {
        Self::with_body(ContextValue::Static(body.into()))
    }

    /// Body computed per render from `(context, menu path)`.
    pub fn dynamic<F, Fut>(body: F) -> Self
    where
        F: Fn(C, String) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = anyhow::Result<Body>> + Send + 'static,
    {
        Self::with_body(ContextValue::dynamic(body))
    }

    fn with_body(body: ContextValue<C, Body>) -> Self {
        Self {
            body,
            keyboard: Keyboard::new(),
            actions: ActionRegistry::new(),
            submenus: Vec::new(),
        }
    }

    /// Add any button.
    pub fn manual(&mut self, button: ButtonTemplate, options: ButtonOptions<C>) {
        let source = hidable(ContextValue::Static(button), options.hide);
        self.keyboard.add(options.join_last_row, [source]);
    }

    /// Add a row generator.
    pub fn manual_row(&mut self, rows: RowsFn<C>) {
        self.keyboard.add_creator(rows);
    }

    /// Register an action without a button, e.g. for buttons created by
    /// [`manual_row`](Self::manual_row).
    pub fn manual_action<F, Fut>(&mut self, trigger: Trigger, handler: F) -> Result<()>
    where
        F: Fn(C, String) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = anyhow::Result<Navigation>> + Send + 'static,
    {
        self.actions.add(trigger, action_fn(handler), None)
    }

    pub fn url(&mut self, text: impl Into<String>, url: impl Into<String>, options: ButtonOptions<C>) {
        let button = ButtonTemplate::Platform(InlineKeyboardButton::url(text, url));
        self.manual(button, options);
    }

    pub fn switch_to_chat(&mut self, text: impl Into<String>, query: impl Into<String>, options: ButtonOptions<C>) {
        let button = ButtonTemplate::Platform(InlineKeyboardButton::switch_inline_query(text, query));
        self.manual(button, options);
    }

    pub fn switch_to_current_chat(
        &mut self,
        text: impl Into<String>,
        query: impl Into<String>,
        options: ButtonOptions<C>,
    ) {
        let button = ButtonTemplate::Platform(InlineKeyboardButton::switch_inline_query_current_chat(text, query));
        self.manual(button, options);
    }

    /// Button that only navigates, for example to `..` or `/settings/`.
    pub fn navigate(
        &mut self,
        text: impl Into<ContextValue<C, String>>,
        relative_path: impl Into<String>,
        options: ButtonOptions<C>,
    ) {
        let source = text_button(text.into(), relative_path.into(), options.hide);
        self.keyboard.add(options.join_last_row, [source]);
    }

    /// Button that runs `handler` when pressed.
    pub fn interact<F, Fut>(
        &mut self,
        text: impl Into<ContextValue<C, String>>,
        action: &str,
        options: ButtonOptions<C>,
        handler: F,
    ) -> Result<()>
    where
        F: Fn(C, String) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = anyhow::Result<Navigation>> + Send + 'static,
    {
        let trigger = Trigger::pattern(format!("{}$", regex::escape(action)))?;
        self.actions.add(trigger, action_fn(handler), options.hide.clone())?;
        let source = text_button(text.into(), action.to_string(), options.hide);
        self.keyboard.add(options.join_last_row, [source]);
        Ok(())
    }

    /// Button leading into `menu` at `{action}/`.
    pub fn submenu<M>(
        &mut self,
        text: impl Into<ContextValue<C, String>>,
        action: &str,
        menu: Arc<M>,
        options: ButtonOptions<C>,
    ) -> Result<()>
    where
        M: MenuLike<C> + 'static,
    {
        let trigger = Trigger::pattern(format!("{}/", regex::escape(action)))?;
        self.add_submenu(trigger, options.hide.clone(), menu)?;
        let source = text_button(text.into(), format!("{action}/"), options.hide);
        self.keyboard.add(options.join_last_row, [source]);
        Ok(())
    }

    fn add_submenu(&mut self, trigger: Trigger, hide: Option<HideFn<C>>, menu: Arc<dyn MenuLike<C>>) -> Result<()> {
        ensure_submenu_trigger(&trigger)?;
        if self.submenus.iter().any(|s| s.trigger == trigger) {
            return Err(MenuError::DuplicateTrigger(trigger.source().to_string()));
        }
        self.submenus.push(Submenu { trigger, hide, menu });
        Ok(())
    }

    /// One button per choice; pressing calls `do_fn(ctx, key)`.
    pub fn choose<F, Fut>(&mut self, prefix: &str, options: ChoiceOptions<C>, do_fn: F) -> Result<()>
    where
        F: Fn(C, String) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = anyhow::Result<Navigation>> + Send + 'static,
    {
        let rows = choose::choose(prefix, options, key_fn(do_fn), &mut self.actions)?;
        self.keyboard.add_creator(rows);
        Ok(())
    }

    /// One button per choice, each leading into `menu` at `{prefix}:{key}/`.
    pub fn choose_into_submenu<M>(&mut self, prefix: &str, options: ChoiceOptions<C>, menu: Arc<M>) -> Result<()>
    where
        M: MenuLike<C> + 'static,
    {
        let submenu = choose::choose_into_submenu(prefix, options, &mut self.actions)?;
        self.add_submenu(submenu.trigger, Some(submenu.hide), menu)?;
        self.keyboard.add_creator(submenu.rows);
        Ok(())
    }

    pub fn select(&mut self, prefix: &str, options: SelectOptions<C>) -> Result<()> {
        let rows = select::select(prefix, options, &mut self.actions)?;
        self.keyboard.add_creator(rows);
        Ok(())
    }

    /// A button flipping between set and unset. A hide from `button`
    /// applies on top of the one in `options`.
    pub fn toggle(&mut self, prefix: &str, mut options: ToggleOptions<C>, button: ButtonOptions<C>) -> Result<()> {
        options.hide = either_hidden(button.hide, options.hide.take());
        let source = toggle::toggle(prefix, options, &mut self.actions)?;
        self.keyboard.add(button.join_last_row, [ButtonSource::Dynamic(source)]);
        Ok(())
    }

    pub fn pagination(&mut self, prefix: &str, options: PaginationOptions<C>) -> Result<()> {
        let rows = pagination::pagination(prefix, options, &mut self.actions)?;
        self.keyboard.add_creator(rows);
        Ok(())
    }
}

impl<C> fmt::Debug for MenuTemplate<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MenuTemplate")
            .field("submenus", &self.submenus)
            .finish_non_exhaustive()
    }
}

/// Callback button with a static or computed text.
fn text_button<C: MenuContext>(
    text: ContextValue<C, String>,
    relative_path: String,
    hide: Option<HideFn<C>>,
) -> ButtonSource<C> {
    let template = match text {
        ContextValue::Static(text) => ContextValue::Static(ButtonTemplate::callback(text, relative_path)),
        ContextValue::Dynamic(text) => ContextValue::Dynamic(path_fn(move |ctx: C, path: String| {
            let text = Arc::clone(&text);
            let relative_path = relative_path.clone();
            async move { Ok(ButtonTemplate::callback(text(ctx, path).await?, relative_path)) }
        })),
    };
    hidable(template, hide)
}

/// A button that disappears while `hide` is true.
fn hidable<C: MenuContext>(button: ContextValue<C, ButtonTemplate>, hide: Option<HideFn<C>>) -> ButtonSource<C> {
    match (button, hide) {
        (ContextValue::Static(button), None) => ButtonSource::Static(button),
        (button, hide) => ButtonSource::Dynamic(path_fn(move |ctx: C, path: String| {
            let button = button.clone();
            let hide = hide.clone();
            async move {
                if is_hidden(hide.as_ref(), &ctx, &path).await? {
                    return Ok(None);
                }
                Ok(Some(button.resolve(&ctx, &path).await?))
            }
        })),
    }
}

#[async_trait]
impl<C: MenuContext> MenuLike<C> for MenuTemplate<C> {
    async fn render_body(&self, ctx: &C, path: &str) -> Result<Body> {
        Ok(self.body.resolve(ctx, path).await?)
    }

    async fn render_keyboard(&self, ctx: &C, path: &str) -> Result<InlineKeyboardMarkup> {
        self.keyboard.render(ctx, path).await
    }

    fn render_action_handlers(&self, prefix: &Trigger) -> Result<Vec<ActionEntry<C>>> {
        self.actions.list(prefix)
    }

    fn list_submenus(&self) -> Vec<Submenu<C>> {
        self.submenus.clone()
    }
}
