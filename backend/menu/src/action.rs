//! Per-menu registry of action handlers.
use std::fmt;
use std::future::Future;
use std::sync::Arc;

use tracing::debug;

use crate::context::{is_hidden, path_fn, HideFn, MenuContext, PathFn};
use crate::error::{MenuError, Result};
use crate::path::menu_of_path;
use crate::trigger::{combine_trigger, ensure_action_trigger, Trigger};

// ---------------------------------------------------------------------------
// Navigation directive
// ---------------------------------------------------------------------------

/// What to do once an action handler has run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Navigation {
    /// Show the menu at this path, relative to the action.
    Navigate(String),
    /// Show the current menu again (same as `Navigate(".")`).
    Refresh,
    /// Nothing more; the handler took care of replying.
    Done,
}

impl Navigation {
    pub fn to(relative_path: impl Into<String>) -> Self {
        Navigation::Navigate(relative_path.into())
    }

    /// Relative path to show afterwards, if any.
    pub fn target(&self) -> Option<&str> {
        match self {
            Navigation::Navigate(path) => Some(path),
            Navigation::Refresh => Some("."),
            Navigation::Done => None,
        }
    }
}

impl From<bool> for Navigation {
    fn from(refresh: bool) -> Self {
        if refresh { Navigation::Refresh } else { Navigation::Done }
    }
}

impl From<&str> for Navigation {
    fn from(path: &str) -> Self {
        Navigation::Navigate(path.to_string())
    }
}

impl From<String> for Navigation {
    fn from(path: String) -> Self {
        Navigation::Navigate(path)
    }
}

/// Handler invoked with `(context, action path)`.
pub type ActionFn<C> = PathFn<C, Navigation>;

pub fn action_fn<C, F, Fut>(f: F) -> ActionFn<C>
where
    C: 'static,
    F: Fn(C, String) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = anyhow::Result<Navigation>> + Send + 'static,
{
    path_fn(f)
}

// ---------------------------------------------------------------------------
// Entries
// ---------------------------------------------------------------------------

/// Result of pressing an action button.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Invocation {
    /// The action is hidden; the handler did not run.
    Hidden,
    Executed(Navigation),
}

/// An action handler bound to a trigger and guarded by its hide predicate.
pub struct ActionEntry<C> {
    trigger: Trigger,
    handler: ActionFn<C>,
    hide: Option<HideFn<C>>,
}

impl<C: MenuContext> ActionEntry<C> {
    pub fn trigger(&self) -> &Trigger {
        &self.trigger
    }

    /// Run the handler unless the hide predicate (evaluated for the menu the
    /// action lives in) says the button is not there.
    pub async fn invoke(&self, ctx: &C, path: &str) -> anyhow::Result<Invocation> {
        if is_hidden(self.hide.as_ref(), ctx, menu_of_path(path)).await? {
            return Ok(Invocation::Hidden);
        }
        let navigation = (self.handler)(ctx.clone(), path.to_string()).await?;
        Ok(Invocation::Executed(navigation))
    }
}

impl<C> Clone for ActionEntry<C> {
    fn clone(&self) -> Self {
        Self {
            trigger: self.trigger.clone(),
            handler: Arc::clone(&self.handler),
            hide: self.hide.clone(),
        }
    }
}

impl<C> fmt::Debug for ActionEntry<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ActionEntry")
            .field("trigger", &self.trigger.source())
            .field("hidable", &self.hide.is_some())
            .finish()
    }
}

// ---------------------------------------------------------------------------
// Registry
// ---------------------------------------------------------------------------

/// The actions of one menu, keyed by their relative trigger.
pub struct ActionRegistry<C> {
    entries: Vec<ActionEntry<C>>,
}

impl<C: MenuContext> ActionRegistry<C> {
    pub fn new() -> Self {
        Self { entries: Vec::new() }
    }

    /// Register a handler. A second handler for the same trigger is a
    /// configuration error.
    pub fn add(&mut self, trigger: Trigger, handler: ActionFn<C>, hide: Option<HideFn<C>>) -> Result<()> {
        ensure_action_trigger(&trigger)?;
        if self.entries.iter().any(|e| e.trigger == trigger) {
            return Err(MenuError::DuplicateTrigger(trigger.source().to_string()));
        }
        debug!("[Menu] Registered action {}", trigger.source());
        self.entries.push(ActionEntry { trigger, handler, hide });
        Ok(())
    }

    /// All actions with their triggers combined against `prefix`.
    pub fn list(&self, prefix: &Trigger) -> Result<Vec<ActionEntry<C>>> {
        self.entries
            .iter()
            .map(|entry| {
                Ok(ActionEntry {
                    trigger: combine_trigger(prefix, &entry.trigger)?,
                    handler: Arc::clone(&entry.handler),
                    hide: entry.hide.clone(),
                })
            })
            .collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<C: MenuContext> Default for ActionRegistry<C> {
    fn default() -> Self {
        Self::new()
    }
}
