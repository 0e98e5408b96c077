//! Keyboard templates and rendering into the platform's button grid.
use std::fmt;
use std::future::Future;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::context::{path_fn, MenuContext, PathFn};
use crate::error::{MenuError, Result};
use crate::path::combine_path;

/// Telegram rejects callback data above this many bytes.
pub const MAX_CALLBACK_DATA_BYTES: usize = 64;

// ---------------------------------------------------------------------------
// Platform buttons
// ---------------------------------------------------------------------------

/// A rendered inline keyboard button in Bot API shape.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InlineKeyboardButton {
    pub text: String,
    #[serde(flatten)]
    pub kind: ButtonKind,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ButtonKind {
    CallbackData(String),
    Url(String),
    SwitchInlineQuery(String),
    SwitchInlineQueryCurrentChat(String),
}

impl InlineKeyboardButton {
    pub fn callback(text: impl Into<String>, data: impl Into<String>) -> Self {
        Self { text: text.into(), kind: ButtonKind::CallbackData(data.into()) }
    }

    pub fn url(text: impl Into<String>, url: impl Into<String>) -> Self {
        Self { text: text.into(), kind: ButtonKind::Url(url.into()) }
    }

    pub fn switch_inline_query(text: impl Into<String>, query: impl Into<String>) -> Self {
        Self { text: text.into(), kind: ButtonKind::SwitchInlineQuery(query.into()) }
    }

    pub fn switch_inline_query_current_chat(text: impl Into<String>, query: impl Into<String>) -> Self {
        Self { text: text.into(), kind: ButtonKind::SwitchInlineQueryCurrentChat(query.into()) }
    }

    pub fn callback_data(&self) -> Option<&str> {
        match &self.kind {
            ButtonKind::CallbackData(data) => Some(data),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InlineKeyboardMarkup {
    pub inline_keyboard: Vec<Vec<InlineKeyboardButton>>,
}

// ---------------------------------------------------------------------------
// Templates
// ---------------------------------------------------------------------------

/// A button before the menu path is known.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ButtonTemplate {
    /// Callback button pointing to a path relative to the menu.
    Callback { text: String, relative_path: String },
    /// Passed through unchanged.
    Platform(InlineKeyboardButton),
}

impl ButtonTemplate {
    pub fn callback(text: impl Into<String>, relative_path: impl Into<String>) -> Self {
        ButtonTemplate::Callback { text: text.into(), relative_path: relative_path.into() }
    }

    fn resolve(self, path: &str) -> Result<InlineKeyboardButton> {
        let (button, relative_path) = match self {
            ButtonTemplate::Callback { text, relative_path } => {
                let data = combine_path(path, &relative_path)?;
                (InlineKeyboardButton::callback(text, data), relative_path)
            }
            ButtonTemplate::Platform(button) => {
                let relative_path = button.callback_data().unwrap_or_default().to_string();
                (button, relative_path)
            }
        };

        if let Some(data) = button.callback_data() {
            let length = data.len();
            if length > MAX_CALLBACK_DATA_BYTES {
                return Err(MenuError::CallbackDataTooLong {
                    relative_path,
                    path: data.to_string(),
                    length,
                });
            }
        }
        Ok(button)
    }
}

pub type ButtonRow = Vec<ButtonTemplate>;

/// Computes one button per render; `None` hides it.
pub type ButtonFn<C> = PathFn<C, Option<ButtonTemplate>>;

/// Computes whole rows per render.
pub type RowsFn<C> = PathFn<C, Vec<ButtonRow>>;

pub fn rows_fn<C, F, Fut>(f: F) -> RowsFn<C>
where
    C: 'static,
    F: Fn(C, String) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = anyhow::Result<Vec<ButtonRow>>> + Send + 'static,
{
    path_fn(f)
}

pub enum ButtonSource<C> {
    Static(ButtonTemplate),
    Dynamic(ButtonFn<C>),
}

impl<C> From<ButtonTemplate> for ButtonSource<C> {
    fn from(template: ButtonTemplate) -> Self {
        ButtonSource::Static(template)
    }
}

enum KeyboardEntry<C> {
    Row(Vec<ButtonSource<C>>),
    Generator(RowsFn<C>),
}

// ---------------------------------------------------------------------------
// Keyboard
// ---------------------------------------------------------------------------

/// Ordered rows and row generators of one menu.
pub struct Keyboard<C> {
    entries: Vec<KeyboardEntry<C>>,
}

impl<C: MenuContext> Keyboard<C> {
    pub fn new() -> Self {
        Self { entries: Vec::new() }
    }

    /// Append buttons, either to the last plain row or as a new row.
    /// Generated rows are never joined.
    pub fn add(&mut self, join_last_row: bool, buttons: impl IntoIterator<Item = ButtonSource<C>>) {
        let buttons: Vec<ButtonSource<C>> = buttons.into_iter().collect();
        if join_last_row {
            if let Some(KeyboardEntry::Row(row)) = self.entries.last_mut() {
                row.extend(buttons);
                return;
            }
        }
        self.entries.push(KeyboardEntry::Row(buttons));
    }

    pub fn add_creator(&mut self, creator: RowsFn<C>) {
        self.entries.push(KeyboardEntry::Generator(creator));
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Evaluate all entries for the menu at `path` and resolve every button.
    pub async fn render(&self, ctx: &C, path: &str) -> Result<InlineKeyboardMarkup> {
        let mut rows: Vec<ButtonRow> = Vec::new();
        for entry in &self.entries {
            match entry {
                KeyboardEntry::Row(sources) => {
                    let mut row = Vec::with_capacity(sources.len());
                    for source in sources {
                        let button = match source {
                            ButtonSource::Static(template) => Some(template.clone()),
                            ButtonSource::Dynamic(f) => f(ctx.clone(), path.to_string()).await?,
                        };
                        row.extend(button);
                    }
                    rows.push(row);
                }
                KeyboardEntry::Generator(f) => {
                    rows.extend(f(ctx.clone(), path.to_string()).await?);
                }
            }
        }

        let inline_keyboard = rows
            .into_iter()
            .filter(|row| !row.is_empty())
            .map(|row| {
                row.into_iter()
                    .map(|template| template.resolve(path))
                    .collect::<Result<Vec<_>>>()
            })
            .collect::<Result<Vec<_>>>()?;

        debug!("[Menu] Rendered {} keyboard rows for {}", inline_keyboard.len(), path);
        Ok(InlineKeyboardMarkup { inline_keyboard })
    }
}

impl<C: MenuContext> Default for Keyboard<C> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C> fmt::Debug for Keyboard<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Keyboard").field("entries", &self.entries.len()).finish()
    }
}

impl<C> Clone for ButtonSource<C> {
    fn clone(&self) -> Self {
        match self {
            ButtonSource::Static(template) => ButtonSource::Static(template.clone()),
            ButtonSource::Dynamic(f) => ButtonSource::Dynamic(Arc::clone(f)),
        }
    }
}
