//! Routing callback queries through the responder tree and sending menus.
use std::sync::Arc;

use async_trait::async_trait;
use inline_menu_config::MenuConfig;
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::action::Invocation;
use crate::body::Body;
use crate::context::MenuContext;
use crate::error::{MenuError, Result};
use crate::keyboard::InlineKeyboardMarkup;
use crate::path::{combine_path, is_menu_path, menu_of_path};
use crate::responder::{MatchMode, Matched, MenuNode};
use crate::template::MenuLike;
use crate::trigger::{create_root_menu_trigger, RootTrigger};

// ---------------------------------------------------------------------------
// Sending
// ---------------------------------------------------------------------------

/// Delivers a menu to the user; implemented by the host.
#[async_trait]
pub trait MenuSender<C: MenuContext>: Send + Sync {
    async fn send_menu(&self, menu: &dyn MenuLike<C>, ctx: &C, path: &str) -> anyhow::Result<()>;
}

/// Body and keyboard of a menu, ready for the Bot API.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RenderedMenu {
    pub path: String,
    pub body: Body,
    pub reply_markup: InlineKeyboardMarkup,
}

pub async fn render_menu<C: MenuContext>(menu: &dyn MenuLike<C>, ctx: &C, path: &str) -> Result<RenderedMenu> {
    let body = menu.render_body(ctx, path).await?;
    let reply_markup = menu.render_keyboard(ctx, path).await?;
    Ok(RenderedMenu { path: path.to_string(), body, reply_markup })
}

// ---------------------------------------------------------------------------
// Dispatch
// ---------------------------------------------------------------------------

/// How an update was handled.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Dispatch {
    /// The action ran, then the menu at its target was sent.
    Navigated { action: String, menu: String },
    /// The action ran and asked for nothing else.
    Handled { action: String },
    /// The action's button is hidden; the handler was skipped and the menu refreshed.
    Hidden { action: String, menu: String },
    /// A menu path (or an unknown action) was pressed; the best reachable menu was sent.
    Refreshed { menu: String },
    /// Not for this menu tree.
    PassThrough,
}

pub struct MenuMiddleware<C> {
    root: RootTrigger,
    tree: MenuNode<C>,
    sender: Arc<dyn MenuSender<C>>,
}

impl<C: MenuContext> MenuMiddleware<C> {
    /// Build the responder tree once. Trigger problems surface here.
    pub fn new<M>(root: impl Into<RootTrigger>, menu: Arc<M>, sender: Arc<dyn MenuSender<C>>) -> Result<Self>
    where
        M: MenuLike<C> + 'static,
    {
        let root = root.into();
        let trigger = create_root_menu_trigger(&root)?;
        let tree = MenuNode::build(trigger, None, menu)?;
        info!("[Menu] Menu tree ready at {}", tree.trigger().display_source());
        Ok(Self { root, tree, sender })
    }

    /// Root path taken from the configuration.
    pub fn from_config<M>(config: &MenuConfig, menu: Arc<M>, sender: Arc<dyn MenuSender<C>>) -> Result<Self>
    where
        M: MenuLike<C> + 'static,
    {
        Self::new(config.root_path(), menu, sender)
    }

    /// Handle an update. Anything that is not a callback query for this tree
    /// passes through.
    pub async fn middleware(&self, ctx: &C) -> Result<Dispatch> {
        match ctx.callback_data() {
            Some(data) => self.dispatch(ctx, data).await,
            None => Ok(Dispatch::PassThrough),
        }
    }

    /// Route a pressed path. Menu paths go straight to menu resolution;
    /// other paths run the first action claiming them, else the deepest
    /// reachable menu is sent.
    pub async fn dispatch(&self, ctx: &C, path: &str) -> Result<Dispatch> {
        if !self.tree.trigger().is_match(path) {
            return Ok(Dispatch::PassThrough);
        }

        let found = if is_menu_path(path) {
            None
        } else {
            self.tree.longest_match(ctx, path, MatchMode::Action).await?
        };
        let action = match found {
            Some(Matched::Action { action, .. }) => action,
            _ => {
                return match self.tree.longest_match(ctx, path, MatchMode::Menu).await? {
                    Some(Matched::Menu { node, path: menu_path }) => {
                        debug!("[Menu] {} resolved to menu {}", path, menu_path);
                        self.send(node, ctx, &menu_path).await?;
                        Ok(Dispatch::Refreshed { menu: menu_path })
                    }
                    _ => Ok(Dispatch::PassThrough),
                };
            }
        };

        match action.invoke(ctx, path).await? {
            Invocation::Hidden => {
                warn!("[Menu] Action {} is hidden, refreshing", path);
                let menu = self.send_menu_at(ctx, menu_of_path(path)).await?;
                Ok(Dispatch::Hidden { action: path.to_string(), menu })
            }
            Invocation::Executed(navigation) => {
                info!("[Menu] Executed action {}", path);
                match navigation.target() {
                    None => Ok(Dispatch::Handled { action: path.to_string() }),
                    Some(target) => {
                        let target = combine_path(path, target)?;
                        let menu = self.send_menu_at(ctx, &target).await?;
                        Ok(Dispatch::Navigated { action: path.to_string(), menu })
                    }
                }
            }
        }
    }

    /// Send a menu without a button press, e.g. in reply to `/start`.
    ///
    /// Without a path the root menu is sent, which needs a literal root.
    /// Returns the path of the menu that was sent.
    pub async fn reply_to_context(&self, ctx: &C, path: Option<&str>) -> Result<String> {
        let path = match path {
            Some(path) => path,
            None => self.root.literal_path().ok_or(MenuError::AmbiguousRootPath)?,
        };
        if !is_menu_path(path) {
            return Err(MenuError::NotAMenuPath(path.to_string()));
        }
        self.send_menu_at(ctx, path).await
    }

    /// The static tree, one node per line.
    pub fn tree(&self) -> String {
        self.tree.tree_lines().join("\n")
    }

    /// Send the best reachable menu for `path`.
    async fn send_menu_at(&self, ctx: &C, path: &str) -> Result<String> {
        if !self.tree.trigger().is_match(path) {
            return Err(MenuError::UnreachableMenu(path.to_string()));
        }
        match self.tree.longest_match(ctx, path, MatchMode::Menu).await? {
            Some(Matched::Menu { node, path: menu_path }) => {
                self.send(node, ctx, &menu_path).await?;
                Ok(menu_path)
            }
            _ => Err(MenuError::UnreachableMenu(path.to_string())),
        }
    }

    async fn send(&self, node: &MenuNode<C>, ctx: &C, path: &str) -> Result<()> {
        self.sender.send_menu(node.menu(), ctx, path).await?;
        info!("[Menu] Sent menu {}", path);
        Ok(())
    }
}
