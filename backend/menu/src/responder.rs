//! The static responder tree built from a root menu.
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use tracing::debug;

use crate::action::ActionEntry;
use crate::context::{is_hidden, HideFn, MenuContext};
use crate::error::Result;
use crate::template::MenuLike;
use crate::trigger::{combine_trigger, Trigger};

/// A node of the tree: a menu with its children, or an action.
pub enum Responder<C> {
    Menu(MenuNode<C>),
    Action(ActionEntry<C>),
}

pub struct MenuNode<C> {
    trigger: Trigger,
    hide: Option<HideFn<C>>,
    menu: Arc<dyn MenuLike<C>>,
    /// Actions first, then submenus, each in registration order.
    children: Vec<Responder<C>>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchMode {
    /// Only menus; used to find the menu to show.
    Menu,
    /// Only actions; every visible subtree is searched.
    Action,
}

/// What a path resolved to.
pub enum Matched<'a, C> {
    /// The deepest reachable menu and the path it was matched with.
    Menu { node: &'a MenuNode<C>, path: String },
    Action { action: &'a ActionEntry<C>, path: String },
}

type MatchFuture<'a, C> = Pin<Box<dyn Future<Output = Result<Option<Matched<'a, C>>>> + Send + 'a>>;

impl<C: MenuContext> MenuNode<C> {
    /// Build the subtree of `menu`, combining every child trigger with `trigger`.
    pub fn build(trigger: Trigger, hide: Option<HideFn<C>>, menu: Arc<dyn MenuLike<C>>) -> Result<Self> {
        let mut children: Vec<Responder<C>> = menu
            .render_action_handlers(&trigger)?
            .into_iter()
            .map(Responder::Action)
            .collect();

        for submenu in menu.list_submenus() {
            let child_trigger = combine_trigger(&trigger, &submenu.trigger)?;
            let node = MenuNode::build(child_trigger, submenu.hide, submenu.menu)?;
            children.push(Responder::Menu(node));
        }

        Ok(Self { trigger, hide, menu, children })
    }

    pub fn trigger(&self) -> &Trigger {
        &self.trigger
    }

    pub fn menu(&self) -> &dyn MenuLike<C> {
        self.menu.as_ref()
    }

    /// Resolve `path` through nodes whose hide predicates (evaluated parent
    /// first) all allow it. Siblings are tried in order.
    ///
    /// `MatchMode::Menu` yields the deepest such menu. `MatchMode::Action`
    /// yields the first action claiming the whole path and never a menu.
    /// `None` when nothing qualifies.
    pub fn longest_match<'a>(&'a self, ctx: &'a C, path: &'a str, mode: MatchMode) -> MatchFuture<'a, C> {
        Box::pin(async move {
            let Some(matched) = self.trigger.find(path) else {
                return Ok(None);
            };
            if is_hidden(self.hide.as_ref(), ctx, matched).await? {
                debug!("[Menu] {} is hidden", matched);
                return Ok(None);
            }

            if mode == MatchMode::Action {
                for child in &self.children {
                    if let Responder::Action(action) = child {
                        if action.trigger().is_match(path) {
                            debug!("[Menu] {} matched action {}", path, action.trigger().source());
                            return Ok(Some(Matched::Action { action, path: path.to_string() }));
                        }
                    }
                }
            }

            for child in &self.children {
                if let Responder::Menu(node) = child {
                    if let Some(found) = node.longest_match(ctx, path, mode).await? {
                        return Ok(Some(found));
                    }
                }
            }

            match mode {
                MatchMode::Menu => Ok(Some(Matched::Menu { node: self, path: matched.to_string() })),
                MatchMode::Action => Ok(None),
            }
        })
    }

    /// One line per node: kind, indentation by depth, trigger without anchors.
    pub fn tree_lines(&self) -> Vec<String> {
        let mut lines = Vec::new();
        self.collect_lines(0, &mut lines);
        lines
    }

    fn collect_lines(&self, depth: usize, lines: &mut Vec<String>) {
        lines.push(tree_line("menu", depth, &self.trigger));
        for child in &self.children {
            match child {
                Responder::Action(action) => lines.push(tree_line("action", depth + 1, action.trigger())),
                Responder::Menu(node) => node.collect_lines(depth + 1, lines),
            }
        }
    }
}

fn tree_line(kind: &str, depth: usize, trigger: &Trigger) -> String {
    format!("{kind:<6} {}{}", "  ".repeat(depth), trigger.display_source())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::action::Navigation;
    use crate::choose::ChoiceOptions;
    use crate::template::{ButtonOptions, MenuTemplate};
    use crate::trigger::{create_root_menu_trigger, RootTrigger};
    use std::sync::atomic::{AtomicBool, Ordering};

    #[derive(Clone)]
    struct Ctx(Arc<AtomicBool>);

    impl MenuContext for Ctx {
        fn callback_data(&self) -> Option<&str> {
            None
        }
    }

    /// `/` with submenu `a/` (hidden while the flag is set) holding action `b`.
    fn tree() -> MenuNode<Ctx> {
        let mut sub = MenuTemplate::new("A");
        sub.interact("B", "b", ButtonOptions::new(), |_ctx: Ctx, _path: String| async { Ok(Navigation::Done) })
            .unwrap();

        let mut root = MenuTemplate::new("Root");
        let hide = ButtonOptions::new().hide(|ctx: Ctx, _path: String| async move { Ok(ctx.0.load(Ordering::SeqCst)) });
        root.submenu("A", "a", Arc::new(sub), hide).unwrap();

        let trigger = create_root_menu_trigger(&RootTrigger::default()).unwrap();
        MenuNode::build(trigger, None, Arc::new(root)).unwrap()
    }

    fn describe(matched: Option<Matched<'_, Ctx>>) -> String {
        match matched {
            Some(Matched::Menu { path, .. }) => format!("menu {path}"),
            Some(Matched::Action { path, .. }) => format!("action {path}"),
            None => "none".to_string(),
        }
    }

    #[tokio::test]
    async fn action_mode_finds_the_action() {
        let node = tree();
        let ctx = Ctx(Arc::new(AtomicBool::new(false)));
        let found = node.longest_match(&ctx, "/a/b", MatchMode::Action).await.unwrap();
        assert_eq!(describe(found), "action /a/b");
    }

    #[tokio::test]
    async fn menu_mode_ignores_actions() {
        let node = tree();
        let ctx = Ctx(Arc::new(AtomicBool::new(false)));
        let found = node.longest_match(&ctx, "/a/b", MatchMode::Menu).await.unwrap();
        assert_eq!(describe(found), "menu /a/");
    }

    #[tokio::test]
    async fn hidden_submenu_resolves_to_parent() {
        let node = tree();
        let ctx = Ctx(Arc::new(AtomicBool::new(true)));
        let found = node.longest_match(&ctx, "/a/b", MatchMode::Action).await.unwrap();
        assert_eq!(describe(found), "none");
        let found = node.longest_match(&ctx, "/a/b", MatchMode::Menu).await.unwrap();
        assert_eq!(describe(found), "menu /");
        let found = node.longest_match(&ctx, "/a/", MatchMode::Menu).await.unwrap();
        assert_eq!(describe(found), "menu /");
    }

    /// `/` with submenu `item:1/` (body "Special", hidden while the flag is
    /// set, no actions) registered before `item:{key}/` (body "Item") which
    /// holds action `buy`.
    fn overlapping() -> MenuNode<Ctx> {
        let mut item = MenuTemplate::new("Item");
        item.interact("Buy", "buy", ButtonOptions::new(), |_ctx: Ctx, _path: String| async { Ok(Navigation::Done) })
            .unwrap();

        let mut root = MenuTemplate::new("Root");
        let hide = ButtonOptions::new().hide(|ctx: Ctx, _path: String| async move { Ok(ctx.0.load(Ordering::SeqCst)) });
        root.submenu("Special", "item:1", Arc::new(MenuTemplate::new("Special")), hide).unwrap();
        root.choose_into_submenu("item", ChoiceOptions::new(vec!["1", "2"]), Arc::new(item)).unwrap();

        let trigger = create_root_menu_trigger(&RootTrigger::default()).unwrap();
        MenuNode::build(trigger, None, Arc::new(root)).unwrap()
    }

    async fn body_of(found: Option<Matched<'_, Ctx>>, ctx: &Ctx) -> String {
        match found {
            Some(Matched::Menu { node, path }) => {
                let body = node.menu().render_body(ctx, &path).await.unwrap();
                body.text_content().unwrap_or_default().to_string()
            }
            _ => panic!("expected a menu"),
        }
    }

    #[tokio::test]
    async fn action_search_continues_past_a_sibling_without_it() {
        let node = overlapping();
        let ctx = Ctx(Arc::new(AtomicBool::new(false)));
        let found = node.longest_match(&ctx, "/item:1/buy", MatchMode::Action).await.unwrap();
        assert_eq!(describe(found), "action /item:1/buy");
    }

    #[tokio::test]
    async fn first_visible_sibling_wins() {
        let node = overlapping();

        let visible = Ctx(Arc::new(AtomicBool::new(false)));
        let found = node.longest_match(&visible, "/item:1/", MatchMode::Menu).await.unwrap();
        assert_eq!(body_of(found, &visible).await, "Special");

        let hidden = Ctx(Arc::new(AtomicBool::new(true)));
        let found = node.longest_match(&hidden, "/item:1/", MatchMode::Menu).await.unwrap();
        assert_eq!(body_of(found, &hidden).await, "Item");

        let found = node.longest_match(&hidden, "/item:3/", MatchMode::Menu).await.unwrap();
        assert_eq!(describe(found), "menu /");
    }

    #[tokio::test]
    async fn foreign_root_does_not_match() {
        let node = tree();
        let ctx = Ctx(Arc::new(AtomicBool::new(false)));
        let found = node.longest_match(&ctx, "other/a/", MatchMode::Menu).await.unwrap();
        assert_eq!(describe(found), "none");
    }

    #[test]
    fn tree_lines() {
        assert_eq!(tree().tree_lines(), vec!["menu   /", "menu     /a/", "action     /a/b"]);
    }
}
