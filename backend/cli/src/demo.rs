//! The demo menu tree driven by the CLI.
//!
//! ```text
//! /                   greeting, settings, food, book, admin (hidden)
//! /settings/          toggles, language choice, topic selection
//! /food/              paged dishes, each leading into /food/dish:<id>/
//! /book/              a paginated text
//! /admin/             only while admin mode is on
//! ```

use std::collections::BTreeSet;
use std::sync::Arc;

use inline_menu::back::back_main_menu_buttons_from_config;
use inline_menu::{
    Body, ButtonOptions, ChoiceLayout, ChoiceOptions, Choices, MenuConfig, MenuContext, MenuTemplate, Navigation,
    PaginationOptions, ParseMode, SelectOptions, ToggleOptions,
};
use tokio::sync::Mutex;
use tracing::info;

const DISHES: [(&str, &str); 10] = [
    ("1", "Pizza"),
    ("2", "Pasta"),
    ("3", "Ramen"),
    ("4", "Tacos"),
    ("5", "Curry"),
    ("6", "Falafel"),
    ("7", "Sushi"),
    ("8", "Burger"),
    ("9", "Paella"),
    ("10", "Pho"),
];

const BOOK: [&str; 5] = [
    "It was a bright cold day in April.",
    "The clocks were striking thirteen.",
    "Outside, even through the shut window-pane, the world looked cold.",
    "Down in the street little eddies of wind were whirling dust.",
    "The sun was shining and the sky was a harsh blue.",
];

/// Mutable state the demo handlers work on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DemoState {
    pub notify: bool,
    pub admin: bool,
    pub language: String,
    pub topics: BTreeSet<String>,
    pub dish_page: u32,
    pub book_page: u32,
    pub greetings: u32,
}

impl Default for DemoState {
    fn default() -> Self {
        Self {
            notify: true,
            admin: false,
            language: "en".to_string(),
            topics: BTreeSet::new(),
            dish_page: 1,
            book_page: 1,
            greetings: 0,
        }
    }
}

/// A chat update: optional callback data plus the chat's state.
#[derive(Clone, Default)]
pub struct DemoContext {
    callback: Option<String>,
    pub state: Arc<Mutex<DemoState>>,
}

impl DemoContext {
    /// The same chat pressing a button.
    pub fn press(&self, data: &str) -> Self {
        Self { callback: Some(data.to_string()), state: Arc::clone(&self.state) }
    }

    /// The same chat sending a text command.
    pub fn command(&self) -> Self {
        Self { callback: None, state: Arc::clone(&self.state) }
    }
}

impl MenuContext for DemoContext {
    fn callback_data(&self) -> Option<&str> {
        self.callback.as_deref()
    }
}

fn dish_name(key: &str) -> &'static str {
    DISHES.iter().find(|(k, _)| *k == key).map(|(_, name)| *name).unwrap_or("something unknown")
}

// ---------------------------------------------------------------------------
// Menus
// ---------------------------------------------------------------------------

fn settings_menu(config: &MenuConfig) -> inline_menu::Result<MenuTemplate<DemoContext>> {
    let layout = ChoiceLayout::from(config);
    let mut settings = MenuTemplate::dynamic(|ctx: DemoContext, _path: String| async move {
        let state = ctx.state.lock().await;
        Ok(Body::text(format!("Settings\nLanguage: {}", state.language)))
    });

    settings.toggle(
        "notify",
        ToggleOptions::new(
            "Notifications",
            |ctx: DemoContext, _path: String| async move { Ok(ctx.state.lock().await.notify) },
            |ctx: DemoContext, on: bool| async move {
                ctx.state.lock().await.notify = on;
                Ok(Navigation::Refresh)
            },
        ),
        ButtonOptions::new(),
    )?;
    settings.toggle(
        "admin",
        ToggleOptions::new(
            "Admin mode",
            |ctx: DemoContext, _path: String| async move { Ok(ctx.state.lock().await.admin) },
            |ctx: DemoContext, on: bool| async move {
                ctx.state.lock().await.admin = on;
                info!("[Demo] Admin mode {}", if on { "on" } else { "off" });
                Ok(Navigation::Refresh)
            },
        ),
        ButtonOptions::new().join_last_row(),
    )?;

    let languages = Choices::from_pairs([("de", "Deutsch"), ("en", "English"), ("fr", "Français")]);
    settings.choose(
        "lang",
        ChoiceOptions::new(languages).layout(layout),
        |ctx: DemoContext, key: String| async move {
            ctx.state.lock().await.language = key;
            Ok(Navigation::Refresh)
        },
    )?;

    settings.select(
        "topic",
        SelectOptions::new(
            ChoiceOptions::new(vec!["news", "sports", "weather"]).layout(layout),
            |ctx: DemoContext, key: String| async move { Ok(ctx.state.lock().await.topics.contains(&key)) },
            |ctx: DemoContext, key: String, selected: bool| async move {
                let mut state = ctx.state.lock().await;
                if selected {
                    state.topics.insert(key);
                } else {
                    state.topics.remove(&key);
                }
                Ok(Navigation::Refresh)
            },
        )
        .show_false_emoji(),
    )?;

    settings.manual_row(back_main_menu_buttons_from_config(config));
    Ok(settings)
}

fn food_menu(config: &MenuConfig) -> inline_menu::Result<MenuTemplate<DemoContext>> {
    let mut dish = MenuTemplate::dynamic(|_ctx: DemoContext, path: String| async move {
        let key = path
            .trim_end_matches('/')
            .rsplit('/')
            .next()
            .and_then(|segment| segment.strip_prefix("dish:"))
            .unwrap_or_default();
        Ok(Body::text(format!("You picked {}.", dish_name(key))))
    });
    dish.interact("Order", "order", ButtonOptions::new(), |_ctx: DemoContext, path: String| async move {
        info!("[Demo] Ordered via {}", path);
        Ok(Navigation::to("/"))
    })?;
    dish.manual_row(back_main_menu_buttons_from_config(config));

    let mut food = MenuTemplate::new("What would you like to eat?");
    let dishes = ChoiceOptions::new(Choices::from_pairs(DISHES))
        .columns(3)
        .max_rows(2)
        .paging(
            |ctx: DemoContext, _path: String| async move { Ok(ctx.state.lock().await.dish_page) },
            |ctx: DemoContext, page: u32| async move {
                ctx.state.lock().await.dish_page = page;
                Ok(Navigation::Refresh)
            },
        );
    food.choose_into_submenu("dish", dishes, Arc::new(dish))?;
    food.manual_row(back_main_menu_buttons_from_config(config));
    Ok(food)
}

fn book_menu(config: &MenuConfig) -> inline_menu::Result<MenuTemplate<DemoContext>> {
    let mut book = MenuTemplate::dynamic(|ctx: DemoContext, _path: String| async move {
        let page = ctx.state.lock().await.book_page.clamp(1, BOOK.len() as u32);
        let text = BOOK[page as usize - 1];
        Ok(Body::text(format!("Page {page} of {}\n\n{text}", BOOK.len())))
    });
    book.pagination(
        "p",
        PaginationOptions::new(
            |_ctx: DemoContext, _path: String| async { Ok(BOOK.len() as f64) },
            |ctx: DemoContext, _path: String| async move { Ok(f64::from(ctx.state.lock().await.book_page)) },
            |ctx: DemoContext, page: u32| async move {
                ctx.state.lock().await.book_page = page;
                Ok(Navigation::Refresh)
            },
        ),
    )?;
    book.manual_row(back_main_menu_buttons_from_config(config));
    Ok(book)
}

fn admin_menu(config: &MenuConfig) -> inline_menu::Result<MenuTemplate<DemoContext>> {
    let mut admin = MenuTemplate::new("Admin area");
    admin.interact("Reset all state", "reset", ButtonOptions::new(), |ctx: DemoContext, _path: String| async move {
        *ctx.state.lock().await = DemoState::default();
        info!("[Demo] State reset");
        Ok(Navigation::to(".."))
    })?;
    admin.manual_row(back_main_menu_buttons_from_config(config));
    Ok(admin)
}

/// Assemble the whole tree. Trigger or key mistakes are reported here.
pub fn build_demo_menu(config: &MenuConfig) -> inline_menu::Result<Arc<MenuTemplate<DemoContext>>> {
    let mut root = MenuTemplate::new(Body::formatted("<b>Inline menu demo</b>", ParseMode::Html));

    root.interact("👋 Say hi", "hi", ButtonOptions::new(), |ctx: DemoContext, _path: String| async move {
        let mut state = ctx.state.lock().await;
        state.greetings += 1;
        info!("[Demo] Hi number {}", state.greetings);
        Ok(Navigation::Done)
    })?;
    root.submenu("⚙️ Settings", "settings", Arc::new(settings_menu(config)?), ButtonOptions::new())?;
    root.submenu("🍕 Food", "food", Arc::new(food_menu(config)?), ButtonOptions::new().join_last_row())?;
    root.submenu("📖 Book", "book", Arc::new(book_menu(config)?), ButtonOptions::new())?;
    root.submenu(
        "🔒 Admin",
        "admin",
        Arc::new(admin_menu(config)?),
        ButtonOptions::new()
            .join_last_row()
            .hide(|ctx: DemoContext, _path: String| async move { Ok(!ctx.state.lock().await.admin) }),
    )?;
    root.url("Bot API docs", "https://core.telegram.org/bots/api#inlinekeyboardmarkup", ButtonOptions::new());

    Ok(Arc::new(root))
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use inline_menu::back::DEFAULT_BACK_TEXT;
    use inline_menu::{render_menu, Dispatch, MenuLike, MenuMiddleware, MenuSender, RenderedMenu};
    use std::sync::Mutex as StdMutex;

    #[derive(Default)]
    struct Recorder {
        sent: StdMutex<Vec<RenderedMenu>>,
    }

    #[async_trait]
    impl MenuSender<DemoContext> for Recorder {
        async fn send_menu(&self, menu: &dyn MenuLike<DemoContext>, ctx: &DemoContext, path: &str) -> anyhow::Result<()> {
            let rendered = render_menu(menu, ctx, path).await?;
            self.sent.lock().unwrap().push(rendered);
            Ok(())
        }
    }

    impl Recorder {
        fn last(&self) -> RenderedMenu {
            self.sent.lock().unwrap().last().cloned().unwrap()
        }

        fn labels(&self) -> Vec<Vec<String>> {
            self.last()
                .reply_markup
                .inline_keyboard
                .iter()
                .map(|row| row.iter().map(|b| b.text.clone()).collect())
                .collect()
        }
    }

    fn setup() -> (MenuMiddleware<DemoContext>, Arc<Recorder>, DemoContext) {
        let config = inline_menu_config::apply_all_defaults(MenuConfig::default());
        let recorder = Arc::new(Recorder::default());
        let menu = build_demo_menu(&config).unwrap();
        let middleware = MenuMiddleware::from_config(&config, menu, recorder.clone()).unwrap();
        (middleware, recorder, DemoContext::default())
    }

    #[tokio::test]
    async fn admin_is_hidden_until_enabled() {
        let (middleware, recorder, ctx) = setup();
        middleware.reply_to_context(&ctx.command(), None).await.unwrap();
        assert!(!recorder.labels().concat().contains(&"🔒 Admin".to_string()));

        let outcome = middleware.middleware(&ctx.press("/admin/reset")).await.unwrap();
        assert_eq!(outcome, Dispatch::Refreshed { menu: "/".into() });

        middleware.middleware(&ctx.press("/settings/admin:true")).await.unwrap();
        assert!(ctx.state.lock().await.admin);
        let outcome = middleware.middleware(&ctx.press("/admin/reset")).await.unwrap();
        assert_eq!(outcome, Dispatch::Navigated { action: "/admin/reset".into(), menu: "/".into() });
        assert_eq!(*ctx.state.lock().await, DemoState::default());
    }

    #[tokio::test]
    async fn settings_controls_change_state() {
        let (middleware, recorder, ctx) = setup();
        middleware.middleware(&ctx.press("/settings/lang:de")).await.unwrap();
        middleware.middleware(&ctx.press("/settings/topicT:news")).await.unwrap();
        middleware.middleware(&ctx.press("/settings/notify:false")).await.unwrap();

        let state = ctx.state.lock().await.clone();
        assert_eq!(state.language, "de");
        assert!(state.topics.contains("news"));
        assert!(!state.notify);

        let labels = recorder.labels();
        assert_eq!(labels[0], vec!["🚫 Notifications", "🚫 Admin mode"]);
        assert!(labels.concat().contains(&"✅ news".to_string()));
        assert_eq!(labels.last().unwrap(), &vec![DEFAULT_BACK_TEXT.to_string()]);
    }

    #[tokio::test]
    async fn dishes_are_paged_and_lead_into_a_submenu() {
        let (middleware, recorder, ctx) = setup();
        middleware.reply_to_context(&ctx.command(), Some("/food/")).await.unwrap();
        let first = recorder.labels();
        assert_eq!(first[0], vec!["Pizza", "Pasta", "Ramen"]);
        assert_eq!(first[2], vec!["1", "▶️ 2"]);
        assert_eq!(first[3], vec![DEFAULT_BACK_TEXT]);

        middleware.middleware(&ctx.press("/food/dishP:2")).await.unwrap();
        assert_eq!(recorder.labels()[0], vec!["Sushi", "Burger", "Paella"]);
        assert_eq!(recorder.labels()[1], vec!["Pho"]);

        let outcome = middleware.middleware(&ctx.press("/food/dish:9/")).await.unwrap();
        assert_eq!(outcome, Dispatch::Refreshed { menu: "/food/dish:9/".into() });
        assert_eq!(recorder.last().body.text_content(), Some("You picked Paella."));

        // unknown dish keys stay in the food menu
        let outcome = middleware.middleware(&ctx.press("/food/dish:99/order")).await.unwrap();
        assert_eq!(outcome, Dispatch::Refreshed { menu: "/food/".into() });
    }

    #[tokio::test]
    async fn book_pages() {
        let (middleware, recorder, ctx) = setup();
        middleware.middleware(&ctx.press("/book/p:5")).await.unwrap();
        assert!(recorder.last().body.text_content().unwrap().starts_with("Page 5 of 5"));
        let pages: Vec<String> = recorder.labels()[0].clone();
        assert_eq!(pages, vec!["1 ⏪", "4 ◀️", "5"]);
    }

    #[test]
    fn tree_lists_every_menu() {
        let (middleware, _, _) = setup();
        let tree = middleware.tree();
        assert!(tree.starts_with("menu   /\n"));
        assert!(tree.contains("menu     /settings/"));
        assert!(tree.contains(&format!("{:<6} {}{}", "action", "    ", "/settings/lang:([^/]+)")));
        assert!(tree.contains(&format!("{:<6} {}{}", "menu", "    ", "/food/dish:([^/]+)/")));
    }
}
