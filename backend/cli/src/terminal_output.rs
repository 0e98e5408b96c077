//! Terminal rendering of menus and dispatch outcomes.

use inline_menu::{Body, ButtonKind, Dispatch, RenderedMenu};

// ---------------------------------------------------------------------------
// ANSI helpers
// ---------------------------------------------------------------------------

pub const RESET: &str = "\x1b[0m";
pub const BOLD: &str = "\x1b[1m";
pub const DIM: &str = "\x1b[2m";
pub const GREEN: &str = "\x1b[32m";
pub const YELLOW: &str = "\x1b[33m";
pub const CYAN: &str = "\x1b[36m";

/// Check if the terminal supports color output.
pub fn supports_color() -> bool {
    std::env::var("NO_COLOR").is_err()
        && (std::env::var("COLORTERM").is_ok()
            || std::env::var("TERM").map(|t| t != "dumb").unwrap_or(false))
}

struct Style {
    color: bool,
}

impl Style {
    fn paint(&self, codes: &str, text: &str) -> String {
        if self.color {
            format!("{codes}{text}{RESET}")
        } else {
            text.to_string()
        }
    }
}

// ---------------------------------------------------------------------------
// Menus
// ---------------------------------------------------------------------------

fn body_lines(body: &Body) -> Vec<String> {
    match body {
        Body::Text { text, .. } => text.lines().map(str::to_string).collect(),
        Body::Media { media, kind, caption, .. } => {
            let mut lines = vec![format!("<{kind:?} {media}>")];
            lines.extend(caption.iter().flat_map(|c| c.lines().map(str::to_string)));
            lines
        }
        Body::Location { latitude, longitude, .. } => vec![format!("<location {latitude}, {longitude}>")],
        Body::Venue { title, address, .. } => vec![title.clone(), address.clone()],
    }
}

fn button_target(kind: &ButtonKind) -> String {
    match kind {
        ButtonKind::CallbackData(data) => data.clone(),
        ButtonKind::Url(url) => format!("url {url}"),
        ButtonKind::SwitchInlineQuery(query) => format!("inline query '{query}'"),
        ButtonKind::SwitchInlineQueryCurrentChat(query) => format!("inline query here '{query}'"),
    }
}

/// The menu as a block of text: path header, body, one line per keyboard row.
pub fn render_menu_text(menu: &RenderedMenu, color: bool) -> String {
    let style = Style { color };
    let mut out = String::new();

    out.push_str(&style.paint(&format!("{CYAN}{BOLD}"), &format!("── {} ──", menu.path)));
    out.push('\n');
    for line in body_lines(&menu.body) {
        out.push_str(&line);
        out.push('\n');
    }

    for row in &menu.reply_markup.inline_keyboard {
        let cells: Vec<String> = row
            .iter()
            .map(|button| {
                let target = style.paint(DIM, &button_target(&button.kind));
                format!("[ {} → {} ]", button.text, target)
            })
            .collect();
        out.push_str(&cells.join(" "));
        out.push('\n');
    }
    out
}

/// One line describing how a press was handled.
pub fn describe_dispatch(dispatch: &Dispatch, color: bool) -> String {
    let style = Style { color };
    match dispatch {
        Dispatch::Navigated { action, menu } => {
            format!("{} {action} → {menu}", style.paint(GREEN, "✓"))
        }
        Dispatch::Handled { action } => format!("{} {action}", style.paint(GREEN, "✓")),
        Dispatch::Hidden { action, menu } => {
            format!("{} {action} is hidden, refreshed {menu}", style.paint(YELLOW, "⚠"))
        }
        Dispatch::Refreshed { menu } => format!("{} {menu}", style.paint(CYAN, "↻")),
        Dispatch::PassThrough => format!("{} not a path of this menu", style.paint(YELLOW, "⚠")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use inline_menu::{InlineKeyboardButton, InlineKeyboardMarkup};

    fn menu() -> RenderedMenu {
        RenderedMenu {
            path: "/settings/".to_string(),
            body: Body::text("Settings\nChoose wisely"),
            reply_markup: InlineKeyboardMarkup {
                inline_keyboard: vec![
                    vec![
                        InlineKeyboardButton::callback("A", "/settings/a"),
                        InlineKeyboardButton::url("Docs", "https://example.org"),
                    ],
                    vec![InlineKeyboardButton::callback("🔙back", "/")],
                ],
            },
        }
    }

    #[test]
    fn renders_rows_without_color() {
        let text = render_menu_text(&menu(), false);
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "── /settings/ ──");
        assert_eq!(lines[1], "Settings");
        assert_eq!(lines[3], "[ A → /settings/a ] [ Docs → url https://example.org ]");
        assert_eq!(lines[4], "[ 🔙back → / ]");
    }

    #[test]
    fn describes_outcomes() {
        let hidden = Dispatch::Hidden { action: "/x".into(), menu: "/".into() };
        assert_eq!(describe_dispatch(&hidden, false), "⚠ /x is hidden, refreshed /");
        assert_eq!(describe_dispatch(&Dispatch::Refreshed { menu: "/a/".into() }, false), "↻ /a/");
    }
}
