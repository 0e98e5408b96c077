//! Prints sent menus instead of calling the Bot API.

use std::io::Write;

use async_trait::async_trait;
use inline_menu::{render_menu, MenuContext, MenuLike, MenuSender, RenderedMenu};

use crate::terminal_output::render_menu_text;

#[derive(Debug, Clone, Copy)]
pub enum OutputFormat {
    Text { color: bool },
    Json,
}

pub struct StdoutSender {
    format: OutputFormat,
}

impl StdoutSender {
    pub fn new(format: OutputFormat) -> Self {
        Self { format }
    }

    pub fn format_menu(&self, menu: &RenderedMenu) -> anyhow::Result<String> {
        Ok(match self.format {
            OutputFormat::Text { color } => render_menu_text(menu, color),
            OutputFormat::Json => format!("{}\n", serde_json::to_string_pretty(menu)?),
        })
    }
}

#[async_trait]
impl<C: MenuContext> MenuSender<C> for StdoutSender {
    async fn send_menu(&self, menu: &dyn MenuLike<C>, ctx: &C, path: &str) -> anyhow::Result<()> {
        let rendered = render_menu(menu, ctx, path).await?;
        let output = self.format_menu(&rendered)?;
        let mut stdout = std::io::stdout().lock();
        stdout.write_all(output.as_bytes())?;
        stdout.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use inline_menu::{Body, InlineKeyboardButton, InlineKeyboardMarkup};

    #[test]
    fn json_uses_bot_api_field_names() {
        let menu = RenderedMenu {
            path: "/".to_string(),
            body: Body::text("Main"),
            reply_markup: InlineKeyboardMarkup {
                inline_keyboard: vec![vec![InlineKeyboardButton::callback("Go", "/go")]],
            },
        };
        let output = StdoutSender::new(OutputFormat::Json).format_menu(&menu).unwrap();
        let value: serde_json::Value = serde_json::from_str(&output).unwrap();
        assert_eq!(value["reply_markup"]["inline_keyboard"][0][0]["callback_data"], "/go");
        assert_eq!(value["body"]["text"], "Main");
    }
}
