//! Menu bodies shown above the keyboard.
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ParseMode {
    #[serde(rename = "HTML")]
    Html,
    #[serde(rename = "Markdown")]
    Markdown,
    #[serde(rename = "MarkdownV2")]
    MarkdownV2,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaKind {
    Photo,
    Video,
    Animation,
    Audio,
    Document,
}

/// Body of a menu message.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Body {
    Text {
        text: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        parse_mode: Option<ParseMode>,
        #[serde(default)]
        disable_web_page_preview: bool,
    },
    Media {
        /// File id or URL.
        media: String,
        kind: MediaKind,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        caption: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        parse_mode: Option<ParseMode>,
    },
    Location {
        latitude: f64,
        longitude: f64,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        live_period: Option<u32>,
    },
    Venue {
        latitude: f64,
        longitude: f64,
        title: String,
        address: String,
    },
}

impl Body {
    pub fn text(text: impl Into<String>) -> Self {
        Body::Text { text: text.into(), parse_mode: None, disable_web_page_preview: false }
    }

    pub fn formatted(text: impl Into<String>, parse_mode: ParseMode) -> Self {
        Body::Text { text: text.into(), parse_mode: Some(parse_mode), disable_web_page_preview: false }
    }

    pub fn media(kind: MediaKind, media: impl Into<String>, caption: Option<String>) -> Self {
        Body::Media { media: media.into(), kind, caption, parse_mode: None }
    }

    /// Text bodies can be edited in place; the rest need a media/location message.
    pub fn is_text(&self) -> bool {
        matches!(self, Body::Text { .. })
    }

    /// Text shown to the user, if the body has any.
    pub fn text_content(&self) -> Option<&str> {
        match self {
            Body::Text { text, .. } => Some(text),
            Body::Media { caption, .. } => caption.as_deref(),
            Body::Venue { title, .. } => Some(title),
            Body::Location { .. } => None,
        }
    }
}

impl From<&str> for Body {
    fn from(text: &str) -> Self {
        Body::text(text)
    }
}

impl From<String> for Body {
    fn from(text: String) -> Self {
        Body::text(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn text_body_serializes_tagged() {
        let json = serde_json::to_value(Body::formatted("*hi*", ParseMode::MarkdownV2)).unwrap();
        assert_eq!(json["type"], "text");
        assert_eq!(json["parse_mode"], "MarkdownV2");
    }

    #[test]
    fn media_caption_is_text_content() {
        let body = Body::media(MediaKind::Photo, "file-id", Some("caption".into()));
        assert!(!body.is_text());
        assert_eq!(body.text_content(), Some("caption"));
    }
}
