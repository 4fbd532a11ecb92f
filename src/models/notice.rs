#[cfg(test)]
#[path = "notice_test.rs"]
mod tests;

use std::fmt::Display;

use ratatui::style::Color;

#[macro_export]
macro_rules! info_notice {
    ($msg:expr) => {
        $crate::models::NoticeMessage::info($msg)
    };
    ($msg:expr, $duration:expr) => {
        $crate::models::NoticeMessage::info($msg).with_duration($duration)
    };
}

#[macro_export]
macro_rules! success_notice {
    ($msg:expr) => {
        $crate::models::NoticeMessage::success($msg)
    };
    ($msg:expr, $duration:expr) => {
        $crate::models::NoticeMessage::success($msg).with_duration($duration)
    };
}

#[macro_export]
macro_rules! warn_notice {
    ($msg:expr) => {
        $crate::models::NoticeMessage::warning($msg)
    };
    ($msg:expr, $duration:expr) => {
        $crate::models::NoticeMessage::warning($msg).with_duration($duration)
    };
}

#[macro_export]
macro_rules! error_notice {
    ($msg:expr) => {
        $crate::models::NoticeMessage::error($msg)
    };
    ($msg:expr, $duration:expr) => {
        $crate::models::NoticeMessage::error($msg).with_duration($duration)
    };
}

/// Glyph for categories outside the known set.
pub const DEFAULT_GLYPH: &str = "•";

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub enum NoticeKind {
    #[default]
    Info,
    Success,
    Warning,
    Error,
    Other(String),
}

#[derive(Debug, Clone)]
pub struct NoticeMessage {
    message: String,
    kind: NoticeKind,
    duration: Option<std::time::Duration>,
}

impl NoticeMessage {
    pub fn info(message: impl Into<String>) -> Self {
        Self::new(message).with_kind(NoticeKind::Info)
    }

    pub fn success(message: impl Into<String>) -> Self {
        Self::new(message).with_kind(NoticeKind::Success)
    }

    pub fn warning(message: impl Into<String>) -> Self {
        Self::new(message).with_kind(NoticeKind::Warning)
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self::new(message).with_kind(NoticeKind::Error)
    }

    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            kind: NoticeKind::default(),
            duration: None,
        }
    }

    pub fn with_kind(mut self, kind: NoticeKind) -> Self {
        self.kind = kind;
        self
    }

    pub fn with_duration(mut self, duration: std::time::Duration) -> Self {
        self.duration = Some(duration);
        self
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn kind(&self) -> &NoticeKind {
        &self.kind
    }

    pub fn duration(&self) -> Option<std::time::Duration> {
        self.duration
    }
}

impl NoticeKind {
    pub fn glyph(&self) -> &'static str {
        match self {
            NoticeKind::Info => "ℹ",
            NoticeKind::Success => "✔",
            NoticeKind::Warning => "⚠",
            NoticeKind::Error => "✖",
            NoticeKind::Other(_) => DEFAULT_GLYPH,
        }
    }

    pub fn border_color(&self) -> Color {
        match self {
            NoticeKind::Info | NoticeKind::Other(_) => Color::Rgb(30, 136, 229),
            NoticeKind::Success => Color::Rgb(67, 160, 71),
            NoticeKind::Warning => Color::Rgb(251, 140, 0),
            NoticeKind::Error => Color::Rgb(211, 47, 47),
        }
    }

    pub fn text_color(&self) -> Color {
        match self {
            NoticeKind::Info | NoticeKind::Other(_) => Color::Rgb(144, 202, 249),
            NoticeKind::Success => Color::Rgb(165, 214, 167),
            NoticeKind::Warning => Color::Rgb(255, 213, 79),
            NoticeKind::Error => Color::Rgb(255, 138, 128),
        }
    }
}

impl From<&str> for NoticeKind {
    fn from(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "info" => NoticeKind::Info,
            "success" => NoticeKind::Success,
            "warning" => NoticeKind::Warning,
            "error" => NoticeKind::Error,
            _ => NoticeKind::Other(value.to_string()),
        }
    }
}

impl Display for NoticeKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            NoticeKind::Info => write!(f, "info"),
            NoticeKind::Success => write!(f, "success"),
            NoticeKind::Warning => write!(f, "warning"),
            NoticeKind::Error => write!(f, "error"),
            NoticeKind::Other(name) => write!(f, "{name}"),
        }
    }
}
