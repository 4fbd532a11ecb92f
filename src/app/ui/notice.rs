#[cfg(test)]
#[path = "notice_test.rs"]
mod tests;

use std::sync::{Arc, Mutex};
use std::time::Duration;

use chrono::{DateTime, TimeDelta, Utc};
use ratatui::{
    Frame,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Clear, List, ListItem},
};
use unicode_width::UnicodeWidthStr;

use super::utils;
use crate::config::NoticeConfig;
use crate::models::NoticeMessage;

/// Clock is the time source toast lifetimes are measured against.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// ManualClock only moves when told to.
pub struct ManualClock {
    now: Mutex<DateTime<Utc>>,
}

impl ManualClock {
    pub fn new(now: DateTime<Utc>) -> Self {
        Self {
            now: Mutex::new(now),
        }
    }

    pub fn advance(&self, by: Duration) {
        if let Ok(mut now) = self.now.lock() {
            *now = add_duration(*now, by);
        }
    }
}

impl Clock for ManualClock {
    fn now(&self) -> DateTime<Utc> {
        self.now.lock().map(|now| *now).unwrap_or_else(|_| Utc::now())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ToastId(uuid::Uuid);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastPhase {
    Visible,
    FadingOut,
}

struct Toast {
    id: ToastId,
    value: NoticeMessage,
    expires_at: DateTime<Utc>,
}

pub struct Notice {
    toasts: Vec<Toast>,
    display_duration: Duration,
    fade_duration: Duration,
    clock: Arc<dyn Clock>,
}

impl Notice {
    pub fn new(display_duration: Duration, fade_duration: Duration) -> Notice {
        Notice {
            display_duration,
            fade_duration,
            ..Default::default()
        }
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Notice {
        self.clock = clock;
        self
    }

    /// add_message shows the message right away. The returned id can be
    /// used to dismiss or expire the toast early and is safe to ignore.
    pub fn add_message(&mut self, msg: NoticeMessage) -> ToastId {
        let id = ToastId(uuid::Uuid::new_v4());
        let duration = msg.duration().unwrap_or(self.display_duration);
        let expires_at = add_duration(self.clock.now(), duration);
        self.toasts.push(Toast {
            id,
            value: msg,
            expires_at,
        });
        id
    }

    pub fn info(&mut self, msg: impl Into<String>) -> ToastId {
        self.add_message(NoticeMessage::info(msg))
    }

    pub fn success(&mut self, msg: impl Into<String>) -> ToastId {
        self.add_message(NoticeMessage::success(msg))
    }

    pub fn warning(&mut self, msg: impl Into<String>) -> ToastId {
        self.add_message(NoticeMessage::warning(msg))
    }

    pub fn error(&mut self, msg: impl Into<String>) -> ToastId {
        self.add_message(NoticeMessage::error(msg))
    }

    /// dismiss removes the toast immediately, skipping the fade.
    pub fn dismiss(&mut self, id: ToastId) -> bool {
        let before = self.toasts.len();
        self.toasts.retain(|toast| toast.id != id);
        before != self.toasts.len()
    }

    /// expire starts the fade-out now if it has not started yet.
    pub fn expire(&mut self, id: ToastId) -> bool {
        let now = self.clock.now();
        match self.toasts.iter_mut().find(|toast| toast.id == id) {
            Some(toast) => {
                toast.expires_at = toast.expires_at.min(now);
                true
            }
            None => false,
        }
    }

    pub fn clear(&mut self) {
        self.toasts.clear();
    }

    pub fn phase(&mut self, id: ToastId) -> Option<ToastPhase> {
        self.sync();
        let now = self.clock.now();
        self.toasts
            .iter()
            .find(|toast| toast.id == id)
            .map(|toast| toast_phase(toast, now))
    }

    pub fn len(&mut self) -> usize {
        self.sync();
        self.toasts.len()
    }

    pub fn is_empty(&mut self) -> bool {
        self.len() == 0
    }

    fn sync(&mut self) {
        let now = self.clock.now();
        let fade = self.fade_duration;
        self.toasts
            .retain(|toast| now < add_duration(toast.expires_at, fade));
    }

    pub fn render(&mut self, f: &mut Frame, area: Rect) {
        self.sync();
        if self.toasts.is_empty() || area.width < 6 || area.height < 3 {
            return;
        }

        let max_width = area.width as usize - 2;
        let max_height = area.height as usize;
        let now = self.clock.now();

        let (items, height) = build_list_items(&self.toasts, now, max_width, max_height);
        let area = Rect {
            height: height as u16,
            ..area
        };
        f.render_widget(Clear, area);
        f.render_widget(List::new(items), area);
    }
}

impl Default for Notice {
    fn default() -> Self {
        let config = NoticeConfig::default();
        Self {
            toasts: vec![],
            display_duration: config.duration(),
            fade_duration: config.fade(),
            clock: Arc::new(SystemClock),
        }
    }
}

impl From<&NoticeConfig> for Notice {
    fn from(value: &NoticeConfig) -> Self {
        Notice::new(value.duration(), value.fade())
    }
}

fn toast_phase(toast: &Toast, now: DateTime<Utc>) -> ToastPhase {
    if now >= toast.expires_at {
        ToastPhase::FadingOut
    } else {
        ToastPhase::Visible
    }
}

fn add_duration(at: DateTime<Utc>, duration: Duration) -> DateTime<Utc> {
    TimeDelta::from_std(duration)
        .ok()
        .and_then(|delta| at.checked_add_signed(delta))
        .unwrap_or(DateTime::<Utc>::MAX_UTC)
}

fn build_list_items<'a>(
    toasts: &[Toast],
    now: DateTime<Utc>,
    max_width: usize,
    max_height: usize,
) -> (Vec<ListItem<'a>>, usize) {
    let mut items = vec![];
    let mut current_height = 0;

    for toast in toasts {
        let kind = toast.value.kind();
        let lines = build_bubble(
            kind.glyph(),
            toast.value.message(),
            max_width,
            kind.border_color(),
            kind.text_color(),
        );

        if current_height + lines.len() > max_height {
            break;
        }
        current_height += lines.len();

        let style = match toast_phase(toast, now) {
            ToastPhase::Visible => Style::default(),
            ToastPhase::FadingOut => Style::default().add_modifier(Modifier::DIM),
        };
        items.push(ListItem::new(lines).style(style));
    }
    (items, current_height)
}

fn build_bubble<'a>(
    glyph: &str,
    message: &str,
    max_width: usize,
    border_color: Color,
    text_color: Color,
) -> Vec<Line<'a>> {
    let prefix = format!("{glyph} ");
    let indent = " ".repeat(prefix.width());
    let inner_width = max_width.saturating_sub(2 + prefix.width());

    let lines = utils::wrap_words(message, inner_width)
        .into_iter()
        .enumerate()
        .map(|(i, line)| {
            if i == 0 {
                format!("{prefix}{line}")
            } else {
                format!("{indent}{line}")
            }
        })
        .collect();

    wrap_bubble(lines, max_width, border_color, text_color)
}

fn wrap_bubble<'a>(
    lines: Vec<String>,
    max_width: usize,
    border_color: Color,
    text_color: Color,
) -> Vec<Line<'a>> {
    let top_bar = highlight_line(format!("╭{}╮", "─".repeat(max_width)), border_color);
    let bottom_bar = highlight_line(format!("╰{}╯", "─".repeat(max_width)), border_color);

    let mut wrapped_lines = vec![top_bar];
    for line in lines {
        let fill = utils::repeat_from_substactions(" ", &[max_width - 2, line.width()]);
        wrapped_lines.push(Line::from(vec![
            highlight_span("│ ".to_string(), border_color),
            highlight_span(format!("{line}{fill}"), text_color),
            highlight_span(" │".to_string(), border_color),
        ]));
    }

    wrapped_lines.push(bottom_bar);
    wrapped_lines
}

fn highlight_span<'a>(text: String, color: Color) -> Span<'a> {
    Span::styled(
        text,
        Style {
            fg: Some(color),
            ..Default::default()
        },
    )
}

fn highlight_line<'a>(text: String, color: Color) -> Line<'a> {
    Line::from(highlight_span(text, color))
}
