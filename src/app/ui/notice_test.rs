use ratatui::{Terminal, backend::TestBackend, buffer::Buffer};

use super::*;
use crate::models::NoticeKind;

fn setup() -> (Notice, Arc<ManualClock>) {
    let clock = Arc::new(ManualClock::new(Utc::now()));
    let notice = Notice::new(Duration::from_millis(3000), Duration::from_millis(500))
        .with_clock(clock.clone());
    (notice, clock)
}

fn buffer_text(buffer: &Buffer) -> String {
    let area = buffer.area;
    let mut text = String::new();
    for y in area.top()..area.bottom() {
        for x in area.left()..area.right() {
            text.push_str(buffer[(x, y)].symbol());
        }
        text.push('\n');
    }
    text
}

fn render(notice: &mut Notice, width: u16, height: u16) -> String {
    let mut terminal = Terminal::new(TestBackend::new(width, height)).expect("terminal");
    terminal
        .draw(|f| {
            let area = f.area();
            notice.render(f, area);
        })
        .expect("failed to draw");
    buffer_text(terminal.backend().buffer())
}

#[test]
fn test_add_message_renders_one_toast_with_glyph() {
    let cases = [
        (NoticeKind::Info, "ℹ"),
        (NoticeKind::Success, "✔"),
        (NoticeKind::Warning, "⚠"),
        (NoticeKind::Error, "✖"),
    ];

    for (kind, glyph) in cases {
        let (mut notice, _) = setup();
        notice.add_message(NoticeMessage::new("New task: Buy milk").with_kind(kind.clone()));
        assert_eq!(notice.len(), 1);

        let text = render(&mut notice, 40, 6);
        assert!(text.contains("Buy milk"), "{kind}: {text}");
        assert!(text.contains(glyph), "{kind}: {text}");
        assert_eq!(text.matches('╭').count(), 1);
    }
}

#[test]
fn test_unknown_kind_renders_default_glyph() {
    let (mut notice, _) = setup();
    notice.add_message(NoticeMessage::new("hello").with_kind(NoticeKind::from("shiny")));

    let text = render(&mut notice, 40, 6);
    assert!(text.contains(&format!("{} hello", crate::models::DEFAULT_GLYPH)));
}

#[test]
fn test_toast_lifecycle() {
    let (mut notice, clock) = setup();
    let id = notice.info("Saved");

    assert_eq!(notice.phase(id), Some(ToastPhase::Visible));

    clock.advance(Duration::from_millis(2999));
    assert_eq!(notice.phase(id), Some(ToastPhase::Visible));

    clock.advance(Duration::from_millis(1));
    assert_eq!(notice.phase(id), Some(ToastPhase::FadingOut));

    clock.advance(Duration::from_millis(499));
    assert_eq!(notice.phase(id), Some(ToastPhase::FadingOut));

    clock.advance(Duration::from_millis(1));
    assert_eq!(notice.phase(id), None);
    assert!(notice.is_empty());
}

#[test]
fn test_custom_duration() {
    let (mut notice, clock) = setup();
    let short =
        notice.add_message(NoticeMessage::info("short").with_duration(Duration::from_millis(100)));
    let default = notice.info("default");

    clock.advance(Duration::from_millis(100));
    assert_eq!(notice.phase(short), Some(ToastPhase::FadingOut));
    assert_eq!(notice.phase(default), Some(ToastPhase::Visible));

    clock.advance(Duration::from_millis(500));
    assert_eq!(notice.phase(short), None);
    assert_eq!(notice.len(), 1);
}

#[test]
fn test_toasts_stack_without_dedup() {
    let (mut notice, _) = setup();
    for _ in 0..5 {
        notice.success("New task: Buy milk");
    }
    assert_eq!(notice.len(), 5);

    let text = render(&mut notice, 40, 30);
    assert_eq!(text.matches("Buy milk").count(), 5);
}

#[test]
fn test_render_clips_to_height() {
    let (mut notice, _) = setup();
    for i in 0..10 {
        notice.info(format!("message {i}"));
    }

    // Each toast takes three rows
    let text = render(&mut notice, 40, 7);
    assert_eq!(text.matches("message").count(), 2);
    assert_eq!(notice.len(), 10);
}

#[test]
fn test_dismiss_and_expire() {
    let (mut notice, clock) = setup();
    let first = notice.info("first");
    let second = notice.info("second");

    assert!(notice.dismiss(first));
    assert!(!notice.dismiss(first));
    assert_eq!(notice.phase(first), None);

    assert!(notice.expire(second));
    assert_eq!(notice.phase(second), Some(ToastPhase::FadingOut));
    clock.advance(Duration::from_millis(500));
    assert_eq!(notice.phase(second), None);
    assert!(!notice.expire(second));
}

#[test]
fn test_long_message_wraps_inside_bubble() {
    let (mut notice, _) = setup();
    notice.warning("The update stream is unavailable, retrying in a few seconds");

    let text = render(&mut notice, 24, 10);
    let rows = text.lines().filter(|l| l.contains('│')).count();
    assert!(rows > 1, "{text}");
    for row in text.lines() {
        assert_eq!(row.chars().count(), 24);
    }
}

#[test]
fn test_render_tiny_area_is_noop() {
    let (mut notice, _) = setup();
    notice.info("hello");
    let text = render(&mut notice, 4, 2);
    assert!(!text.contains("hello"));
}

#[test]
fn test_from_config() {
    let config = NoticeConfig {
        duration_ms: 1000,
        fade_ms: 100,
        ..Default::default()
    };
    let clock = Arc::new(ManualClock::new(Utc::now()));
    let mut notice = Notice::from(&config).with_clock(clock.clone());
    let id = notice.info("hello");

    clock.advance(Duration::from_millis(1000));
    assert_eq!(notice.phase(id), Some(ToastPhase::FadingOut));
    clock.advance(Duration::from_millis(100));
    assert_eq!(notice.phase(id), None);
}
