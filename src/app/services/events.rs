use crate::{config::constants::FRAME_DURATION, models::Event};
use crossterm::event::{
    Event as CrosstermEvent, EventStream, KeyCode, KeyEvent, KeyEventKind, KeyModifiers,
    MouseEventKind,
};
use futures::{FutureExt, StreamExt};
use tokio::sync::mpsc;
use tokio::time;

pub struct EventService {
    crossterm_events: EventStream,
    event_rx: mpsc::UnboundedReceiver<Event>,
    event_tx: mpsc::UnboundedSender<Event>,
}

impl EventService {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn event_tx(&self) -> mpsc::UnboundedSender<Event> {
        self.event_tx.clone()
    }

    pub async fn next(&mut self) -> Event {
        loop {
            let e = tokio::select! {
                event = self.event_rx.recv() => event,
                event = self.crossterm_events.next().fuse() => match event {
                    Some(Ok(input)) => handle_crossterm(input),
                    Some(Err(_)) => None,
                    None => None
                },
                _ = time::sleep(FRAME_DURATION) => Some(Event::UiTick)
            };

            if let Some(event) = e {
                return event;
            }
        }
    }
}

impl Default for EventService {
    fn default() -> Self {
        let (event_tx, event_rx) = mpsc::unbounded_channel::<Event>();
        Self {
            crossterm_events: EventStream::new(),
            event_rx,
            event_tx,
        }
    }
}

fn handle_crossterm(event: CrosstermEvent) -> Option<Event> {
    match event {
        CrosstermEvent::Mouse(mouse_event) => match mouse_event.kind {
            MouseEventKind::ScrollUp => Some(Event::UiScrollUp),
            MouseEventKind::ScrollDown => Some(Event::UiScrollDown),
            _ => None,
        },
        CrosstermEvent::Key(key_event) => handle_key(key_event),
        _ => None,
    }
}

pub(crate) fn handle_key(key_event: KeyEvent) -> Option<Event> {
    if key_event.kind == KeyEventKind::Release {
        return None;
    }

    // Map ctrl events
    if key_event.modifiers.contains(KeyModifiers::CONTROL) {
        return match key_event.code {
            KeyCode::Char('c') => Some(Event::KeyboardCtrlC),
            KeyCode::Char('q') => Some(Event::Quit),
            KeyCode::Char('u') => Some(Event::UiScrollPageUp),
            KeyCode::Char('d') => Some(Event::UiScrollPageDown),
            _ => None,
        };
    }

    match key_event.code {
        KeyCode::Esc => Some(Event::KeyboardEsc),
        KeyCode::Enter => Some(Event::KeyboardEnter),
        KeyCode::Up => Some(Event::UiScrollUp),
        KeyCode::Down => Some(Event::UiScrollDown),
        KeyCode::PageUp | KeyCode::Home => Some(Event::UiScrollPageUp),
        KeyCode::PageDown | KeyCode::End => Some(Event::UiScrollPageDown),
        KeyCode::Char(c) => Some(Event::KeyboardChar(c)),
        _ => None,
    }
}
