#[cfg(test)]
#[path = "tasks_test.rs"]
mod tests;

use ratatui::{
    Frame,
    layout::{Alignment, Rect},
    style::{Color, Modifier, Style, Stylize},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, List, ListItem, ListState, Padding, Paragraph},
};
use ratatui_macros::span;
use tokio::sync::mpsc;

use crate::models::{Action, Event, StreamStatus, Task};

const NO_TASKS: &str = "No tasks yet";
const LOADING: &str = "Loading tasks...";

pub struct TasksScreen {
    action_tx: mpsc::UnboundedSender<Action>,

    tasks: Vec<Task>,
    loaded: bool,
    status: StreamStatus,
    list_state: ListState,
}

impl TasksScreen {
    pub fn new(action_tx: mpsc::UnboundedSender<Action>) -> TasksScreen {
        TasksScreen {
            action_tx,
            tasks: vec![],
            loaded: false,
            status: StreamStatus::default(),
            list_state: ListState::default(),
        }
    }

    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub fn status(&self) -> StreamStatus {
        self.status
    }

    pub fn set_status(&mut self, status: StreamStatus) {
        self.status = status;
    }

    /// set_tasks replaces the list and keeps the cursor on the same task
    /// when it is still there.
    pub fn set_tasks(&mut self, tasks: Vec<Task>) {
        let selected_id = self.selected_task().map(|t| t.id);
        self.tasks = tasks;
        self.loaded = true;

        let pos = selected_id
            .and_then(|id| self.tasks.iter().position(|t| t.id == id))
            .or(if self.tasks.is_empty() { None } else { Some(0) })
            .map(|pos| pos.min(self.tasks.len().saturating_sub(1)));
        self.list_state.select(pos);
    }

    pub fn selected_task(&self) -> Option<&Task> {
        self.tasks.get(self.list_state.selected()?)
    }

    pub fn handle_key_event(&mut self, event: &Event) {
        match event {
            Event::UiScrollUp => self.prev_row(),
            Event::UiScrollDown => self.next_row(),
            Event::UiScrollPageUp => self.list_state.select_first(),
            Event::UiScrollPageDown => self.select_last(),

            Event::KeyboardChar('k') => self.prev_row(),
            Event::KeyboardChar('j') => self.next_row(),
            Event::KeyboardChar('r') => {
                let _ = self.action_tx.send(Action::RefreshTasks);
            }
            Event::KeyboardChar('c') | Event::KeyboardEnter => self.complete_selected(),
            _ => {}
        }
    }

    fn complete_selected(&mut self) {
        let Some(task) = self.selected_task() else {
            return;
        };

        if task.completed {
            log::debug!("Task {} is already completed", task.id);
            return;
        }
        let _ = self.action_tx.send(Action::CompleteTask(task.id));
    }

    fn next_row(&mut self) {
        if self.tasks.is_empty() {
            return;
        }
        let next = match self.list_state.selected() {
            Some(i) => (i + 1).min(self.tasks.len() - 1),
            None => 0,
        };
        self.list_state.select(Some(next));
    }

    fn prev_row(&mut self) {
        if self.tasks.is_empty() {
            return;
        }
        let prev = self.list_state.selected().unwrap_or(0).saturating_sub(1);
        self.list_state.select(Some(prev));
    }

    fn select_last(&mut self) {
        if !self.tasks.is_empty() {
            self.list_state.select(Some(self.tasks.len() - 1));
        }
    }

    pub fn render(&mut self, f: &mut Frame, area: Rect) {
        let instructions: Vec<Span> = vec![
            " ".into(),
            span!("q").green().bold(),
            span!(" to quit, ").white(),
            span!("c").green().bold(),
            span!(" to complete, ").white(),
            span!("r").green().bold(),
            span!(" to refresh ").white(),
        ];

        let block = Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(Style::default().fg(Color::LightBlue))
            .padding(Padding::new(1, 1, 0, 0))
            .title(Line::from(" Tasks ").bold())
            .title_alignment(Alignment::Center)
            .title_top(status_line(self.status).right_aligned())
            .title_bottom(Line::from(instructions));

        if self.tasks.is_empty() {
            let text = if self.loaded { NO_TASKS } else { LOADING };
            f.render_widget(
                Paragraph::new(text)
                    .alignment(Alignment::Center)
                    .style(Style::default().fg(Color::DarkGray))
                    .block(block),
                area,
            );
            return;
        }

        let items = self.tasks.iter().map(task_item).collect::<Vec<_>>();
        let list = List::new(items)
            .block(block)
            .highlight_style(Style::default().add_modifier(Modifier::REVERSED));
        f.render_stateful_widget(list, area, &mut self.list_state);
    }
}

fn status_line<'a>(status: StreamStatus) -> Line<'a> {
    let color = match status {
        StreamStatus::Connected => Color::Green,
        StreamStatus::Connecting => Color::Yellow,
        StreamStatus::Disconnected => Color::Red,
        StreamStatus::Disabled => Color::DarkGray,
    };
    Line::from(vec![
        span!("● ").fg(color),
        span!("{} ", status.label()).fg(color),
    ])
}

fn task_item<'a>(task: &Task) -> ListItem<'a> {
    let mut spans = vec![
        Span::raw(if task.completed { "[x] " } else { "[ ] " }),
        span!("#{} ", task.id).fg(Color::DarkGray),
        Span::raw(task.title.clone()),
    ];

    let details = [
        task.category.as_str(),
        task.priority.as_str(),
        task.due_date.as_deref().unwrap_or_default(),
    ]
    .into_iter()
    .filter(|s| !s.is_empty())
    .collect::<Vec<_>>();
    if !details.is_empty() {
        spans.push(span!("  ({})", details.join(", ")).fg(Color::Gray));
    }

    let item = ListItem::new(Line::from(spans));
    if task.completed {
        item.style(
            Style::default()
                .fg(Color::DarkGray)
                .add_modifier(Modifier::CROSSED_OUT),
        )
    } else {
        item
    }
}
