use std::io;

use crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture},
    terminal::{EnterAlternateScreen, LeaveAlternateScreen},
};
use eyre::Result;
use ratatui::crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode},
};
use ratatui::{
    Terminal,
    layout::Alignment,
    prelude::{Backend, CrosstermBackend},
    style::{Color, Style},
    widgets::{Block, BorderType, Borders, Paragraph},
};
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

use crate::config::Configuration;
use crate::models::{Action, Event};

use super::services::EventService;
use super::ui::{Notice, TasksScreen, utils};

const UPDATES_OFF: &str = "Live updates are off. Enable ui.tasks_panel to follow the task list.";

pub struct App<'a> {
    action_tx: mpsc::UnboundedSender<Action>,
    events: &'a mut EventService,

    tasks_screen: Option<TasksScreen>,
    notice: Notice,
    notice_width: u16,

    cancel_token: CancellationToken,
}

impl<'a> App<'a> {
    pub fn new(
        config: &Configuration,
        action_tx: mpsc::UnboundedSender<Action>,
        events: &'a mut EventService,
        cancel_token: CancellationToken,
    ) -> App<'a> {
        let tasks_screen = config
            .ui
            .tasks_panel
            .then(|| TasksScreen::new(action_tx.clone()));

        App {
            action_tx,
            events,
            tasks_screen,
            notice: Notice::from(&config.notice),
            notice_width: config.notice.width_percent,
            cancel_token,
        }
    }

    pub async fn run(&mut self) -> Result<()> {
        let stdout = io::stdout();
        let mut stdout = stdout.lock();

        enable_raw_mode()?;
        execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;

        let term_backend = CrosstermBackend::new(stdout);
        let mut terminal = Terminal::new(term_backend)?;

        if self.tasks_screen.is_some() {
            let _ = self.action_tx.send(Action::RefreshTasks);
        }
        let result = self.start_loop(&mut terminal).await;

        self.cancel_token.cancel();

        disable_raw_mode()?;
        execute!(
            terminal.backend_mut(),
            LeaveAlternateScreen,
            DisableMouseCapture
        )?;

        terminal.show_cursor()?;
        result
    }

    async fn start_loop<B: Backend>(&mut self, terminal: &mut Terminal<B>) -> Result<()> {
        loop {
            self.render(terminal)?;
            let event = self.events.next().await;
            if self.handle_event(event) {
                return Ok(());
            }
        }
    }

    /// handle_event applies one event and returns true when the app should quit.
    fn handle_event(&mut self, event: Event) -> bool {
        match event {
            Event::Quit | Event::KeyboardCtrlC | Event::KeyboardChar('q') => return true,

            Event::Notice(msg) => {
                self.notice.add_message(msg);
            }

            Event::TasksLoaded(tasks) => match self.tasks_screen.as_mut() {
                Some(screen) => screen.set_tasks(tasks),
                None => log::debug!("Dropping {} loaded tasks, panel is off", tasks.len()),
            },

            Event::StreamStatus(status) => {
                log::debug!("Update stream is {}", status.label());
                if let Some(screen) = self.tasks_screen.as_mut() {
                    screen.set_status(status);
                }
            }

            Event::KeyboardEsc => self.notice.clear(),

            Event::UiTick => {}

            event => {
                if let Some(screen) = self.tasks_screen.as_mut() {
                    screen.handle_key_event(&event);
                }
            }
        }
        false
    }

    fn render<B: Backend>(&mut self, terminal: &mut Terminal<B>) -> Result<()> {
        terminal.draw(|f| {
            let area = f.area();
            match self.tasks_screen.as_mut() {
                Some(screen) => screen.render(f, area),
                None => f.render_widget(
                    Paragraph::new(UPDATES_OFF)
                        .alignment(Alignment::Center)
                        .style(Style::default().fg(Color::DarkGray))
                        .block(
                            Block::default()
                                .borders(Borders::ALL)
                                .border_type(BorderType::Rounded),
                        ),
                    area,
                ),
            }

            self.notice
                .render(f, utils::notice_area(area, self.notice_width));
        })?;
        Ok(())
    }
}
