use std::sync::Arc;
use std::time;

use eyre::Result;
use taskwatch::app::services::{ActionService, EventService};
use taskwatch::config::{Configuration, init_logger, verbose};
use taskwatch::listener::Listener;
use taskwatch::models::action::Action;
use taskwatch::models::ArcEventTx;
use taskwatch::tasks::{ArcRefresher, ArcTaskLoader, TaskClient, TaskListRefresher};
use taskwatch::{
    app::{App, destruct_terminal_for_panic},
    cli::Command,
};
use tokio::{sync::mpsc, task};
use tokio_util::sync::CancellationToken;

#[tokio::main]
async fn main() -> Result<()> {
    let cmd = Command::new();
    if cmd.version() {
        cmd.print_version();
        return Ok(());
    }

    std::panic::set_hook(Box::new(|panic_info| {
        destruct_terminal_for_panic();
        better_panic::Settings::auto().create_panic_handler()(panic_info);
    }));

    let config = cmd.get_config()?;
    Configuration::init(config.clone())?;
    init_logger(&config.log)?;
    verbose!("[+] Logger initialized");
    log::info!("Task server: {}", config.server.endpoint);

    let (action_tx, action_rx) = mpsc::unbounded_channel::<Action>();
    let mut events = EventService::new();
    let event_tx: ArcEventTx = Arc::new(events.event_tx());

    let mut task_set = task::JoinSet::new();
    let token = CancellationToken::new();

    let loader: ArcTaskLoader = Arc::new(TaskClient::from(&config.server));
    let refresher: ArcRefresher = Arc::new(TaskListRefresher::new(
        Some(loader.clone()),
        event_tx.clone(),
    ));

    let mut action_service = ActionService::new(
        event_tx.clone(),
        action_rx,
        loader,
        refresher.clone(),
        token.clone(),
    );
    task_set.spawn(async move { action_service.run().await });

    let listener = Listener::new(&config, event_tx).with_refresher(Some(refresher));
    match listener.spawn(token.clone()) {
        Some(listener) => {
            verbose!("[+] Listening for updates on {}", config.server.updates_url());
            task_set.spawn(async move { listener.await? });
        }
        None => verbose!("[!] Tasks panel is disabled, live updates are off"),
    }

    let mut app = App::new(&config, action_tx, &mut events, token.clone());
    if let Err(err) = app.run().await {
        eprintln!("Error: {}", err);
    }

    token.cancel();
    let shutdown = async {
        while let Some(res) = task_set.join_next().await {
            match res {
                Ok(Ok(())) => {}
                Ok(Err(err)) => log::error!("Task error: {:?}", err),
                Err(err) => log::error!("Task join error: {}", err),
            }
        }
    };

    if tokio::time::timeout(time::Duration::from_secs(5), shutdown)
        .await
        .is_err()
    {
        eprintln!("Shutdown timeout reached");
    }

    Ok(())
}
