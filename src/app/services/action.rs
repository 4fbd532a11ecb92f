use crate::models::{Action, ArcEventTx, Event, NoticeMessage};
use crate::error_notice;
use crate::tasks::{ArcRefresher, ArcTaskLoader};
use eyre::{Context, Result};
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

/// ActionService runs task actions requested by the UI off the UI loop.
pub struct ActionService {
    event_tx: ArcEventTx,
    action_rx: mpsc::UnboundedReceiver<Action>,
    cancel_token: CancellationToken,
    loader: ArcTaskLoader,
    refresher: ArcRefresher,
}

impl ActionService {
    pub fn new(
        event_tx: ArcEventTx,
        action_rx: mpsc::UnboundedReceiver<Action>,
        loader: ArcTaskLoader,
        refresher: ArcRefresher,
        cancel_token: CancellationToken,
    ) -> ActionService {
        ActionService {
            event_tx,
            action_rx,
            cancel_token,
            loader,
            refresher,
        }
    }

    pub async fn run(&mut self) -> Result<()> {
        loop {
            tokio::select! {
                _ = self.cancel_token.cancelled() => {
                    log::debug!("Action service cancelled");
                    return Ok(());
                }

                action = self.action_rx.recv() => {
                    let Some(action) = action else {
                        log::debug!("Action channel closed");
                        return Ok(());
                    };

                    match action {
                        Action::RefreshTasks => {
                            if let Err(err) = self.refresher.refresh().await {
                                log::error!("Failed to refresh tasks: {:?}", err);
                                self.send_notice(error_notice!(format!(
                                    "Failed to refresh tasks: {}",
                                    err
                                )))
                                .await;
                            }
                        }

                        Action::CompleteTask(id) => {
                            if let Err(err) = self.complete_task(id).await {
                                log::error!("Failed to complete task {}: {:?}", id, err);
                                self.send_notice(error_notice!(format!(
                                    "Failed to complete task #{}: {}",
                                    id, err
                                )))
                                .await;
                            }
                        }
                    }
                }
            }
        }
    }

    async fn complete_task(&self, id: u64) -> Result<()> {
        self.loader.complete_task(id).await?;
        // The update stream announces the completion; refresh anyway in
        // case live updates are off.
        self.refresher
            .refresh()
            .await
            .wrap_err("refreshing tasks")?;
        Ok(())
    }

    async fn send_notice(&self, notice: NoticeMessage) {
        self.event_tx
            .send(Event::Notice(notice))
            .await
            .unwrap_or_else(|err| {
                log::error!("Failed to send notice: {}", err);
            });
    }
}
