use std::sync::Arc;

use tokio::sync::mpsc;

use super::*;
use crate::models::Task;
use crate::tasks::MockTaskLoader;

#[tokio::test]
async fn test_refresh_without_loader_is_noop() {
    let (tx, mut rx) = mpsc::unbounded_channel::<Event>();
    let refresher = TaskListRefresher::new(None, Arc::new(tx));

    assert!(!refresher.has_loader());
    refresher.refresh().await.expect("refresh should not fail");
    assert!(rx.try_recv().is_err());
}

#[tokio::test]
async fn test_refresh_sends_loaded_tasks() {
    let mut loader = MockTaskLoader::new();
    loader.expect_list_tasks().times(1).returning(|| {
        Ok(vec![
            Task::new(1, "Buy milk"),
            Task::new(2, "Walk the dog").with_completed(true),
        ])
    });

    let (tx, mut rx) = mpsc::unbounded_channel::<Event>();
    let refresher = TaskListRefresher::new(Some(Arc::new(loader)), Arc::new(tx));
    refresher.refresh().await.expect("refresh failed");

    match rx.try_recv() {
        Ok(Event::TasksLoaded(tasks)) => {
            assert_eq!(tasks.len(), 2);
            assert_eq!(tasks[0].title, "Buy milk");
            assert_eq!(tasks[1].completed, true);
        }
        other => panic!("unexpected event: {:?}", other),
    }
}

#[tokio::test]
async fn test_refresh_propagates_loader_error() {
    let mut loader = MockTaskLoader::new();
    loader
        .expect_list_tasks()
        .returning(|| Err(eyre::eyre!("connection refused")));

    let (tx, mut rx) = mpsc::unbounded_channel::<Event>();
    let refresher = TaskListRefresher::new(Some(Arc::new(loader)), Arc::new(tx));

    let err = refresher.refresh().await.expect_err("refresh should fail");
    assert!(format!("{err:?}").contains("connection refused"));
    assert!(rx.try_recv().is_err());
}
