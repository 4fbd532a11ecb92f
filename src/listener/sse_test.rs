use std::sync::Mutex;

use super::*;

#[derive(Default)]
struct RecordingHandler {
    opened: Mutex<usize>,
    closed: Mutex<usize>,
    messages: Mutex<Vec<SseEvent>>,
    errors: Mutex<Vec<String>>,
}

#[async_trait]
impl SseHandler for RecordingHandler {
    async fn on_open(&self) {
        *self.opened.lock().unwrap() += 1;
    }

    async fn on_message(&self, event: SseEvent) {
        self.messages.lock().unwrap().push(event);
    }

    async fn on_error(&self, err: &SseError) {
        self.errors.lock().unwrap().push(err.to_string());
    }

    async fn on_close(&self) {
        *self.closed.lock().unwrap() += 1;
    }
}

fn feed_all(parser: &mut SseParser, body: &str) -> Vec<SseEvent> {
    body.split('\n')
        .filter_map(|line| parser.feed_line(line))
        .collect()
}

#[test]
fn test_parse_single_data_line() {
    let mut parser = SseParser::default();
    let events = feed_all(&mut parser, "data: {\"type\": \"new_task\"}\n\n");

    assert_eq!(events.len(), 1);
    assert_eq!(events[0].event, "message");
    assert_eq!(events[0].data, r#"{"type": "new_task"}"#);
    assert_eq!(events[0].id, None);
}

#[test]
fn test_parse_multi_line_data() {
    let mut parser = SseParser::default();
    let events = feed_all(&mut parser, "data: first\ndata:second\ndata\n\n");

    assert_eq!(events.len(), 1);
    assert_eq!(events[0].data, "first\nsecond\n");
}

#[test]
fn test_parse_comments_and_blank_events() {
    let mut parser = SseParser::default();
    let events = feed_all(&mut parser, ": keep-alive\n\nevent: ping\n\ndata: hi\n\n");

    // The named event without data is dropped and does not leak its name
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].event, "message");
    assert_eq!(events[0].data, "hi");
}

#[test]
fn test_parse_named_event_id_and_retry() {
    let mut parser = SseParser::default();
    let events = feed_all(
        &mut parser,
        "retry: 1500\nid: 42\nevent: update\ndata: x\n\nretry: soon\ndata: y\n\n",
    );

    assert_eq!(parser.take_retry(), Some(time::Duration::from_millis(1500)));
    assert_eq!(parser.take_retry(), None);
    assert_eq!(parser.last_event_id(), Some("42"));

    assert_eq!(events.len(), 2);
    assert_eq!(events[0].event, "update");
    assert_eq!(events[0].id.as_deref(), Some("42"));
    assert_eq!(events[1].event, "message");
    assert_eq!(events[1].id.as_deref(), Some("42"));
}

#[test]
fn test_parse_incomplete_event_is_not_dispatched() {
    let mut parser = SseParser::default();
    let events = feed_all(&mut parser, "data: half");
    assert!(events.is_empty());
}

#[test]
fn test_from_server_config() {
    let config = ServerConfig {
        endpoint: "http://tasks.local/".to_string(),
        reconnect: false,
        retry_ms: 250,
        ..Default::default()
    };

    let source = EventSource::from(&config);
    assert_eq!(source.url(), "http://tasks.local/updates");
    assert_eq!(source.retry(), time::Duration::from_millis(250));
}

#[tokio::test]
async fn test_event_source_delivers_messages() {
    let body = [
        ": connected",
        "",
        "data: {\"type\": \"new_task\", \"data\": {\"title\": \"Buy milk\"}}",
        "",
        "event: heartbeat",
        "data: skip me",
        "",
        "retry: 10",
        "data: {\"type\": \"task_completed\", \"data\": {\"task_id\": 1}}",
        "",
        "",
    ]
    .join("\n");

    let mut server = mockito::Server::new_async().await;
    let updates_handler = server
        .mock("GET", "/updates")
        .match_header("Accept", "text/event-stream")
        .with_status(200)
        .with_header("content-type", "text/event-stream")
        .with_body(body)
        .expect(1)
        .create_async()
        .await;

    let handler = Arc::new(RecordingHandler::default());
    let source = EventSource::new(format!("{}/updates", server.url())).with_reconnect(false);

    source
        .run(handler.clone(), CancellationToken::new())
        .await
        .expect("event source failed");
    updates_handler.assert_async().await;

    assert_eq!(*handler.opened.lock().unwrap(), 1);
    assert_eq!(*handler.closed.lock().unwrap(), 1);
    assert!(handler.errors.lock().unwrap().is_empty());

    let messages = handler.messages.lock().unwrap();
    assert_eq!(messages.len(), 2);
    assert!(messages[0].data.contains("Buy milk"));
    assert!(messages[1].data.contains("task_completed"));
}

#[tokio::test]
async fn test_event_source_bad_status() {
    let mut server = mockito::Server::new_async().await;
    let _m = server
        .mock("GET", "/updates")
        .with_status(503)
        .create_async()
        .await;

    let handler = Arc::new(RecordingHandler::default());
    let source = EventSource::new(format!("{}/updates", server.url())).with_reconnect(false);

    source
        .run(handler.clone(), CancellationToken::new())
        .await
        .expect("transport errors are reported to the handler");

    assert_eq!(*handler.opened.lock().unwrap(), 0);
    let errors = handler.errors.lock().unwrap();
    assert_eq!(errors.len(), 1);
    assert!(errors[0].contains("503"));
}

#[tokio::test]
async fn test_event_source_reconnects_until_cancelled() {
    let mut server = mockito::Server::new_async().await;
    let _m = server
        .mock("GET", "/updates")
        .with_status(200)
        .with_body("data: tick\n\n")
        .create_async()
        .await;

    let handler = Arc::new(RecordingHandler::default());
    let source = EventSource::new(format!("{}/updates", server.url()))
        .with_retry(time::Duration::from_millis(10));

    let token = CancellationToken::new();
    let task = tokio::spawn(source.run(handler.clone(), token.clone()));

    let start = time::Instant::now();
    while handler.messages.lock().unwrap().len() < 2 {
        assert!(
            start.elapsed() < time::Duration::from_secs(5),
            "timeout while waiting for a reconnect"
        );
        tokio::time::sleep(time::Duration::from_millis(5)).await;
    }

    token.cancel();
    task.await
        .expect("join failed")
        .expect("event source failed");
    assert!(*handler.opened.lock().unwrap() >= 2);
}

#[tokio::test]
async fn test_event_source_decodes_invalid_utf8_lossily() {
    let mut body = b"data: {\"type\": \"new_task\", \"data\": {\"title\": \"caf\xff\"}}\n\n".to_vec();
    body.extend_from_slice(
        b"data: {\"type\": \"new_task\", \"data\": {\"title\": \"Buy milk\"}}\r\n\r\n",
    );

    let mut server = mockito::Server::new_async().await;
    let updates_handler = server
        .mock("GET", "/updates")
        .with_status(200)
        .with_header("content-type", "text/event-stream")
        .with_body(body)
        .expect(1)
        .create_async()
        .await;

    let handler = Arc::new(RecordingHandler::default());
    let source = EventSource::new(format!("{}/updates", server.url())).with_reconnect(false);

    source
        .run(handler.clone(), CancellationToken::new())
        .await
        .expect("event source failed");
    updates_handler.assert_async().await;

    assert!(handler.errors.lock().unwrap().is_empty());
    assert_eq!(*handler.closed.lock().unwrap(), 1);

    let messages = handler.messages.lock().unwrap();
    assert_eq!(messages.len(), 2);
    assert!(messages[0].data.contains("caf\u{FFFD}"));
    assert!(messages[1].data.ends_with("\"Buy milk\"}}"));
}

#[tokio::test]
async fn test_event_source_resumes_with_last_event_id() {
    let mut server = mockito::Server::new_async().await;
    let first_handler = server
        .mock("GET", "/updates")
        .match_header("Last-Event-ID", mockito::Matcher::Missing)
        .with_status(200)
        .with_body("id: 7\nretry: 10\ndata: first\n\n")
        .expect(1)
        .create_async()
        .await;
    let resumed_handler = server
        .mock("GET", "/updates")
        .match_header("Last-Event-ID", "7")
        .with_status(200)
        .with_body("data: second\n\n")
        .expect_at_least(1)
        .create_async()
        .await;

    // Only the server announced delay lets the reconnect happen in time.
    let handler = Arc::new(RecordingHandler::default());
    let source = EventSource::new(format!("{}/updates", server.url()))
        .with_retry(time::Duration::from_secs(3600));

    let token = CancellationToken::new();
    let task = tokio::spawn(source.run(handler.clone(), token.clone()));

    let start = time::Instant::now();
    while handler.messages.lock().unwrap().len() < 2 {
        assert!(
            start.elapsed() < time::Duration::from_secs(5),
            "timeout while waiting for the resumed stream"
        );
        tokio::time::sleep(time::Duration::from_millis(5)).await;
    }

    token.cancel();
    task.await
        .expect("join failed")
        .expect("event source failed");
    first_handler.assert_async().await;
    resumed_handler.assert_async().await;

    let messages = handler.messages.lock().unwrap();
    assert_eq!(messages[0].data, "first");
    assert_eq!(messages[0].id.as_deref(), Some("7"));
    assert_eq!(messages[1].data, "second");
    assert_eq!(messages[1].id.as_deref(), Some("7"));
}
