use super::*;
use async_trait::async_trait;
use serde_json::{json, Value};
use std::collections::VecDeque;
use std::sync::Mutex;

// ---------------------------------------------------------------------------
// Mocks
// ---------------------------------------------------------------------------

/// Replays scripted responses and records the `from_date` of every call.
struct ScriptedSource {
    responses: Mutex<VecDeque<Result<Value, HomeworkError>>>,
    calls: Arc<Mutex<Vec<i64>>>,
}

impl ScriptedSource {
    fn new(responses: Vec<Result<Value, HomeworkError>>) -> (Self, Arc<Mutex<Vec<i64>>>) {
        let calls = Arc::new(Mutex::new(Vec::new()));
        (
            Self {
                responses: Mutex::new(responses.into()),
                calls: Arc::clone(&calls),
            },
            calls,
        )
    }
}

#[async_trait]
impl StatusSource for ScriptedSource {
    fn name(&self) -> &str {
        "scripted"
    }

    async fn fetch_statuses(&self, from_date: i64) -> Result<Value, HomeworkError> {
        self.calls.lock().unwrap().push(from_date);
        self.responses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(HomeworkError::RequestFailure("script exhausted".into())))
    }
}

/// Records every delivered `(chat_id, text)` pair.
struct MockNotifier {
    sent: Arc<Mutex<Vec<(String, String)>>>,
    /// When true, `notify()` records the attempt and then fails.
    fail: bool,
}

impl MockNotifier {
    fn new(fail: bool) -> (Self, Arc<Mutex<Vec<(String, String)>>>) {
        let sent = Arc::new(Mutex::new(Vec::new()));
        (
            Self {
                sent: Arc::clone(&sent),
                fail,
            },
            sent,
        )
    }
}

#[async_trait]
impl Notifier for MockNotifier {
    fn name(&self) -> &str {
        "mock"
    }

    async fn notify(&self, chat_id: &str, text: &str) -> Result<(), HomeworkError> {
        self.sent
            .lock()
            .unwrap()
            .push((chat_id.to_string(), text.to_string()));
        if self.fail {
            return Err(HomeworkError::DeliveryFailure("connection reset".into()));
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

const START: i64 = 1_699_000_000;

struct Harness {
    poll: PollLoop,
    calls: Arc<Mutex<Vec<i64>>>,
    sent: Arc<Mutex<Vec<(String, String)>>>,
}

fn harness(responses: Vec<Result<Value, HomeworkError>>, policy: DedupPolicy) -> Harness {
    harness_with(responses, policy, false)
}

fn harness_with(
    responses: Vec<Result<Value, HomeworkError>>,
    policy: DedupPolicy,
    fail_send: bool,
) -> Harness {
    let (source, calls) = ScriptedSource::new(responses);
    let (notifier, sent) = MockNotifier::new(fail_send);
    let poll = PollLoop::new(
        Arc::new(source),
        Arc::new(notifier),
        "42".to_string(),
        Duration::from_secs(600),
        policy,
        START,
    );
    Harness { poll, calls, sent }
}

fn texts(sent: &Arc<Mutex<Vec<(String, String)>>>) -> Vec<String> {
    sent.lock().unwrap().iter().map(|(_, t)| t.clone()).collect()
}

fn approved(name: &str) -> Value {
    json!({"homework_name": name, "status": "approved"})
}

// ---------------------------------------------------------------------------
// Cycle behaviour
// ---------------------------------------------------------------------------

#[tokio::test]
async fn test_single_approved_homework() {
    let mut h = harness(
        vec![Ok(json!({
            "homeworks": [approved("HW1")],
            "current_date": 1700000000
        }))],
        DedupPolicy::SuppressRepeats,
    );

    let outcome = h.poll.run_cycle().await;

    assert!(outcome.error.is_none());
    assert_eq!(outcome.delivered, 1);
    assert_eq!(*h.calls.lock().unwrap(), vec![START]);
    let sent = h.sent.lock().unwrap().clone();
    assert_eq!(
        sent,
        vec![(
            "42".to_string(),
            "Changed review status of work \"HW1\". Work reviewed: the reviewer liked everything. Hooray!"
                .to_string()
        )]
    );
    assert_eq!(h.poll.watermark(), 1700000000);
}

#[tokio::test]
async fn test_empty_homeworks_advances_watermark_silently() {
    let mut h = harness(
        vec![Ok(json!({"homeworks": [], "current_date": 1700000100}))],
        DedupPolicy::SuppressRepeats,
    );

    let outcome = h.poll.run_cycle().await;

    assert!(outcome.error.is_none());
    assert_eq!(outcome.delivered, 0);
    assert!(h.sent.lock().unwrap().is_empty());
    assert_eq!(h.poll.watermark(), 1700000100);
}

#[tokio::test]
async fn test_n_homeworks_give_n_notifications() {
    let mut h = harness(
        vec![Ok(json!({
            "homeworks": [
                approved("HW1"),
                {"homework_name": "HW2", "status": "reviewing"},
                {"homework_name": "HW3", "status": "rejected", "reviewer_comment": "fix tests"}
            ],
            "current_date": 1700000200
        }))],
        DedupPolicy::SuppressRepeats,
    );

    let outcome = h.poll.run_cycle().await;

    assert_eq!(outcome.delivered, 3);
    let sent = texts(&h.sent);
    assert_eq!(sent.len(), 3);
    assert!(sent[1].contains("\"HW2\""));
    assert!(sent[2].ends_with("Work reviewed: the reviewer has comments."));
}

#[tokio::test]
async fn test_next_cycle_uses_advanced_watermark() {
    let mut h = harness(
        vec![
            Ok(json!({"homeworks": [], "current_date": 1700000100})),
            Ok(json!({"homeworks": [], "current_date": 1700000700})),
        ],
        DedupPolicy::SuppressRepeats,
    );

    h.poll.run_cycle().await;
    h.poll.run_cycle().await;

    assert_eq!(*h.calls.lock().unwrap(), vec![START, 1700000100]);
    assert_eq!(h.poll.watermark(), 1700000700);
}

// ---------------------------------------------------------------------------
// Deduplication
// ---------------------------------------------------------------------------

#[tokio::test]
async fn test_repeated_message_is_suppressed() {
    let payload = json!({"homeworks": [approved("HW1")], "current_date": 1700000000});
    let mut h = harness(
        vec![Ok(payload.clone()), Ok(payload)],
        DedupPolicy::SuppressRepeats,
    );

    let first = h.poll.run_cycle().await;
    let second = h.poll.run_cycle().await;

    assert_eq!(first.delivered, 1);
    assert_eq!(second.delivered, 0);
    assert_eq!(second.suppressed, 1);
    assert_eq!(texts(&h.sent).len(), 1);
    assert_eq!(h.poll.sent_messages(), 1);
}

#[tokio::test]
async fn test_error_notifications_do_not_count_as_sent_statuses() {
    let mut h = harness(
        vec![
            Err(HomeworkError::RequestFailure("timed out".into())),
            Ok(json!({
                "homeworks": [approved("HW1"), {"homework_name": "HW2", "status": "reviewing"}],
                "current_date": 1700000000
            })),
        ],
        DedupPolicy::SuppressRepeats,
    );

    h.poll.run_cycle().await;
    assert_eq!(h.poll.sent_messages(), 0);

    h.poll.run_cycle().await;
    assert_eq!(h.poll.sent_messages(), 2);
    assert_eq!(texts(&h.sent).len(), 3);
}

#[tokio::test]
async fn test_status_change_is_not_a_duplicate() {
    let mut h = harness(
        vec![
            Ok(json!({
                "homeworks": [{"homework_name": "HW1", "status": "reviewing"}],
                "current_date": 1700000000
            })),
            Ok(json!({"homeworks": [approved("HW1")], "current_date": 1700000600})),
        ],
        DedupPolicy::SuppressRepeats,
    );

    h.poll.run_cycle().await;
    h.poll.run_cycle().await;

    assert_eq!(texts(&h.sent).len(), 2);
}

#[tokio::test]
async fn test_send_always_repeats_messages() {
    let payload = json!({"homeworks": [approved("HW1")], "current_date": 1700000000});
    let mut h = harness(vec![Ok(payload.clone()), Ok(payload)], DedupPolicy::SendAlways);

    h.poll.run_cycle().await;
    let second = h.poll.run_cycle().await;

    assert_eq!(second.delivered, 1);
    assert_eq!(second.suppressed, 0);
    assert_eq!(texts(&h.sent).len(), 2);
}

// ---------------------------------------------------------------------------
// Failures
// ---------------------------------------------------------------------------

#[tokio::test]
async fn test_transport_failure_keeps_watermark_and_notifies_once() {
    let mut h = harness(
        vec![Err(HomeworkError::RequestFailure(
            "API returned status 500".into(),
        ))],
        DedupPolicy::SuppressRepeats,
    );

    let outcome = h.poll.run_cycle().await;

    assert!(matches!(outcome.error, Some(HomeworkError::RequestFailure(_))));
    assert_eq!(h.poll.watermark(), START);
    assert_eq!(
        texts(&h.sent),
        vec!["Error fetching API data: API returned status 500".to_string()]
    );
}

#[tokio::test]
async fn test_malformed_payload_uses_fetch_wording() {
    let mut h = harness(
        vec![Err(HomeworkError::MalformedPayload("failed to decode JSON".into()))],
        DedupPolicy::SuppressRepeats,
    );

    h.poll.run_cycle().await;

    assert_eq!(
        texts(&h.sent),
        vec!["Error fetching API data: failed to decode JSON".to_string()]
    );
    assert_eq!(h.poll.watermark(), START);
}

#[tokio::test]
async fn test_missing_current_date_is_schema_violation() {
    let mut h = harness(
        vec![Ok(json!({"homeworks": [approved("HW1")]}))],
        DedupPolicy::SuppressRepeats,
    );

    let outcome = h.poll.run_cycle().await;

    assert!(matches!(outcome.error, Some(HomeworkError::SchemaViolation(_))));
    assert_eq!(h.poll.watermark(), START);
    let sent = texts(&h.sent);
    assert_eq!(sent.len(), 1);
    assert!(sent[0].starts_with("Program failure: "), "got: {}", sent[0]);
}

#[tokio::test]
async fn test_unknown_status_aborts_cycle_after_earlier_records() {
    let mut h = harness(
        vec![Ok(json!({
            "homeworks": [
                approved("HW1"),
                {"homework_name": "HW2", "status": "pending"},
                approved("HW3")
            ],
            "current_date": 1700000000
        }))],
        DedupPolicy::SuppressRepeats,
    );

    let outcome = h.poll.run_cycle().await;

    assert!(matches!(outcome.error, Some(HomeworkError::UnknownStatus(_))));
    assert_eq!(outcome.delivered, 1);
    assert_eq!(h.poll.watermark(), START);
    let sent = texts(&h.sent);
    assert_eq!(sent.len(), 2);
    assert!(sent[0].contains("\"HW1\""));
    assert_eq!(sent[1], "Program failure: unexpected homework status: pending");
}

#[tokio::test]
async fn test_retry_after_abort_skips_already_sent_records() {
    let bad = json!({
        "homeworks": [approved("HW1"), {"status": "approved"}],
        "current_date": 1700000000
    });
    let good = json!({"homeworks": [approved("HW1")], "current_date": 1700000000});
    let mut h = harness(vec![Ok(bad), Ok(good)], DedupPolicy::SuppressRepeats);

    let first = h.poll.run_cycle().await;
    let second = h.poll.run_cycle().await;

    assert!(matches!(first.error, Some(HomeworkError::SchemaViolation(_))));
    assert_eq!(*h.calls.lock().unwrap(), vec![START, START]);
    assert!(second.error.is_none());
    assert_eq!(second.suppressed, 1);
    assert_eq!(h.poll.watermark(), 1700000000);
}

#[tokio::test]
async fn test_delivery_failure_is_swallowed() {
    let mut h = harness_with(
        vec![Ok(json!({"homeworks": [approved("HW1")], "current_date": 1700000000}))],
        DedupPolicy::SuppressRepeats,
        true,
    );

    let outcome = h.poll.run_cycle().await;

    assert!(outcome.error.is_none());
    assert_eq!(outcome.delivered, 0);
    assert_eq!(texts(&h.sent).len(), 1);
    assert_eq!(h.poll.watermark(), 1700000000);
}

#[tokio::test]
async fn test_error_notification_failure_is_swallowed() {
    let mut h = harness_with(
        vec![
            Err(HomeworkError::RequestFailure("timed out".into())),
            Ok(json!({"homeworks": [], "current_date": 1700000100})),
        ],
        DedupPolicy::SuppressRepeats,
        true,
    );

    let first = h.poll.run_cycle().await;
    let second = h.poll.run_cycle().await;

    assert!(first.error.is_some());
    assert!(second.error.is_none());
    assert_eq!(h.poll.watermark(), 1700000100);
}

#[tokio::test(start_paused = true)]
async fn test_run_sleeps_between_cycles() {
    let (source, calls) = ScriptedSource::new(vec![
        Ok(json!({"homeworks": [], "current_date": 1700000100})),
        Ok(json!({"homeworks": [], "current_date": 1700000200})),
    ]);
    let (notifier, _sent) = MockNotifier::new(false);
    let poll = PollLoop::new(
        Arc::new(source),
        Arc::new(notifier),
        "42".to_string(),
        Duration::from_secs(600),
        DedupPolicy::SuppressRepeats,
        START,
    );

    let handle = tokio::spawn(poll.run());

    tokio::time::sleep(Duration::from_secs(1)).await;
    assert_eq!(calls.lock().unwrap().len(), 1);

    tokio::time::sleep(Duration::from_secs(600)).await;
    assert_eq!(*calls.lock().unwrap(), vec![START, 1700000100]);

    handle.abort();
}
