use std::sync::{Arc, Mutex};
use std::time::Duration;

use rs_chat_navigator::messaging::{AckSender, DeliveryOutcome, Message, Messenger, RetryPolicy, Transport, WirePair};
use rs_chat_navigator::{Error, PairId, Result};
use serde_json::json;
use tokio::time::Instant;

/// Records posts; acknowledges from the `ack_from`-th post on and fails the
/// first `failures` posts.
#[derive(Clone, Default)]
struct ScriptedTransport {
    posts: Arc<Mutex<Vec<Message>>>,
    acks: Arc<Mutex<Option<AckSender>>>,
    ack_from: Option<usize>,
    failures: usize,
}

impl Transport for ScriptedTransport {
    fn post(&self, message: &Message) -> Result<()> {
        let mut posts = self.posts.lock().expect("lock");
        posts.push(message.clone());
        let attempt = posts.len();

        if attempt <= self.failures {
            return Err(Error::Transport("no frame".to_string()));
        }
        if self.ack_from.is_some_and(|from| attempt >= from) {
            if let Some(acks) = self.acks.lock().expect("lock").as_ref() {
                acks.acknowledge(1);
            }
        }
        Ok(())
    }
}

fn messenger(transport: ScriptedTransport) -> Messenger<ScriptedTransport> {
    let slot = Arc::clone(&transport.acks);
    let (messenger, acks) = Messenger::new(transport, RetryPolicy::default());
    *slot.lock().expect("lock") = Some(acks);
    messenger
}

/// The paused clock lands on timer deadlines, give or take a timer tick.
fn assert_elapsed(start: Instant, expected: Duration) {
    let elapsed = start.elapsed();
    assert!(
        elapsed >= expected && elapsed < expected + Duration::from_millis(50),
        "elapsed {elapsed:?}, expected {expected:?}"
    );
}

fn update() -> Message {
    Message::UpdateConversations {
        conversations: vec![WirePair {
            id: Some(PairId::Number(1)),
            question: "How do I optimize performance?".into(),
            answer: "Use memoization.".into(),
            timestamp: "2025-09-06T10:00:00.000Z".into(),
        }],
        timestamp: 1_757_152_800_000,
        source: "ai-chat-navigator".into(),
    }
}

#[tokio::test(start_paused = true)]
async fn acknowledged_on_first_attempt() {
    let transport = ScriptedTransport {
        ack_from: Some(1),
        ..ScriptedTransport::default()
    };
    let posts = Arc::clone(&transport.posts);
    let mut messenger = messenger(transport);

    let outcome = messenger.deliver(&update()).await;
    assert_eq!(outcome, DeliveryOutcome::Delivered { attempts: 1 });
    assert_eq!(posts.lock().expect("lock").len(), 1);
}

#[tokio::test(start_paused = true)]
async fn retries_until_acknowledged() {
    let transport = ScriptedTransport {
        ack_from: Some(3),
        ..ScriptedTransport::default()
    };
    let mut messenger = messenger(transport);

    let start = Instant::now();
    let outcome = messenger.deliver(&update()).await;
    assert_eq!(outcome, DeliveryOutcome::Delivered { attempts: 3 });
    // two unacknowledged attempts: 3 s wait + 1 s backoff each
    assert_elapsed(start, Duration::from_secs(8));
}

#[tokio::test(start_paused = true)]
async fn gives_up_after_bounded_retries() {
    let transport = ScriptedTransport::default();
    let posts = Arc::clone(&transport.posts);
    let mut messenger = messenger(transport);

    let start = Instant::now();
    let outcome = messenger.deliver(&update()).await;
    assert_eq!(outcome, DeliveryOutcome::GaveUp { attempts: 4 });
    assert_eq!(posts.lock().expect("lock").len(), 4);
    assert_elapsed(start, Duration::from_secs(4 * 3 + 3));
}

#[tokio::test(start_paused = true)]
async fn post_errors_are_retried() {
    let transport = ScriptedTransport {
        ack_from: Some(1),
        failures: 2,
        ..ScriptedTransport::default()
    };
    let mut messenger = messenger(transport);

    let outcome = messenger.deliver(&update()).await;
    assert_eq!(outcome, DeliveryOutcome::Delivered { attempts: 3 });
}

#[tokio::test(start_paused = true)]
async fn stale_acknowledgments_do_not_count() {
    let transport = ScriptedTransport::default();
    let slot = Arc::clone(&transport.acks);
    let policy = RetryPolicy {
        max_retries: 0,
        ..RetryPolicy::default()
    };
    let (mut messenger, acks) = Messenger::new(transport, policy);
    acks.acknowledge(5);
    *slot.lock().expect("lock") = None;

    let outcome = messenger.deliver(&update()).await;
    assert_eq!(outcome, DeliveryOutcome::GaveUp { attempts: 1 });
}

#[test]
fn panel_messages_decode() {
    let ack = Message::from_json(r#"{"type":"CONVERSATIONS_RECEIVED","count":2,"timestamp":1}"#).expect("ack");
    assert_eq!(ack, Message::ConversationsReceived { count: 2, timestamp: 1 });

    let scroll = Message::from_json(r#"{"type":"SCROLL_TO_CONVERSATION","conversationId":"1700000000000"}"#)
        .expect("scroll");
    assert_eq!(
        scroll,
        Message::ScrollToConversation {
            conversation_id: PairId::from("1700000000000")
        }
    );
}

#[test]
fn update_wire_format() {
    let value: serde_json::Value = serde_json::from_str(&update().to_json().expect("json")).expect("value");
    assert_eq!(
        value,
        json!({
            "type": "UPDATE_CONVERSATIONS",
            "conversations": [{
                "id": 1,
                "question": "How do I optimize performance?",
                "answer": "Use memoization.",
                "timestamp": "2025-09-06T10:00:00.000Z"
            }],
            "timestamp": 1_757_152_800_000_i64,
            "source": "ai-chat-navigator"
        })
    );
}

#[test]
fn drawer_message_round_trips() {
    let message = Message::AddConversationToDrawer {
        conversation: WirePair {
            id: Some(PairId::from("x1")),
            question: "Q".into(),
            answer: "A".into(),
            timestamp: String::new(),
        },
    };
    let decoded = Message::from_json(&message.to_json().expect("json")).expect("decode");
    assert_eq!(decoded, message);
}
