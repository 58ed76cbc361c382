//! Cross-context message protocol.
//!
//! The page side and the panel side exchange JSON objects tagged by a `type`
//! field. Delivery is fire-and-forget: [`Messenger::deliver`] posts a
//! message, waits for a `CONVERSATIONS_RECEIVED` acknowledgment and retries a
//! bounded number of times before giving up with a warning.

use std::sync::Arc;
use std::time::Duration;

use chrono::{SecondsFormat, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use tokio::sync::mpsc;
use tokio::time::{sleep, timeout};
use tracing::{debug, warn};

use crate::normalize::sanitize_text;
use crate::result::{ConversationPair, PairId};
use crate::Result;

/// Value of `source` on outgoing updates.
pub const MESSAGE_SOURCE: &str = "ai-chat-navigator";

/// A conversation pair as it travels over the channel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WirePair {
    /// Absent in page-conversation responses.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<PairId>,
    /// User text.
    pub question: String,
    /// Assistant text.
    pub answer: String,
    /// RFC 3339 extraction time.
    #[serde(default)]
    pub timestamp: String,
}

impl WirePair {
    /// Sanitize both texts; `None` when either becomes empty.
    #[must_use]
    pub fn sanitized(self) -> Option<Self> {
        Some(Self {
            question: sanitize_text(&self.question)?,
            answer: sanitize_text(&self.answer)?,
            ..self
        })
    }
}

impl From<&ConversationPair> for WirePair {
    fn from(pair: &ConversationPair) -> Self {
        Self {
            id: Some(pair.id.clone()),
            question: pair.question.clone(),
            answer: pair.answer.clone(),
            timestamp: pair.timestamp.to_rfc3339_opts(SecondsFormat::Millis, true),
        }
    }
}

/// Decode a conversation list, silently dropping malformed entries.
fn lenient_pairs<'de, D>(deserializer: D) -> std::result::Result<Vec<WirePair>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Vec::<serde_json::Value>::deserialize(deserializer)?;
    Ok(raw
        .into_iter()
        .filter_map(|value| serde_json::from_value::<WirePair>(value).ok())
        .filter_map(WirePair::sanitized)
        .collect())
}

/// Every message exchanged between the page and the panel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Message {
    /// Page → panel: the current extraction result.
    UpdateConversations {
        #[serde(deserialize_with = "lenient_pairs")]
        conversations: Vec<WirePair>,
        /// Milliseconds since the Unix epoch.
        timestamp: i64,
        source: String,
    },
    /// Panel → page: acknowledgment of an update.
    ConversationsReceived {
        count: usize,
        #[serde(default)]
        timestamp: i64,
    },
    /// Panel → page: request a fresh extraction.
    GetPageConversations,
    /// Page → panel: answer to `GET_PAGE_CONVERSATIONS`.
    PageConversationsResponse {
        #[serde(deserialize_with = "lenient_pairs")]
        conversations: Vec<WirePair>,
    },
    /// Panel → page: scroll to and highlight a pair.
    ScrollToConversation {
        #[serde(rename = "conversationId")]
        conversation_id: PairId,
    },
    /// Page → panel: add a single pair picked by the user.
    AddConversationToDrawer { conversation: WirePair },
}

impl Message {
    /// `UPDATE_CONVERSATIONS` for the given pairs, stamped now.
    #[must_use]
    pub fn update(pairs: &[ConversationPair]) -> Self {
        Self::UpdateConversations {
            conversations: pairs.iter().map(WirePair::from).collect(),
            timestamp: Utc::now().timestamp_millis(),
            source: MESSAGE_SOURCE.to_string(),
        }
    }

    /// `PAGE_CONVERSATIONS_RESPONSE` for the given pairs (ids omitted).
    #[must_use]
    pub fn page_response(pairs: &[ConversationPair]) -> Self {
        Self::PageConversationsResponse {
            conversations: pairs
                .iter()
                .map(|pair| WirePair {
                    id: None,
                    ..WirePair::from(pair)
                })
                .collect(),
        }
    }

    /// Encode as JSON.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    /// Decode from JSON.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }
}

/// Outbound half of the channel.
pub trait Transport {
    /// Post one message without waiting for a reply.
    fn post(&self, message: &Message) -> Result<()>;
}

impl<T: Transport + ?Sized> Transport for Arc<T> {
    fn post(&self, message: &Message) -> Result<()> {
        (**self).post(message)
    }
}

/// Serde helper storing a `Duration` as integer milliseconds.
pub(crate) mod millis {
    use std::time::Duration;

    use serde::{Deserialize, Deserializer, Serializer};

    #[allow(clippy::trivially_copy_pass_by_ref)]
    pub fn serialize<S: Serializer>(value: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u64(u64::try_from(value.as_millis()).unwrap_or(u64::MAX))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
        u64::deserialize(deserializer).map(Duration::from_millis)
    }
}

/// Bounded retry settings for [`Messenger::deliver`].
///
/// Durations are (de)serialized as milliseconds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RetryPolicy {
    /// Retries after the first attempt.
    ///
    /// Default: `3`
    pub max_retries: u32,

    /// Pause between attempts.
    ///
    /// Default: 1 s
    #[serde(with = "millis")]
    pub backoff: Duration,

    /// How long to wait for an acknowledgment after posting.
    ///
    /// Default: 3 s
    #[serde(with = "millis")]
    pub ack_timeout: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: 3,
            backoff: Duration::from_secs(1),
            ack_timeout: Duration::from_secs(3),
        }
    }
}

/// Result of one delivery.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeliveryOutcome {
    /// Acknowledged after `attempts` posts.
    Delivered { attempts: u32 },
    /// No acknowledgment after `attempts` posts.
    GaveUp { attempts: u32 },
}

/// Feeds acknowledgments to a [`Messenger`]. Cheap to clone.
#[derive(Debug, Clone)]
pub struct AckSender(mpsc::UnboundedSender<usize>);

impl AckSender {
    /// Record an acknowledgment carrying the receiver's pair count.
    pub fn acknowledge(&self, count: usize) {
        // A dropped messenger has nothing left to confirm.
        let _ = self.0.send(count);
    }
}

/// Acknowledgment-driven delivery over a [`Transport`].
#[derive(Debug)]
pub struct Messenger<T> {
    transport: T,
    acks: mpsc::UnboundedReceiver<usize>,
    policy: RetryPolicy,
}

impl<T: Transport> Messenger<T> {
    /// New messenger plus the handle that feeds it acknowledgments.
    #[must_use]
    pub fn new(transport: T, policy: RetryPolicy) -> (Self, AckSender) {
        let (tx, rx) = mpsc::unbounded_channel();
        let messenger = Self {
            transport,
            acks: rx,
            policy,
        };
        (messenger, AckSender(tx))
    }

    /// Post `message` until it is acknowledged or the retry budget is spent.
    ///
    /// Acknowledgments that arrived before an attempt are discarded so a late
    /// confirmation of an earlier update cannot satisfy this one.
    pub async fn deliver(&mut self, message: &Message) -> DeliveryOutcome {
        let mut attempts = 0;

        loop {
            attempts += 1;
            while self.acks.try_recv().is_ok() {}

            match self.transport.post(message) {
                Ok(()) => match timeout(self.policy.ack_timeout, self.acks.recv()).await {
                    Ok(Some(count)) => {
                        debug!(attempts, count, "delivery acknowledged");
                        return DeliveryOutcome::Delivered { attempts };
                    }
                    Ok(None) => debug!(attempts, "acknowledgment channel closed"),
                    Err(_) => debug!(attempts, "no acknowledgment before timeout"),
                },
                Err(err) => warn!(attempts, error = %err, "post failed"),
            }

            if attempts > self.policy.max_retries {
                warn!(attempts, "giving up on delivery");
                return DeliveryOutcome::GaveUp { attempts };
            }
            sleep(self.policy.backoff).await;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_wire_format_uses_type_tag() {
        let msg = Message::ScrollToConversation {
            conversation_id: PairId::Number(4),
        };
        let value: serde_json::Value = serde_json::from_str(&msg.to_json().expect("json")).expect("value");
        assert_eq!(value, json!({"type": "SCROLL_TO_CONVERSATION", "conversationId": 4}));

        let unit = Message::from_json(r#"{"type":"GET_PAGE_CONVERSATIONS"}"#).expect("decode");
        assert_eq!(unit, Message::GetPageConversations);
    }

    #[test]
    fn test_update_decoding_drops_malformed_entries() {
        let json = json!({
            "type": "UPDATE_CONVERSATIONS",
            "conversations": [
                {"id": 1, "question": "Q1", "answer": "A1", "timestamp": "2024-01-01T00:00:00Z"},
                {"id": 2, "question": "Q2"},
                {"id": 3, "question": "\u{200B}", "answer": "A3"},
                "garbage",
                {"id": "x7", "question": " Q4 ", "answer": "A4"}
            ],
            "timestamp": 1_700_000_000_000_i64,
            "source": "ai-chat-navigator"
        })
        .to_string();

        let Message::UpdateConversations { conversations, .. } = Message::from_json(&json).expect("decode") else {
            panic!("wrong variant");
        };
        assert_eq!(conversations.len(), 2);
        assert_eq!(conversations[1].id, Some(PairId::from("x7")));
        assert_eq!(conversations[1].question, "Q4");
    }

    #[test]
    fn test_unknown_type_is_an_error() {
        let err = Message::from_json(r#"{"type":"SOMETHING_ELSE"}"#).unwrap_err();
        assert!(matches!(err, crate::Error::Serialization(_)));
    }

    #[test]
    fn test_retry_policy_from_json() {
        let policy: RetryPolicy = serde_json::from_str(r#"{"max_retries": 5, "backoff": 250}"#).expect("policy");
        assert_eq!(policy.max_retries, 5);
        assert_eq!(policy.backoff, Duration::from_millis(250));
        assert_eq!(policy.ack_timeout, Duration::from_secs(3));
    }

    #[test]
    fn test_page_response_omits_ids() {
        let pair = ConversationPair {
            id: PairId::Number(1),
            question: "Q".into(),
            answer: "A".into(),
            timestamp: Utc::now(),
            question_ref: Default::default(),
            answer_ref: Default::default(),
        };
        let json = Message::page_response(&[pair]).to_json().expect("json");
        assert!(!json.contains("\"id\""));
        assert!(json.contains("PAGE_CONVERSATIONS_RESPONSE"));
    }
}
