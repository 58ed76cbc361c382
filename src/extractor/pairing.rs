//! Pairing engine.
//!
//! Turns an ordered stream of classified fragments into question/answer
//! pairs with a two-state machine:
//!
//! | state              | User fragment       | Assistant fragment  |
//! |--------------------|---------------------|---------------------|
//! | `AwaitingQuestion` | store, await answer | ignored             |
//! | `AwaitingAnswer`   | replace pending     | emit pair           |
//!
//! `Unknown` fragments are ignored in both states and a pending question at
//! the end of the stream is dropped.

use chrono::{DateTime, Utc};

use crate::normalize::char_prefix;
use crate::result::{ConversationPair, PairId, SourceRef};
use crate::role::Role;

/// One message-candidate element's sanitized text and location.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fragment {
    /// Sanitized, non-empty text.
    pub text: String,
    /// Where the fragment came from.
    pub source: SourceRef,
}

impl Fragment {
    /// Fragment without a source location.
    #[must_use]
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            source: SourceRef::default(),
        }
    }
}

#[derive(Debug)]
enum State {
    AwaitingQuestion,
    AwaitingAnswer(Fragment),
}

/// Two-state pairing machine with prefix de-duplication.
#[derive(Debug)]
pub struct PairingEngine {
    state: State,
    pairs: Vec<ConversationPair>,
    dedup_prefix_len: usize,
    timestamp: DateTime<Utc>,
    duplicates: usize,
}

impl PairingEngine {
    /// New engine; every emitted pair is stamped with `timestamp`.
    #[must_use]
    pub fn new(dedup_prefix_len: usize, timestamp: DateTime<Utc>) -> Self {
        Self {
            state: State::AwaitingQuestion,
            pairs: Vec::new(),
            dedup_prefix_len,
            timestamp,
            duplicates: 0,
        }
    }

    /// Whether a question is pending (drives the classifier's continuation rule).
    #[must_use]
    pub fn awaiting_answer(&self) -> bool {
        matches!(self.state, State::AwaitingAnswer(_))
    }

    /// Number of pairs discarded as duplicates so far.
    #[must_use]
    pub fn duplicates(&self) -> usize {
        self.duplicates
    }

    /// Feed the next fragment in document order.
    pub fn push(&mut self, fragment: Fragment, role: Role) {
        if fragment.text.trim().is_empty() {
            return;
        }

        match role {
            Role::User => self.state = State::AwaitingAnswer(fragment),
            Role::Assistant => {
                if let State::AwaitingAnswer(question) =
                    std::mem::replace(&mut self.state, State::AwaitingQuestion)
                {
                    self.emit(question, fragment);
                }
            }
            Role::Unknown => {}
        }
    }

    /// Completed pairs in discovery order; a trailing question is dropped.
    #[must_use]
    pub fn finish(self) -> Vec<ConversationPair> {
        self.pairs
    }

    fn emit(&mut self, question: Fragment, answer: Fragment) {
        if self.is_duplicate(&question.text, &answer.text) {
            self.duplicates += 1;
            return;
        }

        let id = PairId::Number(self.pairs.len() as u64 + 1);
        self.pairs.push(ConversationPair {
            id,
            question: question.text.trim().to_string(),
            answer: answer.text.trim().to_string(),
            timestamp: self.timestamp,
            question_ref: question.source,
            answer_ref: answer.source,
        });
    }

    fn is_duplicate(&self, question: &str, answer: &str) -> bool {
        let n = self.dedup_prefix_len;
        let (q, a) = (char_prefix(question, n), char_prefix(answer, n));
        self.pairs
            .iter()
            .any(|p| char_prefix(&p.question, n) == q && char_prefix(&p.answer, n) == a)
    }
}
