//! Re-extraction loop.
//!
//! A [`Monitor`] owns the host connection and the messenger and runs on a
//! single-threaded tokio runtime. Three triggers start a pass:
//!
//! - DOM mutations whose added markup looks like a chat message, coalesced
//!   by a [`Debouncer`];
//! - a low-frequency periodic timer;
//! - an explicit request from the host.
//!
//! Every pass parses a fresh snapshot, replaces the [`ResultStore`] content
//! wholesale and queues `UPDATE_CONVERSATIONS` when pairs were found.
//!
//! Delivery runs beside the event loop: while an update waits for its
//! acknowledgment, triggers and panel requests are still served. A newer
//! update replaces one that is still being retried.

use std::sync::{Arc, RwLock};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tokio::sync::{mpsc, watch};
use tokio::time::{interval, sleep_until, Instant, MissedTickBehavior};
use tracing::{debug, warn};

use crate::messaging::{millis, AckSender, DeliveryOutcome, Message, Messenger, RetryPolicy, Transport};
use crate::patterns::MESSAGE_HINT_SELECTOR;
use crate::result::{ExtractionResult, SourceRef};
use crate::table::{find_page_tables, DetectedTable};
use crate::{dom, extractor, site, Options, Result};

/// The page the monitor watches.
pub trait Host {
    /// Current serialized HTML of the page.
    fn snapshot(&mut self) -> String;

    /// Scroll to and highlight the element behind `target`.
    ///
    /// The host resolves `target` against its own live document; a stale
    /// reference is simply not found.
    fn highlight(&mut self, target: &SourceRef);

    /// Tables detected in the latest snapshot. Ignored by default.
    fn offer_tables(&mut self, tables: Vec<DetectedTable>) {
        let _ = tables;
    }
}

/// Reasons to run a pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Trigger {
    /// Nodes were added to the page; `added_html` is their markup.
    Mutation { added_html: String },
    /// Timer tick supplied by the host.
    Periodic,
    /// The user asked for a refresh.
    User,
}

/// Whether added markup contains something shaped like a chat message.
#[must_use]
pub fn is_relevant_mutation(added_html: &str) -> bool {
    if added_html.trim().is_empty() {
        return false;
    }
    let doc = dom::parse(added_html);
    dom::select_all(&doc, MESSAGE_HINT_SELECTOR).is_some_and(|sel| sel.exists())
}

/// Trailing-edge debounce: every touch pushes the deadline out by `window`.
#[derive(Debug, Clone)]
pub struct Debouncer {
    window: Duration,
    deadline: Option<Instant>,
}

impl Debouncer {
    #[must_use]
    pub fn new(window: Duration) -> Self {
        Self { window, deadline: None }
    }

    /// Record an event at `now`.
    pub fn touch(&mut self, now: Instant) {
        self.deadline = Some(now + self.window);
    }

    /// When the pending burst fires, if one is pending.
    #[must_use]
    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    /// Clear and report a deadline that has passed.
    pub fn take_due(&mut self, now: Instant) -> bool {
        match self.deadline {
            Some(deadline) if deadline <= now => {
                self.deadline = None;
                true
            }
            _ => false,
        }
    }
}

async fn wait_for(deadline: Option<Instant>) {
    match deadline {
        Some(deadline) => sleep_until(deadline).await,
        None => std::future::pending().await,
    }
}

/// The current extraction result, swapped whole on every pass.
#[derive(Debug, Clone, Default)]
pub struct ResultStore(Arc<RwLock<Arc<ExtractionResult>>>);

impl ResultStore {
    /// Latest result (empty before the first pass).
    #[must_use]
    pub fn current(&self) -> Arc<ExtractionResult> {
        match self.0.read() {
            Ok(guard) => Arc::clone(&guard),
            Err(poisoned) => Arc::clone(&poisoned.into_inner()),
        }
    }

    /// Replace the stored result.
    pub fn replace(&self, result: Arc<ExtractionResult>) {
        match self.0.write() {
            Ok(mut guard) => *guard = result,
            Err(poisoned) => *poisoned.into_inner() = result,
        }
    }
}

/// Timing for the monitor loop. Durations are (de)serialized as
/// milliseconds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MonitorConfig {
    /// Quiet period after the last relevant mutation.
    ///
    /// Default: 1.5 s
    #[serde(with = "millis")]
    pub debounce: Duration,

    /// Periodic pass interval.
    ///
    /// Default: 10 s
    #[serde(with = "millis")]
    pub interval: Duration,

    /// Delivery retries for `UPDATE_CONVERSATIONS`.
    pub retry: RetryPolicy,
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            debounce: Duration::from_millis(1500),
            interval: Duration::from_secs(10),
            retry: RetryPolicy::default(),
        }
    }
}

/// Host-side handle for feeding a running [`Monitor`].
///
/// Dropping every clone stops the loop.
#[derive(Debug, Clone)]
pub struct MonitorHandle {
    triggers: mpsc::UnboundedSender<Trigger>,
    inbound: mpsc::UnboundedSender<Message>,
    acks: AckSender,
}

impl MonitorHandle {
    /// Queue a trigger. `false` once the monitor has stopped.
    pub fn trigger(&self, trigger: Trigger) -> bool {
        self.triggers.send(trigger).is_ok()
    }

    /// Hand over a message from the other context.
    ///
    /// Acknowledgments go straight to the messenger so they are seen even
    /// while a delivery is in flight.
    pub fn receive(&self, message: Message) -> bool {
        match message {
            Message::ConversationsReceived { count, .. } => {
                self.acks.acknowledge(count);
                true
            }
            other => self.inbound.send(other).is_ok(),
        }
    }

    /// Decode and hand over a JSON message.
    pub fn receive_json(&self, json: &str) -> Result<bool> {
        Ok(self.receive(Message::from_json(json)?))
    }
}

/// Extraction loop over one page.
#[derive(Debug)]
pub struct Monitor<H, T> {
    host: H,
    transport: Arc<T>,
    messenger: Option<Messenger<Arc<T>>>,
    updates: watch::Sender<Option<Message>>,
    options: Options,
    config: MonitorConfig,
    store: ResultStore,
    triggers: mpsc::UnboundedReceiver<Trigger>,
    inbound: mpsc::UnboundedReceiver<Message>,
}

impl<H: Host, T: Transport> Monitor<H, T> {
    /// Build a monitor and the handle that drives it.
    #[must_use]
    pub fn new(host: H, transport: T, options: Options, config: MonitorConfig) -> (Self, MonitorHandle) {
        let transport = Arc::new(transport);
        let (messenger, acks) = Messenger::new(Arc::clone(&transport), config.retry.clone());
        let (updates, _) = watch::channel(None);
        let (trigger_tx, trigger_rx) = mpsc::unbounded_channel();
        let (inbound_tx, inbound_rx) = mpsc::unbounded_channel();

        let monitor = Self {
            host,
            transport,
            messenger: Some(messenger),
            updates,
            options,
            config,
            store: ResultStore::default(),
            triggers: trigger_rx,
            inbound: inbound_rx,
        };
        let handle = MonitorHandle {
            triggers: trigger_tx,
            inbound: inbound_tx,
            acks,
        };
        (monitor, handle)
    }

    /// Shared view of the current result.
    #[must_use]
    pub fn store(&self) -> ResultStore {
        self.store.clone()
    }

    /// Run until every [`MonitorHandle`] is dropped.
    ///
    /// The first periodic tick fires immediately, so the page is scanned
    /// once on start.
    pub async fn run(mut self) {
        let Some(messenger) = self.messenger.take() else {
            return;
        };
        let delivery = deliver_latest(messenger, self.updates.subscribe());

        tokio::select! {
            () = self.event_loop() => {}
            () = delivery => {}
        }
        debug!("monitor stopped");
    }

    async fn event_loop(&mut self) {
        let mut ticker = interval(self.config.interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        let mut debouncer = Debouncer::new(self.config.debounce);

        loop {
            let deadline = debouncer.deadline();
            tokio::select! {
                trigger = self.triggers.recv() => match trigger {
                    Some(Trigger::Mutation { added_html }) => {
                        if is_relevant_mutation(&added_html) {
                            debouncer.touch(Instant::now());
                        }
                    }
                    Some(Trigger::Periodic | Trigger::User) => self.pass(),
                    None => break,
                },
                Some(message) = self.inbound.recv() => self.handle_message(message),
                _ = ticker.tick() => self.pass(),
                () = wait_for(deadline) => {
                    if debouncer.take_due(Instant::now()) {
                        self.pass();
                    }
                }
            }
        }
    }

    /// Snapshot, extract and publish. Nothing borrowed from the parsed
    /// document outlives this call.
    fn refresh(&mut self) -> Arc<ExtractionResult> {
        let html = self.host.snapshot();
        let doc = dom::parse(&html);

        let result = Arc::new(extractor::extract_conversations(&doc, &self.options));
        self.store.replace(Arc::clone(&result));

        let profile = self.options.url.as_deref().and_then(site::profile_for_url);
        let tables = find_page_tables(&doc, profile);
        if !tables.is_empty() {
            self.host.offer_tables(tables);
        }
        result
    }

    fn pass(&mut self) {
        let result = self.refresh();
        if result.is_empty() {
            return;
        }
        self.updates.send_replace(Some(Message::update(&result.pairs)));
    }

    fn handle_message(&mut self, message: Message) {
        match message {
            Message::GetPageConversations => {
                let result = self.refresh();
                if let Err(err) = self.transport.post(&Message::page_response(&result.pairs)) {
                    warn!(error = %err, "page conversations response failed");
                }
            }
            Message::ScrollToConversation { conversation_id } => {
                let current = self.store.current();
                match current.find(&conversation_id) {
                    Some(pair) => self.host.highlight(&pair.question_ref),
                    None => debug!(id = %conversation_id, "scroll target not in current result"),
                }
            }
            Message::ConversationsReceived { count, .. } => {
                debug!(count, "acknowledgment outside a delivery");
            }
            other => debug!(message = ?other, "ignoring panel-side message"),
        }
    }
}

/// Deliver the newest queued update; a newer one cancels the retries of
/// the previous. Returns when the sending side is gone.
async fn deliver_latest<T: Transport>(mut messenger: Messenger<T>, mut updates: watch::Receiver<Option<Message>>) {
    while updates.changed().await.is_ok() {
        loop {
            let Some(message) = updates.borrow_and_update().clone() else {
                break;
            };
            tokio::select! {
                outcome = messenger.deliver(&message) => {
                    match outcome {
                        DeliveryOutcome::Delivered { attempts } => debug!(attempts, "update delivered"),
                        DeliveryOutcome::GaveUp { attempts } => warn!(attempts, "update not acknowledged"),
                    }
                    break;
                }
                changed = updates.changed() => {
                    if changed.is_err() {
                        return;
                    }
                    debug!("pending update superseded");
                }
            }
        }
    }
}
