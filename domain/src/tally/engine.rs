//! Sans-IO aggregation core.
//!
//! [`Tally`] owns every endpoint's state machine and the shared
//! [`ContributorSet`]. It performs no I/O: the caller feeds it
//! [`EndpointEvent`]s in arrival order and carries out the returned
//! [`Effect`]s (closing a connection, writing the display sink).
//!
//! Rules:
//! - only frames whose label matches ours are considered
//! - an endpoint's `Done` transition is terminal; later events are dropped
//! - every `Done` transition publishes the current size, unless the set is empty

use super::contributors::ContributorSet;
use super::report::{EndpointReport, FetchReport};
use super::state::{DoneReason, EndpointState, EndpointTracker};
use crate::core::target::QueryTarget;
use crate::protocol::{RelayMessage, SubscriptionLabel};

/// Something that happened on one endpoint
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EndpointEvent {
    /// Connection established and REQ sent
    Opened,
    /// A text frame arrived
    Message(String),
    /// The connection could not be opened
    ConnectFailed(String),
    /// The open connection failed
    Error(String),
    /// The relay ended the stream
    Closed,
    /// The endpoint timeout fired
    TimedOut,
}

/// Action the driver must perform after applying an event
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Effect {
    /// Close this endpoint's connection
    Close(usize),
    /// Write this count to the display sink
    Publish(usize),
}

/// Aggregation state for one fetch
#[derive(Debug, Clone)]
pub struct Tally {
    subject: String,
    label: SubscriptionLabel,
    endpoints: Vec<EndpointTracker>,
    contributors: ContributorSet,
    done: usize,
    published: Option<usize>,
}

impl Tally {
    pub fn new(target: &QueryTarget, label: SubscriptionLabel) -> Self {
        Self {
            subject: target.subject().to_string(),
            label,
            endpoints: target
                .endpoints()
                .iter()
                .cloned()
                .map(EndpointTracker::new)
                .collect(),
            contributors: ContributorSet::new(),
            done: 0,
            published: None,
        }
    }

    /// Dispatch one event to the matching handler
    pub fn apply(&mut self, idx: usize, event: EndpointEvent) -> Vec<Effect> {
        match event {
            EndpointEvent::Opened => self.on_opened(idx),
            EndpointEvent::Message(text) => self.on_message(idx, &text),
            EndpointEvent::ConnectFailed(e) => {
                self.finish(idx, DoneReason::ConnectFailed, Some(e), false)
            }
            EndpointEvent::Error(e) => self.finish(idx, DoneReason::ConnectionError, Some(e), false),
            EndpointEvent::Closed => self.finish(idx, DoneReason::Closed, None, false),
            EndpointEvent::TimedOut => self.finish(idx, DoneReason::TimedOut, None, true),
        }
    }

    pub fn on_opened(&mut self, idx: usize) -> Vec<Effect> {
        if let Some(tracker) = self.endpoints.get_mut(idx) {
            tracker.open();
        }
        Vec::new()
    }

    /// Handle one inbound text frame. Unparseable frames are dropped.
    pub fn on_message(&mut self, idx: usize, text: &str) -> Vec<Effect> {
        let Some(tracker) = self.endpoints.get(idx) else {
            return Vec::new();
        };
        if tracker.is_done() {
            return Vec::new();
        }

        let Ok(message) = RelayMessage::parse(text) else {
            return Vec::new();
        };

        match message {
            RelayMessage::Event { label, author } if self.label.matches(&label) => {
                self.on_event(idx, author);
                Vec::new()
            }
            RelayMessage::EndOfStoredEvents { label } if self.label.matches(&label) => {
                self.finish(idx, DoneReason::EndOfStoredEvents, None, true)
            }
            _ => Vec::new(),
        }
    }

    fn on_event(&mut self, idx: usize, author: String) {
        let awaiting = self
            .endpoints
            .get(idx)
            .is_some_and(|t| t.state() == EndpointState::AwaitingResults);
        if !awaiting {
            return;
        }
        let was_new = self.contributors.insert(author);
        if let Some(tracker) = self.endpoints.get_mut(idx) {
            tracker.record_event(was_new);
        }
    }

    /// Mark an endpoint done. `close` asks the driver to shut the connection,
    /// which only makes sense when the connection may still be open.
    fn finish(
        &mut self,
        idx: usize,
        reason: DoneReason,
        detail: Option<String>,
        close: bool,
    ) -> Vec<Effect> {
        let Some(tracker) = self.endpoints.get_mut(idx) else {
            return Vec::new();
        };
        if !tracker.finish(reason, detail) {
            return Vec::new();
        }
        self.done += 1;

        let mut effects = Vec::new();
        if close {
            effects.push(Effect::Close(idx));
        }
        if !self.contributors.is_empty() {
            let count = self.contributors.len();
            debug_assert!(self.published.is_none_or(|prev| prev <= count));
            self.published = Some(count);
            effects.push(Effect::Publish(count));
        }
        effects
    }

    pub fn subject(&self) -> &str {
        &self.subject
    }

    /// Distinct contributors so far
    pub fn count(&self) -> usize {
        self.contributors.len()
    }

    pub fn contributors(&self) -> &ContributorSet {
        &self.contributors
    }

    /// Last published count
    pub fn published(&self) -> Option<usize> {
        self.published
    }

    pub fn done_count(&self) -> usize {
        self.done
    }

    pub fn endpoint_count(&self) -> usize {
        self.endpoints.len()
    }

    pub fn tracker(&self, idx: usize) -> Option<&EndpointTracker> {
        self.endpoints.get(idx)
    }

    /// True once every endpoint is done (immediately, with zero endpoints)
    pub fn is_complete(&self) -> bool {
        self.done == self.endpoints.len()
    }

    pub fn report(&self) -> FetchReport {
        FetchReport {
            subject: self.subject.clone(),
            label: self.label.to_string(),
            count: self.contributors.len(),
            published: self.published,
            endpoints: self
                .endpoints
                .iter()
                .map(|t| EndpointReport {
                    endpoint: t.endpoint().clone(),
                    outcome: t.done_reason(),
                    events: t.events(),
                    contributed: t.contributed(),
                    detail: t.detail().map(str::to_string),
                })
                .collect(),
        }
    }
}
