//! Outward notifications
//!
//! The update loop queues `SelectEvent`s in an [`Outbox`]; the host drains
//! them after each update. Within one transition an identical event is
//! queued at most once.

use serde::Serialize;
use serde_json::Value;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "event", content = "payload", rename_all = "snake_case")]
pub enum SelectEvent {
    Opened,
    Closed,
    Focused,
    Blurred,
    /// The control was interacted with (form "touched" state)
    Touched,
    /// Selected item(s): an array in multi mode, the item or null otherwise
    Changed(Value),
    /// Value pushed to the bound form (after `bind_value` resolution)
    ModelChanged(Value),
    /// Label(s) of the current selection
    Searched(Value),
    Cleared,
    /// An item was added to a multi-select
    ItemAdded(Value),
    /// A free-text tag was committed
    TagAdded(Value),
    ItemRemoved(Value),
    EnterPressed,
    ScrolledToEnd { start: usize, end: usize },
}

/// Events queued by `update`, held until drained
///
/// Without a `Runtime`, callers must drain it through `SelectModel::take_events`.
#[derive(Debug, Clone, Default)]
pub struct Outbox {
    events: Vec<SelectEvent>,
    transition_start: usize,
}

impl Outbox {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a new logical transition (one handled message)
    pub fn begin_transition(&mut self) {
        self.transition_start = self.events.len();
    }

    /// Queue an event unless the current transition already queued it
    pub fn emit(&mut self, event: SelectEvent) {
        if self.events[self.transition_start..].contains(&event) {
            tracing::trace!(?event, "duplicate event suppressed");
            return;
        }
        tracing::debug!(?event, "emit");
        self.events.push(event);
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn events(&self) -> &[SelectEvent] {
        &self.events
    }

    /// Take all queued events
    pub fn drain(&mut self) -> Vec<SelectEvent> {
        self.transition_start = 0;
        std::mem::take(&mut self.events)
    }
}
