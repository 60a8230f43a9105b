//! Runtime - executes commands against a host
//!
//! `update` only describes side effects. The runtime performs them: host
//! calls happen inline, timers and deferred tag jobs run on spawned threads
//! and report back through a channel as messages, which [`Runtime::pump`]
//! feeds into `update`.

use std::sync::mpsc::{self, Receiver, RecvTimeoutError, Sender};
use std::thread;
use std::time::{Duration, Instant};

use serde_json::Value;

use crate::commands::Cmd;
use crate::config::DropdownPosition;
use crate::events::SelectEvent;
use crate::messages::SelectMsg;
use crate::model::SelectModel;
use crate::update::update;

/// The widget's collaborators: input element, scroll container, positioning, search
///
/// Every method has a no-op default so hosts implement only what they render.
pub trait Host {
    /// Move keyboard focus to the filter input; return true if focus landed
    fn focus_input(&mut self) -> bool {
        true
    }

    /// Remove focus from the filter input; return true if focus left
    fn blur_input(&mut self) -> bool {
        true
    }

    fn scroll_into_view(&mut self, _index: usize) {}

    fn scroll_to_tag(&mut self) {}

    /// Resolve the panel placement; `Auto` must become `Top` or `Bottom`
    fn compute_dropdown_placement(&mut self, preferred: DropdownPosition) -> DropdownPosition {
        match preferred {
            DropdownPosition::Auto => DropdownPosition::Bottom,
            other => other,
        }
    }

    /// External search for `term`
    ///
    /// Return the results directly, or None and answer later through
    /// [`Runtime::sender`] with `SelectMsg::TypeaheadResults` carrying `generation`.
    fn typeahead(&mut self, _generation: u64, _term: Option<&str>) -> Option<Vec<Value>> {
        None
    }

    fn redraw(&mut self, _model: &SelectModel) {}

    /// Receive one notification; the runtime drains the outbox after every message
    fn notify(&mut self, _event: SelectEvent) {}
}

enum Inbound {
    Msg(SelectMsg),
    /// Deferred focus timer elapsed
    Focus,
}

/// Handle for delivering messages from other threads
#[derive(Clone)]
pub struct MsgSender(Sender<Inbound>);

impl MsgSender {
    /// Queue a message; returns false once the runtime is gone
    pub fn send(&self, msg: SelectMsg) -> bool {
        self.0.send(Inbound::Msg(msg)).is_ok()
    }
}

pub struct Runtime<H: Host> {
    model: SelectModel,
    host: H,
    msg_tx: Sender<Inbound>,
    msg_rx: Receiver<Inbound>,
}

impl<H: Host> Runtime<H> {
    pub fn new(model: SelectModel, host: H) -> Self {
        let (msg_tx, msg_rx) = mpsc::channel();
        Self {
            model,
            host,
            msg_tx,
            msg_rx,
        }
    }

    pub fn model(&self) -> &SelectModel {
        &self.model
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }

    pub fn sender(&self) -> MsgSender {
        MsgSender(self.msg_tx.clone())
    }

    /// Run one message through `update`, deliver its events, then execute the resulting command
    pub fn dispatch(&mut self, msg: SelectMsg) {
        let cmd = update(&mut self.model, msg);
        for event in self.model.take_events() {
            self.host.notify(event);
        }
        if let Some(cmd) = cmd {
            self.process_cmd(cmd);
        }
    }

    fn process_cmd(&mut self, cmd: Cmd) {
        match cmd {
            Cmd::None => {}
            Cmd::Redraw => self.host.redraw(&self.model),
            Cmd::Batch(cmds) => {
                for cmd in cmds.into_iter().flat_map(Cmd::flatten) {
                    self.process_cmd(cmd);
                }
            }

            Cmd::FocusInput { delay_ms } => {
                let tx = self.msg_tx.clone();
                thread::spawn(move || {
                    thread::sleep(Duration::from_millis(delay_ms));
                    let _ = tx.send(Inbound::Focus);
                });
            }
            Cmd::BlurInput => {
                if self.model.is_focused() && self.host.blur_input() {
                    self.dispatch(SelectMsg::InputBlur);
                }
            }
            Cmd::ScrollIntoView { index } => self.host.scroll_into_view(index),
            Cmd::ScrollToTag => self.host.scroll_to_tag(),
            Cmd::UpdatePlacement => {
                let preferred = self.model.config().dropdown_position;
                let placement = self.host.compute_dropdown_placement(preferred);
                self.dispatch(SelectMsg::PlacementResolved(placement));
            }

            Cmd::DebouncedKeyFlush {
                generation,
                delay_ms,
            } => {
                let tx = self.msg_tx.clone();
                thread::spawn(move || {
                    thread::sleep(Duration::from_millis(delay_ms));
                    let _ = tx.send(Inbound::Msg(SelectMsg::KeyBufferFlush { generation }));
                });
            }
            Cmd::ResolveTag { request, job } => {
                let tx = self.msg_tx.clone();
                thread::spawn(move || {
                    let result = job.run().map_err(|e| format!("{:#}", e));
                    let _ = tx.send(Inbound::Msg(SelectMsg::TagResolved { request, result }));
                });
            }
            Cmd::Typeahead { generation, term } => {
                if let Some(items) = self.host.typeahead(generation, term.as_deref()) {
                    self.dispatch(SelectMsg::TypeaheadResults { generation, items });
                }
            }
        }
    }

    fn handle_inbound(&mut self, inbound: Inbound) {
        match inbound {
            Inbound::Msg(msg) => self.dispatch(msg),
            Inbound::Focus => {
                if self.model.is_destroyed() || self.model.is_focused() {
                    return;
                }
                if self.host.focus_input() {
                    self.dispatch(SelectMsg::InputFocus);
                }
            }
        }
    }

    /// Process every async completion that has already arrived
    ///
    /// Returns the number of messages handled.
    pub fn pump(&mut self) -> usize {
        let mut handled = 0;
        while let Ok(inbound) = self.msg_rx.try_recv() {
            self.handle_inbound(inbound);
            handled += 1;
        }
        handled
    }

    /// Process async completions as they arrive, for up to `timeout`
    pub fn pump_for(&mut self, timeout: Duration) -> usize {
        let deadline = Instant::now() + timeout;
        let mut handled = 0;
        loop {
            let remaining = deadline.saturating_duration_since(Instant::now());
            match self.msg_rx.recv_timeout(remaining) {
                Ok(inbound) => {
                    self.handle_inbound(inbound);
                    handled += 1;
                }
                Err(RecvTimeoutError::Timeout) | Err(RecvTimeoutError::Disconnected) => {
                    return handled;
                }
            }
        }
    }

    /// Destroy the widget; pending timers and jobs become no-ops
    pub fn shutdown(&mut self) {
        if !self.model.is_destroyed() {
            self.dispatch(SelectMsg::Destroy);
        }
    }
}

impl<H: Host> Drop for Runtime<H> {
    fn drop(&mut self) {
        self.shutdown();
    }
}
