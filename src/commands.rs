//! Command types for the Elm-style architecture
//!
//! Commands represent side effects that should be performed after an update.
//! `update` never sleeps, spawns or touches the host directly; it returns a
//! `Cmd` and the runtime carries it out.

use crate::config::TagJob;

/// Delay before focusing the filter input, so focus is not stolen mid-event
pub const FOCUS_DELAY_MS: u64 = 5;

#[derive(Debug, Default)]
pub enum Cmd {
    /// No command - do nothing
    #[default]
    None,
    /// Request a full redraw
    Redraw,
    /// Execute multiple commands
    Batch(Vec<Cmd>),

    // === Collaborator Commands ===
    /// Focus the filter input after a short delay
    FocusInput { delay_ms: u64 },
    /// Remove focus from the filter input
    BlurInput,
    /// Scroll the option at this filtered index into view
    ScrollIntoView { index: usize },
    /// Scroll the "add tag" row into view
    ScrollToTag,
    /// Recompute the dropdown placement
    UpdatePlacement,

    // === Async Commands ===
    /// Start the key buffer idle timer
    /// After delay_ms, sends SelectMsg::KeyBufferFlush
    DebouncedKeyFlush { generation: u64, delay_ms: u64 },
    /// Run a deferred tag job in the background
    /// Sends SelectMsg::TagResolved when done
    ResolveTag { request: u64, job: TagJob },
    /// Ask the external search for items matching `term`
    /// The host answers with SelectMsg::TypeaheadResults
    Typeahead { generation: u64, term: Option<String> },
}

impl Cmd {
    /// Combine commands, dropping `Cmd::None`; `None` if nothing is left
    pub fn merge(cmds: Vec<Cmd>) -> Option<Cmd> {
        let mut cmds: Vec<Cmd> = cmds
            .into_iter()
            .filter(|cmd| !matches!(cmd, Cmd::None))
            .collect();
        match cmds.len() {
            0 => None,
            1 => cmds.pop(),
            _ => Some(Cmd::Batch(cmds)),
        }
    }

    /// Combine the optional commands of several steps
    pub fn join(cmds: impl IntoIterator<Item = Option<Cmd>>) -> Option<Cmd> {
        Cmd::merge(cmds.into_iter().flatten().collect())
    }

    /// Flatten nested batches into a plain list, dropping `Cmd::None`
    pub fn flatten(self) -> Vec<Cmd> {
        match self {
            Cmd::Batch(cmds) => cmds.into_iter().flat_map(Cmd::flatten).collect(),
            Cmd::None => Vec::new(),
            cmd => vec![cmd],
        }
    }
}
