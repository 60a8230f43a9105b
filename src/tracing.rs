//! Tracing setup and state snapshots for diagnostics
//!
//! Configure via RUST_LOG environment variable:
//! - `RUST_LOG=debug` - all debug logs
//! - `RUST_LOG=picklist::update=trace` - state diffs for every message
//! - `RUST_LOG=picklist::model::items_list=debug` - engine rebuilds only
//!
//! Logs are also written to `~/.config/picklist/logs/picklist.log` with daily rotation.

use serde::Serialize;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

use crate::config_paths::LOG_FILE_NAME;
use crate::model::SelectModel;

/// Initialize tracing subscriber with console and file logging
///
/// Console output respects RUST_LOG (default `warn`); the file layer logs at debug.
/// Calling this twice is harmless: the second install attempt is ignored.
pub fn init() {
    let console_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    let console_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_line_number(true)
        .with_filter(console_filter);

    let file_layer = match crate::config_paths::ensure_logs_dir() {
        Ok(logs_dir) => {
            let file_appender = tracing_appender::rolling::daily(logs_dir, LOG_FILE_NAME);
            Some(
                fmt::layer()
                    .with_writer(file_appender)
                    .with_ansi(false)
                    .with_target(true)
                    .with_line_number(true)
                    .with_filter(EnvFilter::new("debug")),
            )
        }
        Err(e) => {
            eprintln!("Warning: Could not initialize file logging: {}", e);
            None
        }
    };

    let _ = tracing_subscriber::registry()
        .with(console_layer)
        .with(file_layer)
        .try_init();
}

/// Lightweight snapshot of the widget state for diffing
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SelectionSnapshot {
    pub open: bool,
    pub focused: bool,
    pub disabled: bool,
    pub loading: bool,
    pub filter: Option<String>,
    pub marked: Option<usize>,
    pub tag_highlighted: bool,
    pub visible: usize,
    pub selected: Vec<String>,
}

impl SelectionSnapshot {
    pub fn from_model(model: &SelectModel) -> Self {
        Self {
            open: model.is_open(),
            focused: model.is_focused(),
            disabled: model.is_disabled(),
            loading: model.is_loading(),
            filter: model.filter_value().map(str::to_string),
            marked: model.items().marked_index(),
            tag_highlighted: model.is_tag_highlighted(),
            visible: model.items().filtered_len(),
            selected: model.selected_labels(),
        }
    }

    /// Generate a diff description between two snapshots
    pub fn diff(&self, other: &SelectionSnapshot) -> Option<String> {
        let mut changes = Vec::new();
        if self.open != other.open {
            changes.push(if other.open { "opened" } else { "closed" }.to_string());
        }
        if self.focused != other.focused {
            changes.push(if other.focused { "focused" } else { "blurred" }.to_string());
        }
        if self.disabled != other.disabled {
            changes.push(format!("disabled: {}", other.disabled));
        }
        if self.loading != other.loading {
            changes.push(format!("loading: {}", other.loading));
        }
        if self.filter != other.filter {
            changes.push(format!("filter: {:?} → {:?}", self.filter, other.filter));
        }
        if self.marked != other.marked {
            changes.push(format!("marked: {:?} → {:?}", self.marked, other.marked));
        }
        if self.tag_highlighted != other.tag_highlighted {
            changes.push(format!("tag row: {}", other.tag_highlighted));
        }
        if self.visible != other.visible {
            changes.push(format!("visible: {} → {}", self.visible, other.visible));
        }
        if self.selected != other.selected {
            changes.push(format!("selected: {:?} → {:?}", self.selected, other.selected));
        }

        if changes.is_empty() {
            None
        } else {
            Some(changes.join("; "))
        }
    }
}
