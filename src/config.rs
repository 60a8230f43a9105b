//! Widget configuration
//!
//! `SelectConfig` is plain data that can live in `~/.config/picklist/config.yaml`
//! (or any YAML file). Callables that cannot be serialized live in
//! [`SelectHooks`].

use std::fmt;
use std::path::Path;
use std::sync::Arc;

use anyhow::Context;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

use crate::model::SelectOption;

/// Idle window before the type-ahead key buffer is flushed
pub const DEFAULT_KEY_DEBOUNCE_MS: u64 = 200;

/// Where the dropdown panel opens relative to the control
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DropdownPosition {
    Bottom,
    Top,
    #[default]
    Auto,
}

/// Configuration errors, reported when a widget is created
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{field} must not be empty")]
    EmptyFieldPath { field: &'static str },

    #[error("{field} has an empty segment in path '{path}'")]
    MalformedFieldPath { field: &'static str, path: String },

    #[error("max_selected_items must be at least 1")]
    ZeroMaxSelected,

    #[error("buffer_amount must be at least 1 when virtual_scroll is enabled")]
    ZeroBufferAmount,

    #[error("key_debounce_ms must be at least 1")]
    ZeroKeyDebounce,
}

/// Select widget configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SelectConfig {
    /// Dotted path of the display label inside object items
    pub label_field: String,
    /// Dotted path of the field emitted to the bound form instead of the whole item
    pub bind_value: Option<String>,
    /// Dotted path of the key used to group items under headers
    pub group_by: Option<String>,
    pub multiple: bool,
    pub clearable: bool,
    pub searchable: bool,
    pub max_selected_items: Option<usize>,
    pub close_on_select: bool,
    pub hide_selected: bool,
    /// Mark the first enabled item when the dropdown opens
    pub mark_first: bool,
    pub select_on_tab: bool,
    pub virtual_scroll: bool,
    /// Rows rendered beyond the visible range when virtual scrolling
    pub buffer_amount: usize,
    pub selectable_group: bool,
    pub clear_search_on_add: bool,
    /// Allow free text to become a tag
    pub add_tag: bool,
    /// Delegate filtering to an external search (see `Cmd::Typeahead`)
    pub typeahead: bool,
    pub read_only: bool,
    /// Put the current single selection's label into the filter on open
    pub prefill_search_on_open: bool,
    pub dropdown_position: DropdownPosition,
    pub key_debounce_ms: u64,
}

impl Default for SelectConfig {
    fn default() -> Self {
        Self {
            label_field: "label".to_string(),
            bind_value: None,
            group_by: None,
            multiple: false,
            clearable: true,
            searchable: true,
            max_selected_items: None,
            close_on_select: true,
            hide_selected: false,
            mark_first: false,
            select_on_tab: false,
            virtual_scroll: false,
            buffer_amount: 4,
            selectable_group: false,
            clear_search_on_add: true,
            add_tag: false,
            typeahead: false,
            read_only: false,
            prefill_search_on_open: false,
            dropdown_position: DropdownPosition::Auto,
            key_debounce_ms: DEFAULT_KEY_DEBOUNCE_MS,
        }
    }
}

impl SelectConfig {
    /// Single-select defaults
    pub fn single() -> Self {
        Self::default()
    }

    /// Multi-select defaults
    pub fn multiple() -> Self {
        Self {
            multiple: true,
            ..Self::default()
        }
    }

    /// Load a config from a YAML file
    pub fn load_from(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config at {}", path.display()))?;
        let config: SelectConfig = serde_yaml::from_str(&content)
            .with_context(|| format!("Failed to parse config at {}", path.display()))?;
        config.validate()?;
        tracing::info!("Loaded select config from {}", path.display());
        Ok(config)
    }

    /// Load the user config, or return defaults if absent or unreadable
    pub fn load() -> Self {
        let Some(path) = crate::config_paths::config_file() else {
            tracing::debug!("No config directory available, using defaults");
            return Self::default();
        };

        if !path.exists() {
            tracing::debug!(
                "Config file not found at {}, using defaults",
                path.display()
            );
            return Self::default();
        }

        match Self::load_from(&path) {
            Ok(config) => config,
            Err(e) => {
                tracing::warn!("{:#}", e);
                Self::default()
            }
        }
    }

    /// Check the configuration for values the engine cannot work with
    pub fn validate(&self) -> Result<(), ConfigError> {
        validate_path("label_field", Some(&self.label_field))?;
        validate_path("bind_value", self.bind_value.as_deref())?;
        validate_path("group_by", self.group_by.as_deref())?;

        if self.max_selected_items == Some(0) {
            return Err(ConfigError::ZeroMaxSelected);
        }
        if self.virtual_scroll && self.buffer_amount == 0 {
            return Err(ConfigError::ZeroBufferAmount);
        }
        if self.key_debounce_ms == 0 {
            return Err(ConfigError::ZeroKeyDebounce);
        }
        Ok(())
    }
}

fn validate_path(field: &'static str, path: Option<&str>) -> Result<(), ConfigError> {
    let Some(path) = path else {
        return Ok(());
    };
    if path.is_empty() {
        return Err(ConfigError::EmptyFieldPath { field });
    }
    if path.split('.').any(str::is_empty) {
        return Err(ConfigError::MalformedFieldPath {
            field,
            path: path.to_string(),
        });
    }
    Ok(())
}

// ============================================================================
// Hooks
// ============================================================================

/// Custom matcher: `(term, option) -> matches`
pub type SearchFn = Arc<dyn Fn(&str, &SelectOption) -> bool + Send + Sync>;

/// Custom value equality used to re-resolve selections: `(a, b) -> equal`
pub type CompareFn = Arc<dyn Fn(&Value, &Value) -> bool + Send + Sync>;

/// Custom tag builder: called with the filter text
pub type AddTagFn = Arc<dyn Fn(&str) -> TagResolution + Send + Sync>;

/// Deferred tag computation, run off the UI thread by the runtime
pub struct TagJob(Box<dyn FnOnce() -> anyhow::Result<Value> + Send>);

impl TagJob {
    pub fn new(job: impl FnOnce() -> anyhow::Result<Value> + Send + 'static) -> Self {
        Self(Box::new(job))
    }

    pub fn run(self) -> anyhow::Result<Value> {
        (self.0)()
    }
}

impl fmt::Debug for TagJob {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("TagJob(..)")
    }
}

/// What a tag builder produced for a given term
#[derive(Debug)]
pub enum TagResolution {
    /// The tag value is available now
    Ready(Value),
    /// The tag value will be produced by a background job
    Deferred(TagJob),
    /// No tag should be created
    Skip,
}

/// Callables supplied by the host
#[derive(Clone, Default)]
pub struct SelectHooks {
    pub search_fn: Option<SearchFn>,
    pub compare_with: Option<CompareFn>,
    pub add_tag_fn: Option<AddTagFn>,
}

impl SelectHooks {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_search_fn(
        mut self,
        search_fn: impl Fn(&str, &SelectOption) -> bool + Send + Sync + 'static,
    ) -> Self {
        self.search_fn = Some(Arc::new(search_fn));
        self
    }

    pub fn with_compare_with(
        mut self,
        compare_with: impl Fn(&Value, &Value) -> bool + Send + Sync + 'static,
    ) -> Self {
        self.compare_with = Some(Arc::new(compare_with));
        self
    }

    pub fn with_add_tag_fn(
        mut self,
        add_tag_fn: impl Fn(&str) -> TagResolution + Send + Sync + 'static,
    ) -> Self {
        self.add_tag_fn = Some(Arc::new(add_tag_fn));
        self
    }
}

impl fmt::Debug for SelectHooks {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SelectHooks")
            .field("search_fn", &self.search_fn.is_some())
            .field("compare_with", &self.compare_with.is_some())
            .field("add_tag_fn", &self.add_tag_fn.is_some())
            .finish()
    }
}
