//! Select widget state - open/closed, focus, filter text, async bookkeeping

use serde_json::Value;

use super::items_list::ItemsList;
use super::option::SelectOption;
use crate::config::{ConfigError, DropdownPosition, SelectConfig, SelectHooks};
use crate::events::{Outbox, SelectEvent};
use crate::key_buffer::KeyBuffer;

/// Why the dropdown is closing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CloseReason {
    Escape,
    Tab,
    ClickOutside,
    /// Programmatic close, arrow glyph, or toggle
    Explicit,
    /// A selection was committed with `close_on_select`
    Selection,
    /// The widget was disabled while open
    Disabled,
}

impl CloseReason {
    /// Whether leftover free text is committed as a tag on this close
    pub fn commits_tag(self) -> bool {
        !matches!(
            self,
            CloseReason::Tab | CloseReason::Selection | CloseReason::Disabled
        )
    }
}

/// The complete state of one select widget
#[derive(Debug)]
pub struct SelectModel {
    pub(crate) items: ItemsList,
    pub(crate) is_open: bool,
    pub(crate) is_disabled: bool,
    pub(crate) focused: bool,
    pub(crate) touched: bool,
    /// Live text of the filter input
    pub(crate) filter_value: Option<String>,
    /// An external search request is outstanding
    pub(crate) loading: bool,
    pub(crate) key_buffer: KeyBuffer,
    /// Latest deferred tag request; older completions are dropped
    pub(crate) tag_request: u64,
    /// Latest type-ahead request; older results are dropped
    pub(crate) typeahead_generation: u64,
    pub(crate) scrolled_to_end_fired: bool,
    pub(crate) placement: DropdownPosition,
    pub(crate) destroyed: bool,
    pub(crate) outbox: Outbox,
}

impl SelectModel {
    /// Create a select with an empty pool, validating the configuration
    pub fn new(config: SelectConfig, hooks: SelectHooks) -> Result<Self, ConfigError> {
        config.validate()?;
        let key_buffer = KeyBuffer::new(config.key_debounce_ms);
        let placement = config.dropdown_position;
        Ok(Self {
            items: ItemsList::new(config, hooks),
            is_open: false,
            is_disabled: false,
            focused: false,
            touched: false,
            filter_value: None,
            loading: false,
            key_buffer,
            tag_request: 0,
            typeahead_generation: 0,
            scrolled_to_end_fired: false,
            placement,
            destroyed: false,
            outbox: Outbox::new(),
        })
    }

    /// Create a select and load its initial pool
    pub fn with_items(
        config: SelectConfig,
        hooks: SelectHooks,
        raw_items: Vec<Value>,
    ) -> Result<Self, ConfigError> {
        let mut model = Self::new(config, hooks)?;
        model.items.set_items(raw_items);
        Ok(model)
    }

    pub fn config(&self) -> &SelectConfig {
        self.items.config()
    }

    /// Read-only view of the selection engine
    pub fn items(&self) -> &ItemsList {
        &self.items
    }

    pub fn is_open(&self) -> bool {
        self.is_open
    }

    pub fn is_disabled(&self) -> bool {
        self.is_disabled
    }

    pub fn is_focused(&self) -> bool {
        self.focused
    }

    pub fn is_touched(&self) -> bool {
        self.touched
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn is_destroyed(&self) -> bool {
        self.destroyed
    }

    pub fn placement(&self) -> DropdownPosition {
        self.placement
    }

    pub fn filter_value(&self) -> Option<&str> {
        self.filter_value.as_deref()
    }

    /// Non-empty filter text in a searchable select
    pub fn is_filtered(&self) -> bool {
        self.filter_value.is_some() && self.config().searchable
    }

    /// The "add tag" row is the keyboard target: it is shown and no option is marked
    pub fn is_tag_highlighted(&self) -> bool {
        self.show_add_tag() && self.items.marked_index().is_none()
    }

    pub fn key_buffer(&self) -> &KeyBuffer {
        &self.key_buffer
    }

    pub fn has_value(&self) -> bool {
        self.items.has_selection()
    }

    pub fn selected_items(&self) -> Vec<&SelectOption> {
        self.items.selected_items()
    }

    pub fn selected_values(&self) -> Vec<Value> {
        self.items
            .selected_items()
            .into_iter()
            .map(|option| option.value.clone())
            .collect()
    }

    pub fn selected_labels(&self) -> Vec<String> {
        self.items
            .selected_items()
            .into_iter()
            .map(|option| option.label.clone())
            .collect()
    }

    pub fn marked_item(&self) -> Option<&SelectOption> {
        self.items.marked_item()
    }

    // ========================================================================
    // View queries
    // ========================================================================

    /// Show the "clear all" glyph
    pub fn show_clear(&self) -> bool {
        let config = self.config();
        config.clearable && (self.has_value() || self.filter_value.is_some()) && !self.is_disabled
    }

    /// Show the "add tag" row for the current filter text
    pub fn show_add_tag(&self) -> bool {
        let config = self.config();
        let Some(term) = self.filter_value.as_deref() else {
            return false;
        };
        config.add_tag && !config.read_only && !self.loading && !self.items.has_label(term)
    }

    /// Show the "no items found" message
    pub fn show_no_items_found(&self) -> bool {
        let empty = self.items.filtered_len() == 0;
        let typeahead = self.config().typeahead;
        let searched = !typeahead || self.filter_value.is_some();
        empty && searched && !self.loading && !self.show_add_tag()
    }

    /// Show the "type to search" hint of an external search with no term yet
    pub fn show_type_to_search(&self) -> bool {
        self.items.filtered_len() == 0
            && self.config().typeahead
            && self.filter_value.is_none()
            && !self.loading
    }

    // ========================================================================
    // Notifications
    // ========================================================================

    /// Events queued since the last drain
    pub fn events(&self) -> &[SelectEvent] {
        self.outbox.events()
    }

    /// Take all queued events
    pub fn take_events(&mut self) -> Vec<SelectEvent> {
        self.outbox.drain()
    }
}
