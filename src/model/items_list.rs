//! Items list - the selection engine
//!
//! Owns the full option pool, the filtered view, the selection (in insertion
//! order) and the marked cursor. All state changes go through the methods
//! here so the invariants hold at the boundary:
//!
//! - `filtered` only holds positions into `items`, in ascending order
//! - every selected id resolves to an option in `items`, a detached
//!   placeholder, or the pending tag being committed
//! - `marked_index` is always a valid index into `filtered`

use std::collections::HashMap;

use serde_json::Value;

use super::option::{
    build_options, default_matches, is_primitive_pool, lookup_path, resolve_nested, OptionId,
    SelectOption,
};
use crate::config::{SelectConfig, SelectHooks};

#[derive(Debug, Clone)]
pub struct ItemsList {
    config: SelectConfig,
    hooks: SelectHooks,
    /// Source of truth, flattened (group headers precede their members)
    items: Vec<SelectOption>,
    /// Option id -> position in `items`
    positions: HashMap<OptionId, usize>,
    /// Visible positions into `items`
    filtered: Vec<usize>,
    /// Selected ids in insertion order
    selection: Vec<OptionId>,
    /// Selected options that have no counterpart in `items` (written-in values)
    detached: Vec<SelectOption>,
    /// Free-text tag awaiting commit
    pending_tag: Option<SelectOption>,
    marked_index: Option<usize>,
    filter_term: Option<String>,
    primitive: bool,
    disabled: bool,
}

impl ItemsList {
    pub fn new(config: SelectConfig, hooks: SelectHooks) -> Self {
        Self {
            config,
            hooks,
            items: Vec::new(),
            positions: HashMap::new(),
            filtered: Vec::new(),
            selection: Vec::new(),
            detached: Vec::new(),
            pending_tag: None,
            marked_index: None,
            filter_term: None,
            primitive: false,
            disabled: false,
        }
    }

    pub fn config(&self) -> &SelectConfig {
        &self.config
    }

    pub fn hooks(&self) -> &SelectHooks {
        &self.hooks
    }

    /// Disable or enable the owning widget; a disabled list ignores (un)selection
    pub fn set_disabled(&mut self, disabled: bool) {
        self.disabled = disabled;
    }

    /// Whether the current pool is made of primitives
    pub fn is_primitive(&self) -> bool {
        self.primitive
    }

    // ========================================================================
    // Queries
    // ========================================================================

    pub fn items(&self) -> &[SelectOption] {
        &self.items
    }

    pub fn filtered_items(&self) -> Vec<&SelectOption> {
        self.filtered.iter().map(|&pos| &self.items[pos]).collect()
    }

    pub fn filtered_len(&self) -> usize {
        self.filtered.len()
    }

    pub fn selected_items(&self) -> Vec<&SelectOption> {
        self.selection.iter().filter_map(|&id| self.get(id)).collect()
    }

    pub fn selected_len(&self) -> usize {
        self.selection.len()
    }

    pub fn has_selection(&self) -> bool {
        !self.selection.is_empty()
    }

    pub fn last_selected_item(&self) -> Option<&SelectOption> {
        self.selection.last().and_then(|&id| self.get(id))
    }

    pub fn pending_tag(&self) -> Option<&SelectOption> {
        self.pending_tag.as_ref()
    }

    /// Look up an option by id in the pool, the detached selections, or the pending tag
    pub fn get(&self, id: OptionId) -> Option<&SelectOption> {
        if let Some(&pos) = self.positions.get(&id) {
            return self.items.get(pos);
        }
        self.detached
            .iter()
            .chain(self.pending_tag.as_ref())
            .find(|option| option.id == id)
    }

    fn get_mut(&mut self, id: OptionId) -> Option<&mut SelectOption> {
        if let Some(&pos) = self.positions.get(&id) {
            return self.items.get_mut(pos);
        }
        self.detached
            .iter_mut()
            .chain(self.pending_tag.as_mut())
            .find(|option| option.id == id)
    }

    pub fn marked_index(&self) -> Option<usize> {
        self.marked_index
    }

    pub fn marked_item(&self) -> Option<&SelectOption> {
        self.marked_index
            .and_then(|i| self.filtered.get(i))
            .map(|&pos| &self.items[pos])
    }

    pub fn filter_term(&self) -> Option<&str> {
        self.filter_term.as_deref()
    }

    pub fn is_filtered(&self) -> bool {
        self.filter_term.is_some()
    }

    /// Nothing visible to pick and no way to create a tag instead
    pub fn no_items_to_select(&self) -> bool {
        self.filtered.is_empty() && !self.config.add_tag
    }

    /// Multi-select cap reached
    pub fn max_items_selected(&self) -> bool {
        self.config.multiple
            && self
                .config
                .max_selected_items
                .is_some_and(|max| self.selection.len() >= max)
    }

    /// Whether `term` matches an option, using the custom matcher when supplied
    pub fn matches(&self, option: &SelectOption, term: &str) -> bool {
        match &self.hooks.search_fn {
            Some(search_fn) => search_fn(term, option),
            None => default_matches(option, term),
        }
    }

    /// Whether any pool option carries exactly this label (case-insensitive)
    pub fn has_label(&self, text: &str) -> bool {
        let text = text.to_lowercase();
        self.items
            .iter()
            .any(|option| option.label.to_lowercase() == text)
    }

    /// Resolve an external value to a pool option
    ///
    /// The custom comparator wins when supplied. Otherwise, with `bind_value`,
    /// compares the bound field (group headers compare their group key),
    /// falling back to structural equality.
    pub fn find_item(&self, value: &Value) -> Option<OptionId> {
        let found = if let Some(compare_with) = &self.hooks.compare_with {
            self.items
                .iter()
                .find(|option| !option.is_group() && compare_with(&option.value, value))
        } else if let Some(path) = self.config.bind_value.as_deref() {
            self.items
                .iter()
                .find(|option| self.bound_value(option, path) == Some(value))
        } else {
            self.items.iter().find(|option| option.value == *value)
        };
        found.map(|option| option.id)
    }

    fn bound_value<'a>(&self, option: &'a SelectOption, path: &str) -> Option<&'a Value> {
        if option.is_group() {
            let group_by = self.config.group_by.as_deref()?;
            lookup_path(&option.value, group_by)
        } else {
            Some(resolve_nested(&option.value, path))
        }
    }

    /// First visible, markable option whose label starts with `term` (case-insensitive)
    pub fn find_by_label(&self, term: &str) -> Option<OptionId> {
        let term = term.to_lowercase();
        self.filtered
            .iter()
            .map(|&pos| &self.items[pos])
            .find(|option| {
                self.is_markable(option) && option.label.to_lowercase().starts_with(&term)
            })
            .map(|option| option.id)
    }

    // ========================================================================
    // Pool
    // ========================================================================

    /// Replace the whole pool, re-resolving the current selection against it
    pub fn set_items(&mut self, raw_items: Vec<Value>) {
        let previous: Vec<SelectOption> = self.selected_items().into_iter().cloned().collect();

        self.primitive = is_primitive_pool(&raw_items);
        self.items = build_options(
            raw_items,
            &self.config.label_field,
            self.config.group_by.as_deref(),
        );
        self.rebuild_positions();
        self.selection.clear();
        self.detached.clear();
        self.pending_tag = None;
        self.marked_index = None;
        self.filter_term = None;

        for mut old in previous {
            let key = match self.config.bind_value.as_deref() {
                Some(path) if self.hooks.compare_with.is_none() => {
                    self.bound_value(&old, path).cloned()
                }
                _ => Some(old.value.clone()),
            };
            match key.and_then(|key| self.find_item(&key)) {
                Some(id) => {
                    self.insert_selection(id);
                }
                None => {
                    old.index = None;
                    old.parent = None;
                    old.children.clear();
                    let id = old.id;
                    self.detached.push(old);
                    self.selection.push(id);
                }
            }
        }

        self.filtered = self.compute_filtered();
        tracing::debug!(
            items = self.items.len(),
            selected = self.selection.len(),
            "items list rebuilt"
        );
    }

    fn rebuild_positions(&mut self) {
        self.positions = self
            .items
            .iter()
            .enumerate()
            .map(|(pos, option)| (option.id, pos))
            .collect();
    }

    /// Build a free-text tag option, held aside until `select` commits it
    pub fn add_item(&mut self, value: Value) -> OptionId {
        let primitive = if self.items.is_empty() {
            !value.is_object()
        } else {
            self.primitive
        };
        let mut option = SelectOption::from_raw(value, &self.config.label_field, primitive);
        option.is_tag = true;
        let id = option.id;
        self.pending_tag = Some(option);
        id
    }

    fn commit_pending_tag(&mut self) {
        let Some(mut tag) = self.pending_tag.take() else {
            return;
        };
        let pos = self.items.len();
        tag.index = Some(pos);
        self.positions.insert(tag.id, pos);
        self.items.push(tag);
    }

    // ========================================================================
    // Filtering
    // ========================================================================

    /// Filter the visible list by `term` and reset the mark to its default
    pub fn filter(&mut self, term: &str) {
        self.filter_term = (!term.is_empty()).then(|| term.to_string());
        self.filtered = self.compute_filtered();
        self.mark_selected_or_default(self.config.mark_first);
    }

    /// Drop the filter term and show the full (unhidden) list again
    pub fn reset_filtered(&mut self) {
        self.filter_term = None;
        self.refilter();
    }

    /// Recompute the view, keeping the marked option if it is still visible
    fn refilter(&mut self) {
        let marked = self.marked_item().map(|option| option.id);
        self.filtered = self.compute_filtered();
        self.marked_index = marked.and_then(|id| self.filtered_position(id));
    }

    fn compute_filtered(&self) -> Vec<usize> {
        let term = self.filter_term.as_deref();
        let hide_selected = self.config.hide_selected;
        let mut visible = Vec::new();
        let mut last_header = None;

        for (pos, option) in self.items.iter().enumerate() {
            // Headers are emitted lazily, right before their first visible member
            if option.is_group() {
                continue;
            }
            if hide_selected && option.selected {
                continue;
            }
            if let Some(term) = term {
                if !self.matches(option, term) {
                    continue;
                }
            }
            if let Some(parent) = option.parent.and_then(|id| self.positions.get(&id).copied()) {
                if hide_selected && self.items[parent].selected {
                    continue;
                }
                if last_header != Some(parent) {
                    visible.push(parent);
                    last_header = Some(parent);
                }
            }
            visible.push(pos);
        }
        visible
    }

    fn filtered_position(&self, id: OptionId) -> Option<usize> {
        let pos = *self.positions.get(&id)?;
        self.filtered.iter().position(|&p| p == pos)
    }

    // ========================================================================
    // Selection
    // ========================================================================

    fn is_selectable(&self, option: &SelectOption) -> bool {
        !option.disabled && (!option.is_group() || self.config.selectable_group)
    }

    /// Select an option
    ///
    /// Single mode replaces the selection; multiple mode appends up to
    /// `max_selected_items`. Selecting the pending tag commits it into the
    /// pool. Returns whether the selection changed.
    pub fn select(&mut self, id: OptionId) -> bool {
        if self.disabled {
            return false;
        }
        let selectable = self
            .get(id)
            .is_some_and(|option| self.is_selectable(option));
        selectable && self.select_bound(id)
    }

    /// Select without the disabled checks; used when restoring a bound value
    pub(crate) fn select_bound(&mut self, id: OptionId) -> bool {
        let Some(option) = self.get(id) else {
            return false;
        };
        if option.selected {
            return false;
        }
        if self.max_items_selected() {
            tracing::debug!("select ignored: max selected items reached");
            return false;
        }

        let is_tag = self.pending_tag.as_ref().is_some_and(|tag| tag.id == id);
        if is_tag {
            self.commit_pending_tag();
        }
        if !self.config.multiple {
            self.clear_selection_state(Some(id));
        }
        let inserted = self.insert_selection(id);

        if self.config.hide_selected || is_tag {
            self.refilter();
        }
        inserted
    }

    fn insert_selection(&mut self, id: OptionId) -> bool {
        if self.config.multiple && self.config.selectable_group {
            self.resolve_group_overlap(id);
        }
        let Some(option) = self.get_mut(id) else {
            return false;
        };
        if option.selected {
            return false;
        }
        option.selected = true;
        self.selection.push(id);
        true
    }

    /// A selected group header subsumes its members, and vice versa
    fn resolve_group_overlap(&mut self, id: OptionId) {
        let Some(option) = self.get(id) else {
            return;
        };
        let mut displaced: Vec<OptionId> = option.children.clone();
        displaced.extend(option.parent);
        for other in displaced {
            if self.selection.contains(&other) {
                self.remove_selection(other);
            }
        }
    }

    /// Deselect an option; returns whether the selection changed
    pub fn unselect(&mut self, id: OptionId) -> bool {
        if self.disabled {
            return false;
        }
        let Some(option) = self.get(id) else {
            return false;
        };
        if !option.selected || option.disabled {
            return false;
        }
        self.remove_selection(id);
        if self.config.hide_selected {
            self.refilter();
        }
        true
    }

    fn remove_selection(&mut self, id: OptionId) {
        self.selection.retain(|&selected| selected != id);
        if let Some(option) = self.get_mut(id) {
            option.selected = false;
        }
        self.detached.retain(|option| option.id != id);
    }

    /// Select a value that has no option in the pool, keeping it as a detached placeholder
    pub(crate) fn select_detached(&mut self, value: Value) -> Option<OptionId> {
        let option = SelectOption::from_raw(value, &self.config.label_field, self.primitive);
        let id = option.id;
        self.detached.push(option);
        if self.select_bound(id) {
            Some(id)
        } else {
            self.detached.retain(|option| option.id != id);
            None
        }
    }

    /// Empty the selection and unmark
    pub fn clear_selected(&mut self) {
        self.clear_selection_state(None);
        self.marked_index = None;
        if self.config.hide_selected {
            self.refilter();
        }
    }

    /// Deselect everything; an unselected detached `incoming` option survives
    fn clear_selection_state(&mut self, incoming: Option<OptionId>) {
        for id in std::mem::take(&mut self.selection) {
            if let Some(option) = self.get_mut(id) {
                option.selected = false;
            }
        }
        self.detached.retain(|option| Some(option.id) == incoming);
    }

    // ========================================================================
    // Marking
    // ========================================================================

    fn is_markable(&self, option: &SelectOption) -> bool {
        !option.disabled && (!option.is_group() || self.config.selectable_group)
    }

    fn markable_at(&self, index: usize) -> bool {
        self.filtered
            .get(index)
            .is_some_and(|&pos| self.is_markable(&self.items[pos]))
    }

    /// Mark a visible option; returns false if it is hidden or not markable
    pub fn mark_item(&mut self, id: OptionId) -> bool {
        match self.filtered_position(id) {
            Some(index) if self.markable_at(index) => {
                self.marked_index = Some(index);
                true
            }
            _ => false,
        }
    }

    /// Index the mark would move to, or None at the boundary
    ///
    /// From nothing marked, forward starts at the top and backward at the bottom.
    pub fn next_markable_index(&self, forward: bool) -> Option<usize> {
        if forward {
            let start = self.marked_index.map_or(0, |i| i + 1);
            (start..self.filtered.len()).find(|&i| self.markable_at(i))
        } else {
            let end = self.marked_index.unwrap_or(self.filtered.len());
            (0..end).rev().find(|&i| self.markable_at(i))
        }
    }

    /// Move the mark down, clamping at the last markable option
    pub fn mark_next_item(&mut self) {
        if let Some(index) = self.next_markable_index(true) {
            self.marked_index = Some(index);
        }
    }

    /// Move the mark up, clamping at the first markable option
    ///
    /// With nothing marked, marks the last markable option.
    pub fn mark_previous_item(&mut self) {
        if let Some(index) = self.next_markable_index(false) {
            self.marked_index = Some(index);
        }
    }

    /// Mark the first visible selected option, else the first markable one
    /// when `mark_first`, else nothing
    pub fn mark_selected_or_default(&mut self, mark_first: bool) {
        let selected = self
            .selection
            .iter()
            .filter_map(|&id| self.filtered_position(id))
            .find(|&index| self.markable_at(index));

        self.marked_index = selected.or_else(|| {
            if mark_first {
                (0..self.filtered.len()).find(|&i| self.markable_at(i))
            } else {
                None
            }
        });
    }

    pub fn unmark(&mut self) {
        self.marked_index = None;
    }
}
