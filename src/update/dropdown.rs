//! Dropdown lifecycle - open/close, filter text, pool updates, viewport

use serde_json::Value;

use super::{selection, tags};
use crate::commands::{Cmd, FOCUS_DELAY_MS};
use crate::config::DropdownPosition;
use crate::events::SelectEvent;
use crate::model::{CloseReason, SelectModel};

/// Open the dropdown
///
/// No-op while disabled, already open, at the selection cap, or when there
/// is nothing to pick and neither type-ahead nor tagging can supply items.
pub fn open(model: &mut SelectModel) -> Option<Cmd> {
    if model.is_disabled || model.is_open || model.items.max_items_selected() {
        return None;
    }
    let config = model.config();
    let (typeahead, add_tag, multiple) = (config.typeahead, config.add_tag, config.multiple);
    let (mark_first, prefill) = (config.mark_first, config.prefill_search_on_open);
    if !typeahead && !add_tag && model.items.no_items_to_select() {
        tracing::debug!("open ignored: no items to select");
        return None;
    }

    model.is_open = true;
    model.items.mark_selected_or_default(mark_first);
    model.outbox.emit(SelectEvent::Opened);

    let mut cmds = vec![Some(Cmd::UpdatePlacement)];
    if model.filter_value.is_none() && !multiple {
        if prefill {
            model.filter_value = model
                .items
                .last_selected_item()
                .map(|option| option.label.clone())
                .filter(|label| !label.is_empty());
        }
        cmds.push(Some(focus_input()));
    }
    cmds.push(scroll_to_marked(model));
    Cmd::join(cmds)
}

/// Close the dropdown, committing leftover free text as a tag when the reason allows
pub fn close(model: &mut SelectModel, reason: CloseReason) -> Option<Cmd> {
    if !model.is_open {
        return None;
    }
    tracing::debug!(?reason, "closing dropdown");

    let mut cmds = Vec::new();
    if reason.commits_tag() {
        cmds.push(tags::commit_on_close(model));
    }
    // The implicit tag commit never closes, so the dropdown is still open here
    clear_search(model);
    model.is_open = false;
    mark_touched(model);
    model.outbox.emit(SelectEvent::Closed);
    cmds.push(Some(Cmd::BlurInput));
    Cmd::join(cmds)
}

pub fn toggle(model: &mut SelectModel) -> Option<Cmd> {
    if model.is_open {
        close(model, CloseReason::Explicit)
    } else {
        open(model)
    }
}

/// Reset the filter text and show the whole list again
pub(crate) fn clear_search(model: &mut SelectModel) {
    model.filter_value = None;
    model.items.reset_filtered();
}

pub(crate) fn mark_touched(model: &mut SelectModel) {
    model.touched = true;
    model.outbox.emit(SelectEvent::Touched);
}

pub(crate) fn focus_input() -> Cmd {
    Cmd::FocusInput {
        delay_ms: FOCUS_DELAY_MS,
    }
}

/// Scroll the marked option into view while open
pub(crate) fn scroll_to_marked(model: &SelectModel) -> Option<Cmd> {
    if !model.is_open {
        return None;
    }
    model
        .items
        .marked_index()
        .map(|index| Cmd::ScrollIntoView { index })
}

/// Stamp a new external search request; older results will be dropped
pub(crate) fn request_typeahead(model: &mut SelectModel) -> Cmd {
    model.typeahead_generation += 1;
    model.loading = true;
    Cmd::Typeahead {
        generation: model.typeahead_generation,
        term: model.filter_value.clone(),
    }
}

/// The filter input's text changed
pub fn set_filter(model: &mut SelectModel, text: String) -> Option<Cmd> {
    if model.is_disabled || !model.config().searchable {
        return None;
    }
    on_filter_input(model, text)
}

pub(crate) fn on_filter_input(model: &mut SelectModel, text: String) -> Option<Cmd> {
    model.filter_value = (!text.is_empty()).then_some(text);
    let (multiple, typeahead) = (model.config().multiple, model.config().typeahead);

    let mut cmds = Vec::new();
    if model.filter_value.is_none() && !multiple {
        cmds.push(selection::clear_model(model));
    }
    cmds.push(open(model));

    if typeahead {
        cmds.push(Some(request_typeahead(model)));
    } else {
        let term = model.filter_value.clone().unwrap_or_default();
        model.items.filter(&term);
        cmds.push(scroll_to_marked(model));
    }
    if model.is_open {
        cmds.push(Some(Cmd::UpdatePlacement));
    }
    Cmd::join(cmds)
}

/// Replace the item pool
pub fn set_items(model: &mut SelectModel, items: Vec<Value>) -> Option<Cmd> {
    model.items.set_items(items);
    model.scrolled_to_end_fired = false;

    let config = model.config();
    let (typeahead, mark_first) = (config.typeahead, config.mark_first);
    if !typeahead {
        if let Some(term) = model.filter_value.clone() {
            model.items.filter(&term);
        }
    }
    if typeahead || model.is_open {
        model.items.mark_selected_or_default(mark_first);
    }
    scroll_to_marked(model)
}

/// Results of an external search
pub fn typeahead_results(
    model: &mut SelectModel,
    generation: u64,
    items: Vec<Value>,
) -> Option<Cmd> {
    if generation != model.typeahead_generation {
        tracing::debug!(
            "Skipping stale typeahead results: generation {} != latest {}",
            generation,
            model.typeahead_generation
        );
        return None;
    }
    model.loading = false;
    set_items(model, items)
}

pub fn set_disabled(model: &mut SelectModel, disabled: bool) -> Option<Cmd> {
    model.is_disabled = disabled;
    model.items.set_disabled(disabled);
    if disabled {
        model.key_buffer.cancel();
        return close(model, CloseReason::Disabled);
    }
    None
}

/// Rendered range reported by the viewport collaborator
pub fn viewport_changed(model: &mut SelectModel, start: usize, end: usize) -> Option<Cmd> {
    let total = model.items.filtered_len();
    if model.scrolled_to_end_fired || total == 0 {
        return None;
    }
    let config = model.config();
    let threshold = if config.virtual_scroll {
        total.saturating_sub(config.buffer_amount)
    } else {
        total
    };
    if end >= threshold {
        model.scrolled_to_end_fired = true;
        model
            .outbox
            .emit(SelectEvent::ScrolledToEnd { start, end });
    }
    None
}

pub fn placement_resolved(model: &mut SelectModel, position: DropdownPosition) -> Option<Cmd> {
    model.placement = position;
    None
}

/// Tear the widget down; later messages and async completions are ignored
pub fn destroy(model: &mut SelectModel) -> Option<Cmd> {
    tracing::debug!("select destroyed");
    model.destroyed = true;
    model.is_open = false;
    model.loading = false;
    model.key_buffer.cancel();
    model.tag_request += 1;
    model.typeahead_generation += 1;
    None
}
