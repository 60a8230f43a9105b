//! Selection changes driven by the interaction layer
//!
//! Each committed change pushes the outward model (see `binding::emit_model`).

use serde_json::Value;

use super::dropdown::{self, clear_search, focus_input, request_typeahead};
use crate::binding;
use crate::commands::Cmd;
use crate::events::SelectEvent;
use crate::model::{CloseReason, OptionId, SelectModel};

/// Select an option, closing afterwards when `close` is set and the config asks for it
pub fn select_option(model: &mut SelectModel, id: OptionId, close: bool) -> Option<Cmd> {
    let option = model.items.get(id)?;
    if !option.is_selected() {
        let is_tag = model
            .items
            .pending_tag()
            .is_some_and(|tag| tag.id == id);
        if model.items.select(id) {
            if model.config().clear_search_on_add {
                clear_search(model);
            }
            let value = model
                .items
                .get(id)
                .map(|option| option.value.clone())
                .unwrap_or(Value::Null);
            if model.config().multiple {
                model.outbox.emit(SelectEvent::ItemAdded(value.clone()));
            }
            if is_tag {
                model.outbox.emit(SelectEvent::TagAdded(value));
            }
            binding::emit_model(&model.items, &mut model.outbox);
        } else if is_tag {
            tracing::debug!("tag was not selected");
        }
    }

    if !close {
        return None;
    }
    let close_on_select = model.config().close_on_select;
    if close_on_select || model.items.no_items_to_select() {
        return dropdown::close(model, CloseReason::Selection);
    }
    None
}

/// Deselect an option and push the model
pub fn unselect_option(model: &mut SelectModel, id: OptionId) -> Option<Cmd> {
    let value = model.items.get(id)?.value.clone();
    if model.items.unselect(id) {
        binding::emit_model(&model.items, &mut model.outbox);
        model.outbox.emit(SelectEvent::ItemRemoved(value));
    }
    None
}

/// Select an unselected option; deselect a selected one in multi mode
pub fn toggle_item(model: &mut SelectModel, id: OptionId) -> Option<Cmd> {
    if model.is_disabled {
        return None;
    }
    let option = model.items.get(id)?;
    if option.disabled {
        return None;
    }
    if model.config().multiple && option.is_selected() {
        unselect_option(model, id)
    } else {
        select_option(model, id, true)
    }
}

/// Clear the whole selection (when clearable) and push the empty model
pub fn clear_model(model: &mut SelectModel) -> Option<Cmd> {
    if !model.config().clearable || !model.items.has_selection() {
        return None;
    }
    model.items.clear_selected();
    binding::emit_model(&model.items, &mut model.outbox);
    None
}

/// The "clear all" glyph: drop selection and filter, refocus the input
pub(crate) fn clear_click(model: &mut SelectModel) -> Option<Cmd> {
    if model.is_disabled {
        return None;
    }
    let mut cmds = vec![clear_model(model)];
    clear_search(model);
    cmds.push(Some(focus_input()));
    if model.config().typeahead {
        cmds.push(Some(request_typeahead(model)));
    }
    model.outbox.emit(SelectEvent::Cleared);
    Cmd::join(cmds)
}

/// Value written in from the bound form; no notifications are emitted
pub(crate) fn write_value(model: &mut SelectModel, value: Value) -> Option<Cmd> {
    if let Err(err) = binding::write_value(&mut model.items, value) {
        tracing::warn!(%err, "rejected written-in value");
        return None;
    }
    if model.is_open {
        let mark_first = model.config().mark_first;
        model.items.mark_selected_or_default(mark_first);
    }
    None
}
