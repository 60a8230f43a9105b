//! Pointer and focus handling

use super::dropdown::{self, focus_input, mark_touched, open, toggle};
use super::selection::{clear_click, unselect_option};
use crate::commands::Cmd;
use crate::events::SelectEvent;
use crate::messages::MouseTarget;
use crate::model::{CloseReason, OptionId, SelectModel};

pub(crate) fn handle_mouse_down(model: &mut SelectModel, target: MouseTarget) -> Option<Cmd> {
    if model.is_disabled {
        return None;
    }
    match target {
        MouseTarget::ClearIcon => return clear_click(model),
        MouseTarget::Arrow => return toggle(model),
        _ => {}
    }

    let focus = (!model.focused).then(focus_input);
    let action = match target {
        MouseTarget::ValueIcon(id) => unselect_option(model, id),
        _ if model.config().searchable => open(model),
        _ => toggle(model),
    };
    Cmd::join([focus, action])
}

pub(crate) fn input_focus(model: &mut SelectModel) -> Option<Cmd> {
    model.focused = true;
    model.outbox.emit(SelectEvent::Focused);
    None
}

/// Losing focus while closed marks the control touched
pub(crate) fn input_blur(model: &mut SelectModel) -> Option<Cmd> {
    model.outbox.emit(SelectEvent::Blurred);
    if !model.is_open && !model.is_disabled {
        mark_touched(model);
    }
    model.focused = false;
    None
}

pub(crate) fn click_outside(model: &mut SelectModel) -> Option<Cmd> {
    dropdown::close(model, CloseReason::ClickOutside)
}

pub(crate) fn item_hover(model: &mut SelectModel, id: OptionId) -> Option<Cmd> {
    if model.items.get(id).is_some_and(|option| option.disabled) {
        return None;
    }
    model.items.mark_item(id);
    None
}
