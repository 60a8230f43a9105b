//! Keyboard handling - navigation, commit keys, filter editing, type-ahead buffer

use super::dropdown::{self, on_filter_input, open, scroll_to_marked};
use super::selection::{clear_model, select_option, toggle_item, unselect_option};
use super::tags::select_tag;
use crate::commands::Cmd;
use crate::events::SelectEvent;
use crate::messages::Key;
use crate::model::{CloseReason, SelectModel};

pub(crate) fn handle_key(model: &mut SelectModel, key: Key) -> Option<Cmd> {
    if model.is_disabled {
        return None;
    }
    match key {
        Key::ArrowDown => arrow(model, true),
        Key::ArrowUp => arrow(model, false),
        Key::Enter => enter(model),
        Key::Tab => tab(model),
        Key::Space => space(model),
        Key::Escape => dropdown::close(model, CloseReason::Escape),
        Key::Backspace => backspace(model),
        Key::Char(ch) => printable(model, ch),
    }
}

/// Whether moving the mark in this direction lands on the "add tag" row
fn next_item_is_tag(model: &SelectModel, forward: bool) -> bool {
    model.show_add_tag()
        && model.items.marked_index().is_some()
        && model.items.next_markable_index(forward).is_none()
}

/// Move the mark; Down on a closed dropdown opens it, Up is ignored
fn arrow(model: &mut SelectModel, forward: bool) -> Option<Cmd> {
    if !model.is_open {
        return if forward { open(model) } else { None };
    }
    if next_item_is_tag(model, forward) {
        model.items.unmark();
        return Some(Cmd::ScrollToTag);
    }
    if forward {
        model.items.mark_next_item();
    } else {
        model.items.mark_previous_item();
    }
    scroll_to_marked(model)
}

fn enter(model: &mut SelectModel) -> Option<Cmd> {
    let cmd = if !model.is_open {
        open(model)
    } else if let Some(id) = model.items.marked_item().map(|option| option.id) {
        toggle_item(model, id)
    } else if !model.config().add_tag {
        None
    } else if model.filter_value.is_none() {
        dropdown::close(model, CloseReason::Explicit)
    } else if model.show_add_tag() {
        select_tag(model)
    } else {
        None
    };
    model.outbox.emit(SelectEvent::EnterPressed);
    cmd
}

fn tab(model: &mut SelectModel) -> Option<Cmd> {
    if !model.is_open {
        return None;
    }
    if model.config().select_on_tab {
        if let Some(id) = model.items.marked_item().map(|option| option.id) {
            return toggle_item(model, id);
        }
        if model.show_add_tag() {
            return select_tag(model);
        }
    }
    dropdown::close(model, CloseReason::Tab)
}

/// Space opens a closed dropdown; while open it is ordinary filter text
fn space(model: &mut SelectModel) -> Option<Cmd> {
    if !model.is_open {
        return open(model);
    }
    if model.config().searchable {
        return append_filter(model, ' ');
    }
    None
}

/// Backspace edits the filter text, or removes selections once the filter is empty
fn backspace(model: &mut SelectModel) -> Option<Cmd> {
    let config = model.config();
    let (multiple, clearable) = (config.multiple, config.clearable);

    if let Some(mut text) = model.filter_value.clone() {
        let mut cmds = Vec::new();
        if text.chars().count() <= 1 && !multiple {
            cmds.push(clear_model(model));
        }
        text.pop();
        cmds.push(on_filter_input(model, text));
        return Cmd::join(cmds);
    }
    if !clearable || !model.items.has_selection() {
        return None;
    }

    if multiple {
        let id = model.items.last_selected_item()?.id;
        unselect_option(model, id)
    } else {
        clear_model(model)
    }
}

/// Printable key: filter text when searchable, else the type-ahead key buffer
fn printable(model: &mut SelectModel, ch: char) -> Option<Cmd> {
    if model.config().searchable {
        return append_filter(model, ch);
    }
    let generation = model.key_buffer.push(ch);
    let delay_ms = model.key_buffer.window_ms();
    Some(Cmd::DebouncedKeyFlush {
        generation,
        delay_ms,
    })
}

fn append_filter(model: &mut SelectModel, ch: char) -> Option<Cmd> {
    let mut text = model.filter_value.clone().unwrap_or_default();
    text.push(ch);
    on_filter_input(model, text)
}

/// Key buffer idle window elapsed: mark (open) or select (closed) the first label match
pub(crate) fn flush_key_buffer(model: &mut SelectModel, generation: u64) -> Option<Cmd> {
    let Some(term) = model.key_buffer.flush(generation) else {
        tracing::trace!(generation, "stale key buffer flush");
        return None;
    };
    let Some(id) = model.items.find_by_label(&term) else {
        tracing::debug!(%term, "no label matches key buffer");
        return None;
    };
    if model.is_open {
        model.items.mark_item(id);
        scroll_to_marked(model)
    } else {
        select_option(model, id, true)
    }
}
