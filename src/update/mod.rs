//! Update functions for the Elm-style architecture
//!
//! All state transformations flow through these functions.

mod dropdown;
mod keyboard;
mod mouse;
mod selection;
mod tags;

use crate::commands::Cmd;
use crate::messages::SelectMsg;
use crate::model::SelectModel;
use crate::tracing::SelectionSnapshot;

use tracing::{debug, span, trace, Level};

pub use dropdown::{close, open, toggle};
pub use selection::{clear_model, select_option, toggle_item, unselect_option};
pub use tags::select_tag;

/// Main update function - dispatches to sub-handlers
///
/// Every message is one transition: events emitted while handling it are
/// deduplicated, and a `Redraw` is added when visible state changed.
pub fn update(model: &mut SelectModel, msg: SelectMsg) -> Option<Cmd> {
    if model.destroyed {
        trace!(msg = %msg_type_name(&msg), "ignored after destroy");
        return None;
    }

    let msg_name = msg_type_name(&msg);
    let _span = span!(Level::DEBUG, "update", msg = %msg_name).entered();
    debug!(target: "message", msg = %msg_name, "processing");

    model.outbox.begin_transition();
    let before = SelectionSnapshot::from_model(model);

    let result = update_inner(model, msg);

    if model.destroyed {
        return result;
    }
    let after = SelectionSnapshot::from_model(model);
    match before.diff(&after) {
        Some(diff) => {
            trace!(target: "selection", %diff, "state changed");
            Cmd::join([Some(Cmd::Redraw), result])
        }
        None => result,
    }
}

/// Inner update logic (no tracing)
fn update_inner(model: &mut SelectModel, msg: SelectMsg) -> Option<Cmd> {
    match msg {
        SelectMsg::Key(key) => keyboard::handle_key(model, key),
        SelectMsg::MouseDown(target) => mouse::handle_mouse_down(model, target),
        SelectMsg::InputFocus => mouse::input_focus(model),
        SelectMsg::InputBlur => mouse::input_blur(model),
        SelectMsg::ClickOutside => mouse::click_outside(model),
        SelectMsg::ItemHover(id) => mouse::item_hover(model, id),
        SelectMsg::ItemClick(id) => selection::toggle_item(model, id),
        SelectMsg::SetFilter(text) => dropdown::set_filter(model, text),

        SelectMsg::Open => dropdown::open(model),
        SelectMsg::Close => dropdown::close(model, crate::model::CloseReason::Explicit),
        SelectMsg::Toggle => dropdown::toggle(model),
        SelectMsg::Clear => selection::clear_click(model),

        SelectMsg::SetItems(items) => dropdown::set_items(model, items),
        SelectMsg::WriteValue(value) => selection::write_value(model, value),
        SelectMsg::SetDisabled(disabled) => dropdown::set_disabled(model, disabled),

        SelectMsg::ViewportChanged { start, end } => dropdown::viewport_changed(model, start, end),
        SelectMsg::PlacementResolved(position) => dropdown::placement_resolved(model, position),

        SelectMsg::KeyBufferFlush { generation } => keyboard::flush_key_buffer(model, generation),
        SelectMsg::TagResolved { request, result } => tags::tag_resolved(model, request, result),
        SelectMsg::TypeaheadResults { generation, items } => {
            dropdown::typeahead_results(model, generation, items)
        }

        SelectMsg::Destroy => dropdown::destroy(model),
    }
}

/// Get a display name for a message
///
/// Pool payloads are summarized by length to keep log lines short.
/// Example outputs:
/// - `Key(ArrowDown)`
/// - `SetItems(120 items)`
/// - `TagResolved(#3, ok)`
fn msg_type_name(msg: &SelectMsg) -> String {
    match msg {
        SelectMsg::SetItems(items) => format!("SetItems({} items)", items.len()),
        SelectMsg::TypeaheadResults { generation, items } => {
            format!("TypeaheadResults(#{}, {} items)", generation, items.len())
        }
        SelectMsg::TagResolved { request, result } => format!(
            "TagResolved(#{}, {})",
            request,
            if result.is_ok() { "ok" } else { "err" }
        ),
        other => format!("{:?}", other),
    }
}
