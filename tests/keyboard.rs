//! Keyboard interaction tests: navigation, commit keys, backspace policy, type-ahead buffer

mod common;

use common::{
    count_events, fruits, leaf_cmds, marked_label, model_id_of, press, send, test_model,
    type_text, visible_labels,
};
use picklist::commands::Cmd;
use picklist::config::SelectConfig;
use picklist::events::SelectEvent;
use picklist::messages::{Key, SelectMsg};
use picklist::model::SelectModel;
use serde_json::json;

fn not_searchable() -> SelectConfig {
    SelectConfig {
        searchable: false,
        ..SelectConfig::single()
    }
}

/// Generations of every key buffer flush scheduled by these commands, in order
fn flush_generations(cmds: Vec<Cmd>) -> Vec<u64> {
    cmds.into_iter()
        .flat_map(Cmd::flatten)
        .filter_map(|cmd| match cmd {
            Cmd::DebouncedKeyFlush { generation, .. } => Some(generation),
            _ => None,
        })
        .collect()
}

fn open_model(config: SelectConfig) -> SelectModel {
    let mut model = test_model(config, fruits());
    send(&mut model, SelectMsg::Open);
    assert!(model.is_open());
    model
}

// ========================================================================
// Arrow navigation
// ========================================================================

#[test]
fn test_arrow_down_opens_closed_dropdown() {
    let mut model = test_model(SelectConfig::single(), fruits());
    press(&mut model, Key::ArrowUp);
    assert!(!model.is_open());

    press(&mut model, Key::ArrowDown);
    assert!(model.is_open());
    assert_eq!(count_events(&model, |e| *e == SelectEvent::Opened), 1);
}

#[test]
fn test_arrows_clamp_without_tagging() {
    let mut model = open_model(SelectConfig::single());
    assert_eq!(marked_label(&model), None);

    let cmd = press(&mut model, Key::ArrowDown);
    assert_eq!(marked_label(&model).as_deref(), Some("Apple"));
    assert!(leaf_cmds(cmd)
        .iter()
        .any(|c| matches!(c, Cmd::ScrollIntoView { index: 0 })));

    for _ in 0..5 {
        press(&mut model, Key::ArrowDown);
    }
    assert_eq!(marked_label(&model).as_deref(), Some("Banana"));

    press(&mut model, Key::ArrowUp);
    assert_eq!(marked_label(&model).as_deref(), Some("Apricot"));
}

#[test]
fn test_arrows_reach_tag_row_from_both_ends() {
    let config = SelectConfig {
        add_tag: true,
        mark_first: true,
        ..SelectConfig::single()
    };
    let mut model = test_model(config, fruits());
    type_text(&mut model, "ap");
    assert_eq!(visible_labels(model.items()), vec!["Apple", "Apricot"]);
    assert_eq!(marked_label(&model).as_deref(), Some("Apple"));
    assert!(model.show_add_tag());
    assert!(!model.is_tag_highlighted());

    press(&mut model, Key::ArrowDown);
    let cmd = press(&mut model, Key::ArrowDown);
    assert!(model.is_tag_highlighted());
    assert_eq!(marked_label(&model), None);
    assert!(leaf_cmds(cmd).iter().any(|c| matches!(c, Cmd::ScrollToTag)));

    press(&mut model, Key::ArrowDown);
    assert_eq!(marked_label(&model).as_deref(), Some("Apple"));

    press(&mut model, Key::ArrowUp);
    assert!(model.is_tag_highlighted());

    press(&mut model, Key::ArrowUp);
    assert_eq!(marked_label(&model).as_deref(), Some("Apricot"));
}

// ========================================================================
// Enter / Tab / Escape / Space
// ========================================================================

#[test]
fn test_enter_selects_marked_and_closes() {
    let mut model = open_model(SelectConfig::single());
    press(&mut model, Key::ArrowDown);
    press(&mut model, Key::ArrowDown);
    model.take_events();

    press(&mut model, Key::Enter);
    assert_eq!(model.selected_labels(), vec!["Apricot"]);
    assert!(!model.is_open());
    assert!(model.is_touched());

    let events = model.take_events();
    assert!(events.contains(&SelectEvent::Changed(json!("Apricot"))));
    assert!(events.contains(&SelectEvent::ModelChanged(json!("Apricot"))));
    assert!(events.contains(&SelectEvent::Searched(json!("Apricot"))));
    assert!(events.contains(&SelectEvent::Closed));
    assert_eq!(
        events
            .iter()
            .filter(|e| **e == SelectEvent::EnterPressed)
            .count(),
        1
    );
}

#[test]
fn test_enter_on_closed_dropdown_opens() {
    let mut model = test_model(SelectConfig::single(), fruits());
    press(&mut model, Key::Enter);
    assert!(model.is_open());
    assert!(!model.has_value());
    assert_eq!(count_events(&model, |e| *e == SelectEvent::EnterPressed), 1);
}

#[test]
fn test_enter_toggles_in_multiple_mode() {
    let config = SelectConfig {
        close_on_select: false,
        ..SelectConfig::multiple()
    };
    let mut model = open_model(config);
    press(&mut model, Key::ArrowDown);

    press(&mut model, Key::Enter);
    assert_eq!(model.selected_labels(), vec!["Apple"]);
    assert!(model.is_open());
    assert_eq!(
        count_events(&model, |e| *e == SelectEvent::ItemAdded(json!("Apple"))),
        1
    );

    press(&mut model, Key::Enter);
    assert!(model.selected_labels().is_empty());
    assert_eq!(
        count_events(&model, |e| *e == SelectEvent::ItemRemoved(json!("Apple"))),
        1
    );
}

#[test]
fn test_enter_without_mark_or_tagging_does_nothing() {
    let mut model = open_model(SelectConfig::single());
    press(&mut model, Key::Enter);
    assert!(model.is_open());
    assert!(!model.has_value());
}

#[test]
fn test_tab_closes_without_select_on_tab() {
    let mut model = open_model(SelectConfig::single());
    press(&mut model, Key::ArrowDown);
    press(&mut model, Key::Tab);
    assert!(!model.is_open());
    assert!(!model.has_value());
}

#[test]
fn test_tab_selects_marked_with_select_on_tab() {
    let config = SelectConfig {
        select_on_tab: true,
        ..SelectConfig::single()
    };
    let mut model = open_model(config);
    press(&mut model, Key::ArrowDown);
    press(&mut model, Key::Tab);
    assert_eq!(model.selected_labels(), vec!["Apple"]);
    assert!(!model.is_open());
}

#[test]
fn test_tab_ignored_when_closed() {
    let mut model = test_model(SelectConfig::single(), fruits());
    assert!(press(&mut model, Key::Tab).is_none());
    assert!(model.events().is_empty());
}

#[test]
fn test_escape_closes_and_clears_filter() {
    let mut model = test_model(SelectConfig::single(), fruits());
    type_text(&mut model, "ban");
    assert!(model.is_open());
    assert_eq!(model.filter_value(), Some("ban"));

    let cmd = press(&mut model, Key::Escape);
    assert!(!model.is_open());
    assert_eq!(model.filter_value(), None);
    assert_eq!(model.items().filtered_len(), 3);
    assert!(leaf_cmds(cmd).iter().any(|c| matches!(c, Cmd::BlurInput)));
}

#[test]
fn test_space_opens_then_types() {
    let mut model = test_model(SelectConfig::single(), fruits());
    press(&mut model, Key::Space);
    assert!(model.is_open());
    assert_eq!(model.filter_value(), None);

    press(&mut model, Key::Space);
    assert_eq!(model.filter_value(), Some(" "));
}

#[test]
fn test_keys_ignored_while_disabled() {
    let mut model = test_model(SelectConfig::single(), fruits());
    send(&mut model, SelectMsg::SetDisabled(true));
    press(&mut model, Key::ArrowDown);
    type_text(&mut model, "a");
    assert!(!model.is_open());
    assert_eq!(model.filter_value(), None);
}

// ========================================================================
// Filter editing and backspace
// ========================================================================

#[test]
fn test_typing_filters_and_opens() {
    let mut model = test_model(SelectConfig::single(), fruits());
    type_text(&mut model, "AN");
    assert!(model.is_open());
    assert!(model.is_filtered());
    assert_eq!(visible_labels(model.items()), vec!["Banana"]);
}

#[test]
fn test_backspace_edits_filter_and_clears_single_selection() {
    let mut model = test_model(SelectConfig::single(), fruits());
    send(&mut model, SelectMsg::WriteValue(json!("Apple")));
    type_text(&mut model, "b");
    assert!(model.has_value());

    press(&mut model, Key::Backspace);
    assert_eq!(model.filter_value(), None);
    assert!(!model.has_value());
    assert_eq!(model.items().filtered_len(), 3);
}

#[test]
fn test_backspace_with_empty_filter_removes_last_selection() {
    let mut model = test_model(SelectConfig::multiple(), fruits());
    send(&mut model, SelectMsg::WriteValue(json!(["Apple", "Banana"])));

    press(&mut model, Key::Backspace);
    assert_eq!(model.selected_labels(), vec!["Apple"]);
    assert_eq!(
        count_events(&model, |e| *e == SelectEvent::ItemRemoved(json!("Banana"))),
        1
    );
    assert_eq!(
        count_events(&model, |e| *e == SelectEvent::ModelChanged(json!(["Apple"]))),
        1
    );
}

#[test]
fn test_backspace_clears_single_selection() {
    let mut model = test_model(SelectConfig::single(), fruits());
    send(&mut model, SelectMsg::WriteValue(json!("Apple")));
    press(&mut model, Key::Backspace);
    assert!(!model.has_value());
    assert_eq!(
        count_events(&model, |e| *e == SelectEvent::ModelChanged(json!(null))),
        1
    );
}

#[test]
fn test_backspace_respects_clearable() {
    let config = SelectConfig {
        clearable: false,
        ..SelectConfig::multiple()
    };
    let mut model = test_model(config, fruits());
    send(&mut model, SelectMsg::WriteValue(json!(["Apple"])));
    press(&mut model, Key::Backspace);
    assert_eq!(model.selected_labels(), vec!["Apple"]);
}

// ========================================================================
// Type-ahead key buffer (non-searchable)
// ========================================================================

#[test]
fn test_key_buffer_marks_first_prefix_match_when_open() {
    let mut model = test_model(not_searchable(), fruits());
    press(&mut model, Key::Space);
    assert!(model.is_open());

    let generations = flush_generations(type_text(&mut model, "ap"));
    assert_eq!(generations.len(), 2);
    assert_eq!(model.key_buffer().pending(), "ap");
    assert_eq!(model.filter_value(), None);

    // The first keystroke's timer is stale by now
    send(
        &mut model,
        SelectMsg::KeyBufferFlush {
            generation: generations[0],
        },
    );
    assert_eq!(marked_label(&model), None);
    assert_eq!(model.key_buffer().pending(), "ap");

    let cmd = send(
        &mut model,
        SelectMsg::KeyBufferFlush {
            generation: generations[1],
        },
    );
    assert_eq!(marked_label(&model).as_deref(), Some("Apple"));
    assert!(!model.has_value());
    assert!(leaf_cmds(cmd)
        .iter()
        .any(|c| matches!(c, Cmd::ScrollIntoView { index: 0 })));
    assert_eq!(model.key_buffer().pending(), "");
}

#[test]
fn test_key_buffer_selects_when_closed() {
    let mut model = test_model(not_searchable(), fruits());
    let cmd = send(&mut model, SelectMsg::char('B'));
    let generation = match leaf_cmds(cmd).as_slice() {
        [Cmd::DebouncedKeyFlush {
            generation,
            delay_ms: 200,
        }] => *generation,
        other => panic!("expected a single flush timer, got {other:?}"),
    };

    send(&mut model, SelectMsg::KeyBufferFlush { generation });
    assert!(!model.is_open());
    assert_eq!(model.selected_labels(), vec!["Banana"]);
}

#[test]
fn test_key_buffer_timer_uses_configured_debounce() {
    let config = SelectConfig {
        key_debounce_ms: 350,
        ..not_searchable()
    };
    let mut model = test_model(config, fruits());
    let cmd = send(&mut model, SelectMsg::char('a'));
    assert!(leaf_cmds(cmd)
        .iter()
        .any(|c| matches!(c, Cmd::DebouncedKeyFlush { delay_ms: 350, .. })));
}

#[test]
fn test_key_buffer_without_match_keeps_state() {
    let mut model = test_model(not_searchable(), fruits());
    let generations = flush_generations(type_text(&mut model, "xy"));
    send(
        &mut model,
        SelectMsg::KeyBufferFlush {
            generation: generations[1],
        },
    );
    assert!(!model.has_value());
    assert_eq!(model.key_buffer().pending(), "");
}

#[test]
fn test_key_buffer_mark_uses_filtered_order() {
    let mut model = test_model(not_searchable(), fruits());
    press(&mut model, Key::Space);
    let banana = model_id_of(&model, "Banana");
    send(&mut model, SelectMsg::ItemHover(banana));

    let generations = flush_generations(type_text(&mut model, "a"));
    send(
        &mut model,
        SelectMsg::KeyBufferFlush {
            generation: generations[0],
        },
    );
    assert_eq!(marked_label(&model).as_deref(), Some("Apple"));
}
