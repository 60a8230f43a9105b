//! Shared test helpers for integration tests
//!
//! Note: Functions may appear unused because each test file compiles separately.

#![allow(dead_code)]

use picklist::commands::Cmd;
use picklist::config::{SelectConfig, SelectHooks};
use picklist::events::SelectEvent;
use picklist::messages::{Key, SelectMsg};
use picklist::model::{ItemsList, OptionId, SelectModel};
use picklist::update::update;
use serde_json::{json, Value};

/// `["Apple", "Apricot", "Banana"]`
pub fn fruits() -> Vec<Value> {
    vec![json!("Apple"), json!("Apricot"), json!("Banana")]
}

/// Records with an `id`, a `name` label and a `country` group key
pub fn people() -> Vec<Value> {
    vec![
        json!({"id": 1, "name": "Ada", "country": "UK"}),
        json!({"id": 2, "name": "Grace", "country": "US"}),
        json!({"id": 3, "name": "Alan", "country": "UK"}),
        json!({"id": 4, "name": "Linus", "country": "FI", "disabled": true}),
    ]
}

pub fn people_config() -> SelectConfig {
    SelectConfig {
        label_field: "name".into(),
        ..SelectConfig::default()
    }
}

/// Create a model with the given config and pool
pub fn test_model(config: SelectConfig, items: Vec<Value>) -> SelectModel {
    test_model_with_hooks(config, SelectHooks::default(), items)
}

pub fn test_model_with_hooks(
    config: SelectConfig,
    hooks: SelectHooks,
    items: Vec<Value>,
) -> SelectModel {
    SelectModel::with_items(config, hooks, items).expect("valid test config")
}

/// Create an engine with the given config and pool
pub fn test_list(config: SelectConfig, items: Vec<Value>) -> ItemsList {
    let mut list = ItemsList::new(config, SelectHooks::default());
    list.set_items(items);
    list
}

/// Run a message through update
pub fn send(model: &mut SelectModel, msg: SelectMsg) -> Option<Cmd> {
    update(model, msg)
}

pub fn press(model: &mut SelectModel, key: Key) -> Option<Cmd> {
    update(model, SelectMsg::Key(key))
}

/// Type text one character at a time
pub fn type_text(model: &mut SelectModel, text: &str) -> Vec<Cmd> {
    text.chars()
        .filter_map(|ch| update(model, SelectMsg::char(ch)))
        .collect()
}

/// Id of the pool option with this label
pub fn id_of(list: &ItemsList, label: &str) -> OptionId {
    list.items()
        .iter()
        .find(|option| option.label == label)
        .map(|option| option.id)
        .unwrap_or_else(|| panic!("no option labeled {label}"))
}

pub fn model_id_of(model: &SelectModel, label: &str) -> OptionId {
    id_of(model.items(), label)
}

pub fn selected_labels(list: &ItemsList) -> Vec<String> {
    list.selected_items()
        .into_iter()
        .map(|option| option.label.clone())
        .collect()
}

pub fn visible_labels(list: &ItemsList) -> Vec<String> {
    list.filtered_items()
        .into_iter()
        .map(|option| option.label.clone())
        .collect()
}

pub fn marked_label(model: &SelectModel) -> Option<String> {
    model.marked_item().map(|option| option.label.clone())
}

/// Flatten an optional command into its leaf commands
pub fn leaf_cmds(cmd: Option<Cmd>) -> Vec<Cmd> {
    cmd.map(Cmd::flatten).unwrap_or_default()
}

/// Count queued events matching a predicate
pub fn count_events(model: &SelectModel, pred: impl Fn(&SelectEvent) -> bool) -> usize {
    model.events().iter().filter(|event| pred(event)).count()
}
