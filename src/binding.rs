//! Form binding - values written in from the host form and the model pushed back out
//!
//! Written-in values are resolved against the pool (bound field, custom
//! comparator, or equality). Values with no counterpart become detached
//! placeholder options so they can still be displayed.

use serde::Serialize;
use serde_json::{Map, Value};
use thiserror::Error;

use crate::events::{Outbox, SelectEvent};
use crate::model::{display_value, lookup_path, resolve_nested, set_path, ItemsList, SelectOption};

/// Shape errors for written-in values; the write is rejected with no state change
#[derive(Debug, Error, PartialEq, Eq)]
pub enum BindingError {
    #[error("a multiple select expects an array value")]
    ExpectedArray,

    #[error("objects cannot be written in while bind_value '{0}' is set; write the bound field instead")]
    ObjectWithBindValue(String),
}

/// Values that mean "nothing selected"
pub fn is_empty_value(value: &Value, multiple: bool) -> bool {
    match value {
        Value::Null => true,
        Value::Array(values) => values.is_empty(),
        Value::String(s) => multiple && s.is_empty(),
        _ => false,
    }
}

/// Check a written-in value against the selection mode and binding
pub fn validate_write_value(items: &ItemsList, value: &Value) -> Result<(), BindingError> {
    let config = items.config();
    if is_empty_value(value, config.multiple) {
        return Ok(());
    }
    if config.multiple && !value.is_array() {
        return Err(BindingError::ExpectedArray);
    }

    let Some(bind_value) = config.bind_value.as_deref() else {
        return Ok(());
    };
    if items.hooks().compare_with.is_some() {
        return Ok(());
    }
    let has_object = match value {
        Value::Array(values) => values.iter().any(Value::is_object),
        other => other.is_object(),
    };
    if has_object {
        return Err(BindingError::ObjectWithBindValue(bind_value.to_string()));
    }
    Ok(())
}

/// Replace the selection with a value written in from the host form
///
/// Returns the validation error and leaves the selection untouched when the
/// value has the wrong shape.
pub fn write_value(items: &mut ItemsList, value: Value) -> Result<(), BindingError> {
    validate_write_value(items, &value)?;

    items.clear_selected();
    if is_empty_value(&value, items.config().multiple) {
        return Ok(());
    }

    let entries = match value {
        Value::Array(values) => values,
        other => vec![other],
    };
    for entry in entries {
        match items.find_item(&entry) {
            Some(id) => {
                items.select_bound(id);
            }
            None => {
                let placeholder = placeholder_for(items, entry);
                if items.select_detached(placeholder).is_none() {
                    tracing::debug!("written-in value not selected: max selected items reached");
                }
            }
        }
    }
    Ok(())
}

/// Wrap an unmatched written-in value so it carries a displayable label
fn placeholder_for(items: &ItemsList, value: Value) -> Value {
    let config = items.config();
    match config.bind_value.as_deref() {
        Some(bind_value) if !value.is_object() && !items.is_primitive() => {
            let mut record = Value::Object(Map::new());
            set_path(&mut record, &config.label_field, Value::String(display_value(&value)));
            set_path(&mut record, bind_value, value);
            record
        }
        _ => value,
    }
}

/// The values derived from the current selection
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ModelOutput {
    /// Pushed to the bound form: bound fields (or whole items), array in multi mode
    pub model: Value,
    /// Payload of the change notification: whole items
    pub changed: Value,
    /// Label(s) of the selection
    pub searched: Value,
}

/// Derive the outward model from the current selection
pub fn produce_model(items: &ItemsList) -> ModelOutput {
    let config = items.config();
    let selected = items.selected_items();

    let model: Vec<Value> = selected
        .iter()
        .map(|option| bound_model_value(items, option))
        .collect();
    let changed: Vec<Value> = selected.iter().map(|option| option.value.clone()).collect();
    let searched: Vec<Value> = selected
        .iter()
        .map(|option| Value::String(option.label.clone()))
        .collect();

    if config.multiple {
        ModelOutput {
            model: Value::Array(model),
            changed: Value::Array(changed),
            searched: Value::Array(searched),
        }
    } else {
        ModelOutput {
            model: first_or_null(model),
            changed: first_or_null(changed),
            searched: first_or_null(searched),
        }
    }
}

fn bound_model_value(items: &ItemsList, option: &SelectOption) -> Value {
    let config = items.config();
    let Some(bind_value) = config.bind_value.as_deref() else {
        return option.value.clone();
    };
    if option.is_group() {
        return config
            .group_by
            .as_deref()
            .and_then(|group_by| lookup_path(&option.value, group_by))
            .cloned()
            .unwrap_or(Value::Null);
    }
    resolve_nested(&option.value, bind_value).clone()
}

fn first_or_null(values: Vec<Value>) -> Value {
    values.into_iter().next().unwrap_or(Value::Null)
}

/// Queue the model, change and search notifications for the current selection
pub(crate) fn emit_model(items: &ItemsList, outbox: &mut Outbox) {
    let output = produce_model(items);
    outbox.emit(SelectEvent::ModelChanged(output.model));
    outbox.emit(SelectEvent::Changed(output.changed));
    outbox.emit(SelectEvent::Searched(output.searched));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{SelectConfig, SelectHooks};
    use serde_json::json;

    fn list(config: SelectConfig, items: Vec<Value>) -> ItemsList {
        let mut list = ItemsList::new(config, SelectHooks::default());
        list.set_items(items);
        list
    }

    #[test]
    fn test_empty_values() {
        assert!(is_empty_value(&Value::Null, false));
        assert!(is_empty_value(&json!([]), false));
        assert!(is_empty_value(&json!(""), true));
        assert!(!is_empty_value(&json!(""), false));
        assert!(!is_empty_value(&json!(0), true));
    }

    #[test]
    fn test_multiple_requires_array() {
        let items = list(SelectConfig::multiple(), vec![json!("a")]);
        assert_eq!(
            validate_write_value(&items, &json!("a")),
            Err(BindingError::ExpectedArray)
        );
        assert_eq!(validate_write_value(&items, &json!(["a"])), Ok(()));
    }

    #[test]
    fn test_object_rejected_with_bind_value() {
        let config = SelectConfig {
            bind_value: Some("id".into()),
            ..SelectConfig::single()
        };
        let items = list(config, vec![json!({"id": 1, "label": "A"})]);
        assert_eq!(
            validate_write_value(&items, &json!({"id": 1})),
            Err(BindingError::ObjectWithBindValue("id".into()))
        );
        assert_eq!(validate_write_value(&items, &json!(1)), Ok(()));
    }

    #[test]
    fn test_invalid_write_keeps_selection() {
        let mut items = list(SelectConfig::multiple(), vec![json!("a"), json!("b")]);
        write_value(&mut items, json!(["a"])).unwrap();
        assert!(write_value(&mut items, json!("b")).is_err());
        assert_eq!(items.selected_items()[0].label, "a");
    }

    #[test]
    fn test_placeholder_for_unmatched_bound_scalar() {
        let config = SelectConfig {
            bind_value: Some("id".into()),
            ..SelectConfig::single()
        };
        let mut items = list(config, vec![json!({"id": 1, "label": "A"})]);
        write_value(&mut items, json!(7)).unwrap();

        let selected = items.selected_items();
        assert_eq!(selected.len(), 1);
        assert_eq!(selected[0].label, "7");
        assert_eq!(selected[0].value, json!({"id": 7, "label": "7"}));
        assert_eq!(produce_model(&items).model, json!(7));
    }

    #[test]
    fn test_placeholder_for_unmatched_primitive_in_single_mode() {
        let mut items = list(SelectConfig::single(), vec![json!("a"), json!("b")]);
        write_value(&mut items, json!("zzz")).unwrap();
        assert_eq!(items.selected_len(), 1);
        assert_eq!(items.selected_items()[0].label, "zzz");
        assert!(items.has_selection());
    }

    #[test]
    fn test_produce_model_single_and_multiple() {
        let mut single = list(SelectConfig::single(), vec![json!("a"), json!("b")]);
        assert_eq!(produce_model(&single).model, Value::Null);
        write_value(&mut single, json!("b")).unwrap();
        let output = produce_model(&single);
        assert_eq!(output.model, json!("b"));
        assert_eq!(output.searched, json!("b"));

        let mut multi = list(SelectConfig::multiple(), vec![json!("a"), json!("b")]);
        write_value(&mut multi, json!(["b", "a"])).unwrap();
        assert_eq!(produce_model(&multi).changed, json!(["b", "a"]));
    }
}
