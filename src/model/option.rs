//! Option records - normalized candidates derived from raw items
//!
//! Raw items arrive as `serde_json::Value`s: records (objects) or primitives.
//! Each one becomes a [`SelectOption`] with a stable id, a display label
//! computed once at build time, and a [`OptionKind`] tag so later code never
//! has to re-inspect the raw shape.

use std::sync::atomic::{AtomicU64, Ordering};

use serde::Serialize;
use serde_json::{Map, Value};

static NEXT_OPTION_ID: AtomicU64 = AtomicU64::new(1);

/// Unique identifier of an option, generated once when the option is built
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct OptionId(pub u64);

impl OptionId {
    fn next() -> Self {
        OptionId(NEXT_OPTION_ID.fetch_add(1, Ordering::Relaxed))
    }

    /// Element id used by renderers to link the input to the active option
    pub fn html_id(self) -> String {
        format!("opt-{:x}", self.0)
    }
}

/// Shape of the raw item an option was built from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum OptionKind {
    /// A string, number or boolean that is both label and value
    Primitive,
    /// A record whose label is read through the configured label field
    Object,
    /// Synthetic header grouping the entries that share a group key
    GroupHeader,
}

/// A normalized, markable and selectable candidate
#[derive(Debug, Clone, Serialize)]
pub struct SelectOption {
    pub id: OptionId,
    /// Position in the full unfiltered list (None for detached options)
    pub index: Option<usize>,
    pub kind: OptionKind,
    pub label: String,
    pub value: Value,
    pub disabled: bool,
    /// Group header this option belongs to
    pub parent: Option<OptionId>,
    /// Members of a group header, in list order
    pub children: Vec<OptionId>,
    /// Free-text tag not present in the original pool
    pub is_tag: bool,
    pub(crate) selected: bool,
}

impl SelectOption {
    pub(crate) fn new(kind: OptionKind, label: String, value: Value) -> Self {
        Self {
            id: OptionId::next(),
            index: None,
            kind,
            label,
            value,
            disabled: false,
            parent: None,
            children: Vec::new(),
            is_tag: false,
            selected: false,
        }
    }

    /// Build an option from one raw item
    ///
    /// `primitive` is the list-wide shape decided by the first item.
    pub fn from_raw(raw: Value, label_field: &str, primitive: bool) -> Self {
        let label = match &raw {
            Value::Object(_) => lookup_path(&raw, label_field)
                .map(display_value)
                .unwrap_or_default(),
            other => display_value(other),
        };
        let disabled = raw
            .get("disabled")
            .and_then(Value::as_bool)
            .unwrap_or(false);
        let kind = if primitive {
            OptionKind::Primitive
        } else {
            OptionKind::Object
        };

        let mut option = Self::new(kind, label, raw);
        option.disabled = disabled;
        option
    }

    pub fn is_selected(&self) -> bool {
        self.selected
    }

    pub fn is_group(&self) -> bool {
        self.kind == OptionKind::GroupHeader
    }

    pub fn html_id(&self) -> String {
        self.id.html_id()
    }
}

/// Whether the first item of a pool makes the whole pool primitive
pub fn is_primitive_pool(raw_items: &[Value]) -> bool {
    raw_items.first().is_some_and(|first| !first.is_object())
}

/// Normalize raw items into an ordered option list
///
/// With `group_by`, entries sharing a group key are placed after a synthetic
/// header (groups ordered by first appearance). Entries without a key stay
/// ungrouped at the position of their bucket. Every option gets its final
/// flattened `index`.
pub fn build_options(
    raw_items: Vec<Value>,
    label_field: &str,
    group_by: Option<&str>,
) -> Vec<SelectOption> {
    let primitive = is_primitive_pool(&raw_items);

    let mut options: Vec<SelectOption> = match group_by {
        None => raw_items
            .into_iter()
            .map(|raw| SelectOption::from_raw(raw, label_field, primitive))
            .collect(),
        Some(group_field) => build_grouped(raw_items, label_field, group_field, primitive),
    };

    for (index, option) in options.iter_mut().enumerate() {
        option.index = Some(index);
    }
    options
}

fn build_grouped(
    raw_items: Vec<Value>,
    label_field: &str,
    group_field: &str,
    primitive: bool,
) -> Vec<SelectOption> {
    // Buckets in order of first appearance; `None` key collects ungrouped entries
    let mut buckets: Vec<(Option<Value>, Vec<SelectOption>)> = Vec::new();

    for raw in raw_items {
        let key = lookup_path(&raw, group_field).cloned();
        let option = SelectOption::from_raw(raw, label_field, primitive);
        match buckets.iter_mut().find(|(k, _)| *k == key) {
            Some((_, members)) => members.push(option),
            None => buckets.push((key, vec![option])),
        }
    }

    let mut options = Vec::new();
    for (key, mut members) in buckets {
        let Some(key) = key else {
            options.extend(members);
            continue;
        };

        let mut header_value = Map::new();
        header_value.insert(group_field.to_string(), key.clone());
        let mut header = SelectOption::new(
            OptionKind::GroupHeader,
            display_value(&key),
            Value::Object(header_value),
        );
        for member in &mut members {
            member.parent = Some(header.id);
        }
        header.children = members.iter().map(|m| m.id).collect();
        options.push(header);
        options.extend(members);
    }
    options
}

/// Default matcher: case-insensitive substring match on the label
pub fn default_matches(option: &SelectOption, term: &str) -> bool {
    option.label.to_lowercase().contains(&term.to_lowercase())
}

/// Read a dotted field path (`a.b.c`), returning None if any segment is missing
pub fn lookup_path<'a>(value: &'a Value, path: &str) -> Option<&'a Value> {
    path.split('.')
        .try_fold(value, |current, key| current.as_object()?.get(key))
}

/// Read a dotted field path, falling back to the whole value when it does not resolve
///
/// Primitives are returned unchanged regardless of the path.
pub fn resolve_nested<'a>(value: &'a Value, path: &str) -> &'a Value {
    if !value.is_object() {
        return value;
    }
    lookup_path(value, path).unwrap_or(value)
}

/// Write `leaf` at a dotted path, creating (or replacing non-record) intermediate records
pub fn set_path(target: &mut Value, path: &str, leaf: Value) {
    let mut current = target;
    let mut keys = path.split('.').peekable();
    while let Some(key) = keys.next() {
        if !current.is_object() {
            *current = Value::Object(Map::new());
        }
        let map = match { current } {
            Value::Object(map) => map,
            _ => return,
        };
        if keys.peek().is_none() {
            map.insert(key.to_string(), leaf);
            return;
        }
        current = map
            .entry(key.to_string())
            .or_insert_with(|| Value::Object(Map::new()));
    }
}

/// String form used for labels: strings unquoted, null empty, the rest as JSON
pub fn display_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}
