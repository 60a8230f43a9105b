//! Free-text tags - building, deferred resolution, and the implicit commit on close

use serde_json::{Map, Value};

use super::dropdown;
use super::selection::select_option;
use crate::commands::Cmd;
use crate::config::TagResolution;
use crate::model::{set_path, CloseReason, SelectModel};

/// Commit the filter text as a tag
///
/// Uses the host's tag builder when supplied; a deferred build is stamped and
/// run by the runtime. With no filter text this just closes.
pub fn select_tag(model: &mut SelectModel) -> Option<Cmd> {
    let Some(term) = model.filter_value.clone() else {
        return dropdown::close(model, CloseReason::Explicit);
    };

    let Some(add_tag_fn) = model.items.hooks().add_tag_fn.clone() else {
        let value = tag_value(model, &term);
        return commit_tag(model, value);
    };
    match add_tag_fn(&term) {
        TagResolution::Ready(value) => commit_tag(model, value),
        TagResolution::Deferred(job) => {
            model.tag_request += 1;
            tracing::debug!(request = model.tag_request, %term, "deferred tag requested");
            Some(Cmd::ResolveTag {
                request: model.tag_request,
                job,
            })
        }
        TagResolution::Skip => {
            tracing::debug!(%term, "tag builder skipped term");
            None
        }
    }
}

fn commit_tag(model: &mut SelectModel, value: Value) -> Option<Cmd> {
    let id = model.items.add_item(value);
    select_option(model, id, true)
}

/// Completion of a deferred tag build
///
/// Only the latest request is honoured; failures are swallowed.
pub(crate) fn tag_resolved(
    model: &mut SelectModel,
    request: u64,
    result: Result<Value, String>,
) -> Option<Cmd> {
    if request != model.tag_request {
        tracing::debug!(
            "Skipping stale tag result: request {} != latest {}",
            request,
            model.tag_request
        );
        return None;
    }
    match result {
        Ok(value) => commit_tag(model, value),
        Err(err) => {
            tracing::debug!(%err, "deferred tag failed");
            None
        }
    }
}

/// Single-select close with unmatched free text keeps it as a tag
///
/// Does not consult the tag builder and never closes by itself.
pub(crate) fn commit_on_close(model: &mut SelectModel) -> Option<Cmd> {
    let config = model.config();
    if config.multiple || !config.add_tag || config.read_only {
        return None;
    }
    let term = model.filter_value.clone()?;
    if model.items.has_label(&term) {
        return None;
    }
    tracing::debug!(%term, "committing free text on close");
    let value = tag_value(model, &term);
    let id = model.items.add_item(value);
    select_option(model, id, false)
}

/// Default tag value: the text itself for primitive pools, else a record keyed by the label field
fn tag_value(model: &SelectModel, term: &str) -> Value {
    let text = Value::String(term.to_string());
    if model.items.is_primitive() || model.items.items().is_empty() {
        return text;
    }
    let mut record = Value::Object(Map::new());
    set_path(&mut record, &model.config().label_field, text);
    record
}
