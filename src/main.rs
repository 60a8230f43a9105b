use std::fs;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use serde::Serialize;
use serde_json::Value;

use picklist::binding::{produce_model, ModelOutput};
use picklist::cli::{parse_script, CliArgs, OutputFormat, ScriptStep};
use picklist::config::{SelectConfig, SelectHooks};
use picklist::events::SelectEvent;
use picklist::messages::SelectMsg;
use picklist::model::SelectModel;
use picklist::runtime::{Host, Runtime};

/// Host without a screen: records what a renderer would have been asked to do
#[derive(Debug, Default)]
struct HeadlessHost {
    redraws: usize,
    last_scrolled: Option<usize>,
    events: Vec<SelectEvent>,
}

impl Host for HeadlessHost {
    fn scroll_into_view(&mut self, index: usize) {
        self.last_scrolled = Some(index);
    }

    fn redraw(&mut self, _model: &SelectModel) {
        self.redraws += 1;
    }

    fn notify(&mut self, event: SelectEvent) {
        self.events.push(event);
    }
}

#[derive(Debug, Serialize)]
struct Report {
    open: bool,
    filter: Option<String>,
    marked: Option<String>,
    visible: Vec<String>,
    selected: Vec<String>,
    model: ModelOutput,
    events: Vec<SelectEvent>,
    redraws: usize,
    last_scrolled: Option<usize>,
}

impl Report {
    fn collect(runtime: &mut Runtime<HeadlessHost>) -> Self {
        let events = std::mem::take(&mut runtime.host_mut().events);
        let model = runtime.model();
        let items = model.items();
        Self {
            open: model.is_open(),
            filter: model.filter_value().map(str::to_string),
            marked: model.marked_item().map(|option| option.label.clone()),
            visible: items
                .filtered_items()
                .into_iter()
                .map(|option| option.label.clone())
                .collect(),
            selected: model.selected_labels(),
            model: produce_model(items),
            events,
            redraws: runtime.host().redraws,
            last_scrolled: runtime.host().last_scrolled,
        }
    }
}

fn main() -> Result<()> {
    picklist::tracing::init();
    let args = CliArgs::parse();

    let raw = fs::read_to_string(&args.items)
        .with_context(|| format!("Failed to read items from {}", args.items.display()))?;
    let items: Vec<Value> = serde_json::from_str(&raw)
        .with_context(|| format!("{} must hold a JSON array", args.items.display()))?;

    let mut config = match &args.config {
        Some(path) => SelectConfig::load_from(path)?,
        None => SelectConfig::load(),
    };
    if args.multiple {
        config.multiple = true;
    }
    let settle = Duration::from_millis(config.key_debounce_ms + 50);
    let steps = parse_script(&args.keys)?;

    let model = SelectModel::with_items(config, SelectHooks::default(), items)?;
    let mut runtime = Runtime::new(model, HeadlessHost::default());

    if let Some(value) = &args.value {
        let value: Value = serde_json::from_str(value).context("--value must be JSON")?;
        runtime.dispatch(SelectMsg::WriteValue(value));
    }

    for step in steps {
        match step {
            ScriptStep::Send(msg) => {
                runtime.dispatch(msg);
                runtime.pump();
            }
            ScriptStep::Wait(duration) => {
                runtime.pump_for(duration);
            }
        }
    }
    // Let a trailing key buffer flush land
    runtime.pump_for(settle);

    let report = Report::collect(&mut runtime);
    match args.format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&report)?),
        OutputFormat::Yaml => print!("{}", serde_yaml::to_string(&report)?),
    }
    Ok(())
}
