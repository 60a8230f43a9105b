//! Benchmarks for pool building, filtering and keyboard navigation
//!
//! Run with: cargo bench filter

use picklist::config::{SelectConfig, SelectHooks};
use picklist::messages::{Key, SelectMsg};
use picklist::model::{ItemsList, SelectModel};
use picklist::update::update;
use serde_json::{json, Value};

#[global_allocator]
static ALLOC: divan::AllocProfiler = divan::AllocProfiler::system();

fn main() {
    divan::main();
}

const COUNTRIES: [&str; 6] = ["UK", "US", "FI", "NO", "DE", "JP"];

fn records(count: usize) -> Vec<Value> {
    (0..count)
        .map(|i| {
            json!({
                "id": i,
                "name": format!("Person {i} of the quick brown fox"),
                "country": COUNTRIES[i % COUNTRIES.len()],
            })
        })
        .collect()
}

fn people_config() -> SelectConfig {
    SelectConfig {
        label_field: "name".into(),
        ..SelectConfig::default()
    }
}

fn list(config: SelectConfig, count: usize) -> ItemsList {
    let mut list = ItemsList::new(config, SelectHooks::default());
    list.set_items(records(count));
    list
}

// ============================================================================
// Pool building
// ============================================================================

#[divan::bench(args = [1_000, 10_000, 100_000])]
fn set_items_flat(bencher: divan::Bencher, count: usize) {
    bencher
        .with_inputs(|| (ItemsList::new(people_config(), SelectHooks::default()), records(count)))
        .bench_local_values(|(mut list, raw)| {
            list.set_items(raw);
            list
        });
}

#[divan::bench(args = [1_000, 10_000, 100_000])]
fn set_items_grouped(bencher: divan::Bencher, count: usize) {
    let config = SelectConfig {
        group_by: Some("country".into()),
        ..people_config()
    };
    bencher
        .with_inputs(|| (ItemsList::new(config.clone(), SelectHooks::default()), records(count)))
        .bench_local_values(|(mut list, raw)| {
            list.set_items(raw);
            list
        });
}

// ============================================================================
// Filtering
// ============================================================================

#[divan::bench(args = [1_000, 10_000, 100_000])]
fn filter_substring(bencher: divan::Bencher, count: usize) {
    let mut list = list(people_config(), count);
    bencher.bench_local(|| {
        list.filter(divan::black_box("son 9"));
        divan::black_box(list.filtered_len());
    });
}

#[divan::bench(args = [1_000, 10_000, 100_000])]
fn filter_grouped_hide_selected(bencher: divan::Bencher, count: usize) {
    let config = SelectConfig {
        multiple: true,
        group_by: Some("country".into()),
        hide_selected: true,
        ..people_config()
    };
    let mut list = list(config, count);
    let ids: Vec<_> = list.items().iter().step_by(7).map(|o| o.id).collect();
    for id in ids {
        list.select(id);
    }
    bencher.bench_local(|| {
        list.filter(divan::black_box("fox"));
        divan::black_box(list.filtered_len());
    });
}

#[divan::bench(args = [1_000, 10_000])]
fn find_item_by_value(bencher: divan::Bencher, count: usize) {
    let list = list(people_config(), count);
    let target = records(count).pop().unwrap_or(Value::Null);
    bencher.bench_local(|| divan::black_box(list.find_item(&target)));
}

// ============================================================================
// Interaction
// ============================================================================

#[divan::bench(args = [1_000, 10_000])]
fn typing_filter(bencher: divan::Bencher, count: usize) {
    bencher
        .with_inputs(|| {
            SelectModel::with_items(people_config(), SelectHooks::default(), records(count))
                .unwrap()
        })
        .bench_local_values(|mut model| {
            for ch in "person 42".chars() {
                divan::black_box(update(&mut model, SelectMsg::char(ch)));
            }
            model
        });
}

#[divan::bench(args = [1_000, 10_000])]
fn arrow_navigation(bencher: divan::Bencher, count: usize) {
    let mut model =
        SelectModel::with_items(people_config(), SelectHooks::default(), records(count)).unwrap();
    update(&mut model, SelectMsg::Open);
    bencher.bench_local(|| {
        for _ in 0..100 {
            divan::black_box(update(&mut model, SelectMsg::key(Key::ArrowDown)));
        }
        for _ in 0..100 {
            divan::black_box(update(&mut model, SelectMsg::key(Key::ArrowUp)));
        }
        model.take_events();
    });
}
