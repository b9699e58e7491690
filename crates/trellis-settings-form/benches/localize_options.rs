use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use serde_json::{json, Value};
use std::rc::Rc;
use trellis_settings_form::{
    build_form, localize_options, DataSourceEntry, Debouncer, FormContext, FormKey,
};
use trellis_testing::{registry_with_locales, sample_locales, sample_schema, ManualIdleScheduler, NodeFixture};

const OPTION_COUNT_SAMPLES: &[usize] = &[8, 64, 512];
const LIST_ITEM_SAMPLES: &[usize] = &[16, 128];

fn authored_options(count: usize) -> Vec<DataSourceEntry> {
    (0..count)
        .map(|index| DataSourceEntry::from_value(json!({ "label": format!("Option {index}"), "value": index })))
        .collect()
}

fn localized_labels(count: usize) -> Vec<Value> {
    (0..count)
        .map(|index| {
            if index % 4 == 0 {
                json!(format!("@icon-{index}: Option {index}"))
            } else {
                json!(format!("Localized {index}"))
            }
        })
        .collect()
}

fn bench_relabel(c: &mut Criterion) {
    let mut group = c.benchmark_group("localize_options");
    for &count in OPTION_COUNT_SAMPLES {
        let existing = authored_options(count);
        let localized = localized_labels(count);
        group.bench_with_input(BenchmarkId::new("relabel", count), &count, |b, _| {
            b.iter(|| {
                let options = localize_options(Some(existing.as_slice()), Some(localized.as_slice()));
                black_box(options);
            });
        });
        group.bench_with_input(BenchmarkId::new("filter", count), &count, |b, _| {
            b.iter(|| {
                let options = localize_options(Some(existing.as_slice()), None);
                black_box(options);
            });
        });
    }
    group.finish();
}

fn bench_build_form(c: &mut Criterion) {
    let mut group = c.benchmark_group("build_form");
    let registry = registry_with_locales(&sample_locales());
    let scheduler = Rc::new(ManualIdleScheduler::new());
    let context = FormContext {
        registry,
        snapshot_debouncer: Rc::new(Debouncer::new(scheduler, std::time::Duration::from_millis(1000))),
        effects: Vec::new(),
    };
    for &items in LIST_ITEM_SAMPLES {
        let rows: Vec<Value> = (0..items).map(|index| json!({ "name": format!("row {index}") })).collect();
        let node = NodeFixture::new("bench")
            .schema(sample_schema())
            .props(json!({ "list": rows }))
            .build();
        group.bench_with_input(BenchmarkId::new("list_items", items), &items, |b, _| {
            b.iter(|| {
                let form = build_form(&FormKey::new(Rc::clone(&node), None, None), &context);
                black_box(form.is_ok());
            });
        });
    }
    group.finish();
}

criterion_group!(localization, bench_relabel, bench_build_form);
criterion_main!(localization);
