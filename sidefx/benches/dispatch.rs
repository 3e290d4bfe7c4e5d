//! Benchmarks for per-keypress dispatch cost.

use criterion::{Criterion, black_box, criterion_group, criterion_main};
use std::cell::Cell;
use std::collections::HashMap;
use std::rc::Rc;
use vim_sidefx::{
    Count, Host, InputMode, MappingSpec, Options, Result, SideEffects, Trigger,
};

/// Mapping table without any failure modes.
#[derive(Default)]
struct BenchHost {
    table: HashMap<(InputMode, String), MappingSpec>,
}

impl BenchHost {
    fn spec(&self, mode: InputMode, keys: &str) -> MappingSpec {
        self.table[&(mode, keys.to_string())].clone()
    }
}

impl Host for BenchHost {
    fn install(&mut self, spec: &MappingSpec) -> Result<()> {
        self.table
            .insert((spec.mode, spec.trigger.keys()), spec.clone());
        Ok(())
    }

    fn remove(&mut self, mode: InputMode, trigger: &Trigger) -> Result<()> {
        self.table.remove(&(mode, trigger.keys()));
        Ok(())
    }
}

fn bench_dispatch(c: &mut Criterion) {
    let fx = SideEffects::new(BenchHost::default());
    let hits = Rc::new(Cell::new(0u64));

    // Pad the registry so lookups are not against a single entry.
    for i in 0..500 {
        fx.set_up_idempotent(|| {}, Options::new().named(format!("pad.{i}")))
            .unwrap();
    }

    let h = Rc::clone(&hits);
    fx.set_up_idempotent(move || h.set(h.get() + 1), Options::new().named("idem"))
        .unwrap();
    let h = Rc::clone(&hits);
    fx.set_up_repeatable(move || h.set(h.get() + 1), Options::new().named("rep"))
        .unwrap();
    let h = Rc::clone(&hits);
    fx.set_up_with_count(move |n| h.set(h.get() + u64::from(n)), Options::new().named("count"))
        .unwrap();

    let idem = fx.host().spec(InputMode::Normal, "<Plug>(idem)");
    let rep_op = fx.host().spec(InputMode::OperatorPending, "<Plug>(rep)");
    let count_v = fx.host().spec(InputMode::VisualSelect, "<Plug>(count)");

    let mut group = c.benchmark_group("dispatch");
    group.bench_function("idempotent_normal", |b| {
        b.iter(|| fx.run(black_box(&idem), Count::NONE).unwrap())
    });
    group.bench_function("repeatable_pending_operator_x5", |b| {
        b.iter(|| fx.run(black_box(&rep_op), Count(5)).unwrap())
    });
    group.bench_function("with_count_selection", |b| {
        b.iter(|| fx.run(black_box(&count_v), Count(7)).unwrap())
    });
    group.finish();

    black_box(hits.get());
}

fn bench_set_up_clear(c: &mut Criterion) {
    let fx = SideEffects::new(BenchHost::default());
    c.bench_function("set_up_clear_nvo", |b| {
        b.iter(|| {
            let id = fx
                .set_up_repeatable(|| {}, Options::new().named("cycle"))
                .unwrap();
            fx.clear_one(black_box(id)).unwrap();
        })
    });
}

criterion_group!(benches, bench_dispatch, bench_set_up_clear);
criterion_main!(benches);
