//! Criterion benchmarks for the solim-core pipeline
//!
//! Run with: cargo bench -p solim-core
#![allow(missing_docs)]

use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use solim_core::{
    ColumnState, MAX_COLUMNS, MAX_INPUTS, Octave, RandomTrigger, SolimCore, SolimValueTransform,
    SortOrder, SortRelative, Value, ValueTransform, limit_value_if,
};

const COLUMN_COUNTS: &[usize] = &[1, 2, 4, 8];

fn busy_inputs(offset: f32) -> [Value; MAX_INPUTS] {
    core::array::from_fn(|i| {
        let value = Value::new(offset + i as f32 * 1.37 - 5.0);
        match i % 3 {
            0 => value.with_octave(Octave::Higher, SortRelative::Before),
            1 => value.with_octave(Octave::Lower, SortRelative::After),
            _ => value,
        }
    })
}

fn fill_column(column: &mut ColumnState, offset: f32) {
    column.set_inputs(&busy_inputs(offset));
    column.set_limits(-2.0, 3.0);
    column.sort = SortOrder::Ascending;
    column.output_octaves = [
        Octave::Lower,
        Octave::None,
        Octave::Higher,
        Octave::None,
        Octave::None,
        Octave::None,
        Octave::None,
        Octave::None,
    ];
}

fn bench_limit(c: &mut Criterion) {
    c.bench_function("limit_value_if", |b| {
        b.iter(|| {
            for i in 0..64 {
                black_box(limit_value_if(black_box(i as f32 * 0.73 - 20.0), -1.0, 3.0));
            }
        });
    });
}

fn bench_transform(c: &mut Criterion) {
    let mut group = c.benchmark_group("SolimValueTransform");

    let mut column = ColumnState::new();
    fill_column(&mut column, 0.0);

    group.bench_function("process_values", |b| {
        b.iter(|| SolimValueTransform.process_values(black_box(&mut column)));
    });

    SolimValueTransform.process_values(&mut column);
    group.bench_function("process_results", |b| {
        b.iter(|| SolimValueTransform.process_results(black_box(&mut column)));
    });

    group.finish();
}

fn bench_core(c: &mut Criterion) {
    let mut group = c.benchmark_group("SolimCore");

    for &columns in COLUMN_COUNTS {
        // every tick changes the inputs, so nothing is skipped
        group.bench_with_input(BenchmarkId::new("changing", columns), &columns, |b, &columns| {
            let mut core = SolimCore::from_seed(1);
            let mut tick = 0u32;
            b.iter(|| {
                tick = tick.wrapping_add(1);
                for i in 0..columns {
                    fill_column(core.inactive_values_mut(i), (tick % 7) as f32 * 0.01);
                }
                core.process_and_activate_inactive_values(columns, None);
                black_box(core.active_values(0).results()[0]);
            });
        });

        // identical ticks: both stages are skipped
        group.bench_with_input(BenchmarkId::new("steady", columns), &columns, |b, &columns| {
            let mut core = SolimCore::from_seed(1);
            b.iter(|| {
                for i in 0..columns {
                    fill_column(core.inactive_values_mut(i), 0.0);
                }
                core.process_and_activate_inactive_values(columns, None);
                black_box(core.active_values(0).results()[0]);
            });
        });

        group.bench_with_input(BenchmarkId::new("shuffling", columns), &columns, |b, &columns| {
            let mut core = SolimCore::from_seed(1);
            let triggers = [RandomTrigger::All; MAX_COLUMNS];
            b.iter(|| {
                for i in 0..columns {
                    fill_column(core.inactive_values_mut(i), 0.0);
                }
                core.process_and_activate_inactive_values(columns, Some(&triggers));
                black_box(core.active_values(0).results()[0]);
            });
        });
    }

    group.finish();
}

criterion_group!(benches, bench_limit, bench_transform, bench_core);

criterion_main!(benches);
