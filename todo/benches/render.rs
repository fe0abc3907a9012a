//! Rendering benchmarks
//!
//! Every event redraws the whole list, so frame computation and markup
//! generation are on the hot path of each interaction.
//!
//! Run with: `cargo bench -p todo`

#![allow(missing_docs)] // Benchmarks don't need extensive docs

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use todo::html::render_list_html;
use todo::view;
use todo::{Filter, Todo, TodoId, TodoState};

fn state_with(count: u64) -> TodoState {
    TodoState::from_todos(
        (1..=count)
            .map(|n| Todo {
                id: TodoId::new(1_700_000_000_000 + n),
                text: format!("Task number {n} & <friends>"),
                completed: n % 3 == 0,
            })
            .collect(),
    )
}

fn bench_frame(c: &mut Criterion) {
    let mut group = c.benchmark_group("frame");

    for count in [10, 100, 1_000] {
        let mut state = state_with(count);
        group.throughput(Throughput::Elements(count));

        for filter in Filter::ALL {
            state.filter = filter;
            group.bench_with_input(
                BenchmarkId::new(filter.tag(), count),
                &state,
                |b, state| b.iter(|| view::render(black_box(state))),
            );
        }
    }

    group.finish();
}

fn bench_markup(c: &mut Criterion) {
    let mut group = c.benchmark_group("markup");

    for count in [10, 100, 1_000] {
        let list = view::render_list(&state_with(count));
        group.throughput(Throughput::Elements(count));
        group.bench_with_input(BenchmarkId::from_parameter(count), &list, |b, list| {
            b.iter(|| render_list_html(black_box(list)));
        });
    }

    group.finish();
}

criterion_group!(benches, bench_frame, bench_markup);
criterion_main!(benches);
