use criterion::{Criterion, criterion_group, criterion_main};
use solvra_gremlin::structure::modern;
use solvra_gremlin::{Column, GraphTraversalSource, Order, Traversal, anon};

fn pipeline(g: &GraphTraversalSource) -> Traversal {
    g.v()
        .out()
        .repeat(anon::out().in_())
        .times(2)
        .unwrap()
        .group_count()
        .by(anon::out_e().count())
        .unwrap()
        .select(Column::Keys)
        .order()
        .by_order(Order::Desc)
        .unwrap()
}

fn bench_bytecode(c: &mut Criterion) {
    let g = GraphTraversalSource::new(modern().unwrap());
    let traversal = pipeline(&g);
    c.bench_function("bytecode_hash", |b| {
        b.iter(|| traversal.bytecode().hash_code())
    });
    c.bench_function("bytecode_clone", |b| b.iter(|| traversal.bytecode().clone()));
}

fn bench_choose(c: &mut Criterion) {
    let g = GraphTraversalSource::new(modern().unwrap());
    c.bench_function("choose_out_count", |b| {
        b.iter(|| {
            let _ = g
                .v()
                .choose(anon::out().count())
                .option(2, anon::values("name"))
                .and_then(|t| t.option(3, anon::value_map()))
                .and_then(Traversal::to_list)
                .unwrap();
        })
    });
}

criterion_group!(benches, bench_bytecode, bench_choose);
criterion_main!(benches);
