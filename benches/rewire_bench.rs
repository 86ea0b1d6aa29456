use criterion::{black_box, criterion_group, criterion_main, BatchSize, BenchmarkId, Criterion};
use onnxir::fingerprint;
use onnxir::{
    create_value_mapping, replace_all_uses_with, replace_nodes_and_values, Graph, NodeId, NodeSpec,
    Value, ValueId,
};

// KPI-aligned benchmark scenarios.
// Every scenario builds a linear chain `x -> Op -> Op -> ... -> y`, optionally
// with a fan-out of readers on one value, and measures one editing step.

/// Chain of `len` unary nodes. Returns the graph and its node order.
fn chain(len: usize) -> (Graph, Vec<NodeId>) {
    let mut g = Graph::new("chain");
    let mut prev = g.add_input(Value::named("x"));
    let mut nodes = Vec::with_capacity(len);
    for i in 0..len {
        let n = g
            .append_node(
                NodeSpec::new("", "Relu")
                    .input(prev)
                    .named_outputs([format!("t{}", i)]),
            )
            .unwrap();
        prev = g.node(n).outputs()[0];
        nodes.push(n);
    }
    g.push_output(prev).unwrap();
    (g, nodes)
}

/// `x` read by `fan` consumers, plus a detached replacement producer.
fn fan_out(fan: usize) -> (Graph, ValueId, ValueId) {
    let mut g = Graph::new("fan");
    let x = g.add_input(Value::named("x"));
    let head = g.append_node(NodeSpec::new("", "Head").input(x)).unwrap();
    let h = g.node(head).outputs()[0];
    for _ in 0..fan {
        g.append_node(NodeSpec::new("", "Neg").input(h)).unwrap();
    }
    let alt = g.create_node(NodeSpec::new("", "Alt").input(x)).unwrap();
    let a = g.node(alt).outputs()[0];
    (g, h, a)
}

// KPI: replace_all_uses_with vs number of consumers.
fn bench_kpi_rauw_fan_out(c: &mut Criterion) {
    let mut group = c.benchmark_group("kpi/rauw_fan_out");

    for fan in [1_usize, 16, 256, 4096] {
        group.bench_with_input(BenchmarkId::from_parameter(fan), &fan, |b, &fan| {
            b.iter_batched(
                || fan_out(fan),
                |(mut g, from, to)| {
                    replace_all_uses_with(&mut g, from, to).unwrap();
                    black_box(&g);
                },
                BatchSize::SmallInput,
            );
        });
    }

    group.finish();
}

// KPI: splicing one node into the middle of a chain vs chain length.
fn bench_kpi_splice_chain(c: &mut Criterion) {
    let mut group = c.benchmark_group("kpi/splice_chain");

    for len in [8_usize, 64, 512, 4096] {
        group.bench_with_input(
            BenchmarkId::from_parameter(format!("{}nodes", len)),
            &len,
            |b, &len| {
                b.iter_batched(
                    || {
                        let (mut g, nodes) = chain(len);
                        let mid = nodes[len / 2];
                        let input = g.node(mid).inputs()[0].unwrap();
                        let new = g.create_node(NodeSpec::new("", "Abs").input(input)).unwrap();
                        (g, mid, new)
                    },
                    |(mut g, mid, new)| {
                        let old = g.node(mid).outputs()[0];
                        let replacement = g.node(new).outputs()[0];
                        replace_nodes_and_values(&mut g, mid, &[mid], &[new], &[old], &[replacement])
                            .unwrap();
                        black_box(&g);
                    },
                    BatchSize::SmallInput,
                );
            },
        );
    }

    group.finish();
}

// KPI: name mapping and fingerprint over a chain.
fn bench_kpi_whole_graph(c: &mut Criterion) {
    let (g, _) = chain(1024);

    let mut group = c.benchmark_group("kpi/whole_graph");
    group.bench_function("value_mapping", |b| {
        b.iter(|| black_box(create_value_mapping(black_box(&g)).len()));
    });
    group.bench_function("fingerprint", |b| {
        b.iter(|| black_box(fingerprint::fingerprint(black_box(&g))));
    });
    group.bench_function("verify", |b| {
        b.iter(|| black_box(&g).verify().unwrap());
    });
    group.finish();
}

criterion_group!(
    benches,
    bench_kpi_rauw_fan_out,
    bench_kpi_splice_chain,
    bench_kpi_whole_graph
);
criterion_main!(benches);
