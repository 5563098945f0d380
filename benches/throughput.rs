use std::thread;

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use wafgraph::{Acl, Analyzer};

const BATCH: usize = 64;

/// A web ACL export with `taggers` label-producing rules and one consumer per
/// tagger, some of them in the wrong priority slot.
fn document(taggers: usize) -> String {
    let mut rules = Vec::with_capacity(taggers * 2);
    for t in 0..taggers {
        rules.push(format!(
            r#"{{"Name": "tag-{t}", "Priority": {p}, "Action": {{"Count": {{}}}},
                "Statement": {{"ByteMatchStatement": {{"SearchString": "/p{t}"}}}},
                "RuleLabels": [{{"Name": "l{t}"}}]}}"#,
            p = t * 2,
        ));
        let priority = if t % 5 == 0 { 0 } else { t * 2 + 1 };
        rules.push(format!(
            r#"{{"Name": "gate-{t}", "Priority": {priority}, "Action": {{"Block": {{}}}},
                "Statement": {{"AndStatement": {{"Statements": [
                    {{"LabelMatchStatement": {{"Scope": "LABEL", "Key": "l{t}"}}}},
                    {{"NotStatement": {{"Statement": {{"LabelMatchStatement": {{"Scope": "LABEL", "Key": "l{next}"}}}}}}}}
                ]}}}}}}"#,
            next = (t + 1) % taggers,
        ));
    }
    format!(r#"{{"Rules": [{}]}}"#, rules.join(","))
}

/// Documents of mixed sizes, as a lint service would see them.
fn batch() -> Vec<String> {
    (0..BATCH).map(|i| document(5 + (i % 8) * 10)).collect()
}

fn lint(analyzer: &Analyzer, doc: &str) -> usize {
    Acl::from_json(doc)
        .map(|acl| analyzer.analyze(&acl).issues().len())
        .unwrap_or(0)
}

fn bench_batch_lint(c: &mut Criterion) {
    let docs = batch();
    let analyzer = Analyzer::new();

    let mut group = c.benchmark_group("batch_lint");
    group.throughput(Throughput::Elements(BATCH as u64));

    for workers in [1_usize, 2, 4, 8] {
        group.bench_with_input(BenchmarkId::from_parameter(workers), &workers, |b, &workers| {
            b.iter(|| {
                thread::scope(|scope| {
                    let handles: Vec<_> = docs
                        .chunks(BATCH.div_ceil(workers))
                        .map(|chunk| {
                            let analyzer = &analyzer;
                            scope.spawn(move || {
                                chunk.iter().map(|doc| lint(analyzer, doc)).sum::<usize>()
                            })
                        })
                        .collect();
                    handles
                        .into_iter()
                        .map(|h| h.join().unwrap_or(0))
                        .sum::<usize>()
                })
            });
        });
    }

    group.finish();
}

criterion_group!(benches, bench_batch_lint);
criterion_main!(benches);
