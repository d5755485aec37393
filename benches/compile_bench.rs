use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

use lucene_select::query::{QueryCompiler, QueryNode, SqlRenderer};
use lucene_select::testing::fixtures;
use lucene_select::{SelectBuilder, Selection};

fn hero_compiler() -> QueryCompiler {
    QueryCompiler::new(fixtures::hero()).with_relationships(fixtures::hero_relationships())
}

/// `width` OR-ed clauses alternating between local and joined fields
fn wide_tree(width: usize) -> QueryNode {
    let mut tree = QueryNode::term("name", "hero0");
    for i in 1..width {
        let clause = match i % 3 {
            0 => QueryNode::term("name", format!("hero{}", i)),
            1 => QueryNode::range("age", i.to_string(), (i + 10).to_string(), true, false),
            _ => QueryNode::term("team.headquarter.name", format!("hq{}", i)),
        };
        tree = QueryNode::or(tree, clause);
    }
    tree
}

fn bench_compile(c: &mut Criterion) {
    let compiler = hero_compiler();
    let mut group = c.benchmark_group("compile");
    for width in [1usize, 10, 100] {
        let tree = wide_tree(width);
        group.bench_with_input(BenchmarkId::from_parameter(width), &tree, |b, tree| {
            b.iter(|| compiler.compile(black_box(tree)).unwrap())
        });
    }
    group.finish();
}

fn bench_build_and_render(c: &mut Criterion) {
    let builder =
        SelectBuilder::new(fixtures::hero()).with_relationships(fixtures::hero_relationships());
    let renderer = SqlRenderer::default();
    let tree = wide_tree(50);

    c.bench_function("build_and_render_50", |b| {
        b.iter(|| {
            let stmt = builder
                .build(Some(black_box(&tree)), Selection::AllColumns)
                .unwrap();
            renderer.render(&stmt)
        })
    });
}

criterion_group!(benches, bench_compile, bench_build_and_render);
criterion_main!(benches);
