//! Criterion benchmarks for the chain evaluators.

use std::sync::Arc;

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};

use bitchain_core::observers::NoOpObserver;
use bitchain_core::sequential::SequentialFold;
use bitchain_core::tree::TreeReduction;
use bitchain_core::{ChainEvaluator, ChainInputs, CheckedEvaluator, Matrix, Options};

fn compute(eval: &dyn ChainEvaluator, inputs: &ChainInputs) -> Matrix {
    let observer = NoOpObserver::new();
    eval.evaluate(&observer, 0, &inputs.bits, &inputs.pool)
        .unwrap()
}

fn bench_evaluators(c: &mut Criterion) {
    let sequential: Arc<dyn ChainEvaluator> =
        Arc::new(CheckedEvaluator::new(Arc::new(SequentialFold::new())));
    let tree: Arc<dyn ChainEvaluator> =
        Arc::new(CheckedEvaluator::new(Arc::new(TreeReduction::new())));

    let opts = Options {
        dimension: 32,
        ..Options::default()
    };
    let lens: Vec<usize> = vec![8, 64, 256];

    for (label, eval) in [("SequentialFold", &sequential), ("TreeReduction", &tree)] {
        let mut group = c.benchmark_group(label);
        for &len in &lens {
            let inputs = ChainInputs::generate(0, len, &opts).unwrap();
            group.bench_with_input(BenchmarkId::from_parameter(len), &inputs, |b, inputs| {
                b.iter(|| compute(eval.as_ref(), inputs));
            });
        }
        group.finish();
    }
}

criterion_group!(benches, bench_evaluators);
criterion_main!(benches);
