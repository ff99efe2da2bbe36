#![no_main]

use libfuzzer_sys::fuzz_target;
use std::sync::Arc;

use bitchain_core::observers::NoOpObserver;
use bitchain_core::sequential::SequentialFold;
use bitchain_core::tree::TreeReduction;
use bitchain_core::{Bitstring, ChainEvaluator, CheckedEvaluator, Matrix, MatrixPool};

fuzz_target!(|data: &[u8]| {
    if data.len() < 2 {
        return;
    }
    // First byte picks m in {1, 2, 3}; entries in {-1, 0, 1} keep every
    // partial product an exact integer for chains of up to 16 factors.
    let m = usize::from(data[0] % 3) + 1;
    let cells = m * m;
    let rest = &data[1..];
    if rest.len() < 2 * cells + 1 {
        return;
    }
    let entry = |b: u8| f64::from(b % 3) - 1.0;
    let a0 = Matrix::from_vec(m, rest[..cells].iter().map(|&b| entry(b)).collect()).unwrap();
    let a1 = Matrix::from_vec(m, rest[cells..2 * cells].iter().map(|&b| entry(b)).collect())
        .unwrap();
    let pool = MatrixPool::new(a0, a1).unwrap();

    let bits: Vec<u8> = rest[2 * cells..].iter().take(16).map(|b| b & 1).collect();
    let bits = Bitstring::new(bits).unwrap();

    let seq = CheckedEvaluator::new(Arc::new(SequentialFold::new()));
    let tree = CheckedEvaluator::new(Arc::new(TreeReduction::new()));
    let observer = NoOpObserver::new();

    let s = seq.evaluate(&observer, 0, &bits, &pool).unwrap();
    let t = tree.evaluate(&observer, 0, &bits, &pool).unwrap();
    assert_eq!(s, t, "SequentialFold != TreeReduction for bits {bits}");

    if bits.len() == 1 {
        let bit = bits.get(0).unwrap();
        assert_eq!(&s, pool.select(bit));
    }
});
