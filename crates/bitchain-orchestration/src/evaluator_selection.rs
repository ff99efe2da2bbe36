//! Evaluator selection logic.

use std::sync::Arc;

use bitchain_core::registry::EvaluatorFactory;
use bitchain_core::{ChainError, ChainEvaluator};

/// Get evaluators to run based on algorithm selection.
pub fn get_evaluators_to_run(
    algo: &str,
    factory: &dyn EvaluatorFactory,
) -> Result<Vec<Arc<dyn ChainEvaluator>>, ChainError> {
    match algo {
        "all" => {
            let names = factory.available();
            let mut evals = Vec::new();
            for name in names {
                evals.push(factory.get(name)?);
            }
            Ok(evals)
        }
        name => {
            let eval = factory.get(name)?;
            Ok(vec![eval])
        }
    }
}
