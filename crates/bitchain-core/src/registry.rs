//! Evaluator factory and registry.

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::RwLock;

use crate::evaluator::{ChainError, ChainEvaluator, CheckedEvaluator};
use crate::sequential::SequentialFold;
use crate::tree::TreeReduction;

/// Factory trait for creating evaluators.
pub trait EvaluatorFactory: Send + Sync {
    /// Get or create an evaluator by name.
    fn get(&self, name: &str) -> Result<Arc<dyn ChainEvaluator>, ChainError>;

    /// List all available evaluator names.
    fn available(&self) -> Vec<&str>;
}

/// Default factory with lazy creation and cache.
pub struct DefaultFactory {
    cache: RwLock<HashMap<String, Arc<dyn ChainEvaluator>>>,
}

impl DefaultFactory {
    /// Create a new default factory.
    #[must_use]
    pub fn new() -> Self {
        Self {
            cache: RwLock::new(HashMap::new()),
        }
    }

    fn create_evaluator(name: &str) -> Result<Arc<dyn ChainEvaluator>, ChainError> {
        match name {
            "sequential" | "seq" => {
                let core = Arc::new(SequentialFold::new());
                Ok(Arc::new(CheckedEvaluator::new(core)))
            }
            "tree" => {
                let core = Arc::new(TreeReduction::new());
                Ok(Arc::new(CheckedEvaluator::new(core)))
            }
            _ => Err(ChainError::Config(format!("unknown evaluator: {name}"))),
        }
    }
}

impl Default for DefaultFactory {
    fn default() -> Self {
        Self::new()
    }
}

impl EvaluatorFactory for DefaultFactory {
    fn get(&self, name: &str) -> Result<Arc<dyn ChainEvaluator>, ChainError> {
        // Check cache first
        if let Some(eval) = self.cache.read().get(name) {
            return Ok(Arc::clone(eval));
        }

        // Create and cache
        let eval = Self::create_evaluator(name)?;
        self.cache
            .write()
            .insert(name.to_string(), Arc::clone(&eval));
        Ok(eval)
    }

    fn available(&self) -> Vec<&str> {
        vec!["sequential", "tree"]
    }
}
