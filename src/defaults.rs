use std::collections::HashMap;
use std::sync::Arc;

use arc_swap::ArcSwap;

use crate::value::Value;

/// The application supplied default values.
pub struct Defaults {
    values: ArcSwap<HashMap<String, Value>>,
}

impl Defaults {
    pub fn new(initial: HashMap<String, Value>) -> Self {
        Self {
            values: ArcSwap::from_pointee(initial),
        }
    }

    pub fn get(&self) -> Arc<HashMap<String, Value>> {
        self.values.load_full()
    }

    /// Merges `values` into the current defaults; same keys are overwritten, others are kept.
    pub fn merge(&self, values: HashMap<String, Value>) {
        if values.is_empty() {
            return;
        }
        self.values.rcu(|current| {
            let mut merged = HashMap::clone(current);
            merged.extend(values.iter().map(|(k, v)| (k.clone(), v.clone())));
            merged
        });
    }
}
