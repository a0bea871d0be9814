use std::collections::{BTreeSet, HashMap};

use crate::model::enums::ValueSource;
use crate::value::{ConfigValue, Value};

/// Looks `key` up in the active config, the defaults and the static values, in this order.
pub fn resolve(
    key: &str,
    active: &HashMap<String, Value>,
    defaults: &HashMap<String, Value>,
    statics: &HashMap<String, Value>,
) -> ConfigValue {
    if let Some(value) = active.get(key) {
        return ConfigValue::new(key, Some(value.clone()), ValueSource::Remote);
    }
    if let Some(value) = defaults.get(key) {
        return ConfigValue::new(key, Some(value.clone()), ValueSource::Default);
    }
    match statics.get(key) {
        Some(value) => ConfigValue::new(key, Some(value.clone()), ValueSource::Static),
        None => ConfigValue::unset(key),
    }
}

/// Resolves every key known by any of the tiers.
pub fn resolve_all(
    active: &HashMap<String, Value>,
    defaults: &HashMap<String, Value>,
    statics: &HashMap<String, Value>,
) -> HashMap<String, ConfigValue> {
    let keys: BTreeSet<&String> = active
        .keys()
        .chain(defaults.keys())
        .chain(statics.keys())
        .collect();
    keys.into_iter()
        .map(|key| (key.clone(), resolve(key, active, defaults, statics)))
        .collect()
}
