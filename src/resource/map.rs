use crate::resource::loader::ResourceLoader;
use crate::resource::ResourceError;
use crate::Value;
use std::collections::HashMap;

/// Resource loader that serves defaults from memory.
///
/// # Examples
///
/// ```rust
/// use remote_config::{MapResourceLoader, Value};
///
/// let loader = MapResourceLoader::default()
///     .with_resource("defaults", [("welcome", Value::from("hi"))]);
/// ```
#[derive(Default)]
pub struct MapResourceLoader {
    resources: HashMap<String, HashMap<String, Value>>,
}

impl MapResourceLoader {
    /// Registers a resource under `name`.
    pub fn with_resource<K: Into<String>, V: Into<Value>>(
        mut self,
        name: &str,
        values: impl IntoIterator<Item = (K, V)>,
    ) -> Self {
        self.resources.insert(
            name.to_owned(),
            values
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        );
        self
    }
}

impl From<HashMap<String, HashMap<String, Value>>> for MapResourceLoader {
    /// Creates a new [`MapResourceLoader`] from a [`HashMap`] of resource names and their values.
    fn from(resources: HashMap<String, HashMap<String, Value>>) -> Self {
        Self { resources }
    }
}

impl ResourceLoader for MapResourceLoader {
    fn load(&self, name: &str) -> Result<HashMap<String, Value>, ResourceError> {
        self.resources
            .get(name)
            .cloned()
            .ok_or_else(|| ResourceError::NotFound(name.to_owned()))
    }
}
