use crate::value::Value;
use std::collections::HashMap;
use thiserror::Error;

pub mod file;
pub mod loader;
pub mod map;

/// Failure reported by a [`loader::ResourceLoader`].
#[derive(Error, Debug, PartialEq)]
pub enum ResourceError {
    /// No resource exists under the requested name.
    #[error("Resource '{0}' was not found.")]
    NotFound(String),
    /// The resource exists but couldn't be read or parsed.
    #[error("Resource '{name}' is invalid. ({reason})")]
    Invalid {
        /// The requested resource name.
        name: String,
        /// Why the content was rejected.
        reason: String,
    },
}

/// Serialization format of a bundled defaults resource.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ResourceFormat {
    Json,
    Yaml,
}

impl ResourceFormat {
    pub(crate) fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_ascii_lowercase().as_str() {
            "json" => Some(ResourceFormat::Json),
            "yaml" | "yml" => Some(ResourceFormat::Yaml),
            _ => None,
        }
    }
}

/// Parses a flat map of primitive defaults from `content`.
pub(crate) fn parse_defaults(
    name: &str,
    content: &str,
    format: ResourceFormat,
) -> Result<HashMap<String, Value>, ResourceError> {
    let parsed = match format {
        ResourceFormat::Json => serde_json::from_str::<HashMap<String, serde_json::Value>>(content)
            .map_err(|err| err.to_string()),
        ResourceFormat::Yaml => serde_yaml::from_str::<HashMap<String, serde_json::Value>>(content)
            .map_err(|err| err.to_string()),
    };
    let raw = parsed.map_err(|reason| ResourceError::Invalid {
        name: name.to_owned(),
        reason,
    })?;
    let mut defaults = HashMap::with_capacity(raw.len());
    for (key, json_val) in raw.iter() {
        match Value::from_json_val(json_val) {
            Some(val) => {
                defaults.insert(key.clone(), val);
            }
            None => {
                return Err(ResourceError::Invalid {
                    name: name.to_owned(),
                    reason: format!("value of '{key}' is not a primitive"),
                })
            }
        }
    }
    Ok(defaults)
}
