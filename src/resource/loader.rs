use crate::resource::ResourceError;
use crate::Value;
use std::collections::HashMap;

/// Loads bundled default values by resource name.
pub trait ResourceLoader: Sync + Send {
    /// Loads the defaults stored in the resource identified by `name`.
    ///
    /// # Errors
    ///
    /// Fails with [`ResourceError::NotFound`] when no such resource exists and with
    /// [`ResourceError::Invalid`] when its content is not a map of primitive values.
    fn load(&self, name: &str) -> Result<HashMap<String, Value>, ResourceError>;
}
