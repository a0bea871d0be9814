use crate::resource::loader::ResourceLoader;
use crate::resource::{parse_defaults, ResourceError, ResourceFormat};
use crate::Value;
use std::collections::HashMap;
use std::fs;
use std::path::{Component, Path, PathBuf};

const EXTENSIONS: [&str; 3] = ["json", "yaml", "yml"];

/// Resource loader that reads defaults files from a directory.
///
/// A resource name without extension is looked up as `<name>.json`, `<name>.yaml` and
/// `<name>.yml`, in this order. A name with a supported extension is used as given.
/// Absolute names and names leading out of the root are reported as not found.
///
/// # Examples
///
/// ```no_run
/// use remote_config::FileResourceLoader;
///
/// // resources/defaults.json:
/// // {
/// //   "welcome_message": "Hello",
/// //   "max_items": 10
/// // }
///
/// let loader = FileResourceLoader::new("resources");
/// ```
pub struct FileResourceLoader {
    root: PathBuf,
}

impl FileResourceLoader {
    /// Creates a new [`FileResourceLoader`] rooted at `root`.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    fn locate(&self, name: &str) -> Option<(PathBuf, ResourceFormat)> {
        // Only plain relative names; nothing outside of the root is served.
        let escapes_root = Path::new(name).components().any(|component| {
            !matches!(component, Component::Normal(_) | Component::CurDir)
        });
        if name.is_empty() || escapes_root {
            return None;
        }
        let given = self.root.join(name);
        if let Some(format) = Path::new(name)
            .extension()
            .and_then(|ext| ext.to_str())
            .and_then(ResourceFormat::from_extension)
        {
            if given.is_file() {
                return Some((given, format));
            }
        }
        for ext in EXTENSIONS {
            let candidate = self.root.join(format!("{name}.{ext}"));
            if candidate.is_file() {
                if let Some(format) = ResourceFormat::from_extension(ext) {
                    return Some((candidate, format));
                }
            }
        }
        None
    }
}

impl ResourceLoader for FileResourceLoader {
    fn load(&self, name: &str) -> Result<HashMap<String, Value>, ResourceError> {
        let (path, format) = self
            .locate(name)
            .ok_or_else(|| ResourceError::NotFound(name.to_owned()))?;
        let content = fs::read_to_string(&path).map_err(|err| ResourceError::Invalid {
            name: name.to_owned(),
            reason: err.to_string(),
        })?;
        parse_defaults(name, content.as_str(), format)
    }
}
