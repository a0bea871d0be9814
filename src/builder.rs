use crate::cache::EmptyConfigCache;
use crate::constants::DEFAULT_HTTP_TIMEOUT;
use crate::errors::{ClientError, ErrorKind};
use crate::resource::loader::ResourceLoader;
use crate::resource::map::MapResourceLoader;
use crate::settings::ConfigSettings;
use crate::{Client, ConfigCache, Value};
use std::borrow::Borrow;
use std::collections::HashMap;
use std::time::Duration;

pub struct Options {
    api_key: String,
    base_url: String,
    http_timeout: Duration,
    cache: Box<dyn ConfigCache>,
    resource_loader: Box<dyn ResourceLoader>,
    settings: ConfigSettings,
    defaults: HashMap<String, Value>,
    static_defaults: HashMap<String, Value>,
}

impl Options {
    pub(crate) fn api_key(&self) -> &str {
        &self.api_key
    }

    pub(crate) fn base_url(&self) -> &str {
        &self.base_url
    }

    pub(crate) fn http_timeout(&self) -> &Duration {
        &self.http_timeout
    }

    pub(crate) fn cache(&self) -> &dyn ConfigCache {
        self.cache.borrow()
    }

    pub(crate) fn resource_loader(&self) -> &dyn ResourceLoader {
        self.resource_loader.borrow()
    }

    pub(crate) fn settings(&self) -> &ConfigSettings {
        &self.settings
    }

    pub(crate) fn defaults(&self) -> &HashMap<String, Value> {
        &self.defaults
    }

    pub(crate) fn static_defaults(&self) -> &HashMap<String, Value> {
        &self.static_defaults
    }
}

/// Builder to create a remote config [`Client`].
///
/// # Examples
///
/// ```no_run
/// use std::time::Duration;
/// use remote_config::{Client, ConfigSettings};
///
/// let builder = Client::builder("API_KEY")
///     .base_url("https://config.example.com")
///     .config_settings(ConfigSettings::default().minimum_fetch_interval(Duration::from_secs(3600)));
///
/// let client = builder.build().unwrap();
/// ```
pub struct ClientBuilder {
    api_key: String,
    base_url: Option<String>,
    http_timeout: Option<Duration>,
    cache: Option<Box<dyn ConfigCache>>,
    resource_loader: Option<Box<dyn ResourceLoader>>,
    settings: Option<ConfigSettings>,
    defaults: HashMap<String, Value>,
    static_defaults: HashMap<String, Value>,
}

impl ClientBuilder {
    pub(crate) fn new(api_key: &str) -> Self {
        Self {
            api_key: api_key.to_owned(),
            base_url: None,
            http_timeout: None,
            cache: None,
            resource_loader: None,
            settings: None,
            defaults: HashMap::new(),
            static_defaults: HashMap::new(),
        }
    }

    /// Sets the base URL of the remote config backend. This option is required.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use remote_config::Client;
    ///
    /// let builder = Client::builder("API_KEY")
    ///     .base_url("https://config.example.com");
    /// ```
    pub fn base_url(mut self, base_url: &str) -> Self {
        self.base_url = Some(base_url.trim_end_matches('/').to_owned());
        self
    }

    /// Sets the HTTP request timeout.
    /// Default value is `30` seconds.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use std::time::Duration;
    /// use remote_config::Client;
    ///
    /// let builder = Client::builder("API_KEY")
    ///     .http_timeout(Duration::from_secs(60));
    /// ```
    pub fn http_timeout(mut self, timeout: Duration) -> Self {
        self.http_timeout = Some(timeout);
        self
    }

    /// Sets a [`ConfigCache`] implementation used to persist fetched and activated config.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use remote_config::{ConfigCache, Client};
    ///
    /// let builder = Client::builder("API_KEY")
    ///     .cache(Box::new(CustomCache{}));
    ///
    /// struct CustomCache {}
    ///
    /// impl ConfigCache for CustomCache {
    ///     fn read(&self, key: &str) -> Option<String> {
    ///         // read from cache
    ///         None
    ///     }
    ///
    ///     fn write(&self, key: &str, value: &str) {
    ///         // write to cache
    ///     }
    /// }
    /// ```
    pub fn cache(mut self, cache: Box<dyn ConfigCache>) -> Self {
        self.cache = Some(cache);
        self
    }

    /// Sets the [`ResourceLoader`] used by [`Client::set_defaults_from_resource`].
    /// Without a loader every resource lookup fails with [`ErrorKind::ResourceNotFound`].
    ///
    /// # Examples
    ///
    /// ```rust
    /// use remote_config::{Client, FileResourceLoader};
    ///
    /// let builder = Client::builder("API_KEY")
    ///     .resource_loader(Box::new(FileResourceLoader::new("resources")));
    /// ```
    pub fn resource_loader(mut self, loader: Box<dyn ResourceLoader>) -> Self {
        self.resource_loader = Some(loader);
        self
    }

    /// Sets the initial [`ConfigSettings`].
    pub fn config_settings(mut self, settings: ConfigSettings) -> Self {
        self.settings = Some(settings);
        self
    }

    /// Sets the initial defaults. Same-key entries given in later calls overwrite earlier ones.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use remote_config::Client;
    ///
    /// let builder = Client::builder("API_KEY")
    ///     .defaults([("welcome", "hi")]);
    /// ```
    pub fn defaults<K: Into<String>, V: Into<Value>>(
        mut self,
        defaults: impl IntoIterator<Item = (K, V)>,
    ) -> Self {
        self.defaults
            .extend(defaults.into_iter().map(|(k, v)| (k.into(), v.into())));
        self
    }

    /// Registers static fallback values.
    ///
    /// They are served with [`crate::ValueSource::Static`] for keys that have neither an
    /// activated remote value nor a default.
    pub fn static_defaults<K: Into<String>, V: Into<Value>>(
        mut self,
        values: impl IntoIterator<Item = (K, V)>,
    ) -> Self {
        self.static_defaults
            .extend(values.into_iter().map(|(k, v)| (k.into(), v.into())));
        self
    }

    /// Creates a [`Client`] from the configuration made on the builder.
    ///
    /// # Errors
    ///
    /// This method fails in the following cases:
    /// - The given API key is empty.
    /// - No base URL was set.
    /// - The internal HTTP client couldn't be initialized.
    pub fn build(self) -> Result<Client, ClientError> {
        Client::with_options(self.build_options()?)
    }

    pub(crate) fn build_options(self) -> Result<Options, ClientError> {
        if self.api_key.is_empty() {
            return Err(ClientError::new(
                ErrorKind::InvalidApiKey,
                "API key cannot be empty".to_owned(),
            ));
        }
        let base_url = match self.base_url {
            Some(url) if !url.is_empty() => url,
            _ => {
                return Err(ClientError::new(
                    ErrorKind::MissingBaseUrl,
                    "Base URL of the remote config backend must be set".to_owned(),
                ))
            }
        };
        Ok(Options {
            api_key: self.api_key,
            base_url,
            http_timeout: self.http_timeout.unwrap_or(DEFAULT_HTTP_TIMEOUT),
            cache: self.cache.unwrap_or(Box::new(EmptyConfigCache::new())),
            resource_loader: self
                .resource_loader
                .unwrap_or(Box::new(MapResourceLoader::default())),
            settings: self.settings.unwrap_or_default(),
            defaults: self.defaults,
            static_defaults: self.static_defaults,
        })
    }
}
