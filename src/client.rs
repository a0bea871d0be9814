use std::any::type_name;
use std::collections::{BTreeSet, HashMap};
use std::sync::Arc;
use std::time::Duration;

use arc_swap::ArcSwap;
use chrono::{DateTime, Utc};
use log::{debug, error, warn};

use crate::activation::ActivationManager;
use crate::builder::{ClientBuilder, Options};
use crate::defaults::Defaults;
use crate::errors::{ClientError, ErrorKind};
use crate::eval::resolver::{resolve, resolve_all};
use crate::fetch::service::FetchService;
use crate::model::enums::LastFetchStatus;
use crate::resource::ResourceError;
use crate::settings::ConfigSettings;
use crate::store::{CacheStore, FetchState};
use crate::value::{ConfigValue, Value, ValuePrimitive};

/// The main component for fetching, activating and reading remote config values.
///
/// # Examples
///
/// ```no_run
/// use remote_config::Client;
///
/// #[tokio::main]
/// async fn main() {
///     let client = Client::builder("API_KEY")
///         .base_url("https://config.example.com")
///         .defaults([("welcome", "hello")])
///         .build()
///         .unwrap();
///
///     let activated = client.fetch_and_activate().await.unwrap();
///     let welcome = client.get_value("welcome");
/// }
/// ```
pub struct Client {
    options: Arc<Options>,
    store: Arc<CacheStore>,
    service: FetchService,
    activation: ActivationManager,
    defaults: Defaults,
    settings: ArcSwap<ConfigSettings>,
}

impl Client {
    pub(crate) fn with_options(options: Options) -> Result<Self, ClientError> {
        let opts = Arc::new(options);
        let store = Arc::new(CacheStore::new(Arc::clone(&opts)));
        let service = FetchService::new(&opts, Arc::clone(&store))?;
        let active = store.read_active();
        if active.is_some() {
            debug!("Restored the activated config from cache");
        }
        Ok(Self {
            activation: ActivationManager::new(active),
            defaults: Defaults::new(opts.defaults().clone()),
            settings: ArcSwap::from_pointee(opts.settings().clone()),
            service,
            store,
            options: opts,
        })
    }

    /// Creates a new [`ClientBuilder`] used to build a [`Client`].
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use remote_config::Client;
    ///
    /// let client = Client::builder("API_KEY")
    ///     .base_url("https://config.example.com")
    ///     .build()
    ///     .unwrap();
    /// ```
    pub fn builder(api_key: &str) -> ClientBuilder {
        ClientBuilder::new(api_key)
    }

    /// Fetches config from the backend unless the stored one is younger than `expiration`.
    ///
    /// When `expiration` is [`None`] the [`ConfigSettings::minimum_fetch_interval`] is used.
    /// A zero expiration or an enabled developer mode always performs a network request.
    /// The fetched config becomes visible only after [`Client::activate`].
    ///
    /// # Errors
    ///
    /// This method fails when the backend can't be reached, responds with an unexpected status
    /// or an invalid body, or throttles the client. The activated config is left untouched.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use std::time::Duration;
    /// use remote_config::Client;
    ///
    /// #[tokio::main]
    /// async fn main() {
    ///     let client = Client::builder("API_KEY")
    ///         .base_url("https://config.example.com")
    ///         .build()
    ///         .unwrap();
    ///
    ///     client.fetch(Some(Duration::from_secs(300))).await.unwrap();
    /// }
    /// ```
    pub async fn fetch(&self, expiration: Option<Duration>) -> Result<(), ClientError> {
        let settings = self.settings.load_full();
        let expiration = expiration.unwrap_or(settings.get_minimum_fetch_interval());
        self.service
            .fetch(expiration, settings.is_developer_mode_enabled())
            .await
    }

    /// Makes the most recently fetched config visible to the getters.
    ///
    /// Returns `true` if a config was activated, `false` if nothing was fetched yet
    /// or the fetched config is already active.
    ///
    /// Activation only swaps in-memory state and writes the [`crate::ConfigCache`],
    /// so unlike [`Client::fetch`] this is a plain blocking call, not a future.
    pub fn activate(&self) -> bool {
        self.activation.activate(&self.store)
    }

    /// Performs a [`Client::fetch`] with the configured minimum fetch interval,
    /// then a [`Client::activate`].
    ///
    /// # Errors
    ///
    /// This method fails when the fetch fails; nothing is activated in that case.
    pub async fn fetch_and_activate(&self) -> Result<bool, ClientError> {
        self.fetch(None).await?;
        Ok(self.activate())
    }

    /// Gets the value of `key` with the tier it was resolved from.
    ///
    /// Activated remote values take precedence over defaults, defaults over static values.
    /// A key known by no tier resolves to [`crate::ValueSource::Static`] without a value.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use remote_config::{Client, ValueSource};
    ///
    /// let client = Client::builder("API_KEY")
    ///     .base_url("https://config.example.com")
    ///     .defaults([("limit", 10)])
    ///     .build()
    ///     .unwrap();
    ///
    /// let limit = client.get_value("limit");
    /// assert_eq!(limit.get::<i64>(), Some(10));
    /// assert_eq!(limit.source, ValueSource::Default);
    /// ```
    pub fn get_value(&self, key: &str) -> ConfigValue {
        let active = self.activation.active();
        let defaults = self.defaults.get();
        resolve(
            key,
            &active.values,
            &defaults,
            self.options.static_defaults(),
        )
    }

    /// Reads the value of `key` as `T`.
    ///
    /// Returns `default` when the key has no value or the value has a different type.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use remote_config::Client;
    ///
    /// let client = Client::builder("API_KEY")
    ///     .base_url("https://config.example.com")
    ///     .build()
    ///     .unwrap();
    ///
    /// let enabled = client.get_value_or("feature_enabled", false);
    /// assert!(!enabled);
    /// ```
    pub fn get_value_or<T: ValuePrimitive>(&self, key: &str, default: T) -> T {
        let value = self.get_value(key);
        match value.get::<T>() {
            Some(val) => val,
            None => {
                if value.value.is_some() {
                    warn!(
                        "The value of '{key}' can't be read as {}, returning the default",
                        type_name::<T>()
                    );
                }
                default
            }
        }
    }

    /// Gets every key known by the activated config, the defaults and the static values.
    pub fn get_all(&self) -> HashMap<String, ConfigValue> {
        let active = self.activation.active();
        let defaults = self.defaults.get();
        resolve_all(&active.values, &defaults, self.options.static_defaults())
    }

    /// Gets the keys starting with `prefix`, sorted. An empty prefix returns every key.
    pub fn get_keys_by_prefix(&self, prefix: &str) -> Vec<String> {
        let active = self.activation.active();
        let defaults = self.defaults.get();
        let keys: BTreeSet<&String> = active
            .values
            .keys()
            .chain(defaults.keys())
            .chain(self.options.static_defaults().keys())
            .filter(|key| key.starts_with(prefix))
            .collect();
        keys.into_iter().cloned().collect()
    }

    /// Replaces the [`ConfigSettings`]. The next fetch uses the new settings.
    pub fn set_config_settings(&self, settings: ConfigSettings) {
        self.settings.store(Arc::new(settings));
    }

    /// Gets the current [`ConfigSettings`].
    pub fn config_settings(&self) -> ConfigSettings {
        ConfigSettings::clone(&self.settings.load())
    }

    /// True when developer mode is enabled in the current [`ConfigSettings`].
    pub fn is_developer_mode_enabled(&self) -> bool {
        self.settings.load().is_developer_mode_enabled()
    }

    /// Merges `defaults` into the current defaults.
    /// Entries with existing keys overwrite the previous value; other defaults are kept.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use remote_config::Client;
    ///
    /// let client = Client::builder("API_KEY")
    ///     .base_url("https://config.example.com")
    ///     .build()
    ///     .unwrap();
    ///
    /// client.set_defaults([("a", 1)]);
    /// assert_eq!(client.get_value_or("a", 0i64), 1);
    /// ```
    pub fn set_defaults<K: Into<String>, V: Into<Value>>(
        &self,
        defaults: impl IntoIterator<Item = (K, V)>,
    ) {
        self.defaults.merge(
            defaults
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        );
    }

    /// Loads defaults from the named resource of the configured [`crate::ResourceLoader`]
    /// and merges them like [`Client::set_defaults`]. The resource is loaded synchronously.
    ///
    /// # Errors
    ///
    /// This method fails with [`ErrorKind::ResourceNotFound`] when the resource doesn't exist
    /// and with [`ErrorKind::InvalidResourceContent`] when it's not a flat map of primitives.
    /// The defaults are left untouched in both cases.
    pub fn set_defaults_from_resource(&self, name: &str) -> Result<(), ClientError> {
        match self.options.resource_loader().load(name) {
            Ok(values) => {
                debug!("Loaded {} defaults from resource '{name}'", values.len());
                self.defaults.merge(values);
                Ok(())
            }
            Err(err) => {
                let kind = match err {
                    ResourceError::NotFound(_) => ErrorKind::ResourceNotFound,
                    ResourceError::Invalid { .. } => ErrorKind::InvalidResourceContent,
                };
                let err = ClientError::new(kind, err.to_string());
                error!(event_id = err.kind.as_u16(); "{}", err);
                Err(err)
            }
        }
    }

    /// Gets the time of the last successful fetch. [`None`] if no fetch succeeded yet.
    pub fn last_fetch_time(&self) -> Option<DateTime<Utc>> {
        self.store.fetch_state().last_fetch_time
    }

    /// Gets the outcome of the last fetch attempt.
    pub fn last_fetch_status(&self) -> LastFetchStatus {
        self.store.fetch_state().last_fetch_status
    }

    /// Gets the last fetch time and status as one consistent [`FetchState`].
    pub fn fetch_state(&self) -> FetchState {
        self.store.fetch_state()
    }
}
