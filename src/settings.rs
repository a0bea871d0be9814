use crate::constants::DEFAULT_MINIMUM_FETCH_INTERVAL;
use std::time::Duration;

/// Runtime settings of the [`crate::Client`], replaceable with [`crate::Client::set_config_settings`].
///
/// # Examples
///
/// ```rust
/// use std::time::Duration;
/// use remote_config::ConfigSettings;
///
/// let settings = ConfigSettings::default()
///     .developer_mode(true)
///     .minimum_fetch_interval(Duration::from_secs(3600));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigSettings {
    developer_mode_enabled: bool,
    minimum_fetch_interval: Duration,
}

impl ConfigSettings {
    /// Enables or disables developer mode.
    ///
    /// In developer mode every fetch goes to the backend, regardless of the age of the cached config.
    pub fn developer_mode(mut self, enabled: bool) -> Self {
        self.developer_mode_enabled = enabled;
        self
    }

    /// Sets the expiration used when [`crate::Client::fetch`] is called without one.
    /// Default value is `12` hours.
    pub fn minimum_fetch_interval(mut self, interval: Duration) -> Self {
        self.minimum_fetch_interval = interval;
        self
    }

    /// True when developer mode is enabled, otherwise false.
    pub fn is_developer_mode_enabled(&self) -> bool {
        self.developer_mode_enabled
    }

    /// Get the expiration used when [`crate::Client::fetch`] is called without one.
    pub fn get_minimum_fetch_interval(&self) -> Duration {
        self.minimum_fetch_interval
    }
}

impl Default for ConfigSettings {
    fn default() -> Self {
        Self {
            developer_mode_enabled: false,
            minimum_fetch_interval: DEFAULT_MINIMUM_FETCH_INTERVAL,
        }
    }
}
