use std::time::Duration;

/// The version of the crate.
pub const PKG_VERSION: &str = env!("CARGO_PKG_VERSION");

pub const CONFIG_FILE_NAME: &str = "config_v1.json";
pub const SERIALIZATION_FORMAT_VERSION: &str = "v1";

/// Expiration used by `fetch` when the caller doesn't pass one.
pub const DEFAULT_MINIMUM_FETCH_INTERVAL: Duration = Duration::from_secs(12 * 60 * 60);
pub const DEFAULT_HTTP_TIMEOUT: Duration = Duration::from_secs(30);

#[cfg(test)]
pub mod test_constants {
    pub const MOCK_PATH: &str = "/configs/key/config_v1.json";
    pub const MOCK_KEY: &str = "key";
}
