use serde_repr::{Deserialize_repr, Serialize_repr};
use std::fmt::{Display, Formatter};

/// Describes which tier satisfied a config value lookup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValueSource {
    /// The value comes from the activated remote config.
    Remote,
    /// The value comes from the defaults set by the application.
    Default,
    /// No remote or default value exists; the value is the registered static fallback, if any.
    Static,
}

impl ValueSource {
    /// Returns the lowercase identifier of the source (`remote`, `default` or `static`).
    pub fn as_str(&self) -> &'static str {
        match self {
            ValueSource::Remote => "remote",
            ValueSource::Default => "default",
            ValueSource::Static => "static",
        }
    }
}

impl Display for ValueSource {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Outcome of the most recent fetch attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize_repr, Deserialize_repr)]
#[repr(u8)]
pub enum LastFetchStatus {
    /// No fetch was attempted yet.
    #[default]
    NoFetchYet = 0,
    /// The last fetch completed successfully.
    Success = 1,
    /// The last fetch failed.
    Failure = 2,
    /// The last fetch was rejected by the backend due to throttling.
    Throttled = 3,
}

impl LastFetchStatus {
    /// Returns the lowercase identifier of the status.
    pub fn as_str(&self) -> &'static str {
        match self {
            LastFetchStatus::NoFetchYet => "no_fetch_yet",
            LastFetchStatus::Success => "success",
            LastFetchStatus::Failure => "failure",
            LastFetchStatus::Throttled => "throttled",
        }
    }
}

impl Display for LastFetchStatus {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
