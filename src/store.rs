use std::sync::Arc;

use arc_swap::ArcSwap;
use chrono::{DateTime, Utc};
use log::{debug, warn};
use serde::{Deserialize, Serialize};

use crate::builder::Options;
use crate::constants::SERIALIZATION_FORMAT_VERSION;
use crate::model::enums::LastFetchStatus;
use crate::model::snapshot::{snapshot_from_cached_json, ConfigSnapshot};
use crate::utils::sha1;

const FETCHED_KIND: &str = "fetched";
const ACTIVE_KIND: &str = "active";
const STATE_KIND: &str = "fetch_state";

/// The durable record of the most recent fetch.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct FetchState {
    /// Time of the last successful fetch. [`None`] if no fetch succeeded yet.
    pub last_fetch_time: Option<DateTime<Utc>>,
    /// Outcome of the last fetch attempt.
    pub last_fetch_status: LastFetchStatus,
}

impl FetchState {
    /// The last successful fetch time in milliseconds since the Unix epoch, or `-1`.
    pub fn last_fetch_time_millis(&self) -> i64 {
        self.last_fetch_time
            .map(|time| time.timestamp_millis())
            .unwrap_or(-1)
    }
}

#[derive(Serialize, Deserialize)]
struct PersistedFetchState {
    #[serde(rename = "t")]
    time_millis: Option<i64>,
    #[serde(rename = "s")]
    status: LastFetchStatus,
}

#[derive(Debug, Clone, Default)]
pub struct StoreRecord {
    pub fetched: Option<Arc<ConfigSnapshot>>,
    pub state: FetchState,
}

/// Holds the most recently fetched snapshot and the fetch state, mirrored into the [`crate::ConfigCache`].
pub struct CacheStore {
    record: ArcSwap<StoreRecord>,
    options: Arc<Options>,
    fetched_key: String,
    active_key: String,
    state_key: String,
}

impl CacheStore {
    pub fn new(options: Arc<Options>) -> Self {
        let store = Self {
            record: ArcSwap::from_pointee(StoreRecord::default()),
            fetched_key: cache_key(options.api_key(), FETCHED_KIND),
            active_key: cache_key(options.api_key(), ACTIVE_KIND),
            state_key: cache_key(options.api_key(), STATE_KIND),
            options,
        };
        let restored = StoreRecord {
            fetched: store.read_snapshot(&store.fetched_key).map(Arc::new),
            state: store.read_state().unwrap_or_default(),
        };
        store.record.store(Arc::new(restored));
        store
    }

    pub fn record(&self) -> Arc<StoreRecord> {
        self.record.load_full()
    }

    pub fn fetched(&self) -> Option<Arc<ConfigSnapshot>> {
        self.record.load().fetched.clone()
    }

    pub fn fetch_state(&self) -> FetchState {
        self.record.load().state
    }

    /// Replaces the pending snapshot with a freshly downloaded one.
    pub fn store_fetched(&self, snapshot: ConfigSnapshot) {
        let time = snapshot.fetch_time;
        self.options
            .cache()
            .write(&self.fetched_key, snapshot.serialize().as_str());
        let fetched = Arc::new(snapshot);
        self.record.rcu(|_| StoreRecord {
            fetched: Some(Arc::clone(&fetched)),
            state: FetchState {
                last_fetch_time: Some(time),
                last_fetch_status: LastFetchStatus::Success,
            },
        });
        self.write_state();
    }

    /// Records a successful fetch that didn't change the pending snapshot.
    pub fn record_unchanged(&self, time: DateTime<Utc>) {
        self.record.rcu(|current| StoreRecord {
            fetched: current.fetched.clone(),
            state: FetchState {
                last_fetch_time: Some(time),
                last_fetch_status: LastFetchStatus::Success,
            },
        });
        self.write_state();
    }

    /// Records a failed fetch attempt; the pending snapshot and the last fetch time are kept.
    pub fn record_status(&self, status: LastFetchStatus) {
        self.record.rcu(|current| StoreRecord {
            fetched: current.fetched.clone(),
            state: FetchState {
                last_fetch_status: status,
                ..current.state
            },
        });
        self.write_state();
    }

    pub fn read_active(&self) -> Option<ConfigSnapshot> {
        self.read_snapshot(&self.active_key)
    }

    pub fn write_active(&self, snapshot: &ConfigSnapshot) {
        self.options
            .cache()
            .write(&self.active_key, snapshot.serialize().as_str());
    }

    fn read_snapshot(&self, key: &str) -> Option<ConfigSnapshot> {
        let cached = self.options.cache().read(key).unwrap_or_default();
        if cached.is_empty() {
            return None;
        }
        match snapshot_from_cached_json(cached.as_str()) {
            Ok(snapshot) => {
                debug!("Restored config snapshot from cache");
                Some(snapshot)
            }
            Err(err) => {
                warn!(event_id = 2200; "Failed to read config snapshot from cache. {err}");
                None
            }
        }
    }

    fn read_state(&self) -> Option<FetchState> {
        let cached = self.options.cache().read(&self.state_key)?;
        match serde_json::from_str::<PersistedFetchState>(cached.as_str()) {
            Ok(persisted) => Some(FetchState {
                last_fetch_time: persisted
                    .time_millis
                    .and_then(DateTime::from_timestamp_millis),
                last_fetch_status: persisted.status,
            }),
            Err(err) => {
                warn!(event_id = 2201; "Failed to read fetch state from cache. {err}");
                None
            }
        }
    }

    fn write_state(&self) {
        let state = self.fetch_state();
        let persisted = PersistedFetchState {
            time_millis: state.last_fetch_time.map(|time| time.timestamp_millis()),
            status: state.last_fetch_status,
        };
        match serde_json::to_string(&persisted) {
            Ok(json) => self.options.cache().write(&self.state_key, json.as_str()),
            Err(err) => warn!(event_id = 2202; "Failed to write fetch state to cache. {err}"),
        }
    }
}

fn cache_key(api_key: &str, kind: &str) -> String {
    sha1(format!("{api_key}_{kind}_{SERIALIZATION_FORMAT_VERSION}").as_str())
}
