use crate::value::Value;
use chrono::{DateTime, Utc};
use serde::Deserialize;
use std::collections::HashMap;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("JSON parsing failed. ({0})")]
    Parse(String),
    #[error("Value of entry '{0}' is not a primitive.")]
    InvalidValue(String),
}

/// Template state reported by the backend next to the entries.
#[derive(Deserialize, Debug, Clone, Copy, PartialEq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TemplateState {
    Update,
    NoChange,
    NoTemplate,
    EmptyConfig,
    InstanceStateUnspecified,
}

#[derive(Deserialize, Debug)]
pub struct FetchBody {
    #[serde(default)]
    entries: Option<HashMap<String, serde_json::Value>>,
    #[serde(default)]
    pub state: Option<TemplateState>,
    #[serde(default, rename = "templateVersion")]
    template_version: Option<u64>,
}

impl FetchBody {
    pub fn into_snapshot(
        self,
        json: &str,
        etag: &str,
        fetch_time: DateTime<Utc>,
    ) -> Result<ConfigSnapshot, Error> {
        let mut values = HashMap::new();
        if let Some(entries) = self.entries {
            values.reserve(entries.len());
            for (key, json_val) in entries.iter() {
                match Value::from_json_val(json_val) {
                    Some(val) => {
                        values.insert(key.clone(), val);
                    }
                    None => return Err(Error::InvalidValue(key.clone())),
                }
            }
        }
        Ok(ConfigSnapshot {
            values,
            config_json: json.to_owned(),
            etag: etag.to_owned(),
            fetch_time,
            template_version: self.template_version,
        })
    }
}

/// An immutable set of config values downloaded at `fetch_time`.
#[derive(Debug, Clone)]
pub struct ConfigSnapshot {
    pub values: HashMap<String, Value>,
    pub config_json: String,
    pub etag: String,
    pub fetch_time: DateTime<Utc>,
    pub template_version: Option<u64>,
}

impl Default for ConfigSnapshot {
    fn default() -> Self {
        Self {
            values: HashMap::default(),
            config_json: String::default(),
            etag: String::default(),
            fetch_time: DateTime::<Utc>::MIN_UTC,
            template_version: None,
        }
    }
}

// Snapshots are identified by the time they were downloaded.
impl PartialEq for ConfigSnapshot {
    fn eq(&self, other: &Self) -> bool {
        self.fetch_time == other.fetch_time
    }
}

impl ConfigSnapshot {
    pub fn serialize(&self) -> String {
        self.fetch_time.timestamp_millis().to_string()
            + "\n"
            + &self.etag
            + "\n"
            + &self.config_json
    }
}

pub fn parse_body(json: &str) -> Result<FetchBody, Error> {
    serde_json::from_str::<FetchBody>(json).map_err(|err| Error::Parse(err.to_string()))
}

pub fn snapshot_from_json(
    json: &str,
    etag: &str,
    fetch_time: DateTime<Utc>,
) -> Result<ConfigSnapshot, Error> {
    parse_body(json)?.into_snapshot(json, etag, fetch_time)
}

pub fn snapshot_from_cached_json(cached_json: &str) -> Result<ConfigSnapshot, Error> {
    let time_index = if let Some(time_index) = cached_json.find('\n') {
        time_index
    } else {
        return Err(Error::Parse(
            "Number of values is fewer than expected".to_owned(),
        ));
    };
    let without_time = &cached_json[time_index + 1..];
    let etag_index = if let Some(etag_index) = without_time.find('\n') {
        etag_index
    } else {
        return Err(Error::Parse(
            "Number of values is fewer than expected".to_owned(),
        ));
    };
    let time_string = &cached_json[..time_index];
    let time = if let Ok(time) = time_string.parse::<i64>() {
        time
    } else {
        return Err(Error::Parse(format!("Invalid fetch time: '{time_string}'")));
    };
    let fetch_time = if let Some(fetch_time) = DateTime::from_timestamp_millis(time) {
        fetch_time
    } else {
        return Err(Error::Parse(format!(
            "Invalid unix milliseconds value: '{time}'"
        )));
    };

    let config_json = &without_time[etag_index + 1..];
    let etag = &without_time[..etag_index];
    snapshot_from_json(config_json, etag, fetch_time)
}
