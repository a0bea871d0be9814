#![allow(dead_code)]

use log::kv::Key;
use log::{set_max_level, Level, Log, Metadata, Record};
use rand::distr::{Alphanumeric, SampleString};
use remote_config::ConfigCache;
use std::cell::RefCell;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

pub fn produce_mock_path() -> (String, String) {
    let api_key = rand_api_key();
    (api_key.clone(), format!("/configs/{api_key}/config_v1.json"))
}

pub fn rand_api_key() -> String {
    rand_str(24)
}

pub fn rand_str(len: usize) -> String {
    Alphanumeric.sample_string(&mut rand::rng(), len)
}

pub fn construct_json_payload(entries: &[(&str, &str)]) -> String {
    let entries = entries
        .iter()
        .map(|(key, val)| format!(r#""{key}":{val}"#))
        .collect::<Vec<String>>()
        .join(",");
    format!(r#"{{"entries":{{{entries}}},"state":"UPDATE"}}"#)
}

#[derive(Clone, Default)]
pub struct SharedCache {
    pub entries: Arc<Mutex<HashMap<String, String>>>,
}

impl ConfigCache for SharedCache {
    fn read(&self, key: &str) -> Option<String> {
        self.entries.lock().unwrap().get(key).cloned()
    }

    fn write(&self, key: &str, value: &str) {
        self.entries.lock().unwrap().insert(key.to_owned(), value.to_owned());
    }
}

pub struct RecordingLogger {}

impl RecordingLogger {
    thread_local!(pub static LOGS: RefCell<String> = RefCell::new(String::default()));
}

impl Log for RecordingLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= log::max_level() && metadata.target().contains("remote_config")
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }
        let level = match record.level() {
            Level::Error => "ERROR",
            Level::Warn => "WARNING",
            Level::Info => "INFO",
            Level::Debug => "DEBUG",
            Level::Trace => "TRACE",
        };
        let event_id = record.key_values().get(Key::from("event_id")).and_then(|id| id.to_i64()).unwrap_or(0);
        Self::LOGS.with_borrow_mut(|l| l.push_str(format!("{level} [{event_id}] {}\n", record.args()).as_str()));
    }

    fn flush(&self) {}
}

pub fn log_record_init() {
    set_max_level(log::LevelFilter::Warn);
    _ = log::set_logger(&RecordingLogger {});
}
