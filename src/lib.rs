//! Remote config client for Rust.
//!
//! Fetches key/value config from a backend, keeps it pending until it is activated,
//! and serves reads from the activated config, the application defaults and static values.

#![warn(missing_docs)]

#[macro_use]
mod macros;
mod activation;
mod builder;
mod cache;
mod client;
mod constants;
mod defaults;
mod errors;
mod eval;
mod fetch;
mod model;
mod resource;
mod settings;
mod store;
mod utils;
mod value;

pub use builder::ClientBuilder;
pub use cache::ConfigCache;
pub use client::Client;
pub use constants::PKG_VERSION;
pub use errors::{ClientError, ErrorKind};
pub use model::enums::{LastFetchStatus, ValueSource};
pub use resource::{
    file::FileResourceLoader, loader::ResourceLoader, map::MapResourceLoader, ResourceError,
};
pub use settings::ConfigSettings;
pub use store::FetchState;
pub use value::{ConfigValue, Value, ValuePrimitive};
