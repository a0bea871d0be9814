use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use log::{debug, error, warn};
use tokio::sync::{watch, Mutex};

use crate::builder::Options;
use crate::errors::{ClientError, ErrorKind};
use crate::fetch::fetcher::{FetchResponse, Fetcher};
use crate::model::enums::LastFetchStatus;
use crate::store::CacheStore;

type FetchResult = Result<(), ClientError>;

/// Downloads config into the [`CacheStore`], one request at a time.
///
/// A fetch started while another one is in flight joins it and returns its result.
pub struct FetchService {
    fetcher: Fetcher,
    store: Arc<CacheStore>,
    in_flight: Mutex<Option<watch::Receiver<Option<FetchResult>>>>,
}

impl FetchService {
    pub fn new(options: &Arc<Options>, store: Arc<CacheStore>) -> Result<Self, ClientError> {
        Ok(Self {
            fetcher: Fetcher::new(
                options.base_url(),
                options.api_key(),
                *options.http_timeout(),
            )?,
            store,
            in_flight: Mutex::new(None),
        })
    }

    /// Fetches when the stored config is older than `expiration`, or always when `bypass_cache` is set.
    pub async fn fetch(&self, expiration: Duration, bypass_cache: bool) -> FetchResult {
        if !bypass_cache && !expiration.is_zero() && self.is_fresh(expiration) {
            debug!("Fetched config is younger than {expiration:?}, skipping the fetch");
            return Ok(());
        }
        self.fetch_coalesced().await
    }

    fn is_fresh(&self, expiration: Duration) -> bool {
        let record = self.store.record();
        if record.fetched.is_none() {
            return false;
        }
        match record.state.last_fetch_time {
            Some(time) => {
                let age_millis = (Utc::now() - time).num_milliseconds();
                (age_millis.max(0) as u128) < expiration.as_millis()
            }
            None => false,
        }
    }

    async fn fetch_coalesced(&self) -> FetchResult {
        let mut slot = self.in_flight.lock().await;
        if let Some(rx) = slot.as_ref() {
            if rx.has_changed().is_ok() {
                let rx = rx.clone();
                drop(slot);
                debug!("Joining the fetch already in flight");
                return self.wait_for(rx).await;
            }
        }
        let (tx, rx) = watch::channel(None);
        *slot = Some(rx.clone());
        drop(slot);

        let result = self.fetch_now().await;
        // `rx` is alive, so the send can't fail.
        let _ = tx.send(Some(result.clone()));

        self.clear_slot(&rx).await;
        result
    }

    async fn wait_for(&self, mut rx: watch::Receiver<Option<FetchResult>>) -> FetchResult {
        loop {
            let current = rx.borrow_and_update().clone();
            if let Some(result) = current {
                return result;
            }
            if rx.changed().await.is_err() {
                if let Some(result) = rx.borrow().clone() {
                    return result;
                }
                self.clear_slot(&rx).await;
                let err = ClientError::new(
                    ErrorKind::FetchAbandoned,
                    "The fetch in flight was dropped before it completed.".to_owned(),
                );
                warn!(event_id = err.kind.as_u16(); "{}", err);
                return Err(err);
            }
        }
    }

    async fn clear_slot(&self, rx: &watch::Receiver<Option<FetchResult>>) {
        let mut slot = self.in_flight.lock().await;
        if slot.as_ref().is_some_and(|current| current.same_channel(rx)) {
            *slot = None;
        }
    }

    async fn fetch_now(&self) -> FetchResult {
        let etag = self
            .store
            .fetched()
            .map(|snapshot| snapshot.etag.clone())
            .unwrap_or_default();
        match self.fetcher.fetch(etag.as_str()).await {
            FetchResponse::Fetched(snapshot) => {
                self.store.store_fetched(snapshot);
                Ok(())
            }
            FetchResponse::NotModified => {
                if self.store.fetched().is_none() {
                    let err = ClientError::new(
                        ErrorKind::InvalidHttpResponseWhenLocalCacheIsEmpty,
                        "The backend reported no change but no config was fetched before."
                            .to_owned(),
                    );
                    error!(event_id = err.kind.as_u16(); "{}", err);
                    self.store.record_status(LastFetchStatus::Failure);
                    return Err(err);
                }
                self.store.record_unchanged(Utc::now());
                Ok(())
            }
            FetchResponse::Throttled(err) => {
                self.store.record_status(LastFetchStatus::Throttled);
                Err(err)
            }
            FetchResponse::Failed(err) => {
                self.store.record_status(LastFetchStatus::Failure);
                Err(err)
            }
        }
    }
}
