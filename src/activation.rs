use std::sync::Arc;

use arc_swap::ArcSwap;
use log::debug;

use crate::model::snapshot::ConfigSnapshot;
use crate::store::CacheStore;

/// Holds the snapshot that reads are served from.
pub struct ActivationManager {
    active: ArcSwap<ConfigSnapshot>,
}

impl ActivationManager {
    pub fn new(initial: Option<ConfigSnapshot>) -> Self {
        Self {
            active: ArcSwap::from_pointee(initial.unwrap_or_default()),
        }
    }

    pub fn active(&self) -> Arc<ConfigSnapshot> {
        self.active.load_full()
    }

    /// Promotes the pending snapshot of the `store` to active.
    ///
    /// Returns `false` when nothing was fetched yet or the pending snapshot is already active.
    /// Of concurrent callers promoting the same snapshot exactly one gets `true`.
    pub fn activate(&self, store: &CacheStore) -> bool {
        let fetched = match store.fetched() {
            Some(fetched) => fetched,
            None => return false,
        };
        let current = self.active.load_full();
        if *current == *fetched {
            return false;
        }
        let prev = self.active.compare_and_swap(&current, Arc::clone(&fetched));
        if !Arc::ptr_eq(&*prev, &current) {
            return false;
        }
        store.write_active(&fetched);
        match fetched.template_version {
            Some(version) => debug!("Activated template version {version} fetched at {}", fetched.fetch_time),
            None => debug!("Activated config fetched at {}", fetched.fetch_time),
        }
        true
    }
}

#[cfg(test)]
mod activation_tests {
    use std::sync::Arc;

    use chrono::DateTime;

    use crate::activation::ActivationManager;
    use crate::model::snapshot::snapshot_from_json;
    use crate::store::CacheStore;
    use crate::utils::test_utils::MapCache;
    use crate::value::Value;
    use crate::Client;

    fn store(cache: &MapCache) -> CacheStore {
        let builder = Client::builder("key")
            .base_url("http://localhost")
            .cache(Box::new(cache.clone()));
        CacheStore::new(Arc::new(builder.build_options().unwrap()))
    }

    #[test]
    fn nothing_fetched() {
        let store = store(&MapCache::default());
        let manager = ActivationManager::new(None);
        assert!(!manager.activate(&store));
        assert!(manager.active().values.is_empty());
    }

    #[test]
    fn activate_once() {
        let cache = MapCache::default();
        let store = store(&cache);
        let time = DateTime::from_timestamp_millis(1_700_000_000_000).unwrap();
        store.store_fetched(snapshot_from_json(r#"{"entries":{"a":1}}"#, "e", time).unwrap());

        let manager = ActivationManager::new(None);
        assert!(manager.activate(&store));
        assert!(!manager.activate(&store));
        assert_eq!(manager.active().values["a"], Value::Int(1));
        assert_eq!(store.read_active().unwrap().fetch_time, time);
    }

    #[test]
    fn restored_active_is_not_reactivated() {
        let store = store(&MapCache::default());
        let time = DateTime::from_timestamp_millis(1_700_000_000_000).unwrap();
        let snapshot = snapshot_from_json(r#"{"entries":{"a":1}}"#, "e", time).unwrap();
        store.store_fetched(snapshot.clone());

        let manager = ActivationManager::new(Some(snapshot));
        assert!(!manager.activate(&store));
    }

    #[test]
    fn concurrent_activation() {
        let store = Arc::new(store(&MapCache::default()));
        let time = DateTime::from_timestamp_millis(1_700_000_000_000).unwrap();
        store.store_fetched(snapshot_from_json(r#"{"entries":{"a":1}}"#, "e", time).unwrap());
        let manager = Arc::new(ActivationManager::new(None));

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let store = Arc::clone(&store);
                let manager = Arc::clone(&manager);
                std::thread::spawn(move || manager.activate(&store))
            })
            .collect();
        let activated = handles
            .into_iter()
            .map(|handle| handle.join().unwrap())
            .filter(|activated| *activated)
            .count();
        assert_eq!(activated, 1);
    }
}
