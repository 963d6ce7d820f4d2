//! Application state management

use std::sync::Arc;

use crate::{
    config::Config,
    store::{RecordStore, XmlFileStore},
};

/// Application state shared across handlers
///
/// Holds configuration and the record store. The store is consulted on every
/// request; the state itself carries no request data.
#[derive(Clone)]
pub struct AppState {
    config: Arc<Config>,
    store: Arc<dyn RecordStore>,
}

impl AppState {
    /// Create state backed by the XML dataset named in the configuration
    pub fn new(config: Config) -> Self {
        let store = XmlFileStore::new(config.search.dataset_path.clone());
        Self::with_store(config, store)
    }

    /// Create state with a caller-supplied store
    pub fn with_store<S: RecordStore + 'static>(config: Config, store: S) -> Self {
        Self {
            config: Arc::new(config),
            store: Arc::new(store),
        }
    }

    /// Get the configuration
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Get the record store
    pub fn store(&self) -> Arc<dyn RecordStore> {
        Arc::clone(&self.store)
    }

    /// Token clients must present in the `AccessToken` header
    pub fn access_token(&self) -> &str {
        &self.config.search.access_token
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{models::Record, store::StoreError};

    struct EmptyStore;

    impl RecordStore for EmptyStore {
        fn load(&self) -> Result<Vec<Record>, StoreError> {
            Ok(Vec::new())
        }
    }

    #[test]
    fn test_state_exposes_config_and_store() {
        let mut config = Config::default();
        config.search.access_token = "secret".to_string();
        let state = AppState::with_store(config, EmptyStore);

        assert_eq!(state.access_token(), "secret");
        assert!(state.store().load().unwrap().is_empty());
    }

    #[test]
    fn test_default_store_reads_configured_path() {
        let mut config = Config::default();
        config.search.dataset_path = "/nonexistent/people.xml".into();
        let state = AppState::new(config);

        assert!(matches!(state.store().load(), Err(StoreError::Read { .. })));
    }
}
