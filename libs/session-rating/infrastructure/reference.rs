//! Expected-values reference data with a single-flight cache

use crate::domain::expected::{ExpectedValuesDocument, ExpectedValuesTable};
use async_trait::async_trait;
use futures::future::{BoxFuture, FutureExt, Shared};
use parking_lot::Mutex;
use std::sync::Arc;
use thiserror::Error;
use tracing::{error, info};

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ReferenceError {
    #[error("HTTP request failed: {0}")]
    Http(String),

    #[error("Unexpected HTTP status: {0}")]
    Status(u16),

    #[error("Failed to decode expected values: {0}")]
    Decode(String),
}

pub type Result<T> = std::result::Result<T, ReferenceError>;

/// Where expected values come from
#[async_trait]
pub trait ReferenceSource: Send + Sync + 'static {
    async fn fetch(&self) -> Result<ExpectedValuesTable>;
}

/// Fetches the published expected-values document over HTTP
pub struct HttpReferenceSource {
    client: reqwest::Client,
    url: String,
}

impl HttpReferenceSource {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            url: url.into(),
        }
    }
}

#[async_trait]
impl ReferenceSource for HttpReferenceSource {
    async fn fetch(&self) -> Result<ExpectedValuesTable> {
        info!("[Reference] Fetching expected values from {}", self.url);

        let response = self
            .client
            .get(&self.url)
            .send()
            .await
            .map_err(|e| ReferenceError::Http(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(ReferenceError::Status(status.as_u16()));
        }

        let document: ExpectedValuesDocument = response
            .json()
            .await
            .map_err(|e| ReferenceError::Decode(e.to_string()))?;

        let table = ExpectedValuesTable::from(document);
        info!("[Reference] Loaded expected values for {} vehicles", table.len());
        Ok(table)
    }
}

/// Observable cache state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProviderState {
    Idle,
    Pending,
    Ready,
    Failed,
}

type SharedFetch = Shared<BoxFuture<'static, Result<Arc<ExpectedValuesTable>>>>;

enum FetchState {
    Idle,
    Pending(SharedFetch),
    Ready(Arc<ExpectedValuesTable>),
    Failed(ReferenceError),
}

/// Expected-values provider
///
/// `fetch_cached` performs at most one fetch for the life of the provider:
/// callers arriving while it is in flight await the same future, and both
/// the table and a failure are kept forever. There is no retry.
pub struct ExpectedValuesProvider {
    source: Arc<dyn ReferenceSource>,
    state: Mutex<FetchState>,
}

impl ExpectedValuesProvider {
    pub fn new(source: Arc<dyn ReferenceSource>) -> Self {
        Self {
            source,
            state: Mutex::new(FetchState::Idle),
        }
    }

    pub fn http(url: impl Into<String>) -> Self {
        Self::new(Arc::new(HttpReferenceSource::new(url)))
    }

    /// Uncached fetch straight from the source
    pub async fn fetch(&self) -> Result<ExpectedValuesTable> {
        self.source.fetch().await
    }

    pub async fn fetch_cached(&self) -> Result<Arc<ExpectedValuesTable>> {
        // The lock is never held across the await below.
        let pending = {
            let mut state = self.state.lock();
            match &*state {
                FetchState::Ready(table) => return Ok(Arc::clone(table)),
                FetchState::Failed(e) => return Err(e.clone()),
                FetchState::Pending(fetch) => fetch.clone(),
                FetchState::Idle => {
                    let fetch = self.start_fetch();
                    *state = FetchState::Pending(fetch.clone());
                    fetch
                }
            }
        };

        let result = pending.await;

        let mut state = self.state.lock();
        if matches!(*state, FetchState::Pending(_)) {
            *state = match &result {
                Ok(table) => FetchState::Ready(Arc::clone(table)),
                Err(e) => {
                    error!("[Reference] Expected values unavailable: {}", e);
                    FetchState::Failed(e.clone())
                }
            };
        }

        result
    }

    pub fn state(&self) -> ProviderState {
        match &*self.state.lock() {
            FetchState::Idle => ProviderState::Idle,
            FetchState::Pending(_) => ProviderState::Pending,
            FetchState::Ready(_) => ProviderState::Ready,
            FetchState::Failed(_) => ProviderState::Failed,
        }
    }

    fn start_fetch(&self) -> SharedFetch {
        let source = Arc::clone(&self.source);
        async move { source.fetch().await.map(Arc::new) }
            .boxed()
            .shared()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::expected::ExpectedValues;

    struct FixedSource(Result<ExpectedValuesTable>);

    #[async_trait]
    impl ReferenceSource for FixedSource {
        async fn fetch(&self) -> Result<ExpectedValuesTable> {
            self.0.clone()
        }
    }

    fn table() -> ExpectedValuesTable {
        ExpectedValuesTable::from_entries(vec![ExpectedValues {
            vehicle_id: 1,
            exp_damage: 100.0,
            exp_spot: 1.0,
            exp_frag: 1.0,
            exp_def: 1.0,
            exp_win_rate: 50.0,
        }])
    }

    #[tokio::test]
    async fn test_ready_after_success() {
        let provider = ExpectedValuesProvider::new(Arc::new(FixedSource(Ok(table()))));
        assert_eq!(provider.state(), ProviderState::Idle);

        let first = provider.fetch_cached().await.unwrap();
        assert_eq!(provider.state(), ProviderState::Ready);

        let second = provider.fetch_cached().await.unwrap();
        assert!(Arc::ptr_eq(&first, &second));
    }

    #[tokio::test]
    async fn test_failure_is_sticky() {
        let provider =
            ExpectedValuesProvider::new(Arc::new(FixedSource(Err(ReferenceError::Status(503)))));

        assert_eq!(provider.fetch_cached().await, Err(ReferenceError::Status(503)));
        assert_eq!(provider.state(), ProviderState::Failed);
        assert_eq!(provider.fetch_cached().await, Err(ReferenceError::Status(503)));
    }

    #[tokio::test]
    async fn test_uncached_fetch_leaves_state_alone() {
        let provider = ExpectedValuesProvider::new(Arc::new(FixedSource(Ok(table()))));
        assert_eq!(provider.fetch().await.unwrap().len(), 1);
        assert_eq!(provider.state(), ProviderState::Idle);
    }
}
