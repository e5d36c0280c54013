//! Location-scoped stock search: validate, load, then display or fail.

use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;
use tracing::{debug, warn};

use client::api::{ApiClient, StockFilters};
use client::errors::ApiError;
use client::transport::Transport;
use models::blood::{HospitalStock, LocationQuery};
use service::synthetic;

/// Query lifecycle states, observable by the rendering layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchState {
    Idle,
    Validating,
    Loading,
    Displaying,
    Failed,
}

#[derive(Debug, Error)]
pub enum FlowError {
    /// Missing required input; surfaced as a warning, no request is issued.
    #[error("{0}")]
    Validation(String),
    /// The stock query failed; rendered inline, no automatic retry.
    #[error("failed to load blood stock: {0}")]
    Fetch(String),
}

/// Source of hospital stock for the search flow.
#[async_trait]
pub trait StockProvider: Send + Sync {
    async fn fetch(&self, query: &LocationQuery) -> Result<Vec<HospitalStock>, ApiError>;
}

/// Live backend lookup through the API client.
pub struct LiveProvider<T: Transport> {
    client: Arc<ApiClient<T>>,
}

impl<T: Transport> LiveProvider<T> {
    pub fn new(client: Arc<ApiClient<T>>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl<T: Transport> StockProvider for LiveProvider<T> {
    async fn fetch(&self, query: &LocationQuery) -> Result<Vec<HospitalStock>, ApiError> {
        let filters = StockFilters {
            county: Some(query.county.clone()),
            constituency: Some(query.constituency.clone()),
            blood_type: query.blood_type,
        };
        self.client.blood_availability(&filters).await
    }
}

/// Client-side generator producing the same shape as the live endpoint.
#[derive(Default)]
pub struct SyntheticProvider;

#[async_trait]
impl StockProvider for SyntheticProvider {
    async fn fetch(&self, query: &LocationQuery) -> Result<Vec<HospitalStock>, ApiError> {
        Ok(synthetic::generate_stock(query))
    }
}

/// Live lookup with a synthetic stand-in: used directly when no live client
/// is configured, and as a fallback when the backend is unreachable.
/// Request-level errors (4xx/5xx) still surface to the caller.
pub struct FallbackProvider<T: Transport> {
    live: Option<LiveProvider<T>>,
    synthetic: SyntheticProvider,
}

impl<T: Transport> FallbackProvider<T> {
    pub fn new(live: Option<LiveProvider<T>>) -> Self {
        Self { live, synthetic: SyntheticProvider }
    }
}

#[async_trait]
impl<T: Transport> StockProvider for FallbackProvider<T> {
    async fn fetch(&self, query: &LocationQuery) -> Result<Vec<HospitalStock>, ApiError> {
        match &self.live {
            Some(live) => match live.fetch(query).await {
                Err(ApiError::Transport(e)) => {
                    warn!(error = %e, "backend unreachable; serving synthetic stock");
                    self.synthetic.fetch(query).await
                }
                other => other,
            },
            None => self.synthetic.fetch(query).await,
        }
    }
}

/// Single-query search state machine:
/// `Idle → Validating → Loading → {Displaying | Failed}`.
///
/// Re-submitting while a prior query is outstanding is not coordinated:
/// both resolve independently and the last resolution wins whatever state
/// the caller renders.
pub struct SearchFlow<P: StockProvider> {
    provider: P,
    state: SearchState,
}

impl<P: StockProvider> SearchFlow<P> {
    pub fn new(provider: P) -> Self {
        Self { provider, state: SearchState::Idle }
    }

    pub fn state(&self) -> SearchState {
        self.state
    }

    /// Run one query through validation and loading. Validation failures
    /// return to `Idle` without touching the provider.
    pub async fn submit(&mut self, query: &LocationQuery) -> Result<Vec<HospitalStock>, FlowError> {
        self.state = SearchState::Validating;
        if query.county.trim().is_empty() || query.constituency.trim().is_empty() {
            self.state = SearchState::Idle;
            return Err(FlowError::Validation(
                "Please select both County and Constituency".into(),
            ));
        }

        self.state = SearchState::Loading;
        debug!(county = %query.county, constituency = %query.constituency, "loading blood stock");
        match self.provider.fetch(query).await {
            Ok(hospitals) => {
                // received order is preserved; no sorting is imposed
                self.state = SearchState::Displaying;
                Ok(hospitals)
            }
            Err(e) => {
                self.state = SearchState::Failed;
                Err(FlowError::Fetch(e.to_string()))
            }
        }
    }
}
