use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::RwLock;

use crate::client::{PaymentsClient, StorageClient, VerifierClient};
use crate::dataset::{Dataset, PieceSet, ProviderInfo};
use crate::payments::{AllowanceSnapshot, CostRates};
use crate::session::Address;

#[derive(Debug, Clone, thiserror::Error, PartialEq, Eq)]
pub enum MemoryClientError {
    #[error("injected failure: {0}")]
    Injected(String),
    #[error("not found: {0}")]
    NotFound(String),
}

/// In-memory `StorageClient` backed by seeded maps
#[derive(Debug, Clone, Default)]
pub struct MemoryStorageClient {
    inner: Arc<RwLock<MemoryStorageInner>>,
}

#[derive(Debug, Default)]
struct MemoryStorageInner {
    datasets: HashMap<Address, Vec<Dataset>>,
    providers: HashMap<u64, ProviderInfo>,
    pieces: HashMap<u64, PieceSet>,
    failing_pieces: HashSet<u64>,
    failing_providers: HashSet<u64>,
    list_calls: usize,
    provider_calls: usize,
    piece_calls: usize,
}

impl MemoryStorageClient {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert_dataset(&self, account: Address, dataset: Dataset) {
        self.inner
            .write()
            .datasets
            .entry(account)
            .or_default()
            .push(dataset);
    }

    pub fn insert_provider(&self, info: ProviderInfo) {
        self.inner.write().providers.insert(info.id, info);
    }

    pub fn insert_pieces(&self, verifier_id: u64, pieces: PieceSet) {
        self.inner.write().pieces.insert(verifier_id, pieces);
    }

    /// Make every piece-detail fetch for this data set fail
    pub fn fail_pieces(&self, verifier_id: u64) {
        self.inner.write().failing_pieces.insert(verifier_id);
    }

    /// Make every metadata lookup for this provider fail
    pub fn fail_provider(&self, provider_id: u64) {
        self.inner.write().failing_providers.insert(provider_id);
    }

    /// Calls received so far: (list, provider, pieces)
    pub fn calls(&self) -> (usize, usize, usize) {
        let inner = self.inner.read();
        (inner.list_calls, inner.provider_calls, inner.piece_calls)
    }
}

#[async_trait]
impl StorageClient for MemoryStorageClient {
    type Error = MemoryClientError;

    async fn list_datasets(&self, account: &Address) -> Result<Vec<Dataset>, Self::Error> {
        let mut inner = self.inner.write();
        inner.list_calls += 1;
        Ok(inner.datasets.get(account).cloned().unwrap_or_default())
    }

    async fn provider_info(&self, provider_id: u64) -> Result<ProviderInfo, Self::Error> {
        let mut inner = self.inner.write();
        inner.provider_calls += 1;
        if inner.failing_providers.contains(&provider_id) {
            return Err(MemoryClientError::Injected(format!(
                "provider {} unavailable",
                provider_id
            )));
        }
        inner
            .providers
            .get(&provider_id)
            .cloned()
            .ok_or_else(|| MemoryClientError::NotFound(format!("provider {}", provider_id)))
    }

    async fn fetch_pieces(
        &self,
        service_url: &str,
        verifier_id: u64,
    ) -> Result<PieceSet, Self::Error> {
        let mut inner = self.inner.write();
        inner.piece_calls += 1;
        // mirror the HTTP client: an empty endpoint is unusable
        if service_url.is_empty() {
            return Err(MemoryClientError::NotFound(
                "piece service endpoint".into(),
            ));
        }
        if inner.failing_pieces.contains(&verifier_id) {
            return Err(MemoryClientError::Injected(format!(
                "piece service for data set {} unavailable",
                verifier_id
            )));
        }
        inner
            .pieces
            .get(&verifier_id)
            .cloned()
            .ok_or_else(|| MemoryClientError::NotFound(format!("pieces for {}", verifier_id)))
    }
}

/// In-memory `VerifierClient`
#[derive(Debug, Clone, Default)]
pub struct MemoryVerifierClient {
    inner: Arc<RwLock<MemoryVerifierInner>>,
}

#[derive(Debug, Default)]
struct MemoryVerifierInner {
    leaf_counts: HashMap<u64, u64>,
    next_piece_ids: HashMap<u64, u64>,
    fail_all: bool,
    calls: usize,
}

impl MemoryVerifierClient {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_size(&self, verifier_id: u64, leaf_count: u64, next_piece_id: u64) {
        let mut inner = self.inner.write();
        inner.leaf_counts.insert(verifier_id, leaf_count);
        inner.next_piece_ids.insert(verifier_id, next_piece_id);
    }

    /// Make every verifier read fail, as if the chain endpoint were
    /// unreachable
    pub fn fail_all(&self) {
        self.inner.write().fail_all = true;
    }

    pub fn calls(&self) -> usize {
        self.inner.read().calls
    }
}

#[async_trait]
impl VerifierClient for MemoryVerifierClient {
    type Error = MemoryClientError;

    async fn leaf_count(&self, verifier_id: u64) -> Result<u64, Self::Error> {
        let mut inner = self.inner.write();
        inner.calls += 1;
        if inner.fail_all {
            return Err(MemoryClientError::Injected("verifier unreachable".into()));
        }
        inner
            .leaf_counts
            .get(&verifier_id)
            .copied()
            .ok_or_else(|| MemoryClientError::NotFound(format!("data set {}", verifier_id)))
    }

    async fn next_piece_id(&self, verifier_id: u64) -> Result<u64, Self::Error> {
        let mut inner = self.inner.write();
        inner.calls += 1;
        if inner.fail_all {
            return Err(MemoryClientError::Injected("verifier unreachable".into()));
        }
        inner
            .next_piece_ids
            .get(&verifier_id)
            .copied()
            .ok_or_else(|| MemoryClientError::NotFound(format!("data set {}", verifier_id)))
    }
}

/// In-memory `PaymentsClient` returning a fixed quote
#[derive(Debug, Clone)]
pub struct MemoryPaymentsClient {
    inner: Arc<RwLock<MemoryPaymentsInner>>,
}

#[derive(Debug)]
struct MemoryPaymentsInner {
    rates: CostRates,
    allowances: AllowanceSnapshot,
    fail: bool,
}

impl MemoryPaymentsClient {
    pub fn new(rates: CostRates, allowances: AllowanceSnapshot) -> Self {
        MemoryPaymentsClient {
            inner: Arc::new(RwLock::new(MemoryPaymentsInner {
                rates,
                allowances,
                fail: false,
            })),
        }
    }

    pub fn set_allowances(&self, allowances: AllowanceSnapshot) {
        self.inner.write().allowances = allowances;
    }

    /// Make every payments call fail
    pub fn fail_all(&self) {
        self.inner.write().fail = true;
    }
}

#[async_trait]
impl PaymentsClient for MemoryPaymentsClient {
    type Error = MemoryClientError;

    async fn cost_rates(&self) -> Result<CostRates, Self::Error> {
        let inner = self.inner.read();
        if inner.fail {
            return Err(MemoryClientError::Injected(
                "payments service unavailable".into(),
            ));
        }
        Ok(inner.rates)
    }

    async fn allowance_state(
        &self,
        _capacity_bytes: u64,
        _period_days: u64,
    ) -> Result<AllowanceSnapshot, Self::Error> {
        let inner = self.inner.read();
        if inner.fail {
            return Err(MemoryClientError::Injected(
                "payments service unavailable".into(),
            ));
        }
        Ok(inner.allowances)
    }
}
