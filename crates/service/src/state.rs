use std::sync::Arc;

use anyhow::{anyhow, Result};
use parking_lot::RwLock;

use common::client::{HttpStorageClient, PaymentsClient, StorageClient, VerifierClient};
use common::dataset::DatasetReport;
use common::enrich::{enrich_datasets, EnrichError};
use common::session::{Address, Session};
use common::sufficiency::{check_storage_sufficiency, StorageSufficiency, SufficiencyParams};

use crate::cache::SnapshotCache;
use crate::config::Config;

/// Shared application state for a marketplace client
///
/// Owns the collaborator clients, the connected session (if any),
/// and the per-account snapshot cache. `storage: None` models the
/// disconnected wallet: the enrichment pipeline then fails with its
/// distinct not-found error before issuing any call.
#[derive(Debug, Clone)]
pub struct State<S, V, P> {
    storage: Option<S>,
    verifier: V,
    payments: P,
    session: Arc<RwLock<Option<Session>>>,
    cache: SnapshotCache,
    params: SufficiencyParams,
}

impl<S, V, P> State<S, V, P>
where
    S: StorageClient,
    V: VerifierClient,
    P: PaymentsClient,
{
    pub fn new(config: &Config, storage: Option<S>, verifier: V, payments: P) -> Self {
        State {
            storage,
            verifier,
            payments,
            session: Arc::new(RwLock::new(None)),
            cache: SnapshotCache::new(config.snapshot_ttl),
            params: config.sufficiency_params(),
        }
    }

    /// Bind a connected account to this state
    pub fn connect(&self, account: Address) {
        tracing::info!("account {} connected", account);
        *self.session.write() = Some(Session::new(account));
    }

    /// Drop the session and every cached snapshot
    pub fn disconnect(&self) {
        if let Some(session) = self.session.write().take() {
            tracing::info!("account {} disconnected", session.account);
        }
        self.cache.clear();
    }

    pub fn session(&self) -> Option<Session> {
        self.session.read().clone()
    }

    pub fn cache(&self) -> &SnapshotCache {
        &self.cache
    }

    /// Enriched data sets for the connected account, served from
    /// the snapshot cache when fresh
    pub async fn enriched_datasets(&self) -> Result<Vec<DatasetReport>, EnrichError<S::Error>> {
        let session = self.session();
        if let Some(session) = &session {
            if let Some(snapshot) = self.cache.get(&session.account) {
                tracing::debug!("serving cached snapshot for {}", session.account);
                return Ok(snapshot.reports);
            }
        }

        let reports = enrich_datasets(session.as_ref(), self.storage.as_ref(), &self.verifier).await?;
        if let Some(session) = session {
            self.cache.put(session.account, reports.clone());
        }
        Ok(reports)
    }

    /// Re-run the pipeline for an account, bypassing and then
    /// repopulating the cache
    pub async fn refresh(&self, account: &Address) -> Result<Vec<DatasetReport>, EnrichError<S::Error>> {
        let session = Session::new(account.clone());
        let reports = enrich_datasets(Some(&session), self.storage.as_ref(), &self.verifier).await?;
        self.cache.put(account.clone(), reports.clone());
        Ok(reports)
    }

    /// Judge allowance sufficiency for the connected account
    ///
    /// Fails closed, like the underlying calculator: no session, no
    /// storage client, or any upstream error is a hard error.
    pub async fn sufficiency(&self) -> Result<StorageSufficiency> {
        let session = self.session().ok_or_else(|| anyhow!("no connected account"))?;
        let storage = self
            .storage
            .as_ref()
            .ok_or_else(|| anyhow!("storage client not found"))?;
        check_storage_sufficiency(
            &session,
            storage,
            &self.verifier,
            &self.payments,
            &self.params,
        )
        .await
    }
}

impl<V, P> State<HttpStorageClient, V, P>
where
    V: VerifierClient,
    P: PaymentsClient,
{
    /// Wire the production HTTP storage client from `Config::api_url`
    pub fn with_http_storage(config: &Config, verifier: V, payments: P) -> Result<Self> {
        let api_url = config
            .api_url
            .clone()
            .ok_or_else(|| anyhow!("config has no marketplace api url"))?;
        let storage = HttpStorageClient::new(api_url);
        Ok(State::new(config, Some(storage), verifier, payments))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    use common::dataset::{
        Dataset, PieceSet, ProviderInfo, ProviderProduct, PIECE_SERVICE_PRODUCT,
    };
    use common::payments::{AllowanceSnapshot, CostRates};
    use common::testkit::{MemoryPaymentsClient, MemoryStorageClient, MemoryVerifierClient};

    fn account() -> Address {
        Address::new("0xabc")
    }

    fn seeded_state() -> (
        State<MemoryStorageClient, MemoryVerifierClient, MemoryPaymentsClient>,
        MemoryStorageClient,
    ) {
        let storage = MemoryStorageClient::new();
        storage.insert_dataset(
            account(),
            Dataset {
                pdp_verifier_data_set_id: 10,
                provider_id: 1,
                with_cdn: false,
            },
        );
        let mut products = BTreeMap::new();
        products.insert(
            PIECE_SERVICE_PRODUCT.to_string(),
            ProviderProduct {
                service_url: "https://pdp.example.com".to_string(),
            },
        );
        storage.insert_provider(ProviderInfo {
            id: 1,
            name: "provider-1".to_string(),
            products,
        });
        storage.insert_pieces(
            10,
            PieceSet {
                id: 10,
                pieces: Vec::new(),
                next_challenge_epoch: None,
            },
        );
        let verifier = MemoryVerifierClient::new();
        verifier.set_size(10, 4688, 2);
        let payments = MemoryPaymentsClient::new(
            CostRates {
                price_per_gib_per_epoch: 10,
            },
            AllowanceSnapshot {
                rate_needed: 100,
                rate_used: 100,
                rate_allowance: 200,
                lockup_needed: 0,
                lockup_used: 0,
                lockup_allowance: 2_880_000 * 100,
                deposit_needed: 0,
            },
        );
        let state = State::new(
            &Config::default(),
            Some(storage.clone()),
            verifier,
            payments,
        );
        (state, storage)
    }

    #[tokio::test]
    async fn test_second_read_is_served_from_cache() {
        let (state, storage) = seeded_state();
        state.connect(account());

        let first = state.enriched_datasets().await.unwrap();
        let second = state.enriched_datasets().await.unwrap();

        assert_eq!(first, second);
        let (list_calls, _, _) = storage.calls();
        assert_eq!(list_calls, 1);
    }

    #[tokio::test]
    async fn test_refresh_bypasses_cache() {
        let (state, storage) = seeded_state();
        state.connect(account());

        state.enriched_datasets().await.unwrap();
        state.refresh(&account()).await.unwrap();

        let (list_calls, _, _) = storage.calls();
        assert_eq!(list_calls, 2);
    }

    #[tokio::test]
    async fn test_disconnected_state_fails_fast() {
        let (state, storage) = seeded_state();

        let result = state.enriched_datasets().await;
        assert!(matches!(result, Err(EnrichError::NoSession)));
        assert_eq!(storage.calls(), (0, 0, 0));

        let result = state.sufficiency().await;
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_sufficiency_for_connected_account() {
        let (state, _) = seeded_state();
        state.connect(account());

        let result = state.sufficiency().await.unwrap();
        assert!(result.is_rate_sufficient);
        assert!(result.is_lockup_sufficient);
        assert!(result.is_sufficient);
        assert_eq!(result.current_storage_bytes, 4688 * 32);
    }
}
