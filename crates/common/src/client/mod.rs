mod http;

pub use http::{HttpClientError, HttpStorageClient};

use std::fmt::{Debug, Display};

use async_trait::async_trait;

use crate::dataset::{Dataset, PieceSet, ProviderInfo};
use crate::payments::{AllowanceSnapshot, CostRates};
use crate::session::Address;

/// The marketplace storage network, as seen by this client
///
/// Covers the three read paths the pipelines need: the account's
/// data set listing, provider metadata, and the piece-detail
/// protocol spoken against a provider's service endpoint.
#[async_trait]
pub trait StorageClient: Send + Sync + Debug + Clone + 'static {
    type Error: Display + Debug + Send + Sync + 'static;

    /// List all data sets registered to an account
    async fn list_datasets(&self, account: &Address) -> Result<Vec<Dataset>, Self::Error>;

    /// Look up a provider's metadata and product capability map
    async fn provider_info(&self, provider_id: u64) -> Result<ProviderInfo, Self::Error>;

    /// Fetch piece-level detail for a data set from a provider's
    /// piece-detail endpoint
    ///
    /// # Arguments
    /// * `service_url` - Base URL of the provider's piece service,
    ///   as resolved from its product map. May be empty, in which
    ///   case the call must fail rather than guess an endpoint.
    /// * `verifier_id` - The data set's id on the on-chain verifier
    async fn fetch_pieces(
        &self,
        service_url: &str,
        verifier_id: u64,
    ) -> Result<PieceSet, Self::Error>;
}

/// The on-chain data set verifier. Both calls are contract reads.
#[async_trait]
pub trait VerifierClient: Send + Sync + Debug + Clone + 'static {
    type Error: Display + Debug + Send + Sync + 'static;

    /// Number of 32-byte leaves committed for a data set
    async fn leaf_count(&self, verifier_id: u64) -> Result<u64, Self::Error>;

    /// The next piece id the verifier would assign, used as the
    /// current piece count
    async fn next_piece_id(&self, verifier_id: u64) -> Result<u64, Self::Error>;
}

/// The payments and allowance service
#[async_trait]
pub trait PaymentsClient: Send + Sync + Debug + Clone + 'static {
    type Error: Display + Debug + Send + Sync + 'static;

    /// Current storage pricing
    async fn cost_rates(&self) -> Result<CostRates, Self::Error>;

    /// Balance and allowance state for storing `capacity_bytes` for
    /// `period_days`
    async fn allowance_state(
        &self,
        capacity_bytes: u64,
        period_days: u64,
    ) -> Result<AllowanceSnapshot, Self::Error>;
}
