/**
 * Collaborator seams for the storage network:
 *  the marketplace storage client, the on-chain
 *  verifier, and the payments/allowance service,
 *  plus an HTTP implementation of the storage
 *  client.
 */
pub mod client;
/**
 * Domain types for the marketplace: data sets,
 *  providers, pieces, and the enriched records
 *  the pipeline produces.
 */
pub mod dataset;
/**
 * The data set enrichment orchestrator. Lists an
 *  account's data sets and merges size, provider,
 *  and piece-level detail into one report per
 *  data set, degrading per item on failure.
 */
pub mod enrich;
/**
 * Payment accounting types shared by the
 *  allowance service seam and the sufficiency
 *  calculator.
 */
pub mod payments;
/**
 * Provider metadata resolution and projection to
 *  piece-detail service endpoints.
 */
pub mod providers;
/**
 * Explicit session context. The connected account
 *  is always passed into the pipelines, never read
 *  from ambient state.
 */
pub mod session;
/**
 * Per-data-set size metrics derived from the
 *  on-chain verifier.
 */
pub mod sizing;
/**
 * The storage sufficiency calculator. Judges
 *  whether current allowances can sustain the
 *  requested storage; fails closed.
 */
pub mod sufficiency;
/**
 * In-memory collaborator fakes with failure
 *  injection and call counters, for tests.
 */
pub mod testkit;

pub mod prelude {
    pub use crate::client::{PaymentsClient, StorageClient, VerifierClient};
    pub use crate::dataset::{Dataset, DatasetReport, EnrichedDataset, ProviderInfo};
    pub use crate::enrich::{enrich_datasets, EnrichError};
    pub use crate::session::{Address, Session};
    pub use crate::sizing::SizeInfo;
    pub use crate::sufficiency::{
        check_storage_sufficiency, StorageSufficiency, SufficiencyParams,
    };
}
