use std::collections::HashMap;
use std::fmt::{Debug, Display};

use futures::future::join_all;

use crate::client::{StorageClient, VerifierClient};
use crate::dataset::{DatasetReport, EnrichedDataset};
use crate::providers::{piece_service_urls, resolve_providers};
use crate::session::Session;
use crate::sizing::resolve_size_info;

#[derive(Debug, thiserror::Error)]
pub enum EnrichError<E>
where
    E: Display + Debug,
{
    /// No storage client is connected; nothing can be listed
    #[error("storage client not found")]
    ClientNotFound,
    /// No account session; the listing has no subject
    #[error("no connected account")]
    NoSession,
    /// The data set listing itself failed. Per-data-set enrichment
    /// failures never surface here.
    #[error("failed to list data sets: {0}")]
    List(E),
}

/// Enrich every data set registered to the session's account
///
/// Lists the account's data sets, then resolves size metrics,
/// provider metadata, and piece-level detail for each, merging them
/// into one report per data set. Output is in listing order and
/// covers every listed data set exactly once: a data set whose
/// piece detail cannot be fetched yields a `Partial` report rather
/// than being dropped or failing the batch.
///
/// Read-only; issues network and on-chain queries only. Memoization
/// is the calling layer's concern.
pub async fn enrich_datasets<S, V>(
    session: Option<&Session>,
    storage: Option<&S>,
    verifier: &V,
) -> Result<Vec<DatasetReport>, EnrichError<S::Error>>
where
    S: StorageClient,
    V: VerifierClient,
{
    let session = session.ok_or(EnrichError::NoSession)?;
    let storage = storage.ok_or(EnrichError::ClientNotFound)?;

    let datasets = storage
        .list_datasets(&session.account)
        .await
        .map_err(EnrichError::List)?;
    if datasets.is_empty() {
        tracing::debug!("account {} has no data sets", session.account);
        return Ok(Vec::new());
    }
    tracing::debug!(
        "enriching {} data set(s) for account {}",
        datasets.len(),
        session.account
    );

    // One provider lookup per data set, repeats included
    let provider_ids: Vec<u64> = datasets.iter().map(|dataset| dataset.provider_id).collect();
    let (sizes, providers) = tokio::join!(
        resolve_size_info(verifier, &datasets),
        resolve_providers(storage, &provider_ids),
    );
    let endpoints = piece_service_urls(&providers);

    let detail_futures: Vec<_> = datasets
        .iter()
        .map(|dataset| {
            let verifier_id = dataset.pdp_verifier_data_set_id;
            let service_url = endpoints
                .get(&dataset.provider_id)
                .cloned()
                .unwrap_or_default();
            let record = EnrichedDataset {
                dataset: dataset.clone(),
                provider: providers.get(&dataset.provider_id).cloned(),
                size: sizes.get(&verifier_id).cloned(),
                service_url: service_url.clone(),
                pieces: None,
            };
            async move {
                match storage.fetch_pieces(&service_url, verifier_id).await {
                    Ok(pieces) => (
                        verifier_id,
                        DatasetReport::Complete {
                            record: record.with_pieces(pieces),
                        },
                    ),
                    Err(e) => {
                        tracing::warn!(
                            "failed to fetch piece detail for data set {}: {}",
                            verifier_id,
                            e
                        );
                        (
                            verifier_id,
                            DatasetReport::Partial {
                                record,
                                reason: format!("failed to fetch piece detail: {}", e),
                            },
                        )
                    }
                }
            }
        })
        .collect();

    let mut reports: HashMap<u64, DatasetReport> =
        join_all(detail_futures).await.into_iter().collect();

    // Re-associate by verifier id so the arbitrary completion order
    // above cannot reorder the output relative to the listing
    Ok(datasets
        .iter()
        .filter_map(|dataset| reports.remove(&dataset.pdp_verifier_data_set_id))
        .collect())
}
