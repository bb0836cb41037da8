use std::collections::HashMap;

use futures::future::join_all;

use crate::client::StorageClient;
use crate::dataset::ProviderInfo;

/// Resolve provider metadata for a list of provider ids
///
/// Issues one lookup per id in the input (duplicates included, the
/// map collapses them) and isolates failures per item: a provider
/// that cannot be resolved is logged and skipped without blocking
/// the rest of the batch.
pub async fn resolve_providers<S>(storage: &S, provider_ids: &[u64]) -> HashMap<u64, ProviderInfo>
where
    S: StorageClient,
{
    let provider_futures: Vec<_> = provider_ids
        .iter()
        .map(|provider_id| {
            let provider_id = *provider_id;
            async move {
                match storage.provider_info(provider_id).await {
                    Ok(info) => Some((provider_id, info)),
                    Err(e) => {
                        tracing::warn!("failed to resolve provider {}: {}", provider_id, e);
                        None
                    }
                }
            }
        })
        .collect();

    join_all(provider_futures)
        .await
        .into_iter()
        .flatten()
        .collect()
}

/// Project resolved providers to their piece-detail endpoints
///
/// Providers without the piece service product map to an empty
/// string. Built once per pipeline run and never mutated after.
pub fn piece_service_urls(providers: &HashMap<u64, ProviderInfo>) -> HashMap<u64, String> {
    providers
        .iter()
        .map(|(provider_id, info)| (*provider_id, info.piece_service_url()))
        .collect()
}
