use std::collections::HashMap;

use futures::future::join_all;
use serde::{Deserialize, Serialize};

use crate::client::VerifierClient;
use crate::dataset::Dataset;

/// Size of one verifier leaf in bytes
pub const LEAF_SIZE_BYTES: u64 = 32;

/// Derived size metrics for one data set
///
/// Computed fresh on every query from the verifier's leaf count;
/// never persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SizeInfo {
    pub leaf_count: u64,
    pub piece_count: u64,
    pub size_bytes: u64,
    pub size_kib: f64,
    pub size_mib: f64,
    pub size_gib: f64,
    /// Human-readable summary at the most useful scale
    pub message: String,
}

impl SizeInfo {
    /// Derive metrics from the verifier's leaf count and next piece
    /// id (used as the piece count)
    pub fn from_leaf_count(leaf_count: u64, next_piece_id: u64) -> Self {
        let size_bytes = leaf_count.saturating_mul(LEAF_SIZE_BYTES);
        let size_kib = size_bytes as f64 / 1024.0;
        let size_mib = size_kib / 1024.0;
        let size_gib = size_mib / 1024.0;
        let message = if size_gib < 0.1 && size_mib > 0.1 {
            format!("{:.4} MB", size_mib)
        } else if size_mib < 0.1 && size_kib > 0.1 {
            format!("{:.4} KB", size_kib)
        } else {
            format!("{} bytes", size_bytes)
        };
        SizeInfo {
            leaf_count,
            piece_count: next_piece_id,
            size_bytes,
            size_kib,
            size_mib,
            size_gib,
            message,
        }
    }
}

/// Resolve size info for a set of data sets, keyed by verifier id
///
/// Queries the verifier once per data set, all in one batch. If any
/// query in the batch fails the whole batch degrades to an empty
/// map; callers must treat a missing entry as "unknown size", not
/// as zero. An empty input returns an empty map without touching
/// the verifier.
pub async fn resolve_size_info<V>(verifier: &V, datasets: &[Dataset]) -> HashMap<u64, SizeInfo>
where
    V: VerifierClient,
{
    if datasets.is_empty() {
        return HashMap::new();
    }
    match try_resolve_size_info(verifier, datasets).await {
        Ok(sizes) => sizes,
        Err(e) => {
            tracing::warn!("failed to resolve data set sizes, treating as unknown: {}", e);
            HashMap::new()
        }
    }
}

async fn try_resolve_size_info<V>(
    verifier: &V,
    datasets: &[Dataset],
) -> Result<HashMap<u64, SizeInfo>, V::Error>
where
    V: VerifierClient,
{
    let size_futures: Vec<_> = datasets
        .iter()
        .map(|dataset| {
            let verifier_id = dataset.pdp_verifier_data_set_id;
            async move {
                let leaf_count = verifier.leaf_count(verifier_id).await?;
                let next_piece_id = verifier.next_piece_id(verifier_id).await?;
                Ok::<_, V::Error>((
                    verifier_id,
                    SizeInfo::from_leaf_count(leaf_count, next_piece_id),
                ))
            }
        })
        .collect();

    join_all(size_futures).await.into_iter().collect()
}
