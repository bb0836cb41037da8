use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::sizing::SizeInfo;

/// Product key under which a provider advertises its piece-detail
/// service endpoint.
pub const PIECE_SERVICE_PRODUCT: &str = "pdp";

/// A registered unit of stored data, as listed by the marketplace
/// for an account. Created and listed externally; read-only here.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Dataset {
    /// Id of the data set on the on-chain verifier
    pub pdp_verifier_data_set_id: u64,
    /// Id of the provider storing this data set
    pub provider_id: u64,
    /// Whether retrievals are served through the CDN
    pub with_cdn: bool,
}

/// A single product a provider advertises
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProviderProduct {
    /// Base URL of the product's service endpoint. May be empty if
    /// the provider registered the product without an endpoint.
    #[serde(default)]
    pub service_url: String,
}

/// Provider metadata, looked up per provider id referenced by a
/// data set
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProviderInfo {
    pub id: u64,
    #[serde(default)]
    pub name: String,
    /// Product capability map, keyed by product kind
    #[serde(default)]
    pub products: BTreeMap<String, ProviderProduct>,
}

impl ProviderInfo {
    /// The provider's advertised piece-detail endpoint, or an empty
    /// string if it offers no such product
    pub fn piece_service_url(&self) -> String {
        self.products
            .get(PIECE_SERVICE_PRODUCT)
            .map(|product| product.service_url.clone())
            .unwrap_or_default()
    }
}

/// A sub-unit of a data set with its own content identifier,
/// retrieved from a provider's service endpoint
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Piece {
    pub piece_id: u64,
    pub piece_cid: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sub_piece_cid: Option<String>,
}

/// Piece-level detail for one data set, as returned by a provider's
/// piece-detail endpoint
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PieceSet {
    /// Echo of the data set's verifier id
    pub id: u64,
    #[serde(default)]
    pub pieces: Vec<Piece>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next_challenge_epoch: Option<u64>,
}

/// One data set merged with everything the pipeline could resolve
/// for it
///
/// `provider` and `size` are `None` when their lookups degraded to
/// nothing; `pieces` is `None` on a `Partial` report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EnrichedDataset {
    #[serde(flatten)]
    pub dataset: Dataset,
    pub provider: Option<ProviderInfo>,
    pub size: Option<SizeInfo>,
    /// Resolved piece-detail endpoint, empty if unknown
    pub service_url: String,
    pub pieces: Option<PieceSet>,
}

impl EnrichedDataset {
    pub fn with_pieces(self, pieces: PieceSet) -> Self {
        EnrichedDataset {
            pieces: Some(pieces),
            ..self
        }
    }
}

/// Outcome of enriching one data set
///
/// The two variants make the degrade path exhaustively checkable by
/// callers instead of hiding it in optional fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "camelCase")]
pub enum DatasetReport {
    /// All lookups succeeded, piece detail included
    Complete { record: EnrichedDataset },
    /// Piece detail could not be fetched; the record carries
    /// everything else that resolved
    Partial { record: EnrichedDataset, reason: String },
}

impl DatasetReport {
    pub fn record(&self) -> &EnrichedDataset {
        match self {
            DatasetReport::Complete { record } => record,
            DatasetReport::Partial { record, .. } => record,
        }
    }

    pub fn dataset_id(&self) -> u64 {
        self.record().dataset.pdp_verifier_data_set_id
    }

    pub fn is_complete(&self) -> bool {
        matches!(self, DatasetReport::Complete { .. })
    }

    pub fn reason(&self) -> Option<&str> {
        match self {
            DatasetReport::Complete { .. } => None,
            DatasetReport::Partial { reason, .. } => Some(reason),
        }
    }
}
