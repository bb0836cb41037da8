use async_trait::async_trait;
use reqwest::{Client, Url};
use serde::de::DeserializeOwned;

use crate::dataset::{Dataset, PieceSet, ProviderInfo};
use crate::session::Address;

use super::StorageClient;

#[derive(Debug, thiserror::Error)]
pub enum HttpClientError {
    #[error("invalid service url: {0}")]
    Url(#[from] url::ParseError),
    #[error("url cannot be extended with path segments")]
    UrlNotBase,
    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),
    #[error("provider advertises no piece service endpoint")]
    NoServiceUrl,
}

/// `StorageClient` backed by the marketplace HTTP API and, for
/// piece detail, each provider's own service endpoint
///
/// Routes:
/// * `GET {api}/v0/accounts/{address}/data-sets`
/// * `GET {api}/v0/providers/{id}`
/// * `GET {service_url}/v0/data-sets/{verifier_id}/pieces`
#[derive(Debug, Clone)]
pub struct HttpStorageClient {
    api: Url,
    http: Client,
}

impl HttpStorageClient {
    pub fn new(api: Url) -> Self {
        HttpStorageClient {
            api,
            http: Client::new(),
        }
    }

    pub fn api(&self) -> &Url {
        &self.api
    }

    fn endpoint(base: &Url, segments: &[&str]) -> Result<Url, HttpClientError> {
        let mut url = base.clone();
        {
            let mut path = url
                .path_segments_mut()
                .map_err(|_| HttpClientError::UrlNotBase)?;
            path.pop_if_empty();
            path.extend(segments);
        }
        Ok(url)
    }

    async fn get_json<T: DeserializeOwned>(&self, url: Url) -> Result<T, HttpClientError> {
        tracing::debug!("GET {}", url);
        let response = self.http.get(url).send().await?.error_for_status()?;
        Ok(response.json().await?)
    }
}

#[async_trait]
impl StorageClient for HttpStorageClient {
    type Error = HttpClientError;

    async fn list_datasets(&self, account: &Address) -> Result<Vec<Dataset>, Self::Error> {
        let url = Self::endpoint(
            &self.api,
            &["v0", "accounts", account.as_str(), "data-sets"],
        )?;
        self.get_json(url).await
    }

    async fn provider_info(&self, provider_id: u64) -> Result<ProviderInfo, Self::Error> {
        let url = Self::endpoint(&self.api, &["v0", "providers", &provider_id.to_string()])?;
        self.get_json(url).await
    }

    async fn fetch_pieces(
        &self,
        service_url: &str,
        verifier_id: u64,
    ) -> Result<PieceSet, Self::Error> {
        if service_url.is_empty() {
            return Err(HttpClientError::NoServiceUrl);
        }
        let base = Url::parse(service_url)?;
        let url = Self::endpoint(&base, &["v0", "data-sets", &verifier_id.to_string(), "pieces"])?;
        self.get_json(url).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoint_joins_segments() {
        let base = Url::parse("https://market.example.com/api/").unwrap();
        let url = HttpStorageClient::endpoint(&base, &["v0", "providers", "7"]).unwrap();
        assert_eq!(url.as_str(), "https://market.example.com/api/v0/providers/7");
    }

    #[test]
    fn test_dataset_listing_wire_format() {
        let body = r#"[
            {"pdpVerifierDataSetId": 12, "providerId": 3, "withCdn": true},
            {"pdpVerifierDataSetId": 13, "providerId": 4, "withCdn": false}
        ]"#;
        let datasets: Vec<Dataset> = serde_json::from_str(body).unwrap();
        assert_eq!(datasets.len(), 2);
        assert_eq!(datasets[0].pdp_verifier_data_set_id, 12);
        assert!(datasets[0].with_cdn);
        assert_eq!(datasets[1].provider_id, 4);
    }

    #[test]
    fn test_provider_wire_format() {
        let body = r#"{
            "id": 3,
            "name": "acme-storage",
            "products": {
                "pdp": {"serviceUrl": "https://pdp.acme.example.com"}
            }
        }"#;
        let provider: ProviderInfo = serde_json::from_str(body).unwrap();
        assert_eq!(provider.id, 3);
        assert_eq!(
            provider.piece_service_url(),
            "https://pdp.acme.example.com"
        );
    }

    #[test]
    fn test_piece_set_wire_format() {
        let body = r#"{
            "id": 12,
            "pieces": [
                {"pieceId": 0, "pieceCid": "baga6ea4seaqabc"},
                {"pieceId": 1, "pieceCid": "baga6ea4seaqdef", "subPieceCid": "baga6ea4seaqsub"}
            ],
            "nextChallengeEpoch": 881200
        }"#;
        let pieces: PieceSet = serde_json::from_str(body).unwrap();
        assert_eq!(pieces.id, 12);
        assert_eq!(pieces.pieces.len(), 2);
        assert_eq!(pieces.pieces[1].sub_piece_cid.as_deref(), Some("baga6ea4seaqsub"));
        assert_eq!(pieces.next_challenge_epoch, Some(881200));
    }
}
