//! Integration tests for the data set enrichment pipeline

mod common;

use ::common::enrich::{enrich_datasets, EnrichError};
use ::common::testkit::{MemoryStorageClient, MemoryVerifierClient};

#[tokio::test]
async fn test_output_covers_listing_in_order() {
    let (storage, verifier) = common::seeded_network(&[(10, 1), (11, 2), (12, 1)]);

    let reports = enrich_datasets(Some(&common::session()), Some(&storage), &verifier)
        .await
        .unwrap();

    assert_eq!(reports.len(), 3);
    let ids: Vec<u64> = reports.iter().map(|report| report.dataset_id()).collect();
    assert_eq!(ids, vec![10, 11, 12]);
    assert!(reports.iter().all(|report| report.is_complete()));
}

#[tokio::test]
async fn test_complete_report_is_fully_merged() {
    let (storage, verifier) = common::seeded_network(&[(10, 1)]);

    let reports = enrich_datasets(Some(&common::session()), Some(&storage), &verifier)
        .await
        .unwrap();

    let record = reports[0].record();
    assert_eq!(record.dataset.provider_id, 1);
    assert_eq!(record.provider.as_ref().unwrap().id, 1);
    assert_eq!(record.service_url, "https://pdp.provider-1.example.com");
    let size = record.size.as_ref().unwrap();
    assert_eq!(size.size_bytes, 4688 * 32);
    assert_eq!(size.message, "0.1431 MB");
    assert_eq!(record.pieces.as_ref().unwrap().pieces.len(), 2);
}

#[tokio::test]
async fn test_one_piece_failure_degrades_only_that_report() {
    let (storage, verifier) = common::seeded_network(&[(10, 1), (11, 2), (12, 3)]);
    storage.fail_pieces(11);

    let reports = enrich_datasets(Some(&common::session()), Some(&storage), &verifier)
        .await
        .unwrap();

    assert_eq!(reports.len(), 3);
    assert!(reports[0].is_complete());
    assert!(reports[2].is_complete());

    let partial = &reports[1];
    assert!(!partial.is_complete());
    assert_eq!(partial.dataset_id(), 11);
    // provider and size survive the degraded fetch
    let record = partial.record();
    assert!(record.provider.is_some());
    assert!(record.size.is_some());
    assert!(record.pieces.is_none());
    assert!(partial.reason().unwrap().contains("piece detail"));
}

#[tokio::test]
async fn test_provider_failure_still_yields_report() {
    let (storage, verifier) = common::seeded_network(&[(10, 1), (11, 2)]);
    storage.fail_provider(2);

    let reports = enrich_datasets(Some(&common::session()), Some(&storage), &verifier)
        .await
        .unwrap();

    assert_eq!(reports.len(), 2);
    assert!(reports[0].is_complete());

    // no provider means no service url, so the piece fetch fails
    // and the report degrades to partial
    let degraded = &reports[1];
    assert!(!degraded.is_complete());
    assert!(degraded.record().provider.is_none());
    assert_eq!(degraded.record().service_url, "");
}

#[tokio::test]
async fn test_missing_storage_client_fails_before_any_call() {
    let storage = MemoryStorageClient::new();
    let verifier = MemoryVerifierClient::new();

    let result =
        enrich_datasets::<MemoryStorageClient, _>(Some(&common::session()), None, &verifier).await;

    assert!(matches!(result, Err(EnrichError::ClientNotFound)));
    assert_eq!(storage.calls(), (0, 0, 0));
    assert_eq!(verifier.calls(), 0);
}

#[tokio::test]
async fn test_missing_session_fails_before_any_call() {
    let (storage, verifier) = common::seeded_network(&[(10, 1)]);

    let result = enrich_datasets(None, Some(&storage), &verifier).await;

    assert!(matches!(result, Err(EnrichError::NoSession)));
    assert_eq!(storage.calls(), (0, 0, 0));
    assert_eq!(verifier.calls(), 0);
}

#[tokio::test]
async fn test_empty_listing_is_empty_output() {
    let storage = MemoryStorageClient::new();
    let verifier = MemoryVerifierClient::new();

    let reports = enrich_datasets(Some(&common::session()), Some(&storage), &verifier)
        .await
        .unwrap();

    assert!(reports.is_empty());
    // the listing itself is the only call made
    assert_eq!(storage.calls(), (1, 0, 0));
    assert_eq!(verifier.calls(), 0);
}

#[tokio::test]
async fn test_verifier_outage_degrades_size_only() {
    let (storage, verifier) = common::seeded_network(&[(10, 1), (11, 2)]);
    verifier.fail_all();

    let reports = enrich_datasets(Some(&common::session()), Some(&storage), &verifier)
        .await
        .unwrap();

    // every data set still appears, with unknown size
    assert_eq!(reports.len(), 2);
    for report in &reports {
        assert!(report.is_complete());
        assert!(report.record().size.is_none());
        assert!(report.record().provider.is_some());
    }
}
