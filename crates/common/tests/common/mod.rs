//! Shared fixtures for pipeline integration tests
#![allow(dead_code)]

use std::collections::BTreeMap;

use common::dataset::{
    Dataset, Piece, PieceSet, ProviderInfo, ProviderProduct, PIECE_SERVICE_PRODUCT,
};
use common::session::{Address, Session};
use common::testkit::{MemoryStorageClient, MemoryVerifierClient};

pub fn account() -> Address {
    Address::new("0xabc0000000000000000000000000000000000001")
}

pub fn session() -> Session {
    Session::new(account())
}

pub fn dataset(verifier_id: u64, provider_id: u64) -> Dataset {
    Dataset {
        pdp_verifier_data_set_id: verifier_id,
        provider_id,
        with_cdn: false,
    }
}

pub fn provider(id: u64) -> ProviderInfo {
    let mut products = BTreeMap::new();
    products.insert(
        PIECE_SERVICE_PRODUCT.to_string(),
        ProviderProduct {
            service_url: format!("https://pdp.provider-{}.example.com", id),
        },
    );
    ProviderInfo {
        id,
        name: format!("provider-{}", id),
        products,
    }
}

pub fn piece_set(verifier_id: u64, count: u64) -> PieceSet {
    PieceSet {
        id: verifier_id,
        pieces: (0..count)
            .map(|piece_id| Piece {
                piece_id,
                piece_cid: format!("baga6ea4seaq{}x{}", verifier_id, piece_id),
                sub_piece_cid: None,
            })
            .collect(),
        next_challenge_epoch: None,
    }
}

/// Seed a storage + verifier pair with `ids` data sets, one
/// provider each, pieces, and verifier sizes
pub fn seeded_network(ids: &[(u64, u64)]) -> (MemoryStorageClient, MemoryVerifierClient) {
    let storage = MemoryStorageClient::new();
    let verifier = MemoryVerifierClient::new();
    for (verifier_id, provider_id) in ids {
        storage.insert_dataset(account(), dataset(*verifier_id, *provider_id));
        storage.insert_provider(provider(*provider_id));
        storage.insert_pieces(*verifier_id, piece_set(*verifier_id, 2));
        verifier.set_size(*verifier_id, 4688, 2);
    }
    (storage, verifier)
}
