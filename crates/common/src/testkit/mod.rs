//! In-memory collaborator fakes for testing the pipelines without
//! a live storage network, verifier, or payments service.
//!
//! Each fake is seeded through its `insert_*`/`set_*` methods,
//! supports failure injection, and counts the calls it receives so
//! tests can assert that a code path issued no queries.

mod clients;

pub use clients::{
    MemoryClientError, MemoryPaymentsClient, MemoryStorageClient, MemoryVerifierClient,
};
