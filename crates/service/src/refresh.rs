use flume::Receiver;

use common::client::{PaymentsClient, StorageClient, VerifierClient};
use common::session::Address;

use crate::state::State;

/// Events that trigger snapshot maintenance
#[derive(Debug, Clone)]
pub enum RefreshEvent {
    /// Re-run the enrichment pipeline for an account and replace
    /// its cached snapshot
    Refresh { account: Address },

    /// Drop an account's cached snapshot so the next read refetches
    Invalidate { account: Address },
}

/// Minimal refresh coordinator - dispatches events to `State`
///
/// A simple event loop: callers (UI layer, timers) push events into
/// the channel, the coordinator runs the matching state operation.
/// Errors are logged and never stop the loop.
pub struct RefreshCoordinator<S, V, P> {
    state: State<S, V, P>,
}

impl<S, V, P> RefreshCoordinator<S, V, P>
where
    S: StorageClient,
    V: VerifierClient,
    P: PaymentsClient,
{
    pub fn new(state: State<S, V, P>) -> Self {
        RefreshCoordinator { state }
    }

    /// Run the refresh event loop until every sender is dropped
    pub async fn run(self, receiver: Receiver<RefreshEvent>) {
        tracing::info!("refresh coordinator started");

        while let Ok(event) = receiver.recv_async().await {
            tracing::debug!("received refresh event: {:?}", event);

            match event {
                RefreshEvent::Refresh { account } => {
                    if let Err(e) = self.state.refresh(&account).await {
                        tracing::error!("refresh failed for {}: {}", account, e);
                    }
                }
                RefreshEvent::Invalidate { account } => {
                    self.state.cache().invalidate(&account);
                }
            }
        }

        tracing::info!("refresh coordinator stopped");
    }
}
