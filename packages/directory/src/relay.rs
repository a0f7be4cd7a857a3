//! Change relay: keeps the snapshot in step with changes made by other
//! clients.
//!
//! Every event on the store's change feed triggers a full re-list. Events are
//! never applied incrementally, so a missed or duplicated event costs at most
//! one extra refresh.

use futures::StreamExt;
use store::{ChangeEvent, ChangeFeed, EmailTrigger, EmployeeStore};

use crate::dispatcher::Dispatcher;
use crate::error::ActionError;

impl<S, M> Dispatcher<S, M>
where
    S: EmployeeStore,
    M: EmailTrigger,
{
    /// React to a single change notification.
    pub async fn handle_change(&self, event: &ChangeEvent) -> Result<usize, ActionError> {
        tracing::debug!("change event {:?} {:?}", event.kind, event.id);
        self.refresh().await
    }

    /// Drive `feed` until it ends, refreshing once per event. Failed
    /// refreshes are reported as notices and do not stop the loop.
    ///
    /// Returns the number of successful refreshes.
    pub async fn follow(&self, mut feed: ChangeFeed) -> usize {
        let mut refreshed = 0;
        while let Some(event) = feed.next().await {
            if self.handle_change(&event).await.is_ok() {
                refreshed += 1;
            }
        }
        tracing::debug!("change feed closed after {refreshed} refreshes");
        refreshed
    }

    /// Subscribe to the store and follow its feed. Dropping the returned
    /// future unsubscribes.
    pub async fn watch(&self) -> usize {
        let feed = self.store().subscribe();
        self.follow(feed).await
    }
}
