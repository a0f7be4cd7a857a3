//! Polling change feed.
//!
//! For backends without a push channel, the feed lists the table every
//! `interval` and yields [`ChangeEvent::resync`] when the listing's digest
//! differs from the previous one. The first listing only sets the baseline.
//! Failed polls are logged and skipped; the feed ends only when dropped, or
//! immediately when `interval` is zero.

use std::time::Duration;

use futures::StreamExt;
use store::{ChangeEvent, ChangeFeed, EmployeeStore, SnapshotDigest};

pub fn poll_feed<S>(store: S, interval: Duration) -> ChangeFeed
where
    S: EmployeeStore + 'static,
{
    if interval.is_zero() {
        return futures::stream::empty().boxed_local();
    }

    futures::stream::unfold((store, None), move |(store, mut last)| async move {
        loop {
            if last.is_some() {
                sleep(interval).await;
            }
            match store.list().await {
                Ok(records) => {
                    let digest = SnapshotDigest::of(&records);
                    let changed = last.is_some_and(|prev: SnapshotDigest| prev != digest);
                    last = Some(digest);
                    if changed {
                        tracing::debug!("poll: table changed ({digest})");
                        return Some((ChangeEvent::resync(), (store, last)));
                    }
                }
                Err(e) => {
                    tracing::warn!("poll: listing failed: {e}");
                    if last.is_none() {
                        sleep(interval).await;
                    }
                }
            }
        }
    })
    .boxed_local()
}

#[cfg(target_arch = "wasm32")]
async fn sleep(duration: Duration) {
    gloo_timers::future::sleep(duration).await;
}

#[cfg(not(target_arch = "wasm32"))]
async fn sleep(duration: Duration) {
    tokio::time::sleep(duration).await;
}

#[cfg(test)]
mod tests {
    use super::*;
    use store::{ChangeKind, EmployeeDraft, MemoryStore};

    fn draft(name: &str) -> EmployeeDraft {
        EmployeeDraft {
            name: name.into(),
            email: format!("{name}@example.com"),
            emp_num: "E1".into(),
            phone_no: "555".into(),
        }
    }

    #[tokio::test]
    async fn test_zero_interval_disables_feed() {
        let mut feed = poll_feed(MemoryStore::new(), Duration::ZERO);
        assert!(feed.next().await.is_none());
    }

    #[tokio::test]
    async fn test_feed_reports_remote_change() {
        let store = MemoryStore::new();
        let mut feed = poll_feed(store.clone(), Duration::from_millis(5));

        let (event, _) = futures::join!(feed.next(), async {
            tokio::time::sleep(Duration::from_millis(30)).await;
            store.insert(&draft("Alice")).await.unwrap();
        });

        let event = event.unwrap();
        assert_eq!(event.kind, ChangeKind::Resync);
        assert!(event.id.is_none());
    }

    #[tokio::test]
    async fn test_feed_survives_failed_polls() {
        let store = MemoryStore::new();
        store.set_offline(true);
        let mut feed = poll_feed(store.clone(), Duration::from_millis(5));

        let (event, _) = futures::join!(feed.next(), async {
            tokio::time::sleep(Duration::from_millis(20)).await;
            store.set_offline(false);
            tokio::time::sleep(Duration::from_millis(20)).await;
            store.insert(&draft("Bob")).await.unwrap();
        });

        assert_eq!(event, Some(ChangeEvent::resync()));
    }
}
