// Bulk fetch orchestration.
// Fans out one gated fetch task per comic number and fans the results into
// the single loop that owns the store.

use tokio::sync::mpsc;

use crate::cache::store::ComicStore;
use crate::error::{ComixError, Result};

use super::client::ComicClient;
use super::types::Comic;

/// Result of one fetch attempt, sent from a fetch task to the aggregator.
/// Crosses that boundary exactly once per key and is never persisted.
#[derive(Debug)]
struct FetchOutcome {
    num: u32,
    result: Result<Comic>,
}

/// A key that failed during a build pass, and why.
#[derive(Debug)]
pub struct FetchFailure {
    pub num: u32,
    pub error: ComixError,
}

const OUTCOME_BUFFER: usize = 32;

impl ComicClient {
    /// Build a fresh store over the given numbers.
    ///
    /// Failed keys do not abort the pass; they come back in the report and
    /// the caller decides whether any of them is fatal.
    pub async fn build_store(
        &self,
        nums: impl IntoIterator<Item = u32>,
    ) -> (ComicStore, Vec<FetchFailure>) {
        let mut store = ComicStore::new();
        let failures = self.populate(&mut store, nums).await;
        (store, failures)
    }

    /// Fetch the full key space, `1..=latest`.
    pub async fn build_full(&self) -> Result<(ComicStore, Vec<FetchFailure>)> {
        let latest = self.latest().await?;
        Ok(self.build_store(1..=latest.num).await)
    }

    /// Fetch every number in `nums` and merge the successes into `store`.
    ///
    /// One task per number; each goes through the gate, fetches, and sends
    /// exactly one outcome. This loop is the only writer to `store` during
    /// the pass and returns once every launched task has reported. Keys
    /// land in completion order; the report is sorted by number.
    pub async fn populate(
        &self,
        store: &mut ComicStore,
        nums: impl IntoIterator<Item = u32>,
    ) -> Vec<FetchFailure> {
        let (outcome_tx, mut outcome_rx) = mpsc::channel(OUTCOME_BUFFER);

        let mut launched = 0usize;
        for num in nums {
            let client = self.clone();
            let tx = outcome_tx.clone();
            launched += 1;
            tokio::spawn(async move {
                let result = client.comic(num).await;
                // The receiver outlives every task, so this only fails if
                // the aggregation loop itself is gone.
                let _ = tx.send(FetchOutcome { num, result }).await;
            });
        }
        // Each task drops its sender after reporting; once the last one is
        // gone the channel closes, which is the completion signal.
        drop(outcome_tx);

        tracing::info!(launched, "comic fetch pass started");

        let mut failures = Vec::new();
        while let Some(outcome) = outcome_rx.recv().await {
            match outcome.result {
                Ok(comic) => {
                    store.insert(comic);
                }
                Err(error) => {
                    tracing::warn!(num = outcome.num, %error, "comic fetch failed");
                    failures.push(FetchFailure {
                        num: outcome.num,
                        error,
                    });
                }
            }
        }
        failures.sort_by_key(|failure| failure.num);

        tracing::info!(
            fetched = launched - failures.len(),
            failed = failures.len(),
            "comic fetch pass finished"
        );
        failures
    }
}

#[cfg(test)]
mod tests {
    use std::net::SocketAddr;

    use axum::extract::Path;
    use axum::http::StatusCode;
    use axum::response::IntoResponse;
    use axum::routing::get;
    use axum::{Json, Router};

    use crate::comic::limit::FetchGate;

    use super::*;

    fn stub_comic(num: u32) -> serde_json::Value {
        serde_json::json!({
            "num": num,
            "title": format!("Comic {num}"),
            "transcript": format!("Transcript {num}"),
            "link": "",
            "month": "3",
            "year": "2008",
        })
    }

    async fn serve(router: Router) -> SocketAddr {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, router).await.unwrap();
        });
        addr
    }

    #[tokio::test]
    async fn pass_keeps_successes_and_reports_failures() {
        let router = Router::new().route(
            "/{num}/info.0.json",
            get(|Path(num): Path<u32>| async move {
                if num == 4 {
                    StatusCode::NOT_FOUND.into_response()
                } else {
                    Json(stub_comic(num)).into_response()
                }
            }),
        );
        let addr = serve(router).await;
        let client = ComicClient::with_base_url(format!("http://{addr}")).unwrap();

        let (store, failures) = client.build_store(1..=4).await;

        assert_eq!(store.len(), 3);
        assert!(store.get(1).is_some());
        assert!(store.get(2).is_some());
        assert!(store.get(3).is_some());
        assert!(store.get(4).is_none());

        assert_eq!(failures.len(), 1);
        assert_eq!(failures[0].num, 4);
        match &failures[0].error {
            ComixError::Remote { status, .. } => {
                assert_eq!(*status, reqwest::StatusCode::NOT_FOUND)
            }
            other => panic!("expected remote error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn pass_completes_with_more_keys_than_gate_slots() {
        let router = Router::new().route(
            "/{num}/info.0.json",
            get(|Path(num): Path<u32>| async move { Json(stub_comic(num)) }),
        );
        let addr = serve(router).await;
        let client = ComicClient::with_base_url(format!("http://{addr}"))
            .unwrap()
            .with_gate(FetchGate::new(3));

        let (store, failures) = client.build_store(1..=25).await;

        assert!(failures.is_empty());
        assert_eq!(store.len(), 25);
        for num in 1..=25 {
            assert_eq!(store.get(num).map(|c| c.num), Some(num));
        }
    }

    #[tokio::test]
    async fn populate_merges_into_an_existing_store() {
        let router = Router::new().route(
            "/{num}/info.0.json",
            get(|Path(num): Path<u32>| async move { Json(stub_comic(num)) }),
        );
        let addr = serve(router).await;
        let client = ComicClient::with_base_url(format!("http://{addr}")).unwrap();

        let (mut store, _) = client.build_store(1..=2).await;
        let failures = client.populate(&mut store, 3..=5).await;

        assert!(failures.is_empty());
        assert_eq!(store.len(), 5);
    }

    #[tokio::test]
    async fn number_mismatch_surfaces_in_the_report() {
        let router = Router::new().route(
            "/{num}/info.0.json",
            get(|Path(num): Path<u32>| async move { Json(stub_comic(num + 1)) }),
        );
        let addr = serve(router).await;
        let client = ComicClient::with_base_url(format!("http://{addr}")).unwrap();

        let (store, failures) = client.build_store(7..=7).await;

        assert!(store.is_empty());
        assert_eq!(failures.len(), 1);
        assert!(matches!(
            failures[0].error,
            ComixError::NumberMismatch {
                requested: 7,
                received: 8,
            }
        ));
    }

    #[tokio::test]
    async fn empty_range_yields_an_empty_store() {
        // No server needed; nothing is launched.
        let client = ComicClient::with_base_url("http://127.0.0.1:1").unwrap();
        let (store, failures) = client.build_store(1..=0).await;
        assert!(store.is_empty());
        assert!(failures.is_empty());
    }

    #[tokio::test]
    async fn build_full_sizes_the_range_from_latest() {
        let router = Router::new()
            .route("/info.0.json", get(|| async { Json(stub_comic(5)) }))
            .route(
                "/{num}/info.0.json",
                get(|Path(num): Path<u32>| async move { Json(stub_comic(num)) }),
            );
        let addr = serve(router).await;
        let client = ComicClient::with_base_url(format!("http://{addr}")).unwrap();

        let (store, failures) = client.build_full().await.unwrap();

        assert!(failures.is_empty());
        assert_eq!(store.len(), 5);
    }
}
