// xkcd API HTTP client.
// Builds per-comic request URLs, checks statuses, and decodes responses.

use reqwest::{
    Client,
    header::{HeaderMap, HeaderValue, USER_AGENT},
};

use crate::error::{ComixError, Result};

use super::limit::FetchGate;
use super::types::Comic;

const XKCD_BASE: &str = "https://xkcd.com";

/// Client for the comic metadata API.
///
/// Cloning is cheap; clones share the underlying connection pool and the
/// admission gate.
#[derive(Debug, Clone)]
pub struct ComicClient {
    client: Client,
    base_url: String,
    gate: FetchGate,
}

impl ComicClient {
    /// Create a client against the production endpoint.
    pub fn new() -> Result<Self> {
        Self::with_base_url(XKCD_BASE)
    }

    /// Create a client against an alternate endpoint (tests use this).
    pub fn with_base_url(base_url: impl Into<String>) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(USER_AGENT, HeaderValue::from_static("comix"));

        let client = Client::builder()
            .default_headers(headers)
            .build()
            .map_err(ComixError::Transport)?;

        let base_url = base_url.into();
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            gate: FetchGate::default(),
        })
    }

    /// Replace the admission gate, changing the in-flight cap.
    pub fn with_gate(mut self, gate: FetchGate) -> Self {
        self.gate = gate;
        self
    }

    pub fn gate(&self) -> &FetchGate {
        &self.gate
    }

    /// Fetch one comic by number.
    ///
    /// Holds a gate slot for the whole transfer. The decoded number must
    /// match the requested one; a disagreement is reported, not ignored.
    pub async fn comic(&self, num: u32) -> Result<Comic> {
        let url = format!("{}/{}/info.0.json", self.base_url, num);
        let comic = self.fetch(&url).await?;
        if comic.num != num {
            return Err(ComixError::NumberMismatch {
                requested: num,
                received: comic.num,
            });
        }
        Ok(comic)
    }

    /// Fetch the newest comic. Its number is the top of the key space.
    pub async fn latest(&self) -> Result<Comic> {
        let url = format!("{}/info.0.json", self.base_url);
        self.fetch(&url).await
    }

    async fn fetch(&self, url: &str) -> Result<Comic> {
        let _slot = self.gate.admit().await;

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(ComixError::Transport)?;

        let status = response.status();
        if !status.is_success() {
            return Err(ComixError::Remote {
                status,
                url: url.to_string(),
            });
        }

        let body = response.text().await.map_err(ComixError::Transport)?;
        serde_json::from_str(&body).map_err(ComixError::Decode)
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

    use super::*;

    fn stub_comic(num: u32) -> serde_json::Value {
        serde_json::json!({
            "num": num,
            "title": format!("Comic {num}"),
            "transcript": format!("Transcript {num}"),
            "link": "",
            "month": "3",
            "year": "2008",
            // Fields the real endpoint serves but the client ignores.
            "alt": "alt text",
            "img": format!("https://example.test/{num}.png"),
            "day": "17",
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
    async fn fetches_and_decodes_a_comic() {
        let router = Router::new().route(
            "/{num}/info.0.json",
            get(|Path(num): Path<u32>| async move { Json(stub_comic(num)) }),
        );
        let addr = serve(router).await;
        let client = ComicClient::with_base_url(format!("http://{addr}")).unwrap();

        let comic = client.comic(614).await.unwrap();
        assert_eq!(comic.num, 614);
        assert_eq!(comic.title, "Comic 614");
        assert_eq!(comic.year, "2008");
    }

    #[tokio::test]
    async fn latest_hits_the_root_endpoint() {
        let router =
            Router::new().route("/info.0.json", get(|| async { Json(stub_comic(2000)) }));
        let addr = serve(router).await;
        let client = ComicClient::with_base_url(format!("http://{addr}")).unwrap();

        let latest = client.latest().await.unwrap();
        assert_eq!(latest.num, 2000);
    }

    #[tokio::test]
    async fn non_success_status_is_a_remote_error() {
        let router = Router::new().route(
            "/{num}/info.0.json",
            get(|| async { StatusCode::INTERNAL_SERVER_ERROR.into_response() }),
        );
        let addr = serve(router).await;
        let client = ComicClient::with_base_url(format!("http://{addr}")).unwrap();

        match client.comic(1).await {
            Err(ComixError::Remote { status, url }) => {
                assert_eq!(status, reqwest::StatusCode::INTERNAL_SERVER_ERROR);
                assert!(url.ends_with("/1/info.0.json"));
            }
            other => panic!("expected remote error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn unparseable_body_is_a_decode_error() {
        let router = Router::new().route(
            "/{num}/info.0.json",
            get(|| async { "this is not json" }),
        );
        let addr = serve(router).await;
        let client = ComicClient::with_base_url(format!("http://{addr}")).unwrap();

        match client.comic(1).await {
            Err(ComixError::Decode(_)) => {}
            other => panic!("expected decode error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn connection_failure_is_a_transport_error() {
        // Bind then drop so the port is known to refuse connections.
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let client = ComicClient::with_base_url(format!("http://{addr}")).unwrap();
        match client.comic(1).await {
            Err(ComixError::Transport(_)) => {}
            other => panic!("expected transport error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn wrong_number_in_response_is_a_mismatch() {
        let router = Router::new().route(
            "/{num}/info.0.json",
            get(|Path(num): Path<u32>| async move { Json(stub_comic(num + 1)) }),
        );
        let addr = serve(router).await;
        let client = ComicClient::with_base_url(format!("http://{addr}")).unwrap();

        match client.comic(7).await {
            Err(ComixError::NumberMismatch {
                requested: 7,
                received: 8,
            }) => {}
            other => panic!("expected number mismatch, got {other:?}"),
        }
    }
}
