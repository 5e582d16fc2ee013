use std::fmt;

use async_trait::async_trait;
use reqwest::header::{ACCEPT, HeaderValue};
use tracing::debug;

use hsd_model::InventorySnapshot;

use crate::{context::PollContext, error::FetchError, fetch::InventorySource};

/// Node listing endpoint, relative to the API base URL.
pub const LIST_NODES_PATH: &str = "/api/v1/machine";

/// Inventory reader for the headscale REST API.
#[derive(Clone)]
pub struct HeadscaleClient {
    http: reqwest::Client,
    url: String,
    api_key: String,
}

impl HeadscaleClient {
    /// Create a client for `base_url` authenticating with `api_key`.
    pub fn new(base_url: &str, api_key: impl Into<String>) -> Result<Self, FetchError> {
        let http = reqwest::Client::builder()
            .build()
            .map_err(FetchError::Transport)?;
        Ok(Self::with_client(http, base_url, api_key))
    }

    /// Create a client on top of an existing `reqwest::Client`.
    pub fn with_client(http: reqwest::Client, base_url: &str, api_key: impl Into<String>) -> Self {
        Self {
            http,
            url: format!("{}{}", base_url.trim_end_matches('/'), LIST_NODES_PATH),
            api_key: api_key.into(),
        }
    }

    /// Full URL of the node listing endpoint.
    pub fn url(&self) -> &str {
        &self.url
    }

    async fn list_nodes(&self) -> Result<InventorySnapshot, FetchError> {
        let response = self
            .http
            .get(&self.url)
            .bearer_auth(&self.api_key)
            .header(ACCEPT, HeaderValue::from_static("application/json"))
            .send()
            .await
            .map_err(FetchError::Transport)?;

        let status = response.status();
        let body = response.text().await.map_err(FetchError::Transport)?;
        debug!(status = status.as_u16(), bytes = body.len(), "inventory response");

        if !status.is_success() {
            return Err(FetchError::Status {
                status: status.as_u16(),
                body,
            });
        }

        match serde_json::from_str::<InventorySnapshot>(&body) {
            Ok(snapshot) => Ok(snapshot),
            Err(source) => Err(FetchError::Decode { source, body }),
        }
    }
}

#[async_trait]
impl InventorySource for HeadscaleClient {
    async fn fetch(&self, ctx: &PollContext) -> Result<InventorySnapshot, FetchError> {
        ctx.run(self.list_nodes()).await
    }
}

impl fmt::Debug for HeadscaleClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HeadscaleClient")
            .field("url", &self.url)
            .field("api_key", &"<redacted>")
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use wiremock::matchers::{header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;

    const KEY: &str = "hs-test-key";

    async fn client(server: &MockServer) -> HeadscaleClient {
        HeadscaleClient::new(&server.uri(), KEY).unwrap()
    }

    #[test]
    fn url_joins_base_and_path_without_double_slash() {
        let a = HeadscaleClient::new("https://hs.example.com", KEY).unwrap();
        let b = HeadscaleClient::new("https://hs.example.com/", KEY).unwrap();

        assert_eq!(a.url(), "https://hs.example.com/api/v1/machine");
        assert_eq!(a.url(), b.url());
    }

    #[test]
    fn debug_redacts_api_key() {
        let c = HeadscaleClient::new("https://hs.example.com", KEY).unwrap();
        let dbg = format!("{c:?}");
        assert!(!dbg.contains(KEY));
        assert!(dbg.contains("<redacted>"));
    }

    #[tokio::test]
    async fn fetch_sends_auth_and_decodes_snapshot() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path(LIST_NODES_PATH))
            .and(header("authorization", "Bearer hs-test-key"))
            .and(header("accept", "application/json"))
            .respond_with(ResponseTemplate::new(200).set_body_raw(
                r#"{"machines":[{"givenName":"db1","ipAddresses":["10.0.0.5"],
                    "validTags":["tag:scrape_9090_node_exporter"]}]}"#,
                "application/json",
            ))
            .expect(1)
            .mount(&server)
            .await;

        let snapshot = client(&server)
            .await
            .fetch(&PollContext::default())
            .await
            .unwrap();

        assert_eq!(snapshot.len(), 1);
        assert_eq!(snapshot.machines[0].given_name, "db1");
        assert_eq!(snapshot.machines[0].primary_address(), Some("10.0.0.5"));
    }

    #[tokio::test]
    async fn non_success_status_keeps_body() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path(LIST_NODES_PATH))
            .respond_with(ResponseTemplate::new(500).set_body_string("db is down"))
            .expect(1)
            .mount(&server)
            .await;

        let err = client(&server)
            .await
            .fetch(&PollContext::default())
            .await
            .unwrap_err();

        match err {
            FetchError::Status { status, ref body } => {
                assert_eq!(status, 500);
                assert_eq!(body, "db is down");
            }
            other => panic!("expected status error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn unauthorized_is_a_status_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(401).set_body_string("Unauthorized"))
            .mount(&server)
            .await;

        let err = client(&server)
            .await
            .fetch(&PollContext::default())
            .await
            .unwrap_err();

        assert!(matches!(err, FetchError::Status { status: 401, .. }));
    }

    #[tokio::test]
    async fn invalid_json_is_a_decode_error_with_body() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path(LIST_NODES_PATH))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
            .mount(&server)
            .await;

        let err = client(&server)
            .await
            .fetch(&PollContext::default())
            .await
            .unwrap_err();

        assert!(matches!(err, FetchError::Decode { ref body, .. } if body == "<html>oops</html>"));
        assert!(err.to_string().contains("<html>oops</html>"));
    }

    #[tokio::test]
    async fn unreachable_upstream_is_a_transport_error() {
        let server = MockServer::start().await;
        let uri = server.uri();
        drop(server);

        let err = HeadscaleClient::new(&uri, KEY)
            .unwrap()
            .fetch(&PollContext::default())
            .await
            .unwrap_err();

        assert!(matches!(err, FetchError::Transport(_)), "{err:?}");
    }

    #[tokio::test]
    async fn slow_upstream_hits_the_deadline() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_string("{}")
                    .set_delay(Duration::from_secs(5)),
            )
            .mount(&server)
            .await;

        let ctx = PollContext::with_timeout(Duration::from_millis(100));
        let err = client(&server).await.fetch(&ctx).await.unwrap_err();

        assert!(matches!(err, FetchError::Timeout { .. }), "{err:?}");
    }

    #[tokio::test]
    async fn canceled_poll_aborts_the_call() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_string("{}")
                    .set_delay(Duration::from_secs(5)),
            )
            .mount(&server)
            .await;

        let ctx = PollContext::with_timeout(Duration::from_secs(30));
        let token = ctx.token().clone();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(50)).await;
            token.cancel();
        });

        let err = client(&server).await.fetch(&ctx).await.unwrap_err();
        assert!(matches!(err, FetchError::Canceled), "{err:?}");
    }
}
