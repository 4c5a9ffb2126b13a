//! Pinning Store collaborator.
//!
//! The gateway only proxies provider JSON, so listings are returned as
//! `serde_json::Value`. `PinataClient` speaks the Pinata v3 REST API.

use async_trait::async_trait;
use reqwest::RequestBuilder;
use serde_json::{Map, Value, json};
use std::fmt;
use std::time::Duration;

use super::error::DocumentError;
use super::types::Network;
use crate::config::ConfigError;

#[async_trait]
pub trait PinningStore: Send + Sync {
    /// File record for `cid`, `None` when the provider has no such file.
    async fn find_file(
        &self,
        network: Network,
        cid: &str,
    ) -> Result<Option<Map<String, Value>>, DocumentError>;

    async fn list_files(
        &self,
        network: Network,
        group_id: Option<&str>,
    ) -> Result<Value, DocumentError>;

    async fn list_groups(&self, network: Network) -> Result<Value, DocumentError>;

    async fn create_group(&self, network: Network, name: &str) -> Result<Value, DocumentError>;
}

pub struct PinataClient {
    client: reqwest::Client,
    api_url: String,
    jwt: String,
}

impl fmt::Debug for PinataClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PinataClient")
            .field("api_url", &self.api_url)
            .field("jwt", &"<redacted>")
            .finish()
    }
}

impl PinataClient {
    pub fn new(api_url: &str, jwt: &str, timeout: Duration) -> Result<Self, ConfigError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ConfigError::Invalid {
                key: "pinning.api_url",
                reason: format!("Failed to build HTTP client: {}", e),
            })?;

        Ok(Self {
            client,
            api_url: api_url.trim_end_matches('/').to_string(),
            jwt: jwt.to_string(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.api_url, path)
    }

    /// Send an authorized request and decode the JSON body.
    async fn send(&self, request: RequestBuilder, context: &str) -> Result<Value, DocumentError> {
        let response = request.bearer_auth(&self.jwt).send().await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            tracing::error!("[PINATA] {} failed: {} - {}", context, status, body);
            return Err(DocumentError::Upstream {
                status: status.as_u16(),
                body,
            });
        }

        Ok(response.json::<Value>().await?)
    }
}

/// First entry of a `{"data": {"files": [...]}}` listing.
fn first_file(listing: Value) -> Option<Map<String, Value>> {
    match listing {
        Value::Object(mut root) => match root.remove("data")? {
            Value::Object(mut data) => match data.remove("files")? {
                Value::Array(files) => files.into_iter().find_map(|f| match f {
                    Value::Object(file) => Some(file),
                    _ => None,
                }),
                _ => None,
            },
            _ => None,
        },
        _ => None,
    }
}

#[async_trait]
impl PinningStore for PinataClient {
    async fn find_file(
        &self,
        network: Network,
        cid: &str,
    ) -> Result<Option<Map<String, Value>>, DocumentError> {
        let request = self
            .client
            .get(self.url(&format!("/files/{}", network)))
            .query(&[("cid", cid)]);
        let listing = self.send(request, "find file").await?;
        Ok(first_file(listing))
    }

    async fn list_files(
        &self,
        network: Network,
        group_id: Option<&str>,
    ) -> Result<Value, DocumentError> {
        let mut request = self.client.get(self.url(&format!("/files/{}", network)));
        if let Some(group) = group_id {
            request = request.query(&[("group", group)]);
        }
        self.send(request, "list files").await
    }

    async fn list_groups(&self, network: Network) -> Result<Value, DocumentError> {
        let request = self.client.get(self.url(&format!("/groups/{}", network)));
        self.send(request, "list groups").await
    }

    async fn create_group(&self, network: Network, name: &str) -> Result<Value, DocumentError> {
        let request = self
            .client
            .post(self.url(&format!("/groups/{}", network)))
            .json(&json!({ "name": name }));
        self.send(request, "create group").await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{body_json, header, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn client(server: &MockServer) -> PinataClient {
        PinataClient::new(&server.uri(), "pinata-test-jwt", Duration::from_secs(5)).unwrap()
    }

    #[test]
    fn test_first_file() {
        let listing = json!({"data": {"files": [{"cid": "bafy1"}, {"cid": "bafy2"}]}});
        assert_eq!(first_file(listing).unwrap()["cid"], "bafy1");
        assert!(first_file(json!({"data": {"files": []}})).is_none());
        assert!(first_file(json!({"unexpected": true})).is_none());
    }

    #[test]
    fn test_debug_redacts_jwt() {
        let c = PinataClient::new("http://x", "super-secret", Duration::from_secs(1)).unwrap();
        assert!(!format!("{:?}", c).contains("super-secret"));
    }

    #[tokio::test]
    async fn test_find_file() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/files/private"))
            .and(query_param("cid", "bafy123"))
            .and(header("authorization", "Bearer pinata-test-jwt"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "data": {"files": [{"id": "f1", "cid": "bafy123", "name": "deed.pdf"}]}
            })))
            .mount(&server)
            .await;

        let file = client(&server)
            .find_file(Network::Private, "bafy123")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(file["name"], "deed.pdf");
    }

    #[tokio::test]
    async fn test_list_files_with_group() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/files/public"))
            .and(query_param("group", "g-42"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"data": {"files": []}})))
            .mount(&server)
            .await;

        let listing = client(&server)
            .list_files(Network::Public, Some("g-42"))
            .await
            .unwrap();
        assert_eq!(listing, json!({"data": {"files": []}}));
    }

    #[tokio::test]
    async fn test_create_group_body() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/groups/public"))
            .and(body_json(json!({"name": "invoices"})))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"data": {"id": "g-1"}})))
            .mount(&server)
            .await;

        let created = client(&server)
            .create_group(Network::Public, "invoices")
            .await
            .unwrap();
        assert_eq!(created["data"]["id"], "g-1");
    }

    #[tokio::test]
    async fn test_provider_error_status_kept() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/groups/private"))
            .respond_with(ResponseTemplate::new(403).set_body_string("bad key"))
            .mount(&server)
            .await;

        let err = client(&server)
            .list_groups(Network::Private)
            .await
            .unwrap_err();
        assert!(matches!(err, DocumentError::Upstream { status: 403, .. }));
    }

    #[tokio::test]
    async fn test_unreachable_provider_unavailable() {
        // Nothing listens on the discard port
        let c = PinataClient::new("http://127.0.0.1:9", "jwt", Duration::from_secs(1)).unwrap();
        let err = c.list_groups(Network::Public).await.unwrap_err();
        assert!(matches!(err, DocumentError::Unavailable(_)));
    }
}
