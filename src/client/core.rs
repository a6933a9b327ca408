use log::{debug, warn};
use reqwest::{Client, RequestBuilder};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::time::Duration;
use url::Url;

use crate::auth::auth_headers;
use crate::config::ServerConfig;
use crate::error::{AdoError, Result};

const API_VERSION: &str = "6.0";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// REST client for a single Azure DevOps Server collection.
///
/// The auth headers are computed once here and attached to every request as
/// client defaults. Nothing about the client changes after construction.
pub struct AdoClient {
    client: Client,
    base_url: Url,
}

impl AdoClient {
    pub fn new(config: &ServerConfig) -> Result<Self> {
        let client = Client::builder()
            .user_agent(concat!("adolens/", env!("CARGO_PKG_VERSION")))
            .default_headers(auth_headers(&config.token)?)
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| AdoError::Config(format!("Failed to create HTTP client: {e}")))?;

        let base_url = Url::parse(&config.base_url)
            .map_err(|e| AdoError::Config(format!("Invalid base URL: {e}")))?;
        if base_url.cannot_be_a_base() {
            return Err(AdoError::Config(format!(
                "Invalid base URL: {} cannot carry a path",
                config.base_url
            )));
        }

        Ok(Self { client, base_url })
    }

    /// Build an endpoint URL below the collection.
    ///
    /// Each segment is percent-encoded on its own, so project names with
    /// spaces or slashes stay one segment. `api-version` is always appended
    /// after the given query pairs.
    pub(super) fn endpoint(&self, segments: &[&str], query: &[(&str, &str)]) -> Result<Url> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|()| AdoError::Config(format!("Invalid base URL: {}", self.base_url)))?
            .pop_if_empty()
            .extend(segments);

        url.set_query(None);
        {
            let mut pairs = url.query_pairs_mut();
            for (key, value) in query {
                pairs.append_pair(key, value);
            }
            pairs.append_pair("api-version", API_VERSION);
        }

        Ok(url)
    }

    pub(super) async fn get_json<T>(&self, url: Url) -> Result<T>
    where
        T: DeserializeOwned,
    {
        debug!("GET {url}");
        self.execute(self.client.get(url.clone()), &url).await
    }

    pub(super) async fn post_json<T, B>(&self, url: Url, body: &B) -> Result<T>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        debug!("POST {url}");
        self.execute(self.client.post(url.clone()).json(body), &url)
            .await
    }

    async fn execute<T>(&self, request: RequestBuilder, url: &Url) -> Result<T>
    where
        T: DeserializeOwned,
    {
        let response = request.send().await.map_err(|e| {
            warn!("Request to {} failed: {e}", url.path());
            AdoError::Network(e)
        })?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unable to read error response".to_string());
            warn!("Server returned {status} for {}", url.path());
            return Err(AdoError::Api {
                status: status.as_u16(),
                message: error_text,
            });
        }

        let body = response.text().await?;
        Ok(serde_json::from_str(&body)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::Token;
    use mockito::Matcher;
    use serde_json::{json, Value};

    fn client_for(base_url: &str) -> AdoClient {
        AdoClient::new(&ServerConfig::new(base_url, Token::from("pat"))).unwrap()
    }

    #[test]
    fn test_endpoint_appends_segments_and_api_version() {
        let client = client_for("http://tfs.local/DefaultCollection");
        let url = client.endpoint(&["_apis", "projects"], &[]).unwrap();
        assert_eq!(
            url.as_str(),
            "http://tfs.local/DefaultCollection/_apis/projects?api-version=6.0"
        );
    }

    #[test]
    fn test_endpoint_ignores_trailing_slash() {
        let client = client_for("http://tfs.local/DefaultCollection/");
        let url = client.endpoint(&["_apis", "projects"], &[]).unwrap();
        assert_eq!(url.path(), "/DefaultCollection/_apis/projects");

        let client = client_for("http://tfs.local");
        let url = client.endpoint(&["_apis", "projects"], &[]).unwrap();
        assert_eq!(url.path(), "/_apis/projects");
    }

    #[test]
    fn test_endpoint_encodes_project_segment() {
        let client = client_for("http://tfs.local/Coll");
        let url = client
            .endpoint(&["My Project", "_apis", "build", "builds"], &[("$top", "5")])
            .unwrap();
        assert_eq!(url.path(), "/Coll/My%20Project/_apis/build/builds");
        let pairs: Vec<(String, String)> = url
            .query_pairs()
            .map(|(k, v)| (k.into_owned(), v.into_owned()))
            .collect();
        assert_eq!(
            pairs,
            vec![
                ("$top".to_string(), "5".to_string()),
                ("api-version".to_string(), "6.0".to_string()),
            ]
        );
    }

    #[test]
    fn test_invalid_base_url() {
        let err = AdoClient::new(&ServerConfig::new("not a url", Token::from("pat")))
            .err()
            .unwrap();
        assert!(matches!(err, AdoError::Config(_)));

        let err = AdoClient::new(&ServerConfig::new("mailto:ops@example.com", Token::from("pat")))
            .err()
            .unwrap();
        assert!(matches!(err, AdoError::Config(_)));
    }

    #[tokio::test]
    async fn test_get_json_sends_auth_headers() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/_apis/projects")
            .match_query(Matcher::UrlEncoded("api-version".into(), "6.0".into()))
            .match_header("authorization", "Basic OnBhdA==")
            .match_header("content-type", "application/json")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"count":0,"value":[]}"#)
            .create_async()
            .await;

        let client = client_for(&server.url());
        let url = client.endpoint(&["_apis", "projects"], &[]).unwrap();
        let body: Value = client.get_json(url).await.unwrap();

        assert_eq!(body, json!({"count": 0, "value": []}));
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_post_json_sends_body() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/Proj/_apis/wit/wiql")
            .match_query(Matcher::UrlEncoded("api-version".into(), "6.0".into()))
            .match_body(Matcher::Json(json!({"query": "SELECT 1"})))
            .with_status(200)
            .with_body(r#"{"workItems":[]}"#)
            .create_async()
            .await;

        let client = client_for(&server.url());
        let url = client.endpoint(&["Proj", "_apis", "wit", "wiql"], &[]).unwrap();
        let body: Value = client
            .post_json(url, &json!({"query": "SELECT 1"}))
            .await
            .unwrap();

        assert_eq!(body["workItems"], json!([]));
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_non_success_status_carries_status_and_body() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("GET", "/_apis/projects")
            .match_query(Matcher::Any)
            .with_status(401)
            .with_body("Access denied")
            .create_async()
            .await;

        let client = client_for(&server.url());
        let url = client.endpoint(&["_apis", "projects"], &[]).unwrap();
        let err = client.get_json::<Value>(url).await.unwrap_err();

        match err {
            AdoError::Api { status, message } => {
                assert_eq!(status, 401);
                assert_eq!(message, "Access denied");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_undecodable_body_is_json_error() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("GET", "/_apis/projects")
            .match_query(Matcher::Any)
            .with_status(200)
            .with_body("<html>sign in</html>")
            .create_async()
            .await;

        let client = client_for(&server.url());
        let url = client.endpoint(&["_apis", "projects"], &[]).unwrap();
        let err = client.get_json::<Value>(url).await.unwrap_err();
        assert!(matches!(err, AdoError::Json(_)));
    }

    #[tokio::test]
    async fn test_unreachable_server_is_network_error() {
        let client = client_for("http://127.0.0.1:9");
        let url = client.endpoint(&["_apis", "projects"], &[]).unwrap();
        let err = client.get_json::<Value>(url).await.unwrap_err();
        assert!(matches!(err, AdoError::Network(_)));
    }
}
