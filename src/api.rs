use crate::error::{PullError, Result};
use tracing::debug;

/// Version segment inserted between the base URL and every endpoint path
pub const API_VERSION: &str = "v2";

pub const API_KEY_HEADER: &str = "X-API-Key";

/// Authenticated client for the Tolgee REST API.
///
/// Performs plain GET requests and hands back the raw body. Interpreting
/// the body is up to the caller; this type only classifies failures.
#[derive(Debug, Clone)]
pub struct ApiClient {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl ApiClient {
    pub fn new(api_url: &str, api_key: &str) -> Self {
        Self::with_client(reqwest::Client::new(), api_url, api_key)
    }

    pub fn with_client(client: reqwest::Client, api_url: &str, api_key: &str) -> Self {
        Self {
            client,
            base_url: api_url.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
        }
    }

    /// Full URL for an endpoint path such as `projects/languages`
    pub fn url(&self, path: &str) -> String {
        format!(
            "{}/{}/{}",
            self.base_url,
            API_VERSION,
            path.trim_start_matches('/')
        )
    }

    /// GET `path` with the given query pairs and return the raw body.
    ///
    /// Pairs are sent in order, so a key repeated in `query` is repeated on
    /// the wire. A non-success status fails with [`PullError::Http`]
    /// carrying the body text as-is.
    pub async fn request(&self, path: &str, query: &[(String, String)]) -> Result<Vec<u8>> {
        let url = self.url(path);
        debug!("GET {} {:?}", url, query);

        let response = self
            .client
            .get(&url)
            .header(API_KEY_HEADER, &self.api_key)
            .header("Content-Type", "application/json")
            .query(query)
            .send()
            .await
            .map_err(|source| PullError::Transport {
                url: url.clone(),
                source,
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|e| format!("<failed to read body: {}>", e));
            return Err(PullError::Http {
                status: status.as_u16(),
                body,
            });
        }

        let body = response
            .bytes()
            .await
            .map_err(|source| PullError::Transport { url, source })?;

        debug!("{} responded {} ({} bytes)", path, status, body.len());
        Ok(body.to_vec())
    }

    /// Request a zipped export of the project
    pub async fn export(&self, query: &ExportQuery<'_>) -> Result<Vec<u8>> {
        self.request("projects/export", &query.to_pairs()).await
    }
}

/// Filters for the export endpoint.
///
/// Namespaces are sent as one `filterNamespace` pair per value, while the
/// service expects languages as a single comma joined `languages` value.
#[derive(Debug, Clone, Copy)]
pub struct ExportQuery<'a> {
    pub namespaces: &'a [String],
    pub languages: &'a [String],
}

impl<'a> ExportQuery<'a> {
    pub fn new(namespaces: &'a [String], languages: &'a [String]) -> Self {
        Self {
            namespaces,
            languages,
        }
    }

    pub fn to_pairs(&self) -> Vec<(String, String)> {
        let mut pairs: Vec<(String, String)> = self
            .namespaces
            .iter()
            .map(|ns| ("filterNamespace".to_string(), ns.clone()))
            .collect();

        // An empty list means "whatever the server exports by default"
        if !self.languages.is_empty() {
            pairs.push(("languages".to_string(), self.languages.join(",")));
        }

        pairs
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::{
        matchers::{header, method, path, query_param},
        Mock, MockServer, ResponseTemplate,
    };

    fn strings(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    // ==================== URL Tests ====================

    #[test]
    fn test_url_appends_version_segment() {
        let client = ApiClient::new("https://app.tolgee.io", "key");
        assert_eq!(
            client.url("projects/languages"),
            "https://app.tolgee.io/v2/projects/languages"
        );
    }

    #[test]
    fn test_url_trims_slashes() {
        let client = ApiClient::new("https://tolgee.example.com/", "key");
        assert_eq!(
            client.url("/projects/export"),
            "https://tolgee.example.com/v2/projects/export"
        );
    }

    // ==================== ExportQuery Tests ====================

    #[test]
    fn test_export_query_repeats_namespaces() {
        let namespaces = strings(&["common", "messages"]);
        let languages = strings(&["en", "de"]);

        let pairs = ExportQuery::new(&namespaces, &languages).to_pairs();

        assert_eq!(
            pairs,
            vec![
                ("filterNamespace".to_string(), "common".to_string()),
                ("filterNamespace".to_string(), "messages".to_string()),
                ("languages".to_string(), "en,de".to_string()),
            ]
        );
    }

    #[test]
    fn test_export_query_omits_empty_languages() {
        let namespaces = strings(&["common"]);
        let pairs = ExportQuery::new(&namespaces, &[]).to_pairs();

        assert_eq!(pairs.len(), 1);
        assert!(pairs.iter().all(|(key, _)| key != "languages"));
    }

    // ==================== request Tests ====================

    #[tokio::test]
    async fn test_request_sends_auth_and_content_type() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/v2/projects/languages"))
            .and(header("X-API-Key", "tgpak_test"))
            .and(header("Content-Type", "application/json"))
            .respond_with(ResponseTemplate::new(200).set_body_string("{}"))
            .expect(1)
            .mount(&mock_server)
            .await;

        let client = ApiClient::new(&mock_server.uri(), "tgpak_test");
        let body = client
            .request("projects/languages", &[])
            .await
            .expect("request should succeed");

        assert_eq!(body, b"{}");
    }

    #[tokio::test]
    async fn test_export_query_on_the_wire() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/v2/projects/export"))
            .and(query_param("languages", "en,de"))
            .respond_with(ResponseTemplate::new(200).set_body_bytes(vec![1u8, 2, 3]))
            .mount(&mock_server)
            .await;

        let namespaces = strings(&["common", "messages"]);
        let languages = strings(&["en", "de"]);
        let client = ApiClient::new(&mock_server.uri(), "key");

        let body = client
            .export(&ExportQuery::new(&namespaces, &languages))
            .await
            .expect("export should succeed");
        assert_eq!(body, vec![1u8, 2, 3]);

        let requests = mock_server.received_requests().await.unwrap();
        assert_eq!(requests.len(), 1);
        let received: Vec<(String, String)> = requests[0]
            .url
            .query_pairs()
            .map(|(k, v)| (k.into_owned(), v.into_owned()))
            .collect();
        assert_eq!(
            received,
            vec![
                ("filterNamespace".to_string(), "common".to_string()),
                ("filterNamespace".to_string(), "messages".to_string()),
                ("languages".to_string(), "en,de".to_string()),
            ]
        );
    }

    #[tokio::test]
    async fn test_http_error_carries_raw_body() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/v2/projects/export"))
            .respond_with(ResponseTemplate::new(403).set_body_string("Forbidden: not json"))
            .mount(&mock_server)
            .await;

        let client = ApiClient::new(&mock_server.uri(), "bad-key");
        let err = client.request("projects/export", &[]).await.unwrap_err();

        match err {
            PullError::Http { status, body } => {
                assert_eq!(status, 403);
                assert_eq!(body, "Forbidden: not json");
            }
            other => panic!("expected Http error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_http_error_with_json_body_is_not_parsed() {
        let mock_server = MockServer::start().await;

        let body = r#"{"code":"invalid_project_api_key"}"#;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(401).set_body_string(body))
            .mount(&mock_server)
            .await;

        let client = ApiClient::new(&mock_server.uri(), "key");
        let err = client.request("projects/languages", &[]).await.unwrap_err();

        assert!(matches!(err, PullError::Http { status: 401, ref body } if body.contains("invalid_project_api_key")));
    }

    #[tokio::test]
    async fn test_transport_error() {
        // Nothing listens on port 1
        let client = ApiClient::new("http://127.0.0.1:1", "key");
        let err = client.request("projects/languages", &[]).await.unwrap_err();

        match err {
            PullError::Transport { url, .. } => {
                assert_eq!(url, "http://127.0.0.1:1/v2/projects/languages");
            }
            other => panic!("expected Transport error, got {:?}", other),
        }
    }
}
