//! Remote document fetcher.
//!
//! One blocking read per stream with a timeout. No retries here; a failed
//! read is reported and the caller decides what to do next.

use std::time::Duration;

use crate::config::RemoteConfig;
use crate::error::FetchError;
use crate::models::{RemoteDocument, StreamId};
use crate::util::{compact_text, is_http_url, join_url};

/// Reads one remote document.
#[allow(async_fn_in_trait)]
pub trait DocumentFetcher {
    /// Fetch and parse the current document of `stream`.
    async fn fetch(&self, stream: StreamId) -> Result<RemoteDocument, FetchError>;
}

/// Fetches the two documents from a REST-exposed real-time database.
#[derive(Clone)]
pub struct HttpDocumentFetcher {
    widget_url: String,
    updates_url: String,
    timeout: Duration,
    client: reqwest::Client,
}

impl HttpDocumentFetcher {
    pub fn new(config: &RemoteConfig) -> Result<Self, FetchError> {
        let widget_url = document_url(config, StreamId::Widget)?;
        let updates_url = document_url(config, StreamId::Updates)?;
        let client = reqwest::Client::builder()
            .timeout(config.fetch_timeout)
            .build()
            .map_err(|source| FetchError::Http {
                stream: StreamId::Widget,
                source,
            })?;

        Ok(Self {
            widget_url,
            updates_url,
            timeout: config.fetch_timeout,
            client,
        })
    }

    /// Resolved URL for a stream.
    pub fn url(&self, stream: StreamId) -> &str {
        match stream {
            StreamId::Widget => &self.widget_url,
            StreamId::Updates => &self.updates_url,
        }
    }

    fn request_error(&self, stream: StreamId, source: reqwest::Error) -> FetchError {
        if source.is_timeout() {
            FetchError::Timeout {
                stream,
                timeout: self.timeout,
            }
        } else {
            FetchError::Http { stream, source }
        }
    }
}

impl DocumentFetcher for HttpDocumentFetcher {
    async fn fetch(&self, stream: StreamId) -> Result<RemoteDocument, FetchError> {
        let url = self.url(stream);
        tracing::debug!(%stream, url, "Fetching remote document");

        let response = self
            .client
            .get(url)
            .header(reqwest::header::ACCEPT, "application/json")
            .send()
            .await
            .map_err(|source| self.request_error(stream, source))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|source| self.request_error(stream, source))?;

        if !status.is_success() {
            return Err(FetchError::Status {
                stream,
                status: status.as_u16(),
                body: compact_text(&body),
            });
        }

        RemoteDocument::parse(stream, &body)
    }
}

fn document_url(config: &RemoteConfig, stream: StreamId) -> Result<String, FetchError> {
    let path = match stream {
        StreamId::Widget => &config.widget_path,
        StreamId::Updates => &config.updates_path,
    };
    if !is_http_url(&config.base_url) {
        return Err(FetchError::InvalidUrl {
            stream,
            reason: format!("'{}' must include http:// or https://", config.base_url),
        });
    }

    let joined = join_url(&config.base_url, path);
    url::Url::parse(&joined)
        .map(|url| url.to_string())
        .map_err(|error| FetchError::InvalidUrl {
            stream,
            reason: error.to_string(),
        })
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;
    use crate::models::{UpdatesDocument, WidgetDocument};

    fn config(base_url: &str, timeout: Duration) -> RemoteConfig {
        RemoteConfig {
            base_url: base_url.to_string(),
            widget_path: "notes/widget.json".to_string(),
            updates_path: "notes/updates.json".to_string(),
            fetch_timeout: timeout,
        }
    }

    #[test]
    fn rejects_non_http_base_url() {
        let error = HttpDocumentFetcher::new(&config("ftp://db", Duration::from_secs(1)))
            .err()
            .unwrap();
        assert!(matches!(error, FetchError::InvalidUrl { .. }));
    }

    #[tokio::test]
    async fn fetches_widget_document() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/notes/widget.json"))
            .respond_with(ResponseTemplate::new(200).set_body_string(
                r#"{"updated_at":100,"display_text":"Hi","image_path":""}"#,
            ))
            .expect(1)
            .mount(&server)
            .await;

        let fetcher =
            HttpDocumentFetcher::new(&config(&server.uri(), Duration::from_secs(5))).unwrap();
        let document = fetcher.fetch(StreamId::Widget).await.unwrap();

        assert_eq!(
            document,
            RemoteDocument::Widget(WidgetDocument {
                timestamp: 100,
                display_text: "Hi".to_string(),
                image_path: String::new(),
                selected_note_id: None,
            })
        );
    }

    #[tokio::test]
    async fn fetches_updates_document() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/notes/updates.json"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_string(r#"{"updated_at":200,"title":"Groceries","note_id":"n-7"}"#),
            )
            .mount(&server)
            .await;

        let fetcher =
            HttpDocumentFetcher::new(&config(&server.uri(), Duration::from_secs(5))).unwrap();
        let document = fetcher.fetch(StreamId::Updates).await.unwrap();

        assert_eq!(
            document,
            RemoteDocument::Updates(UpdatesDocument {
                timestamp: 200,
                title: "Groceries".to_string(),
                note_id: Some("n-7".to_string()),
            })
        );
    }

    #[tokio::test]
    async fn non_success_status_is_an_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/notes/widget.json"))
            .respond_with(ResponseTemplate::new(401).set_body_string("Permission denied"))
            .mount(&server)
            .await;

        let fetcher =
            HttpDocumentFetcher::new(&config(&server.uri(), Duration::from_secs(5))).unwrap();
        let error = fetcher.fetch(StreamId::Widget).await.unwrap_err();

        match error {
            FetchError::Status { status, body, .. } => {
                assert_eq!(status, 401);
                assert_eq!(body, "Permission denied");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn malformed_payload_is_an_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/notes/updates.json"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
            .mount(&server)
            .await;

        let fetcher =
            HttpDocumentFetcher::new(&config(&server.uri(), Duration::from_secs(5))).unwrap();
        let error = fetcher.fetch(StreamId::Updates).await.unwrap_err();

        assert!(matches!(error, FetchError::Malformed { .. }));
        assert_eq!(error.stream(), StreamId::Updates);
    }

    #[tokio::test]
    async fn slow_response_times_out() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/notes/widget.json"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_string(r#"{"updated_at":1}"#)
                    .set_delay(Duration::from_secs(5)),
            )
            .mount(&server)
            .await;

        let fetcher =
            HttpDocumentFetcher::new(&config(&server.uri(), Duration::from_millis(200))).unwrap();
        let error = fetcher.fetch(StreamId::Widget).await.unwrap_err();

        assert!(matches!(error, FetchError::Timeout { .. }), "{error:?}");
    }
}
