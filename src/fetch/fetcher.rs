use std::time::Duration;

use chrono::Utc;
use log::{debug, error, warn};
use reqwest::header::{HeaderMap, HeaderValue, ETAG, IF_NONE_MATCH};

use crate::constants::{CONFIG_FILE_NAME, PKG_VERSION};
use crate::errors::ErrorKind::*;
use crate::errors::{ClientError, ErrorKind};
use crate::fetch::fetcher::FetchResponse::{Failed, Fetched, NotModified};
use crate::model::snapshot::{parse_body, ConfigSnapshot, TemplateState};

const REMOTE_CONFIG_UA_HEADER: &str = "X-RemoteConfig-UserAgent";

#[derive(Debug, PartialEq)]
pub enum FetchResponse {
    Fetched(ConfigSnapshot),
    NotModified,
    Throttled(ClientError),
    Failed(ClientError),
}

pub struct Fetcher {
    fetch_url: String,
    http_client: reqwest::Client,
}

impl Fetcher {
    pub fn new(base_url: &str, api_key: &str, timeout: Duration) -> Result<Self, ClientError> {
        let mut headers = HeaderMap::new();
        let user_agent = HeaderValue::from_str(format!("RemoteConfig-Rust/{PKG_VERSION}").as_str())
            .map_err(|err| ClientError::new(HttpClientInitFailure, err.to_string()))?;
        headers.insert(REMOTE_CONFIG_UA_HEADER, user_agent);
        let http_client = reqwest::Client::builder()
            .timeout(timeout)
            .default_headers(headers)
            .build()
            .map_err(|err| {
                ClientError::new(
                    HttpClientInitFailure,
                    format!("Failed to initialize the HTTP client. {err}"),
                )
            })?;
        Ok(Self {
            fetch_url: format!(
                "{base_url}/configs/{api_key}/{config_json_name}",
                config_json_name = CONFIG_FILE_NAME
            ),
            http_client,
        })
    }

    pub async fn fetch(&self, etag: &str) -> FetchResponse {
        let mut builder = self.http_client.get(self.fetch_url.as_str());
        if !etag.is_empty() {
            builder = builder.header(IF_NONE_MATCH, etag.to_owned());
        }

        let result = builder.send().await;

        match result {
            Ok(response) => match response.status().as_u16() {
                200 => {
                    let etag = response
                        .headers()
                        .get(ETAG)
                        .and_then(|header| header.to_str().ok())
                        .unwrap_or("")
                        .to_owned();
                    match response.text().await {
                        Ok(body_str) => self.process_body(body_str.as_str(), etag.as_str()),
                        Err(body_error) => {
                            let msg = format!("Fetching config was successful but the HTTP response content was invalid. {body_error}");
                            error!(event_id = InvalidHttpResponseContent.as_u16(); "{}", msg);
                            Failed(ClientError::new(InvalidHttpResponseContent, msg))
                        }
                    }
                }
                304 => {
                    debug!("Fetch was successful: not modified");
                    NotModified
                }
                429 => {
                    let msg = "The backend throttled the fetch request. Status code: 429".to_owned();
                    warn!(event_id = ErrorKind::Throttled.as_u16(); "{}", msg);
                    FetchResponse::Throttled(ClientError::new(ErrorKind::Throttled, msg))
                }
                code => {
                    let msg = format!("Unexpected HTTP response was received while trying to fetch config. Status code: {code}");
                    error!(event_id = UnexpectedHttpResponse.as_u16(); "{}", msg);
                    Failed(ClientError::new(UnexpectedHttpResponse, msg))
                }
            },
            Err(error) => {
                if error.is_timeout() {
                    let msg = "Request timed out while trying to fetch config.".to_owned();
                    error!(event_id = HttpRequestTimeout.as_u16(); "{}", msg);
                    Failed(ClientError::new(HttpRequestTimeout, msg))
                } else {
                    let msg = format!("Unexpected error occurred while trying to fetch config. It is most likely due to a local network issue. Please make sure your application can reach the remote config backend. {error}");
                    error!(event_id = HttpRequestFailure.as_u16(); "{}", msg);
                    Failed(ClientError::new(HttpRequestFailure, msg))
                }
            }
        }
    }

    fn process_body(&self, body: &str, etag: &str) -> FetchResponse {
        let parsed = parse_body(body).and_then(|parsed| {
            let state = parsed.state;
            parsed
                .into_snapshot(body, etag, Utc::now())
                .map(|snapshot| (state, snapshot))
        });
        match parsed {
            Ok((Some(TemplateState::NoChange), _)) => {
                debug!("Fetch was successful: backend reported no change");
                NotModified
            }
            Ok((Some(TemplateState::InstanceStateUnspecified), _)) => {
                let msg = "Fetching config was successful but the backend reported an unspecified instance state.".to_owned();
                error!(event_id = UnexpectedHttpResponse.as_u16(); "{}", msg);
                Failed(ClientError::new(UnexpectedHttpResponse, msg))
            }
            Ok((_, snapshot)) => {
                debug!("Fetch was successful: new config fetched");
                Fetched(snapshot)
            }
            Err(parse_error) => {
                let msg = format!("Fetching config was successful but the HTTP response content was invalid. {parse_error}");
                error!(event_id = InvalidHttpResponseContent.as_u16(); "{}", msg);
                Failed(ClientError::new(InvalidHttpResponseContent, msg))
            }
        }
    }
}

#[cfg(test)]
mod fetch_tests {
    use std::time::Duration;

    use reqwest::header::{ETAG, IF_NONE_MATCH};

    use crate::constants::test_constants::{MOCK_KEY, MOCK_PATH};
    use crate::constants::PKG_VERSION;
    use crate::errors::ErrorKind;
    use crate::fetch::fetcher::FetchResponse::{Failed, Fetched, NotModified, Throttled};
    use crate::fetch::fetcher::{Fetcher, REMOTE_CONFIG_UA_HEADER};
    use crate::value::Value;

    fn fetcher(url: String) -> Fetcher {
        Fetcher::new(url.as_str(), MOCK_KEY, Duration::from_secs(30)).unwrap()
    }

    #[tokio::test]
    async fn fetch_http() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", MOCK_PATH)
            .with_status(200)
            .match_header(
                REMOTE_CONFIG_UA_HEADER,
                format!("RemoteConfig-Rust/{PKG_VERSION}").as_str(),
            )
            .with_body(r#"{"entries": {"a": 2}, "state": "UPDATE"}"#)
            .create_async()
            .await;

        let response = fetcher(server.url()).fetch("").await;
        match response {
            Fetched(snapshot) => assert_eq!(snapshot.values["a"], Value::Int(2)),
            _ => panic!(),
        }
    }

    #[tokio::test]
    async fn fetch_http_etag() {
        let mut server = mockito::Server::new_async().await;
        let m1 = server
            .mock("GET", MOCK_PATH)
            .with_status(200)
            .with_header(ETAG.as_str(), "etag1")
            .with_body(r#"{"entries": {}}"#)
            .create_async()
            .await;

        let m2 = server
            .mock("GET", MOCK_PATH)
            .match_header(IF_NONE_MATCH.as_str(), "etag1")
            .with_status(304)
            .create_async()
            .await;

        let fetcher = fetcher(server.url());
        let etag = match fetcher.fetch("").await {
            Fetched(snapshot) => snapshot.etag,
            _ => panic!(),
        };
        assert_eq!("etag1", etag);

        let response = fetcher.fetch(etag.as_str()).await;
        assert!(matches!(response, NotModified));

        m1.assert_async().await;
        m2.assert_async().await;
    }

    #[tokio::test]
    async fn fetch_http_no_change_state() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", MOCK_PATH)
            .with_status(200)
            .with_body(r#"{"state": "NO_CHANGE"}"#)
            .create_async()
            .await;

        let response = fetcher(server.url()).fetch("etag").await;
        assert!(matches!(response, NotModified));
    }

    #[tokio::test]
    async fn fetch_http_throttled() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", MOCK_PATH)
            .with_status(429)
            .create_async()
            .await;

        match fetcher(server.url()).fetch("").await {
            Throttled(err) => {
                assert_eq!(err.kind, ErrorKind::Throttled);
                assert_eq!(
                    err.to_string(),
                    "The backend throttled the fetch request. Status code: 429"
                );
            }
            _ => panic!(),
        }
    }

    #[tokio::test]
    async fn fetch_http_failed() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", MOCK_PATH)
            .with_status(500)
            .create_async()
            .await;

        server
            .mock("GET", MOCK_PATH)
            .with_status(200)
            .with_body(r#"{"state": "INSTANCE_STATE_UNSPECIFIED"}"#)
            .create_async()
            .await;

        let fetcher = fetcher(server.url());
        match fetcher.fetch("").await {
            Failed(err) => {
                assert_eq!(err.kind, ErrorKind::UnexpectedHttpResponse);
                assert_eq!(err.to_string(), "Unexpected HTTP response was received while trying to fetch config. Status code: 500");
            }
            _ => panic!(),
        }

        match fetcher.fetch("").await {
            Failed(err) => assert_eq!(err.kind, ErrorKind::UnexpectedHttpResponse),
            _ => panic!(),
        }
    }

    #[tokio::test]
    async fn fetch_http_body_error() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", MOCK_PATH)
            .with_status(200)
            .with_body(r#"{"entries": {}"#)
            .create_async()
            .await;

        server
            .mock("GET", MOCK_PATH)
            .with_status(200)
            .with_body(r#"{"entries": {"a": null}}"#)
            .create_async()
            .await;

        let fetcher = fetcher(server.url());
        match fetcher.fetch("").await {
            Failed(err) => {
                assert_eq!(err.kind, ErrorKind::InvalidHttpResponseContent);
                assert!(err.to_string().starts_with(
                    "Fetching config was successful but the HTTP response content was invalid. JSON parsing failed."
                ));
            }
            _ => panic!(),
        }

        match fetcher.fetch("").await {
            Failed(err) => {
                assert_eq!(err.to_string(), "Fetching config was successful but the HTTP response content was invalid. Value of entry 'a' is not a primitive.");
            }
            _ => panic!(),
        }
    }

    #[tokio::test]
    async fn fetch_http_unreachable() {
        let fetcher = fetcher("http://127.0.0.1:1".to_owned());
        match fetcher.fetch("").await {
            Failed(err) => assert_eq!(err.kind, ErrorKind::HttpRequestFailure),
            _ => panic!(),
        }
    }
}
