//! Search client
//!
//! Validates a [`SearchRequest`] locally, calls the search endpoint with the
//! `AccessToken` header and translates every response into either a
//! [`SearchResponse`] or a [`ClientError`] whose `Display` text is the
//! message shown to users.

use reqwest::{StatusCode, Url};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;

use crate::{
    config::ClientConfig,
    error::{ErrorResponse, ERROR_BAD_ORDER_FIELD},
    models::{SearchResponse, User},
    validation::ACCESS_TOKEN_HEADER,
};

/// Largest page the client asks for
pub const MAX_LIMIT: i64 = 25;

/// Parameters of one search call
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchRequest {
    pub limit: i64,
    pub offset: i64,
    /// Substring matched against full name and about text
    pub query: String,
    /// `""`, `"ID"`, `"Name"` or `"Age"`; checked by the server
    pub order_field: String,
    /// `-1` descending, `0` as stored, `1` ascending; checked by the server
    pub order_by: i64,
}

impl SearchRequest {
    /// Reject negative paging values and cap `limit` at [`MAX_LIMIT`]
    pub fn validated(&self) -> Result<Self, ClientError> {
        if self.limit < 0 {
            return Err(ClientError::NegativeLimit);
        }
        if self.offset < 0 {
            return Err(ClientError::NegativeOffset);
        }

        Ok(Self {
            limit: self.limit.min(MAX_LIMIT),
            ..self.clone()
        })
    }
}

/// Outcome of a failed search call
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ClientError {
    #[error("limit must be > 0")]
    NegativeLimit,

    #[error("offset must be > 0")]
    NegativeOffset,

    /// The call did not finish within the client timeout
    #[error("timeout for {params}")]
    Timeout {
        /// Encoded query string of the request
        params: String,
    },

    /// Connection, DNS, URL or client construction failure
    #[error("unknown error {0}")]
    Transport(String),

    #[error("bad AccessToken")]
    BadAccessToken,

    #[error("OrderFeld {0} invalid")]
    InvalidOrderField(String),

    #[error("unknown bad request error: {0}")]
    BadRequest(String),

    #[error("cant unpack error json")]
    UndecodableError,

    #[error("cant unpack result json")]
    UndecodableResult,

    /// The server could not load its dataset or encode the result
    #[error("SearchServer fatal error")]
    ServerFatal,

    #[error("unknown error")]
    UnexpectedStatus(StatusCode),
}

/// Client for the search endpoint
#[derive(Debug, Clone)]
pub struct SearchClient {
    access_token: String,
    url: String,
    http: reqwest::Client,
}

impl SearchClient {
    /// Create a client that gives up on a call after `timeout`
    pub fn new(
        access_token: impl Into<String>,
        url: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, ClientError> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ClientError::Transport(e.to_string()))?;

        Ok(Self {
            access_token: access_token.into(),
            url: url.into(),
            http,
        })
    }

    /// Create a client from the `[client]` configuration section
    pub fn from_config(config: &ClientConfig) -> Result<Self, ClientError> {
        Self::new(&config.access_token, &config.base_url, config.timeout())
    }

    /// Run one search
    ///
    /// Negative `limit` or `offset` fail before any network call. Exactly one
    /// request is sent otherwise; nothing is retried.
    pub async fn find_users(&self, request: &SearchRequest) -> Result<SearchResponse, ClientError> {
        let request = request.validated()?;

        let url = self.request_url(&request)?;
        let params = url.query().unwrap_or_default().to_string();

        tracing::debug!(url = %self.url, %params, "Sending search request");

        let response = self
            .http
            .get(url)
            .header(ACCESS_TOKEN_HEADER, &self.access_token)
            .send()
            .await
            .map_err(|e| transport_error(e, &params))?;

        let status = response.status();
        let body = response
            .bytes()
            .await
            .map_err(|e| transport_error(e, &params))?;

        let result = translate(status, &body, &request.order_field);
        if let Err(ref e) = result {
            tracing::debug!(status = %status, error = %e, "Search request failed");
        }
        result
    }

    fn request_url(&self, request: &SearchRequest) -> Result<Url, ClientError> {
        let mut url = Url::parse(&self.url).map_err(|e| ClientError::Transport(e.to_string()))?;

        url.query_pairs_mut()
            .append_pair("limit", &request.limit.to_string())
            .append_pair("offset", &request.offset.to_string())
            .append_pair("order_by", &request.order_by.to_string())
            .append_pair("order_field", &request.order_field)
            .append_pair("query", &request.query);

        Ok(url)
    }
}

fn transport_error(err: reqwest::Error, params: &str) -> ClientError {
    if err.is_timeout() {
        ClientError::Timeout {
            params: params.to_string(),
        }
    } else {
        ClientError::Transport(err.to_string())
    }
}

/// Map a server response to the client outcome
///
/// `order_field` is the field the caller asked for; it is echoed back when
/// the server rejects it.
pub fn translate(
    status: StatusCode,
    body: &[u8],
    order_field: &str,
) -> Result<SearchResponse, ClientError> {
    match status {
        StatusCode::OK => {
            let users: Vec<User> =
                serde_json::from_slice(body).map_err(|_| ClientError::UndecodableResult)?;
            Ok(SearchResponse { users })
        }
        StatusCode::UNAUTHORIZED => Err(ClientError::BadAccessToken),
        StatusCode::BAD_REQUEST => {
            let payload: ErrorResponse =
                serde_json::from_slice(body).map_err(|_| ClientError::UndecodableError)?;
            if payload.error == ERROR_BAD_ORDER_FIELD {
                return Err(ClientError::InvalidOrderField(order_field.to_string()));
            }
            Err(ClientError::BadRequest(payload.error))
        }
        StatusCode::INTERNAL_SERVER_ERROR => Err(ClientError::ServerFatal),
        other => Err(ClientError::UnexpectedStatus(other)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(limit: i64, offset: i64) -> SearchRequest {
        SearchRequest {
            limit,
            offset,
            ..Default::default()
        }
    }

    #[test]
    fn test_negative_paging_is_rejected_locally() {
        assert_eq!(
            request(-1, 0).validated().unwrap_err().to_string(),
            "limit must be > 0"
        );
        assert_eq!(
            request(1, -1).validated().unwrap_err().to_string(),
            "offset must be > 0"
        );
    }

    #[test]
    fn test_limit_is_capped_never_raised() {
        assert_eq!(request(50, 0).validated().unwrap().limit, MAX_LIMIT);
        assert_eq!(request(3, 0).validated().unwrap().limit, 3);
        assert_eq!(request(0, 0).validated().unwrap().limit, 0);
    }

    #[tokio::test]
    async fn test_negative_limit_sends_nothing() {
        // Port 9 is discard; a sent request would surface as a transport error
        let client = SearchClient::new("t", "http://127.0.0.1:9/", Duration::from_millis(50)).unwrap();
        let err = client.find_users(&request(-1, 0)).await.unwrap_err();
        assert_eq!(err, ClientError::NegativeLimit);
    }

    #[tokio::test]
    async fn test_malformed_url_is_unknown_error() {
        let client = SearchClient::new("t", "not a url", Duration::from_millis(50)).unwrap();
        let err = client.find_users(&request(1, 0)).await.unwrap_err();
        assert!(err.to_string().starts_with("unknown error"), "{err}");
    }

    #[test]
    fn test_request_url_encodes_all_params() {
        let client = SearchClient::new("t", "http://localhost/users", Duration::from_secs(1)).unwrap();
        let url = client
            .request_url(&SearchRequest {
                limit: 2,
                offset: 1,
                query: "Boyd Wolf".to_string(),
                order_field: "ID".to_string(),
                order_by: -1,
            })
            .unwrap();
        assert_eq!(
            url.query(),
            Some("limit=2&offset=1&order_by=-1&order_field=ID&query=Boyd+Wolf")
        );
    }

    #[test]
    fn test_translate_success() {
        let body = br#"[{"Id":1,"Name":"Hilda Mayer","Age":21,"About":"x","Gender":"female"}]"#;
        let response = translate(StatusCode::OK, body, "").unwrap();
        assert_eq!(response.users.len(), 1);
        assert_eq!(response.users[0].name, "Hilda Mayer");
    }

    #[test]
    fn test_translate_status_classes() {
        assert_eq!(
            translate(StatusCode::UNAUTHORIZED, b"invalid AccessToken", ""),
            Err(ClientError::BadAccessToken)
        );
        assert_eq!(
            translate(StatusCode::INTERNAL_SERVER_ERROR, b"open dataset.xml", ""),
            Err(ClientError::ServerFatal)
        );
        assert_eq!(
            translate(StatusCode::NOT_FOUND, b"", "").unwrap_err().to_string(),
            "unknown error"
        );
        assert_eq!(
            translate(StatusCode::OK, b"nope", ""),
            Err(ClientError::UndecodableResult)
        );
    }

    #[test]
    fn test_translate_bad_requests() {
        let field = translate(StatusCode::BAD_REQUEST, br#"{"Error":"OrderFeld invalid"}"#, "user");
        assert_eq!(field.unwrap_err().to_string(), "OrderFeld user invalid");

        let order = translate(StatusCode::BAD_REQUEST, br#"{"Error":"OrderBy invalid"}"#, "");
        assert_eq!(
            order.unwrap_err().to_string(),
            "unknown bad request error: OrderBy invalid"
        );

        let other = translate(StatusCode::BAD_REQUEST, br#"{"Error":"badRequest"}"#, "");
        assert_eq!(
            other.unwrap_err().to_string(),
            "unknown bad request error: badRequest"
        );

        let raw = translate(StatusCode::BAD_REQUEST, b"invalid digit found in string", "");
        assert_eq!(raw, Err(ClientError::UndecodableError));
    }
}
