//! Query parameter parsing and access token check for the search endpoint

use axum::http::HeaderMap;
use serde::Deserialize;
use std::str::FromStr;

use crate::engine::{OrderBy, SearchQuery};
use crate::error::SearchError;

/// Header carrying the shared secret
pub const ACCESS_TOKEN_HEADER: &str = "AccessToken";

/// Query string as received, before any parsing
///
/// Absent parameters are treated as empty strings, so a missing `limit`
/// fails the same way as `limit=`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawSearchParams {
    #[serde(default)]
    pub limit: String,
    #[serde(default)]
    pub offset: String,
    #[serde(default)]
    pub order_by: String,
    #[serde(default)]
    pub order_field: String,
    #[serde(default)]
    pub query: String,
}

/// Compare the `AccessToken` header against the expected token
pub fn authorize(headers: &HeaderMap, expected: &str) -> Result<(), SearchError> {
    let supplied = headers
        .get(ACCESS_TOKEN_HEADER)
        .and_then(|v| v.to_str().ok())
        .ok_or(SearchError::Unauthorized)?;

    if supplied == expected {
        Ok(())
    } else {
        Err(SearchError::Unauthorized)
    }
}

fn parse_param<T: FromStr<Err = std::num::ParseIntError>>(
    name: &'static str,
    raw: &str,
) -> Result<T, SearchError> {
    raw.parse()
        .map_err(|source| SearchError::InvalidParam { name, source })
}

impl TryFrom<RawSearchParams> for SearchQuery {
    type Error = SearchError;

    /// `limit` and `offset` must be non-negative integers; a negative value
    /// fails to parse like any other non-number.
    fn try_from(raw: RawSearchParams) -> Result<Self, Self::Error> {
        let limit = parse_param::<usize>("limit", &raw.limit)?;
        let offset = parse_param::<usize>("offset", &raw.offset)?;
        let order_by = OrderBy::try_from(parse_param::<i64>("order_by", &raw.order_by)?)?;

        Ok(Self {
            limit,
            offset,
            query: raw.query,
            order_field: raw.order_field,
            order_by,
        })
    }
}
