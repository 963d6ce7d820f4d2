//! Search endpoint
//!
//! Authenticate, validate parameters, reload the dataset, run the query
//! engine, encode. The first failing step produces the response.

use axum::{
    extract::{Query, State},
    http::{header, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
    Router,
};

use crate::{
    engine::{self, SearchQuery},
    error::SearchError,
    health::health,
    state::AppState,
    validation::{authorize, RawSearchParams},
};

/// Build the service router
///
/// The search endpoint is served at both `/` and `/users`.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(search_users))
        .route("/users", get(search_users))
        .route("/health", get(health))
        .with_state(state)
}

/// `GET /?limit=&offset=&order_by=&order_field=&query=`
pub async fn search_users(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(raw): Query<RawSearchParams>,
) -> Result<Response, SearchError> {
    authorize(&headers, state.access_token())?;

    let query = SearchQuery::try_from(raw)?;

    let store = state.store();
    let records = tokio::task::spawn_blocking(move || store.load()).await??;

    let users = engine::search(records, &query)?;
    let body = serde_json::to_vec(&users)?;

    tracing::info!(
        returned = users.len(),
        limit = query.limit,
        offset = query.offset,
        "Search completed"
    );

    Ok((
        StatusCode::OK,
        [(header::CONTENT_TYPE, "application/json")],
        body,
    )
        .into_response())
}
