//! `GET /api/advocates`: filter and sort the directory.

use axum::{
    extract::{rejection::QueryRejection, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, error};

use super::server::ApiState;
use crate::db::{Advocate, AdvocateStore, StoreError};
use crate::search::{build_order_directive, build_search_predicate, QueryError, SortDirection};

/// Body returned for every failure, whatever the cause.
pub const FETCH_FAILED_MESSAGE: &str = "Failed to fetch advocates";

/// Query-string parameters, all optional.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdvocateQuery {
    pub q: Option<String>,
    pub order_by: Option<String>,
    pub sort: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct AdvocatesResponse {
    pub data: Vec<Advocate>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("malformed query string: {0}")]
    Params(#[from] QueryRejection),
    #[error(transparent)]
    Query(#[from] QueryError),
    #[error(transparent)]
    Store(#[from] StoreError),
}

impl IntoResponse for FetchError {
    fn into_response(self) -> Response {
        error!(error = %self, detail = ?self, "Error fetching advocates");
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ErrorResponse {
                error: FETCH_FAILED_MESSAGE.to_string(),
            }),
        )
            .into_response()
    }
}

pub async fn advocates_handler(
    State(state): State<ApiState>,
    params: Result<Query<AdvocateQuery>, QueryRejection>,
) -> Result<Json<AdvocatesResponse>, FetchError> {
    let Query(params) = params?;
    let data = fetch_advocates(state.store.as_deref(), &params).await?;
    Ok(Json(AdvocatesResponse { data }))
}

/// Resolve `params` into a predicate and ordering and run them against `store`.
///
/// A blank `q` means "no filter"; it never reaches the predicate builder.
/// A `sort` other than `asc`/`desc` is treated as absent.
pub async fn fetch_advocates(
    store: Option<&dyn AdvocateStore>,
    params: &AdvocateQuery,
) -> Result<Vec<Advocate>, FetchError> {
    let store = store.ok_or(StoreError::NotConfigured)?;

    let predicate = match params.q.as_deref() {
        Some(q) if !q.trim().is_empty() => Some(build_search_predicate(q)?),
        _ => None,
    };

    let direction = params
        .sort
        .as_deref()
        .and_then(|s| s.parse::<SortDirection>().ok());
    let order = build_order_directive(params.order_by.as_deref(), direction)?;

    debug!(
        search = predicate.is_some(),
        order_by = %order.field,
        sort = %order.direction,
        "fetching advocates"
    );

    Ok(store.select(predicate.as_ref(), &order).await?)
}
