use std::sync::Arc;

use axum::extract::{Query, State};
use axum::http::header;
use axum::response::{IntoResponse, Response};
use axum::Json;
use tracing::field::Empty;
use tracing::info;

use crate::domain::{SearchOutcome, SearchParams, SearchQuery};
use crate::error::Result;
use crate::AppState;

/// `GET /yelp-search`: first matching business for a term and location.
#[tracing::instrument(skip_all, fields(term = Empty, location = Empty))]
pub async fn search(
    State(state): State<Arc<AppState>>,
    Query(pairs): Query<Vec<(String, String)>>,
) -> Result<Response> {
    let query = SearchQuery::try_from(pairs.into_iter().collect::<SearchParams>())?;

    let span = tracing::Span::current();
    span.record("term", query.term.as_str());
    span.record("location", query.location.as_str());

    let response = match state.yelp.find_first_business(&query).await? {
        SearchOutcome::Found(detail) => {
            info!("business found");
            ([(header::CONTENT_TYPE, "application/json")], detail).into_response()
        }
        SearchOutcome::NotFound(notice) => {
            info!("no business found");
            Json(notice).into_response()
        }
    };

    Ok(response)
}
