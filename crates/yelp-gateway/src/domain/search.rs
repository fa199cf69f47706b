use bytes::Bytes;
use serde::{Deserialize, Deserializer, Serialize};

use crate::error::AppError;

/// Raw query string of `GET /yelp-search`. Both fields are optional here so
/// that a missing parameter surfaces as our own advisory message instead of
/// axum's extractor rejection.
#[derive(Debug, Default)]
pub struct SearchParams {
    pub search_term: Option<String>,
    pub search_location: Option<String>,
}

/// The first occurrence of a repeated key wins, later ones are ignored.
impl FromIterator<(String, String)> for SearchParams {
    fn from_iter<I: IntoIterator<Item = (String, String)>>(pairs: I) -> Self {
        let mut params = Self::default();
        for (key, value) in pairs {
            let slot = match key.as_str() {
                "search_term" => &mut params.search_term,
                "search_location" => &mut params.search_location,
                _ => continue,
            };
            slot.get_or_insert(value);
        }
        params
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchQuery {
    pub term: String,
    pub location: String,
}

impl TryFrom<SearchParams> for SearchQuery {
    type Error = AppError;

    fn try_from(params: SearchParams) -> Result<Self, Self::Error> {
        match (params.search_term, params.search_location) {
            (Some(term), Some(location)) if !term.is_empty() && !location.is_empty() => {
                Ok(Self { term, location })
            }
            _ => Err(AppError::MissingParameter),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct BusinessSummary {
    pub id: String,
}

#[derive(Debug, Default, Deserialize)]
pub struct SearchResponse {
    #[serde(default, deserialize_with = "null_as_empty")]
    pub businesses: Vec<BusinessSummary>,
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<Vec<BusinessSummary>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Vec<BusinessSummary>>::deserialize(deserializer)?.unwrap_or_default())
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NotFoundNotice {
    pub no_business: bool,
    pub message: String,
}

impl NotFoundNotice {
    pub fn for_query(query: &SearchQuery) -> Self {
        Self {
            no_business: true,
            message: format!(
                "Sorry, Yelp has no information about {} in {}.",
                query.term, query.location
            ),
        }
    }
}

#[derive(Debug)]
pub enum SearchOutcome {
    /// Business detail body exactly as the directory returned it.
    Found(Bytes),
    NotFound(NotFoundNotice),
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params(term: Option<&str>, location: Option<&str>) -> SearchParams {
        SearchParams {
            search_term: term.map(Into::into),
            search_location: location.map(Into::into),
        }
    }

    #[test]
    fn query_requires_both_parameters() {
        for p in [
            params(None, None),
            params(Some("pizza"), None),
            params(None, Some("Boston")),
            params(Some(""), Some("Boston")),
            params(Some("pizza"), Some("")),
        ] {
            assert!(matches!(
                SearchQuery::try_from(p),
                Err(AppError::MissingParameter)
            ));
        }
    }

    #[test]
    fn query_keeps_values_untouched() {
        let query = SearchQuery::try_from(params(Some("Cheese Shop"), Some("Chicago, IL"))).unwrap();

        assert_eq!(query.term, "Cheese Shop");
        assert_eq!(query.location, "Chicago, IL");
    }

    #[test]
    fn notice_embeds_original_term_and_location() {
        let query = SearchQuery {
            term: "Cheese Shop".into(),
            location: "Chicago, IL".into(),
        };

        let notice = serde_json::to_value(NotFoundNotice::for_query(&query)).unwrap();

        assert_eq!(
            notice,
            serde_json::json!({
                "no_business": true,
                "message": "Sorry, Yelp has no information about Cheese Shop in Chicago, IL."
            })
        );
    }

    #[test]
    fn search_response_without_businesses_is_empty() {
        let response: SearchResponse = serde_json::from_str(r#"{"total": 0}"#).unwrap();
        assert!(response.businesses.is_empty());

        let response: SearchResponse = serde_json::from_str(r#"{"businesses": null}"#).unwrap();
        assert!(response.businesses.is_empty());

        let response: SearchResponse =
            serde_json::from_str(r#"{"businesses":[{"id":"abc123","name":"Cheese"}]}"#).unwrap();
        assert_eq!(response.businesses[0].id, "abc123");
    }

    #[test]
    fn repeated_parameter_keeps_first_value() {
        let params: SearchParams = [
            ("search_term", "a"),
            ("search_term", "c"),
            ("unrelated", "x"),
            ("search_location", "b"),
        ]
        .into_iter()
        .map(|(k, v)| (k.to_owned(), v.to_owned()))
        .collect();

        assert_eq!(params.search_term.as_deref(), Some("a"));
        assert_eq!(params.search_location.as_deref(), Some("b"));
    }
}
