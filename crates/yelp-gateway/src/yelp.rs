//! Outbound client for the Yelp Fusion business endpoints.

use anyhow::{anyhow, Context};
use bytes::Bytes;
use reqwest::{Client, Request, Response, Url};
use tracing::{debug, warn};

use crate::config::Config;
use crate::domain::{NotFoundNotice, SearchOutcome, SearchQuery, SearchResponse};
use crate::error::{AppError, Result};

const SEARCH_PATH: [&str; 3] = ["v3", "businesses", "search"];
const BUSINESS_PATH: [&str; 2] = ["v3", "businesses"];
const SEARCH_LIMIT: &str = "1";

#[derive(Clone)]
pub struct YelpClient {
    client: Client,
    base_url: Url,
    api_key: String,
}

impl YelpClient {
    pub fn new(config: &Config) -> anyhow::Result<Self> {
        let client = Client::builder()
            .timeout(config.yelp_timeout)
            .build()
            .context("failed to build http client")?;

        Self::with_client(client, config)
    }

    pub fn with_client(client: Client, config: &Config) -> anyhow::Result<Self> {
        let base_url = Url::parse(&config.yelp_api_host)
            .with_context(|| format!("invalid YELP_API_HOST: {}", config.yelp_api_host))?;
        if base_url.cannot_be_a_base() {
            return Err(anyhow!("YELP_API_HOST cannot be a base url: {}", base_url));
        }

        Ok(Self {
            client,
            base_url,
            api_key: config.yelp_api_key.clone(),
        })
    }

    fn endpoint<'a>(&self, segments: impl IntoIterator<Item = &'a str>) -> Url {
        let mut url = self.base_url.clone();
        // cannot_be_a_base was rejected in with_client
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    /// Builds the search call. Spaces in term and location go out as `+`.
    pub fn search_request(&self, query: &SearchQuery) -> reqwest::Result<Request> {
        self.client
            .get(self.endpoint(SEARCH_PATH))
            .bearer_auth(&self.api_key)
            .query(&[
                ("term", query.term.as_str()),
                ("location", query.location.as_str()),
                ("limit", SEARCH_LIMIT),
            ])
            .build()
    }

    pub fn business_request(&self, business_id: &str) -> reqwest::Result<Request> {
        self.client
            .get(self.endpoint(BUSINESS_PATH.into_iter().chain([business_id])))
            .bearer_auth(&self.api_key)
            .build()
    }

    pub async fn search(&self, query: &SearchQuery) -> Result<SearchResponse> {
        let body = self.execute(self.search_request(query)?).await?;

        serde_json::from_slice(&body).map_err(|e| {
            warn!(error = %e, "search response did not match expected shape");
            AppError::MalformedUpstreamResponse(e.to_string())
        })
    }

    /// Returns the detail body untouched once it is known to be JSON.
    pub async fn business(&self, business_id: &str) -> Result<Bytes> {
        let body = self.execute(self.business_request(business_id)?).await?;

        serde_json::from_slice::<serde::de::IgnoredAny>(&body).map_err(|e| {
            warn!(business_id, error = %e, "business response is not json");
            AppError::MalformedUpstreamResponse(e.to_string())
        })?;

        Ok(body)
    }

    /// Search with a limit of one and fetch the detail of the first hit.
    pub async fn find_first_business(&self, query: &SearchQuery) -> Result<SearchOutcome> {
        let response = self.search(query).await?;

        let Some(first) = response.businesses.first() else {
            debug!("search returned no businesses");
            return Ok(SearchOutcome::NotFound(NotFoundNotice::for_query(query)));
        };

        debug!(business_id = %first.id, "fetching business detail");
        self.business(&first.id).await.map(SearchOutcome::Found)
    }

    async fn execute(&self, request: Request) -> Result<Bytes> {
        let path = request.url().path().to_owned();

        let response = self.client.execute(request).await.map_err(|e| {
            warn!(%path, error = %e, timeout = e.is_timeout(), "yelp request failed");
            AppError::UpstreamTransport(e)
        })?;

        Self::handle_response(&path, response).await
    }

    async fn handle_response(path: &str, response: Response) -> Result<Bytes> {
        let status = response.status();
        if !status.is_success() {
            warn!(%path, status = status.as_u16(), "yelp api returned error status");
            return Err(AppError::UpstreamStatus {
                status: status.as_u16(),
            });
        }

        response.bytes().await.map_err(AppError::UpstreamTransport)
    }
}
