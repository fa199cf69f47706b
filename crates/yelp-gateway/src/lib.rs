pub mod api;
pub mod config;
pub mod domain;
pub mod error;
pub mod telemetry;
pub mod yelp;

use anyhow::Result;
use axum::Router;
use std::sync::Arc;

use crate::api::routes;
use crate::config::Config;
use crate::yelp::YelpClient;

#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub yelp: YelpClient,
}

pub struct App {
    state: Arc<AppState>,
}

impl App {
    pub fn new(config: Config) -> Result<Self> {
        let yelp = YelpClient::new(&config)?;

        Ok(Self {
            state: Arc::new(AppState { config, yelp }),
        })
    }

    pub fn config(&self) -> &Config {
        &self.state.config
    }

    pub fn router(&self) -> Router {
        routes::build(self.state.clone())
    }
}
