use std::fmt;

use chrono::{DateTime, Utc};
use reqwest::Client;
use serde_json::{json, Value};
use tracing::{debug, info};

use crate::config::Config;
use crate::credentials::CredentialStore;
use crate::error::Result;
use crate::github::{self, RATE_LIMIT_QUERY};
use crate::progress;

/// Which GitHub API a reading came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Api {
    Rest,
    GraphQl,
}

impl fmt::Display for Api {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Api::Rest => write!(f, "REST"),
            Api::GraphQl => write!(f, "GraphQL"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateLimitReading {
    pub api: Api,
    pub remaining: u64,
}

pub struct RateLimitReporter {
    client: Client,
    credentials: CredentialStore,
    api_url: String,
    graphql_url: String,
}

impl RateLimitReporter {
    pub fn new(config: &Config) -> Result<Self> {
        Ok(Self::with_client(github::client()?, config))
    }

    pub fn with_client(client: Client, config: &Config) -> Self {
        RateLimitReporter {
            client,
            credentials: CredentialStore::new(config),
            api_url: config.api_url.clone(),
            graphql_url: config.graphql_url.clone(),
        }
    }

    /// Remaining core quota from the REST `rate_limit` endpoint.
    pub async fn rest_rate_limit(&self) -> Result<u64> {
        let token = self.credentials.load()?;
        let pb = progress::spinner("Getting rate limit...");

        let url = format!("{}/rate_limit", self.api_url);
        debug!("Requesting URL: {}", url);
        let result = self.fetch_rest(&url, token.as_deref()).await;
        finish(&pb, &result);

        let payload = result?;
        if let Some(reset) = payload
            .pointer("/resources/core/reset")
            .and_then(Value::as_i64)
            .and_then(|ts| DateTime::<Utc>::from_timestamp(ts, 0))
        {
            debug!("REST quota resets at {}", reset.to_rfc3339());
        }
        github::required_u64(&payload, "/resources/core/remaining")
    }

    /// Remaining quota reported by the GraphQL `rateLimit` field.
    pub async fn graphql_rate_limit(&self) -> Result<u64> {
        let token = self.credentials.load()?;
        let pb = progress::spinner("Getting rate limit...");

        let result = github::graphql(
            &self.client,
            &self.graphql_url,
            token.as_deref(),
            RATE_LIMIT_QUERY,
            json!({}),
        )
        .await;
        finish(&pb, &result);

        github::required_u64(&result?, "/data/rateLimit/remaining")
    }

    pub async fn reading(&self, use_graphql: bool) -> Result<RateLimitReading> {
        let (api, remaining) = if use_graphql {
            (Api::GraphQl, self.graphql_rate_limit().await?)
        } else {
            (Api::Rest, self.rest_rate_limit().await?)
        };
        info!("{} rate limit remaining: {}", api, remaining);
        Ok(RateLimitReading { api, remaining })
    }

    /// Fetch the remaining quota and print it.
    pub async fn report(&self, use_graphql: bool) -> Result<u64> {
        let reading = self.reading(use_graphql).await?;
        println!("Remaining requests {}", reading.remaining);
        Ok(reading.remaining)
    }

    async fn fetch_rest(&self, url: &str, token: Option<&str>) -> Result<Value> {
        let response = github::authorize(self.client.get(url), token).send().await?;
        let payload: Value = github::check_status(response)?.json().await?;
        Ok(payload)
    }
}

fn finish<T>(pb: &indicatif::ProgressBar, result: &Result<T>) {
    match result {
        Ok(_) => progress::succeed(pb, "rate limit"),
        Err(_) => progress::fail(pb, "rate limit"),
    }
}
