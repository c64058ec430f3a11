//! Service factory for building command dependencies.
//!
//! Services (HTTP client, index client) are built from configuration values
//! but are not part of the configuration itself.

use anyhow::Result;
use reqwest::Client;

use crate::{http::HttpClient, index::RemoteIndex};

use super::config::Config;

pub const USER_AGENT: &str = "phpcs-tool";

/// Build the shared HTTP client
pub fn build_http_client() -> Result<HttpClient> {
    let client = Client::builder().user_agent(USER_AGENT).build()?;
    Ok(HttpClient::new(client))
}

/// Build the sniffer index client from configuration
pub fn build_index(config: &Config, http_client: HttpClient) -> RemoteIndex {
    RemoteIndex::new(http_client, &config.api_url)
}
