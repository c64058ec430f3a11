//! Client for the remote sniffer index.
//!
//! The index is a static JSON site: `index.json` lists the installable
//! sniffer names and `<vendor>/<name>.json` describes one package. Every
//! failure (transport, status, decoding, shape) degrades to an empty value,
//! so callers treat "unreachable" and "not listed" the same way.

use async_trait::async_trait;
use log::debug;
use serde::de::DeserializeOwned;

use crate::http::HttpClient;
use crate::package::PackageDescriptor;

/// Default location of the sniffer index
pub const DEFAULT_API_URL: &str = "http://leoontheearth.github.io/php-code-sniffer-tool/cs";

/// Filename of the list of available sniffers
pub const INDEX_FILENAME: &str = "index.json";

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SnifferIndex: Send + Sync {
    /// Names of all installable sniffers.
    async fn list(&self) -> Vec<String>;

    /// Descriptor of one sniffer; empty if it cannot be fetched.
    async fn package(&self, name: &str) -> PackageDescriptor;
}

pub struct RemoteIndex {
    http_client: HttpClient,
    base_url: String,
}

impl RemoteIndex {
    pub fn new(http_client: HttpClient, base_url: &str) -> Self {
        Self {
            http_client,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// GET `<base_url>/<filename>` and decode it, or `T::default()` on any failure.
    #[tracing::instrument(skip(self))]
    pub async fn fetch<T: DeserializeOwned + Default>(&self, filename: &str) -> T {
        let url = format!("{}/{}", self.base_url, filename);

        match self.http_client.get_json::<T>(&url).await {
            Ok(value) => value,
            Err(e) => {
                debug!("Fetching {} failed: {:#}", url, e);
                T::default()
            }
        }
    }
}

#[async_trait]
impl SnifferIndex for RemoteIndex {
    async fn list(&self) -> Vec<String> {
        self.fetch(INDEX_FILENAME).await
    }

    async fn package(&self, name: &str) -> PackageDescriptor {
        self.fetch(&format!("{}.json", name)).await
    }
}
