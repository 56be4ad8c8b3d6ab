use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use tracing::debug;
use url::Url;

use crate::app::Result;
use crate::config::HttpConfig;
use crate::fetcher::{DirectoryFetcher, FetchError, Listing};
use crate::listing::ListingParser;

pub struct HttpFetcher {
    client: Client,
    parser: ListingParser,
}

impl HttpFetcher {
    pub fn new(config: &HttpConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .gzip(true)
            .brotli(true)
            .user_agent(config.user_agent.as_str())
            .build()?;

        Ok(Self {
            client,
            parser: ListingParser::new(),
        })
    }

    async fn get_text(&self, url: &Url) -> std::result::Result<String, FetchError> {
        let response = self.client.get(url.clone()).send().await?;
        let response = response.error_for_status()?;
        Ok(response.text().await?)
    }
}

#[async_trait]
impl DirectoryFetcher for HttpFetcher {
    async fn fetch_directory(&self, url: &Url) -> std::result::Result<Listing, FetchError> {
        let body = self.get_text(url).await?;
        let items = self.parser.parse(&body, url);
        debug!("Parsed {} entries from {}", items.len(), url);

        Ok(Listing {
            url: url.clone(),
            items,
        })
    }
}
