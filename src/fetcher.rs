use crate::error::CrawlError;
use log::debug;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT_LANGUAGE, CONNECTION, USER_AGENT};
use reqwest::Client;
use std::time::Duration;

const BROWSER_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";

/// Downloads pages with a browser-like header set.
pub struct PageFetcher {
    client: Client,
}

impl PageFetcher {
    /// Without a timeout the transport default applies.
    pub fn new(timeout: Option<Duration>) -> Result<Self, CrawlError> {
        let mut builder = Client::builder().default_headers(default_headers()?);
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }

        Ok(Self {
            client: builder.build()?,
        })
    }

    /// Fetches `url` once and returns the body when the status is 2xx.
    pub async fn fetch(&self, url: &str) -> Result<String, CrawlError> {
        debug!("GET {}", url);
        let response = self.client.get(url).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(CrawlError::Fetch {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        Ok(response.text().await?)
    }
}

fn default_headers() -> Result<HeaderMap, CrawlError> {
    let mut headers = HeaderMap::new();
    headers.insert(USER_AGENT, BROWSER_USER_AGENT.parse()?);
    headers.insert(ACCEPT_LANGUAGE, "en-US,en;q=0.9".parse()?);
    headers.insert(CONNECTION, HeaderValue::from_static("keep-alive"));
    Ok(headers)
}
