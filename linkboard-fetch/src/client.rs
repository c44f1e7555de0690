use crate::error::{FetchError, Result};
use crate::record::LinkRecord;
use reqwest::Client;
use reqwest::header::ACCEPT;
use std::time::{Duration, Instant};
use tracing::{debug, info};
use url::Url;

pub const DEFAULT_USER_AGENT: &str = "LinkCheckerBot/0.0.1";
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;

pub struct LinkClient {
    client: Client,
}

impl LinkClient {
    pub fn with_settings(timeout_secs: u64, user_agent: &str) -> Result<Self> {
        let client = Client::builder()
            .user_agent(user_agent)
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(timeout_secs.div_ceil(2)))
            .redirect(reqwest::redirect::Policy::limited(5))
            .build()?;

        Ok(Self { client })
    }

    /// Fetch the full link list from `endpoint`.
    ///
    /// The body must be a JSON array of objects. Non-2xx responses are
    /// reported as [`FetchError::Status`] rather than decoded.
    pub async fn fetch_links(&self, endpoint: &str) -> Result<Vec<LinkRecord>> {
        let url = Url::parse(endpoint)
            .map_err(|e| FetchError::InvalidEndpoint(format!("{}: {}", endpoint, e)))?;

        info!("Fetching link list from {}", url);

        let start = Instant::now();
        let response = self
            .client
            .get(url.clone())
            .header(ACCEPT, "application/json")
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }

        let body = response.text().await?;
        debug!(
            "Received {} bytes from {} in {:?}",
            body.len(),
            url,
            start.elapsed()
        );

        let links: Vec<LinkRecord> = serde_json::from_str(&body)?;
        info!("Decoded {} link records", links.len());

        Ok(links)
    }
}
