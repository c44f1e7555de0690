use crate::view::{FlatView, GroupedView, bind_flat, bind_grouped};
use indicatif::{ProgressBar, ProgressStyle};
use linkboard_fetch::error::Result;
use linkboard_fetch::{DEFAULT_TIMEOUT_SECS, DEFAULT_USER_AGENT, LinkClient, LinkRecord};
use std::time::Duration;
use tracing::info;
use url::Url;

pub const DEFAULT_ENDPOINT: &str = "http://localhost:8080/api/links/";

/// Options for a single load cycle
#[derive(Debug, Clone)]
pub struct LoadOptions {
    pub endpoint: String,
    pub timeout_secs: u64,
    pub user_agent: String,
    pub show_progress: bool,
}

impl Default for LoadOptions {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            user_agent: DEFAULT_USER_AGENT.to_string(),
            show_progress: false,
        }
    }
}

/// Extract the path component from a URL
pub fn extract_url_path(url: &str) -> String {
    Url::parse(url)
        .ok()
        .map(|u| {
            let path = u.path().to_string();
            if path.is_empty() || path == "/" {
                "/".to_string()
            } else {
                path
            }
        })
        .unwrap_or_else(|| url.to_string())
}

/// Fetch the link list and bind it to the grouped view.
pub async fn load_grouped_view(options: &LoadOptions) -> Result<GroupedView> {
    let links = fetch(options).await?;
    let view = bind_grouped(links);
    info!(
        "Bound {} links in {} groups to {}",
        view.links().len(),
        view.groups().len(),
        view.mount_point()
    );
    Ok(view)
}

/// Fetch the link list and bind it, unmodified, to the flat view.
pub async fn load_flat_view(options: &LoadOptions) -> Result<FlatView> {
    let links = fetch(options).await?;
    let view = bind_flat(links);
    info!("Bound {} links to {}", view.links().len(), view.mount_point());
    Ok(view)
}

async fn fetch(options: &LoadOptions) -> Result<Vec<LinkRecord>> {
    let client = LinkClient::with_settings(options.timeout_secs, &options.user_agent)?;

    let spinner = options.show_progress.then(|| {
        let pb = ProgressBar::new_spinner();
        if let Ok(style) = ProgressStyle::default_spinner().template("{spinner:.cyan} {msg}") {
            pb.set_style(style);
        }
        pb.enable_steady_tick(Duration::from_millis(100));
        pb.set_message(format!("Fetching {}", options.endpoint));
        pb
    });

    let result = client.fetch_links(&options.endpoint).await;

    if let Some(pb) = spinner {
        match &result {
            Ok(links) => pb.finish_with_message(format!("Fetched {} links", links.len())),
            Err(_) => pb.finish_and_clear(),
        }
    }

    result
}
