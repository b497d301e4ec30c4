use std::time::Duration;

use anyhow::{anyhow, Context, Result};
use reqwest::blocking::Client;
use tracing::{info, warn};

use crate::config::VendorConfig;
use crate::model::series::{DailySeries, SeriesKind, SeriesLookup};
use crate::repository::file::{read_series_csv, FileSeriesProvider};

const REQUEST_TIMEOUT: Duration = Duration::from_secs(60);
const API_KEY_PLACEHOLDER: &str = "{api_key}";

/// Pulls the daily CSV datasets from the data vendor.
pub struct VendorDownloader {
    client: Client,
    vendor: VendorConfig,
    api_key: String,
}

impl VendorDownloader {
    pub fn new(vendor: VendorConfig, api_key: impl Into<String>) -> Result<Self> {
        let api_key = api_key.into();
        if api_key.trim().is_empty() {
            return Err(anyhow!("An API key is required to download series"));
        }
        let client = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .context("Could not build HTTP client")?;
        Ok(Self {
            client,
            vendor,
            api_key,
        })
    }

    pub fn url_for(&self, kind: SeriesKind) -> String {
        let template = match kind {
            SeriesKind::Difficulty => &self.vendor.difficulty_url,
            SeriesKind::Price => &self.vendor.price_url,
        };
        if !template.contains(API_KEY_PLACEHOLDER) {
            warn!(%kind, "Vendor URL has no {} placeholder", API_KEY_PLACEHOLDER);
        }
        template.replace(API_KEY_PLACEHOLDER, &self.api_key)
    }

    /// Fetches one series. The request URL carries the API key, so it is
    /// stripped from every transport error before it reaches the caller.
    pub fn download(&self, kind: SeriesKind) -> Result<DailySeries> {
        let url = self.url_for(kind);
        let response = self
            .client
            .get(&url)
            .send()
            .map_err(|e| e.without_url())
            .with_context(|| format!("Request for {} series failed", kind))?
            .error_for_status()
            .map_err(|e| e.without_url())
            .with_context(|| format!("Vendor rejected the {} request", kind))?;
        let body = response
            .bytes()
            .map_err(|e| e.without_url())
            .with_context(|| format!("Could not read the {} response", kind))?;
        read_series_csv(kind, &body[..])
            .with_context(|| format!("Vendor returned an unreadable {} series", kind))
    }

    /// Downloads both series and replaces the local cache. Nothing is
    /// written unless both downloads parse, and no cached file is replaced
    /// unless both new files were written.
    pub fn refresh(&self, store: &FileSeriesProvider) -> Result<Vec<DailySeries>> {
        let downloaded = SeriesKind::ALL
            .iter()
            .map(|kind| self.download(*kind))
            .collect::<Result<Vec<_>>>()?;
        let paths = store.store_all(&downloaded)?;
        for (series, path) in downloaded.iter().zip(&paths) {
            info!(
                kind = %series.kind(),
                points = series.len(),
                path = %path.display(),
                "Stored downloaded series"
            );
        }
        Ok(downloaded)
    }
}
