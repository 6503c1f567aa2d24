//! Online DOI reachability
//!
//! Asks the DOI resolver whether a DOI is registered. A `404` means the DOI
//! does not exist; any other response counts as registered.

use std::time::Duration;

use super::validators::normalize_doi;

/// Errors from the online check that say nothing about the DOI itself
#[derive(Debug, thiserror::Error)]
pub enum OnlineCheckError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
}

/// Blocking DOI resolver client
pub struct DoiResolverClient {
    client: reqwest::blocking::Client,
    base_url: String,
}

impl DoiResolverClient {
    pub fn new() -> Result<Self, OnlineCheckError> {
        Self::with_base_url("https://doi.org/")
    }

    pub fn with_base_url(base_url: impl Into<String>) -> Result<Self, OnlineCheckError> {
        let client = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(10))
            .redirect(reqwest::redirect::Policy::none())
            .build()?;
        Ok(Self {
            client,
            base_url: base_url.into(),
        })
    }

    /// Whether the resolver knows the DOI
    pub fn is_registered(&self, doi: &str) -> Result<bool, OnlineCheckError> {
        let url = format!("{}{}", self.base_url, normalize_doi(doi));
        let response = self.client.head(url).send()?;
        Ok(response.status() != reqwest::StatusCode::NOT_FOUND)
    }
}
