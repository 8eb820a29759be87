//! Page fetching for multi-page article stitching.

#[cfg(feature = "fetch")]
use crate::error::{PerlegoError, Result};

/// Supplies page content to the multi-page stitcher.
///
/// Returning `None` (or empty content) marks the fetch as failed; the
/// stitcher stops following next-page links at that point instead of
/// erroring.
pub trait Fetcher {
    fn fetch(&self, url: &str) -> Option<String>;
}

/// Configuration for [`HttpFetcher`].
#[cfg(feature = "fetch")]
#[derive(Debug, Clone)]
pub struct FetchConfig {
    /// Request timeout in seconds.
    pub timeout_secs: u64,
    /// User-Agent header sent with requests.
    pub user_agent: String,
}

#[cfg(feature = "fetch")]
impl Default for FetchConfig {
    fn default() -> Self {
        FetchConfig {
            timeout_secs: 30,
            user_agent: format!("perlego/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

/// Blocking HTTP fetcher backed by reqwest.
#[cfg(feature = "fetch")]
#[derive(Debug, Clone, Default)]
pub struct HttpFetcher {
    config: FetchConfig,
}

#[cfg(feature = "fetch")]
impl HttpFetcher {
    pub fn new(config: FetchConfig) -> Self {
        HttpFetcher { config }
    }

    /// Fetches a page, surfacing URL and HTTP errors.
    pub fn try_fetch(&self, url: &str) -> Result<String> {
        url::Url::parse(url).map_err(|e| PerlegoError::InvalidUrl(format!("{url}: {e}")))?;
        let client = reqwest::blocking::Client::builder()
            .timeout(std::time::Duration::from_secs(self.config.timeout_secs))
            .user_agent(&self.config.user_agent)
            .build()?;
        let response = client.get(url).send()?.error_for_status()?;
        Ok(response.text()?)
    }
}

#[cfg(feature = "fetch")]
impl Fetcher for HttpFetcher {
    fn fetch(&self, url: &str) -> Option<String> {
        self.try_fetch(url).ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[cfg(feature = "fetch")]
    #[test]
    fn test_default_config() {
        let config = FetchConfig::default();
        assert_eq!(config.timeout_secs, 30);
        assert!(config.user_agent.starts_with("perlego/"));
    }

    #[cfg(feature = "fetch")]
    #[test]
    fn test_try_fetch_rejects_invalid_url() {
        let fetcher = HttpFetcher::default();
        let err = fetcher.try_fetch("not a url").unwrap_err();
        assert!(matches!(err, PerlegoError::InvalidUrl(_)));
    }

    struct CannedFetcher(&'static str);

    impl Fetcher for CannedFetcher {
        fn fetch(&self, _url: &str) -> Option<String> {
            Some(self.0.to_string())
        }
    }

    #[test]
    fn test_trait_object_usage() {
        let fetcher: Box<dyn Fetcher> = Box::new(CannedFetcher("<html></html>"));
        assert_eq!(fetcher.fetch("http://x").as_deref(), Some("<html></html>"));
    }
}
