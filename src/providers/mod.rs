mod amazon;
mod bing_images;
mod google_images;
mod open_library;

pub use amazon::Amazon;
pub use bing_images::BingImages;
pub use google_images::GoogleImages;
pub use open_library::OpenLibrary;

use anyhow::{anyhow, Result};
use async_trait::async_trait;

use crate::catalog::CatalogEntry;
use crate::config::FetchConfig;
use crate::session::Session;

/// One third-party search source plus the strategy for extracting candidate
/// cover URLs from its results page.
///
/// Providers are best-effort: an empty list is a miss, not an error, and
/// extraction heuristics are allowed to change as the sites do. The pipeline
/// only relies on the first candidate being the most plausible one.
#[async_trait]
pub trait CoverProvider: Send + Sync {
    fn name(&self) -> &'static str;

    /// Query the source for an entry and return ranked candidate image URLs.
    async fn candidates(&self, session: &Session, entry: &CatalogEntry) -> Result<Vec<String>>;
}

/// Provider order for the primary pass.
pub fn primary_chain(config: &FetchConfig) -> Vec<Box<dyn CoverProvider>> {
    vec![
        Box::new(Amazon),
        Box::new(GoogleImages::new(config.min_image_dimension)),
    ]
}

/// Alternate order used by the retry pass over the failure set.
pub fn retry_chain() -> Vec<Box<dyn CoverProvider>> {
    vec![Box::new(BingImages), Box::new(OpenLibrary)]
}

pub(crate) fn selector(css: &str) -> Result<scraper::Selector> {
    scraper::Selector::parse(css).map_err(|e| anyhow!("invalid selector {css}: {e}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn chains_are_ordered_as_documented() {
        let primary = primary_chain(&FetchConfig::default());
        let names: Vec<_> = primary.iter().map(|p| p.name()).collect();
        assert_eq!(names, ["amazon", "google-images"]);

        let retry = retry_chain();
        let names: Vec<_> = retry.iter().map(|p| p.name()).collect();
        assert_eq!(names, ["bing-images", "open-library"]);
    }
}
