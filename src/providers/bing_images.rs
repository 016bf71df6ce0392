use anyhow::Result;
use async_trait::async_trait;
use scraper::Html;

use super::{selector, CoverProvider};
use crate::catalog::CatalogEntry;
use crate::session::Session;

/// Alternate image search for the retry pass; locates the first result-grid
/// thumbnail.
pub struct BingImages;

#[async_trait]
impl CoverProvider for BingImages {
    fn name(&self) -> &'static str {
        "bing-images"
    }

    async fn candidates(&self, session: &Session, entry: &CatalogEntry) -> Result<Vec<String>> {
        let query = format!("{} {} book cover", entry.title, entry.author);
        let url = format!(
            "https://www.bing.com/images/search?q={}&form=HDRSC2&first=1",
            urlencoding::encode(&query)
        );
        let html = session.fetch_page(&url).await?;
        Ok(first_grid_thumbnail(&html).into_iter().collect())
    }
}

fn first_grid_thumbnail(html: &str) -> Option<String> {
    let doc = Html::parse_document(html);
    let thumb = selector("img.mimg").ok()?;
    doc.select(&thumb)
        .filter_map(|img| img.value().attr("src"))
        .find(|src| src.starts_with("http"))
        .map(str::to_string)
}
