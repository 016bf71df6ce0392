use anyhow::Result;
use async_trait::async_trait;
use scraper::Html;

use super::{selector, CoverProvider};
use crate::catalog::CatalogEntry;
use crate::session::Session;

/// Marketplace search. For book queries the first listing's thumbnail is the
/// storefront cover.
pub struct Amazon;

#[async_trait]
impl CoverProvider for Amazon {
    fn name(&self) -> &'static str {
        "amazon"
    }

    async fn candidates(&self, session: &Session, entry: &CatalogEntry) -> Result<Vec<String>> {
        let query = format!("{} {} book", entry.title, entry.author);
        let url = format!("https://www.amazon.com/s?k={}", urlencoding::encode(&query));
        let html = session.fetch_page(&url).await?;
        Ok(first_listing_thumbnail(&html).into_iter().collect())
    }
}

fn first_listing_thumbnail(html: &str) -> Option<String> {
    let doc = Html::parse_document(html);
    let thumb = selector("img.s-image").ok()?;
    doc.select(&thumb)
        .filter_map(|img| img.value().attr("src"))
        .find(|src| src.starts_with("http"))
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn picks_the_first_absolute_thumbnail() {
        let html = r#"
            <div class="s-result-item">
                <img class="s-image" src="data:image/gif;base64,R0lGOD">
                <img class="s-image" src="https://m.media.example/I/81abc.jpg">
                <img class="s-image" src="https://m.media.example/I/92def.jpg">
            </div>"#;
        assert_eq!(
            first_listing_thumbnail(html).as_deref(),
            Some("https://m.media.example/I/81abc.jpg")
        );
    }

    #[test]
    fn no_listing_images_is_a_miss() {
        let html = "<html><body><img src=\"https://x.example/logo.png\"></body></html>";
        assert!(first_listing_thumbnail(html).is_none());
    }
}
