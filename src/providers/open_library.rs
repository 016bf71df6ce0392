use anyhow::Result;
use async_trait::async_trait;
use scraper::Html;

use super::{selector, CoverProvider};
use crate::catalog::CatalogEntry;
use crate::session::Session;

const ORIGIN: &str = "https://openlibrary.org";

/// Library catalog search, used as the last resort on the retry pass. Covers
/// here are canonical but served as small thumbnails, so known size suffixes
/// are upgraded before download.
pub struct OpenLibrary;

#[async_trait]
impl CoverProvider for OpenLibrary {
    fn name(&self) -> &'static str {
        "open-library"
    }

    async fn candidates(&self, session: &Session, entry: &CatalogEntry) -> Result<Vec<String>> {
        let query = format!("{} {}", entry.title, entry.author);
        let terms = query.split_whitespace().collect::<Vec<_>>().join("+");
        let url = format!("{ORIGIN}/search?q={terms}&mode=everything");
        let html = session.fetch_page(&url).await?;
        Ok(first_result_cover(&html).into_iter().collect())
    }
}

fn first_result_cover(html: &str) -> Option<String> {
    let doc = Html::parse_document(html);
    let cover = selector(".searchResultItem .cover img").ok()?;
    let src = doc
        .select(&cover)
        .filter_map(|img| img.value().attr("src"))
        .next()?;
    Some(upgrade_size_suffix(&absolutize(src)))
}

fn absolutize(src: &str) -> String {
    if src.starts_with("//") {
        format!("https:{src}")
    } else if src.starts_with('/') {
        format!("{ORIGIN}{src}")
    } else {
        src.to_string()
    }
}

/// Covers are published with -S/-M/-L size suffixes; prefer the large one.
fn upgrade_size_suffix(url: &str) -> String {
    url.replace("-S.jpg", "-L.jpg").replace("-M.jpg", "-L.jpg")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn relative_covers_are_absolutized_and_upgraded() {
        let html = r#"
            <li class="searchResultItem">
                <span class="cover"><img src="/covers/b/id/12345-M.jpg"></span>
            </li>"#;
        assert_eq!(
            first_result_cover(html).as_deref(),
            Some("https://openlibrary.org/covers/b/id/12345-L.jpg")
        );
    }

    #[test]
    fn protocol_relative_covers_keep_their_host() {
        let html = r#"
            <li class="searchResultItem">
                <span class="cover"><img src="//covers.openlibrary.org/b/id/9-S.jpg"></span>
            </li>"#;
        assert_eq!(
            first_result_cover(html).as_deref(),
            Some("https://covers.openlibrary.org/b/id/9-L.jpg")
        );
    }

    #[test]
    fn large_covers_pass_through_unchanged() {
        assert_eq!(
            upgrade_size_suffix("https://covers.openlibrary.org/b/id/9-L.jpg"),
            "https://covers.openlibrary.org/b/id/9-L.jpg"
        );
    }

    #[test]
    fn pages_without_results_are_a_miss() {
        assert!(first_result_cover("<html><body>No hits</body></html>").is_none());
    }
}
