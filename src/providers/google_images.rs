use anyhow::Result;
use async_trait::async_trait;
use regex::Regex;
use scraper::Html;
use url::Url;

use super::{selector, CoverProvider};
use crate::catalog::CatalogEntry;
use crate::session::Session;

/// Hosts serving the engine's own chrome, icons and proxied thumbnails.
const ENGINE_HOSTS: [&str; 2] = ["google.com", "gstatic.com"];

/// Generic image search. Scans the result page's `img` elements and the raw
/// HTML for plausible cover URLs, skipping the engine's own assets and
/// anything declaring itself smaller than the configured minimum.
pub struct GoogleImages {
    min_dimension: u32,
}

impl GoogleImages {
    pub fn new(min_dimension: u32) -> Self {
        Self { min_dimension }
    }
}

#[async_trait]
impl CoverProvider for GoogleImages {
    fn name(&self) -> &'static str {
        "google-images"
    }

    async fn candidates(&self, session: &Session, entry: &CatalogEntry) -> Result<Vec<String>> {
        let query = format!("{} {} book cover", entry.title, entry.author);
        let url = format!(
            "https://www.google.com/search?q={}&tbm=isch",
            urlencoding::encode(&query)
        );
        let html = session.fetch_page(&url).await?;
        Ok(scan_for_image_urls(&html, self.min_dimension, &ENGINE_HOSTS))
    }
}

/// True when the URL does not parse or its host belongs to the engine.
pub(crate) fn is_engine_url(raw: &str, engine_hosts: &[&str]) -> bool {
    match Url::parse(raw) {
        Ok(u) => match u.host_str() {
            Some(host) => engine_hosts
                .iter()
                .any(|e| host == *e || host.ends_with(&format!(".{e}"))),
            None => true,
        },
        Err(_) => true,
    }
}

fn scan_for_image_urls(html: &str, min_dimension: u32, engine_hosts: &[&str]) -> Vec<String> {
    let mut urls: Vec<String> = Vec::new();

    let doc = Html::parse_document(html);
    if let Ok(imgs) = selector("img") {
        for img in doc.select(&imgs) {
            let value = img.value();
            if undersized(value.attr("width"), min_dimension)
                || undersized(value.attr("height"), min_dimension)
            {
                continue;
            }
            for attr in ["src", "data-src", "data-iurl"] {
                if let Some(candidate) = value.attr(attr) {
                    if candidate.starts_with("http") && !is_engine_url(candidate, engine_hosts) {
                        push_unique(&mut urls, candidate);
                    }
                }
            }
        }
    }

    // The results grid keeps most full-size URLs in inline script blobs, so
    // sweep the raw page for quoted absolute image URLs as well.
    if let Ok(re) = Regex::new(r#""(https?://[^"]+\.(?i:jpg|jpeg|png|gif|webp))""#) {
        for cap in re.captures_iter(html) {
            let candidate = &cap[1];
            if !is_engine_url(candidate, engine_hosts) {
                push_unique(&mut urls, candidate);
            }
        }
    }

    urls
}

/// A declared dimension below the minimum disqualifies the image; an absent
/// or non-numeric declaration does not.
fn undersized(attr: Option<&str>, min: u32) -> bool {
    matches!(attr.and_then(|a| a.parse::<u32>().ok()), Some(v) if v < min)
}

fn push_unique(urls: &mut Vec<String>, candidate: &str) {
    if !urls.iter().any(|u| u == candidate) {
        urls.push(candidate.to_string());
    }
}
