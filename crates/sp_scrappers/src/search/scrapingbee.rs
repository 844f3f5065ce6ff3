use std::fmt;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use scraper::{Html, Selector};
use sp_core::{Error, Language, Result, SearchProvider, SearchResult, Stage};
use url::Url;

use crate::content::scrapingbee::SCRAPINGBEE_API_URL;
use crate::http::{build_client, ensure_success};

/// Google results page fetched through the ScrapingBee proxy and parsed
/// from HTML.
pub struct ScrapingBeeSearch {
    client: Client,
    api_key: String,
    results: usize,
    language: Language,
    label: String,
}

impl ScrapingBeeSearch {
    pub fn new(api_key: String, results: usize, language: Language, timeout: Duration) -> Result<Self> {
        let results = results.max(1);
        Ok(Self {
            client: build_client(timeout)?,
            api_key,
            results,
            language,
            label: format!("scrapingbee-serp:{}:{}", language.code(), results),
        })
    }

    fn google_url(&self, keyword: &str) -> Result<Url> {
        let num = self.results.to_string();
        Url::parse_with_params(
            "https://www.google.com/search",
            &[
                ("q", keyword),
                ("num", num.as_str()),
                ("hl", self.language.code()),
                ("gl", self.language.country()),
            ],
        )
        .map_err(|e| Error::upstream(Stage::Search, format!("invalid search URL: {}", e)))
    }
}

impl fmt::Debug for ScrapingBeeSearch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ScrapingBeeSearch")
            .field("api_key", &"<redacted>")
            .field("results", &self.results)
            .finish()
    }
}

/// Resolves Google's `/url?q=` redirect links and drops links back into
/// Google itself.
fn resolve_link(href: &str) -> Option<String> {
    let url = if href.starts_with('/') {
        Url::parse("https://www.google.com").ok()?.join(href).ok()?
    } else {
        Url::parse(href).ok()?
    };

    let url = if url.path() == "/url" && url.host_str().map_or(false, |h| h.contains("google.")) {
        let target = url.query_pairs().find(|(k, _)| k == "q" || k == "url")?.1.into_owned();
        Url::parse(&target).ok()?
    } else {
        url
    };

    let host = url.host_str()?;
    if !matches!(url.scheme(), "http" | "https") || host.contains("google.") {
        return None;
    }
    Some(url.to_string())
}

/// Organic results from a Google results page, in page order, without
/// duplicates.
pub fn parse_serp(html: &str, limit: usize) -> Vec<SearchResult> {
    let document = Html::parse_document(html);
    let (Ok(links), Ok(heading)) = (Selector::parse("a[href]"), Selector::parse("h3")) else {
        return Vec::new();
    };

    let mut results: Vec<SearchResult> = Vec::new();
    for link in document.select(&links) {
        let Some(title) = link.select(&heading).next() else {
            continue;
        };
        let Some(url) = link.value().attr("href").and_then(resolve_link) else {
            continue;
        };
        if results.iter().any(|r| r.url == url) {
            continue;
        }
        let title = title.text().collect::<String>();
        let title = title.split_whitespace().collect::<Vec<_>>().join(" ");
        results.push(SearchResult::new(title, url));
        if results.len() >= limit {
            break;
        }
    }
    results
}

#[async_trait]
impl SearchProvider for ScrapingBeeSearch {
    fn name(&self) -> &str {
        &self.label
    }

    async fn search(&self, keyword: &str) -> Result<Vec<SearchResult>> {
        let google_url = self.google_url(keyword)?;
        let response = self
            .client
            .get(SCRAPINGBEE_API_URL)
            .query(&[
                ("api_key", self.api_key.as_str()),
                ("url", google_url.as_str()),
                ("custom_google", "true"),
                ("render_js", "false"),
            ])
            .send()
            .await?;
        let html = ensure_success(response, Stage::Search, "ScrapingBee").await?.text().await?;
        Ok(parse_serp(&html, self.results))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SERP: &str = r#"
        <html><body>
          <div id="search">
            <div class="g"><a href="https://a.pl/buty"><h3>Jak dbać o buty</h3></a></div>
            <div class="g"><a href="/url?q=https://b.pl/pasta&amp;sa=U"><h3>Pasta <b>do butów</b></h3></a></div>
            <div class="g"><a href="https://a.pl/buty"><h3>Duplicate</h3></a></div>
            <div><a href="https://www.google.com/search?q=more"><h3>More results</h3></a></div>
            <div><a href="https://c.pl/no-heading">Plain link</a></div>
            <div class="g"><a href="https://d.pl/x"><h3>Fourth</h3></a></div>
          </div>
        </body></html>"#;

    #[test]
    fn test_parse_serp() {
        let results = parse_serp(SERP, 10);
        let urls: Vec<_> = results.iter().map(|r| r.url.as_str()).collect();
        assert_eq!(urls, vec!["https://a.pl/buty", "https://b.pl/pasta", "https://d.pl/x"]);
        assert_eq!(results[1].title, "Pasta do butów");
    }

    #[test]
    fn test_parse_serp_limit() {
        assert_eq!(parse_serp(SERP, 1).len(), 1);
        assert!(parse_serp("<html></html>", 10).is_empty());
    }

    #[test]
    fn test_google_url_is_encoded() {
        let search = ScrapingBeeSearch::new("k".into(), 10, Language::Pl, Duration::from_secs(1)).unwrap();
        let url = search.google_url("jak dbać o buty").unwrap();
        assert!(url.as_str().starts_with("https://www.google.com/search?q=jak+dba%C4%87+o+buty"));
        assert!(url.as_str().contains("hl=pl"));
    }
}
