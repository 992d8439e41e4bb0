//! Website loader — fetch a page, extract its text, retry on failure.
//!
//! Fetches rotate a random browser user-agent per attempt, since some
//! sites serve bot traffic a JavaScript-challenge page instead of
//! content. Challenge pages and transport errors are both retryable
//! but logged distinctly.

use async_trait::async_trait;
use scraper::{Html, Selector};
use tracing::warn;

use crate::retry::RetryPolicy;
use crate::IngestError;

/// Browser user-agent strings rotated across fetch attempts.
const USER_AGENTS: &[&str] = &[
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/126.0.0.0 Safari/537.36",
    "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/125.0.0.0 Safari/537.36",
    "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/124.0.0.0 Safari/537.36",
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64; rv:127.0) Gecko/20100101 Firefox/127.0",
    "Mozilla/5.0 (Macintosh; Intel Mac OS X 10.15; rv:126.0) Gecko/20100101 Firefox/126.0",
    "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/605.1.15 (KHTML, like Gecko) Version/17.4 Safari/605.1.15",
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/126.0.0.0 Safari/537.36 Edg/126.0.0.0",
];

fn random_user_agent() -> &'static str {
    let idx = rand::random::<usize>() % USER_AGENTS.len();
    USER_AGENTS[idx]
}

/// Fetches raw HTML for a URL. Pluggable so the retry loop can be
/// tested without a network.
#[async_trait]
pub trait PageFetcher: Send + Sync {
    async fn fetch(&self, url: &str, user_agent: &str) -> Result<String, IngestError>;
}

/// reqwest-backed fetcher used in production.
pub struct HttpPageFetcher {
    http: reqwest::Client,
}

impl HttpPageFetcher {
    pub fn new() -> Self {
        Self {
            http: reqwest::Client::builder()
                .connect_timeout(std::time::Duration::from_secs(10))
                .timeout(std::time::Duration::from_secs(30))
                .build()
                .expect("failed to build HTTP client"),
        }
    }
}

impl Default for HttpPageFetcher {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl PageFetcher for HttpPageFetcher {
    async fn fetch(&self, url: &str, user_agent: &str) -> Result<String, IngestError> {
        let response = self
            .http
            .get(url)
            .header(reqwest::header::USER_AGENT, user_agent)
            .send()
            .await
            .map_err(|e| IngestError::Http(e.to_string()))?;

        if !response.status().is_success() {
            return Err(IngestError::Http(format!("HTTP {}", response.status())));
        }

        response
            .text()
            .await
            .map_err(|e| IngestError::Http(e.to_string()))
    }
}

/// Extract readable text fragments from an HTML page, joined with
/// blank lines.
pub fn extract_text(html: &str) -> String {
    let document = Html::parse_document(html);
    let selector = Selector::parse("title, h1, h2, h3, h4, h5, h6, p, li, td, th, blockquote, pre")
        .expect("static selector");

    let mut fragments: Vec<String> = Vec::new();
    for element in document.select(&selector) {
        let text = element
            .text()
            .collect::<Vec<_>>()
            .join(" ")
            .split_whitespace()
            .collect::<Vec<_>>()
            .join(" ");
        if !text.is_empty() {
            fragments.push(text);
        }
    }
    fragments.join("\n\n")
}

/// Whether extracted text looks like a bot-detection challenge page
/// rather than real content.
pub fn is_challenge_page(text: &str) -> bool {
    let lower = text.to_lowercase();
    lower.contains("just a moment")
        || lower.contains("enable javascript and cookies")
        || lower.contains("checking your browser")
}

/// Site loader with retry over a pluggable fetcher.
pub struct SiteLoader<F = HttpPageFetcher> {
    fetcher: F,
    policy: RetryPolicy,
}

impl SiteLoader<HttpPageFetcher> {
    pub fn new(policy: RetryPolicy) -> Self {
        Self {
            fetcher: HttpPageFetcher::new(),
            policy,
        }
    }
}

impl<F: PageFetcher> SiteLoader<F> {
    pub fn with_fetcher(fetcher: F, policy: RetryPolicy) -> Self {
        Self { fetcher, policy }
    }

    /// Fetch and extract a page's text, stopping on the first
    /// non-blank, non-challenge result.
    pub async fn load(&self, url: &str) -> Result<String, IngestError> {
        for attempt in 1..=self.policy.max_attempts {
            let user_agent = random_user_agent();
            match self.fetcher.fetch(url, user_agent).await {
                Ok(html) => {
                    let text = extract_text(&html);
                    if is_challenge_page(&text) {
                        warn!(url, attempt, "site returned a JavaScript challenge page");
                    } else if !text.trim().is_empty() {
                        return Ok(text);
                    } else {
                        warn!(url, attempt, "site returned no extractable content");
                    }
                }
                Err(e) => {
                    warn!(url, attempt, error = %e, "site fetch failed");
                }
            }

            if attempt < self.policy.max_attempts {
                tokio::time::sleep(self.policy.delay_for(attempt)).await;
            }
        }

        Err(IngestError::SiteExhausted {
            attempts: self.policy.max_attempts,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};

    /// Fails (or serves a challenge page) until a configured attempt.
    struct FlakyFetcher {
        calls: AtomicU32,
        succeed_on: u32,
        challenge: bool,
    }

    #[async_trait]
    impl PageFetcher for FlakyFetcher {
        async fn fetch(&self, _url: &str, _user_agent: &str) -> Result<String, IngestError> {
            let call = self.calls.fetch_add(1, Ordering::SeqCst) + 1;
            if call >= self.succeed_on {
                return Ok("<html><body><p>conteúdo real da página</p></body></html>".into());
            }
            if self.challenge {
                Ok("<html><body><p>Just a moment...</p><p>Enable JavaScript and cookies to continue</p></body></html>".into())
            } else {
                Err(IngestError::Http("connection reset".into()))
            }
        }
    }

    #[tokio::test]
    async fn succeeds_on_third_attempt_and_stops() {
        let fetcher = FlakyFetcher {
            calls: AtomicU32::new(0),
            succeed_on: 3,
            challenge: false,
        };
        let loader = SiteLoader::with_fetcher(fetcher, RetryPolicy::immediate(5));

        let text = loader.load("https://example.com").await.unwrap();
        assert!(text.contains("conteúdo real"));
        assert_eq!(loader.fetcher.calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn challenge_pages_are_retried() {
        let fetcher = FlakyFetcher {
            calls: AtomicU32::new(0),
            succeed_on: 2,
            challenge: true,
        };
        let loader = SiteLoader::with_fetcher(fetcher, RetryPolicy::immediate(5));

        let text = loader.load("https://example.com").await.unwrap();
        assert!(text.contains("conteúdo real"));
        assert_eq!(loader.fetcher.calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn exhausted_retries_reports_attempt_count() {
        let fetcher = FlakyFetcher {
            calls: AtomicU32::new(0),
            succeed_on: u32::MAX,
            challenge: false,
        };
        let loader = SiteLoader::with_fetcher(fetcher, RetryPolicy::immediate(5));

        let err = loader.load("https://example.com").await.unwrap_err();
        assert!(matches!(err, IngestError::SiteExhausted { attempts: 5 }));
        assert_eq!(loader.fetcher.calls.load(Ordering::SeqCst), 5);
    }

    #[test]
    fn extract_text_joins_fragments() {
        let html = "<html><head><title>Título</title></head>\
                    <body><h1>Seção</h1><p>um   parágrafo</p><script>ignored()</script></body></html>";
        let text = extract_text(html);
        assert_eq!(text, "Título\n\nSeção\n\num parágrafo");
    }

    #[test]
    fn challenge_detection_is_case_insensitive() {
        assert!(is_challenge_page("JUST A MOMENT..."));
        assert!(is_challenge_page("please Enable JavaScript and Cookies to continue"));
        assert!(!is_challenge_page("conteúdo normal"));
    }

    #[tokio::test]
    async fn http_fetcher_maps_status_errors() {
        use httpmock::prelude::*;

        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/page");
                then.status(503);
            })
            .await;

        let fetcher = HttpPageFetcher::new();
        let err = fetcher
            .fetch(&server.url("/page"), USER_AGENTS[0])
            .await
            .unwrap_err();
        assert!(matches!(err, IngestError::Http(_)));
    }

    #[tokio::test]
    async fn http_fetcher_sends_user_agent() {
        use httpmock::prelude::*;

        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(GET).path("/page").header("user-agent", USER_AGENTS[0]);
                then.status(200).body("<html><body><p>olá</p></body></html>");
            })
            .await;

        let fetcher = HttpPageFetcher::new();
        let html = fetcher
            .fetch(&server.url("/page"), USER_AGENTS[0])
            .await
            .unwrap();

        mock.assert_async().await;
        assert_eq!(extract_text(&html), "olá");
    }
}
