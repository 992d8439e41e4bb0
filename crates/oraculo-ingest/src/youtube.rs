//! YouTube transcript loader.
//!
//! No official transcript API: we fetch the watch page, locate the
//! caption track list embedded in the player config, pick the track
//! for the configured language, and fetch its timedtext XML.

use regex::Regex;
use tracing::debug;

use crate::IngestError;

const WATCH_URL: &str = "https://www.youtube.com/watch";

/// Transcript loader with a fixed caption language (default `pt`).
pub struct YoutubeLoader {
    http: reqwest::Client,
    language: String,
}

impl YoutubeLoader {
    pub fn new(language: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::builder()
                .connect_timeout(std::time::Duration::from_secs(10))
                .timeout(std::time::Duration::from_secs(30))
                .build()
                .expect("failed to build HTTP client"),
            language: language.into(),
        }
    }

    /// Load the transcript for a video URL or bare video id.
    pub async fn load(&self, source: &str) -> Result<String, IngestError> {
        let video_id = parse_video_id(source)
            .ok_or_else(|| IngestError::Parse(format!("not a YouTube video: {source}")))?;

        debug!(%video_id, language = %self.language, "fetching YouTube transcript");

        let page = self
            .http
            .get(WATCH_URL)
            .query(&[("v", video_id.as_str())])
            .send()
            .await
            .map_err(|e| IngestError::Http(e.to_string()))?
            .text()
            .await
            .map_err(|e| IngestError::Http(e.to_string()))?;

        let caption_url = extract_caption_url(&page, &self.language).ok_or_else(|| {
            IngestError::TranscriptUnavailable {
                video_id: video_id.clone(),
                language: self.language.clone(),
            }
        })?;

        let xml = self
            .http
            .get(&caption_url)
            .send()
            .await
            .map_err(|e| IngestError::Http(e.to_string()))?
            .text()
            .await
            .map_err(|e| IngestError::Http(e.to_string()))?;

        Ok(parse_transcript_xml(&xml))
    }
}

impl Default for YoutubeLoader {
    fn default() -> Self {
        Self::new("pt")
    }
}

/// Accepts a bare video id, a `watch?v=` URL, or a `youtu.be` short link.
pub fn parse_video_id(source: &str) -> Option<String> {
    let trimmed = source.trim();
    if trimmed.is_empty() {
        return None;
    }

    // Bare 11-char id
    let id_re = Regex::new(r"^[A-Za-z0-9_-]{11}$").expect("static regex");
    if id_re.is_match(trimmed) {
        return Some(trimmed.to_string());
    }

    let url_re =
        Regex::new(r"(?:youtube\.com/watch\?(?:.*&)?v=|youtu\.be/|youtube\.com/shorts/)([A-Za-z0-9_-]{11})")
            .expect("static regex");
    url_re
        .captures(trimmed)
        .map(|caps| caps[1].to_string())
}

/// Find the timedtext URL for `lang` in the watch page's caption track
/// list (`"captionTracks":[{"baseUrl":"...","languageCode":"pt"},...]`).
///
/// Track objects nest further objects (`"name":{...}`), so each track
/// is delimited by its `"baseUrl"` key rather than by brace matching.
pub(crate) fn extract_caption_url(page: &str, lang: &str) -> Option<String> {
    let start = page.find("\"captionTracks\":")?;
    let section = &page[start..];
    let section = &section[..section.find(']').unwrap_or(section.len())];

    let base_re = Regex::new(r#""baseUrl":"([^"]+)""#).expect("static regex");
    let lang_re = Regex::new(r#""languageCode":"([^"]+)""#).expect("static regex");

    let tracks: Vec<(usize, String)> = base_re
        .captures_iter(section)
        .map(|caps| {
            let offset = caps.get(0).map(|m| m.start()).unwrap_or(0);
            (offset, caps[1].replace("\\u0026", "&"))
        })
        .collect();

    for (idx, (offset, url)) in tracks.iter().enumerate() {
        let end = tracks
            .get(idx + 1)
            .map(|(next, _)| *next)
            .unwrap_or(section.len());
        let track = &section[*offset..end];

        if let Some(caps) = lang_re.captures(track) {
            let code = &caps[1];
            if code == lang || code.starts_with(&format!("{lang}-")) {
                return Some(url.clone());
            }
        }
    }
    None
}

/// Flatten timedtext XML (`<text start="..">fragment</text>` elements)
/// into plain text fragments joined with blank lines.
pub(crate) fn parse_transcript_xml(xml: &str) -> String {
    let text_re = Regex::new(r"<text[^>]*>([\s\S]*?)</text>").expect("static regex");

    let fragments: Vec<String> = text_re
        .captures_iter(xml)
        .map(|caps| unescape(&caps[1]))
        .filter(|fragment| !fragment.trim().is_empty())
        .collect();

    fragments.join("\n\n")
}

fn unescape(text: &str) -> String {
    text.replace("&amp;", "&")
        .replace("&#39;", "'")
        .replace("&quot;", "\"")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .trim()
        .to_string()
}
