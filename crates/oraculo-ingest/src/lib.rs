//! Document ingestion for Oráculo.
//!
//! Turns a user-selected source (website, YouTube video, or an
//! uploaded CSV/PDF/TXT file) into one text blob that gets embedded
//! into the chat system prompt. Loading never panics and never leaks
//! an error across the dispatch boundary: every call produces a
//! `LoadOutcome`.

pub mod files;
pub mod retry;
pub mod site;
pub mod url;
pub mod youtube;

use std::fmt;
use std::str::FromStr;

use tracing::warn;

use oraculo_common::ConfigError;

pub use retry::RetryPolicy;
pub use site::SiteLoader;
pub use url::normalize_url;
pub use youtube::YoutubeLoader;

/// The five supported document kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FileType {
    Site,
    Youtube,
    Csv,
    Pdf,
    Txt,
}

impl FileType {
    pub const ALL: [FileType; 5] = [
        FileType::Site,
        FileType::Youtube,
        FileType::Csv,
        FileType::Pdf,
        FileType::Txt,
    ];

    /// Display label, as shown in selectors and the system prompt.
    pub fn label(&self) -> &'static str {
        match self {
            FileType::Site => "Site",
            FileType::Youtube => "Youtube",
            FileType::Csv => "CSV",
            FileType::Pdf => "PDF",
            FileType::Txt => "TXT",
        }
    }

    /// File extension for uploaded sources.
    pub fn extension(&self) -> &'static str {
        match self {
            FileType::Site => "html",
            FileType::Youtube => "",
            FileType::Csv => "csv",
            FileType::Pdf => "pdf",
            FileType::Txt => "txt",
        }
    }

    /// Whether this kind takes a URL (vs an uploaded file).
    pub fn is_url_based(&self) -> bool {
        matches!(self, FileType::Site | FileType::Youtube)
    }
}

impl fmt::Display for FileType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for FileType {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "site" => Ok(FileType::Site),
            "youtube" => Ok(FileType::Youtube),
            "csv" => Ok(FileType::Csv),
            "pdf" => Ok(FileType::Pdf),
            "txt" => Ok(FileType::Txt),
            other => Err(ConfigError::UnknownFileType(other.to_string())),
        }
    }
}

/// Where the document comes from: a URL or an uploaded file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DocumentSource {
    Url(String),
    Upload { filename: String, bytes: Vec<u8> },
}

impl DocumentSource {
    /// Shape marker used in the reconciliation key.
    pub fn kind(&self) -> &'static str {
        match self {
            DocumentSource::Url(_) => "url",
            DocumentSource::Upload { .. } => "upload",
        }
    }

    pub fn url_str(&self) -> Option<&str> {
        match self {
            DocumentSource::Url(url) => Some(url),
            DocumentSource::Upload { .. } => None,
        }
    }

    pub fn is_empty(&self) -> bool {
        match self {
            DocumentSource::Url(url) => url.trim().is_empty(),
            DocumentSource::Upload { bytes, .. } => bytes.is_empty(),
        }
    }
}

/// Result of a document load. Callers decide how to surface each case
/// instead of every failure collapsing to an empty string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadOutcome {
    /// Document loaded with non-blank text.
    Loaded(String),
    /// No source given, or the source produced no text.
    Empty,
    /// Loading failed; the reason is user-presentable.
    Failed(String),
}

impl LoadOutcome {
    /// The document text, empty for `Empty` and `Failed`.
    pub fn text(&self) -> &str {
        match self {
            LoadOutcome::Loaded(text) => text,
            LoadOutcome::Empty | LoadOutcome::Failed(_) => "",
        }
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, LoadOutcome::Failed(_))
    }
}

#[derive(Debug, thiserror::Error)]
pub enum IngestError {
    #[error("http error: {0}")]
    Http(String),

    #[error("parse error: {0}")]
    Parse(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("site produced no content after {attempts} attempts")]
    SiteExhausted { attempts: u32 },

    #[error("no transcript in language '{language}' for video {video_id}")]
    TranscriptUnavailable { video_id: String, language: String },
}

/// Dispatches a (file type, source) pair to the right loader.
pub struct DocumentLoader {
    site: SiteLoader,
    youtube: YoutubeLoader,
}

impl DocumentLoader {
    pub fn new(policy: RetryPolicy) -> Self {
        Self {
            site: SiteLoader::new(policy),
            youtube: YoutubeLoader::default(),
        }
    }

    /// Load a document. Total over all inputs: any internal error is
    /// converted to `LoadOutcome::Failed`.
    pub async fn load(&self, file_type: FileType, source: &DocumentSource) -> LoadOutcome {
        if source.is_empty() {
            return LoadOutcome::Empty;
        }

        let result = match (file_type, source) {
            (FileType::Site, DocumentSource::Url(url)) => self.site.load(url).await,
            (FileType::Youtube, DocumentSource::Url(url)) => self.youtube.load(url).await,
            (FileType::Csv, DocumentSource::Upload { bytes, .. }) => files::load_csv(bytes),
            (FileType::Pdf, DocumentSource::Upload { bytes, .. }) => files::load_pdf(bytes),
            (FileType::Txt, DocumentSource::Upload { bytes, .. }) => files::load_txt(bytes),
            (file_type, source) => {
                return LoadOutcome::Failed(format!(
                    "{} expects a {} source, got {}",
                    file_type.label(),
                    if file_type.is_url_based() { "URL" } else { "file" },
                    source.kind(),
                ));
            }
        };

        match result {
            Ok(text) if text.trim().is_empty() => LoadOutcome::Empty,
            Ok(text) => LoadOutcome::Loaded(text),
            Err(e) => {
                warn!(file_type = %file_type, error = %e, "document load failed");
                LoadOutcome::Failed(e.to_string())
            }
        }
    }
}

impl Default for DocumentLoader {
    fn default() -> Self {
        Self::new(RetryPolicy::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn upload(bytes: &[u8]) -> DocumentSource {
        DocumentSource::Upload {
            filename: "upload.bin".into(),
            bytes: bytes.to_vec(),
        }
    }

    #[test]
    fn file_type_parsing() {
        assert_eq!("Site".parse::<FileType>().unwrap(), FileType::Site);
        assert_eq!("pdf".parse::<FileType>().unwrap(), FileType::Pdf);
        assert_eq!("TXT".parse::<FileType>().unwrap(), FileType::Txt);
        assert!("docx".parse::<FileType>().is_err());
    }

    #[test]
    fn url_based_split() {
        assert!(FileType::Site.is_url_based());
        assert!(FileType::Youtube.is_url_based());
        assert!(!FileType::Csv.is_url_based());
        assert!(!FileType::Pdf.is_url_based());
        assert!(!FileType::Txt.is_url_based());
    }

    #[tokio::test]
    async fn empty_sources_are_empty_outcomes() {
        let loader = DocumentLoader::new(RetryPolicy::immediate(1));
        for file_type in FileType::ALL {
            let source = if file_type.is_url_based() {
                DocumentSource::Url(String::new())
            } else {
                upload(b"")
            };
            assert_eq!(loader.load(file_type, &source).await, LoadOutcome::Empty);
        }
    }

    #[tokio::test]
    async fn mismatched_source_shape_fails_without_panicking() {
        let loader = DocumentLoader::new(RetryPolicy::immediate(1));

        let outcome = loader
            .load(FileType::Site, &upload(b"not a url"))
            .await;
        assert!(outcome.is_failed());

        let outcome = loader
            .load(FileType::Pdf, &DocumentSource::Url("https://example.com/x.pdf".into()))
            .await;
        assert!(outcome.is_failed());
    }

    #[tokio::test]
    async fn malformed_uploads_fail_without_panicking() {
        let loader = DocumentLoader::new(RetryPolicy::immediate(1));

        let outcome = loader.load(FileType::Pdf, &upload(b"garbage")).await;
        assert!(outcome.is_failed());
        assert_eq!(outcome.text(), "");

        let outcome = loader.load(FileType::Txt, &upload(&[0xff, 0xfe])).await;
        assert!(outcome.is_failed());
    }

    #[tokio::test]
    async fn txt_upload_loads_verbatim() {
        let loader = DocumentLoader::new(RetryPolicy::immediate(1));
        let outcome = loader.load(FileType::Txt, &upload(b"hello world")).await;
        assert_eq!(outcome, LoadOutcome::Loaded("hello world".into()));
    }

    #[tokio::test]
    async fn bad_youtube_source_fails_without_network() {
        let loader = DocumentLoader::new(RetryPolicy::immediate(1));
        let outcome = loader
            .load(FileType::Youtube, &DocumentSource::Url("not a video".into()))
            .await;
        assert!(outcome.is_failed());
    }
}
