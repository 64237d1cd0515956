//! arXiv citation lookup and deterministic formatting.
//!
//! Pure data transformation: parse the arXiv id out of a user-supplied URL,
//! fetch bibliographic metadata from the arXiv export API, and render it in
//! one of four citation styles.

use regex::Regex;
use std::str::FromStr;
use std::sync::OnceLock;
use std::time::Duration;
use thiserror::Error;

/// Errors produced while generating a citation.
#[derive(Debug, Error)]
pub enum CitationError {
    /// The supplied URL does not look like an arXiv abs/pdf link.
    #[error("Invalid arXiv URL format")]
    InvalidUrl,
    /// The requested style token is not one of APA/MLA/Chicago/IEEE.
    #[error("Unknown citation style: {0}")]
    UnknownStyle(String),
    /// The arXiv API could not be reached or answered with an error.
    #[error("Failed to fetch arXiv metadata: {0}")]
    Fetch(String),
    /// The API response contained no usable entry.
    #[error("arXiv returned no metadata for this identifier")]
    Metadata,
}

/// Supported citation styles.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CitationStyle {
    /// American Psychological Association.
    Apa,
    /// Modern Language Association.
    Mla,
    /// Chicago Manual of Style.
    Chicago,
    /// Institute of Electrical and Electronics Engineers.
    Ieee,
}

impl FromStr for CitationStyle {
    type Err = CitationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "APA" => Ok(Self::Apa),
            "MLA" => Ok(Self::Mla),
            "CHICAGO" => Ok(Self::Chicago),
            "IEEE" => Ok(Self::Ieee),
            _ => Err(CitationError::UnknownStyle(s.to_string())),
        }
    }
}

/// Bibliographic fields extracted from one arXiv Atom entry.
#[derive(Debug, Clone)]
pub struct ArxivMetadata {
    /// Paper title with internal whitespace collapsed.
    pub title: String,
    /// Author names in publication order.
    pub authors: Vec<String>,
    /// Four-digit publication year.
    pub year: String,
    /// Bare arXiv identifier (e.g. `2301.07041`).
    pub arxiv_id: String,
}

fn arxiv_id_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"arxiv\.org/(?:abs|pdf)/(\d{4}\.\d{4,5})(?:v\d+)?").expect("valid id pattern")
    })
}

/// Extract the bare arXiv identifier from an abs/pdf URL.
pub fn parse_arxiv_id(url: &str) -> Result<String, CitationError> {
    arxiv_id_pattern()
        .captures(url)
        .and_then(|captures| captures.get(1))
        .map(|id| id.as_str().to_string())
        .ok_or(CitationError::InvalidUrl)
}

/// Parse the first `<entry>` of an arXiv Atom feed.
///
/// Parsing is scoped to the entry element because the feed-level `<title>`
/// echoes the query, not the paper title.
pub fn parse_feed_entry(xml: &str, arxiv_id: &str) -> Result<ArxivMetadata, CitationError> {
    static ENTRY: OnceLock<Regex> = OnceLock::new();
    static TITLE: OnceLock<Regex> = OnceLock::new();
    static NAME: OnceLock<Regex> = OnceLock::new();
    static PUBLISHED: OnceLock<Regex> = OnceLock::new();

    let entry_pattern =
        ENTRY.get_or_init(|| Regex::new(r"(?s)<entry>(.*?)</entry>").expect("valid entry pattern"));
    let entry = entry_pattern
        .captures(xml)
        .and_then(|captures| captures.get(1))
        .ok_or(CitationError::Metadata)?
        .as_str();

    let title = TITLE
        .get_or_init(|| Regex::new(r"(?s)<title>(.*?)</title>").expect("valid title pattern"))
        .captures(entry)
        .and_then(|captures| captures.get(1))
        .map(|m| m.as_str().split_whitespace().collect::<Vec<_>>().join(" "))
        .filter(|title| !title.is_empty())
        .ok_or(CitationError::Metadata)?;

    let authors: Vec<String> = NAME
        .get_or_init(|| Regex::new(r"<name>(.*?)</name>").expect("valid name pattern"))
        .captures_iter(entry)
        .filter_map(|captures| captures.get(1))
        .map(|m| m.as_str().trim().to_string())
        .filter(|name| !name.is_empty())
        .collect();
    if authors.is_empty() {
        return Err(CitationError::Metadata);
    }

    let year = PUBLISHED
        .get_or_init(|| {
            Regex::new(r"<published>(\d{4})-").expect("valid published pattern")
        })
        .captures(entry)
        .and_then(|captures| captures.get(1))
        .map(|m| m.as_str().to_string())
        .ok_or(CitationError::Metadata)?;

    Ok(ArxivMetadata {
        title,
        authors,
        year,
        arxiv_id: arxiv_id.to_string(),
    })
}

/// Render metadata in the requested style.
///
/// Author cutoffs differ per style: APA and Chicago list at most five names
/// before "et al.", IEEE lists up to six, MLA always collapses to the first.
pub fn format_citation(meta: &ArxivMetadata, style: CitationStyle) -> String {
    let ArxivMetadata {
        title,
        authors,
        year,
        arxiv_id,
    } = meta;
    match style {
        CitationStyle::Apa => format!(
            "{}{} ({year}). {title}. arXiv preprint arXiv:{arxiv_id}.",
            authors[..authors.len().min(5)].join(", "),
            if authors.len() > 5 { ", et al." } else { "" },
        ),
        CitationStyle::Mla => format!(
            "{}{}. \"{title}.\" arXiv preprint arXiv:{arxiv_id} ({year}).",
            authors[0],
            if authors.len() > 1 { ", et al" } else { "" },
        ),
        CitationStyle::Chicago => format!(
            "{}{}. \"{title}.\" arXiv preprint arXiv:{arxiv_id} ({year}).",
            authors[..authors.len().min(5)].join(", "),
            if authors.len() > 5 { ", et al." } else { "" },
        ),
        CitationStyle::Ieee => format!(
            "{}{}, \"{title},\" arXiv preprint arXiv:{arxiv_id}, {year}.",
            authors[..authors.len().min(6)].join(", "),
            if authors.len() > 6 { ", et al." } else { "" },
        ),
    }
}

/// HTTP client for the arXiv export API.
pub struct ArxivClient {
    client: reqwest::Client,
    base_url: String,
}

impl ArxivClient {
    /// Construct a client against an explicit base URL.
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, CitationError> {
        let client = reqwest::Client::builder()
            .user_agent("paperlens/0.1")
            .timeout(timeout)
            .build()
            .map_err(|err| CitationError::Fetch(err.to_string()))?;
        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    /// Construct a client from the loaded application configuration.
    pub fn from_config() -> Result<Self, CitationError> {
        let config = crate::config::get_config();
        Self::new(config.arxiv_api_url.clone(), Duration::from_secs(30))
    }

    /// Fetch and parse metadata for one arXiv identifier.
    pub async fn fetch_metadata(&self, arxiv_id: &str) -> Result<ArxivMetadata, CitationError> {
        let url = format!("{}/api/query", self.base_url);
        let response = self
            .client
            .get(&url)
            .query(&[("id_list", arxiv_id)])
            .send()
            .await
            .map_err(|err| CitationError::Fetch(err.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(CitationError::Fetch(format!(
                "arXiv API returned status {status}"
            )));
        }

        let xml = response
            .text()
            .await
            .map_err(|err| CitationError::Fetch(err.to_string()))?;
        parse_feed_entry(&xml, arxiv_id)
    }

    /// Generate a formatted citation for an arXiv URL and style token.
    pub async fn generate(&self, arxiv_url: &str, style: &str) -> Result<String, CitationError> {
        let style = style.parse::<CitationStyle>()?;
        let arxiv_id = parse_arxiv_id(arxiv_url)?;
        let meta = self.fetch_metadata(&arxiv_id).await?;
        tracing::debug!(arxiv_id = %meta.arxiv_id, authors = meta.authors.len(), "Formatted citation");
        Ok(format_citation(&meta, style))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn synthetic_meta(author_count: usize) -> ArxivMetadata {
        ArxivMetadata {
            title: "T".into(),
            authors: ["A", "B", "C", "D", "E", "F"][..author_count]
                .iter()
                .map(|name| name.to_string())
                .collect(),
            year: "Y".into(),
            arxiv_id: "2301.07041".into(),
        }
    }

    #[test]
    fn parses_abs_and_pdf_urls() {
        assert_eq!(
            parse_arxiv_id("https://arxiv.org/abs/2301.07041").unwrap(),
            "2301.07041"
        );
        assert_eq!(
            parse_arxiv_id("https://arxiv.org/pdf/2301.07041v2").unwrap(),
            "2301.07041"
        );
        assert!(matches!(
            parse_arxiv_id("https://example.org/abs/2301.07041"),
            Err(CitationError::InvalidUrl)
        ));
    }

    #[test]
    fn style_tokens_parse_case_insensitively() {
        assert_eq!("apa".parse::<CitationStyle>().unwrap(), CitationStyle::Apa);
        assert_eq!("IEEE".parse::<CitationStyle>().unwrap(), CitationStyle::Ieee);
        assert!(matches!(
            "harvard".parse::<CitationStyle>(),
            Err(CitationError::UnknownStyle(_))
        ));
    }

    #[test]
    fn ieee_lists_six_authors_where_apa_cuts_at_five() {
        let meta = synthetic_meta(6);
        let ieee = format_citation(&meta, CitationStyle::Ieee);
        assert_eq!(ieee, "A, B, C, D, E, F, \"T,\" arXiv preprint arXiv:2301.07041, Y.");
        assert!(!ieee.contains("et al"));

        let apa = format_citation(&meta, CitationStyle::Apa);
        assert_eq!(apa, "A, B, C, D, E, et al. (Y). T. arXiv preprint arXiv:2301.07041.");
    }

    #[test]
    fn mla_collapses_to_first_author() {
        let mla = format_citation(&synthetic_meta(3), CitationStyle::Mla);
        assert_eq!(mla, "A, et al. \"T.\" arXiv preprint arXiv:2301.07041 (Y).");

        let solo = format_citation(&synthetic_meta(1), CitationStyle::Mla);
        assert_eq!(solo, "A. \"T.\" arXiv preprint arXiv:2301.07041 (Y).");
    }

    #[test]
    fn entry_parsing_skips_the_feed_title() {
        let xml = r#"<?xml version="1.0"?>
<feed xmlns="http://www.w3.org/2005/Atom">
  <title>ArXiv Query: search_query=&amp;id_list=2301.07041</title>
  <entry>
    <title>Attention Is
      All You Need</title>
    <published>2017-06-12T17:57:34Z</published>
    <author><name>Ashish Vaswani</name></author>
    <author><name>Noam Shazeer</name></author>
  </entry>
</feed>"#;
        let meta = parse_feed_entry(xml, "2301.07041").unwrap();
        assert_eq!(meta.title, "Attention Is All You Need");
        assert_eq!(meta.authors, vec!["Ashish Vaswani", "Noam Shazeer"]);
        assert_eq!(meta.year, "2017");
    }

    #[test]
    fn missing_entry_is_a_metadata_error() {
        assert!(matches!(
            parse_feed_entry("<feed><title>empty</title></feed>", "1234.5678"),
            Err(CitationError::Metadata)
        ));
    }
}
