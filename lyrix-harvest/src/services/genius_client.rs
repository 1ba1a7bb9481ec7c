//! Genius catalog client
//!
//! Three calls back the ingestion pipeline:
//! - artist lookup through the public search endpoint
//! - paged song listing through the authenticated REST API
//! - lyrics by song id: REST lookup of the song page, then HTML extraction
//!
//! Transport errors, HTTP 429 and 5xx are retried with linear backoff.

use scraper::node::Node;
use scraper::{ElementRef, Html, Selector};
use serde::Deserialize;
use std::time::Duration;

use crate::models::SongId;
use crate::services::catalog::{ArtistRef, CatalogError, LyricsCatalog, SongPage, SongSort};

const GENIUS_API_BASE_URL: &str = "https://api.genius.com";
const GENIUS_PUBLIC_API_URL: &str = "https://genius.com/api";
const GENIUS_WEB_BASE_URL: &str = "https://genius.com";
const USER_AGENT: &str = concat!("lyrix/", env!("CARGO_PKG_VERSION"));
const RETRY_BACKOFF_MS: u64 = 500;

const LYRICS_CONTAINER_SELECTOR: &str = r#"div[data-lyrics-container="true"]"#;
const LEGACY_LYRICS_SELECTOR: &str = "div.lyrics";

/// Client behaviour knobs
#[derive(Debug, Clone)]
pub struct GeniusOptions {
    /// Per-request timeout
    pub timeout: Duration,
    /// Extra attempts after a retryable failure
    pub retries: u32,
    /// Strip `[Verse 1]`-style headers from fetched lyrics
    pub remove_section_headers: bool,
}

impl Default for GeniusOptions {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(30),
            retries: 5,
            remove_section_headers: true,
        }
    }
}

#[derive(Debug, Deserialize)]
struct ApiEnvelope<T> {
    response: T,
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    sections: Vec<SearchSection>,
}

#[derive(Debug, Deserialize)]
struct SearchSection {
    #[serde(rename = "type")]
    section_type: String,
    #[serde(default)]
    hits: Vec<SearchHit>,
}

#[derive(Debug, Deserialize)]
struct SearchHit {
    result: serde_json::Value,
}

#[derive(Debug, Deserialize)]
struct SongResponse {
    song: SongDetail,
}

#[derive(Debug, Deserialize)]
struct SongDetail {
    #[serde(default)]
    url: Option<String>,
    #[serde(default)]
    path: Option<String>,
}

/// Genius API client
pub struct GeniusClient {
    http_client: reqwest::Client,
    access_token: String,
    options: GeniusOptions,
}

impl GeniusClient {
    pub fn new(access_token: String, options: GeniusOptions) -> Result<Self, CatalogError> {
        if access_token.trim().is_empty() {
            return Err(CatalogError::Configuration(
                "access token is empty".to_string(),
            ));
        }

        let http_client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(options.timeout)
            .build()
            .map_err(|e| CatalogError::Configuration(e.to_string()))?;

        Ok(Self {
            http_client,
            access_token,
            options,
        })
    }

    /// GET `url`, retrying transient failures, and return the body text
    async fn get_text(
        &self,
        url: &str,
        query: &[(&str, String)],
        authenticated: bool,
        resource: &str,
    ) -> Result<String, CatalogError> {
        let mut attempt: u32 = 0;

        loop {
            let mut request = self.http_client.get(url).query(query);
            if authenticated {
                request = request.bearer_auth(&self.access_token);
            }

            tracing::debug!(url = %url, attempt, "Querying Genius");

            match request.send().await {
                Ok(response) => {
                    let status = response.status();

                    if status.as_u16() == 429 || status.is_server_error() {
                        if attempt < self.options.retries {
                            attempt += 1;
                            tracing::debug!(status = status.as_u16(), attempt, "Retrying Genius request");
                            self.backoff(attempt).await;
                            continue;
                        }
                        if status.as_u16() == 429 {
                            return Err(CatalogError::RateLimitExceeded);
                        }
                    }

                    if status.as_u16() == 404 {
                        return Err(CatalogError::NotFound(resource.to_string()));
                    }

                    if !status.is_success() {
                        let error_text = response.text().await.unwrap_or_default();
                        return Err(CatalogError::ApiError(status.as_u16(), error_text));
                    }

                    return response
                        .text()
                        .await
                        .map_err(|e| CatalogError::NetworkError(e.to_string()));
                }
                Err(e) if is_retryable(&e) && attempt < self.options.retries => {
                    attempt += 1;
                    tracing::debug!(error = %e, attempt, "Retrying Genius request");
                    self.backoff(attempt).await;
                }
                Err(e) => return Err(CatalogError::NetworkError(e.to_string())),
            }
        }
    }

    async fn backoff(&self, attempt: u32) {
        tokio::time::sleep(Duration::from_millis(RETRY_BACKOFF_MS * u64::from(attempt))).await;
    }
}

fn is_retryable(err: &reqwest::Error) -> bool {
    err.is_timeout() || err.is_connect() || err.is_request()
}

#[async_trait::async_trait]
impl LyricsCatalog for GeniusClient {
    async fn find_artist_id(&self, name: &str) -> Result<ArtistRef, CatalogError> {
        let url = format!("{}/search/artist", GENIUS_PUBLIC_API_URL);
        let query = [
            ("q", name.to_string()),
            ("per_page", "5".to_string()),
            ("page", "1".to_string()),
        ];

        let body = self.get_text(&url, &query, false, name).await?;
        let artist = parse_artist_search(&body)?
            .ok_or_else(|| CatalogError::NotFound(format!("artist {}", name)))?;

        tracing::info!(artist_id = artist.id, name = %artist.name, "Resolved artist");
        Ok(artist)
    }

    async fn list_songs_page(
        &self,
        artist_id: u64,
        sort: SongSort,
        per_page: u32,
        page: u32,
    ) -> Result<SongPage, CatalogError> {
        let url = format!("{}/artists/{}/songs", GENIUS_API_BASE_URL, artist_id);
        let query = [
            ("sort", sort.as_str().to_string()),
            ("per_page", per_page.to_string()),
            ("page", page.to_string()),
        ];

        let body = self
            .get_text(&url, &query, true, &format!("artist {}", artist_id))
            .await?;
        parse_song_page(&body)
    }

    async fn fetch_lyrics(&self, song_id: SongId) -> Result<Option<String>, CatalogError> {
        let url = format!("{}/songs/{}", GENIUS_API_BASE_URL, song_id);
        let body = self
            .get_text(&url, &[("text_format", "plain".to_string())], true, &format!("song {}", song_id))
            .await?;

        let Some(page_url) = parse_song_url(&body)? else {
            return Ok(None);
        };

        let html = self.get_text(&page_url, &[], false, &page_url).await?;

        Ok(extract_lyrics(&html).map(|lyrics| {
            if self.options.remove_section_headers {
                remove_section_headers(&lyrics)
            } else {
                lyrics
            }
        }))
    }
}

fn parse_json<T: serde::de::DeserializeOwned>(body: &str) -> Result<T, CatalogError> {
    serde_json::from_str::<ApiEnvelope<T>>(body)
        .map(|envelope| envelope.response)
        .map_err(|e| CatalogError::ParseError(e.to_string()))
}

/// First hit of the `artist` section of a search response
pub fn parse_artist_search(body: &str) -> Result<Option<ArtistRef>, CatalogError> {
    let search: SearchResponse = parse_json(body)?;

    let Some(hit) = search
        .sections
        .into_iter()
        .filter(|s| s.section_type == "artist")
        .flat_map(|s| s.hits)
        .next()
    else {
        return Ok(None);
    };

    serde_json::from_value(hit.result)
        .map(Some)
        .map_err(|e| CatalogError::ParseError(e.to_string()))
}

/// Songs and next-page cursor from an artist songs response
pub fn parse_song_page(body: &str) -> Result<SongPage, CatalogError> {
    parse_json(body)
}

/// Absolute lyrics page URL from a song response
pub fn parse_song_url(body: &str) -> Result<Option<String>, CatalogError> {
    let response: SongResponse = parse_json(body)?;
    let song = response.song;

    Ok(song
        .url
        .or_else(|| song.path.map(|p| format!("{}{}", GENIUS_WEB_BASE_URL, p))))
}

/// Pull lyric text out of a Genius song page
///
/// Returns `None` when the page carries no lyrics container.
pub fn extract_lyrics(html: &str) -> Option<String> {
    let document = Html::parse_document(html);
    let containers = Selector::parse(LYRICS_CONTAINER_SELECTOR).ok()?;

    let mut blocks: Vec<String> = document
        .select(&containers)
        .map(|container| {
            let mut text = String::new();
            collect_text(container, &mut text);
            text
        })
        .collect();

    if blocks.is_empty() {
        let legacy = Selector::parse(LEGACY_LYRICS_SELECTOR).ok()?;
        blocks = document
            .select(&legacy)
            .map(|container| {
                let mut text = String::new();
                collect_text(container, &mut text);
                text
            })
            .collect();
    }

    if blocks.is_empty() {
        return None;
    }

    Some(blocks.join("\n").trim_matches('\n').to_string())
}

fn collect_text(element: ElementRef<'_>, out: &mut String) {
    for child in element.children() {
        match child.value() {
            Node::Text(text) => out.push_str(text),
            Node::Element(el) if el.name() == "br" => out.push('\n'),
            Node::Element(el) if el.attr("data-exclude-from-selection") == Some("true") => {}
            Node::Element(_) => {
                if let Some(child_element) = ElementRef::wrap(child) {
                    collect_text(child_element, out);
                }
            }
            _ => {}
        }
    }
}

/// Drop single-line `[...]` headers and collapse blank-line pairs
pub fn remove_section_headers(lyrics: &str) -> String {
    let mut out = String::with_capacity(lyrics.len());
    let mut rest = lyrics;

    while let Some(start) = rest.find('[') {
        let candidate = &rest[start..];
        match candidate.find(|c: char| c == ']' || c == '\n') {
            Some(end) if candidate.as_bytes()[end] == b']' => {
                out.push_str(&rest[..start]);
                rest = &candidate[end + 1..];
            }
            _ => {
                out.push_str(&rest[..=start]);
                rest = &rest[start + 1..];
            }
        }
    }
    out.push_str(rest);

    out.replace("\n\n", "\n").trim_matches('\n').to_string()
}
