//! Lyrics cleanup and length gate
//!
//! Fetched lyrics can end in an embed counter artifact such as `123Embed`.
//! `clean` removes it and trims whitespace; `accept` rejects anything under
//! the minimum length. No other filtering is applied.

/// Minimum cleaned length, in characters
pub const MIN_LYRICS_LENGTH: usize = 50;

const EMBED_SUFFIX: &str = "Embed";

/// Why a fetched text was not accepted
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RejectReason {
    /// Catalog returned no text, or only the artifact/whitespace
    NoLyrics,
    /// Cleaned text shorter than the minimum length
    TooShort,
}

impl RejectReason {
    pub fn as_str(self) -> &'static str {
        match self {
            RejectReason::NoLyrics => "no lyrics",
            RejectReason::TooShort => "too short",
        }
    }
}

/// Quality gate for fetched lyrics
#[derive(Debug, Clone)]
pub struct QualityFilter {
    min_length: usize,
}

impl Default for QualityFilter {
    fn default() -> Self {
        Self::new(MIN_LYRICS_LENGTH)
    }
}

impl QualityFilter {
    pub fn new(min_length: usize) -> Self {
        Self { min_length }
    }

    /// Strip a trailing `<digits>Embed` artifact, then trim whitespace
    pub fn clean(&self, raw: &str) -> String {
        // A single trailing newline still counts as end of text
        let tail = raw
            .strip_suffix('\n')
            .filter(|head| head.ends_with(EMBED_SUFFIX))
            .unwrap_or(raw);

        let without_embed = match tail.strip_suffix(EMBED_SUFFIX) {
            Some(head) => head.trim_end_matches(|c: char| c.is_ascii_digit()),
            None => tail,
        };
        without_embed.trim().to_string()
    }

    /// True when `cleaned` meets the minimum length
    pub fn accept(&self, cleaned: &str) -> bool {
        cleaned.chars().count() >= self.min_length
    }

    /// Clean and gate in one step
    pub fn evaluate(&self, raw: &str) -> Result<String, RejectReason> {
        let cleaned = self.clean(raw);
        if cleaned.is_empty() {
            return Err(RejectReason::NoLyrics);
        }
        if !self.accept(&cleaned) {
            return Err(RejectReason::TooShort);
        }
        Ok(cleaned)
    }
}
