use serde::{Deserialize, Serialize};
use std::fmt;

/// Audio/subtitle treatment of a stream, recovered from the provider's
/// free-text server label.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum StreamLanguage {
    #[serde(rename = "Vietsub")]
    Vietsub,
    #[serde(rename = "Thuyết Minh")]
    ThuyetMinh,
    #[serde(rename = "Lồng Tiếng")]
    LongTieng,
    #[serde(rename = "Unknown")]
    Unknown,
}

impl StreamLanguage {
    /// Classify a server/label string by substring match, checked in
    /// priority order: Vietsub, then Thuyết Minh, then Lồng Tiếng. First
    /// match wins; combined labels are not detected.
    pub fn classify(label: &str) -> Self {
        if label.contains("Vietsub") {
            StreamLanguage::Vietsub
        } else if label.contains("Thuyết Minh") {
            StreamLanguage::ThuyetMinh
        } else if label.contains("Lồng Tiếng") {
            StreamLanguage::LongTieng
        } else {
            StreamLanguage::Unknown
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            StreamLanguage::Vietsub => "Vietsub",
            StreamLanguage::ThuyetMinh => "Thuyết Minh",
            StreamLanguage::LongTieng => "Lồng Tiếng",
            StreamLanguage::Unknown => "Unknown",
        }
    }
}

impl fmt::Display for StreamLanguage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One playable rendition of a title from one provider/server.
///
/// Recomputed per request from live provider data; never persisted.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct StreamSource {
    /// Name of the adapter that produced this source.
    pub provider: String,
    /// Raw server label from the provider (may encode language).
    pub server_name: String,
    /// Free text, e.g. "HD" or "FHD".
    pub quality: String,
    pub language: StreamLanguage,
    pub episodes: Vec<Episode>,
}

/// One playable unit within a [`StreamSource`].
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Episode {
    pub id: String,
    pub episode_number: u32,
    pub title: String,
    pub slug: String,
    /// Direct media manifest URL; empty when the provider omits it.
    pub stream_url: String,
    /// Iframe fallback URL; empty when the provider omits it.
    pub embed_url: String,
}

impl Episode {
    /// An episode with neither a direct manifest nor an embed URL cannot
    /// be played. The aggregator does not filter these out; callers check.
    pub fn is_playable(&self) -> bool {
        !self.stream_url.is_empty() || !self.embed_url.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_priority_order() {
        assert_eq!(StreamLanguage::classify("#Hà Nội (Vietsub)"), StreamLanguage::Vietsub);
        assert_eq!(StreamLanguage::classify("Thuyết Minh #2"), StreamLanguage::ThuyetMinh);
        assert_eq!(StreamLanguage::classify("Lồng Tiếng HD"), StreamLanguage::LongTieng);
        assert_eq!(StreamLanguage::classify("Server #1"), StreamLanguage::Unknown);
    }

    #[test]
    fn test_classify_combined_label_takes_first_match() {
        // A label carrying both treatments classifies by priority, not by
        // combination.
        assert_eq!(
            StreamLanguage::classify("Vietsub + Lồng Tiếng"),
            StreamLanguage::Vietsub
        );
    }

    #[test]
    fn test_episode_playability() {
        let mut episode = Episode {
            id: "kkphim-dune-1".to_string(),
            episode_number: 1,
            title: "Full".to_string(),
            slug: "full".to_string(),
            stream_url: String::new(),
            embed_url: String::new(),
        };
        assert!(!episode.is_playable());
        episode.embed_url = "https://player.example/e/1".to_string();
        assert!(episode.is_playable());
    }
}
