use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::MediaType;

/// Canonical content record, keyed by an internally generated `id` and an
/// optional upstream catalog `external_id`.
///
/// Different provider calls populate different subsets of the descriptive
/// fields (a list endpoint carries no trailer, a detail endpoint does), so
/// updates always go through [`Movie::merge_from`] rather than wholesale
/// replacement.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Movie {
    /// Internally generated primary key. Immutable; the only value other
    /// entities (favorites, watch history) may reference.
    pub id: String,

    /// Upstream catalog id (e.g. a numeric TMDB-style string) or a provider
    /// slug when no catalog id exists. Unique across records when present.
    pub external_id: Option<String>,

    pub title: String,
    pub original_title: Option<String>,
    pub media_type: MediaType,
    pub description: Option<String>,
    pub poster_url: Option<String>,
    pub backdrop_url: Option<String>,
    pub trailer_url: Option<String>,
    pub release_date: Option<NaiveDate>,
    /// Runtime in minutes.
    pub duration: Option<u32>,
    /// 0-10 scale.
    pub rating: Option<f32>,
    pub genres: Vec<String>,
    pub imdb_id: Option<String>,
    pub original_language: Option<String>,
    /// Name of the source that last supplied this record.
    pub provider: Option<String>,
    pub stream_url: Option<String>,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Movie {
    /// Create a fresh record with a generated id and both timestamps set to
    /// now.
    pub fn new(title: impl Into<String>, media_type: MediaType) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4().to_string(),
            external_id: None,
            title: title.into(),
            original_title: None,
            media_type,
            description: None,
            poster_url: None,
            backdrop_url: None,
            trailer_url: None,
            release_date: None,
            duration: None,
            rating: None,
            genres: Vec::new(),
            imdb_id: None,
            original_language: None,
            provider: None,
            stream_url: None,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn with_external_id(mut self, external_id: impl Into<String>) -> Self {
        self.external_id = Some(external_id.into());
        self
    }

    /// Apply every non-empty field of `candidate` over this record.
    ///
    /// Fields the candidate leaves empty never erase a previously stored
    /// value: a list-endpoint fetch without trailer data must not wipe out
    /// a trailer learned from an earlier detail fetch. `id` and
    /// `created_at` are preserved; `updated_at` is refreshed.
    pub fn merge_from(&mut self, candidate: &Movie) {
        merge_str(&mut self.external_id, &candidate.external_id);
        if !candidate.title.trim().is_empty() {
            self.title = candidate.title.clone();
        }
        merge_str(&mut self.original_title, &candidate.original_title);
        self.media_type = candidate.media_type;
        merge_str(&mut self.description, &candidate.description);
        merge_str(&mut self.poster_url, &candidate.poster_url);
        merge_str(&mut self.backdrop_url, &candidate.backdrop_url);
        merge_str(&mut self.trailer_url, &candidate.trailer_url);
        if candidate.release_date.is_some() {
            self.release_date = candidate.release_date;
        }
        if candidate.duration.is_some() {
            self.duration = candidate.duration;
        }
        if candidate.rating.is_some() {
            self.rating = candidate.rating;
        }
        if !candidate.genres.is_empty() {
            self.genres = candidate.genres.clone();
        }
        merge_str(&mut self.imdb_id, &candidate.imdb_id);
        merge_str(&mut self.original_language, &candidate.original_language);
        merge_str(&mut self.provider, &candidate.provider);
        merge_str(&mut self.stream_url, &candidate.stream_url);
        self.updated_at = Utc::now();
    }
}

/// Overwrite `target` only when `source` carries a non-blank value.
fn merge_str(target: &mut Option<String>, source: &Option<String>) {
    if let Some(value) = source {
        if !value.trim().is_empty() {
            *target = Some(value.clone());
        }
    }
}

/// Caller-supplied movie data used when identity resolution has to create
/// a record on demand. All descriptive fields are optional; resolution
/// fills in the identity and defaults.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MovieSeed {
    pub title: String,
    pub original_title: Option<String>,
    pub media_type: Option<MediaType>,
    pub description: Option<String>,
    pub poster_url: Option<String>,
    pub backdrop_url: Option<String>,
    pub trailer_url: Option<String>,
    pub release_date: Option<NaiveDate>,
    pub duration: Option<u32>,
    pub rating: Option<f32>,
    #[serde(default)]
    pub genres: Vec<String>,
    pub imdb_id: Option<String>,
    pub original_language: Option<String>,
    pub provider: Option<String>,
    pub stream_url: Option<String>,
}

impl MovieSeed {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Default::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stored_movie() -> Movie {
        let mut movie = Movie::new("Dune", MediaType::Movie).with_external_id("438631");
        movie.trailer_url = Some("http://x".to_string());
        movie.description = Some("Spice".to_string());
        movie
    }

    #[test]
    fn test_merge_keeps_stored_value_when_candidate_is_empty() {
        let mut stored = stored_movie();
        let mut candidate = Movie::new("Dune", MediaType::Movie);
        candidate.trailer_url = None;
        candidate.description = Some("".to_string());

        stored.merge_from(&candidate);

        assert_eq!(stored.trailer_url.as_deref(), Some("http://x"));
        assert_eq!(stored.description.as_deref(), Some("Spice"));
    }

    #[test]
    fn test_merge_overwrites_with_fresh_values() {
        let mut stored = stored_movie();
        let mut candidate = Movie::new("Dune: Part Two", MediaType::Movie);
        candidate.trailer_url = Some("http://y".to_string());
        candidate.rating = Some(8.4);
        candidate.genres = vec!["Sci-Fi".to_string()];

        stored.merge_from(&candidate);

        assert_eq!(stored.title, "Dune: Part Two");
        assert_eq!(stored.trailer_url.as_deref(), Some("http://y"));
        assert_eq!(stored.rating, Some(8.4));
        assert_eq!(stored.genres, vec!["Sci-Fi".to_string()]);
    }

    #[test]
    fn test_merge_preserves_identity_and_created_at() {
        let mut stored = stored_movie();
        let original_id = stored.id.clone();
        let original_created = stored.created_at;
        let candidate = Movie::new("Dune", MediaType::Movie);

        stored.merge_from(&candidate);

        assert_eq!(stored.id, original_id);
        assert_eq!(stored.created_at, original_created);
        assert!(stored.updated_at >= original_created);
    }

    #[test]
    fn test_blank_title_does_not_clobber() {
        let mut stored = stored_movie();
        let mut candidate = Movie::new("", MediaType::Movie);
        candidate.title = "  ".to_string();

        stored.merge_from(&candidate);

        assert_eq!(stored.title, "Dune");
    }
}
