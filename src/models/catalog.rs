use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};

/// Artist dimension resolved into the catalog
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Artist {
    pub id: String,
    pub name: String,
    pub genres: Vec<String>,
    pub popularity: Option<u32>,
}

impl Artist {
    /// Placeholder for tracks whose artist record could not be resolved
    pub fn unknown(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: "Unknown".to_string(),
            genres: Vec::new(),
            popularity: None,
        }
    }
}

/// A fully joined catalog track: raw track + audio features + artist
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CatalogTrack {
    pub id: String,
    pub name: String,
    pub artist: Artist,
    /// Audio feature values on their original scale, keyed by feature name
    pub features: HashMap<String, f64>,
    pub popularity: Option<u32>,
}

/// Counters recorded while assembling the catalog
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct CatalogStats {
    /// Raw tracks seen before deduplication
    pub raw_tracks: usize,
    /// Duplicate track ids discarded (first occurrence wins)
    pub duplicate_tracks: usize,
    /// Tracks dropped because no audio feature record existed
    pub dropped_missing_features: usize,
    /// Tracks joined against the placeholder "Unknown" artist
    pub placeholder_artists: usize,
}

/// The deduplicated, joined track catalog
///
/// Built once per run and never mutated in place; a rebuild replaces the
/// whole value. The BTreeMap keeps iteration deterministic, which the ranker
/// relies on for reproducible output.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Catalog {
    pub tracks: BTreeMap<String, CatalogTrack>,
    pub stats: CatalogStats,
}

impl Catalog {
    pub fn len(&self) -> usize {
        self.tracks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tracks.is_empty()
    }

    pub fn contains(&self, track_id: &str) -> bool {
        self.tracks.contains_key(track_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_artist_placeholder() {
        let artist = Artist::unknown("a42");
        assert_eq!(artist.id, "a42");
        assert_eq!(artist.name, "Unknown");
        assert!(artist.genres.is_empty());
    }
}
