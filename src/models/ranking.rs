use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::profile::Strategy;

/// One scored entry of a ranked list
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RankedEntry {
    pub track_id: String,
    pub name: String,
    pub artist_name: String,
    /// Genre tags of the entry's artist, carried for diversity reporting
    pub genres: Vec<String>,
    /// Negative weighted Euclidean distance to the profile target; higher
    /// is closer
    pub score: f64,
    /// 1-based position within the list
    pub rank: usize,
}

/// Catalog tracks ordered by similarity against one profile
///
/// Strictly sorted by descending score with ascending-track-id tie-break, so
/// two runs over identical inputs produce byte-identical lists.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RankedList {
    pub strategy: Strategy,
    /// The top-N this list was truncated to; lists are only comparable when
    /// they were requested at the same N
    pub requested_top_n: Option<usize>,
    pub entries: Vec<RankedEntry>,
}

impl RankedList {
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Track ids in rank order
    pub fn track_ids(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|e| e.track_id.as_str())
    }
}

/// How varied one ranked list's picks are
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DiversityStats {
    /// Distinct artist names across the list's entries
    pub unique_artists: usize,
    /// Genre tag -> number of entries carrying it, most frequent first,
    /// ties in alphabetical order
    pub genre_distribution: Vec<(String, usize)>,
}

/// Agreement analysis between the two strategies' ranked lists
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ComparisonReport {
    /// Tracks present in both lists
    pub overlap_count: usize,
    /// |intersection| / |union| over the two lists' track sets
    pub overlap_ratio: f64,
    /// Spearman's rho over the shared subset; None when fewer than two
    /// tracks are shared
    pub rank_correlation: Option<f64>,
    /// Tracks only the history strategy picked, in its rank order (capped)
    pub history_only: Vec<RankedEntry>,
    /// Tracks only the preference strategy picked, in its rank order (capped)
    pub preference_only: Vec<RankedEntry>,
    /// Artist and genre spread of the history list
    pub history_diversity: DiversityStats,
    /// Artist and genre spread of the preference list
    pub preference_diversity: DiversityStats,
}

/// Bookkeeping for one pipeline run
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RunMetadata {
    pub run_id: Uuid,
    pub generated_at: DateTime<Utc>,
    /// Tracks in the built catalog
    pub catalog_tracks: usize,
    /// Tracks dropped during the catalog join for lack of audio features
    pub dropped_missing_features: usize,
    /// Tracks excluded from normalization for incomplete feature sets
    pub excluded_incomplete: usize,
    /// Signal entries that referenced tracks outside the catalog
    pub signal_unresolved: usize,
    /// Per-list lengths actually produced
    pub history_list_len: usize,
    pub preference_list_len: usize,
}
