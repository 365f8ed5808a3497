use serde::Deserialize;

/// Engine and pipeline configuration loaded from environment variables
///
/// Every threshold the engine consults lives here rather than as a hidden
/// constant, so callers can relax or tighten a run without recompiling.
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    /// Audio feature names used for normalization and scoring, in order
    #[serde(default = "default_features")]
    pub features: Vec<String>,

    /// Maximum tolerated fraction of raw tracks lacking audio features
    /// before catalog construction is treated as an upstream fetch failure
    #[serde(default = "default_max_missing_feature_ratio")]
    pub max_missing_feature_ratio: f64,

    /// Minimum number of signal tracks that must resolve against the
    /// catalog for the history profile to be considered buildable
    #[serde(default = "default_min_history_tracks")]
    pub min_history_tracks: usize,

    /// Half-life in days for exponential recency decay of play events
    #[serde(default = "default_recency_half_life_days")]
    pub recency_half_life_days: f64,

    /// Dampen per-feature importance by historical variance in the history
    /// profile (features the listening history disagrees on matter less)
    #[serde(default = "default_variance_weighting")]
    pub variance_weighting: bool,

    /// Number of entries each ranked list is truncated to
    #[serde(default = "default_top_n")]
    pub top_n: usize,

    /// Cap on each exclusive set (history-only / preference-only) reported
    /// by the comparator
    #[serde(default = "default_exclusive_cap")]
    pub exclusive_cap: usize,

    /// Directory holding the input record files (pipeline binary only)
    #[serde(default = "default_input_dir")]
    pub input_dir: String,

    /// Directory the pipeline binary writes its artifacts to
    #[serde(default = "default_output_dir")]
    pub output_dir: String,
}

fn default_features() -> Vec<String> {
    [
        "tempo",
        "energy",
        "danceability",
        "valence",
        "acousticness",
        "instrumentalness",
        "liveness",
        "speechiness",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect()
}

fn default_max_missing_feature_ratio() -> f64 {
    0.5
}

fn default_min_history_tracks() -> usize {
    5
}

fn default_recency_half_life_days() -> f64 {
    30.0
}

fn default_variance_weighting() -> bool {
    true
}

fn default_top_n() -> usize {
    100
}

fn default_exclusive_cap() -> usize {
    25
}

fn default_input_dir() -> String {
    "data/raw".to_string()
}

fn default_output_dir() -> String {
    "data/processed".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            features: default_features(),
            max_missing_feature_ratio: default_max_missing_feature_ratio(),
            min_history_tracks: default_min_history_tracks(),
            recency_half_life_days: default_recency_half_life_days(),
            variance_weighting: default_variance_weighting(),
            top_n: default_top_n(),
            exclusive_cap: default_exclusive_cap(),
            input_dir: default_input_dir(),
            output_dir: default_output_dir(),
        }
    }
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        envy::from_env::<Config>().map_err(|e| anyhow::anyhow!("Failed to load config: {}", e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.max_missing_feature_ratio, 0.5);
        assert_eq!(config.min_history_tracks, 5);
        assert_eq!(config.top_n, 100);
        assert!(config.features.contains(&"danceability".to_string()));
    }
}
