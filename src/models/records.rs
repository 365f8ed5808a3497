use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Raw track record as handed over by the upstream collaborator
///
/// Column presence is validated here through typed fields; extra columns in
/// the source payload are ignored by deserialization.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RawTrack {
    /// Upstream track identifier, globally unique within one catalog
    pub id: String,
    pub name: String,
    /// Reference to the primary artist record
    pub artist_id: String,
    /// Upstream popularity score (0-100), when the source supplies one
    #[serde(default)]
    pub popularity: Option<u32>,
}

/// Raw per-track audio feature record
///
/// Feature values are kept as a named map rather than positional columns so
/// that the declared feature list drives which ones are used; unknown extras
/// ride along harmlessly and are never scored.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RawAudioFeatures {
    pub track_id: String,
    #[serde(flatten)]
    pub values: HashMap<String, f64>,
}

impl RawAudioFeatures {
    /// Creates a feature record from (name, value) pairs
    pub fn new(track_id: impl Into<String>, values: &[(&str, f64)]) -> Self {
        Self {
            track_id: track_id.into(),
            values: values
                .iter()
                .map(|(name, value)| (name.to_string(), *value))
                .collect(),
        }
    }
}

/// Raw artist record from the artist dimension
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RawArtist {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub genres: Vec<String>,
    #[serde(default)]
    pub popularity: Option<u32>,
}
