use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::catalog::Artist;

/// Min/max statistics for one feature across the catalog
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FeatureRange {
    pub min: f64,
    pub max: f64,
    /// Zero-variance feature: every catalog track has the same value, so it
    /// carries no information and normalizes to a constant 0.5
    pub constant: bool,
}

/// Normalization statistics for one run, shared by both profile builders
///
/// The table is computed exactly once per catalog build and reused to decode
/// preference target ranges; building a second table for the same run would
/// silently put profiles and tracks on different scales.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NormalizationTable {
    /// Feature names in vector order
    features: Vec<String>,
    ranges: Vec<FeatureRange>,
}

impl NormalizationTable {
    pub fn new(features: Vec<String>, ranges: Vec<FeatureRange>) -> Self {
        debug_assert_eq!(features.len(), ranges.len());
        Self { features, ranges }
    }

    pub fn features(&self) -> &[String] {
        &self.features
    }

    pub fn len(&self) -> usize {
        self.features.len()
    }

    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }

    /// Position of a feature in the vector layout, if it is known
    pub fn index_of(&self, feature: &str) -> Option<usize> {
        self.features.iter().position(|f| f == feature)
    }

    pub fn range(&self, index: usize) -> &FeatureRange {
        &self.ranges[index]
    }

    /// Rescale a raw value onto [0,1] using the recorded range
    ///
    /// Values outside the training range are not expected within a run
    /// (closed world) but clamp rather than error so scoring never panics.
    pub fn normalize(&self, index: usize, raw: f64) -> f64 {
        let range = &self.ranges[index];
        if range.constant {
            return 0.5;
        }
        ((raw - range.min) / (range.max - range.min)).clamp(0.0, 1.0)
    }
}

/// A catalog track projected onto the normalized feature space
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NormalizedTrack {
    pub id: String,
    pub name: String,
    pub artist: Artist,
    pub popularity: Option<u32>,
    /// Normalized feature values, aligned with the table's feature order
    pub values: Vec<f64>,
}

/// The catalog together with its attached normalization table
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NormalizedCatalog {
    pub tracks: BTreeMap<String, NormalizedTrack>,
    pub table: NormalizationTable,
    /// Catalog tracks excluded because they lacked one of the declared
    /// features; they must never reach ranking with defaulted values
    pub excluded_incomplete: usize,
}

impl NormalizedCatalog {
    pub fn len(&self) -> usize {
        self.tracks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tracks.is_empty()
    }
}
