use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// One play or save event from the listening log
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PlayEvent {
    pub track_id: String,
    pub played_at: DateTime<Utc>,
}

/// A single (track, weight) entry of the history signal
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SignalEntry {
    pub track_id: String,
    pub weight: f64,
}

/// History-based input: ordered (track id, weight) pairs
///
/// Weights encode frequency and recency; entries may reference tracks
/// outside the catalog, which the history profile builder skips and counts.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct UserSignal {
    pub entries: Vec<SignalEntry>,
}

impl UserSignal {
    /// Builds a signal from explicit (track id, weight) pairs
    pub fn from_weights(pairs: Vec<(String, f64)>) -> Self {
        Self {
            entries: pairs
                .into_iter()
                .map(|(track_id, weight)| SignalEntry { track_id, weight })
                .collect(),
        }
    }

    /// Derives per-track weights from raw play events
    ///
    /// Each event contributes `0.5 ^ (age_days / half_life_days)`, so a play
    /// exactly one half-life ago counts half as much as one right now, and
    /// repeated plays accumulate. Events from the future clamp to full
    /// weight. Entries come out ordered by descending weight, ties broken by
    /// track id for determinism.
    pub fn from_play_events(
        events: &[PlayEvent],
        now: DateTime<Utc>,
        half_life_days: f64,
    ) -> Self {
        let mut weights: HashMap<&str, f64> = HashMap::new();
        for event in events {
            let age_days = (now - event.played_at).num_seconds().max(0) as f64 / 86_400.0;
            let decay = 0.5_f64.powf(age_days / half_life_days);
            *weights.entry(event.track_id.as_str()).or_insert(0.0) += decay;
        }

        let mut entries: Vec<SignalEntry> = weights
            .into_iter()
            .map(|(track_id, weight)| SignalEntry {
                track_id: track_id.to_string(),
                weight,
            })
            .collect();
        entries.sort_by(|a, b| {
            b.weight
                .partial_cmp(&a.weight)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then_with(|| a.track_id.cmp(&b.track_id))
        });

        Self { entries }
    }

    /// Track ids referenced by this signal, in signal order
    pub fn track_ids(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|e| e.track_id.as_str())
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Target for one feature in a declared preference
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "snake_case")]
pub enum TargetValue {
    /// A single desired value on the feature's original scale
    Point(f64),
    /// An acceptable range on the feature's original scale
    Range { min: f64, max: f64 },
}

/// One feature's declared preference: a target plus optional importance
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FeatureTarget {
    pub target: TargetValue,
    /// Explicit importance weight; when absent, point targets default to 1.0
    /// and range targets to the inverse of the normalized range width
    #[serde(default)]
    pub weight: Option<f64>,
}

/// Declared-preference input: feature name -> target
///
/// Features not mentioned here are excluded from scoring entirely rather
/// than defaulted to zero importance.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct PreferenceSpec {
    pub features: HashMap<String, FeatureTarget>,
}

impl PreferenceSpec {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds or replaces a point target for a feature
    pub fn set_point(&mut self, feature: impl Into<String>, value: f64, weight: Option<f64>) {
        self.features.insert(
            feature.into(),
            FeatureTarget {
                target: TargetValue::Point(value),
                weight,
            },
        );
    }

    /// Adds or replaces a range target for a feature
    pub fn set_range(
        &mut self,
        feature: impl Into<String>,
        min: f64,
        max: f64,
        weight: Option<f64>,
    ) {
        self.features.insert(
            feature.into(),
            FeatureTarget {
                target: TargetValue::Range { min, max },
                weight,
            },
        );
    }
}
