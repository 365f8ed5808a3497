use crate::{
    config::Config,
    error::{EngineError, EngineResult},
    models::{
        NormalizedCatalog, PreferenceSpec, Profile, Strategy, TargetValue, UserSignal,
    },
};

/// Outcome of building the history profile, including signal accounting
#[derive(Debug, Clone, PartialEq)]
pub struct HistoryProfile {
    pub profile: Profile,
    /// Signal entries that referenced tracks absent from the catalog
    pub unresolved: usize,
}

/// Derives a taste profile from the listening-history signal
///
/// The profile target is the signal-weighted centroid of the referenced
/// tracks' normalized feature vectors. Importance is uniform, or damped by
/// the weighted per-feature variance when `variance_weighting` is on:
/// features the history spreads widely over discriminate less.
pub fn build_history_profile(
    normalized: &NormalizedCatalog,
    signal: &UserSignal,
    config: &Config,
) -> EngineResult<HistoryProfile> {
    let feature_count = normalized.table.len();

    // 1. Resolve signal entries against the catalog.
    let mut resolved: Vec<(&crate::models::NormalizedTrack, f64)> = Vec::new();
    let mut unresolved = 0usize;
    for entry in &signal.entries {
        match normalized.tracks.get(&entry.track_id) {
            Some(track) => resolved.push((track, entry.weight)),
            None => unresolved += 1,
        }
    }

    if resolved.len() < config.min_history_tracks {
        return Err(EngineError::InsufficientSignal {
            referenced: signal.entries.len(),
            resolved: resolved.len(),
            required: config.min_history_tracks,
        });
    }

    if unresolved > 0 {
        tracing::warn!(
            unresolved,
            resolved = resolved.len(),
            "History signal references tracks outside the catalog"
        );
    }

    // 2. Weighted centroid per feature.
    let total_weight: f64 = resolved.iter().map(|(_, w)| w).sum();
    let mut targets = vec![0.0; feature_count];
    for (track, weight) in &resolved {
        for (idx, value) in track.values.iter().enumerate() {
            targets[idx] += value * weight;
        }
    }
    for target in &mut targets {
        *target /= total_weight;
    }

    // 3. Importance: uniform, or variance-damped.
    let weights = if config.variance_weighting {
        let mut variances = vec![0.0; feature_count];
        for (track, weight) in &resolved {
            for (idx, value) in track.values.iter().enumerate() {
                let delta = value - targets[idx];
                variances[idx] += weight * delta * delta;
            }
        }
        variances
            .iter()
            .map(|v| 1.0 / (1.0 + v / total_weight))
            .collect()
    } else {
        vec![1.0; feature_count]
    };

    tracing::info!(
        resolved = resolved.len(),
        unresolved,
        variance_weighting = config.variance_weighting,
        "History profile built"
    );

    Ok(HistoryProfile {
        profile: Profile::new(Strategy::History, targets, weights),
        unresolved,
    })
}

/// Derives a taste profile from explicitly declared preferences
///
/// Targets and range endpoints are decoded through the run's normalization
/// table so they live on the same scale as the track vectors. Features the
/// declared preferences do not mention get importance 0 and are excluded
/// from scoring.
pub fn build_preference_profile(
    normalized: &NormalizedCatalog,
    spec: &PreferenceSpec,
) -> EngineResult<Profile> {
    if spec.features.is_empty() {
        return Err(EngineError::InvalidSpec {
            feature: "(none)".to_string(),
            reason: "preference specification declares no feature targets".to_string(),
        });
    }

    let table = &normalized.table;
    let mut targets = vec![0.0; table.len()];
    let mut weights = vec![0.0; table.len()];

    for (feature, target) in &spec.features {
        let Some(idx) = table.index_of(feature) else {
            return Err(EngineError::InvalidSpec {
                feature: feature.clone(),
                reason: "feature is not in the normalization table".to_string(),
            });
        };

        // Explicit importance must be a positive finite number; anything
        // else makes the weighted distance meaningless.
        if let Some(weight) = target.weight {
            if !weight.is_finite() || weight <= 0.0 {
                return Err(EngineError::InvalidSpec {
                    feature: feature.clone(),
                    reason: format!("importance weight {} is not a positive number", weight),
                });
            }
        }

        match &target.target {
            TargetValue::Point(value) => {
                targets[idx] = table.normalize(idx, *value);
                weights[idx] = target.weight.unwrap_or(1.0);
            }
            TargetValue::Range { min, max } => {
                if min > max {
                    return Err(EngineError::InvalidSpec {
                        feature: feature.clone(),
                        reason: format!("range minimum {} exceeds maximum {}", min, max),
                    });
                }
                let lo = table.normalize(idx, *min);
                let hi = table.normalize(idx, *max);
                targets[idx] = (lo + hi) / 2.0;
                // A narrower stated range is a stronger opinion; a degenerate
                // range behaves like a point target.
                weights[idx] = target.weight.unwrap_or_else(|| {
                    let width = hi - lo;
                    if width > f64::EPSILON {
                        1.0 / width
                    } else {
                        1.0
                    }
                });
            }
        }
    }

    tracing::info!(
        declared_features = spec.features.len(),
        "Preference profile built"
    );

    Ok(Profile::new(Strategy::Preference, targets, weights))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        models::{RawArtist, RawAudioFeatures, RawTrack},
        services::{catalog_builder::build_catalog, normalizer::normalize_catalog},
    };

    fn normalized_fixture() -> NormalizedCatalog {
        // Six tracks spanning tempo 100..150 and energy 0.0..1.0
        let specs: Vec<(&str, f64, f64)> = vec![
            ("t1", 100.0, 0.0),
            ("t2", 110.0, 0.2),
            ("t3", 120.0, 0.4),
            ("t4", 130.0, 0.6),
            ("t5", 140.0, 0.8),
            ("t6", 150.0, 1.0),
        ];
        let tracks: Vec<RawTrack> = specs
            .iter()
            .map(|(id, _, _)| RawTrack {
                id: id.to_string(),
                name: format!("Track {}", id),
                artist_id: "a1".to_string(),
                popularity: None,
            })
            .collect();
        let features: Vec<RawAudioFeatures> = specs
            .iter()
            .map(|(id, tempo, energy)| {
                RawAudioFeatures::new(*id, &[("tempo", *tempo), ("energy", *energy)])
            })
            .collect();
        let artists = vec![RawArtist {
            id: "a1".to_string(),
            name: "Artist".to_string(),
            genres: vec![],
            popularity: None,
        }];
        let catalog = build_catalog(&tracks, &features, &artists, &Config::default()).unwrap();
        normalize_catalog(&catalog, &["tempo".to_string(), "energy".to_string()]).unwrap()
    }

    fn uniform_signal(ids: &[&str]) -> UserSignal {
        UserSignal::from_weights(ids.iter().map(|id| (id.to_string(), 1.0)).collect())
    }

    #[test]
    fn test_history_centroid_uniform_weights() {
        let normalized = normalized_fixture();
        let signal = uniform_signal(&["t1", "t2", "t3", "t4", "t5", "t6"]);
        let config = Config {
            variance_weighting: false,
            ..Config::default()
        };

        let history = build_history_profile(&normalized, &signal, &config).unwrap();
        // Evenly spread tracks average to the middle of both scales
        assert!((history.profile.targets[0] - 0.5).abs() < 1e-9);
        assert!((history.profile.targets[1] - 0.5).abs() < 1e-9);
        assert_eq!(history.profile.weights, vec![1.0, 1.0]);
        assert_eq!(history.profile.strategy, Strategy::History);
    }

    #[test]
    fn test_history_signal_weights_shift_centroid() {
        let normalized = normalized_fixture();
        // Heavy weight on the fastest track pulls the tempo target upward
        let signal = UserSignal::from_weights(vec![
            ("t1".to_string(), 1.0),
            ("t2".to_string(), 1.0),
            ("t3".to_string(), 1.0),
            ("t4".to_string(), 1.0),
            ("t6".to_string(), 6.0),
        ]);
        let config = Config {
            variance_weighting: false,
            ..Config::default()
        };

        let history = build_history_profile(&normalized, &signal, &config).unwrap();
        // Weighted tempo centroid: (0 + 0.2 + 0.4 + 0.6 + 6*1.0) / 10 = 0.72
        assert!((history.profile.targets[0] - 0.72).abs() < 1e-9);
    }

    #[test]
    fn test_history_variance_damping_orders_importance() {
        let normalized = normalized_fixture();
        let signal = uniform_signal(&["t1", "t2", "t3", "t4", "t5", "t6"]);
        let config = Config::default();

        let history = build_history_profile(&normalized, &signal, &config).unwrap();
        // tempo and energy vary identically across the fixture, so their
        // damped importances coincide and stay below the uniform 1.0
        assert!(history.profile.weights[0] < 1.0);
        assert!((history.profile.weights[0] - history.profile.weights[1]).abs() < 1e-9);
    }

    #[test]
    fn test_history_unresolved_tracks_skipped_and_counted() {
        let normalized = normalized_fixture();
        let signal = uniform_signal(&["t1", "t2", "t3", "t4", "t5", "not_in_catalog"]);

        let history =
            build_history_profile(&normalized, &signal, &Config::default()).unwrap();
        assert_eq!(history.unresolved, 1);
    }

    #[test]
    fn test_history_insufficient_signal() {
        let normalized = normalized_fixture();
        let signal = uniform_signal(&["t1", "t2", "ghost_a", "ghost_b"]);

        let result = build_history_profile(&normalized, &signal, &Config::default());
        match result {
            Err(EngineError::InsufficientSignal {
                referenced,
                resolved,
                required,
            }) => {
                assert_eq!(referenced, 4);
                assert_eq!(resolved, 2);
                assert_eq!(required, 5);
            }
            other => panic!("expected InsufficientSignal, got {:?}", other),
        }
    }

    #[test]
    fn test_empty_history_signal() {
        let normalized = normalized_fixture();
        let result =
            build_history_profile(&normalized, &UserSignal::default(), &Config::default());
        assert!(matches!(
            result,
            Err(EngineError::InsufficientSignal { resolved: 0, .. })
        ));
    }

    #[test]
    fn test_preference_point_target() {
        let normalized = normalized_fixture();
        let mut spec = PreferenceSpec::new();
        // tempo 125 on a 100..150 scale normalizes to 0.5
        spec.set_point("tempo", 125.0, None);

        let profile = build_preference_profile(&normalized, &spec).unwrap();
        assert!((profile.targets[0] - 0.5).abs() < 1e-9);
        assert_eq!(profile.weights[0], 1.0);
        // energy was not declared: excluded from scoring
        assert_eq!(profile.weights[1], 0.0);
        assert_eq!(profile.strategy, Strategy::Preference);
    }

    #[test]
    fn test_preference_range_midpoint_and_width_importance() {
        let normalized = normalized_fixture();
        let mut spec = PreferenceSpec::new();
        // energy 0.6..0.8 normalizes to the same interval; midpoint 0.7,
        // width 0.2 implies importance 5.0
        spec.set_range("energy", 0.6, 0.8, None);

        let profile = build_preference_profile(&normalized, &spec).unwrap();
        let idx = normalized.table.index_of("energy").unwrap();
        assert!((profile.targets[idx] - 0.7).abs() < 1e-9);
        assert!((profile.weights[idx] - 5.0).abs() < 1e-9);
    }

    #[test]
    fn test_preference_explicit_weight_wins() {
        let normalized = normalized_fixture();
        let mut spec = PreferenceSpec::new();
        spec.set_range("energy", 0.2, 0.9, Some(3.5));

        let profile = build_preference_profile(&normalized, &spec).unwrap();
        let idx = normalized.table.index_of("energy").unwrap();
        assert_eq!(profile.weights[idx], 3.5);
    }

    #[test]
    fn test_preference_unknown_feature() {
        let normalized = normalized_fixture();
        let mut spec = PreferenceSpec::new();
        spec.set_point("loudness_db", -7.0, None);

        let result = build_preference_profile(&normalized, &spec);
        match result {
            Err(EngineError::InvalidSpec { feature, .. }) => {
                assert_eq!(feature, "loudness_db");
            }
            other => panic!("expected InvalidSpec, got {:?}", other),
        }
    }

    #[test]
    fn test_preference_empty_spec_rejected() {
        let normalized = normalized_fixture();
        let result = build_preference_profile(&normalized, &PreferenceSpec::new());
        assert!(matches!(result, Err(EngineError::InvalidSpec { .. })));
    }

    #[test]
    fn test_preference_negative_weight_rejected() {
        let normalized = normalized_fixture();
        let mut spec = PreferenceSpec::new();
        spec.set_point("tempo", 120.0, Some(-1.0));

        // A negative importance would drive the weighted distance sum below
        // zero and sqrt would hand every entry a NaN score
        let result = build_preference_profile(&normalized, &spec);
        match result {
            Err(EngineError::InvalidSpec { feature, .. }) => assert_eq!(feature, "tempo"),
            other => panic!("expected InvalidSpec, got {:?}", other),
        }
    }

    #[test]
    fn test_preference_zero_weight_rejected() {
        let normalized = normalized_fixture();
        let mut spec = PreferenceSpec::new();
        spec.set_range("energy", 0.2, 0.8, Some(0.0));

        assert!(matches!(
            build_preference_profile(&normalized, &spec),
            Err(EngineError::InvalidSpec { .. })
        ));
    }

    #[test]
    fn test_preference_inverted_range() {
        let normalized = normalized_fixture();
        let mut spec = PreferenceSpec::new();
        spec.set_range("energy", 0.9, 0.2, None);

        assert!(matches!(
            build_preference_profile(&normalized, &spec),
            Err(EngineError::InvalidSpec { .. })
        ));
    }
}
