use std::collections::BTreeMap;

use crate::{
    error::{EngineError, EngineResult},
    models::{Catalog, FeatureRange, NormalizationTable, NormalizedCatalog, NormalizedTrack},
};

/// Projects the catalog onto a common [0,1] feature scale
///
/// Min-max scaling is used rather than z-scores because declared preferences
/// arrive as intuitive target values and ranges on the original scale, and
/// min-max keeps the decode of those targets a simple linear map. The
/// returned table is the single normalization authority for the run: both
/// profile builders must decode through it.
pub fn normalize_catalog(
    catalog: &Catalog,
    feature_names: &[String],
) -> EngineResult<NormalizedCatalog> {
    if feature_names.is_empty() {
        return Err(EngineError::DataIntegrity {
            reason: "no features declared for normalization".to_string(),
            tracks_total: catalog.len(),
            tracks_dropped: 0,
        });
    }

    // 1. Keep only tracks that carry every declared feature. A missing value
    //    must exclude the track from ranking, never default to something.
    let mut complete: Vec<&crate::models::CatalogTrack> = Vec::new();
    let mut excluded_incomplete = 0usize;
    for track in catalog.tracks.values() {
        if feature_names.iter().all(|f| track.features.contains_key(f)) {
            complete.push(track);
        } else {
            excluded_incomplete += 1;
        }
    }

    if complete.is_empty() {
        return Err(EngineError::DataIntegrity {
            reason: format!(
                "no catalog track carries all {} declared features",
                feature_names.len()
            ),
            tracks_total: catalog.len(),
            tracks_dropped: excluded_incomplete,
        });
    }

    // 2. Min/max statistics per feature over the complete tracks.
    let mut ranges = Vec::with_capacity(feature_names.len());
    for feature in feature_names {
        let mut min = f64::INFINITY;
        let mut max = f64::NEG_INFINITY;
        for track in &complete {
            let value = track.features[feature];
            min = min.min(value);
            max = max.max(value);
        }
        let constant = max == min;
        if constant {
            tracing::warn!(feature = %feature, value = min, "Zero-variance feature, passing through as 0.5");
        }
        ranges.push(FeatureRange { min, max, constant });
    }

    let table = NormalizationTable::new(feature_names.to_vec(), ranges);

    // 3. Rescale every track onto the table.
    let mut tracks: BTreeMap<String, NormalizedTrack> = BTreeMap::new();
    for track in &complete {
        let values: Vec<f64> = feature_names
            .iter()
            .enumerate()
            .map(|(idx, feature)| table.normalize(idx, track.features[feature]))
            .collect();
        tracks.insert(
            track.id.clone(),
            NormalizedTrack {
                id: track.id.clone(),
                name: track.name.clone(),
                artist: track.artist.clone(),
                popularity: track.popularity,
                values,
            },
        );
    }

    tracing::info!(
        normalized_tracks = tracks.len(),
        excluded_incomplete,
        features = feature_names.len(),
        "Catalog normalized"
    );

    Ok(NormalizedCatalog {
        tracks,
        table,
        excluded_incomplete,
    })
}
