use std::collections::{BTreeMap, HashMap};

use crate::{
    config::Config,
    error::{EngineError, EngineResult},
    models::{Artist, Catalog, CatalogStats, CatalogTrack, RawArtist, RawAudioFeatures, RawTrack},
};

/// Joins the three raw record collections into one deduplicated catalog
///
/// Tracks are inner-joined with audio features (a track without a feature
/// record is dropped and counted) and left-joined with the artist dimension
/// (an unresolvable artist becomes the "Unknown" placeholder). The result is
/// immutable once built; rebuilding replaces it wholesale.
pub fn build_catalog(
    tracks: &[RawTrack],
    audio_features: &[RawAudioFeatures],
    artists: &[RawArtist],
    config: &Config,
) -> EngineResult<Catalog> {
    if tracks.is_empty() {
        return Err(EngineError::DataIntegrity {
            reason: "raw track collection is empty".to_string(),
            tracks_total: 0,
            tracks_dropped: 0,
        });
    }

    // 1. Index the dimension tables. First record wins on duplicate keys so
    //    a malformed upstream export cannot flip the join nondeterministically.
    let mut features_by_track: HashMap<&str, &RawAudioFeatures> = HashMap::new();
    for features in audio_features {
        features_by_track
            .entry(features.track_id.as_str())
            .or_insert(features);
    }

    let mut artists_by_id: HashMap<&str, &RawArtist> = HashMap::new();
    for artist in artists {
        artists_by_id.entry(artist.id.as_str()).or_insert(artist);
    }

    // 2. Dedup tracks and perform the joins.
    let mut stats = CatalogStats {
        raw_tracks: tracks.len(),
        ..CatalogStats::default()
    };
    let mut joined: BTreeMap<String, CatalogTrack> = BTreeMap::new();

    for track in tracks {
        if joined.contains_key(&track.id) {
            stats.duplicate_tracks += 1;
            continue;
        }

        let Some(features) = features_by_track.get(track.id.as_str()) else {
            stats.dropped_missing_features += 1;
            continue;
        };

        let artist = match artists_by_id.get(track.artist_id.as_str()) {
            Some(raw) => Artist {
                id: raw.id.clone(),
                name: raw.name.clone(),
                genres: raw.genres.clone(),
                popularity: raw.popularity,
            },
            None => {
                stats.placeholder_artists += 1;
                Artist::unknown(track.artist_id.clone())
            }
        };

        joined.insert(
            track.id.clone(),
            CatalogTrack {
                id: track.id.clone(),
                name: track.name.clone(),
                artist,
                features: features.values.clone(),
                popularity: track.popularity,
            },
        );
    }

    // 3. A high drop rate means the upstream feature fetch failed, not a
    //    normal gap; surface it instead of returning a hollow catalog.
    let unique_tracks = stats.raw_tracks - stats.duplicate_tracks;
    let dropped_ratio = stats.dropped_missing_features as f64 / unique_tracks as f64;
    if dropped_ratio > config.max_missing_feature_ratio {
        return Err(EngineError::DataIntegrity {
            reason: format!(
                "{:.0}% of tracks lack audio features (threshold {:.0}%)",
                dropped_ratio * 100.0,
                config.max_missing_feature_ratio * 100.0
            ),
            tracks_total: unique_tracks,
            tracks_dropped: stats.dropped_missing_features,
        });
    }

    if stats.dropped_missing_features > 0 || stats.placeholder_artists > 0 {
        tracing::warn!(
            dropped_missing_features = stats.dropped_missing_features,
            placeholder_artists = stats.placeholder_artists,
            "Catalog join left gaps"
        );
    }

    tracing::info!(
        catalog_tracks = joined.len(),
        raw_tracks = stats.raw_tracks,
        duplicates = stats.duplicate_tracks,
        "Catalog built"
    );

    Ok(Catalog {
        tracks: joined,
        stats,
    })
}
