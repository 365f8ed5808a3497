use std::collections::HashSet;

use crate::models::{NormalizedCatalog, Profile, RankedEntry, RankedList};

/// Scores every non-excluded catalog track against a profile
///
/// The similarity score is the negative weighted Euclidean distance between
/// the track's normalized vector and the profile's target vector; features
/// with zero importance contribute no distance. Pure function of its inputs:
/// identical (catalog, profile, exclusions) produce byte-identical lists,
/// which the comparator's reproducibility rests on.
pub fn rank_tracks(
    normalized: &NormalizedCatalog,
    profile: &Profile,
    exclude: &HashSet<String>,
    top_n: Option<usize>,
) -> RankedList {
    let mut entries: Vec<RankedEntry> = normalized
        .tracks
        .values()
        .filter(|track| !exclude.contains(&track.id))
        .map(|track| RankedEntry {
            track_id: track.id.clone(),
            name: track.name.clone(),
            artist_name: track.artist.name.clone(),
            genres: track.artist.genres.clone(),
            score: similarity_score(&track.values, profile),
            rank: 0,
        })
        .collect();

    // Descending score; ascending track id breaks ties deterministically.
    entries.sort_by(|a, b| {
        b.score
            .partial_cmp(&a.score)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then_with(|| a.track_id.cmp(&b.track_id))
    });

    if let Some(n) = top_n {
        entries.truncate(n);
    }

    for (position, entry) in entries.iter_mut().enumerate() {
        entry.rank = position + 1;
    }

    tracing::debug!(
        strategy = %profile.strategy,
        candidates = normalized.len(),
        excluded = exclude.len(),
        returned = entries.len(),
        "Ranking complete"
    );

    RankedList {
        strategy: profile.strategy,
        requested_top_n: top_n,
        entries,
    }
}

/// Negative weighted Euclidean distance; 0.0 is a perfect match
fn similarity_score(values: &[f64], profile: &Profile) -> f64 {
    let sum: f64 = values
        .iter()
        .zip(profile.targets.iter())
        .zip(profile.weights.iter())
        .map(|((value, target), weight)| {
            let delta = value - target;
            weight * delta * delta
        })
        .sum();
    -sum.sqrt()
}
