use std::collections::{HashMap, HashSet};

use crate::{
    config::Config,
    error::{EngineError, EngineResult},
    models::{ComparisonReport, DiversityStats, RankedEntry, RankedList},
};

/// Reconciles the two strategies' ranked lists into an agreement analysis
///
/// Membership agreement is the overlap ratio (intersection over union of the
/// two track sets). Ordering agreement is Spearman's rho over the shared
/// subset: when both strategies like a track, do they agree on how much?
/// Exclusive picks are reported per side, capped for the downstream report,
/// along with per-side diversity stats (artist spread, genre distribution).
pub fn compare_rankings(
    history: &RankedList,
    preference: &RankedList,
    config: &Config,
) -> EngineResult<ComparisonReport> {
    if history.is_empty() || preference.is_empty() {
        return Err(EngineError::IncomparableInput {
            reason: format!(
                "empty ranked list (history: {} entries, preference: {} entries)",
                history.len(),
                preference.len()
            ),
        });
    }
    if history.requested_top_n != preference.requested_top_n {
        return Err(EngineError::IncomparableInput {
            reason: format!(
                "lists were requested at different top-N ({:?} vs {:?})",
                history.requested_top_n, preference.requested_top_n
            ),
        });
    }

    let history_ids: HashSet<&str> = history.track_ids().collect();
    let preference_ids: HashSet<&str> = preference.track_ids().collect();

    let overlap: HashSet<&str> = history_ids.intersection(&preference_ids).copied().collect();
    let union_size = history_ids.union(&preference_ids).count();
    let overlap_ratio = overlap.len() as f64 / union_size as f64;

    let rank_correlation = spearman_rho(history, preference, &overlap);

    let history_only = exclusive_entries(history, &preference_ids, config.exclusive_cap);
    let preference_only = exclusive_entries(preference, &history_ids, config.exclusive_cap);

    let history_diversity = diversity_stats(history);
    let preference_diversity = diversity_stats(preference);

    tracing::info!(
        overlap_count = overlap.len(),
        overlap_ratio,
        rank_correlation = ?rank_correlation,
        history_only = history_only.len(),
        preference_only = preference_only.len(),
        history_unique_artists = history_diversity.unique_artists,
        preference_unique_artists = preference_diversity.unique_artists,
        "Rankings compared"
    );

    Ok(ComparisonReport {
        overlap_count: overlap.len(),
        overlap_ratio,
        rank_correlation,
        history_only,
        preference_only,
        history_diversity,
        preference_diversity,
    })
}

/// Spearman's rho over the shared tracks' relative orderings
///
/// Shared tracks are re-ranked 1..n within each list (their global positions
/// would inflate distances for tracks ranked far apart), and the tie-free
/// formula `1 - 6 * sum(d^2) / (n * (n^2 - 1))` applies since ranks within a
/// list are unique. Undefined below two shared tracks.
fn spearman_rho(left: &RankedList, right: &RankedList, shared: &HashSet<&str>) -> Option<f64> {
    let n = shared.len();
    if n < 2 {
        return None;
    }

    let subset_ranks = |list: &RankedList| -> HashMap<String, usize> {
        list.entries
            .iter()
            .filter(|e| shared.contains(e.track_id.as_str()))
            .enumerate()
            .map(|(i, e)| (e.track_id.clone(), i + 1))
            .collect()
    };

    let left_ranks = subset_ranks(left);
    let right_ranks = subset_ranks(right);

    let mut d_squared_sum = 0.0;
    for (track_id, left_rank) in &left_ranks {
        let right_rank = right_ranks[track_id];
        let d = *left_rank as f64 - right_rank as f64;
        d_squared_sum += d * d;
    }

    let n = n as f64;
    Some(1.0 - 6.0 * d_squared_sum / (n * (n * n - 1.0)))
}

/// Artist spread and genre distribution of one list's picks
///
/// Genre counts are per entry, so a genre shared by several picks counts
/// once per pick. Sorted by descending count, ties alphabetically.
fn diversity_stats(list: &RankedList) -> DiversityStats {
    let unique_artists = list
        .entries
        .iter()
        .map(|e| e.artist_name.as_str())
        .collect::<HashSet<&str>>()
        .len();

    let mut counts: HashMap<&str, usize> = HashMap::new();
    for entry in &list.entries {
        for genre in &entry.genres {
            *counts.entry(genre.as_str()).or_insert(0) += 1;
        }
    }
    let mut genre_distribution: Vec<(String, usize)> = counts
        .into_iter()
        .map(|(genre, count)| (genre.to_string(), count))
        .collect();
    genre_distribution.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));

    DiversityStats {
        unique_artists,
        genre_distribution,
    }
}

/// Entries of `list` absent from `other_ids`, in rank order, capped
fn exclusive_entries(
    list: &RankedList,
    other_ids: &HashSet<&str>,
    cap: usize,
) -> Vec<RankedEntry> {
    list.entries
        .iter()
        .filter(|e| !other_ids.contains(e.track_id.as_str()))
        .take(cap)
        .cloned()
        .collect()
}
