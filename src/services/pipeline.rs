use std::collections::HashSet;
use std::time::Instant;

use chrono::Utc;
use uuid::Uuid;

use crate::{
    config::Config,
    error::EngineResult,
    models::{Catalog, ComparisonReport, RankedList, RunMetadata, UserSignal},
    services::{
        catalog_builder::build_catalog,
        comparator::compare_rankings,
        normalizer::normalize_catalog,
        profiles::{build_history_profile, build_preference_profile},
        ranker::rank_tracks,
        sources::RecordSource,
    },
};

/// Everything one pipeline run produces
#[derive(Debug, Clone, PartialEq)]
pub struct PipelineOutput {
    pub catalog: Catalog,
    pub history_list: RankedList,
    pub preference_list: RankedList,
    pub report: ComparisonReport,
    pub meta: RunMetadata,
}

/// Runs the full recommendation comparison once for one user
///
/// Catalog build → single normalization → both profiles → two rankings over
/// the same immutable normalized catalog → comparison. Tracks referenced by
/// the listening history count as already known and are excluded from both
/// rankings. Any stage error propagates unchanged; there are no retries and
/// no partial results.
pub fn run_pipeline(source: &dyn RecordSource, config: &Config) -> EngineResult<PipelineOutput> {
    let start = Instant::now();
    tracing::info!(source = source.name(), "Starting recommendation run");

    // 1. Materialize raw records from the collaborator.
    let tracks = source.tracks()?;
    let audio_features = source.audio_features()?;
    let artists = source.artists()?;
    let play_history = source.play_history()?;
    let preference_spec = source.preference_spec()?;

    // 2. Build and normalize the catalog exactly once; the attached table is
    //    the only normalization authority for this run.
    let catalog = build_catalog(&tracks, &audio_features, &artists, config)?;
    let normalized = normalize_catalog(&catalog, &config.features)?;

    // 3. Derive the history signal and both profiles.
    let signal = UserSignal::from_play_events(
        &play_history,
        Utc::now(),
        config.recency_half_life_days,
    );
    let history = build_history_profile(&normalized, &signal, config)?;
    let preference_profile = build_preference_profile(&normalized, &preference_spec)?;

    // 4. Rank both strategies against the same immutable catalog, excluding
    //    tracks the user already knows from the listening log.
    let known: HashSet<String> = signal.track_ids().map(str::to_string).collect();
    let top_n = Some(config.top_n);
    let history_list = rank_tracks(&normalized, &history.profile, &known, top_n);
    let preference_list = rank_tracks(&normalized, &preference_profile, &known, top_n);

    // 5. Reconcile.
    let report = compare_rankings(&history_list, &preference_list, config)?;

    let meta = RunMetadata {
        run_id: Uuid::new_v4(),
        generated_at: Utc::now(),
        catalog_tracks: catalog.len(),
        dropped_missing_features: catalog.stats.dropped_missing_features,
        excluded_incomplete: normalized.excluded_incomplete,
        signal_unresolved: history.unresolved,
        history_list_len: history_list.len(),
        preference_list_len: preference_list.len(),
    };

    tracing::info!(
        run_id = %meta.run_id,
        catalog_tracks = meta.catalog_tracks,
        overlap_count = report.overlap_count,
        processing_time_ms = start.elapsed().as_millis(),
        "Recommendation run completed"
    );

    Ok(PipelineOutput {
        catalog,
        history_list,
        preference_list,
        report,
        meta,
    })
}
