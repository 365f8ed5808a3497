/// Engine-level errors
///
/// Every variant carries enough context (counts, offending identifiers) for
/// the caller to decide whether to relax a threshold, skip a strategy, or
/// abort the run. None of these are retried internally: they indicate
/// structural input problems, not transient faults.
#[derive(thiserror::Error, Debug)]
pub enum EngineError {
    /// Catalog construction received insufficient or malformed source data.
    #[error("data integrity failure: {reason} ({tracks_total} raw tracks, {tracks_dropped} dropped)")]
    DataIntegrity {
        reason: String,
        tracks_total: usize,
        tracks_dropped: usize,
    },

    /// The history profile cannot be built from too few resolvable tracks.
    /// Callers may fall back to the preference strategy alone.
    #[error("insufficient history signal: {resolved} of {referenced} referenced tracks resolved, need at least {required}")]
    InsufficientSignal {
        referenced: usize,
        resolved: usize,
        required: usize,
    },

    /// The preference specification references a feature the normalization
    /// table does not know, or states an impossible target.
    #[error("invalid preference spec for feature \"{feature}\": {reason}")]
    InvalidSpec { feature: String, reason: String },

    /// The comparator was handed lists it cannot meaningfully compare.
    #[error("rankings are not comparable: {reason}")]
    IncomparableInput { reason: String },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse input records: {0}")]
    Parse(#[from] serde_json::Error),
}

pub type EngineResult<T> = Result<T, EngineError>;
