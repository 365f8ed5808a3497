//! Record source abstraction
//!
//! The engine never touches the network or parses file formats itself; an
//! upstream collaborator materializes the raw record collections and hands
//! them over through this trait. Implementations stay synchronous because
//! the engine is a pure, in-memory transformation.

use crate::{
    error::EngineResult,
    models::{PlayEvent, PreferenceSpec, RawArtist, RawAudioFeatures, RawTrack},
};

pub mod json_files;

pub use json_files::JsonFileSource;

/// Trait for already-materialized user data sources
#[cfg_attr(test, mockall::automock)]
pub trait RecordSource {
    /// Raw track records (id, name, artist reference)
    fn tracks(&self) -> EngineResult<Vec<RawTrack>>;

    /// Raw per-track audio feature records
    fn audio_features(&self) -> EngineResult<Vec<RawAudioFeatures>>;

    /// Raw artist dimension records
    fn artists(&self) -> EngineResult<Vec<RawArtist>>;

    /// The listening log the history strategy derives its signal from
    fn play_history(&self) -> EngineResult<Vec<PlayEvent>>;

    /// The declared preference specification
    fn preference_spec(&self) -> EngineResult<PreferenceSpec>;

    /// Source name for logging and debugging
    fn name(&self) -> &'static str;
}
