use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;

use super::RecordSource;
use crate::{
    error::EngineResult,
    models::{PlayEvent, PreferenceSpec, RawArtist, RawAudioFeatures, RawTrack},
};

/// Record source backed by a directory of JSON files
///
/// Expects one file per collection: `tracks.json`, `audio_features.json`,
/// `artists.json`, `play_history.json`, and `preferences.json`. Only
/// `artists.json` and `play_history.json` are optional: missing artists
/// resolve to the placeholder artist during the catalog join, and an absent
/// listening log yields an empty signal the history profile builder rejects
/// as insufficient. The rest must exist; in particular an absent preference
/// file is an error, never an empty specification.
pub struct JsonFileSource {
    dir: PathBuf,
}

impl JsonFileSource {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    fn load<T: DeserializeOwned>(&self, file: &str) -> EngineResult<T> {
        let text = std::fs::read_to_string(self.dir.join(file))?;
        Ok(serde_json::from_str(&text)?)
    }

    fn load_or_default<T: DeserializeOwned + Default>(&self, file: &str) -> EngineResult<T> {
        if !self.dir.join(file).exists() {
            tracing::debug!(file, "Optional input file absent, using empty default");
            return Ok(T::default());
        }
        self.load(file)
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

impl RecordSource for JsonFileSource {
    fn tracks(&self) -> EngineResult<Vec<RawTrack>> {
        self.load("tracks.json")
    }

    fn audio_features(&self) -> EngineResult<Vec<RawAudioFeatures>> {
        self.load("audio_features.json")
    }

    fn artists(&self) -> EngineResult<Vec<RawArtist>> {
        self.load_or_default("artists.json")
    }

    fn play_history(&self) -> EngineResult<Vec<PlayEvent>> {
        self.load_or_default("play_history.json")
    }

    fn preference_spec(&self) -> EngineResult<PreferenceSpec> {
        self.load("preferences.json")
    }

    fn name(&self) -> &'static str {
        "json_files"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn write(dir: &Path, file: &str, content: &str) {
        std::fs::write(dir.join(file), content).unwrap();
    }

    #[test]
    fn test_loads_collections_from_directory() {
        let dir = tempfile::tempdir().unwrap();
        write(
            dir.path(),
            "tracks.json",
            r#"[{"id": "t1", "name": "Song", "artist_id": "a1"}]"#,
        );
        write(
            dir.path(),
            "audio_features.json",
            r#"[{"track_id": "t1", "tempo": 120.0, "energy": 0.8}]"#,
        );
        write(
            dir.path(),
            "artists.json",
            r#"[{"id": "a1", "name": "Band", "genres": ["shoegaze"]}]"#,
        );

        let source = JsonFileSource::new(dir.path());
        let tracks = source.tracks().unwrap();
        assert_eq!(tracks.len(), 1);
        assert_eq!(tracks[0].id, "t1");

        let features = source.audio_features().unwrap();
        assert_eq!(features[0].values.get("tempo"), Some(&120.0));

        let artists = source.artists().unwrap();
        assert_eq!(artists[0].genres, vec!["shoegaze".to_string()]);
    }

    #[test]
    fn test_optional_files_default_to_empty() {
        let dir = tempfile::tempdir().unwrap();
        let source = JsonFileSource::new(dir.path());

        assert!(source.artists().unwrap().is_empty());
        assert!(source.play_history().unwrap().is_empty());
    }

    #[test]
    fn test_missing_preferences_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let source = JsonFileSource::new(dir.path());

        assert!(matches!(
            source.preference_spec(),
            Err(crate::error::EngineError::Io(_))
        ));
    }

    #[test]
    fn test_missing_required_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let source = JsonFileSource::new(dir.path());

        assert!(matches!(
            source.tracks(),
            Err(crate::error::EngineError::Io(_))
        ));
    }

    #[test]
    fn test_malformed_json_is_parse_error() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "tracks.json", "not json at all");
        let source = JsonFileSource::new(dir.path());

        assert!(matches!(
            source.tracks(),
            Err(crate::error::EngineError::Parse(_))
        ));
    }
}
