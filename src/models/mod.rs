mod catalog;
mod features;
mod profile;
mod ranking;
mod records;
mod signal;

pub use catalog::{Artist, Catalog, CatalogStats, CatalogTrack};
pub use features::{FeatureRange, NormalizationTable, NormalizedCatalog, NormalizedTrack};
pub use profile::{Profile, Strategy};
pub use ranking::{ComparisonReport, DiversityStats, RankedEntry, RankedList, RunMetadata};
pub use records::{RawArtist, RawAudioFeatures, RawTrack};
pub use signal::{FeatureTarget, PlayEvent, PreferenceSpec, SignalEntry, TargetValue, UserSignal};
