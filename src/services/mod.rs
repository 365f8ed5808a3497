pub mod catalog_builder;
pub mod comparator;
pub mod normalizer;
pub mod pipeline;
pub mod profiles;
pub mod ranker;
pub mod sources;
