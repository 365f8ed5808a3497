//! tunescout: personal music catalog and recommendation comparison engine
//!
//! Builds a deduplicated track catalog from a streaming service's exported
//! user data, derives two independent taste profiles (listening history vs.
//! declared preferences), ranks the catalog against each, and reconciles the
//! two ranked lists into an agreement report.
//!
//! The engine is a pure library: fetching, pagination, and report rendering
//! belong to collaborators, which hand in already-materialized records
//! through [`services::sources::RecordSource`].

pub mod config;
pub mod error;
pub mod models;
pub mod services;

pub use config::Config;
pub use error::{EngineError, EngineResult};
