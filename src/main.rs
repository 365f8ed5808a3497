use std::fs;
use std::path::Path;

use anyhow::Context;
use serde::Serialize;
use tracing_subscriber::EnvFilter;

use tunescout::{
    services::{pipeline::run_pipeline, sources::JsonFileSource},
    Config,
};

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let config = Config::from_env()?;
    let source = JsonFileSource::new(&config.input_dir);

    let output = run_pipeline(&source, &config)
        .with_context(|| format!("recommendation run over {} failed", config.input_dir))?;

    let out_dir = Path::new(&config.output_dir);
    fs::create_dir_all(out_dir)?;

    write_json(out_dir, "catalog.json", &output.catalog)?;
    write_json(out_dir, "recs_history.json", &output.history_list)?;
    write_json(out_dir, "recs_preference.json", &output.preference_list)?;
    write_json(out_dir, "comparison.json", &output.report)?;
    write_json(out_dir, "run_meta.json", &output.meta)?;

    tracing::info!(
        output_dir = %out_dir.display(),
        overlap_count = output.report.overlap_count,
        overlap_ratio = output.report.overlap_ratio,
        "Artifacts written"
    );

    Ok(())
}

fn write_json<T: Serialize>(dir: &Path, file: &str, value: &T) -> anyhow::Result<()> {
    let path = dir.join(file);
    let text = serde_json::to_string_pretty(value)?;
    fs::write(&path, text).with_context(|| format!("writing {}", path.display()))?;
    Ok(())
}
