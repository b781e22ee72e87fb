//! Control presets loaded from TOML
//!
//! ```toml
//! sync_ratio = 3.2
//! release_ms = 800
//! ```
//!
//! Missing keys fall back to their defaults; out-of-range values are clamped.

use std::{fs, path::Path};

use color_eyre::eyre::{Result as EyreResult, WrapErr};
use hardsync::SynthParams;

pub fn load_params(path: &Path) -> EyreResult<SynthParams> {
    let contents = fs::read_to_string(path)
        .wrap_err_with(|| format!("failed to read config {}", path.display()))?;
    let params = parse_params(&contents)
        .wrap_err_with(|| format!("invalid config {}", path.display()))?;

    tracing::info!(path = %path.display(), "loaded control preset");
    Ok(params)
}

fn parse_params(contents: &str) -> EyreResult<SynthParams> {
    let params: SynthParams = toml::from_str(contents)?;
    Ok(params.clamped())
}
