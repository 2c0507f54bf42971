use std::path::Path;

use dtc_lib::{AnalysisOptions, Config, DtcError, SampleOptions};
use tracing::debug;

use crate::cli::{MatchingFlags, SamplingFlags};

/// Load config from a TOML file, central config, or return defaults.
/// Priority: explicit path > ~/.config/dtc/config.toml > defaults
pub fn load_config(path: Option<&Path>) -> Result<Config, DtcError> {
    let cfg = Config::load(path).map_err(|e| {
        let loc = path
            .map(|p| p.display().to_string())
            .or_else(|| Config::central_config_path().map(|p| p.display().to_string()))
            .unwrap_or_else(|| "defaults".to_string());
        match e {
            // keep "File not found" intact so the payload hint still applies
            DtcError::Config(msg) if msg.starts_with("File not found") => DtcError::Config(msg),
            DtcError::Config(msg) => DtcError::Config(format!("Failed to read config {}: {}", loc, msg)),
            other => DtcError::Config(format!("Failed to read config {}: {}", loc, other)),
        }
    })?;

    cfg.validate().map_err(|e| invalid_config(path, e))?;
    Ok(cfg)
}

fn invalid_config(path: Option<&Path>, err: DtcError) -> DtcError {
    let detail = match err {
        DtcError::Config(msg) => msg,
        other => other.to_string(),
    };
    let message = path
        .map(|p| format!("Invalid config ({}): {}", p.display(), detail))
        .unwrap_or_else(|| format!("Invalid config: {}", detail));
    DtcError::Config(message)
}

/// Overlay explicitly given CLI flags on the config document.
pub fn apply_overrides(
    config: &Config,
    sampling: &SamplingFlags,
    matching: &MatchingFlags,
    parallel: bool,
) -> Config {
    let mut merged = config.clone();

    merged.sampling.stride = sampling.stride.unwrap_or(config.sampling.stride);
    merged.sampling.alpha_cutoff = sampling.alpha_cutoff.unwrap_or(config.sampling.alpha_cutoff);
    merged.sampling.max_colors = sampling.max_colors.unwrap_or(config.sampling.max_colors);

    merged.regions.tolerance = matching.tolerance.unwrap_or(config.regions.tolerance);
    merged.regions.min_region_percent = matching
        .min_region_percent
        .unwrap_or(config.regions.min_region_percent);
    merged.regions.max_pixels = matching.max_pixels.unwrap_or(config.regions.max_pixels);

    merged.matching.pass_threshold = matching
        .pass_threshold
        .unwrap_or(config.matching.pass_threshold);
    merged.matching.warn_threshold = matching
        .warn_threshold
        .unwrap_or(config.matching.warn_threshold);
    merged.matching.font_size_tolerance = matching
        .font_size_tolerance
        .unwrap_or(config.matching.font_size_tolerance);

    merged.clustering.radius = matching.cluster_radius.unwrap_or(config.clustering.radius);
    merged.parallel = parallel || config.parallel;

    merged
}

/// Merge CLI flags with config and validate the result.
pub fn resolve_analysis_options(
    config: &Config,
    sampling: &SamplingFlags,
    matching: &MatchingFlags,
    parallel: bool,
) -> Result<AnalysisOptions, DtcError> {
    let merged = apply_overrides(config, sampling, matching, parallel);
    merged.validate().map_err(invalid_settings)?;
    Ok(merged.analysis_options())
}

/// Sampling options only, for commands that never match tokens.
pub fn resolve_sample_options(
    config: &Config,
    sampling: &SamplingFlags,
) -> Result<SampleOptions, DtcError> {
    resolve_analysis_options(config, sampling, &MatchingFlags::default(), false)
        .map(|options| options.sample)
}

fn invalid_settings(err: DtcError) -> DtcError {
    match err {
        DtcError::Config(msg) => DtcError::Config(format!("Invalid settings: {}", msg)),
        other => other,
    }
}

/// Log effective options (visible with --verbose).
pub fn log_effective_config(config_path: Option<&Path>, options: &AnalysisOptions) {
    debug!("{}", format_effective_config(options, config_path));
}

/// Format effective options as a single-line string.
pub fn format_effective_config(options: &AnalysisOptions, config_source: Option<&Path>) -> String {
    let source = config_source
        .map(|p| p.display().to_string())
        .unwrap_or_else(|| "defaults".to_string());
    let max_pixels = options
        .max_locate_pixels
        .map(|p| p.to_string())
        .unwrap_or_else(|| "off".to_string());
    format!(
        "Effective config [{source}]: sampling: stride={}, alpha_cutoff={}, max_colors={}, regions: tolerance={:.1}, min_region_percent={:.2}, max_pixels={}, matching: pass={:.1}, warn={:.1}, font_size_tolerance={:.1}, cluster_radius={:.1}, parallel={}",
        options.sample.stride,
        options.sample.alpha_cutoff,
        options.sample.max_colors,
        options.locate.tolerance,
        options.locate.min_region_percent,
        max_pixels,
        options.thresholds.pass,
        options.thresholds.warn,
        options.font.size_tolerance,
        options.cluster_radius,
        options.parallel,
    )
}
