use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::analysis::{
    AnalysisOptions, DeltaEThresholds, FontMatchOptions, LocateOptions, SampleOptions,
};
use crate::error::DtcError;
use crate::Result;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub sampling: SamplingConfig,
    pub regions: RegionsConfig,
    pub matching: MatchingConfig,
    pub clustering: ClusteringConfig,
    pub parallel: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SamplingConfig {
    pub stride: u32,
    pub alpha_cutoff: u8,
    pub max_colors: usize,
}

impl Default for SamplingConfig {
    fn default() -> Self {
        let d = SampleOptions::default();
        Self {
            stride: d.stride,
            alpha_cutoff: d.alpha_cutoff,
            max_colors: d.max_colors,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RegionsConfig {
    pub tolerance: f64,
    pub min_region_percent: f64,
    /// Buffers above this many pixels are downscaled before region location
    pub max_pixels: u64,
}

impl Default for RegionsConfig {
    fn default() -> Self {
        let d = LocateOptions::default();
        Self {
            tolerance: d.tolerance,
            min_region_percent: d.min_region_percent,
            max_pixels: 1_000_000,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct MatchingConfig {
    pub pass_threshold: f64,
    pub warn_threshold: f64,
    pub font_size_tolerance: f64,
}

impl Default for MatchingConfig {
    fn default() -> Self {
        let t = DeltaEThresholds::default();
        Self {
            pass_threshold: t.pass,
            warn_threshold: t.warn,
            font_size_tolerance: FontMatchOptions::default().size_tolerance,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ClusteringConfig {
    pub radius: f64,
}

impl Default for ClusteringConfig {
    fn default() -> Self {
        Self { radius: 30.0 }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            sampling: SamplingConfig::default(),
            regions: RegionsConfig::default(),
            matching: MatchingConfig::default(),
            clustering: ClusteringConfig::default(),
            parallel: false,
        }
    }
}

impl Config {
    /// `~/.config/dtc/config.toml`, when a home directory is known.
    pub fn central_config_path() -> Option<PathBuf> {
        std::env::var_os("HOME").map(|home| {
            PathBuf::from(home)
                .join(".config")
                .join("dtc")
                .join("config.toml")
        })
    }

    /// Priority: explicit path > central config > defaults.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(p) => Self::from_file(p),
            None => match Self::central_config_path() {
                Some(central) if central.is_file() => Self::from_file(&central),
                _ => Ok(Self::default()),
            },
        }
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(DtcError::Config(format!("File not found: {}", path.display())));
        }
        let source = fs::read_to_string(path)?;
        Self::from_toml(&source)
    }

    pub fn from_toml(source: &str) -> Result<Self> {
        toml::from_str(source).map_err(|e| DtcError::Config(e.to_string()))
    }

    pub fn validate(&self) -> Result<()> {
        let fail = |msg: String| Err(DtcError::Config(msg));

        if self.sampling.stride == 0 {
            return fail("sampling.stride must be at least 1".to_string());
        }
        if self.sampling.max_colors == 0 {
            return fail("sampling.max_colors must be at least 1".to_string());
        }
        if !(self.regions.tolerance >= 0.0) {
            return fail(format!(
                "regions.tolerance must be non-negative, got {}",
                self.regions.tolerance
            ));
        }
        if !(0.0..=100.0).contains(&self.regions.min_region_percent) {
            return fail(format!(
                "regions.min_region_percent must be within 0-100, got {}",
                self.regions.min_region_percent
            ));
        }
        if self.regions.max_pixels == 0 {
            return fail("regions.max_pixels must be at least 1".to_string());
        }
        let m = &self.matching;
        if !(m.pass_threshold >= 0.0) || !(m.warn_threshold >= 0.0) {
            return fail(format!(
                "matching thresholds must be non-negative (pass threshold {}, warn threshold {})",
                m.pass_threshold, m.warn_threshold
            ));
        }
        if m.pass_threshold > m.warn_threshold {
            return fail(format!(
                "pass threshold {} exceeds warn threshold {}",
                m.pass_threshold, m.warn_threshold
            ));
        }
        if !(m.font_size_tolerance >= 0.0) {
            return fail(format!(
                "matching.font_size_tolerance must be non-negative, got {}",
                m.font_size_tolerance
            ));
        }
        if !(self.clustering.radius >= 0.0) {
            return fail(format!(
                "clustering.radius must be non-negative, got {}",
                self.clustering.radius
            ));
        }
        Ok(())
    }

    pub fn analysis_options(&self) -> AnalysisOptions {
        AnalysisOptions {
            sample: SampleOptions {
                stride: self.sampling.stride,
                alpha_cutoff: self.sampling.alpha_cutoff,
                max_colors: self.sampling.max_colors,
            },
            locate: LocateOptions {
                tolerance: self.regions.tolerance,
                min_region_percent: self.regions.min_region_percent,
            },
            thresholds: DeltaEThresholds {
                pass: self.matching.pass_threshold,
                warn: self.matching.warn_threshold,
            },
            font: FontMatchOptions {
                size_tolerance: self.matching.font_size_tolerance,
            },
            cluster_radius: self.clustering.radius,
            max_locate_pixels: Some(self.regions.max_pixels),
            parallel: self.parallel,
        }
    }
}
