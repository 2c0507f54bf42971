use std::num::NonZeroUsize;
use std::thread;

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::clustering::cluster_markers;
use super::color_science::DeltaEThresholds;
use super::issues::generate_issues;
use super::matcher::{match_font, ColorTokenIndex, FontMatchOptions};
use super::regions::{
    downscale_buffer, locate_color, locate_regions, rescale_region, LocateOptions,
};
use super::sampler::{sample_colors, SampleOptions};
use crate::error::DtcError;
use crate::types::{
    ClusteredIssues, ColorMatch, FontMatch, LocatedColor, MatchStatus, PixelBuffer,
    SampledColor, TokenSet, TypographyDescriptor,
};
use crate::Result;

/// Everything one engine call needs besides its inputs.
#[derive(Debug, Clone, PartialEq)]
pub struct AnalysisOptions {
    pub sample: SampleOptions,
    pub locate: LocateOptions,
    pub thresholds: DeltaEThresholds,
    pub font: FontMatchOptions,
    /// Max marker distance (pixels) for two issues to share a cluster
    pub cluster_radius: f64,
    /// Buffers larger than this are downscaled before region location
    pub max_locate_pixels: Option<u64>,
    /// Locate palette colors on scoped worker threads
    pub parallel: bool,
}

impl Default for AnalysisOptions {
    fn default() -> Self {
        Self {
            sample: SampleOptions::default(),
            locate: LocateOptions::default(),
            thresholds: DeltaEThresholds::default(),
            font: FontMatchOptions::default(),
            cluster_radius: 30.0,
            max_locate_pixels: Some(1_000_000),
            parallel: false,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisSummary {
    pub colors_sampled: usize,
    /// Match counts by status, colors and fonts together
    pub failures: usize,
    pub warnings: usize,
    pub passes: usize,
    pub issues: usize,
    pub clusters: usize,
    pub standalone: usize,
}

impl AnalysisSummary {
    fn from_parts(
        palette: &[SampledColor],
        color_matches: &[ColorMatch],
        font_matches: &[FontMatch],
        issues: &ClusteredIssues,
    ) -> Self {
        let mut summary = Self {
            colors_sampled: palette.len(),
            issues: issues.issue_count(),
            clusters: issues.clusters.len(),
            standalone: issues.standalone.len(),
            ..Self::default()
        };
        let statuses = color_matches
            .iter()
            .map(|m| m.status)
            .chain(font_matches.iter().map(|m| m.status));
        for status in statuses {
            match status {
                MatchStatus::Fail => summary.failures += 1,
                MatchStatus::Warn => summary.warnings += 1,
                MatchStatus::Pass => summary.passes += 1,
            }
        }
        summary
    }
}

/// Output of one engine call: the final issue layout plus the intermediate
/// lists it was derived from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisReport {
    pub palette: Vec<SampledColor>,
    pub color_matches: Vec<ColorMatch>,
    pub font_matches: Vec<FontMatch>,
    pub issues: ClusteredIssues,
    pub summary: AnalysisSummary,
}

impl AnalysisReport {
    pub fn has_failures(&self) -> bool {
        self.issues
            .standalone
            .iter()
            .chain(self.issues.clusters.iter().flat_map(|c| c.member_issues.iter()))
            .any(|issue| issue.status == MatchStatus::Fail)
    }
}

/// Run the whole pipeline on one buffer and token set.
///
/// The call is synchronous and keeps no state: identical inputs always give
/// identical reports.
pub fn analyze(
    buffer: &PixelBuffer,
    tokens: &TokenSet,
    typography: &[TypographyDescriptor],
    options: &AnalysisOptions,
) -> Result<AnalysisReport> {
    if buffer.is_empty() {
        return Err(DtcError::invalid_input(format!(
            "zero-area pixel buffer ({}x{})",
            buffer.width(),
            buffer.height()
        )));
    }

    let palette = sample_colors(buffer, &options.sample);
    debug!(colors = palette.len(), "sampled palette");

    let located = locate_colors(buffer, &palette, options)?;
    debug!(
        found = located.iter().filter(|l| l.region_found()).count(),
        total = located.len(),
        "located palette colors"
    );

    let index = ColorTokenIndex::new(&tokens.colors);
    let color_matches: Vec<ColorMatch> = located
        .iter()
        .map(|l| index.match_color(l, &options.thresholds))
        .collect();
    let font_matches: Vec<FontMatch> = typography
        .iter()
        .map(|d| match_font(d, &tokens.typography, &options.font))
        .collect();
    debug!(
        colors = color_matches.len(),
        fonts = font_matches.len(),
        "matched against tokens"
    );

    let issues = cluster_markers(
        generate_issues(&color_matches, &font_matches),
        options.cluster_radius,
    );
    let summary = AnalysisSummary::from_parts(&palette, &color_matches, &font_matches, &issues);
    debug!(
        issues = summary.issues,
        clusters = summary.clusters,
        failures = summary.failures,
        "analysis complete"
    );

    Ok(AnalysisReport {
        palette,
        color_matches,
        font_matches,
        issues,
        summary,
    })
}

/// Anchor each palette color at its largest region, in palette order.
///
/// Large buffers are downscaled first when `max_locate_pixels` is set; region
/// geometry is mapped back to original pixel space afterwards. A color with no
/// region in the reduced copy is located again on the full buffer before the
/// whole-buffer fallback applies.
pub fn locate_colors(
    buffer: &PixelBuffer,
    palette: &[SampledColor],
    options: &AnalysisOptions,
) -> Result<Vec<LocatedColor>> {
    let downscaled = match options.max_locate_pixels {
        Some(max) => downscale_buffer(buffer, max)?,
        None => None,
    };
    if let Some(d) = &downscaled {
        debug!(
            width = d.buffer.width(),
            height = d.buffer.height(),
            "downscaled buffer for region location"
        );
    }

    let original = buffer.full_bounds();

    let locate_one = |sampled: &SampledColor| -> LocatedColor {
        let Some(d) = &downscaled else {
            return locate_color(buffer, sampled, &options.locate);
        };
        match locate_regions(&d.buffer, sampled.color, &options.locate).first() {
            Some(region) => {
                let mapped = rescale_region(region, d.scale_x, d.scale_y, &original);
                LocatedColor::from_region(sampled, &mapped)
            }
            // thin features can blend away in the reduced copy
            None => {
                debug!(color = %sampled.color, "no region after downscale, retrying at full size");
                locate_color(buffer, sampled, &options.locate)
            }
        }
    };

    if options.parallel && palette.len() > 1 {
        locate_parallel(palette, &locate_one)
    } else {
        Ok(palette.iter().map(locate_one).collect())
    }
}

fn locate_parallel<F>(palette: &[SampledColor], locate_one: &F) -> Result<Vec<LocatedColor>>
where
    F: Fn(&SampledColor) -> LocatedColor + Sync,
{
    let workers = thread::available_parallelism()
        .map(NonZeroUsize::get)
        .unwrap_or(1)
        .clamp(1, palette.len());
    let chunk_size = palette.len().div_ceil(workers);

    thread::scope(|scope| {
        let handles: Vec<_> = palette
            .chunks(chunk_size)
            .map(|part| scope.spawn(move || part.iter().map(locate_one).collect::<Vec<_>>()))
            .collect();

        let mut located = Vec::with_capacity(palette.len());
        for handle in handles {
            let part = handle
                .join()
                .map_err(|_| DtcError::Unknown("region worker panicked".to_string()))?;
            located.extend(part);
        }
        Ok(located)
    })
}
