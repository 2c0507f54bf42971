//! Visual deviation analysis over a decoded pixel buffer.
//!
//! The pipeline runs in fixed stages:
//! - Color sampling on a 2-D grid (exact 24-bit palette)
//! - Region location per color (iterative 4-connected flood fill)
//! - Token matching (CIEDE2000 for colors, weighted score for typography)
//! - Issue generation and greedy marker clustering
//!
//! Every function here is pure over its arguments; nothing is cached between
//! calls.

// Submodules
mod clustering;
mod color_science;
mod engine;
mod issues;
mod matcher;
mod regions;
mod sampler;


// Re-exports
pub use clustering::cluster_markers;
pub use color_science::{perceptual_distance, to_lab, DeltaEThresholds, LabColor};
pub use engine::{analyze, locate_colors, AnalysisOptions, AnalysisReport, AnalysisSummary};
pub use issues::generate_issues;
pub use matcher::{
    canonical_family, match_color, match_font, parse_font_weight, ColorTokenIndex,
    FontMatchOptions,
};
pub use regions::{
    downscale_buffer, locate_color, locate_regions, rescale_region, Downscaled, LocateOptions,
};
pub use sampler::{sample_colors, SampleOptions};
