//! Design Token Checker (DTC) Library
//!
//! Extracts visual deviations from a rendered screen and matches them against
//! a design token set. Colors are sampled from a decoded pixel buffer, anchored
//! at their largest region, and compared to color tokens with CIEDE2000;
//! pre-extracted typography descriptors are scored against typography tokens.
//! Non-passing matches become numbered issues, grouped into marker clusters
//! for presentation.
//!
//! # Module Overview
//!
//! - [`analysis`] - The deviation engine (sampling, regions, color science, matching, issues)
//! - [`token_loader`] - Token and typography descriptor files (JSON/YAML)
//! - [`image_loader`] - Decoding image files into pixel buffers
//! - [`config`] - Configuration file support
//! - [`types`] - Core data types and structures
//! - [`output`] - JSON output schemas
//!
//! # Example
//!
//! ```no_run
//! use std::path::Path;
//! use dtc_lib::{analyze, load_image, load_tokens, AnalysisOptions};
//!
//! # fn example() -> dtc_lib::Result<()> {
//! let buffer = load_image(Path::new("screen.png"))?;
//! let tokens = load_tokens(Path::new("tokens.json"))?;
//!
//! let report = analyze(&buffer, &tokens, &[], &AnalysisOptions::default())?;
//! for issue in &report.issues.standalone {
//!     println!("#{} {}", issue.number, issue.message);
//! }
//! # Ok(())
//! # }
//! ```

pub mod analysis;
pub mod config;
pub mod error;
pub mod image_loader;
pub mod output;
pub mod token_loader;
pub mod types;

// Analysis module re-exports
pub use analysis::{
    analyze, cluster_markers, generate_issues, locate_color, locate_colors, locate_regions,
    match_color, match_font, perceptual_distance, sample_colors, to_lab, AnalysisOptions,
    AnalysisReport, AnalysisSummary, DeltaEThresholds, FontMatchOptions, LocateOptions,
    SampleOptions,
};
pub use config::Config;
pub use error::{DtcError, ErrorCategory, ErrorPayload, Result};
pub use image_loader::{decode_image, load_image, ImageLoadError};
pub use output::{
    AnalyzeOutput, DtcOutput, ErrorOutput, ImageDescriptor, PaletteOutput, TokenCounts,
    DTC_OUTPUT_VERSION,
};
pub use token_loader::{load_tokens, load_typography, parse_tokens, parse_typography, DocumentFormat};
pub use types::{
    BoundingBox, ClusteredIssues, ColorMatch, ColorToken, FontMatch, Issue, IssueKind,
    LocatedColor, MarkerCluster, MatchStatus, PixelBuffer, PixelRegion, Point, Rgb,
    SampledColor, TokenSet, TypographyDescriptor, TypographyToken,
};
