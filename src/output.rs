use crate::analysis::{AnalysisReport, AnalysisSummary};
use crate::error::ErrorPayload;
use crate::types::{ClusteredIssues, ColorMatch, FontMatch, PixelBuffer, SampledColor, TokenSet};
use serde::{Deserialize, Serialize};

/// Schema version for output payloads.
pub const DTC_OUTPUT_VERSION: &str = "0.1.0";

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "kebab-case")]
pub enum DtcOutput {
    Analyze(AnalyzeOutput),
    Palette(PaletteOutput),
    Error(ErrorOutput),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageDescriptor {
    pub path: String,
    pub width: u32,
    pub height: u32,
}

impl ImageDescriptor {
    pub fn new(path: impl Into<String>, buffer: &PixelBuffer) -> Self {
        Self {
            path: path.into(),
            width: buffer.width(),
            height: buffer.height(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenCounts {
    pub colors: usize,
    pub typography: usize,
}

impl From<&TokenSet> for TokenCounts {
    fn from(tokens: &TokenSet) -> Self {
        Self {
            colors: tokens.colors.len(),
            typography: tokens.typography.len(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyzeOutput {
    pub version: String,
    pub image: ImageDescriptor,
    pub tokens: TokenCounts,
    /// True when no issue has `fail` status
    pub passed: bool,
    pub summary: AnalysisSummary,
    pub issues: ClusteredIssues,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color_matches: Option<Vec<ColorMatch>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub font_matches: Option<Vec<FontMatch>>,
}

impl AnalyzeOutput {
    pub fn from_report(
        report: AnalysisReport,
        image: ImageDescriptor,
        tokens: TokenCounts,
        include_matches: bool,
    ) -> Self {
        let passed = !report.has_failures();
        let (color_matches, font_matches) = if include_matches {
            (Some(report.color_matches), Some(report.font_matches))
        } else {
            (None, None)
        };
        Self {
            version: DTC_OUTPUT_VERSION.to_string(),
            image,
            tokens,
            passed,
            summary: report.summary,
            issues: report.issues,
            color_matches,
            font_matches,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaletteOutput {
    pub version: String,
    pub image: ImageDescriptor,
    pub colors: Vec<SampledColor>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorOutput {
    pub version: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    pub error: ErrorPayload,
}
