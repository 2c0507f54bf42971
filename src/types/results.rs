//! Result types produced by the analysis pipeline.
//!
//! Every value here is created fresh per invocation and never mutated by a
//! later call:
//! - Sampling and location ([`SampledColor`], [`PixelRegion`], [`LocatedColor`])
//! - Token matching ([`ColorMatch`], [`FontMatch`], [`MatchStatus`])
//! - Presentation ([`Issue`], [`MarkerCluster`], [`ClusteredIssues`])

use serde::{Deserialize, Serialize};

use super::core::{BoundingBox, Point, Rgb};
use super::tokens::{ColorToken, TypographyDescriptor, TypographyToken};
use crate::analysis::DeltaEThresholds;

// ============================================================================
// Sampling / Location
// ============================================================================

/// A unique color found by the sampler and its share of sampled pixels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SampledColor {
    pub color: Rgb,
    /// Percentage of non-skipped sampled pixels (0 < p <= 100)
    pub coverage_percentage: f64,
}

/// A 4-connected group of pixels matching a target color.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PixelRegion {
    pub bounding_box: BoundingBox,
    /// Mean position of member pixel centers
    pub centroid: Point,
    pub pixel_count: usize,
    /// Share of the whole buffer (0-100)
    pub coverage_percentage: f64,
}

/// A sampled color anchored at the largest region found for it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LocatedColor {
    pub color: Rgb,
    pub coverage_percentage: f64,
    pub bounding_box: BoundingBox,
    pub centroid: Point,
    /// Pixel count of the anchoring region; `None` when the full-buffer
    /// fallback was used.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub region_pixel_count: Option<usize>,
}

impl LocatedColor {
    pub fn from_region(sampled: &SampledColor, region: &PixelRegion) -> Self {
        Self {
            color: sampled.color,
            coverage_percentage: sampled.coverage_percentage,
            bounding_box: region.bounding_box,
            centroid: region.centroid,
            region_pixel_count: Some(region.pixel_count),
        }
    }

    pub fn fallback(sampled: &SampledColor, bounds: BoundingBox, center: Point) -> Self {
        Self {
            color: sampled.color,
            coverage_percentage: sampled.coverage_percentage,
            bounding_box: bounds,
            centroid: center,
            region_pixel_count: None,
        }
    }

    pub fn region_found(&self) -> bool {
        self.region_pixel_count.is_some()
    }
}

// ============================================================================
// Matching
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MatchStatus {
    Pass,
    Warn,
    Fail,
}

impl MatchStatus {
    /// Lower ranks sort first in issue lists.
    pub fn severity_rank(self) -> u8 {
        match self {
            MatchStatus::Fail => 0,
            MatchStatus::Warn => 1,
            MatchStatus::Pass => 2,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            MatchStatus::Pass => "pass",
            MatchStatus::Warn => "warn",
            MatchStatus::Fail => "fail",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ColorMatch {
    pub source: LocatedColor,
    pub matched_token: Option<ColorToken>,
    /// CIEDE2000 distance to the matched token; `None` without a token
    pub distance: Option<f64>,
    pub status: MatchStatus,
}

impl ColorMatch {
    /// The only constructor: `status` is always derived from `distance`.
    pub fn new(
        source: LocatedColor,
        best: Option<(ColorToken, f64)>,
        thresholds: &DeltaEThresholds,
    ) -> Self {
        match best {
            Some((token, distance)) => Self {
                source,
                status: thresholds.classify(distance),
                matched_token: Some(token),
                distance: Some(distance),
            },
            None => Self {
                source,
                matched_token: None,
                distance: None,
                status: MatchStatus::Fail,
            },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FontMatch {
    pub source: TypographyDescriptor,
    pub matched_token: Option<TypographyToken>,
    pub status: MatchStatus,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub mismatch_reasons: Vec<String>,
}

impl FontMatch {
    pub fn new(
        source: TypographyDescriptor,
        matched_token: Option<TypographyToken>,
        mismatch_reasons: Vec<String>,
    ) -> Self {
        let status = match (&matched_token, mismatch_reasons.len()) {
            (None, _) => MatchStatus::Fail,
            (Some(_), 0) => MatchStatus::Pass,
            (Some(_), 1) => MatchStatus::Warn,
            (Some(_), _) => MatchStatus::Fail,
        };
        Self {
            source,
            matched_token,
            status,
            mismatch_reasons,
        }
    }
}

// ============================================================================
// Issues
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IssueKind {
    Color,
    Font,
}

impl IssueKind {
    pub fn as_str(self) -> &'static str {
        match self {
            IssueKind::Color => "color",
            IssueKind::Font => "font",
        }
    }
}

/// The token a deviation should be replaced with.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Suggestion {
    /// Token identity key (path or role)
    pub token: String,
    pub value: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub handle: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Issue {
    pub id: String,
    /// Dense 1..N in final severity order
    pub number: usize,
    pub kind: IssueKind,
    pub status: MatchStatus,
    pub message: String,
    pub marker_position: Point,
    pub bounding_box: BoundingBox,
    pub source_value: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub suggestion: Option<Suggestion>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MarkerCluster {
    /// Mean of member marker positions
    pub position: Point,
    pub member_issues: Vec<Issue>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClusteredIssues {
    pub standalone: Vec<Issue>,
    pub clusters: Vec<MarkerCluster>,
}

impl ClusteredIssues {
    pub fn issue_count(&self) -> usize {
        self.standalone.len()
            + self
                .clusters
                .iter()
                .map(|c| c.member_issues.len())
                .sum::<usize>()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn located() -> LocatedColor {
        LocatedColor::fallback(
            &SampledColor {
                color: Rgb::new(1, 2, 3),
                coverage_percentage: 50.0,
            },
            BoundingBox::new(0.0, 0.0, 10.0, 10.0),
            Point::new(5.0, 5.0),
        )
    }

    #[test]
    fn color_match_without_token_fails() {
        let m = ColorMatch::new(located(), None, &DeltaEThresholds::default());
        assert_eq!(m.status, MatchStatus::Fail);
        assert!(m.distance.is_none());
        assert!(!m.source.region_found());
    }

    #[test]
    fn font_match_status_follows_reason_count() {
        let descriptor = TypographyDescriptor {
            family: "Inter".into(),
            size: 16.0,
            weight: None,
            position: Point::default(),
            bounding_box: None,
        };
        let token = TypographyToken {
            role: "body".into(),
            family: "Inter".into(),
            size: 16.0,
            weight: 400,
        };
        let pass = FontMatch::new(descriptor.clone(), Some(token.clone()), vec![]);
        let warn = FontMatch::new(descriptor.clone(), Some(token.clone()), vec!["a".into()]);
        let fail = FontMatch::new(
            descriptor.clone(),
            Some(token),
            vec!["a".into(), "b".into()],
        );
        let none = FontMatch::new(descriptor, None, vec![]);
        assert_eq!(pass.status, MatchStatus::Pass);
        assert_eq!(warn.status, MatchStatus::Warn);
        assert_eq!(fail.status, MatchStatus::Fail);
        assert_eq!(none.status, MatchStatus::Fail);
    }

    #[test]
    fn severity_rank_orders_fail_first() {
        assert!(MatchStatus::Fail.severity_rank() < MatchStatus::Warn.severity_rank());
        assert!(MatchStatus::Warn.severity_rank() < MatchStatus::Pass.severity_rank());
    }
}
