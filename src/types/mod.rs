//! Data types shared by the analysis engine and its callers.

pub mod core;
pub mod results;
pub mod tokens;

pub use self::core::{BoundingBox, ColorParseError, PixelBuffer, Point, Rgb};
pub use results::{
    ClusteredIssues, ColorMatch, FontMatch, Issue, IssueKind, LocatedColor, MarkerCluster,
    MatchStatus, PixelRegion, SampledColor, Suggestion,
};
pub use tokens::{
    ColorToken, ColorValue, DesignToken, TokenSet, TypographyDescriptor, TypographyToken,
};
