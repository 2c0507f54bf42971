//! Design token types.
//!
//! Tokens arrive from the token store already validated (see
//! [`crate::token_loader`]); everything here holds canonical values only.

use serde::{Deserialize, Serialize};

use super::core::{BoundingBox, Point, Rgb};
use crate::error::DtcError;
use crate::Result;

/// A color value as it may appear in upstream token data.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ColorValue {
    /// `#RGB`, `#RRGGBB` or `#RRGGBBAA`
    Hex(String),
    /// `[r, g, b]`
    Rgb(u8, u8, u8),
}

impl ColorValue {
    /// Resolve to the canonical representation used by all comparisons.
    pub fn resolve(&self) -> Result<Rgb> {
        match self {
            ColorValue::Hex(hex) => hex
                .parse()
                .map_err(|e| DtcError::InvalidInput(format!("{}", e))),
            ColorValue::Rgb(r, g, b) => Ok(Rgb::new(*r, *g, *b)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ColorToken {
    /// Identity key, e.g. `color.brand.primary`
    pub path: String,
    /// How the token is referenced in code, e.g. `--color-brand-primary`
    pub handle: String,
    pub color: Rgb,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TypographyToken {
    /// Identity key, e.g. `heading-1`
    pub role: String,
    pub family: String,
    pub size: f64,
    /// Numeric CSS weight (100-900)
    pub weight: u16,
}

impl TypographyToken {
    /// Compact `Family size/weight` description used in messages.
    pub fn describe(&self) -> String {
        format!("{} {}px/{}", self.family, self.size, self.weight)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum DesignToken {
    Color(ColorToken),
    Typography(TypographyToken),
}

impl DesignToken {
    pub fn identity_key(&self) -> &str {
        match self {
            DesignToken::Color(t) => &t.path,
            DesignToken::Typography(t) => &t.role,
        }
    }
}

/// The immutable token list for one engine invocation, split by variant.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenSet {
    #[serde(default)]
    pub colors: Vec<ColorToken>,
    #[serde(default)]
    pub typography: Vec<TypographyToken>,
}

impl TokenSet {
    pub fn from_tokens(tokens: impl IntoIterator<Item = DesignToken>) -> Self {
        let mut set = TokenSet::default();
        for token in tokens {
            match token {
                DesignToken::Color(t) => set.colors.push(t),
                DesignToken::Typography(t) => set.typography.push(t),
            }
        }
        set
    }

    pub fn len(&self) -> usize {
        self.colors.len() + self.typography.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Typography properties extracted by the capture layer for one text run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TypographyDescriptor {
    pub family: String,
    pub size: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub weight: Option<u16>,
    pub position: Point,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bounding_box: Option<BoundingBox>,
}

impl TypographyDescriptor {
    pub fn describe(&self) -> String {
        match self.weight {
            Some(w) => format!("{} {}px/{}", self.family, self.size, w),
            None => format!("{} {}px", self.family, self.size),
        }
    }
}
