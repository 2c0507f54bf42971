//! Matching of located colors and typography descriptors against tokens.

use tracing::trace;

use super::color_science::{perceptual_distance, to_lab, DeltaEThresholds, LabColor};
use crate::types::{
    ColorMatch, ColorToken, FontMatch, LocatedColor, TypographyDescriptor, TypographyToken,
};

const FAMILY_SCORE: u8 = 3;
const SIZE_SCORE: u8 = 2;
const WEIGHT_SCORE: u8 = 1;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FontMatchOptions {
    /// Max absolute size difference still counted as a size match
    pub size_tolerance: f64,
}

impl Default for FontMatchOptions {
    fn default() -> Self {
        Self {
            size_tolerance: 2.0,
        }
    }
}

/// Color tokens with their LAB values, computed once per engine call.
///
/// The index borrows the caller's tokens and is dropped with the call; it is
/// never shared between invocations.
#[derive(Debug, Clone)]
pub struct ColorTokenIndex<'a> {
    entries: Vec<(&'a ColorToken, LabColor)>,
}

impl<'a> ColorTokenIndex<'a> {
    pub fn new(tokens: &'a [ColorToken]) -> Self {
        Self {
            entries: tokens.iter().map(|t| (t, to_lab(t.color))).collect(),
        }
    }

    /// Nearest token by CIEDE2000; the first of equally distant tokens wins.
    pub fn nearest(&self, lab: &LabColor) -> Option<(&'a ColorToken, f64)> {
        let mut best: Option<(&'a ColorToken, f64)> = None;
        for (token, token_lab) in &self.entries {
            let distance = perceptual_distance(lab, token_lab);
            match best {
                Some((_, d)) if distance >= d => {}
                _ => best = Some((*token, distance)),
            }
        }
        best
    }

    pub fn match_color(&self, located: &LocatedColor, thresholds: &DeltaEThresholds) -> ColorMatch {
        let best = self
            .nearest(&to_lab(located.color))
            .map(|(token, distance)| (token.clone(), distance));
        if let Some((token, distance)) = &best {
            trace!(color = %located.color, token = %token.path, distance, "nearest color token");
        }
        ColorMatch::new(*located, best, thresholds)
    }
}

/// Match one located color against `tokens`.
///
/// With no tokens the match has no token and fails.
pub fn match_color(
    located: &LocatedColor,
    tokens: &[ColorToken],
    thresholds: &DeltaEThresholds,
) -> ColorMatch {
    ColorTokenIndex::new(tokens).match_color(located, thresholds)
}

/// Match one typography descriptor against `tokens` by weighted score.
///
/// Family equality scores 3, size within tolerance 2, weight equality 1; the
/// first highest-scoring token wins. Only family and size produce mismatch
/// reasons.
pub fn match_font(
    descriptor: &TypographyDescriptor,
    tokens: &[TypographyToken],
    options: &FontMatchOptions,
) -> FontMatch {
    let family = canonical_family(&descriptor.family);

    let mut best: Option<(&TypographyToken, u8)> = None;
    for token in tokens {
        let mut score = 0u8;
        if canonical_family(&token.family) == family {
            score += FAMILY_SCORE;
        }
        if size_matches(descriptor.size, token.size, options.size_tolerance) {
            score += SIZE_SCORE;
        }
        if descriptor.weight == Some(token.weight) {
            score += WEIGHT_SCORE;
        }
        match best {
            Some((_, s)) if score <= s => {}
            _ => best = Some((token, score)),
        }
    }

    let Some((token, score)) = best else {
        return FontMatch::new(descriptor.clone(), None, Vec::new());
    };
    trace!(family = %descriptor.family, role = %token.role, score, "best typography token");

    let mut reasons = Vec::new();
    if canonical_family(&token.family) != family {
        reasons.push(format!(
            "font family '{}' does not match '{}'",
            descriptor.family, token.family
        ));
    }
    if !size_matches(descriptor.size, token.size, options.size_tolerance) {
        reasons.push(format!(
            "font size {}px differs from {}px",
            descriptor.size, token.size
        ));
    }

    FontMatch::new(descriptor.clone(), Some(token.clone()), reasons)
}

fn size_matches(a: f64, b: f64, tolerance: f64) -> bool {
    (a - b).abs() <= tolerance
}

/// First family of a CSS font stack, unquoted and lowercased.
pub fn canonical_family(family: &str) -> String {
    family
        .split(',')
        .next()
        .unwrap_or_default()
        .trim()
        .trim_matches(|c| c == '"' || c == '\'')
        .trim()
        .to_lowercase()
}

/// Numeric CSS weight from a number or keyword.
pub fn parse_font_weight(weight: &str) -> Option<u16> {
    let lower = weight.trim().to_ascii_lowercase();
    if let Ok(num) = lower.parse::<u16>() {
        return (1..=1000).contains(&num).then_some(num);
    }
    match lower.replace(['-', ' ', '_'], "").as_str() {
        "thin" | "hairline" => Some(100),
        "extralight" | "ultralight" => Some(200),
        "light" => Some(300),
        "normal" | "regular" | "book" => Some(400),
        "medium" => Some(500),
        "semibold" | "demibold" => Some(600),
        "bold" => Some(700),
        "extrabold" | "ultrabold" => Some(800),
        "black" | "heavy" => Some(900),
        _ => None,
    }
}
