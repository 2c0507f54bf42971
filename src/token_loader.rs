//! Token store and capture-layer ingestion.
//!
//! Token and typography descriptor files are JSON or YAML. Records are read
//! into loose raw shapes first, then validated into canonical types; the
//! first invalid record aborts the load and nothing partial is returned.

use std::collections::HashSet;
use std::fs;
use std::path::Path;

use serde::de::DeserializeOwned;
use serde::Deserialize;
use tracing::debug;

use crate::analysis::parse_font_weight;
use crate::error::DtcError;
use crate::types::{
    BoundingBox, ColorToken, ColorValue, Point, TokenSet, TypographyDescriptor, TypographyToken,
};
use crate::Result;

const DEFAULT_FONT_WEIGHT: u16 = 400;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentFormat {
    Json,
    Yaml,
}

impl DocumentFormat {
    /// `.yaml`/`.yml` select YAML; anything else is read as JSON.
    pub fn from_path(path: &Path) -> Self {
        match path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase())
            .as_deref()
        {
            Some("yaml") | Some("yml") => DocumentFormat::Yaml,
            _ => DocumentFormat::Json,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RawTokenFile {
    List(Vec<RawToken>),
    Grouped {
        #[serde(default)]
        colors: Vec<RawColorToken>,
        #[serde(default)]
        typography: Vec<RawTypographyToken>,
    },
}

#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
enum RawToken {
    Color(RawColorToken),
    Typography(RawTypographyToken),
}

#[derive(Debug, Deserialize)]
struct RawColorToken {
    path: Option<String>,
    handle: Option<String>,
    #[serde(alias = "hex")]
    value: Option<ColorValue>,
}

#[derive(Debug, Deserialize)]
struct RawTypographyToken {
    role: Option<String>,
    family: Option<String>,
    size: Option<f64>,
    weight: Option<RawWeight>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RawWeight {
    Number(f64),
    Keyword(String),
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawDescriptor {
    family: Option<String>,
    size: Option<f64>,
    weight: Option<RawWeight>,
    position: Option<Point>,
    bounding_box: Option<BoundingBox>,
}

/// Parse and validate a token document.
pub fn parse_tokens(source: &str, format: DocumentFormat) -> Result<TokenSet> {
    let (colors, typography) = match parse_document::<RawTokenFile>(source, format)? {
        RawTokenFile::List(records) => {
            let mut colors = Vec::new();
            let mut typography = Vec::new();
            for record in records {
                match record {
                    RawToken::Color(c) => colors.push(c),
                    RawToken::Typography(t) => typography.push(t),
                }
            }
            (colors, typography)
        }
        RawTokenFile::Grouped { colors, typography } => (colors, typography),
    };

    let colors = colors
        .into_iter()
        .enumerate()
        .map(|(i, raw)| validate_color(i + 1, raw))
        .collect::<Result<Vec<_>>>()?;
    let typography = typography
        .into_iter()
        .enumerate()
        .map(|(i, raw)| validate_typography(i + 1, raw))
        .collect::<Result<Vec<_>>>()?;

    ensure_unique("color token path", colors.iter().map(|t| t.path.as_str()))?;
    ensure_unique("typography token role", typography.iter().map(|t| t.role.as_str()))?;

    Ok(TokenSet { colors, typography })
}

/// Read a token file; the format follows the file extension.
pub fn load_tokens(path: &Path) -> Result<TokenSet> {
    let source = read_source(path)?;
    let tokens = parse_tokens(&source, DocumentFormat::from_path(path))?;
    debug!(
        path = %path.display(),
        colors = tokens.colors.len(),
        typography = tokens.typography.len(),
        "loaded design tokens"
    );
    Ok(tokens)
}

/// Parse and validate a list of typography descriptors.
pub fn parse_typography(source: &str, format: DocumentFormat) -> Result<Vec<TypographyDescriptor>> {
    parse_document::<Vec<RawDescriptor>>(source, format)?
        .into_iter()
        .enumerate()
        .map(|(i, raw)| validate_descriptor(i + 1, raw))
        .collect()
}

pub fn load_typography(path: &Path) -> Result<Vec<TypographyDescriptor>> {
    let source = read_source(path)?;
    let descriptors = parse_typography(&source, DocumentFormat::from_path(path))?;
    debug!(path = %path.display(), count = descriptors.len(), "loaded typography descriptors");
    Ok(descriptors)
}

fn read_source(path: &Path) -> Result<String> {
    if !path.exists() {
        return Err(DtcError::Config(format!("File not found: {}", path.display())));
    }
    Ok(fs::read_to_string(path)?)
}

fn parse_document<T: DeserializeOwned>(source: &str, format: DocumentFormat) -> Result<T> {
    match format {
        DocumentFormat::Json => Ok(serde_json::from_str(source)?),
        DocumentFormat::Yaml => Ok(serde_yaml::from_str(source)?),
    }
}

fn validate_color(index: usize, raw: RawColorToken) -> Result<ColorToken> {
    let path = required_text(raw.path).ok_or_else(|| {
        DtcError::invalid_input(format!("color token #{} is missing `path`", index))
    })?;
    let value = raw.value.ok_or_else(|| {
        DtcError::invalid_input(format!("color token '{}' is missing `value`", path))
    })?;
    let color = value.resolve().map_err(|err| match err {
        DtcError::InvalidInput(msg) => {
            DtcError::invalid_input(format!("color token '{}': {}", path, msg))
        }
        other => other,
    })?;
    let handle = required_text(raw.handle).unwrap_or_else(|| path.clone());

    Ok(ColorToken {
        path,
        handle,
        color,
    })
}

fn validate_typography(index: usize, raw: RawTypographyToken) -> Result<TypographyToken> {
    let role = required_text(raw.role).ok_or_else(|| {
        DtcError::invalid_input(format!("typography token #{} is missing `role`", index))
    })?;
    let family = required_text(raw.family).ok_or_else(|| {
        DtcError::invalid_input(format!("typography token '{}' is missing `family`", role))
    })?;
    let size = raw.size.ok_or_else(|| {
        DtcError::invalid_input(format!("typography token '{}' is missing `size`", role))
    })?;
    let size = positive_size(size)
        .map_err(|msg| DtcError::invalid_input(format!("typography token '{}': {}", role, msg)))?;
    let weight = match raw.weight {
        Some(w) => resolve_weight(w).map_err(|msg| {
            DtcError::invalid_input(format!("typography token '{}': {}", role, msg))
        })?,
        None => DEFAULT_FONT_WEIGHT,
    };

    Ok(TypographyToken {
        role,
        family,
        size,
        weight,
    })
}

fn validate_descriptor(index: usize, raw: RawDescriptor) -> Result<TypographyDescriptor> {
    let invalid = |msg: &str| {
        DtcError::invalid_input(format!("typography descriptor #{}: {}", index, msg))
    };

    let family = required_text(raw.family).ok_or_else(|| invalid("missing `family`"))?;
    let size = raw.size.ok_or_else(|| invalid("missing `size`"))?;
    let size = positive_size(size).map_err(|msg| invalid(&msg))?;
    let position = raw.position.ok_or_else(|| invalid("missing `position`"))?;
    let weight = raw
        .weight
        .map(resolve_weight)
        .transpose()
        .map_err(|msg| invalid(&msg))?;

    Ok(TypographyDescriptor {
        family,
        size,
        weight,
        position,
        bounding_box: raw.bounding_box,
    })
}

fn required_text(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn positive_size(size: f64) -> std::result::Result<f64, String> {
    if size.is_finite() && size > 0.0 {
        Ok(size)
    } else {
        Err(format!("font size must be positive, got {}", size))
    }
}

fn resolve_weight(raw: RawWeight) -> std::result::Result<u16, String> {
    match raw {
        RawWeight::Number(n) if n.fract() == 0.0 && (1.0..=1000.0).contains(&n) => Ok(n as u16),
        RawWeight::Number(n) => Err(format!("invalid font weight {}", n)),
        RawWeight::Keyword(k) => {
            parse_font_weight(&k).ok_or_else(|| format!("unknown font weight '{}'", k))
        }
    }
}

fn ensure_unique<'a>(what: &str, keys: impl Iterator<Item = &'a str>) -> Result<()> {
    let mut seen = HashSet::new();
    for key in keys {
        if !seen.insert(key) {
            return Err(DtcError::invalid_input(format!(
                "duplicate {} '{}'",
                what, key
            )));
        }
    }
    Ok(())
}
