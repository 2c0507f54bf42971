//! Core types used throughout the DTC library.
//!
//! This module contains the fundamental data structures:
//! - [`Rgb`] - 24-bit sRGB color, serialized as `#RRGGBB`
//! - [`PixelBuffer`] - Decoded RGBA pixels handed over by the capture layer
//! - [`Point`] - Position in buffer pixel space
//! - [`BoundingBox`] - Rectangle in buffer pixel space

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

use crate::error::DtcError;
use crate::Result;

/// An opaque 24-bit sRGB color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Uppercase `#RRGGBB` form.
    pub fn to_hex(self) -> String {
        format!("#{:02X}{:02X}{:02X}", self.r, self.g, self.b)
    }

    /// Euclidean distance in raw RGB space.
    pub fn euclidean_distance(self, other: Rgb) -> f64 {
        let dr = self.r as f64 - other.r as f64;
        let dg = self.g as f64 - other.g as f64;
        let db = self.b as f64 - other.b as f64;
        (dr * dr + dg * dg + db * db).sqrt()
    }

    pub(crate) fn key(self) -> u32 {
        ((self.r as u32) << 16) | ((self.g as u32) << 8) | self.b as u32
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02X}{:02X}{:02X}", self.r, self.g, self.b)
    }
}

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ColorParseError {
    #[error("Invalid hex color '{0}': expected #RGB, #RRGGBB or #RRGGBBAA")]
    InvalidLength(String),
    #[error("Invalid hex color '{0}': contains non-hex digits")]
    InvalidDigit(String),
}

impl FromStr for Rgb {
    type Err = ColorParseError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let trimmed = s.trim();
        let digits = trimmed.strip_prefix('#').unwrap_or(trimmed);
        if !digits.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(ColorParseError::InvalidDigit(s.to_string()));
        }

        let channel = |pair: &str| {
            u8::from_str_radix(pair, 16).map_err(|_| ColorParseError::InvalidDigit(s.to_string()))
        };

        match digits.len() {
            3 => {
                let expand = |i: usize| channel(&digits[i..i + 1].repeat(2));
                Ok(Rgb::new(expand(0)?, expand(1)?, expand(2)?))
            }
            // alpha channel in the 8-digit form is ignored
            6 | 8 => Ok(Rgb::new(
                channel(&digits[0..2])?,
                channel(&digits[2..4])?,
                channel(&digits[4..6])?,
            )),
            _ => Err(ColorParseError::InvalidLength(s.to_string())),
        }
    }
}

impl From<Rgb> for String {
    fn from(value: Rgb) -> Self {
        value.to_hex()
    }
}

impl TryFrom<String> for Rgb {
    type Error = ColorParseError;

    fn try_from(value: String) -> std::result::Result<Self, Self::Error> {
        value.parse()
    }
}

/// A position in buffer pixel space.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn distance_to(&self, other: &Point) -> f64 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        (dx * dx + dy * dy).sqrt()
    }
}

/// Rectangle bounds in buffer pixel space.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BoundingBox {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl BoundingBox {
    pub const fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// A zero-size box anchored at `point`.
    pub fn at(point: Point) -> Self {
        Self::new(point.x, point.y, 0.0, 0.0)
    }

    pub fn contains(&self, point: &Point) -> bool {
        point.x >= self.x
            && point.y >= self.y
            && point.x <= self.x + self.width
            && point.y <= self.y + self.height
    }
}

/// A decoded RGBA pixel buffer (row-major, top-left origin, 4 bytes per pixel).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PixelBuffer {
    width: u32,
    height: u32,
    data: Vec<u8>,
}

impl PixelBuffer {
    /// Wrap raw RGBA bytes, checking that the length matches the dimensions.
    pub fn new(width: u32, height: u32, data: Vec<u8>) -> Result<Self> {
        let expected = width as usize * height as usize * 4;
        if data.len() != expected {
            return Err(DtcError::InvalidInput(format!(
                "Pixel buffer length {} does not match {}x{} RGBA ({} bytes)",
                data.len(),
                width,
                height,
                expected
            )));
        }
        Ok(Self {
            width,
            height,
            data,
        })
    }

    /// A buffer filled with a single RGBA value.
    pub fn from_pixel(width: u32, height: u32, rgba: [u8; 4]) -> Self {
        let count = width as usize * height as usize;
        let mut data = Vec::with_capacity(count * 4);
        for _ in 0..count {
            data.extend_from_slice(&rgba);
        }
        Self {
            width,
            height,
            data,
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn pixel_count(&self) -> usize {
        self.width as usize * self.height as usize
    }

    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    pub fn as_raw(&self) -> &[u8] {
        &self.data
    }

    pub fn into_raw(self) -> Vec<u8> {
        self.data
    }

    #[inline]
    pub fn rgba(&self, x: u32, y: u32) -> [u8; 4] {
        let i = (y as usize * self.width as usize + x as usize) * 4;
        [
            self.data[i],
            self.data[i + 1],
            self.data[i + 2],
            self.data[i + 3],
        ]
    }

    #[inline]
    pub fn rgb(&self, x: u32, y: u32) -> Rgb {
        let [r, g, b, _] = self.rgba(x, y);
        Rgb::new(r, g, b)
    }

    pub fn set_rgba(&mut self, x: u32, y: u32, rgba: [u8; 4]) {
        let i = (y as usize * self.width as usize + x as usize) * 4;
        self.data[i..i + 4].copy_from_slice(&rgba);
    }

    /// Geometric center of the buffer.
    pub fn center(&self) -> Point {
        Point::new(self.width as f64 / 2.0, self.height as f64 / 2.0)
    }

    pub fn full_bounds(&self) -> BoundingBox {
        BoundingBox::new(0.0, 0.0, self.width as f64, self.height as f64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_short_long_and_alpha_hex() {
        assert_eq!("#F30".parse::<Rgb>().unwrap(), Rgb::new(0xFF, 0x33, 0x00));
        assert_eq!("#ff3300".parse::<Rgb>().unwrap(), Rgb::new(0xFF, 0x33, 0x00));
        assert_eq!("FF330080".parse::<Rgb>().unwrap(), Rgb::new(0xFF, 0x33, 0x00));
    }

    #[test]
    fn rejects_malformed_hex() {
        assert!(matches!(
            "#12345".parse::<Rgb>(),
            Err(ColorParseError::InvalidLength(_))
        ));
        assert!(matches!(
            "#GG0000".parse::<Rgb>(),
            Err(ColorParseError::InvalidDigit(_))
        ));
        assert!("".parse::<Rgb>().is_err());
    }

    #[test]
    fn rgb_serializes_as_uppercase_hex() {
        let json = serde_json::to_string(&Rgb::new(10, 171, 255)).unwrap();
        assert_eq!(json, "\"#0AABFF\"");
        let back: Rgb = serde_json::from_str(&json).unwrap();
        assert_eq!(back, Rgb::new(10, 171, 255));
    }

    #[test]
    fn pixel_buffer_rejects_length_mismatch() {
        let err = PixelBuffer::new(2, 2, vec![0; 15]).unwrap_err();
        assert!(matches!(err, DtcError::InvalidInput(_)));
    }

    #[test]
    fn pixel_buffer_reads_row_major() {
        let mut buf = PixelBuffer::from_pixel(3, 2, [0, 0, 0, 255]);
        buf.set_rgba(2, 1, [9, 8, 7, 255]);
        assert_eq!(buf.rgba(2, 1), [9, 8, 7, 255]);
        assert_eq!(buf.as_raw()[(1 * 3 + 2) * 4], 9);
        assert_eq!(buf.center(), Point::new(1.5, 1.0));
    }

    #[test]
    fn bounding_box_contains_edges() {
        let bb = BoundingBox::new(0.0, 0.0, 4.0, 4.0);
        assert!(bb.contains(&Point::new(4.0, 0.0)));
        assert!(!bb.contains(&Point::new(4.1, 0.0)));
    }
}
