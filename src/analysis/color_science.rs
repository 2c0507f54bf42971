//! sRGB → CIE LAB conversion and the CIEDE2000 color difference.

use palette::white_point::D65;
use palette::{FromColor, Lab, Srgb};

use crate::types::{MatchStatus, Rgb};

/// CIE LAB under the D65 reference white.
pub type LabColor = Lab<D65, f64>;

const POW25_7: f64 = 6_103_515_625.0; // 25^7

/// Pass/warn policy over CIEDE2000 distances.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DeltaEThresholds {
    /// Distances at or below this pass
    pub pass: f64,
    /// Distances at or below this (and above `pass`) warn; anything larger fails
    pub warn: f64,
}

impl Default for DeltaEThresholds {
    fn default() -> Self {
        Self {
            pass: 3.0,
            warn: 10.0,
        }
    }
}

impl DeltaEThresholds {
    pub fn classify(&self, distance: f64) -> MatchStatus {
        if distance <= self.pass {
            MatchStatus::Pass
        } else if distance <= self.warn {
            MatchStatus::Warn
        } else {
            MatchStatus::Fail
        }
    }
}

/// Gamma-expand, project into XYZ and apply the LAB nonlinearity (D65).
pub fn to_lab(rgb: Rgb) -> LabColor {
    let srgb: Srgb<f64> = Srgb::new(rgb.r, rgb.g, rgb.b).into_format();
    LabColor::from_color(srgb)
}

/// CIEDE2000 distance (kL = kC = kH = 1).
///
/// Several terms average both inputs before deriving further quantities, so
/// swapping the arguments may change the result in the last bits.
pub fn perceptual_distance(lab1: &LabColor, lab2: &LabColor) -> f64 {
    let c1 = lab1.a.hypot(lab1.b);
    let c2 = lab2.a.hypot(lab2.b);
    let c_bar7 = ((c1 + c2) / 2.0).powi(7);
    let g = 0.5 * (1.0 - (c_bar7 / (c_bar7 + POW25_7)).sqrt());

    let a1p = (1.0 + g) * lab1.a;
    let a2p = (1.0 + g) * lab2.a;
    let c1p = a1p.hypot(lab1.b);
    let c2p = a2p.hypot(lab2.b);

    let delta_l = lab2.l - lab1.l;
    let l_bar = (lab1.l + lab2.l) / 2.0;
    let l_dev = (l_bar - 50.0).powi(2);
    let sl = 1.0 + (0.015 * l_dev) / (20.0 + l_dev).sqrt();

    // Neutral pair: chroma and hue terms vanish, only lightness remains.
    if c1p == 0.0 && c2p == 0.0 {
        return (delta_l / sl).abs();
    }

    let h1p = hue_degrees(lab1.b, a1p);
    let h2p = hue_degrees(lab2.b, a2p);
    let chroma_product = c1p * c2p;

    let delta_c = c2p - c1p;
    let delta_h_deg = if chroma_product == 0.0 {
        0.0
    } else {
        let diff = h2p - h1p;
        if diff > 180.0 {
            diff - 360.0
        } else if diff < -180.0 {
            diff + 360.0
        } else {
            diff
        }
    };
    let delta_h = 2.0 * chroma_product.sqrt() * (delta_h_deg.to_radians() / 2.0).sin();

    let c_bar_p = (c1p + c2p) / 2.0;
    let h_bar_p = if chroma_product == 0.0 {
        h1p + h2p
    } else if (h1p - h2p).abs() <= 180.0 {
        (h1p + h2p) / 2.0
    } else if h1p + h2p < 360.0 {
        (h1p + h2p + 360.0) / 2.0
    } else {
        (h1p + h2p - 360.0) / 2.0
    };

    let t = 1.0 - 0.17 * (h_bar_p - 30.0).to_radians().cos()
        + 0.24 * (2.0 * h_bar_p).to_radians().cos()
        + 0.32 * (3.0 * h_bar_p + 6.0).to_radians().cos()
        - 0.20 * (4.0 * h_bar_p - 63.0).to_radians().cos();

    let delta_theta = 30.0 * (-((h_bar_p - 275.0) / 25.0).powi(2)).exp();
    let c_bar_p7 = c_bar_p.powi(7);
    let rc = 2.0 * (c_bar_p7 / (c_bar_p7 + POW25_7)).sqrt();
    let rt = -(2.0 * delta_theta).to_radians().sin() * rc;

    let sc = 1.0 + 0.045 * c_bar_p;
    let sh = 1.0 + 0.015 * c_bar_p * t;

    let dl = delta_l / sl;
    let dc = delta_c / sc;
    let dh = delta_h / sh;

    (dl * dl + dc * dc + dh * dh + rt * dc * dh).max(0.0).sqrt()
}

fn hue_degrees(b: f64, a_prime: f64) -> f64 {
    if b == 0.0 && a_prime == 0.0 {
        0.0
    } else {
        b.atan2(a_prime).to_degrees().rem_euclid(360.0)
    }
}
