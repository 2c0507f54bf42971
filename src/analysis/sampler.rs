use std::collections::HashMap;

use crate::types::{PixelBuffer, Rgb, SampledColor};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SampleOptions {
    /// Grid step in pixels along both axes
    pub stride: u32,
    /// Sampled pixels with alpha below this are skipped
    pub alpha_cutoff: u8,
    pub max_colors: usize,
}

impl Default for SampleOptions {
    fn default() -> Self {
        Self {
            stride: 4,
            alpha_cutoff: 128,
            max_colors: 64,
        }
    }
}

/// Build a ranked palette of exact 24-bit colors from a 2-D sampling grid.
///
/// Percentages are relative to the sampled pixels that survived the alpha
/// cutoff. Equal percentages keep row-major first-seen order.
pub fn sample_colors(buffer: &PixelBuffer, options: &SampleOptions) -> Vec<SampledColor> {
    if buffer.is_empty() || options.max_colors == 0 {
        return Vec::new();
    }

    let step = options.stride.max(1) as usize;
    let mut slots: HashMap<u32, usize> = HashMap::new();
    let mut counts: Vec<(Rgb, usize)> = Vec::new();
    let mut sampled = 0usize;

    for y in (0..buffer.height()).step_by(step) {
        for x in (0..buffer.width()).step_by(step) {
            if buffer.rgba(x, y)[3] < options.alpha_cutoff {
                continue;
            }
            sampled += 1;
            let color = buffer.rgb(x, y);
            match slots.get(&color.key()) {
                Some(&slot) => counts[slot].1 += 1,
                None => {
                    slots.insert(color.key(), counts.len());
                    counts.push((color, 1));
                }
            }
        }
    }

    if sampled == 0 {
        return Vec::new();
    }

    // stable: ties stay in first-seen order
    counts.sort_by(|a, b| b.1.cmp(&a.1));
    counts.truncate(options.max_colors);

    let total = sampled as f64;
    counts
        .into_iter()
        .map(|(color, count)| SampledColor {
            color,
            coverage_percentage: count as f64 / total * 100.0,
        })
        .collect()
}
