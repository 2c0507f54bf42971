//! Region location for a target color.
//!
//! Connected components are found with an explicit-stack flood fill over a
//! binary tolerance mask. Each pixel is pushed at most once (guarded by a
//! visited bitmap indexed `y * width + x`), so stack depth never depends on
//! region size and megapixel regions are safe.

use image::{imageops, imageops::FilterType, RgbaImage};

use crate::error::DtcError;
use crate::types::{BoundingBox, LocatedColor, PixelBuffer, PixelRegion, Point, Rgb, SampledColor};
use crate::Result;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LocateOptions {
    /// Max Euclidean RGB distance for a pixel to count as the target color
    pub tolerance: f64,
    /// Components smaller than this share of the buffer (0-100) are dropped
    pub min_region_percent: f64,
}

impl Default for LocateOptions {
    fn default() -> Self {
        Self {
            tolerance: 10.0,
            min_region_percent: 0.1,
        }
    }
}

/// Running statistics for one component, updated as pixels are visited.
struct ComponentAccumulator {
    min_x: u32,
    min_y: u32,
    max_x: u32,
    max_y: u32,
    sum_x: u64,
    sum_y: u64,
    count: usize,
}

impl ComponentAccumulator {
    fn new(x: u32, y: u32) -> Self {
        Self {
            min_x: x,
            min_y: y,
            max_x: x,
            max_y: y,
            sum_x: 0,
            sum_y: 0,
            count: 0,
        }
    }

    fn add(&mut self, x: u32, y: u32) {
        self.min_x = self.min_x.min(x);
        self.min_y = self.min_y.min(y);
        self.max_x = self.max_x.max(x);
        self.max_y = self.max_y.max(y);
        self.sum_x += x as u64;
        self.sum_y += y as u64;
        self.count += 1;
    }

    fn into_region(self, total_pixels: usize) -> PixelRegion {
        let n = self.count as f64;
        PixelRegion {
            bounding_box: BoundingBox::new(
                self.min_x as f64,
                self.min_y as f64,
                (self.max_x - self.min_x + 1) as f64,
                (self.max_y - self.min_y + 1) as f64,
            ),
            // pixel centers sit at +0.5
            centroid: Point::new(self.sum_x as f64 / n + 0.5, self.sum_y as f64 / n + 0.5),
            pixel_count: self.count,
            coverage_percentage: n / total_pixels as f64 * 100.0,
        }
    }
}

/// Find 4-connected regions of `target` (within tolerance), largest first.
pub fn locate_regions(
    buffer: &PixelBuffer,
    target: Rgb,
    options: &LocateOptions,
) -> Vec<PixelRegion> {
    if buffer.is_empty() {
        return Vec::new();
    }

    let width = buffer.width() as usize;
    let height = buffer.height() as usize;
    let total = width * height;

    let mask: Vec<bool> = buffer
        .as_raw()
        .chunks_exact(4)
        .map(|px| Rgb::new(px[0], px[1], px[2]).euclidean_distance(target) <= options.tolerance)
        .collect();

    let mut visited = vec![false; total];
    let mut stack: Vec<usize> = Vec::new();
    let mut regions = Vec::new();

    for seed in 0..total {
        if !mask[seed] || visited[seed] {
            continue;
        }

        let mut acc = ComponentAccumulator::new((seed % width) as u32, (seed / width) as u32);
        visited[seed] = true;
        stack.push(seed);

        while let Some(idx) = stack.pop() {
            let x = idx % width;
            let y = idx / width;
            acc.add(x as u32, y as u32);

            let mut visit = |n: usize| {
                if mask[n] && !visited[n] {
                    visited[n] = true;
                    stack.push(n);
                }
            };
            if x > 0 {
                visit(idx - 1);
            }
            if x + 1 < width {
                visit(idx + 1);
            }
            if y > 0 {
                visit(idx - width);
            }
            if y + 1 < height {
                visit(idx + width);
            }
        }

        let percent = acc.count as f64 / total as f64 * 100.0;
        if percent >= options.min_region_percent {
            regions.push(acc.into_region(total));
        }
    }

    // stable: equal sizes keep scan order of their seed pixel
    regions.sort_by(|a, b| b.pixel_count.cmp(&a.pixel_count));
    regions
}

/// Anchor a sampled color at its largest region, or at the whole buffer when
/// no region survives filtering.
pub fn locate_color(
    buffer: &PixelBuffer,
    sampled: &SampledColor,
    options: &LocateOptions,
) -> LocatedColor {
    match locate_regions(buffer, sampled.color, options).first() {
        Some(region) => LocatedColor::from_region(sampled, region),
        None => LocatedColor::fallback(sampled, buffer.full_bounds(), buffer.center()),
    }
}

/// A reduced copy of a buffer plus the factors mapping it back.
#[derive(Debug, Clone)]
pub struct Downscaled {
    pub buffer: PixelBuffer,
    /// original width / reduced width
    pub scale_x: f64,
    /// original height / reduced height
    pub scale_y: f64,
}

/// Shrink `buffer` (aspect preserved) so it holds at most `max_pixels`.
///
/// Returns `None` when the buffer is already small enough.
pub fn downscale_buffer(buffer: &PixelBuffer, max_pixels: u64) -> Result<Option<Downscaled>> {
    let total = buffer.pixel_count() as u64;
    if buffer.is_empty() || max_pixels == 0 || total <= max_pixels {
        return Ok(None);
    }

    let factor = (max_pixels as f64 / total as f64).sqrt();
    let new_w = ((buffer.width() as f64 * factor).floor() as u32).max(1);
    let new_h = ((buffer.height() as f64 * factor).floor() as u32).max(1);

    let image = RgbaImage::from_raw(buffer.width(), buffer.height(), buffer.as_raw().to_vec())
        .ok_or_else(|| DtcError::invalid_input("pixel buffer does not match its dimensions"))?;
    let resized = imageops::resize(&image, new_w, new_h, FilterType::Triangle);
    let reduced = PixelBuffer::new(new_w, new_h, resized.into_raw())?;

    Ok(Some(Downscaled {
        scale_x: buffer.width() as f64 / new_w as f64,
        scale_y: buffer.height() as f64 / new_h as f64,
        buffer: reduced,
    }))
}

/// Map a region found on a downscaled buffer back into original pixel space.
///
/// Bounds are clamped to `original`; coverage is scale-invariant.
pub fn rescale_region(
    region: &PixelRegion,
    scale_x: f64,
    scale_y: f64,
    original: &BoundingBox,
) -> PixelRegion {
    let bb = region.bounding_box;
    let x = (bb.x * scale_x).clamp(0.0, original.width);
    let y = (bb.y * scale_y).clamp(0.0, original.height);
    let right = ((bb.x + bb.width) * scale_x).clamp(x, original.width);
    let bottom = ((bb.y + bb.height) * scale_y).clamp(y, original.height);
    let centroid = Point::new(
        (region.centroid.x * scale_x).clamp(x, right),
        (region.centroid.y * scale_y).clamp(y, bottom),
    );

    PixelRegion {
        bounding_box: BoundingBox::new(x, y, right - x, bottom - y),
        centroid,
        pixel_count: ((region.pixel_count as f64 * scale_x * scale_y).round() as usize).max(1),
        coverage_percentage: region.coverage_percentage,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const RED: [u8; 4] = [255, 0, 0, 255];
    const WHITE: [u8; 4] = [255, 255, 255, 255];

    fn fill(buf: &mut PixelBuffer, x0: u32, y0: u32, w: u32, h: u32, rgba: [u8; 4]) {
        for y in y0..y0 + h {
            for x in x0..x0 + w {
                buf.set_rgba(x, y, rgba);
            }
        }
    }

    #[test]
    fn solid_buffer_is_one_full_region_centered() {
        let buf = PixelBuffer::from_pixel(4, 4, [10, 20, 30, 255]);
        let regions = locate_regions(&buf, Rgb::new(10, 20, 30), &LocateOptions::default());
        assert_eq!(regions.len(), 1);
        assert_eq!(regions[0].bounding_box, BoundingBox::new(0.0, 0.0, 4.0, 4.0));
        assert_eq!(regions[0].centroid, Point::new(2.0, 2.0));
        assert_eq!(regions[0].pixel_count, 16);
        assert_eq!(regions[0].coverage_percentage, 100.0);
    }

    #[test]
    fn separate_blocks_are_sorted_largest_first() {
        let mut buf = PixelBuffer::from_pixel(10, 10, WHITE);
        fill(&mut buf, 0, 0, 2, 2, RED);
        fill(&mut buf, 5, 5, 4, 3, RED);
        let regions = locate_regions(&buf, Rgb::new(255, 0, 0), &LocateOptions::default());
        assert_eq!(regions.len(), 2);
        assert_eq!(regions[0].pixel_count, 12);
        assert_eq!(regions[0].bounding_box, BoundingBox::new(5.0, 5.0, 4.0, 3.0));
        assert_eq!(regions[0].centroid, Point::new(7.0, 6.5));
        assert_eq!(regions[1].pixel_count, 4);
    }

    #[test]
    fn diagonal_neighbors_are_not_connected() {
        let mut buf = PixelBuffer::from_pixel(2, 2, WHITE);
        buf.set_rgba(0, 0, RED);
        buf.set_rgba(1, 1, RED);
        let regions = locate_regions(&buf, Rgb::new(255, 0, 0), &LocateOptions::default());
        assert_eq!(regions.len(), 2);
        assert!(regions.iter().all(|r| r.pixel_count == 1));
    }

    #[test]
    fn tolerance_admits_near_colors() {
        let mut buf = PixelBuffer::from_pixel(3, 1, WHITE);
        buf.set_rgba(0, 0, [250, 3, 0, 255]);
        buf.set_rgba(1, 0, RED);
        let strict = LocateOptions {
            tolerance: 0.0,
            min_region_percent: 0.0,
        };
        assert_eq!(locate_regions(&buf, Rgb::new(255, 0, 0), &strict)[0].pixel_count, 1);
        let loose = LocateOptions {
            tolerance: 10.0,
            min_region_percent: 0.0,
        };
        assert_eq!(locate_regions(&buf, Rgb::new(255, 0, 0), &loose)[0].pixel_count, 2);
    }

    #[test]
    fn small_regions_are_filtered_by_percent() {
        let mut buf = PixelBuffer::from_pixel(10, 10, WHITE);
        buf.set_rgba(0, 0, RED);
        fill(&mut buf, 4, 4, 3, 3, RED);
        let options = LocateOptions {
            tolerance: 0.0,
            min_region_percent: 5.0,
        };
        let regions = locate_regions(&buf, Rgb::new(255, 0, 0), &options);
        assert_eq!(regions.len(), 1);
        let total = 100.0;
        for r in &regions {
            assert!(r.pixel_count as f64 >= options.min_region_percent / 100.0 * total);
        }
    }

    #[test]
    fn bounding_box_contains_centroid_for_irregular_shape() {
        let mut buf = PixelBuffer::from_pixel(6, 6, WHITE);
        // L shape
        fill(&mut buf, 0, 0, 1, 6, RED);
        fill(&mut buf, 0, 5, 6, 1, RED);
        let regions = locate_regions(&buf, Rgb::new(255, 0, 0), &LocateOptions::default());
        assert_eq!(regions.len(), 1);
        let r = regions[0];
        assert_eq!(r.pixel_count, 11);
        assert_eq!(r.bounding_box, BoundingBox::new(0.0, 0.0, 6.0, 6.0));
        assert!(r.bounding_box.contains(&r.centroid));
    }

    #[test]
    fn full_buffer_region_does_not_overflow_stack() {
        let buf = PixelBuffer::from_pixel(1200, 900, RED);
        let regions = locate_regions(&buf, Rgb::new(255, 0, 0), &LocateOptions::default());
        assert_eq!(regions.len(), 1);
        assert_eq!(regions[0].pixel_count, 1200 * 900);
    }

    #[test]
    fn missing_color_falls_back_to_full_buffer() {
        let buf = PixelBuffer::from_pixel(8, 6, WHITE);
        let sampled = SampledColor {
            color: Rgb::new(0, 0, 0),
            coverage_percentage: 1.0,
        };
        let located = locate_color(&buf, &sampled, &LocateOptions::default());
        assert!(!located.region_found());
        assert_eq!(located.bounding_box, BoundingBox::new(0.0, 0.0, 8.0, 6.0));
        assert_eq!(located.centroid, Point::new(4.0, 3.0));
    }

    #[test]
    fn downscale_skips_small_buffers() {
        let buf = PixelBuffer::from_pixel(10, 10, RED);
        assert!(downscale_buffer(&buf, 100).unwrap().is_none());
    }

    #[test]
    fn downscale_then_rescale_recovers_original_geometry() {
        let mut buf = PixelBuffer::from_pixel(400, 200, WHITE);
        fill(&mut buf, 200, 0, 200, 200, RED);
        let reduced = downscale_buffer(&buf, 20_000).unwrap().expect("should shrink");
        assert_eq!(reduced.buffer.width(), 200);
        assert_eq!(reduced.buffer.height(), 100);
        assert_eq!(reduced.scale_x, 2.0);

        let options = LocateOptions::default();
        let region = locate_regions(&reduced.buffer, Rgb::new(255, 0, 0), &options)[0];
        let mapped = rescale_region(&region, reduced.scale_x, reduced.scale_y, &buf.full_bounds());
        assert!((mapped.bounding_box.x - 200.0).abs() <= 4.0);
        assert!((mapped.bounding_box.x + mapped.bounding_box.width - 400.0).abs() < 1e-9);
        assert!((mapped.centroid.x - 300.0).abs() <= 4.0);
        assert!((mapped.centroid.y - 100.0).abs() <= 1.0);
        assert!(mapped.bounding_box.contains(&mapped.centroid));
        assert!((mapped.pixel_count as f64 - 40_000.0).abs() <= 1_000.0);
    }
}
