//! Rasterize a normalized region into a binary mask, the way the detection
//! backend turns a stored region into the pixels it analyses.
//!
//! Normalized values are scaled to the frame and truncated to whole pixels.
//! Rectangle corners are inclusive and circle radii scale with frame width.

use image::{GrayImage, Luma};

use crate::error::PayloadError;
use crate::payload::{Roi, RoiPoints, ShapeType};

const INSIDE: Luma<u8> = Luma([255]);

/// Build a `width` x `height` mask with 255 inside the region and 0 elsewhere
pub fn rasterize(roi: &Roi, width: u32, height: u32) -> Result<GrayImage, PayloadError> {
    roi.validate()?;

    let mut mask = GrayImage::new(width, height);
    if width == 0 || height == 0 {
        return Ok(mask);
    }

    let w = width as f32;
    let h = height as f32;

    match (&roi.shape_type, &roi.points) {
        (ShapeType::Rect, RoiPoints::Flat(v)) => {
            let x0 = (v[0] * w) as i64;
            let y0 = (v[1] * h) as i64;
            let x1 = x0 + (v[2] * w) as i64;
            let y1 = y0 + (v[3] * h) as i64;
            fill_rect(&mut mask, x0, y0, x1, y1);
        }
        (ShapeType::Circle, RoiPoints::Flat(v)) => {
            let cx = (v[0] * w) as i64;
            let cy = (v[1] * h) as i64;
            let r = (v[2] * w) as i64;
            fill_circle(&mut mask, cx, cy, r);
        }
        (ShapeType::Poly, RoiPoints::Pairs(pairs)) => {
            let vertices: Vec<(f32, f32)> = pairs
                .iter()
                .map(|[x, y]| ((x * w).trunc(), (y * h).trunc()))
                .collect();
            fill_polygon(&mut mask, &vertices);
        }
        // validate() only lets matching layouts through
        _ => {}
    }

    Ok(mask)
}

/// Fraction of the mask's pixels that are inside the region
pub fn coverage(mask: &GrayImage) -> f32 {
    let total = mask.width() as usize * mask.height() as usize;
    if total == 0 {
        return 0.0;
    }
    let inside = mask.pixels().filter(|p| p.0[0] > 0).count();
    inside as f32 / total as f32
}

fn fill_rect(mask: &mut GrayImage, x0: i64, y0: i64, x1: i64, y1: i64) {
    let max_x = mask.width() as i64 - 1;
    let max_y = mask.height() as i64 - 1;
    for y in y0.max(0)..=y1.min(max_y) {
        for x in x0.max(0)..=x1.min(max_x) {
            mask.put_pixel(x as u32, y as u32, INSIDE);
        }
    }
}

fn fill_circle(mask: &mut GrayImage, cx: i64, cy: i64, r: i64) {
    let max_x = mask.width() as i64 - 1;
    let max_y = mask.height() as i64 - 1;
    for y in (cy - r).max(0)..=(cy + r).min(max_y) {
        for x in (cx - r).max(0)..=(cx + r).min(max_x) {
            let (dx, dy) = (x - cx, y - cy);
            if dx * dx + dy * dy <= r * r {
                mask.put_pixel(x as u32, y as u32, INSIDE);
            }
        }
    }
}

/// Even-odd scanline fill, sampling each row at its pixel centers
fn fill_polygon(mask: &mut GrayImage, vertices: &[(f32, f32)]) {
    let max_x = mask.width() as i64 - 1;
    let mut crossings: Vec<f32> = Vec::with_capacity(vertices.len());

    for row in 0..mask.height() {
        let sample_y = row as f32 + 0.5;
        crossings.clear();

        for (i, &(ax, ay)) in vertices.iter().enumerate() {
            let (bx, by) = vertices[(i + 1) % vertices.len()];
            if (ay <= sample_y) != (by <= sample_y) {
                let t = (sample_y - ay) / (by - ay);
                crossings.push(ax + t * (bx - ax));
            }
        }
        crossings.sort_by(|a, b| a.total_cmp(b));

        for span in crossings.chunks_exact(2) {
            let start = (span[0] - 0.5).ceil().max(0.0) as i64;
            let end = ((span[1] - 0.5).floor() as i64).min(max_x);
            for x in start..=end {
                mask.put_pixel(x as u32, row, INSIDE);
            }
        }
    }
}
