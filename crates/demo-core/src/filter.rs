//! Image-filter parameters and pixel packing.
//!
//! Pixels cross the GPU boundary as packed `u32`s (little-endian RGBA, the
//! byte order the filter kernel unpacks). The demo's source image is
//! generated here so the result is deterministic and testable.

use bytemuck::{Pod, Zeroable};
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum FilterError {
    #[error("unknown filter '{0}'")]
    UnknownFilter(String),
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum FilterKind {
    #[default]
    None,
    Grayscale,
    Sepia,
    Invert,
    Blur,
}

impl FilterKind {
    /// Parse a `<select>` option value.
    pub fn from_name(name: &str) -> Result<Self, FilterError> {
        match name {
            "none" => Ok(FilterKind::None),
            "grayscale" => Ok(FilterKind::Grayscale),
            "sepia" => Ok(FilterKind::Sepia),
            "invert" => Ok(FilterKind::Invert),
            "blur" => Ok(FilterKind::Blur),
            other => Err(FilterError::UnknownFilter(other.to_string())),
        }
    }

    /// Discriminant as the filter kernel's switch value.
    pub fn as_u32(self) -> u32 {
        match self {
            FilterKind::None => 0,
            FilterKind::Grayscale => 1,
            FilterKind::Sepia => 2,
            FilterKind::Invert => 3,
            FilterKind::Blur => 4,
        }
    }
}

/// Uniform for the filter kernel. Mirrors `FilterParams` in filter.wgsl.
#[repr(C)]
#[derive(Copy, Clone, Debug, Default, Pod, Zeroable)]
pub struct FilterParams {
    pub filter: u32,
    pub intensity: f32,
    pub width: u32,
    pub height: u32,
}

/// Pack one RGBA pixel into a `u32` (r in the low byte).
#[inline]
pub fn pack_rgba(r: u8, g: u8, b: u8, a: u8) -> u32 {
    r as u32 | (g as u32) << 8 | (b as u32) << 16 | (a as u32) << 24
}

#[inline]
pub fn unpack_rgba(packed: u32) -> [u8; 4] {
    [
        (packed & 0xff) as u8,
        (packed >> 8 & 0xff) as u8,
        (packed >> 16 & 0xff) as u8,
        (packed >> 24 & 0xff) as u8,
    ]
}

/// Pack an RGBA byte image (as a 2D canvas hands it out) into kernel input.
pub fn pack_pixels(rgba: &[u8]) -> Vec<u32> {
    rgba.chunks_exact(4)
        .map(|px| pack_rgba(px[0], px[1], px[2], px[3]))
        .collect()
}

pub fn unpack_pixels(packed: &[u32]) -> Vec<u8> {
    let mut out = Vec::with_capacity(packed.len() * 4);
    for &px in packed {
        out.extend_from_slice(&unpack_rgba(px));
    }
    out
}

/// Procedural test card: a diagonal gradient with a circle, a square, and a
/// triangle, so every filter has edges and flat regions to chew on.
/// Returns tightly packed RGBA bytes, row-major.
pub fn sample_image(width: u32, height: u32) -> Vec<u8> {
    let w = width as f32;
    let h = height as f32;
    let stops: [[f32; 3]; 5] = [
        [1.0, 0.42, 0.42],
        [1.0, 0.79, 0.34],
        [0.28, 0.86, 0.98],
        [1.0, 0.62, 0.95],
        [0.33, 0.63, 1.0],
    ];

    let mut out = Vec::with_capacity((width * height * 4) as usize);
    for y in 0..height {
        for x in 0..width {
            let fx = x as f32;
            let fy = y as f32;

            // Diagonal gradient across the stop list.
            let t = ((fx / w + fy / h) * 0.5).clamp(0.0, 1.0) * (stops.len() - 1) as f32;
            let i = (t as usize).min(stops.len() - 2);
            let frac = t - i as f32;
            let mut rgb = [
                stops[i][0] + (stops[i + 1][0] - stops[i][0]) * frac,
                stops[i][1] + (stops[i + 1][1] - stops[i][1]) * frac,
                stops[i][2] + (stops[i + 1][2] - stops[i][2]) * frac,
            ];

            // White circle at (100, 100), r=60.
            let (dx, dy) = (fx - 100.0, fy - 100.0);
            if dx * dx + dy * dy <= 60.0 * 60.0 {
                for c in rgb.iter_mut() {
                    *c = *c * 0.2 + 0.8;
                }
            }

            // Dark square at (250, 80), 100x100.
            if (250.0..350.0).contains(&fx) && (80.0..180.0).contains(&fy) {
                for c in rgb.iter_mut() {
                    *c *= 0.5;
                }
            }

            // Light triangle with apex (200, 250) and base y=280.
            if (250.0..=280.0).contains(&fy) {
                let half_width = (fy - 250.0) * 2.0;
                if (fx - 200.0).abs() <= half_width {
                    for c in rgb.iter_mut() {
                        *c = *c * 0.4 + 0.6;
                    }
                }
            }

            out.push((rgb[0].clamp(0.0, 1.0) * 255.0) as u8);
            out.push((rgb[1].clamp(0.0, 1.0) * 255.0) as u8);
            out.push((rgb[2].clamp(0.0, 1.0) * 255.0) as u8);
            out.push(255);
        }
    }
    out
}
