/// Per-pixel intensity mappings.
///
/// - Contrast stretching: `S = a*r + b` with `a = 245 / (Imax - Imin)` and
///   `b = 10 - a*Imin`, so the output spans `[10, 255]`.
/// - Power law: `S = 255 * (r / 255)^gamma`.
///
/// Both truncate toward zero when converting back to 8 bits.
use log::{debug, warn};
use ndarray::{Array2, ArrayView2};

use crate::buffer::{ImageBuffer, ImageError, MAX_INTENSITY_8BIT};
use crate::params::Gamma;

pub const STRETCH_LOW: i64 = 10;
pub const STRETCH_HIGH: i64 = 255;

/// Linearly remap the observed intensity range of `img` onto `[10, 255]`.
///
/// Fails with `DegenerateRange` when every pixel has the same value.
pub fn contrast_stretching(img: &ImageBuffer) -> Result<ImageBuffer, ImageError> {
    let pixels = stretch_view(img.pixels().mapv(i32::from).view())?;
    Ok(ImageBuffer::from_transform(pixels, MAX_INTENSITY_8BIT))
}

/// Stretch a signed grid (e.g. raw gradient magnitudes) onto `[10, 255]`.
pub fn stretch_grid(grid: &Array2<i32>) -> Result<Array2<u8>, ImageError> {
    stretch_view(grid.view())
}

fn stretch_view(grid: ArrayView2<'_, i32>) -> Result<Array2<u8>, ImageError> {
    let (lo, hi) = grid
        .iter()
        .fold((i32::MAX, i32::MIN), |(lo, hi), &v| (lo.min(v), hi.max(v)));

    if lo >= hi {
        warn!("contrast stretch rejected: flat range at {}", lo);
        return Err(ImageError::DegenerateRange { value: lo });
    }
    debug!("contrast stretch [{}, {}] -> [10, 255]", lo, hi);

    // Exact integer form of a*r + b, truncated
    let span = i64::from(hi) - i64::from(lo);
    let gain = STRETCH_HIGH - STRETCH_LOW;
    Ok(grid.mapv(|v| (STRETCH_LOW + gain * (i64::from(v) - i64::from(lo)) / span) as u8))
}

/// Power-law (gamma) mapping on intensities normalized by 255.
pub fn apply_power_law(img: &ImageBuffer, gamma: Gamma) -> ImageBuffer {
    debug!(
        "power law gamma={} on {}x{} image",
        gamma,
        img.rows(),
        img.cols()
    );
    let lut = power_law_lut(gamma);
    let pixels = img.pixels().mapv(|v| lut[v as usize]);
    ImageBuffer::from_transform(pixels, MAX_INTENSITY_8BIT)
}

/// Lookup table for `255 * (p / 255)^gamma`, truncated.
fn power_law_lut(gamma: Gamma) -> [u8; 256] {
    let g = gamma.value();
    let mut lut = [0u8; 256];
    for (p, out) in lut.iter_mut().enumerate() {
        let val = 255.0 * (p as f64 / 255.0).powf(g);
        *out = val.clamp(0.0, 255.0) as u8;
    }
    lut
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn test_stretch_hits_both_ends() {
        let img = ImageBuffer::new(array![[50, 60], [70, 150]], 255).unwrap();
        let out = contrast_stretching(&img).unwrap();
        assert_eq!(out.get(0, 0), Some(10));
        assert_eq!(out.get(1, 1), Some(255));
        // 10 + 245 * 20 / 100 = 59
        assert_eq!(out.get(1, 0), Some(59));
        assert_eq!(out.max_intensity(), 255);
    }

    #[test]
    fn test_stretch_output_range() {
        let data: Vec<u8> = (0..64).map(|i| (i * 37 % 200) as u8 + 3).collect();
        let img = ImageBuffer::from_vec(8, 8, 255, data).unwrap();
        let out = contrast_stretching(&img).unwrap();
        assert!(out.pixels().iter().all(|&v| (10..=255).contains(&v)));
        let (lo, hi) = out.min_max();
        assert_eq!((lo, hi), (10, 255));
    }

    #[test]
    fn test_stretch_flat_image_rejected() {
        let img = ImageBuffer::filled(3, 3, 42, 255).unwrap();
        assert_eq!(
            contrast_stretching(&img),
            Err(ImageError::DegenerateRange { value: 42 })
        );
    }

    #[test]
    fn test_stretch_grid_beyond_8bit() {
        let grid = array![[-40, 0], [1000, 2000]];
        let out = stretch_grid(&grid).unwrap();
        assert_eq!(out[[0, 0]], 10);
        assert_eq!(out[[1, 1]], 255);
        // 10 + 245 * 40 / 2040 = 14
        assert_eq!(out[[0, 1]], 14);
    }

    #[test]
    fn test_power_law_identity() {
        let data: Vec<u8> = (0..=255).collect();
        let img = ImageBuffer::from_vec(16, 16, 255, data).unwrap();
        let out = apply_power_law(&img, Gamma::IDENTITY);
        assert_eq!(out.pixels(), img.pixels());
    }

    #[test]
    fn test_power_law_endpoints_fixed() {
        let img = ImageBuffer::new(array![[0, 255]], 255).unwrap();
        for g in [0.01, 0.2, 0.3, 0.5, 0.7, 2.0, 4.0, 10.0] {
            let out = apply_power_law(&img, Gamma::new(g).unwrap());
            assert_eq!(out.get(0, 0), Some(0), "gamma {g}");
            assert_eq!(out.get(0, 1), Some(255), "gamma {g}");
        }
    }

    #[test]
    fn test_power_law_direction() {
        let img = ImageBuffer::new(array![[64, 128]], 255).unwrap();
        let bright = apply_power_law(&img, Gamma::new(0.5).unwrap());
        let dark = apply_power_law(&img, Gamma::new(2.0).unwrap());
        // 255 * sqrt(128/255) = 180.66
        assert_eq!(bright.get(0, 1), Some(180));
        // 255 * (128/255)^2 = 64.25
        assert_eq!(dark.get(0, 1), Some(64));
        assert!(bright.get(0, 0) > Some(64));
        assert!(dark.get(0, 0) < Some(64));
    }
}
