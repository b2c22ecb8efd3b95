/// Prewitt and Sobel edge detection.
///
/// Each interior pixel gets the two directional responses of its window,
/// combined as `|vertical| + |horizontal|` (L1, no sqrt). Border pixels carry
/// the raw source intensity into all three output grids, so the untouched ring
/// shows scene brightness rather than zero. The magnitude grid is then
/// contrast-stretched back into `[10, 255]` for display.
use log::debug;
use ndarray::Array2;

use crate::buffer::{ImageBuffer, ImageError, MAX_INTENSITY_8BIT};
use crate::convolve::map_windows;
use crate::kernel::Kernel;
use crate::point::stretch_grid;

/// Magnitude and per-direction gradient grids, same shape as the source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EdgeMaps {
    pub magnitude: Array2<i32>,
    pub horizontal: Array2<i32>,
    pub vertical: Array2<i32>,
}

#[derive(Debug, Clone, Copy, Default)]
struct GradientCell {
    vertical: i32,
    horizontal: i32,
    magnitude: i32,
}

/// Run both kernels over every interior window of `img`.
pub fn get_img_edges(
    img: &ImageBuffer,
    vertical: &Kernel,
    horizontal: &Kernel,
) -> Result<EdgeMaps, ImageError> {
    if vertical.size() != horizontal.size() {
        return Err(ImageError::KernelMismatch {
            vertical: vertical.size(),
            horizontal: horizontal.size(),
        });
    }

    let cells = map_windows(
        img.pixels(),
        vertical.size(),
        |v| {
            let raw = i32::from(v);
            GradientCell {
                vertical: raw,
                horizontal: raw,
                magnitude: raw,
            }
        },
        |window| {
            let vert = vertical.apply(window).abs();
            let hor = horizontal.apply(window).abs();
            GradientCell {
                vertical: vert,
                horizontal: hor,
                magnitude: vert + hor,
            }
        },
    );

    Ok(EdgeMaps {
        magnitude: cells.mapv(|c| c.magnitude),
        horizontal: cells.mapv(|c| c.horizontal),
        vertical: cells.mapv(|c| c.vertical),
    })
}

/// Fixed directional kernel pairs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EdgeOperator {
    Prewitt,
    Sobel,
}

impl EdgeOperator {
    /// `(vertical, horizontal)` kernels for this operator.
    pub fn kernels(self) -> (Kernel, Kernel) {
        match self {
            EdgeOperator::Prewitt => (Kernel::prewitt_vertical(), Kernel::prewitt_horizontal()),
            EdgeOperator::Sobel => (Kernel::sobel_vertical(), Kernel::sobel_horizontal()),
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            EdgeOperator::Prewitt => "prewitt",
            EdgeOperator::Sobel => "sobel",
        }
    }

    /// Stretched magnitude image, ready for display.
    pub fn detect(self, img: &ImageBuffer) -> Result<ImageBuffer, ImageError> {
        debug!(
            "{} edges on {}x{} image",
            self.name(),
            img.rows(),
            img.cols()
        );
        let (vertical, horizontal) = self.kernels();
        let maps = get_img_edges(img, &vertical, &horizontal)?;
        let pixels = stretch_grid(&maps.magnitude)?;
        Ok(ImageBuffer::from_transform(pixels, MAX_INTENSITY_8BIT))
    }
}

pub fn get_edges_using_prewitt(img: &ImageBuffer) -> Result<ImageBuffer, ImageError> {
    EdgeOperator::Prewitt.detect(img)
}

pub fn get_edges_using_sobel(img: &ImageBuffer) -> Result<ImageBuffer, ImageError> {
    EdgeOperator::Sobel.detect(img)
}
