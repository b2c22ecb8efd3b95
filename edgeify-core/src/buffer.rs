/// Grayscale intensity buffer shared by every transform.
///
/// Pixels are stored row-major in an `Array2<u8>` of shape `(rows, cols)`.
/// Transforms never edit a buffer; each one builds a new `ImageBuffer`.
use ndarray::{Array2, ArrayView2};
use thiserror::Error;

use crate::params::ParamError;

/// Maximum intensity produced by the 8-bit transforms.
pub const MAX_INTENSITY_8BIT: u16 = 255;

/// Errors raised by buffer construction and the core transforms.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ImageError {
    #[error("image has no pixels ({rows}x{cols})")]
    Empty { rows: usize, cols: usize },
    #[error("max intensity must be in 1..=255, got {0}")]
    InvalidMaxIntensity(u16),
    #[error("pixel {value} at ({row}, {col}) exceeds max intensity {max}")]
    PixelOutOfRange {
        row: usize,
        col: usize,
        value: u8,
        max: u16,
    },
    #[error("expected {expected} pixels for {rows}x{cols}, got {found}")]
    ShapeMismatch {
        rows: usize,
        cols: usize,
        expected: usize,
        found: usize,
    },
    #[error("degenerate dynamic range: every pixel is {value}")]
    DegenerateRange { value: i32 },
    #[error("kernel must be square with an odd side, got {rows}x{cols}")]
    InvalidKernel { rows: usize, cols: usize },
    #[error("kernel sizes differ: {vertical} vs {horizontal}")]
    KernelMismatch { vertical: usize, horizontal: usize },
    #[error(transparent)]
    Param(#[from] ParamError),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageBuffer {
    pixels: Array2<u8>,
    max_intensity: u16,
}

impl ImageBuffer {
    /// Wrap a pixel grid, checking that it is non-empty and within `max_intensity`.
    pub fn new(pixels: Array2<u8>, max_intensity: u16) -> Result<Self, ImageError> {
        let (rows, cols) = pixels.dim();
        if rows == 0 || cols == 0 {
            return Err(ImageError::Empty { rows, cols });
        }
        if max_intensity == 0 || max_intensity > MAX_INTENSITY_8BIT {
            return Err(ImageError::InvalidMaxIntensity(max_intensity));
        }
        if let Some(((row, col), &value)) = pixels
            .indexed_iter()
            .find(|(_, &v)| u16::from(v) > max_intensity)
        {
            return Err(ImageError::PixelOutOfRange {
                row,
                col,
                value,
                max: max_intensity,
            });
        }
        Ok(Self {
            pixels,
            max_intensity,
        })
    }

    /// Build from a flat row-major vector.
    pub fn from_vec(
        rows: usize,
        cols: usize,
        max_intensity: u16,
        data: Vec<u8>,
    ) -> Result<Self, ImageError> {
        let found = data.len();
        let pixels = Array2::from_shape_vec((rows, cols), data).map_err(|_| {
            ImageError::ShapeMismatch {
                rows,
                cols,
                expected: rows * cols,
                found,
            }
        })?;
        Self::new(pixels, max_intensity)
    }

    /// Buffer with every pixel set to `value`.
    pub fn filled(rows: usize, cols: usize, value: u8, max_intensity: u16) -> Result<Self, ImageError> {
        Self::new(Array2::from_elem((rows, cols), value), max_intensity)
    }

    /// Internal constructor for transform outputs that are in range by construction.
    pub(crate) fn from_transform(pixels: Array2<u8>, max_intensity: u16) -> Self {
        debug_assert!(pixels.iter().all(|&v| u16::from(v) <= max_intensity));
        Self {
            pixels,
            max_intensity,
        }
    }

    pub fn rows(&self) -> usize {
        self.pixels.nrows()
    }

    pub fn cols(&self) -> usize {
        self.pixels.ncols()
    }

    pub fn max_intensity(&self) -> u16 {
        self.max_intensity
    }

    pub fn pixels(&self) -> ArrayView2<'_, u8> {
        self.pixels.view()
    }

    pub fn get(&self, row: usize, col: usize) -> Option<u8> {
        self.pixels.get((row, col)).copied()
    }

    /// Smallest and largest intensity present.
    pub fn min_max(&self) -> (u8, u8) {
        self.pixels
            .iter()
            .fold((u8::MAX, u8::MIN), |(lo, hi), &v| (lo.min(v), hi.max(v)))
    }
}
