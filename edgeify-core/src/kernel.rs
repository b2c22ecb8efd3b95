/// Square, odd-sided integer kernels used by the neighborhood operations.
///
/// Prewitt and Sobel pairs, in row-major form:
/// ```text
///  prewitt vertical   prewitt horizontal   sobel vertical   sobel horizontal
///   -1  0  1           -1 -1 -1             -1  0  1         -1 -2 -1
///   -1  0  1            0  0  0             -2  0  2          0  0  0
///   -1  0  1            1  1  1             -1  0  1          1  2  1
/// ```
use ndarray::{arr2, Array2, ArrayView2};

use crate::buffer::ImageError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Kernel {
    weights: Array2<i32>,
}

impl Kernel {
    pub fn new(weights: Array2<i32>) -> Result<Self, ImageError> {
        let (rows, cols) = weights.dim();
        if rows != cols || rows % 2 == 0 {
            return Err(ImageError::InvalidKernel { rows, cols });
        }
        Ok(Self { weights })
    }

    fn from_3x3(rows: [[i32; 3]; 3]) -> Self {
        Self {
            weights: arr2(&rows),
        }
    }

    /// All-ones `n x n` kernel (unweighted neighborhood sum).
    pub fn box_filter(n: usize) -> Result<Self, ImageError> {
        Self::new(Array2::ones((n, n)))
    }

    pub fn prewitt_vertical() -> Self {
        Self::from_3x3([[-1, 0, 1], [-1, 0, 1], [-1, 0, 1]])
    }

    pub fn prewitt_horizontal() -> Self {
        Self::from_3x3([[-1, -1, -1], [0, 0, 0], [1, 1, 1]])
    }

    pub fn sobel_vertical() -> Self {
        Self::from_3x3([[-1, 0, 1], [-2, 0, 2], [-1, 0, 1]])
    }

    pub fn sobel_horizontal() -> Self {
        Self::from_3x3([[-1, -2, -1], [0, 0, 0], [1, 2, 1]])
    }

    pub fn size(&self) -> usize {
        self.weights.nrows()
    }

    pub fn margin(&self) -> usize {
        (self.size() - 1) / 2
    }

    pub fn weights(&self) -> ArrayView2<'_, i32> {
        self.weights.view()
    }

    /// Multiply-accumulate over a window of the same shape.
    #[inline]
    pub fn apply(&self, window: ArrayView2<'_, u8>) -> i32 {
        debug_assert_eq!(window.dim(), self.weights.dim());
        window
            .iter()
            .zip(self.weights.iter())
            .map(|(&p, &w)| p as i32 * w)
            .sum()
    }
}
