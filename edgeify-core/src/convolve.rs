/// Neighborhood-window engine shared by the mean filter, the median filter
/// and the edge detector.
///
/// A pixel `(i, k)` is interior when its whole `N x N` window fits inside the
/// image: `margin <= i < rows - margin` and `margin <= k < cols - margin`,
/// with `margin = (N - 1) / 2`. Interior pixels are reduced from a window of
/// the source; border pixels go through a separate border closure (the
/// filters copy the source value through unchanged).
use log::debug;
use ndarray::{s, Array2, ArrayView2, Zip};

use crate::buffer::ImageBuffer;
use crate::params::KernelSize;

#[inline]
pub fn is_interior(row: usize, col: usize, rows: usize, cols: usize, margin: usize) -> bool {
    row >= margin && row + margin < rows && col >= margin && col + margin < cols
}

/// Evaluate every output cell from the frozen source.
///
/// `size` must be odd. Rows are processed in parallel; each cell only reads
/// `src`, so the result does not depend on evaluation order.
pub fn map_windows<T, B, R>(src: ArrayView2<'_, u8>, size: usize, border: B, reduce: R) -> Array2<T>
where
    T: Default + Send,
    B: Fn(u8) -> T + Sync + Send,
    R: Fn(ArrayView2<'_, u8>) -> T + Sync + Send,
{
    debug_assert!(size % 2 == 1, "window side must be odd");
    let (rows, cols) = src.dim();
    let margin = (size - 1) / 2;

    let mut out = Array2::<T>::default((rows, cols));
    Zip::indexed(&mut out).par_for_each(|(i, k), cell| {
        *cell = if is_interior(i, k, rows, cols, margin) {
            reduce(src.slice(s![i - margin..=i + margin, k - margin..=k + margin]))
        } else {
            border(src[[i, k]])
        };
    });
    out
}

/// Unweighted mean over each `N x N` window, truncated.
pub fn apply_linear_filter(img: &ImageBuffer, kernel_size: KernelSize) -> ImageBuffer {
    let n = kernel_size.get();
    let div = (n * n) as u32;
    debug!(
        "mean filter {}x{} on {}x{} image",
        n,
        n,
        img.rows(),
        img.cols()
    );

    let pixels = map_windows(
        img.pixels(),
        n,
        |v| v,
        |window| {
            let sum: u32 = window.iter().map(|&v| v as u32).sum();
            (sum / div) as u8
        },
    );
    ImageBuffer::from_transform(pixels, img.max_intensity())
}

/// Median over each `N x N` window: sort ascending, take index `(N*N - 1) / 2`.
pub fn apply_median_filter(img: &ImageBuffer, kernel_size: KernelSize) -> ImageBuffer {
    let n = kernel_size.get();
    let mid = (n * n - 1) / 2;
    debug!(
        "median filter {}x{} on {}x{} image",
        n,
        n,
        img.rows(),
        img.cols()
    );

    let pixels = map_windows(
        img.pixels(),
        n,
        |v| v,
        |window| {
            let mut values: Vec<u8> = window.iter().copied().collect();
            values.sort_unstable();
            values[mid]
        },
    );
    ImageBuffer::from_transform(pixels, img.max_intensity())
}
