/// Turn an `ImageBuffer` into something viewable.
///
/// Intensities are rescaled from `[0, max_intensity]` to `[0, 255]` so images
/// with a small max intensity do not render nearly black.
use std::path::Path;

use image::{GrayImage, ImageError as CodecError};
use log::debug;

use crate::buffer::{ImageBuffer, MAX_INTENSITY_8BIT};

/// Map a stored intensity onto the full 8-bit display range.
#[inline]
fn display_value(v: u8, max: u16) -> u8 {
    if max == MAX_INTENSITY_8BIT {
        v
    } else {
        ((u32::from(v) * 255 + u32::from(max) / 2) / u32::from(max)).min(255) as u8
    }
}

fn display_bytes(img: &ImageBuffer) -> Vec<u8> {
    let max = img.max_intensity();
    img.pixels().iter().map(|&v| display_value(v, max)).collect()
}

pub fn to_gray_image(img: &ImageBuffer) -> GrayImage {
    let (w, h) = (img.cols() as u32, img.rows() as u32);
    let mut out = GrayImage::new(w, h);
    for (dst, src) in out.iter_mut().zip(display_bytes(img)) {
        *dst = src;
    }
    out
}

/// Write a grayscale PNG preview.
pub fn save_png(img: &ImageBuffer, path: &Path) -> Result<(), CodecError> {
    to_gray_image(img).save(path)?;
    debug!("rendered {}x{} preview to {}", img.cols(), img.rows(), path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn test_display_value_rescales() {
        assert_eq!(display_value(15, 15), 255);
        assert_eq!(display_value(0, 15), 0);
        assert_eq!(display_value(7, 15), 119);
        assert_eq!(display_value(200, 255), 200);
    }

    #[test]
    fn test_gray_image_layout() {
        let img = ImageBuffer::new(array![[1, 2, 3], [4, 5, 6]], 255).unwrap();
        let gray = to_gray_image(&img);
        assert_eq!(gray.dimensions(), (3, 2));
        assert_eq!(gray.get_pixel(2, 0)[0], 3);
        assert_eq!(gray.get_pixel(0, 1)[0], 4);
    }

    #[test]
    fn test_save_png_readable() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("preview.png");
        let img = ImageBuffer::new(array![[0, 128], [200, 255]], 255).unwrap();
        save_png(&img, &path).unwrap();

        let back = image::open(&path).unwrap().into_luma8();
        assert_eq!(back.into_raw(), vec![0, 128, 200, 255]);
    }
}
