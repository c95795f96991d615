use rayon::prelude::*;

use crate::image::RgbImage;

/// Brightness/contrast summary of an image's grayscale (BT.601 luma) projection.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Metrics {
  pub brightness: f64,
  pub contrast: f64,
}

#[inline]
fn luma(r: u8, g: u8, b: u8) -> f64 {
  0.299 * r as f64 + 0.587 * g as f64 + 0.114 * b as f64
}

/// Computes `brightness` (mean) and `contrast` (standard deviation) over the
/// BT.601 grayscale projection of `image`, in 64-bit float.
pub fn metrics(image: &RgbImage) -> Metrics {
  let n = (image.width() as usize * image.height() as usize) as f64;

  let raw = image.to_raw();

  let sum: f64 = raw
    .par_chunks_exact(3)
    .map(|px| luma(px[0], px[1], px[2]))
    .sum();
  let mean = sum / n;

  let sq_diff_sum: f64 = raw
    .par_chunks_exact(3)
    .map(|px| {
      let g = luma(px[0], px[1], px[2]);
      (g - mean) * (g - mean)
    })
    .sum();

  Metrics {
    brightness: mean,
    contrast: (sq_diff_sum / n).sqrt(),
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn uniform_image_has_zero_contrast() {
    let mut img = RgbImage::new(4, 4);
    for y in 0..4 {
      for x in 0..4 {
        img.set_pixel(x, y, (128, 128, 128));
      }
    }
    let m = metrics(&img);
    assert!((m.brightness - 128.0).abs() < 1e-9);
    assert!(m.contrast.abs() < 1e-9);
  }

  #[test]
  fn black_and_white_has_expected_brightness() {
    let mut img = RgbImage::new(2, 1);
    img.set_pixel(0, 0, (0, 0, 0));
    img.set_pixel(1, 0, (255, 255, 255));
    let m = metrics(&img);
    assert!((m.brightness - 127.5).abs() < 1e-9);
    assert!(m.contrast > 0.0);
  }
}
