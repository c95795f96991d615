//! sRGB <-> CIE L*a*b* (D65 white point) conversion.
//!
//! The constants here match the widely-used reference matrices (the same
//! ones a reference computer-vision library uses for `COLOR_RGB2Lab`), not
//! the slightly different rounding some textbooks use, so that downstream
//! CLAHE results line up with that reference implementation.

use rayon::prelude::*;

use crate::image::{LabImage, RgbImage};

const XN: f32 = 0.950456;
const YN: f32 = 1.0;
const ZN: f32 = 1.088754;

const RGB_TO_XYZ: [[f32; 3]; 3] = [
  [0.412453, 0.357580, 0.180423],
  [0.212671, 0.715160, 0.072169],
  [0.019334, 0.119193, 0.950227],
];

const XYZ_TO_RGB: [[f32; 3]; 3] = [
  [3.240479, -1.537150, -0.498535],
  [-0.969256, 1.875992, 0.041556],
  [0.055648, -0.204043, 1.057311],
];

#[inline]
fn srgb_to_linear(v: f32) -> f32 {
  if v > 0.04045 {
    ((v + 0.055) / 1.055).powf(2.4)
  } else {
    v / 12.92
  }
}

#[inline]
fn linear_to_srgb(v: f32) -> f32 {
  if v > 0.0031308 {
    1.055 * v.powf(1.0 / 2.4) - 0.055
  } else {
    12.92 * v
  }
}

#[inline]
fn f_forward(t: f32) -> f32 {
  if t > 0.008856 {
    t.cbrt()
  } else {
    7.787 * t + 16.0 / 116.0
  }
}

#[inline]
fn f_inverse(t: f32) -> f32 {
  let cubed = t * t * t;
  if cubed > 0.206893 {
    cubed
  } else {
    (t - 16.0 / 116.0) / 7.787
  }
}

/// Converts one sRGB8 pixel to `(L, a, b)`. `L` in `[0, 100]` nominal, `a`/`b` unclamped.
pub fn rgb_to_lab_pixel(r: u8, g: u8, b: u8) -> (f32, f32, f32) {
  let rl = srgb_to_linear(r as f32 / 255.0);
  let gl = srgb_to_linear(g as f32 / 255.0);
  let bl = srgb_to_linear(b as f32 / 255.0);

  let m = &RGB_TO_XYZ;
  let x = m[0][0] * rl + m[0][1] * gl + m[0][2] * bl;
  let y = m[1][0] * rl + m[1][1] * gl + m[1][2] * bl;
  let z = m[2][0] * rl + m[2][1] * gl + m[2][2] * bl;

  let fx = f_forward(x / XN);
  let fy = f_forward(y / YN);
  let fz = f_forward(z / ZN);

  let l = 116.0 * fy - 16.0;
  let a = 500.0 * (fx - fy);
  let b = 200.0 * (fy - fz);
  (l, a, b)
}

/// Converts one `(L, a, b)` pixel back to sRGB8, clamped.
pub fn lab_to_rgb_pixel(l: f32, a: f32, b: f32) -> (u8, u8, u8) {
  let fy = (l + 16.0) / 116.0;
  let fx = fy + a / 500.0;
  let fz = fy - b / 200.0;

  let x = f_inverse(fx) * XN;
  let y = f_inverse(fy) * YN;
  let z = f_inverse(fz) * ZN;

  let m = &XYZ_TO_RGB;
  let rl = m[0][0] * x + m[0][1] * y + m[0][2] * z;
  let gl = m[1][0] * x + m[1][1] * y + m[1][2] * z;
  let bl = m[2][0] * x + m[2][1] * y + m[2][2] * z;

  let r = (linear_to_srgb(rl) * 255.0).round().clamp(0.0, 255.0) as u8;
  let g = (linear_to_srgb(gl) * 255.0).round().clamp(0.0, 255.0) as u8;
  let b = (linear_to_srgb(bl) * 255.0).round().clamp(0.0, 255.0) as u8;
  (r, g, b)
}

/// Converts a full RGB8 image to a LAB float image, in parallel over pixel rows.
pub fn rgb_to_lab(image: &RgbImage) -> LabImage {
  let width = image.width();
  let height = image.height();
  let mut out = LabImage::new(width, height);

  let src = image.to_raw();
  let dst = out
    .data_mut()
    .as_slice_mut()
    .expect("LabImage buffer is freshly allocated and contiguous");

  let row_stride = width as usize * 3;
  dst
    .par_chunks_exact_mut(row_stride)
    .zip(src.par_chunks_exact(row_stride))
    .for_each(|(out_row, in_row)| {
      for x in 0..width as usize {
        let (l, a, b) = rgb_to_lab_pixel(in_row[x * 3], in_row[x * 3 + 1], in_row[x * 3 + 2]);
        out_row[x * 3] = l;
        out_row[x * 3 + 1] = a;
        out_row[x * 3 + 2] = b;
      }
    });

  out
}

/// Converts a full LAB float image back to RGB8, in parallel over pixel rows.
pub fn lab_to_rgb(image: &LabImage) -> RgbImage {
  let width = image.width();
  let height = image.height();
  let mut out = RgbImage::new(width, height);

  let row_stride = width as usize * 3;
  let src = image
    .data()
    .as_slice()
    .expect("LabImage buffer is always contiguous")
    .to_vec();
  let dst = out
    .data_mut()
    .as_slice_mut()
    .expect("RgbImage buffer is freshly allocated and contiguous");

  dst
    .par_chunks_exact_mut(row_stride)
    .zip(src.par_chunks_exact(row_stride))
    .for_each(|(out_row, in_row)| {
      for x in 0..width as usize {
        let (r, g, b) = lab_to_rgb_pixel(in_row[x * 3], in_row[x * 3 + 1], in_row[x * 3 + 2]);
        out_row[x * 3] = r;
        out_row[x * 3 + 1] = g;
        out_row[x * 3 + 2] = b;
      }
    });

  out
}

/// Scales `L` from `[0, 100]` into `[0, 255]`, rounding and clamping (Convention A, §4.B).
#[inline]
pub fn quantize_l(l: f32) -> u8 {
  (l * 255.0 / 100.0).round().clamp(0.0, 255.0) as u8
}

/// Inverse of [`quantize_l`]: scales an 8-bit value back into `[0, 100]`.
#[inline]
pub fn dequantize_l(l: u8) -> f32 {
  l as f32 * 100.0 / 255.0
}
