use ndarray::Array3;

use crate::error::{ClaheError, ClaheResult};

/// An 8-bit-per-channel RGB image, stored row-major as `(height, width, 3)`.
#[derive(Clone, Debug, PartialEq)]
pub struct RgbImage {
  data: Array3<u8>,
}

impl RgbImage {
  /// Creates a black `width x height` image.
  pub fn new(width: u32, height: u32) -> Self {
    Self {
      data: Array3::zeros((height as usize, width as usize, 3)),
    }
  }

  /// Builds an image from a flat row-major RGB8 buffer (`len == width*height*3`).
  pub fn from_raw(width: u32, height: u32, data: Vec<u8>) -> ClaheResult<Self> {
    if width == 0 || height == 0 {
      return Err(ClaheError::InvalidInput("image dimensions must be nonzero".into()));
    }
    let expected = width as usize * height as usize * 3;
    if data.len() != expected {
      return Err(ClaheError::InvalidInput(format!(
        "raw buffer length {} does not match {}x{}x3 = {}",
        data.len(),
        width,
        height,
        expected
      )));
    }
    let array = Array3::from_shape_vec((height as usize, width as usize, 3), data)
      .map_err(|e| ClaheError::InternalError(e.to_string()))?;
    Ok(Self { data: array })
  }

  pub fn width(&self) -> u32 {
    self.data.shape()[1] as u32
  }

  pub fn height(&self) -> u32 {
    self.data.shape()[0] as u32
  }

  /// The underlying `(height, width, 3)` pixel buffer.
  pub fn data(&self) -> &Array3<u8> {
    &self.data
  }

  pub fn data_mut(&mut self) -> &mut Array3<u8> {
    &mut self.data
  }

  #[inline]
  pub fn get_pixel(&self, x: u32, y: u32) -> (u8, u8, u8) {
    let row = &self.data;
    (
      row[[y as usize, x as usize, 0]],
      row[[y as usize, x as usize, 1]],
      row[[y as usize, x as usize, 2]],
    )
  }

  #[inline]
  pub fn set_pixel(&mut self, x: u32, y: u32, rgb: (u8, u8, u8)) {
    self.data[[y as usize, x as usize, 0]] = rgb.0;
    self.data[[y as usize, x as usize, 1]] = rgb.1;
    self.data[[y as usize, x as usize, 2]] = rgb.2;
  }

  /// Flattens the image into a row-major RGB8 buffer, for interop with image codecs.
  pub fn to_raw(&self) -> Vec<u8> {
    // `Array3::zeros`/`from_shape_vec` both produce standard (C-order) layout,
    // and nothing in this crate ever transposes the buffer, so this is always contiguous.
    self.data.as_standard_layout().iter().copied().collect()
  }
}

/// A floating-point LAB image, stored row-major as `(height, width, 3)`: `[L, a, b]` per pixel.
#[derive(Clone, Debug, PartialEq)]
pub struct LabImage {
  data: Array3<f32>,
}

impl LabImage {
  pub fn new(width: u32, height: u32) -> Self {
    Self {
      data: Array3::zeros((height as usize, width as usize, 3)),
    }
  }

  pub fn width(&self) -> u32 {
    self.data.shape()[1] as u32
  }

  pub fn height(&self) -> u32 {
    self.data.shape()[0] as u32
  }

  pub fn data(&self) -> &Array3<f32> {
    &self.data
  }

  pub fn data_mut(&mut self) -> &mut Array3<f32> {
    &mut self.data
  }

  #[inline]
  pub fn get_lab(&self, x: u32, y: u32) -> (f32, f32, f32) {
    (
      self.data[[y as usize, x as usize, 0]],
      self.data[[y as usize, x as usize, 1]],
      self.data[[y as usize, x as usize, 2]],
    )
  }

  #[inline]
  pub fn set_lab(&mut self, x: u32, y: u32, lab: (f32, f32, f32)) {
    self.data[[y as usize, x as usize, 0]] = lab.0;
    self.data[[y as usize, x as usize, 1]] = lab.1;
    self.data[[y as usize, x as usize, 2]] = lab.2;
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn from_raw_rejects_wrong_length() {
    let err = RgbImage::from_raw(2, 2, vec![0u8; 10]).unwrap_err();
    assert!(matches!(err, ClaheError::InvalidInput(_)));
  }

  #[test]
  fn from_raw_rejects_zero_dimensions() {
    let err = RgbImage::from_raw(0, 2, vec![]).unwrap_err();
    assert!(matches!(err, ClaheError::InvalidInput(_)));
  }

  #[test]
  fn round_trips_through_raw() {
    let data: Vec<u8> = (0..(3 * 2 * 3)).map(|i| (i % 256) as u8).collect();
    let img = RgbImage::from_raw(3, 2, data.clone()).unwrap();
    assert_eq!(img.to_raw(), data);
    assert_eq!(img.get_pixel(2, 1), (data[15], data[16], data[17]));
  }
}
