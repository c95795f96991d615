mod histogram;
mod interpolate;
mod lut;

use ndarray::Array2;
use rayon::prelude::*;

use crate::color::{dequantize_l, quantize_l, lab_to_rgb, rgb_to_lab};
use crate::error::{ClaheError, ClaheResult};
use crate::image::RgbImage;

pub use histogram::{clip_and_redistribute, clip_count};
pub use interpolate::AxisCoord;
pub use lut::compute_lut;

/// Default clip limit, matching the reference library's own default.
pub const DEFAULT_CLIP_LIMIT: f64 = 2.0;
/// Default tile grid size.
pub const DEFAULT_TILE_GRID_SIZE: u32 = 8;

const MIN_GRID: u32 = 2;
const MAX_GRID: u32 = 16;
const MAX_CLIP_LIMIT: f64 = 40.0;

#[derive(Clone, Copy, Debug)]
struct TileBounds {
  y0: usize,
  y1: usize,
  x0: usize,
  x1: usize,
}

fn validate(width: u32, height: u32, clip_limit: f64, tile_grid_size: u32) -> ClaheResult<()> {
  if width == 0 || height == 0 {
    return Err(ClaheError::InvalidInput("image dimensions must be nonzero".into()));
  }
  if !(MIN_GRID..=MAX_GRID).contains(&tile_grid_size) {
    return Err(ClaheError::InvalidParameter(format!(
      "tile_grid_size must be in [{MIN_GRID}, {MAX_GRID}], got {tile_grid_size}"
    )));
  }
  if !clip_limit.is_finite() || clip_limit < 1.0 || clip_limit > MAX_CLIP_LIMIT {
    return Err(ClaheError::InvalidParameter(format!(
      "clip_limit must be in [1.0, {MAX_CLIP_LIMIT}], got {clip_limit}"
    )));
  }
  if height < tile_grid_size || width < tile_grid_size {
    return Err(ClaheError::InvalidParameter(format!(
      "image ({width}x{height}) is smaller than the tile grid ({tile_grid_size}x{tile_grid_size})"
    )));
  }
  Ok(())
}

/// Tile bounds for a `grid x grid` partition of a `width x height` image.
///
/// Uses floor division for the tile stride and does not special-case the
/// last row/column: when `height`/`width` doesn't divide evenly, a thin strip
/// at the bottom/right edge falls outside every tile's histogram, exactly as
/// in the reference library's own grid. Those pixels are still remapped in
/// the interpolation stage (§4.C.3), which clamps to the nearest valid tile
/// independent of the histogram bounds.
fn tile_bounds(width: u32, height: u32, grid: u32) -> Vec<TileBounds> {
  let tile_h = (height / grid) as usize;
  let tile_w = (width / grid) as usize;
  let mut bounds = Vec::with_capacity((grid * grid) as usize);
  for ty in 0..grid as usize {
    let y0 = ty * tile_h;
    let y1 = (y0 + tile_h).min(height as usize);
    for tx in 0..grid as usize {
      let x0 = tx * tile_w;
      let x1 = (x0 + tile_w).min(width as usize);
      bounds.push(TileBounds { y0, y1, x0, x1 });
    }
  }
  bounds
}

/// Builds the `grid * grid` tensor of per-tile LUTs (§4.C.1–4.C.2), one tile at a time
/// in parallel — each tile's histogram, clip, redistribution, and CDF normalization
/// are fully independent of every other tile's.
fn build_tile_luts(l_grid: &Array2<u8>, width: u32, height: u32, grid: u32, clip_limit: f64) -> Vec<[u8; 256]> {
  let bounds = tile_bounds(width, height, grid);
  bounds
    .par_iter()
    .map(|b| {
      let mut hist = histogram::build_histogram(l_grid, b.y0, b.y1, b.x0, b.x1);
      let n = ((b.y1 - b.y0) * (b.x1 - b.x0)) as u32;
      let clip = histogram::clip_count(clip_limit, n);
      histogram::clip_and_redistribute(&mut hist, clip);
      lut::compute_lut(&hist, n)
    })
    .collect()
}

/// Applies the tile LUT tensor to every pixel with bilinear interpolation (§4.C.3).
fn remap(l_grid: &Array2<u8>, luts: &[[u8; 256]], grid: u32) -> Array2<u8> {
  let height = l_grid.shape()[0];
  let width = l_grid.shape()[1];
  let row_coords = interpolate::build_axis_coords(height as u32, grid);
  let col_coords = interpolate::build_axis_coords(width as u32, grid);
  let grid = grid as usize;

  let src: Vec<u8> = l_grid.as_standard_layout().iter().copied().collect();
  let mut dst = vec![0u8; height * width];

  dst
    .par_chunks_exact_mut(width)
    .zip(src.par_chunks_exact(width))
    .zip(row_coords.par_iter())
    .for_each(|((out_row, in_row), ry)| {
      for x in 0..width {
        let rc = &col_coords[x];
        let v = in_row[x] as usize;

        let lut00 = luts[ry.lo * grid + rc.lo][v] as f32;
        let lut01 = luts[ry.lo * grid + rc.hi][v] as f32;
        let lut10 = luts[ry.hi * grid + rc.lo][v] as f32;
        let lut11 = luts[ry.hi * grid + rc.hi][v] as f32;

        let top = (1.0 - rc.frac) * lut00 + rc.frac * lut01;
        let bottom = (1.0 - rc.frac) * lut10 + rc.frac * lut11;
        let value = (1.0 - ry.frac) * top + ry.frac * bottom;

        out_row[x] = value.round().clamp(0.0, 255.0) as u8;
      }
    });

  Array2::from_shape_vec((height, width), dst).expect("dst matches (height, width) by construction")
}

/// Extracts the quantized L channel (`[0,255]`, Convention A) from a LAB image.
fn quantized_l_channel(lab: &crate::image::LabImage) -> Array2<u8> {
  let height = lab.height() as usize;
  let width = lab.width() as usize;
  Array2::from_shape_fn((height, width), |(y, x)| {
    let (l, _, _) = lab.get_lab(x as u32, y as u32);
    quantize_l(l)
  })
}

/// Runs Contrast Limited Adaptive Histogram Equalization on `image`'s lightness
/// channel and returns the recombined RGB8 result. `a`/`b` (chroma) are untouched.
///
/// # Errors
/// Returns [`ClaheError::InvalidParameter`] if `clip_limit` or `tile_grid_size` are
/// out of contract, or the image is smaller than the tile grid; returns
/// [`ClaheError::InvalidInput`] if the image has a zero dimension.
pub fn enhance(image: &RgbImage, clip_limit: f64, tile_grid_size: u32) -> ClaheResult<RgbImage> {
  let width = image.width();
  let height = image.height();
  validate(width, height, clip_limit, tile_grid_size)?;

  let mut lab = rgb_to_lab(image);
  let l_grid = quantized_l_channel(&lab);

  let luts = build_tile_luts(&l_grid, width, height, tile_grid_size, clip_limit);
  let remapped = remap(&l_grid, &luts, tile_grid_size);

  for y in 0..height {
    for x in 0..width {
      let (_, a, b) = lab.get_lab(x, y);
      let l = dequantize_l(remapped[[y as usize, x as usize]]);
      lab.set_lab(x, y, (l, a, b));
    }
  }

  Ok(lab_to_rgb(&lab))
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn rejects_grid_out_of_range() {
    let img = RgbImage::new(32, 32);
    assert!(matches!(enhance(&img, 2.0, 1), Err(ClaheError::InvalidParameter(_))));
    assert!(matches!(enhance(&img, 2.0, 17), Err(ClaheError::InvalidParameter(_))));
  }

  #[test]
  fn rejects_clip_limit_below_one() {
    let img = RgbImage::new(32, 32);
    assert!(matches!(enhance(&img, 0.5, 8), Err(ClaheError::InvalidParameter(_))));
  }

  #[test]
  fn rejects_image_smaller_than_grid() {
    let img = RgbImage::new(4, 4);
    assert!(matches!(enhance(&img, 2.0, 8), Err(ClaheError::InvalidParameter(_))));
  }

  #[test]
  fn output_has_same_dimensions_as_input() {
    let img = RgbImage::new(17, 23);
    let out = enhance(&img, 2.0, 4).unwrap();
    assert_eq!(out.width(), 17);
    assert_eq!(out.height(), 23);
  }

  #[test]
  fn is_deterministic() {
    let mut img = RgbImage::new(32, 32);
    for y in 0..32 {
      for x in 0..32 {
        img.set_pixel(x, y, (((x * 7 + y * 3) % 255) as u8, ((x * 11) % 255) as u8, ((y * 13) % 255) as u8));
      }
    }
    let a = enhance(&img, 3.0, 8).unwrap();
    let b = enhance(&img, 3.0, 8).unwrap();
    assert_eq!(a, b);
  }
}
