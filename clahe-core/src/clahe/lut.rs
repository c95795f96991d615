/// Derives a tile's 256-entry lookup table from its clipped-and-redistributed histogram.
///
/// `tile_pixel_count` is the mass the histogram sums to (after redistribution,
/// which preserves total mass, so it equals the un-redistributed tile pixel
/// count too). Degenerate tiles (empty, or a single constant value, where the
/// CDF never rises off its minimum) map to the identity LUT.
pub fn compute_lut(hist: &[u32; 256], tile_pixel_count: u32) -> [u8; 256] {
  let mut cdf = [0u32; 256];
  let mut running = 0u32;
  for (i, &count) in hist.iter().enumerate() {
    running += count;
    cdf[i] = running;
  }

  let cdf_min = cdf.iter().copied().find(|&c| c > 0).unwrap_or(0);
  let cdf_max = tile_pixel_count;

  let mut lut = [0u8; 256];
  if cdf_max <= cdf_min {
    for (i, slot) in lut.iter_mut().enumerate() {
      *slot = i as u8;
    }
    return lut;
  }

  let denom = (cdf_max - cdf_min) as f64;
  for (i, &c) in cdf.iter().enumerate() {
    let numer = c.saturating_sub(cdf_min) as f64;
    lut[i] = ((numer / denom) * 255.0).round().clamp(0.0, 255.0) as u8;
  }
  lut
}
