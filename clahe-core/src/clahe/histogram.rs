use ndarray::Array2;

/// Builds the 256-bin histogram of `l_grid[y0..y1, x0..x1]`.
pub fn build_histogram(l_grid: &Array2<u8>, y0: usize, y1: usize, x0: usize, x1: usize) -> [u32; 256] {
  let mut hist = [0u32; 256];
  for y in y0..y1 {
    for x in x0..x1 {
      hist[l_grid[[y, x]] as usize] += 1;
    }
  }
  hist
}

/// Per-tile clip count: `max(1, floor(clip_limit * tile_pixel_count / 256))`.
///
/// The `max(1, ..)` floor matters for degenerate (near-empty) tiles: without it
/// a tile with fewer than `256 / clip_limit` pixels would clip everything to zero.
pub fn clip_count(clip_limit: f64, tile_pixel_count: u32) -> u32 {
  let k = (clip_limit * tile_pixel_count as f64 / 256.0).floor();
  (k as u32).max(1)
}

/// Clips `hist` at `clip` per bin and redistributes the excess uniformly across
/// all 256 bins: `excess / 256` to every bin, plus one more to the first
/// `excess % 256` bins (by ascending bin index). Total mass is preserved exactly.
pub fn clip_and_redistribute(hist: &mut [u32; 256], clip: u32) {
  let mut excess: u32 = 0;
  for bin in hist.iter_mut() {
    if *bin > clip {
      excess += *bin - clip;
      *bin = clip;
    }
  }
  let share = excess / 256;
  let remainder = (excess % 256) as usize;
  for bin in hist.iter_mut() {
    *bin += share;
  }
  for bin in hist.iter_mut().take(remainder) {
    *bin += 1;
  }
}
