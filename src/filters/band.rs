//! Band filters that average the cube uniformly over one wavelength range per channel.

use crate::error::{CocoError, Result};
use crate::filters::filter::FilterSpec;
use ndarray::{s, Array2};

/// Splits `n` samples into contiguous thirds, upper third red, lower third blue.
pub(super) fn default_spec(n: usize) -> FilterSpec {
    let first = n / 3;
    let second = 2 * n / 3;
    FilterSpec::Band {
        bands: [(second, n), (first, second), (0, first)],
    }
}

/// Uniform averaging kernel over `[start, end)` per channel.
///
/// A band with `start == end` is treated as the single bin `start` with width
/// `end - start + 1`. Overlapping bands and gaps between bands are allowed.
pub(super) fn band_filter(n: usize, bands: &[(usize, usize); 3]) -> Result<Array2<f64>> {
    let mut weights = Array2::zeros((n, 3));
    for (channel, &(start, end)) in bands.iter().enumerate() {
        if end < start {
            return Err(CocoError::invalid(format!(
                "invalid range [{start}, {end}) for channel {channel}"
            )));
        }
        if start == end {
            if start >= n {
                return Err(CocoError::invalid(format!(
                    "bin {start} is outside the wavelength axis of length {n}"
                )));
            }
            weights[[start, channel]] = 1.0 / (end - start + 1) as f64;
        } else {
            if end > n {
                return Err(CocoError::invalid(format!(
                    "band [{start}, {end}) exceeds the wavelength axis of length {n}"
                )));
            }
            let width = (end - start) as f64;
            weights.slice_mut(s![start..end, channel]).fill(1.0 / width);
        }
    }
    Ok(weights)
}
