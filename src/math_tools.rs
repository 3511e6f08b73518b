//! This module provides the array helpers used around the colour collapse: numpy-compatible
//! percentiles, NaN-aware extrema, axis reordering that moves the wavelength axis last and the
//! offset correction used to prepare data before filtering.

use crate::error::{CocoError, Result};
use ndarray::{Array, Array3, Array4, ArrayBase, Data, Dimension, Ix3, Ix4};

/// Returns the smallest and largest non-NaN values of an iterator.
///
/// # Returns
/// `None` if the iterator yields no non-NaN value.
pub fn finite_min_max<I>(values: I) -> Option<(f64, f64)>
where
    I: IntoIterator<Item = f64>,
{
    values
        .into_iter()
        .filter(|v| !v.is_nan())
        .fold(None, |acc, v| match acc {
            None => Some((v, v)),
            Some((mn, mx)) => Some((mn.min(v), mx.max(v))),
        })
}

/// Computes the `q`-th percentile of the given values.
///
/// The implementation follows the default (linear) method of Python's numpy library:
/// the values are sorted and the percentile is linearly interpolated between the two closest ranks.
/// NaN values are ignored.
///
/// # Arguments
/// - `values`: The sample values.
/// - `q`: The percentile, between 0 and 100 inclusive.
///
/// # Returns
/// The interpolated percentile, `CocoError::InvalidArgument` if `q` lies outside `[0, 100]`
/// and `CocoError::EmptyResult` if there are no values to rank.
pub fn percentile(values: &[f64], q: f64) -> Result<f64> {
    if !(0.0..=100.0).contains(&q) {
        return Err(CocoError::invalid(format!(
            "percentiles must be in the range [0, 100], got {q}"
        )));
    }
    let mut sorted: Vec<f64> = values.iter().copied().filter(|v| !v.is_nan()).collect();
    if sorted.is_empty() {
        return Err(CocoError::EmptyResult);
    }
    sorted.sort_by(|a, b| a.total_cmp(b));

    let rank = q / 100.0 * (sorted.len() - 1) as f64;
    let lower = rank.floor() as usize;
    let upper = rank.ceil() as usize;
    let fraction = rank - lower as f64;
    Ok(sorted[lower] + fraction * (sorted[upper] - sorted[lower]))
}

/// Reorders a `[wavelength, x, y]` cube to `[x, y, wavelength]`.
pub fn wavelength_last_3d<S>(cube: &ArrayBase<S, Ix3>) -> Array3<f64>
where
    S: Data<Elem = f64>,
{
    cube.view().permuted_axes([1, 2, 0]).to_owned()
}

/// Reorders a `[time, wavelength, x, y]` cube to `[time, x, y, wavelength]`.
pub fn wavelength_last_4d<S>(cube: &ArrayBase<S, Ix4>) -> Array4<f64>
where
    S: Data<Elem = f64>,
{
    cube.view().permuted_axes([0, 2, 3, 1]).to_owned()
}

/// Replaces NaN values with zero and shifts the data so that its minimum becomes zero.
///
/// Cubes with negative or missing values (e.g. after dark subtraction) would otherwise
/// produce negative colour channels.
pub fn clean_offset<S, D>(data: &ArrayBase<S, D>) -> Array<f64, D>
where
    S: Data<Elem = f64>,
    D: Dimension,
{
    let mut cleaned = data.mapv(|v| if v.is_nan() { 0.0 } else { v });
    if let Some((min, _)) = finite_min_max(cleaned.iter().copied()) {
        cleaned.mapv_inplace(|v| v - min);
    }
    cleaned
}
