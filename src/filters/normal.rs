//! Gaussian filters centred on a wavelength per channel.
//!
//! The curves are probability densities and are not normalised to sum to one.

use crate::error::{CocoError, Result};
use crate::filters::filter::FilterSpec;
use ndarray::{Array1, Array2, ArrayView1, Axis};

/// Two-sided 95% quantile of the standard normal distribution.
const Z_95: f64 = 1.96;

/// Gaussian probability density
///
/// Computes `1 / (std * sqrt(2 pi)) * exp(-0.5 * ((x - mean) / std)^2)` for every input value.
/// The curve is not rescaled, its peak value is `1 / (std * sqrt(2 pi))`.
///
/// # Arguments
/// - `x` (*ArrayView1<f64>*): The positions to evaluate.
/// - `mean` (*f64*): The centre of the Gaussian.
/// - `std` (*f64*): The standard deviation of the Gaussian.
///
/// # Returns
/// - (*Array1<f64>*): The density at every position.
pub fn gaussian(x: ArrayView1<f64>, mean: f64, std: f64) -> Array1<f64> {
    let c = 1.0 / (std * (2.0 * std::f64::consts::PI).sqrt());
    x.mapv(|xi| c * (-0.5 * ((xi - mean) / std).powi(2)).exp())
}

pub(super) fn default_spec(wavelengths: ArrayView1<f64>) -> FilterSpec {
    let first = wavelengths[0];
    let last = wavelengths[wavelengths.len() - 1];
    let span = (last - first).abs();
    let std = if span > 0.0 { span / (2.0 * Z_95) } else { 1.0 };
    FilterSpec::Normal {
        curves: [(last, std), ((first + last) / 2.0, std / 2.0), (first, std)],
    }
}

/// One Gaussian density per channel, evaluated at the wavelength values.
pub(super) fn normal_filter(
    wavelengths: ArrayView1<f64>,
    curves: &[(f64, f64); 3],
) -> Result<Array2<f64>> {
    let mut weights = Array2::zeros((wavelengths.len(), 3));
    for (channel, &(mean, std)) in curves.iter().enumerate() {
        if !mean.is_finite() {
            return Err(CocoError::invalid(format!(
                "mean {mean} of channel {channel} is not finite"
            )));
        }
        if !(std.is_finite() && std > 0.0) {
            return Err(CocoError::invalid(format!(
                "standard deviation {std} of channel {channel} must be positive"
            )));
        }
        let curve = gaussian(wavelengths, mean, std);
        if curve.iter().all(|&v| v == 0.0) {
            log::warn!(
                "gaussian of channel {channel} (mean {mean}, std {std}) vanishes on the whole wavelength axis"
            );
        }
        weights.index_axis_mut(Axis(1), channel).assign(&curve);
    }
    Ok(weights)
}
