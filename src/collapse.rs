//! This module collapses the wavelength axis of a data cube into three colour channels.
//!
//! A cube of shape `[wavelength, x, y]` (or `[time, wavelength, x, y]`) is contracted against an
//! `N x 3` filter, producing a channel-last cube `[x, y, 3]` (or `[time, x, y, 3]`). Optionally,
//! the result is clipped to a threshold window to compress its dynamic range.

use crate::error::{CocoError, Result};
use crate::math_tools::{finite_min_max, percentile};
use ndarray::{Array2, ArrayBase, ArrayD, Data, Dimension, IxDyn};
use num_traits::ToPrimitive;
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};
use std::str::FromStr;

/// Strategy used to interpret the two threshold values.
#[derive(Serialize, Deserialize, PartialEq, Eq, Clone, Copy, Debug, Default)]
#[serde(rename_all = "lowercase")]
pub enum ThresholdMethod {
    /// Minimum and maximum value in counts, applied to the collapsed data.
    #[default]
    #[serde(alias = "raw")]
    Numeric,
    /// Fractions between 0 and 1 of the range between the cube minimum and maximum.
    Fraction,
    /// Percentiles between 0 and 100 of the cube values.
    Percentile,
}

impl Display for ThresholdMethod {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            ThresholdMethod::Numeric => write!(f, "numeric"),
            ThresholdMethod::Fraction => write!(f, "fraction"),
            ThresholdMethod::Percentile => write!(f, "percentile"),
        }
    }
}

impl FromStr for ThresholdMethod {
    type Err = CocoError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "numeric" | "raw" => Ok(ThresholdMethod::Numeric),
            "fraction" => Ok(ThresholdMethod::Fraction),
            "percentile" => Ok(ThresholdMethod::Percentile),
            other => Err(CocoError::invalid(format!(
                "threshold method '{other}' not recognised, expected 'numeric', 'fraction' or 'percentile'"
            ))),
        }
    }
}

/// A `(low, high)` threshold window and the method used to interpret it.
#[derive(PartialEq, Clone, Copy, Debug)]
pub struct Threshold {
    pub low: f64,
    pub high: f64,
    pub method: ThresholdMethod,
}

impl Threshold {
    pub fn new(low: f64, high: f64, method: ThresholdMethod) -> Self {
        Threshold { low, high, method }
    }

    /// Builds a threshold from a slice that must hold exactly two values, e.g. `[0.0, 110.0]`.
    pub fn from_pair(values: &[f64], method: ThresholdMethod) -> Result<Self> {
        match values {
            [low, high] => Ok(Threshold::new(*low, *high, method)),
            _ => Err(CocoError::invalid(format!(
                "threshold should be given as a 2 element list, e.g. [0, 110], got {} values",
                values.len()
            ))),
        }
    }

    /// Resolves the threshold into absolute clip bounds.
    ///
    /// Fraction and percentile bounds are derived from the original (not collapsed) cube.
    fn bounds(&self, cube: &ArrayD<f64>) -> Result<(f64, f64)> {
        match self.method {
            ThresholdMethod::Numeric => Ok((self.low, self.high)),
            ThresholdMethod::Fraction => {
                let (mn, mx) =
                    finite_min_max(cube.iter().copied()).ok_or(CocoError::EmptyResult)?;
                Ok((
                    mn + self.low * (mx - mn),
                    mn + self.high * (mx - mn),
                ))
            }
            ThresholdMethod::Percentile => {
                let values: Vec<f64> = cube.iter().copied().collect();
                Ok((percentile(&values, self.low)?, percentile(&values, self.high)?))
            }
        }
    }
}

/// Contracts the wavelength axis of `cube` against `weights`.
///
/// # Arguments
/// - `cube`: A 3D cube `[wavelength, x, y]` or a 4D cube `[time, wavelength, x, y]`. Any element
///   type that converts to `f64` is accepted.
/// - `weights`: The `N x 3` filter, `N` being the length of the wavelength axis.
/// - `threshold`: Optional clip window applied to the collapsed data.
///
/// # Returns
/// The collapsed cube `[x, y, 3]` or `[time, x, y, 3]` where
/// `out[.., c] = sum_w cube[w, ..] * weights[w, c]`.
///
/// Thresholding clips the collapsed values to the window. For the `Fraction` and `Percentile`
/// methods the lower bound is subtracted afterwards so that the floor becomes zero.
///
/// # Errors
/// - `CocoError::InvalidArgument` for a cube that is not 3D or 4D, elements that cannot be
///   represented as `f64`, weights that do not match the wavelength axis or an invalid threshold.
/// - `CocoError::EmptyResult` for an empty cube or a window that lies entirely outside the
///   value range of the cube. Collapsed values outside the window are clipped, not rejected.
pub fn collapse<S, T, D>(
    cube: &ArrayBase<S, D>,
    weights: &Array2<f64>,
    threshold: Option<&Threshold>,
) -> Result<ArrayD<f64>>
where
    S: Data<Elem = T>,
    T: ToPrimitive,
    D: Dimension,
{
    let wavelength_axis = match cube.ndim() {
        3 => 0,
        4 => 1,
        rank => {
            return Err(CocoError::invalid(format!(
                "array must be 3D or 4D, got {rank}D"
            )))
        }
    };
    let cube = to_float(cube)?;
    let collapsed = contract(&cube, weights, wavelength_axis)?;
    match threshold {
        Some(threshold) => apply_threshold(collapsed, &cube, threshold),
        None => Ok(collapsed),
    }
}

fn to_float<S, T, D>(cube: &ArrayBase<S, D>) -> Result<ArrayD<f64>>
where
    S: Data<Elem = T>,
    T: ToPrimitive,
    D: Dimension,
{
    let values = cube
        .iter()
        .map(|v| {
            v.to_f64()
                .ok_or_else(|| CocoError::invalid("array must be convertible to float"))
        })
        .collect::<Result<Vec<f64>>>()?;
    Ok(ArrayD::from_shape_vec(IxDyn(cube.shape()), values)?)
}

/// Moves `axis` last, flattens everything else into rows and multiplies by the weights.
fn contract(cube: &ArrayD<f64>, weights: &Array2<f64>, axis: usize) -> Result<ArrayD<f64>> {
    let n_wavelengths = cube.shape()[axis];
    if weights.dim() != (n_wavelengths, 3) {
        return Err(CocoError::invalid(format!(
            "filter of shape {:?} does not match a wavelength axis of length {}",
            weights.shape(),
            n_wavelengths
        )));
    }

    let mut order: Vec<usize> = (0..cube.ndim()).filter(|&a| a != axis).collect();
    order.push(axis);
    let moved = cube.view().permuted_axes(IxDyn(&order));

    let mut out_shape = moved.shape()[..cube.ndim() - 1].to_vec();
    let pixels: usize = out_shape.iter().product();
    let flat = Array2::from_shape_vec((pixels, n_wavelengths), moved.iter().copied().collect())?;
    let rgb = flat.dot(weights);

    out_shape.push(3);
    log::debug!(
        "collapsed cube of shape {:?} to {:?}",
        cube.shape(),
        out_shape
    );
    Ok(rgb.into_shape_with_order(IxDyn(&out_shape))?)
}

fn apply_threshold(
    mut data: ArrayD<f64>,
    cube: &ArrayD<f64>,
    threshold: &Threshold,
) -> Result<ArrayD<f64>> {
    let (lower, upper) = threshold.bounds(cube)?;
    log::debug!(
        "{} threshold ({}, {}) resolved to [{lower}, {upper}]",
        threshold.method,
        threshold.low,
        threshold.high
    );

    // the window is checked against the cube, collapsed values may lie entirely outside it
    let (min, max) = finite_min_max(cube.iter().copied()).ok_or(CocoError::EmptyResult)?;
    if upper < min || lower > max {
        log::warn!("threshold window [{lower}, {upper}] lies outside the cube range [{min}, {max}]");
        return Err(CocoError::EmptyResult);
    }

    match threshold.method {
        ThresholdMethod::Numeric => data.mapv_inplace(|v| {
            let v = if v > upper { upper } else { v };
            if v < lower {
                lower
            } else {
                v
            }
        }),
        ThresholdMethod::Fraction | ThresholdMethod::Percentile => data.mapv_inplace(|v| {
            let v = if v >= upper { upper } else { v };
            let v = if v <= lower { lower } else { v };
            v - lower
        }),
    }

    if data.is_empty() {
        return Err(CocoError::EmptyResult);
    }
    Ok(data)
}
