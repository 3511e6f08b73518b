//! This module provides the `FilterSpec` enum describing one of the three filter families together
//! with its parameters, and the functions that turn a specification into a weight matrix.
//! Loosely-typed positions (as read from a configuration file) are validated here before they
//! become a `FilterSpec`.

use crate::error::{CocoError, Result};
use crate::filters::{band, normal, single};
use ndarray::{Array2, ArrayView1};
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};
use std::str::FromStr;

/// The filter family without its parameters.
#[derive(Serialize, Deserialize, PartialEq, Eq, Clone, Copy, Debug, Default)]
#[serde(rename_all = "lowercase")]
pub enum FilterKind {
    /// One wavelength sample per channel.
    Single,
    /// A contiguous range of wavelength samples per channel.
    #[default]
    Band,
    /// A Gaussian curve per channel.
    Normal,
}

impl Display for FilterKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            FilterKind::Single => write!(f, "single"),
            FilterKind::Band => write!(f, "band"),
            FilterKind::Normal => write!(f, "normal"),
        }
    }
}

impl FromStr for FilterKind {
    type Err = CocoError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "single" => Ok(FilterKind::Single),
            "band" => Ok(FilterKind::Band),
            "normal" => Ok(FilterKind::Normal),
            other => Err(CocoError::invalid(format!(
                "filter name '{other}' not recognised, expected 'single', 'band' or 'normal'"
            ))),
        }
    }
}

impl FilterKind {
    /// Returns the default specification of this family for the given wavelength axis.
    ///
    /// - `Single`: highest index for red, middle index (`N / 2`) for green, index 0 for blue.
    /// - `Band`: the axis split into contiguous thirds at `N / 3` and `2N / 3`, the upper
    ///   third for red, the middle third for green and the lower third for blue.
    /// - `Normal`: red centred on the last wavelength, green on the midpoint of the range and
    ///   blue on the first wavelength. The standard deviation is `span / (2 * 1.96)`, halved
    ///   for green; a zero span falls back to a standard deviation of 1.
    pub fn default_spec(&self, wavelengths: ArrayView1<f64>) -> Result<FilterSpec> {
        let n = wavelengths.len();
        if n == 0 {
            return Err(CocoError::invalid("the wavelength axis is empty"));
        }
        Ok(match self {
            FilterKind::Single => single::default_spec(n),
            FilterKind::Band => band::default_spec(n),
            FilterKind::Normal => normal::default_spec(wavelengths),
        })
    }
}

/// A filter family together with its parameters, one entry per colour channel in `r, g, b` order.
#[derive(PartialEq, Clone, Debug)]
pub enum FilterSpec {
    /// Indices of the wavelength samples used for red, green and blue.
    Single { r: usize, g: usize, b: usize },
    /// `(start, end)` index ranges, `end` exclusive. `start == end` selects the single bin `start`.
    Band { bands: [(usize, usize); 3] },
    /// `(mean, std)` of each Gaussian, in wavelength units.
    Normal { curves: [(f64, f64); 3] },
}

impl FilterSpec {
    pub fn kind(&self) -> FilterKind {
        match self {
            FilterSpec::Single { .. } => FilterKind::Single,
            FilterSpec::Band { .. } => FilterKind::Band,
            FilterSpec::Normal { .. } => FilterKind::Normal,
        }
    }

    /// Validates loosely-typed positions against the shape the given family expects.
    ///
    /// Single filters take a flat list of three indices, band and normal filters take three
    /// two-element lists. Indices must be non-negative integers.
    pub fn from_positions(kind: FilterKind, positions: &FilterPositions) -> Result<Self> {
        match kind {
            FilterKind::Single => {
                let indices = match positions {
                    FilterPositions::Indices(indices) => indices,
                    FilterPositions::Pairs(_) => {
                        return Err(CocoError::invalid(
                            "single filters take three indices, e.g. [9, 5, 0]",
                        ))
                    }
                };
                if indices.len() != 3 {
                    return Err(CocoError::invalid(format!(
                        "positions should have 3 values, got {}",
                        indices.len()
                    )));
                }
                Ok(FilterSpec::Single {
                    r: to_index(indices[0])?,
                    g: to_index(indices[1])?,
                    b: to_index(indices[2])?,
                })
            }
            FilterKind::Band => {
                let pairs = three_pairs(positions)?;
                let mut bands = [(0, 0); 3];
                for (slot, pair) in bands.iter_mut().zip(pairs.iter()) {
                    *slot = (to_index(pair.0)?, to_index(pair.1)?);
                }
                Ok(FilterSpec::Band { bands })
            }
            FilterKind::Normal => Ok(FilterSpec::Normal {
                curves: three_pairs(positions)?,
            }),
        }
    }
}

/// Filter positions as supplied by a caller or a configuration file.
///
/// The meaning depends on the filter family; see [`FilterSpec::from_positions`].
#[derive(Serialize, Deserialize, PartialEq, Clone, Debug)]
#[serde(untagged)]
pub enum FilterPositions {
    /// A flat list, e.g. `[9, 5, 0]`.
    Indices(Vec<f64>),
    /// A list of lists, e.g. `[[2, 4], [4, 8], [9, 9]]`.
    Pairs(Vec<Vec<f64>>),
}

fn three_pairs(positions: &FilterPositions) -> Result<[(f64, f64); 3]> {
    let pairs = match positions {
        FilterPositions::Pairs(pairs) => pairs,
        FilterPositions::Indices(_) => {
            return Err(CocoError::invalid(
                "positions should be in the shape of [[a, b], [c, d], [e, f]]",
            ))
        }
    };
    if pairs.len() != 3 {
        return Err(CocoError::invalid(format!(
            "positions should have 3 values, got {}",
            pairs.len()
        )));
    }
    let mut out = [(0.0, 0.0); 3];
    for (o, pair) in out.iter_mut().zip(pairs.iter()) {
        match pair.as_slice() {
            [a, b] => *o = (*a, *b),
            _ => {
                return Err(CocoError::invalid(format!(
                    "positions should have 2 values for each colour, got {}",
                    pair.len()
                )))
            }
        }
    }
    Ok(out)
}

fn to_index(value: f64) -> Result<usize> {
    if value.is_finite() && value >= 0.0 && value.fract() == 0.0 {
        Ok(value as usize)
    } else {
        Err(CocoError::invalid(format!(
            "{value} is not a valid wavelength index"
        )))
    }
}

/// Builds the `N x 3` weight matrix described by `spec` for the given wavelength axis.
///
/// # Errors
/// `CocoError::InvalidArgument` if the axis is empty or the parameters do not fit the axis
/// (indices out of range, inverted bands, non-positive standard deviations).
pub fn build_filter(wavelengths: ArrayView1<f64>, spec: &FilterSpec) -> Result<Array2<f64>> {
    let n = wavelengths.len();
    if n == 0 {
        return Err(CocoError::invalid("the wavelength axis is empty"));
    }
    let weights = match spec {
        FilterSpec::Single { r, g, b } => single::single_filter(n, [*r, *g, *b])?,
        FilterSpec::Band { bands } => band::band_filter(n, bands)?,
        FilterSpec::Normal { curves } => normal::normal_filter(wavelengths, curves)?,
    };
    log::debug!("built {} filter with {} wavelength samples", spec.kind(), n);
    Ok(weights)
}

/// Builds a filter from its family name and optional loosely-typed positions.
///
/// Without positions the default specification of the family is used
/// (see [`FilterKind::default_spec`]).
///
/// # Example
/// ```
/// use cocoplot::filters::{build_filter_from_tag, FilterPositions};
/// use ndarray::Array1;
///
/// let wavelengths = Array1::range(0.0, 10.0, 1.0);
/// let positions = FilterPositions::Pairs(vec![vec![2.0, 4.0], vec![4.0, 8.0], vec![9.0, 9.0]]);
/// let weights = build_filter_from_tag(wavelengths.view(), "band", Some(&positions)).unwrap();
/// assert_eq!(weights[[2, 0]], 0.5);
/// assert_eq!(weights[[5, 1]], 0.25);
/// assert_eq!(weights[[9, 2]], 1.0);
/// ```
pub fn build_filter_from_tag(
    wavelengths: ArrayView1<f64>,
    kind: &str,
    positions: Option<&FilterPositions>,
) -> Result<Array2<f64>> {
    let kind = FilterKind::from_str(kind)?;
    let spec = match positions {
        Some(positions) => FilterSpec::from_positions(kind, positions)?,
        None => kind.default_spec(wavelengths)?,
    };
    build_filter(wavelengths, &spec)
}
