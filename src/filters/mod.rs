//! Colour filters that weight a wavelength axis into red, green and blue channels.
//!
//! A filter is an `N x 3` matrix: row `w` holds the weight that wavelength sample `w`
//! contributes to each of the three colour channels. The matrix is contracted against a data
//! cube by [`crate::collapse::collapse`].
//!
//! # Filter Families
//!
//! * **Single**: one wavelength sample per channel with unit weight.
//!
//! * **Band**: a contiguous range of samples per channel, averaged with uniform weights.
//!
//! * **Normal**: a Gaussian density per channel, evaluated at the wavelength values,
//!   similar to the cones of the eye.
//!
//! # Filter Construction
//!
//! [`build_filter`] takes a typed [`FilterSpec`]. [`build_filter_from_tag`] accepts the
//! filter name and loosely-typed positions as they arrive from configuration files and
//! falls back to the per-family defaults when no positions are given.

/// Contiguous wavelength bands averaged with uniform weights.
mod band;

/// Filter specification types and the construction entry points.
pub mod filter;

/// Gaussian filters evaluated on wavelength values.
mod normal;

/// Single-sample filters.
mod single;

pub use filter::{build_filter, build_filter_from_tag, FilterKind, FilterPositions, FilterSpec};
pub use normal::gaussian;
