//! Colour collapsing of wavelength-resolved imaging cubes.
//!
//! Spectral observations (e.g. solar spectropolarimetric scans) are stored as cubes of shape
//! `[wavelength, x, y]` or `[time, wavelength, x, y]`. This crate builds red, green and blue
//! filters over the wavelength axis and collapses the cube into a colour image (or a sequence of
//! frames), so that spectral information becomes visible as colour.
//!
//! ```
//! use cocoplot::collapse::{collapse, Threshold, ThresholdMethod};
//! use cocoplot::filters::{build_filter, FilterSpec};
//! use cocoplot::render::to_display;
//! use ndarray::{Array1, Array3};
//!
//! let wavelengths = Array1::linspace(6562.0, 6564.0, 9);
//! let cube = Array3::from_shape_fn((9, 16, 16), |(l, x, y)| (l + x * y) as f64);
//! let weights = build_filter(
//!     wavelengths.view(),
//!     &FilterSpec::Band { bands: [(6, 9), (3, 6), (0, 3)] },
//! )
//! .unwrap();
//! let threshold = Threshold::new(1.0, 99.0, ThresholdMethod::Percentile);
//! let rgb = collapse(&cube, &weights, Some(&threshold)).unwrap();
//! let image = to_display(&rgb).unwrap();
//! assert_eq!(image.shape(), &[16, 16, 3]);
//! ```

/// Contraction of the wavelength axis and thresholding.
pub mod collapse;

/// Serde-backed description of a rendering run.
pub mod config;

pub mod error;

/// Filter construction for the `single`, `band` and `normal` families.
pub mod filters;

/// Reading and writing `.npy` cubes.
pub mod io;

pub mod math_tools;

/// Display scaling and image/animation output.
pub mod render;

pub use collapse::{collapse, Threshold, ThresholdMethod};
pub use error::{CocoError, Result};
pub use filters::{build_filter, build_filter_from_tag, FilterKind, FilterPositions, FilterSpec};
