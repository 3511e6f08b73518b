//! Description of one rendering run, usually read from a JSON file.
//!
//! ```json
//! {
//!     "filter": "band",
//!     "positions": [[2, 4], [4, 8], [9, 9]],
//!     "threshold": [1, 99],
//!     "threshold_method": "percentile",
//!     "fps": 3,
//!     "output": "coco.png"
//! }
//! ```

use crate::collapse::{collapse, Threshold, ThresholdMethod};
use crate::error::{CocoError, Result};
use crate::filters::{build_filter, FilterKind, FilterPositions, FilterSpec};
use crate::io::save_cube;
use crate::render::{save_gif, save_png, to_display};
use ndarray::{ArrayBase, ArrayD, ArrayView1, Data, Dimension, Ix3, Ix4};
use num_traits::ToPrimitive;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::str::FromStr;

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(default)]
pub struct CocoConfig {
    /// `single`, `band` or `normal`.
    pub filter: String,
    /// Filter positions, the family default is used if absent.
    pub positions: Option<FilterPositions>,
    /// `[low, high]` clip window.
    pub threshold: Option<Vec<f64>>,
    /// `numeric` (or `raw`), `fraction` or `percentile`.
    pub threshold_method: String,
    /// Frames per second of animations.
    pub fps: f64,
    /// `.png` for 3D cubes, `.gif` for 4D cubes, `.npy` for the collapsed float data.
    pub output: Option<PathBuf>,
}

impl Default for CocoConfig {
    fn default() -> Self {
        CocoConfig {
            filter: FilterKind::Band.to_string(),
            positions: None,
            threshold: None,
            threshold_method: ThresholdMethod::Numeric.to_string(),
            fps: 3.0,
            output: None,
        }
    }
}

impl CocoConfig {
    pub fn from_json_str(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let json = std::fs::read_to_string(path)?;
        let config = Self::from_json_str(&json)?;
        log::info!("loaded configuration from {:?}", path);
        Ok(config)
    }

    /// Resolves the filter family and positions, using the family default without positions.
    pub fn filter_spec(&self, wavelengths: ArrayView1<f64>) -> Result<FilterSpec> {
        let kind = FilterKind::from_str(&self.filter)?;
        match &self.positions {
            Some(positions) => FilterSpec::from_positions(kind, positions),
            None => kind.default_spec(wavelengths),
        }
    }

    pub fn threshold(&self) -> Result<Option<Threshold>> {
        let method = ThresholdMethod::from_str(&self.threshold_method)?;
        self.threshold
            .as_deref()
            .map(|pair| Threshold::from_pair(pair, method))
            .transpose()
    }
}

/// Runs filter construction, collapse and display scaling as described by `config`.
///
/// If an output path is configured, the result is written according to its extension:
/// `.npy` stores the collapsed (unscaled) cube, `.gif` an animation of a 4D cube and any other
/// image extension a still image of a 3D cube.
///
/// # Returns
/// The display cube `[x, y, 3]` or `[t, x, y, 3]` with values in `[0, 255]`.
pub fn render_with_config<S, T, D>(
    config: &CocoConfig,
    wavelengths: ArrayView1<f64>,
    cube: &ArrayBase<S, D>,
) -> Result<ArrayD<u8>>
where
    S: Data<Elem = T>,
    T: ToPrimitive,
    D: Dimension,
{
    let spec = config.filter_spec(wavelengths)?;
    let weights = build_filter(wavelengths, &spec)?;
    let threshold = config.threshold()?;
    let rgb = collapse(cube, &weights, threshold.as_ref())?;
    let display = to_display(&rgb)?;

    if let Some(output) = &config.output {
        let extension = output
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase())
            .unwrap_or_default();
        match (extension.as_str(), display.ndim()) {
            ("npy", _) => save_cube(output, &rgb)?,
            ("gif", 4) => save_gif(
                display.view().into_dimensionality::<Ix4>()?,
                config.fps,
                output,
            )?,
            ("gif", _) => {
                return Err(CocoError::invalid(
                    "animations need a 4D cube [t, wavelength, x, y]",
                ))
            }
            (_, 3) => save_png(display.view().into_dimensionality::<Ix3>()?, output)?,
            (_, _) => {
                return Err(CocoError::invalid(format!(
                    "cannot save a 4D cube to {:?}, use a .gif or .npy file",
                    output
                )))
            }
        }
    }
    Ok(display)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::io::load_cube;
    use ndarray::{Array1, Array3, Array4};

    #[test]
    fn test_default_config() {
        let config = CocoConfig::from_json_str("{}").unwrap();
        assert_eq!(config, CocoConfig::default());
        assert_eq!(config.filter, "band");
        assert_eq!(config.threshold().unwrap(), None);
    }

    #[test]
    fn test_config_resolves_filter_and_threshold() {
        let config = CocoConfig::from_json_str(
            r#"{
                "filter": "band",
                "positions": [[2, 4], [4, 8], [9, 9]],
                "threshold": [1, 99],
                "threshold_method": "percentile"
            }"#,
        )
        .unwrap();
        let wavelengths = Array1::range(0.0, 10.0, 1.0);
        assert_eq!(
            config.filter_spec(wavelengths.view()).unwrap(),
            FilterSpec::Band {
                bands: [(2, 4), (4, 8), (9, 9)]
            }
        );
        assert_eq!(
            config.threshold().unwrap(),
            Some(Threshold::new(1.0, 99.0, ThresholdMethod::Percentile))
        );
    }

    #[test]
    fn test_invalid_config_values_are_rejected() {
        let wavelengths = Array1::range(0.0, 10.0, 1.0);
        let config = CocoConfig {
            filter: "triangle".to_string(),
            ..CocoConfig::default()
        };
        assert!(matches!(
            config.filter_spec(wavelengths.view()),
            Err(CocoError::InvalidArgument(_))
        ));

        let config = CocoConfig {
            threshold: Some(vec![1.0, 2.0, 3.0]),
            ..CocoConfig::default()
        };
        assert!(matches!(
            config.threshold(),
            Err(CocoError::InvalidArgument(_))
        ));

        let config = CocoConfig {
            threshold: Some(vec![1.0, 2.0]),
            threshold_method: "median".to_string(),
            ..CocoConfig::default()
        };
        assert!(matches!(
            config.threshold(),
            Err(CocoError::InvalidArgument(_))
        ));

        assert!(matches!(
            CocoConfig::from_json_str("{\"fps\": \"fast\"}"),
            Err(CocoError::Json(_))
        ));
    }

    #[test]
    fn test_load_config_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("coco.json");
        std::fs::write(&path, r#"{"filter": "single", "positions": [9, 5, 0], "fps": 10}"#)
            .unwrap();
        let config = CocoConfig::load(&path).unwrap();
        assert_eq!(config.fps, 10.0);
        assert_eq!(
            config
                .filter_spec(Array1::range(0.0, 10.0, 1.0).view())
                .unwrap(),
            FilterSpec::Single { r: 9, g: 5, b: 0 }
        );
    }

    #[test]
    fn test_render_with_config_writes_outputs() {
        let dir = tempfile::tempdir().unwrap();
        let wavelengths = Array1::range(0.0, 6.0, 1.0);

        let cube = Array3::from_shape_fn((6, 4, 5), |(l, x, y)| (l + x + y) as f64);
        let config = CocoConfig {
            output: Some(dir.path().join("coco.png")),
            ..CocoConfig::default()
        };
        let display = render_with_config(&config, wavelengths.view(), &cube).unwrap();
        assert_eq!(display.shape(), &[4, 5, 3]);
        assert!(dir.path().join("coco.png").exists());

        let config = CocoConfig {
            output: Some(dir.path().join("coco.npy")),
            ..CocoConfig::default()
        };
        render_with_config(&config, wavelengths.view(), &cube).unwrap();
        assert_eq!(load_cube(&dir.path().join("coco.npy")).unwrap().shape(), &[4, 5, 3]);

        let video = Array4::from_shape_fn((2, 6, 4, 5), |(t, l, x, y)| (t + l + x + y) as f64);
        let config = CocoConfig {
            filter: "normal".to_string(),
            output: Some(dir.path().join("coco.gif")),
            ..CocoConfig::default()
        };
        let display = render_with_config(&config, wavelengths.view(), &video).unwrap();
        assert_eq!(display.shape(), &[2, 4, 5, 3]);
        assert!(dir.path().join("coco.gif").exists());
    }

    #[test]
    fn test_render_with_config_rejects_mismatched_output() {
        let dir = tempfile::tempdir().unwrap();
        let wavelengths = Array1::range(0.0, 3.0, 1.0);
        let cube = Array3::<f64>::ones((3, 2, 2));
        let config = CocoConfig {
            output: Some(dir.path().join("coco.gif")),
            ..CocoConfig::default()
        };
        assert!(matches!(
            render_with_config(&config, wavelengths.view(), &cube),
            Err(CocoError::InvalidArgument(_))
        ));

        let video = Array4::<f64>::ones((2, 3, 2, 2));
        let config = CocoConfig {
            output: Some(dir.path().join("coco.png")),
            ..CocoConfig::default()
        };
        assert!(matches!(
            render_with_config(&config, wavelengths.view(), &video),
            Err(CocoError::InvalidArgument(_))
        ));
    }
}
