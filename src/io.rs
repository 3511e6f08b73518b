//! Loading and saving of cubes and wavelength axes as numpy `.npy` files.

use crate::error::Result;
use ndarray::{Array1, ArrayBase, ArrayD, Data, Dimension};
use ndarray_npy::{read_npy, write_npy, ReadNpyError};
use std::path::Path;

/// Reads a data cube of any dimensionality.
///
/// `float64` files are read directly, `float32` files are converted to `f64`.
pub fn load_cube(path: &Path) -> Result<ArrayD<f64>> {
    match read_npy::<_, ArrayD<f64>>(path) {
        Ok(cube) => {
            log::info!("opened {:?} with shape {:?}", path, cube.shape());
            Ok(cube)
        }
        Err(ReadNpyError::WrongDescriptor(_)) => {
            let cube = read_npy::<_, ArrayD<f32>>(path)?.mapv(f64::from);
            log::info!("opened {:?} (float32) with shape {:?}", path, cube.shape());
            Ok(cube)
        }
        Err(err) => Err(err.into()),
    }
}

/// Reads a one-dimensional wavelength axis.
pub fn load_wavelengths(path: &Path) -> Result<Array1<f64>> {
    let wavelengths: Array1<f64> = read_npy(path)?;
    log::info!("opened {:?} with {} wavelengths", path, wavelengths.len());
    Ok(wavelengths)
}

/// Writes an array (e.g. a collapsed cube) as a `float64` `.npy` file.
pub fn save_cube<S, D>(path: &Path, cube: &ArrayBase<S, D>) -> Result<()>
where
    S: Data<Elem = f64>,
    D: Dimension,
{
    write_npy(path, cube)?;
    log::info!("saved array of shape {:?} to {:?}", cube.shape(), path);
    Ok(())
}
