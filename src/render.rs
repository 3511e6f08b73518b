//! Conversion of collapsed cubes into displayable 8-bit images and animations.
//!
//! The collapsed cube is scaled to `[0, 255]` with one global maximum shared by all channels,
//! so that the colour balance produced by the filter is preserved. Frames are written with the
//! first array row at the bottom of the image.

use crate::collapse::{collapse, Threshold};
use crate::error::{CocoError, Result};
use crate::math_tools::finite_min_max;
use image::codecs::gif::{GifEncoder, Repeat};
use image::{Delay, DynamicImage, Frame, Rgb, RgbImage};
use ndarray::{
    Array, Array2, ArrayBase, ArrayD, ArrayView1, ArrayView3, ArrayView4, Axis, Data, Dimension,
};
use num_traits::ToPrimitive;
use std::fs::File;
use std::io::BufWriter;
use std::path::Path;
use std::time::Duration;

/// Scales data to the display range `[0, 255]`.
///
/// Every value is divided by the global maximum, multiplied by 255 and rounded. NaN values map
/// to 0 and values outside the range are saturated.
///
/// # Errors
/// `CocoError::EmptyResult` for an empty array, `CocoError::InvalidArgument` if the maximum
/// is infinite.
pub fn to_display<S, D>(data: &ArrayBase<S, D>) -> Result<Array<u8, D>>
where
    S: Data<Elem = f64>,
    D: Dimension,
{
    if data.is_empty() {
        return Err(CocoError::EmptyResult);
    }
    let max = match finite_min_max(data.iter().copied()) {
        Some((_, max)) => max,
        None => 0.0,
    };
    if max.is_infinite() {
        return Err(CocoError::invalid(
            "cannot scale data with an infinite maximum",
        ));
    }
    if max <= 0.0 {
        log::warn!("maximum of the data is {max}, the display image will be black");
        return Ok(Array::zeros(data.raw_dim()));
    }
    Ok(data.mapv(|v| {
        if v.is_nan() {
            0
        } else {
            (v * 255.0 / max).round().clamp(0.0, 255.0) as u8
        }
    }))
}

/// Collapses a cube and scales it to the display range, see [`collapse`] and [`to_display`].
pub fn render<S, T, D>(
    cube: &ArrayBase<S, D>,
    weights: &Array2<f64>,
    threshold: Option<&Threshold>,
) -> Result<ArrayD<u8>>
where
    S: Data<Elem = T>,
    T: ToPrimitive,
    D: Dimension,
{
    let rgb = collapse(cube, weights, threshold)?;
    to_display(&rgb)
}

/// Converts an `[x, y, 3]` frame into an image of height `x` and width `y`.
///
/// The first array row becomes the bottom image row (origin in the lower left corner).
pub fn frame_to_image(frame: ArrayView3<u8>) -> Result<RgbImage> {
    let (height, width, channels) = frame.dim();
    if channels != 3 {
        return Err(CocoError::invalid(format!(
            "frames must have 3 colour channels, got {channels}"
        )));
    }
    let (Ok(w), Ok(h)) = (u32::try_from(width), u32::try_from(height)) else {
        return Err(CocoError::invalid(format!(
            "frame of {height}x{width} pixels is too large"
        )));
    };
    Ok(RgbImage::from_fn(w, h, |col, row| {
        let i = height - 1 - row as usize;
        let j = col as usize;
        Rgb([frame[[i, j, 0]], frame[[i, j, 1]], frame[[i, j, 2]]])
    }))
}

/// Saves an `[x, y, 3]` frame, the image format is chosen from the file extension.
pub fn save_png(frame: ArrayView3<u8>, path: &Path) -> Result<()> {
    frame_to_image(frame)?.save(path)?;
    log::info!("saved image to {:?}", path);
    Ok(())
}

/// Saves a `[t, x, y, 3]` sequence as a looping GIF animation with `fps` frames per second.
pub fn save_gif(frames: ArrayView4<u8>, fps: f64, path: &Path) -> Result<()> {
    if !(fps.is_finite() && fps > 0.0) {
        return Err(CocoError::invalid(format!(
            "frames per second must be positive, got {fps}"
        )));
    }
    let delay = Delay::from_saturating_duration(Duration::from_secs_f64(1.0 / fps));

    let images = frames
        .axis_iter(Axis(0))
        .map(frame_to_image)
        .collect::<Result<Vec<RgbImage>>>()?;

    let mut encoder = GifEncoder::new(BufWriter::new(File::create(path)?));
    encoder.set_repeat(Repeat::Infinite)?;
    for image in images {
        let rgba = DynamicImage::ImageRgb8(image).into_rgba8();
        encoder.encode_frame(Frame::from_parts(rgba, 0, 0, delay))?;
    }
    log::info!("saved {} frames at {fps} fps to {:?}", frames.len_of(Axis(0)), path);
    Ok(())
}

/// Returns the colour that a filter assigns to a single spectral profile.
///
/// The profile is weighted with each filter channel and summed, and the three sums are scaled
/// so that the largest becomes 255.
pub fn profile_color(profile: ArrayView1<f64>, weights: &Array2<f64>) -> Result<[u8; 3]> {
    if weights.dim() != (profile.len(), 3) {
        return Err(CocoError::invalid(format!(
            "filter of shape {:?} does not match a profile of length {}",
            weights.shape(),
            profile.len()
        )));
    }
    let rgb = weights.t().dot(&profile);
    let display = to_display(&rgb)?;
    Ok([display[0], display[1], display[2]])
}
