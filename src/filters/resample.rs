//! Downscale resampling.
//!
//! Each target cell `(i, j)` maps back to the continuous source coordinate
//! `x = j / tw * sw`, `y = i / th * sh` and is interpolated from its four
//! integer neighbours, first along x (top and bottom pairs) then along y.
//! Each stage truncates to an integer.
//!
//! ## Zero Substitution
//!
//! When the interpolated channel comes out as exactly 0 it is replaced by
//! the top-left neighbour's channel. This is what makes integer source
//! coordinates (where both interpolation weights vanish) return the source
//! pixel; it also turns a genuinely black interpolated value into the
//! neighbour's value.

use ndarray::{Array3, ArrayView3};

use crate::error::{ProcessorError, ProcessorResult};

/// Values above `max` snap to `max - 1`, negatives to 0.
fn clamp_coord(v: f64, max: f64) -> f64 {
    if v > max {
        max - 1.0
    } else if v < 0.0 {
        0.0
    } else {
        v
    }
}

/// `hi * (t - floor(t)) + lo * (ceil(t) - t)`, truncated.
#[inline]
fn lerp_trunc(lo: f64, hi: f64, t: f64) -> f64 {
    (hi * (t - t.floor()) + lo * (t.ceil() - t)).trunc()
}

/// Downscale an RGB u8 image.
///
/// # Arguments
/// * `input` - 3D array view of shape (height, width, 3) with RGB u8 values
/// * `target_width` - Output width, 1..=source width
/// * `target_height` - Output height, 1..=source height
///
/// # Returns
/// New array of shape (target_height, target_width, 3)
///
/// # Errors
/// [`ProcessorError::InvalidArgument`] if a target dimension is zero or
/// larger than the source's.
#[tracing::instrument(level = "debug", skip(input))]
pub fn downscale_rgb_u8(
    input: ArrayView3<u8>,
    target_width: usize,
    target_height: usize,
) -> ProcessorResult<Array3<u8>> {
    let (height, width, _) = input.dim();
    if target_width > width || target_height > height {
        return Err(ProcessorError::invalid_argument(format!(
            "dimensions {target_width}x{target_height} are greater than original {width}x{height}"
        )));
    }
    if target_width == 0 || target_height == 0 {
        return Err(ProcessorError::invalid_argument(format!(
            "dimensions must be positive, got {target_width}x{target_height}"
        )));
    }

    let (sw, sh) = (width as f64, height as f64);
    let (tw, th) = (target_width as f64, target_height as f64);
    tracing::debug!(scale_x = tw / sw, scale_y = th / sh, "downscaling");

    let mut output = Array3::<u8>::zeros((target_height, target_width, 3));
    for i in 0..target_height {
        let y = clamp_coord(i as f64 / th * sh, sh);
        let (y0, y1) = (y.floor() as usize, y.ceil() as usize);

        for j in 0..target_width {
            let x = clamp_coord(j as f64 / tw * sw, sw);
            let (x0, x1) = (x.floor() as usize, x.ceil() as usize);

            for c in 0..3 {
                let a = input[[y0, x0, c]] as f64;
                let b = input[[y0, x1, c]] as f64;
                let cc = input[[y1, x0, c]] as f64;
                let d = input[[y1, x1, c]] as f64;

                let top = lerp_trunc(a, b, x);
                let bottom = lerp_trunc(cc, d, x);
                let v = lerp_trunc(top, bottom, y);

                output[[i, j, c]] = if v == 0.0 {
                    input[[y0, x0, c]]
                } else {
                    v.clamp(0.0, 255.0) as u8
                };
            }
        }
    }

    Ok(output)
}
