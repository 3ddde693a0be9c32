//! Color matrix transforms: Greyscale, Sepia.
//!
//! Each output channel is a rounded, clamped linear combination of the
//! input channels:
//!
//! ```text
//! out[i] = clamp(round(M[i][0]*r + M[i][1]*g + M[i][2]*b), 0, 255)
//! ```

use ndarray::{Array3, ArrayView3};

use crate::error::{ProcessorError, ProcessorResult};
use crate::pixel::{clamp_channel, Pixel, LUMA_B, LUMA_G, LUMA_R};

const GREYSCALE_ROWS: [[f64; 3]; 3] = [
    [LUMA_R, LUMA_G, LUMA_B],
    [LUMA_R, LUMA_G, LUMA_B],
    [LUMA_R, LUMA_G, LUMA_B],
];

const SEPIA_ROWS: [[f64; 3]; 3] = [
    [0.393, 0.769, 0.189],
    [0.349, 0.686, 0.168],
    [0.272, 0.534, 0.131],
];

/// A 3x3 channel-mixing matrix.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ColorMatrix {
    rows: [[f64; 3]; 3],
}

impl ColorMatrix {
    pub const fn new(rows: [[f64; 3]; 3]) -> Self {
        Self { rows }
    }

    /// Build from dynamically sized rows.
    ///
    /// # Errors
    /// [`ProcessorError::Validation`] unless there are exactly 3 rows of 3.
    pub fn from_rows(rows: &[Vec<f64>]) -> ProcessorResult<Self> {
        if rows.len() != 3 || rows.iter().any(|row| row.len() != 3) {
            return Err(ProcessorError::validation(
                "this matrix must have dimensions 3 by 3",
            ));
        }
        let mut fixed = [[0.0; 3]; 3];
        for (dst, src) in fixed.iter_mut().zip(rows) {
            dst.copy_from_slice(src);
        }
        Ok(Self::new(fixed))
    }

    /// Every channel becomes BT.709 luma.
    pub const fn greyscale() -> Self {
        Self::new(GREYSCALE_ROWS)
    }

    pub const fn sepia() -> Self {
        Self::new(SEPIA_ROWS)
    }

    pub fn rows(&self) -> &[[f64; 3]; 3] {
        &self.rows
    }

    /// Remix a single pixel.
    pub fn transform(&self, p: Pixel) -> Pixel {
        let [r, g, b] = p.channels().map(f64::from);
        let [out_r, out_g, out_b] = self
            .rows
            .map(|[mr, mg, mb]| clamp_channel((mr * r + mg * g + mb * b).round()));
        Pixel::rgb(out_r, out_g, out_b)
    }
}

/// Apply a color matrix to an RGB u8 image.
///
/// # Arguments
/// * `input` - 3D array view of shape (height, width, 3) with RGB u8 values
/// * `matrix` - Channel-mixing matrix
///
/// # Returns
/// New array of the same shape, every channel in `[0, 255]`
pub fn color_matrix_rgb_u8(input: ArrayView3<u8>, matrix: &ColorMatrix) -> Array3<u8> {
    let (height, width, _) = input.dim();
    let mut output = Array3::<u8>::zeros((height, width, 3));

    for y in 0..height {
        for x in 0..width {
            let p = Pixel::rgb(input[[y, x, 0]], input[[y, x, 1]], input[[y, x, 2]]);
            let [r, g, b] = matrix.transform(p).channels();

            output[[y, x, 0]] = r;
            output[[y, x, 1]] = g;
            output[[y, x, 2]] = b;
        }
    }

    output
}
