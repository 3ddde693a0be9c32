//! Convolution filters: Blur (3x3 Gaussian), Sharpen (5x5).
//!
//! ## Border Policy
//!
//! The source is padded with zero-valued (black) pixels out to the kernel
//! radius before convolving, so border pixels are darkened by the synthetic
//! border. Output always has the source's (unpadded) dimensions.
//!
//! Output cells are computed in parallel with rayon (through ndarray's
//! `Zip::par_for_each`); each depends only on the padded source, so the
//! result is identical to serial evaluation.

use ndarray::{s, Array2, Array3, ArrayView3, Zip};

use crate::error::{ProcessorError, ProcessorResult};
use crate::pixel::clamp_channel;

/// Square, odd-sized convolution kernel.
#[derive(Clone, Debug, PartialEq)]
pub struct Kernel {
    weights: Array2<f64>,
}

impl Kernel {
    /// # Errors
    /// [`ProcessorError::Validation`] if `weights` is not square with an odd
    /// side, or contains a non-finite weight.
    pub fn new(weights: Array2<f64>) -> ProcessorResult<Self> {
        let (rows, cols) = weights.dim();
        if rows != cols || rows % 2 == 0 {
            return Err(ProcessorError::validation(format!(
                "kernel must be square with an odd side, got {rows}x{cols}"
            )));
        }
        if weights.iter().any(|w| !w.is_finite()) {
            return Err(ProcessorError::validation("kernel weights must be finite"));
        }
        Ok(Self { weights })
    }

    /// Build from dynamically sized rows; see [`Kernel::new`].
    pub fn from_rows(rows: &[Vec<f64>]) -> ProcessorResult<Self> {
        let side = rows.len();
        if rows.iter().any(|row| row.len() != side) {
            return Err(ProcessorError::validation("kernel rows must all have the same length"));
        }
        let weights = Array2::from_shape_fn((side, side), |(y, x)| rows[y][x]);
        Self::new(weights)
    }

    /// 3x3 Gaussian blur; weights sum to 1.
    pub fn blur() -> Self {
        let weights = ndarray::arr2(&[
            [1.0 / 16.0, 1.0 / 8.0, 1.0 / 16.0],
            [1.0 / 8.0, 1.0 / 4.0, 1.0 / 8.0],
            [1.0 / 16.0, 1.0 / 8.0, 1.0 / 16.0],
        ]);
        Self { weights }
    }

    /// 5x5 sharpen: center 1, inner ring 1/4, outer ring -1/8.
    pub fn sharpen() -> Self {
        let weights = Array2::from_shape_fn((5, 5), |(y, x)| {
            let ring = (y as isize - 2).abs().max((x as isize - 2).abs());
            match ring {
                0 => 1.0,
                1 => 0.25,
                _ => -0.125,
            }
        });
        Self { weights }
    }

    /// Side length.
    pub fn size(&self) -> usize {
        self.weights.dim().0
    }

    /// Pixels of padding needed on each side.
    pub fn radius(&self) -> usize {
        self.size() / 2
    }

    pub fn weights(&self) -> &Array2<f64> {
        &self.weights
    }
}

/// Surround an image with `radius` pixels of zero on every side.
///
/// # Returns
/// Array of shape (height + 2*radius, width + 2*radius, channels)
pub fn zero_pad_u8(input: ArrayView3<u8>, radius: usize) -> Array3<u8> {
    let (height, width, channels) = input.dim();
    let mut padded = Array3::<u8>::zeros((height + 2 * radius, width + 2 * radius, channels));
    padded
        .slice_mut(s![radius..radius + height, radius..radius + width, ..])
        .assign(&input);
    padded
}

/// Convolve each channel of an RGB u8 image with `kernel`.
///
/// # Arguments
/// * `input` - 3D array view of shape (height, width, 3) with RGB u8 values
/// * `kernel` - Odd-sized square kernel
///
/// # Returns
/// New array with the input's shape; sums are rounded to nearest and clamped
#[tracing::instrument(level = "debug", skip_all, fields(size = kernel.size()))]
pub fn convolve_rgb_u8(input: ArrayView3<u8>, kernel: &Kernel) -> Array3<u8> {
    let (height, width, channels) = input.dim();
    if input.is_empty() {
        return input.to_owned();
    }

    let size = kernel.size();
    let padded = zero_pad_u8(input, kernel.radius());
    let weights = &kernel.weights;

    tracing::debug!(height, width, radius = kernel.radius(), "convolving");

    let mut output = Array3::<u8>::zeros((height, width, channels));
    Zip::indexed(&mut output).par_for_each(|(y, x, c), out| {
        let mut sum = 0.0f64;
        for ky in 0..size {
            for kx in 0..size {
                sum += weights[[ky, kx]] * padded[[y + ky, x + kx, c]] as f64;
            }
        }
        *out = clamp_channel(sum.round());
    });

    output
}

#[cfg(test)]
mod tests {
    use super::*;

    fn uniform(height: usize, width: usize, rgb: [u8; 3]) -> Array3<u8> {
        Array3::from_shape_fn((height, width, 3), |(_, _, c)| rgb[c])
    }

    #[test]
    fn test_kernel_shapes() {
        assert_eq!(Kernel::blur().size(), 3);
        assert_eq!(Kernel::blur().radius(), 1);
        assert_eq!(Kernel::sharpen().size(), 5);
        assert_eq!(Kernel::sharpen().radius(), 2);

        let blur_sum: f64 = Kernel::blur().weights().sum();
        assert!((blur_sum - 1.0).abs() < 1e-12);

        let sharpen = Kernel::sharpen();
        assert_eq!(sharpen.weights()[[2, 2]], 1.0);
        assert_eq!(sharpen.weights()[[1, 3]], 0.25);
        assert_eq!(sharpen.weights()[[0, 4]], -0.125);
        assert_eq!(sharpen.weights()[[4, 1]], -0.125);
    }

    #[test]
    fn test_kernel_validation() {
        assert!(Kernel::new(Array2::zeros((2, 2))).is_err());
        assert!(Kernel::new(Array2::zeros((3, 5))).is_err());
        assert!(Kernel::new(Array2::from_elem((3, 3), f64::NAN)).is_err());
        assert!(Kernel::from_rows(&[vec![1.0, 0.0], vec![0.0]]).is_err());
        assert!(Kernel::from_rows(&[vec![1.0]]).is_ok());
    }

    #[test]
    fn test_zero_pad() {
        let img = uniform(2, 3, [9, 9, 9]);
        let padded = zero_pad_u8(img.view(), 2);
        assert_eq!(padded.dim(), (6, 7, 3));
        assert_eq!(padded[[0, 0, 0]], 0);
        assert_eq!(padded[[1, 3, 1]], 0);
        assert_eq!(padded[[2, 2, 0]], 9);
        assert_eq!(padded[[3, 4, 2]], 9);
        assert_eq!(padded[[4, 4, 2]], 0);
    }

    #[test]
    fn test_blur_preserves_dimensions() {
        let img = uniform(5, 7, [10, 20, 30]);
        assert_eq!(convolve_rgb_u8(img.view(), &Kernel::blur()).dim(), (5, 7, 3));
        assert_eq!(convolve_rgb_u8(img.view(), &Kernel::sharpen()).dim(), (5, 7, 3));
    }

    #[test]
    fn test_blur_uniform_interior_unchanged() {
        let img = uniform(6, 6, [50, 60, 70]);
        let out = convolve_rgb_u8(img.view(), &Kernel::blur());
        for y in 1..5 {
            for x in 1..5 {
                assert_eq!(out[[y, x, 0]], 50);
                assert_eq!(out[[y, x, 1]], 60);
                assert_eq!(out[[y, x, 2]], 70);
            }
        }
    }

    #[test]
    fn test_blur_darkens_edges() {
        let img = uniform(4, 4, [160, 160, 160]);
        let out = convolve_rgb_u8(img.view(), &Kernel::blur());
        // corner keeps 1/4 + 2/8 + 1/16 = 9/16 of its weight: 90
        assert_eq!(out[[0, 0, 0]], 90);
        // edge keeps 1/4 + 3/8 + 2/16 = 12/16: 120
        assert_eq!(out[[0, 1, 0]], 120);
    }

    #[test]
    fn test_sharpen_single_pixel() {
        let mut img = Array3::<u8>::zeros((1, 1, 3));
        img[[0, 0, 0]] = 100;
        let out = convolve_rgb_u8(img.view(), &Kernel::sharpen());
        assert_eq!(out[[0, 0, 0]], 100);
        assert_eq!(out[[0, 0, 1]], 0);
    }

    #[test]
    fn test_sharpen_clamps() {
        // center 200 plus eight 200s at 1/4 each = 600 before clamping
        let img = uniform(3, 3, [200, 0, 0]);
        let out = convolve_rgb_u8(img.view(), &Kernel::sharpen());
        assert_eq!(out[[1, 1, 0]], 255);

        // a bright ring on the outer border pulls the center below zero
        let mut ring = Array3::<u8>::zeros((5, 5, 3));
        for y in 0..5 {
            for x in 0..5 {
                if y == 0 || y == 4 || x == 0 || x == 4 {
                    ring[[y, x, 1]] = 255;
                }
            }
        }
        let out = convolve_rgb_u8(ring.view(), &Kernel::sharpen());
        assert_eq!(out[[2, 2, 1]], 0);
    }

    #[test]
    fn test_parallel_matches_reference() {
        let mut img = Array3::<u8>::zeros((9, 11, 3));
        for (i, v) in img.iter_mut().enumerate() {
            *v = (i * 97 % 256) as u8;
        }
        let kernel = Kernel::blur();
        let out = convolve_rgb_u8(img.view(), &kernel);

        let padded = zero_pad_u8(img.view(), 1);
        for y in 0..9 {
            for x in 0..11 {
                for c in 0..3 {
                    let mut sum = 0.0;
                    for ky in 0..3 {
                        for kx in 0..3 {
                            sum += kernel.weights()[[ky, kx]] * padded[[y + ky, x + kx, c]] as f64;
                        }
                    }
                    assert_eq!(out[[y, x, c]], sum.round().clamp(0.0, 255.0) as u8);
                }
            }
        }
    }

    #[test]
    fn test_output_is_standard_layout_for_strided_input() {
        let img = Array3::from_shape_fn((4, 6, 3), |(y, x, c)| (y * 50 + x * 7 + c) as u8);
        let flipped = img.slice(s![.., ..;-1, ..]);
        let out = convolve_rgb_u8(flipped, &Kernel::sharpen());
        assert!(out.is_standard_layout());

        let expected = convolve_rgb_u8(flipped.to_owned().view(), &Kernel::sharpen());
        assert_eq!(out, expected);
    }
}
