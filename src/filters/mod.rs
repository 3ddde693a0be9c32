//! Image operators.
//!
//! ## Image Format
//!
//! Every kernel in this module works on `(height, width, 3)` u8 arrays
//! (R, G, B; 0-255) and returns a new array, leaving its input untouched.
//! [`Image`] methods wrap the kernels for callers that stay in the pixel
//! model.
//!
//! ## Operator Families
//!
//! - **Per-pixel**: channel reducers, color matrices (see [`Operation`])
//! - **Neighbourhood**: convolution with zero-padded borders
//! - **Stylize**: mosaic (seeded clustering)
//! - **Geometric**: downscale
//! - **Compositing**: mask selection
//! - **Analysis**: histogram

pub mod color_matrix;
pub mod convolve;
pub mod histogram;
pub mod mask;
pub mod mosaic;
pub mod reduce;
pub mod resample;

use std::fmt;
use std::str::FromStr;

use ndarray::{Array3, ArrayView3};

use crate::error::{ProcessorError, ProcessorResult};
use crate::image::Image;

use color_matrix::{color_matrix_rgb_u8, ColorMatrix};
use convolve::{convolve_rgb_u8, Kernel};
use histogram::Histogram;
use mosaic::{mosaic_rgb_u8, SeedSource};
use reduce::{reduce_rgb_u8, Reducer};

// ============================================================================
// Operation
// ============================================================================

/// A single-image, dimension-preserving transformation.
#[derive(Clone, Debug, PartialEq)]
pub enum Operation {
    Reduce(Reducer),
    ColorMatrix(ColorMatrix),
    Convolve(Kernel),
}

impl Operation {
    pub fn blur() -> Self {
        Operation::Convolve(Kernel::blur())
    }

    pub fn sharpen() -> Self {
        Operation::Convolve(Kernel::sharpen())
    }

    pub fn sepia() -> Self {
        Operation::ColorMatrix(ColorMatrix::sepia())
    }

    pub fn greyscale() -> Self {
        Operation::ColorMatrix(ColorMatrix::greyscale())
    }

    /// Every named operation, in [`NAMES`](Self::NAMES) order.
    pub fn all_named() -> Vec<Operation> {
        Self::NAMES
            .iter()
            .filter_map(|name| name.parse().ok())
            .collect()
    }

    /// Command tokens understood by [`FromStr`].
    pub const NAMES: [&'static str; 10] = [
        "red-component",
        "green-component",
        "blue-component",
        "value-component",
        "intensity-component",
        "luma-component",
        "blur",
        "sharpen",
        "sepia-transform",
        "grayscale-transform",
    ];

    /// Run the operation over an `(height, width, 3)` u8 array.
    pub fn apply_rgb_u8(&self, input: ArrayView3<u8>) -> Array3<u8> {
        match self {
            Operation::Reduce(reducer) => reduce_rgb_u8(input, *reducer),
            Operation::ColorMatrix(matrix) => color_matrix_rgb_u8(input, matrix),
            Operation::Convolve(kernel) => convolve_rgb_u8(input, kernel),
        }
    }

    pub fn apply(&self, image: &Image) -> Image {
        Image::from_kernel_output(self.apply_rgb_u8(image.as_array()))
    }

    /// Token for the built-in operations, `None` for custom matrices or
    /// kernels.
    pub fn name(&self) -> Option<&'static str> {
        let name = match self {
            Operation::Reduce(Reducer::Red) => "red-component",
            Operation::Reduce(Reducer::Green) => "green-component",
            Operation::Reduce(Reducer::Blue) => "blue-component",
            Operation::Reduce(Reducer::Value) => "value-component",
            Operation::Reduce(Reducer::Intensity) => "intensity-component",
            Operation::Reduce(Reducer::Luma) => "luma-component",
            Operation::ColorMatrix(m) if *m == ColorMatrix::sepia() => "sepia-transform",
            Operation::ColorMatrix(m) if *m == ColorMatrix::greyscale() => "grayscale-transform",
            Operation::Convolve(k) if *k == Kernel::blur() => "blur",
            Operation::Convolve(k) if *k == Kernel::sharpen() => "sharpen",
            _ => return None,
        };
        Some(name)
    }
}

impl FromStr for Operation {
    type Err = ProcessorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let op = match s {
            "red-component" => Operation::Reduce(Reducer::Red),
            "green-component" => Operation::Reduce(Reducer::Green),
            "blue-component" => Operation::Reduce(Reducer::Blue),
            "value-component" => Operation::Reduce(Reducer::Value),
            "intensity-component" => Operation::Reduce(Reducer::Intensity),
            "luma-component" => Operation::Reduce(Reducer::Luma),
            "blur" => Operation::blur(),
            "sharpen" => Operation::sharpen(),
            "sepia-transform" => Operation::sepia(),
            "grayscale-transform" => Operation::greyscale(),
            other => {
                return Err(ProcessorError::invalid_argument(format!(
                    "not a valid transformation: {other}"
                )))
            }
        };
        Ok(op)
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.name(), self) {
            (Some(name), _) => f.write_str(name),
            (None, Operation::ColorMatrix(_)) => f.write_str("custom-matrix"),
            (None, Operation::Convolve(k)) => write!(f, "custom-kernel-{}x{}", k.size(), k.size()),
            (None, Operation::Reduce(r)) => write!(f, "{r:?}"),
        }
    }
}

impl From<Reducer> for Operation {
    fn from(r: Reducer) -> Self {
        Operation::Reduce(r)
    }
}

impl From<ColorMatrix> for Operation {
    fn from(m: ColorMatrix) -> Self {
        Operation::ColorMatrix(m)
    }
}

impl From<Kernel> for Operation {
    fn from(k: Kernel) -> Self {
        Operation::Convolve(k)
    }
}

// ============================================================================
// Image entry points
// ============================================================================

impl Image {
    /// Apply a per-pixel or convolution [`Operation`].
    pub fn apply(&self, op: &Operation) -> Image {
        op.apply(self)
    }

    /// Flatten `seed_count` nearest-seed clusters to their mean color.
    ///
    /// # Errors
    /// [`ProcessorError::InvalidArgument`] if `seed_count` is zero or larger
    /// than the number of pixels.
    pub fn mosaic<S: SeedSource + ?Sized>(
        &self,
        seed_count: usize,
        source: &mut S,
    ) -> ProcessorResult<Image> {
        mosaic_rgb_u8(self.as_array(), seed_count, source).map(Image::from_kernel_output)
    }

    /// Bilinear-style downscale to `width x height`.
    ///
    /// # Errors
    /// [`ProcessorError::InvalidArgument`] if a target is zero or larger than
    /// the current dimension.
    pub fn downscale(&self, width: usize, height: usize) -> ProcessorResult<Image> {
        resample::downscale_rgb_u8(self.as_array(), width, height).map(Image::from_kernel_output)
    }

    /// Apply `op` only where `mask` is black.
    ///
    /// # Errors
    /// [`ProcessorError::InvalidArgument`] if `mask` differs in width or height.
    #[tracing::instrument(level = "debug", skip_all, fields(op = %op))]
    pub fn masked(&self, mask: &Image, op: &Operation) -> ProcessorResult<Image> {
        if mask.dim() != self.dim() {
            return Err(ProcessorError::invalid_argument(format!(
                "mask does not have same dimensions as original image ({}x{} vs {}x{})",
                mask.width(),
                mask.height(),
                self.width(),
                self.height()
            )));
        }
        let transformed = op.apply_rgb_u8(self.as_array());
        mask::mask_composite_u8(self.as_array(), transformed.view(), mask.as_array())
            .map(Image::from_kernel_output)
    }

    pub fn histogram(&self) -> Histogram {
        Histogram::from_rgb_u8(self.as_array())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pixel::Pixel;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn sample() -> Image {
        Image::from_grid(&[
            vec![Pixel::rgb(200, 100, 50), Pixel::rgb(0, 0, 0), Pixel::rgb(255, 255, 255)],
            vec![Pixel::rgb(12, 34, 56), Pixel::rgb(90, 80, 70), Pixel::rgb(1, 2, 3)],
        ])
        .unwrap()
    }

    #[test]
    fn test_names_round_trip() {
        for name in Operation::NAMES {
            let op: Operation = name.parse().unwrap();
            assert_eq!(op.name(), Some(name));
            assert_eq!(op.to_string(), name);
        }
        assert_eq!(Operation::all_named().len(), Operation::NAMES.len());
    }

    #[test]
    fn test_unknown_name_is_rejected() {
        assert!(matches!(
            "emboss".parse::<Operation>(),
            Err(ProcessorError::InvalidArgument(_))
        ));
    }

    #[test]
    fn test_custom_operations_have_no_name() {
        let op = Operation::from(ColorMatrix::new([[1.0, 0.0, 0.0]; 3]));
        assert_eq!(op.name(), None);
        assert_eq!(op.to_string(), "custom-matrix");
    }

    #[test]
    fn test_apply_preserves_dimensions() {
        let img = sample();
        for op in Operation::all_named() {
            let out = img.apply(&op);
            assert_eq!(out.dim(), img.dim(), "{op}");
        }
    }

    #[test]
    fn test_apply_does_not_touch_input() {
        let img = sample();
        let before = img.clone();
        let _ = img.apply(&Operation::sepia());
        let _ = img.apply(&Operation::blur());
        assert!(img.exact_eq(&before));
    }

    #[test]
    fn test_reducers_produce_gray() {
        let img = sample();
        for r in Reducer::ALL {
            let out = img.apply(&Operation::from(r));
            assert!(out.pixels().all(|p| p.red() == p.green() && p.green() == p.blue()));
        }
    }

    #[test]
    fn test_masked_all_black_equals_operation() {
        let img = sample();
        let mask = Image::fill(3, 2, Pixel::BLACK).unwrap();
        for op in Operation::all_named() {
            let out = img.masked(&mask, &op).unwrap();
            assert!(out.exact_eq(&img.apply(&op)), "{op}");
        }
    }

    #[test]
    fn test_masked_non_black_equals_base() {
        let img = sample();
        let mask = Image::fill(3, 2, Pixel::rgb(3, 3, 3)).unwrap();
        let out = img.masked(&mask, &Operation::sharpen()).unwrap();
        assert!(out.exact_eq(&img));
    }

    #[test]
    fn test_masked_dimension_mismatch() {
        let img = sample();
        let mask = Image::fill(2, 3, Pixel::BLACK).unwrap();
        assert!(matches!(
            img.masked(&mask, &Operation::blur()),
            Err(ProcessorError::InvalidArgument(_))
        ));
    }

    #[test]
    fn test_mosaic_and_downscale_wrappers() {
        let img = sample();
        let mut rng = StdRng::seed_from_u64(11);
        let mosaic = img.mosaic(2, &mut rng).unwrap();
        assert_eq!(mosaic.dim(), img.dim());

        let small = img.downscale(1, 1).unwrap();
        assert_eq!(small.dim(), (1, 1));
        assert_eq!(small.pixel(0, 0), img.pixel(0, 0));
        assert!(img.downscale(4, 1).is_err());
    }

    #[test]
    fn test_histogram_wrapper() {
        let hist = sample().histogram();
        assert_eq!(hist.red.iter().sum::<u32>(), 6);
        assert_eq!(hist.red[0], 1);
        assert_eq!(hist.intensity[2], 1);
    }
}
