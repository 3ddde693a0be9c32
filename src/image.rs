//! Immutable RGB raster.
//!
//! Pixels live in an `(height, width, 3)` u8 array, the same layout the
//! filter kernels in [`crate::filters`] consume. Every transformation
//! returns a new [`Image`]; the receiver is never modified.

use ndarray::{s, Array3, ArrayView3};

use crate::error::{ProcessorError, ProcessorResult};
use crate::pixel::Pixel;

/// Rectangular grid of [`Pixel`], at least 1x1.
#[derive(Clone, Debug)]
pub struct Image {
    data: Array3<u8>,
}

impl Image {
    /// Build an image from rows of pixels. Width is taken from row 0.
    ///
    /// # Errors
    /// [`ProcessorError::InvalidArgument`] if there are no rows, row 0 is
    /// empty, or any row differs in length from row 0.
    pub fn from_grid(rows: &[Vec<Pixel>]) -> ProcessorResult<Self> {
        let height = rows.len();
        let width = rows.first().map_or(0, Vec::len);
        if height == 0 || width == 0 {
            return Err(ProcessorError::invalid_argument(
                "an image needs at least one row and one column",
            ));
        }
        if let Some(bad) = rows.iter().position(|row| row.len() != width) {
            return Err(ProcessorError::invalid_argument(format!(
                "row {bad} has {} pixels, expected {width}",
                rows[bad].len()
            )));
        }

        Ok(Self::from_fn(height, width, |y, x| rows[y][x]))
    }

    /// Build a `width x height` image where every cell is `pixel`.
    ///
    /// # Errors
    /// [`ProcessorError::InvalidArgument`] if either dimension is zero.
    pub fn fill(width: usize, height: usize, pixel: Pixel) -> ProcessorResult<Self> {
        if width < 1 || height < 1 {
            return Err(ProcessorError::invalid_argument(format!(
                "dimensions must be positive, got {width}x{height}"
            )));
        }
        Ok(Self::from_fn(height, width, |_, _| pixel))
    }

    /// Wrap an `(height, width, 3)` u8 array.
    ///
    /// # Errors
    /// [`ProcessorError::Validation`] if the channel axis is not 3, or
    /// [`ProcessorError::InvalidArgument`] if either spatial axis is empty.
    pub fn from_array(data: Array3<u8>) -> ProcessorResult<Self> {
        let (height, width, channels) = data.dim();
        if channels != 3 {
            return Err(ProcessorError::validation(format!(
                "expected 3 channels, got {channels}"
            )));
        }
        if height == 0 || width == 0 {
            return Err(ProcessorError::invalid_argument(format!(
                "dimensions must be positive, got {width}x{height}"
            )));
        }
        Ok(Self { data })
    }

    /// Wrap an array produced by one of the crate's own kernels, which
    /// always preserve the `(h >= 1, w >= 1, 3)` shape.
    pub(crate) fn from_kernel_output(data: Array3<u8>) -> Self {
        debug_assert_eq!(data.dim().2, 3);
        debug_assert!(data.dim().0 > 0 && data.dim().1 > 0);
        Self { data }
    }

    pub(crate) fn from_fn(
        height: usize,
        width: usize,
        mut f: impl FnMut(usize, usize) -> Pixel,
    ) -> Self {
        let mut data = Array3::<u8>::zeros((height, width, 3));
        for y in 0..height {
            for x in 0..width {
                let [r, g, b] = f(y, x).channels();
                data[[y, x, 0]] = r;
                data[[y, x, 1]] = g;
                data[[y, x, 2]] = b;
            }
        }
        Self { data }
    }

    pub fn width(&self) -> usize {
        self.data.dim().1
    }

    pub fn height(&self) -> usize {
        self.data.dim().0
    }

    /// `(height, width)`
    pub fn dim(&self) -> (usize, usize) {
        let (height, width, _) = self.data.dim();
        (height, width)
    }

    /// Pixel at `(row, col)`.
    ///
    /// # Panics
    /// If the position is outside the image.
    pub fn pixel(&self, row: usize, col: usize) -> Pixel {
        Pixel::rgb(
            self.data[[row, col, 0]],
            self.data[[row, col, 1]],
            self.data[[row, col, 2]],
        )
    }

    /// Pixel at `(row, col)`, or `None` outside the image.
    pub fn get(&self, row: usize, col: usize) -> Option<Pixel> {
        (row < self.height() && col < self.width()).then(|| self.pixel(row, col))
    }

    /// Owned copy of the grid, row-major.
    pub fn pixels_snapshot(&self) -> Vec<Vec<Pixel>> {
        (0..self.height())
            .map(|y| (0..self.width()).map(|x| self.pixel(y, x)).collect())
            .collect()
    }

    /// Row-major iterator over all pixels.
    pub fn pixels(&self) -> impl Iterator<Item = Pixel> + '_ {
        let width = self.width();
        (0..self.height() * width).map(move |i| self.pixel(i / width, i % width))
    }

    /// Read-only view of the underlying `(height, width, 3)` array.
    pub fn as_array(&self) -> ArrayView3<'_, u8> {
        self.data.view()
    }

    pub fn into_array(self) -> Array3<u8> {
        self.data
    }

    /// Exact, channel-by-channel equality.
    pub fn exact_eq(&self, other: &Image) -> bool {
        self.data == other.data
    }

    // ========================================================================
    // Geometric operations
    // ========================================================================

    /// Mirror left-right (reverse column order).
    pub fn flip_horizontal(&self) -> Image {
        Self::from_kernel_output(self.data.slice(s![.., ..;-1, ..]).to_owned())
    }

    /// Mirror top-bottom (reverse row order).
    pub fn flip_vertical(&self) -> Image {
        Self::from_kernel_output(self.data.slice(s![..;-1, .., ..]).to_owned())
    }

    // ========================================================================
    // Photometric operations
    // ========================================================================

    /// Apply [`Pixel::brighten_darken`] to every cell.
    pub fn brighten_darken(&self, delta: i32) -> Image {
        self.map_pixels(|p| p.brighten_darken(delta))
    }

    pub(crate) fn map_pixels(&self, mut f: impl FnMut(Pixel) -> Pixel) -> Image {
        Self::from_fn(self.height(), self.width(), |y, x| f(self.pixel(y, x)))
    }
}

/// Tolerant comparison: same dimensions and every pixel's
/// [`value`](Pixel::value) within 1 of its counterpart.
impl PartialEq for Image {
    fn eq(&self, other: &Self) -> bool {
        if self.dim() != other.dim() {
            return false;
        }
        self.pixels()
            .zip(other.pixels())
            .all(|(a, b)| (a.value() as i16 - b.value() as i16).abs() <= 1)
    }
}
