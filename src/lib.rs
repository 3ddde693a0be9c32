//! pixelforge
//!
//! Pure raster-image transformations: channel reducers, color matrices,
//! convolution filters, mosaic stylization, downscaling and mask
//! compositing, with Python bindings via PyO3 and WASM bindings for
//! JavaScript.
//!
//! ## Image Format
//! All operators work on 8-bit RGB:
//! - [`Pixel`]: immutable `(r, g, b)` triple, each channel 0-255
//! - [`Image`]: immutable `(height, width, 3)` u8 grid of pixels
//!
//! Every operator returns a new image; inputs are never modified.
//!
//! ## Operator Architecture
//! Kernels in [`filters`] take `ArrayView3<u8>` and return `Array3<u8>`, so
//! the bindings can run them directly on numpy / JS buffers. The per-pixel
//! families are gathered into the [`Operation`] enum with a single `apply`.
//!
//! ```
//! use pixelforge::{Image, ImageStore, Operation, Pixel};
//!
//! let mut store = ImageStore::new();
//! store.add("base", Image::fill(4, 4, Pixel::rgb(50, 60, 70)).unwrap());
//!
//! let sepia = store.get("base").unwrap().apply(&"sepia-transform".parse::<Operation>().unwrap());
//! store.add("base-sepia", sepia);
//! assert_eq!(store.count(), 2);
//! ```

pub mod error;
pub mod filters;
pub mod image;
pub mod pixel;
pub mod store;

#[cfg(feature = "wasm")]
pub mod wasm;

pub use error::{ProcessorError, ProcessorResult};
pub use filters::color_matrix::ColorMatrix;
pub use filters::convolve::Kernel;
pub use filters::histogram::Histogram;
pub use filters::mosaic::{Clustering, Position2D, SeedSource};
pub use filters::reduce::Reducer;
pub use filters::Operation;
pub use image::Image;
pub use pixel::Pixel;
pub use store::ImageStore;

// Python bindings (only when python feature is enabled)
#[cfg(feature = "python")]
mod python {
    use numpy::{IntoPyArray, PyArray3, PyReadonlyArray3};
    use pyo3::exceptions::{PyKeyError, PyValueError};
    use pyo3::prelude::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    use crate::{Image, Operation, ProcessorError};

    impl From<ProcessorError> for PyErr {
        fn from(err: ProcessorError) -> PyErr {
            match err {
                ProcessorError::NotFound(_) => PyKeyError::new_err(err.to_string()),
                _ => PyValueError::new_err(err.to_string()),
            }
        }
    }

    fn to_image(image: &PyReadonlyArray3<'_, u8>) -> PyResult<Image> {
        Ok(Image::from_array(image.as_array().to_owned())?)
    }

    // ========================================================================
    // Per-pixel Operations
    // ========================================================================

    /// Apply a named operation ("blur", "sepia-transform", "luma-component", ...).
    ///
    /// Input/output are (height, width, 3) u8 arrays.
    #[pyfunction]
    pub fn apply_operation<'py>(
        py: Python<'py>,
        image: PyReadonlyArray3<'py, u8>,
        name: &str,
    ) -> PyResult<Bound<'py, PyArray3<u8>>> {
        let op: Operation = name.parse()?;
        let input = to_image(&image)?;
        Ok(op.apply(&input).into_array().into_pyarray(py))
    }

    /// Names accepted by `apply_operation` and `mask`.
    #[pyfunction]
    pub fn operation_names() -> Vec<&'static str> {
        Operation::NAMES.to_vec()
    }

    #[pyfunction]
    pub fn brighten<'py>(
        py: Python<'py>,
        image: PyReadonlyArray3<'py, u8>,
        delta: i32,
    ) -> PyResult<Bound<'py, PyArray3<u8>>> {
        let input = to_image(&image)?;
        Ok(input.brighten_darken(delta).into_array().into_pyarray(py))
    }

    // ========================================================================
    // Geometric Operations
    // ========================================================================

    #[pyfunction]
    pub fn flip_horizontal<'py>(
        py: Python<'py>,
        image: PyReadonlyArray3<'py, u8>,
    ) -> PyResult<Bound<'py, PyArray3<u8>>> {
        let input = to_image(&image)?;
        Ok(input.flip_horizontal().into_array().into_pyarray(py))
    }

    #[pyfunction]
    pub fn flip_vertical<'py>(
        py: Python<'py>,
        image: PyReadonlyArray3<'py, u8>,
    ) -> PyResult<Bound<'py, PyArray3<u8>>> {
        let input = to_image(&image)?;
        Ok(input.flip_vertical().into_array().into_pyarray(py))
    }

    /// Downscale to (width, height); both must be positive and no larger
    /// than the source.
    #[pyfunction]
    pub fn downscale<'py>(
        py: Python<'py>,
        image: PyReadonlyArray3<'py, u8>,
        width: usize,
        height: usize,
    ) -> PyResult<Bound<'py, PyArray3<u8>>> {
        let input = to_image(&image)?;
        Ok(input.downscale(width, height)?.into_array().into_pyarray(py))
    }

    // ========================================================================
    // Stylize / Compositing
    // ========================================================================

    /// Mosaic with `seeds` clusters. `seed` fixes the random seed positions.
    #[pyfunction]
    #[pyo3(signature = (image, seeds, seed=0))]
    pub fn mosaic<'py>(
        py: Python<'py>,
        image: PyReadonlyArray3<'py, u8>,
        seeds: usize,
        seed: u64,
    ) -> PyResult<Bound<'py, PyArray3<u8>>> {
        let input = to_image(&image)?;
        let mut rng = StdRng::seed_from_u64(seed);
        Ok(input.mosaic(seeds, &mut rng)?.into_array().into_pyarray(py))
    }

    /// Apply the named operation where `mask` is black, keep `image` elsewhere.
    #[pyfunction]
    pub fn mask<'py>(
        py: Python<'py>,
        image: PyReadonlyArray3<'py, u8>,
        mask: PyReadonlyArray3<'py, u8>,
        name: &str,
    ) -> PyResult<Bound<'py, PyArray3<u8>>> {
        let op: Operation = name.parse()?;
        let input = to_image(&image)?;
        let selector = to_image(&mask)?;
        Ok(input.masked(&selector, &op)?.into_array().into_pyarray(py))
    }

    /// (red, green, blue, intensity) frequency lists of 256 bins each.
    #[pyfunction]
    pub fn histogram<'py>(
        image: PyReadonlyArray3<'py, u8>,
    ) -> PyResult<(Vec<u32>, Vec<u32>, Vec<u32>, Vec<u32>)> {
        let hist = to_image(&image)?.histogram();
        Ok((
            hist.red.to_vec(),
            hist.green.to_vec(),
            hist.blue.to_vec(),
            hist.intensity.to_vec(),
        ))
    }

    /// pixelforge extension module
    #[pymodule]
    pub fn pixelforge(m: &Bound<'_, PyModule>) -> PyResult<()> {
        m.add_function(wrap_pyfunction!(apply_operation, m)?)?;
        m.add_function(wrap_pyfunction!(operation_names, m)?)?;
        m.add_function(wrap_pyfunction!(brighten, m)?)?;

        m.add_function(wrap_pyfunction!(flip_horizontal, m)?)?;
        m.add_function(wrap_pyfunction!(flip_vertical, m)?)?;
        m.add_function(wrap_pyfunction!(downscale, m)?)?;

        m.add_function(wrap_pyfunction!(mosaic, m)?)?;
        m.add_function(wrap_pyfunction!(mask, m)?)?;
        m.add_function(wrap_pyfunction!(histogram, m)?)?;

        Ok(())
    }
}

#[cfg(feature = "python")]
pub use python::pixelforge;
