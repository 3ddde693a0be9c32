//! WebAssembly exports for pixelforge operators.
//!
//! These functions are exposed to JavaScript via wasm-bindgen. Images cross
//! the boundary as flat RGB byte buffers (length = width * height * 3,
//! row-major). Errors surface as thrown JS strings.

use ndarray::Array3;
use rand::rngs::StdRng;
use rand::SeedableRng;
use wasm_bindgen::prelude::*;

use crate::error::ProcessorError;
use crate::filters::Operation;
use crate::image::Image;

fn to_js(err: ProcessorError) -> JsValue {
    JsValue::from_str(&err.to_string())
}

fn image_from_rgb(data: &[u8], width: usize, height: usize) -> Result<Image, JsValue> {
    let input = Array3::from_shape_vec((height, width, 3), data.to_vec()).map_err(|e| {
        JsValue::from_str(&format!(
            "buffer of {} bytes is not {width}x{height} RGB: {e}",
            data.len()
        ))
    })?;
    Image::from_array(input).map_err(to_js)
}

fn image_to_rgb(image: Image) -> Vec<u8> {
    image.as_array().iter().copied().collect()
}

// ============================================================================
// Per-pixel Operations
// ============================================================================

/// Apply a named operation to an RGB image.
///
/// # Arguments
/// * `data` - Flat array of RGB bytes (length = width * height * 3)
/// * `width` - Image width in pixels
/// * `height` - Image height in pixels
/// * `name` - Operation token, e.g. "blur" or "luma-component"
///
/// # Returns
/// Flat array of RGB bytes, same dimensions
#[wasm_bindgen]
pub fn apply_operation_wasm(
    data: &[u8],
    width: usize,
    height: usize,
    name: &str,
) -> Result<Vec<u8>, JsValue> {
    let op: Operation = name.parse().map_err(to_js)?;
    let input = image_from_rgb(data, width, height)?;
    Ok(image_to_rgb(op.apply(&input)))
}

#[wasm_bindgen]
pub fn brighten_wasm(
    data: &[u8],
    width: usize,
    height: usize,
    delta: i32,
) -> Result<Vec<u8>, JsValue> {
    let input = image_from_rgb(data, width, height)?;
    Ok(image_to_rgb(input.brighten_darken(delta)))
}

// ============================================================================
// Stylize / Geometric
// ============================================================================

/// Mosaic an RGB image with `seeds` clusters placed by a generator seeded
/// with `seed`.
#[wasm_bindgen]
pub fn mosaic_wasm(
    data: &[u8],
    width: usize,
    height: usize,
    seeds: usize,
    seed: u32,
) -> Result<Vec<u8>, JsValue> {
    let input = image_from_rgb(data, width, height)?;
    let mut rng = StdRng::seed_from_u64(u64::from(seed));
    input.mosaic(seeds, &mut rng).map(image_to_rgb).map_err(to_js)
}

/// Downscale an RGB image.
///
/// # Returns
/// Flat array of RGB bytes (length = target_width * target_height * 3)
#[wasm_bindgen]
pub fn downscale_wasm(
    data: &[u8],
    width: usize,
    height: usize,
    target_width: usize,
    target_height: usize,
) -> Result<Vec<u8>, JsValue> {
    let input = image_from_rgb(data, width, height)?;
    input
        .downscale(target_width, target_height)
        .map(image_to_rgb)
        .map_err(to_js)
}

// ============================================================================
// Compositing
// ============================================================================

/// Apply the named operation where `mask` is black. Both buffers share
/// `width x height`.
#[wasm_bindgen]
pub fn mask_wasm(
    data: &[u8],
    mask: &[u8],
    width: usize,
    height: usize,
    name: &str,
) -> Result<Vec<u8>, JsValue> {
    let op: Operation = name.parse().map_err(to_js)?;
    let input = image_from_rgb(data, width, height)?;
    let selector = image_from_rgb(mask, width, height)?;
    input.masked(&selector, &op).map(image_to_rgb).map_err(to_js)
}
