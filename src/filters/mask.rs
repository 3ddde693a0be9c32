//! Mask compositing.
//!
//! Where the mask pixel's intensity is 0 (black) the transformed pixel is
//! taken; everywhere else the base pixel is kept.

use ndarray::{Array3, ArrayView3};

use crate::error::{ProcessorError, ProcessorResult};

/// Select per pixel between `base` and `transformed` using `mask`.
///
/// # Arguments
/// * `base` - Original image, shape (height, width, 3)
/// * `transformed` - Operator output for `base`, same shape
/// * `mask` - Selector, same shape; black selects `transformed`
///
/// # Errors
/// [`ProcessorError::InvalidArgument`] if the three shapes differ.
pub fn mask_composite_u8<'a>(
    base: ArrayView3<'a, u8>,
    transformed: ArrayView3<'a, u8>,
    mask: ArrayView3<u8>,
) -> ProcessorResult<Array3<u8>> {
    if mask.dim() != base.dim() {
        return Err(ProcessorError::invalid_argument(format!(
            "mask is {:?} but image is {:?}",
            mask.dim(),
            base.dim()
        )));
    }
    if transformed.dim() != base.dim() {
        return Err(ProcessorError::invalid_argument(
            "transformed image does not match the base dimensions",
        ));
    }

    let (height, width, _) = mask.dim();
    let mut output = Array3::<u8>::zeros((height, width, 3));

    for y in 0..height {
        for x in 0..width {
            let sum = mask[[y, x, 0]] as u16 + mask[[y, x, 1]] as u16 + mask[[y, x, 2]] as u16;
            let black = sum / 3 == 0;
            for c in 0..3 {
                output[[y, x, c]] = if black {
                    transformed[[y, x, c]]
                } else {
                    base[[y, x, c]]
                };
            }
        }
    }

    Ok(output)
}
