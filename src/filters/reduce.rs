//! Channel reducers: collapse each pixel to one scalar and replicate it
//! across R, G and B.
//!
//! Works on `(height, width, 3)` u8 arrays. Every reducer's scalar is
//! already in `[0, 255]`, so the operation is total.

use ndarray::{Array3, ArrayView3};

use crate::pixel::Pixel;

/// Which scalar a reducer extracts from a pixel.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Reducer {
    Red,
    Green,
    Blue,
    /// `max(r, g, b)`
    Value,
    /// `(r + g + b) / 3`
    Intensity,
    /// BT.709 luma
    Luma,
}

impl Reducer {
    pub const ALL: [Reducer; 6] = [
        Reducer::Red,
        Reducer::Green,
        Reducer::Blue,
        Reducer::Value,
        Reducer::Intensity,
        Reducer::Luma,
    ];

    /// The scalar this reducer extracts from `p`.
    pub fn scalar(self, p: Pixel) -> u8 {
        match self {
            Reducer::Red => p.red(),
            Reducer::Green => p.green(),
            Reducer::Blue => p.blue(),
            Reducer::Value => p.value(),
            Reducer::Intensity => p.intensity(),
            Reducer::Luma => p.luma(),
        }
    }

    /// Gray pixel with every channel set to [`scalar`](Self::scalar).
    pub fn reduce(self, p: Pixel) -> Pixel {
        Pixel::gray(self.scalar(p))
    }
}

/// Apply a channel reducer to an RGB u8 image.
///
/// # Arguments
/// * `input` - 3D array view of shape (height, width, 3) with RGB u8 values
/// * `reducer` - Scalar to extract
///
/// # Returns
/// New array with R=G=B=scalar
pub fn reduce_rgb_u8(input: ArrayView3<u8>, reducer: Reducer) -> Array3<u8> {
    let (height, width, _) = input.dim();
    let mut output = Array3::<u8>::zeros((height, width, 3));

    for y in 0..height {
        for x in 0..width {
            let p = Pixel::rgb(input[[y, x, 0]], input[[y, x, 1]], input[[y, x, 2]]);
            let v = reducer.scalar(p);

            output[[y, x, 0]] = v;
            output[[y, x, 1]] = v;
            output[[y, x, 2]] = v;
        }
    }

    output
}
