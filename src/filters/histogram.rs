//! Frequency histograms for red, green, blue and intensity.

use ndarray::ArrayView3;

/// Number of bins, one per channel value.
pub const BINS: usize = 256;

/// 256-bin frequency tables; bin `v` counts pixels whose channel equals `v`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Histogram {
    pub red: [u32; BINS],
    pub green: [u32; BINS],
    pub blue: [u32; BINS],
    pub intensity: [u32; BINS],
}

impl Histogram {
    /// Count every pixel of an `(height, width, 3)` u8 array.
    pub fn from_rgb_u8(input: ArrayView3<u8>) -> Self {
        let mut hist = Histogram {
            red: [0; BINS],
            green: [0; BINS],
            blue: [0; BINS],
            intensity: [0; BINS],
        };

        let (height, width, _) = input.dim();
        for y in 0..height {
            for x in 0..width {
                let (r, g, b) = (input[[y, x, 0]], input[[y, x, 1]], input[[y, x, 2]]);
                hist.red[r as usize] += 1;
                hist.green[g as usize] += 1;
                hist.blue[b as usize] += 1;
                hist.intensity[(r as usize + g as usize + b as usize) / 3] += 1;
            }
        }

        hist
    }

    /// Highest count across all four tables, for scaling a plot.
    pub fn peak(&self) -> u32 {
        [&self.red, &self.green, &self.blue, &self.intensity]
            .iter()
            .flat_map(|t| t.iter())
            .copied()
            .max()
            .unwrap_or(0)
    }
}
