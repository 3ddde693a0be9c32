//! Three-channel 8-bit color value.
//!
//! A [`Pixel`] is an immutable RGB triple. Derived scalar views:
//! - **value**: `max(r, g, b)`
//! - **intensity**: `(r + g + b) / 3`, truncated
//! - **luma**: `round(0.2126r + 0.7152g + 0.0722b)` (ITU-R BT.709)

use crate::error::{ProcessorError, ProcessorResult};

/// ITU-R BT.709 luminosity coefficients
pub const LUMA_R: f64 = 0.2126;
pub const LUMA_G: f64 = 0.7152;
pub const LUMA_B: f64 = 0.0722;

/// Immutable RGB pixel with channels in `[0, 255]`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Pixel {
    red: u8,
    green: u8,
    blue: u8,
}

impl Pixel {
    /// Black, `(0, 0, 0)`.
    pub const BLACK: Pixel = Pixel::rgb(0, 0, 0);
    /// White, `(255, 255, 255)`.
    pub const WHITE: Pixel = Pixel::rgb(255, 255, 255);

    /// Build a pixel from signed channel values.
    ///
    /// # Errors
    /// [`ProcessorError::Validation`] if any channel is outside `[0, 255]`.
    pub fn new(red: i32, green: i32, blue: i32) -> ProcessorResult<Self> {
        Ok(Self {
            red: checked_channel("red", red)?,
            green: checked_channel("green", green)?,
            blue: checked_channel("blue", blue)?,
        })
    }

    /// Build a pixel from channels already known to be in range.
    pub const fn rgb(red: u8, green: u8, blue: u8) -> Self {
        Self { red, green, blue }
    }

    /// Build a pixel with all three channels set to `v`.
    pub const fn gray(v: u8) -> Self {
        Self::rgb(v, v, v)
    }

    pub fn red(&self) -> u8 {
        self.red
    }

    pub fn green(&self) -> u8 {
        self.green
    }

    pub fn blue(&self) -> u8 {
        self.blue
    }

    /// Channels as `[r, g, b]`.
    pub fn channels(&self) -> [u8; 3] {
        [self.red, self.green, self.blue]
    }

    /// Largest of the three channels.
    pub fn value(&self) -> u8 {
        self.red.max(self.green).max(self.blue)
    }

    /// Mean of the three channels, truncated toward zero.
    pub fn intensity(&self) -> u8 {
        ((self.red as u16 + self.green as u16 + self.blue as u16) / 3) as u8
    }

    /// BT.709 weighted sum, rounded to nearest.
    pub fn luma(&self) -> u8 {
        let weighted =
            LUMA_R * self.red as f64 + LUMA_G * self.green as f64 + LUMA_B * self.blue as f64;
        clamp_channel(weighted.round())
    }

    /// Add `delta` to each channel independently, saturating at 0 and 255.
    ///
    /// # Example
    /// ```
    /// use pixelforge::Pixel;
    ///
    /// let p = Pixel::rgb(50, 60, 70).brighten_darken(200);
    /// assert_eq!(p, Pixel::rgb(250, 255, 255));
    /// ```
    pub fn brighten_darken(&self, delta: i32) -> Self {
        let shift = |c: u8| (c as i32).saturating_add(delta).clamp(0, 255) as u8;
        Self::rgb(shift(self.red), shift(self.green), shift(self.blue))
    }
}

impl From<[u8; 3]> for Pixel {
    fn from([red, green, blue]: [u8; 3]) -> Self {
        Self::rgb(red, green, blue)
    }
}

impl From<Pixel> for [u8; 3] {
    fn from(p: Pixel) -> Self {
        p.channels()
    }
}

fn checked_channel(name: &str, v: i32) -> ProcessorResult<u8> {
    u8::try_from(v).map_err(|_| {
        ProcessorError::validation(format!("the {name} value must be between 0 and 255, got {v}"))
    })
}

/// Clamp an already-rounded channel value into `[0, 255]`.
#[inline]
pub(crate) fn clamp_channel(v: f64) -> u8 {
    v.clamp(0.0, 255.0) as u8
}
