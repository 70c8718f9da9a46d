use std::path::Path;

use crate::paint::Color;
use crate::EngineError;

const BYTES_PER_PIXEL: usize = 4;

/// RGBA8 pixel buffer with bottom-left origin.
///
/// Row `0` of `pixels` is the bottom row of the image.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Bitmap {
    width: u32,
    height: u32,
    pixels: Vec<u8>,
}

impl Bitmap {
    /// Wraps an RGBA8 buffer that is already stored bottom row first.
    pub fn from_rgba(width: u32, height: u32, pixels: Vec<u8>) -> Result<Self, EngineError> {
        let expected = width as usize * height as usize * BYTES_PER_PIXEL;
        if pixels.len() != expected {
            return Err(EngineError::InvalidBitmap {
                width,
                height,
                expected,
                actual: pixels.len(),
            });
        }
        Ok(Self { width, height, pixels })
    }

    /// Decodes an encoded image (PNG, JPEG, ...) and flips it to bottom-left origin.
    pub fn decode(bytes: &[u8]) -> Result<Self, EngineError> {
        let img = image::load_from_memory(bytes)?.flipv().into_rgba8();
        let (width, height) = img.dimensions();
        Ok(Self { width, height, pixels: img.into_raw() })
    }

    /// Reads and decodes an image file.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, EngineError> {
        let path = path.as_ref();
        let bytes = std::fs::read(path).map_err(|e| EngineError::io(path, e))?;
        let bitmap = Self::decode(&bytes)?;
        log::debug!("loaded bitmap {} ({}x{})", path.display(), bitmap.width, bitmap.height);
        Ok(bitmap)
    }

    /// A bitmap filled with a single color.
    pub fn solid(color: Color, width: u32, height: u32) -> Self {
        let px = color.to_rgba8();
        let pixels = px.repeat(width as usize * height as usize);
        Self { width, height, pixels }
    }

    /// Top-to-bottom gradient.
    ///
    /// The row `i` rows below the top is `top * r + bottom * (1 - r)` with
    /// `r = 1 - (i + 1) / height`, so the bottom row is exactly `bottom`.
    pub fn vertical_gradient(top: Color, bottom: Color, width: u32, height: u32) -> Self {
        let mut pixels = vec![0u8; width as usize * height as usize * BYTES_PER_PIXEL];
        let row_len = width as usize * BYTES_PER_PIXEL;

        for i in 0..height {
            let ratio = 1.0 - (i + 1) as f32 / height as f32;
            let px = bottom.lerp(top, ratio).to_rgba8();
            // Storage is bottom-up: the i-th row from the top lives at height-1-i.
            let row = (height - 1 - i) as usize;
            for chunk in pixels[row * row_len..(row + 1) * row_len].chunks_exact_mut(BYTES_PER_PIXEL) {
                chunk.copy_from_slice(&px);
            }
        }

        Self { width, height, pixels }
    }

    /// Left-to-right gradient.
    ///
    /// Column `j` is `left * r + right * (1 - r)` with `r = 1 - (j + 1) / width`,
    /// so the rightmost column is exactly `right`.
    pub fn horizontal_gradient(left: Color, right: Color, width: u32, height: u32) -> Self {
        let column: Vec<[u8; 4]> = (0..width)
            .map(|j| {
                let ratio = 1.0 - (j + 1) as f32 / width as f32;
                right.lerp(left, ratio).to_rgba8()
            })
            .collect();

        let mut pixels = Vec::with_capacity(width as usize * height as usize * BYTES_PER_PIXEL);
        for _ in 0..height {
            for px in &column {
                pixels.extend_from_slice(px);
            }
        }

        Self { width, height, pixels }
    }

    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    #[inline]
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Raw RGBA8 pixels, bottom row first.
    #[inline]
    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// Pixel at column `x`, row `y` counted from the bottom.
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let i = (y as usize * self.width as usize + x as usize) * BYTES_PER_PIXEL;
        let mut px = [0u8; 4];
        px.copy_from_slice(&self.pixels[i..i + BYTES_PER_PIXEL]);
        Some(px)
    }

    /// Returns a copy with the row order reversed.
    pub fn flipped_vertically(&self) -> Self {
        let row_len = self.width as usize * BYTES_PER_PIXEL;
        let mut pixels = Vec::with_capacity(self.pixels.len());
        if row_len > 0 {
            for row in self.pixels.chunks_exact(row_len).rev() {
                pixels.extend_from_slice(row);
            }
        }
        Self { width: self.width, height: self.height, pixels }
    }
}
