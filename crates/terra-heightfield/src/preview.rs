//! Grayscale preview images for heightmaps and multiplier grids.

use crate::heightmap::HeightMap;

/// A 2D preview image stored as row-major RGBA pixels.
#[derive(Clone, Debug)]
pub struct PreviewImage {
    /// Image width in pixels.
    pub width: u32,
    /// Image height in pixels.
    pub height: u32,
    /// Pixel data in row-major RGBA format. Length = `width * height * 4`.
    pub pixels: Vec<u8>,
}

impl PreviewImage {
    /// Create a new black (all-zero) image with the given dimensions.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            pixels: vec![0; (width * height * 4) as usize],
        }
    }

    /// Render a heightmap as grayscale, mapping its exact bounds onto
    /// `[black, white]`. A constant map renders mid-gray.
    pub fn from_height_map(map: &HeightMap) -> Self {
        let mut image = Self::new(map.width() as u32, map.height() as u32);
        let span = map.max_value() - map.min_value();
        for y in 0..map.height() {
            for x in 0..map.width() {
                let t = if span == 0.0 {
                    0.5
                } else {
                    (map.get(x, y) - map.min_value()) / span
                };
                let level = (t * 255.0).round() as u8;
                image.set_pixel(x as u32, y as u32, level, level, level, 255);
            }
        }
        image
    }

    /// Render a square `[0, 1]` multiplier grid (e.g. a falloff map) as
    /// grayscale, clamping out-of-range values.
    pub fn from_unit_grid(dimension: usize, values: &[f64]) -> Self {
        debug_assert_eq!(values.len(), dimension * dimension);
        let mut image = Self::new(dimension as u32, dimension as u32);
        for row in 0..dimension {
            for col in 0..dimension {
                let t = values[row * dimension + col].clamp(0.0, 1.0);
                let level = (t * 255.0).round() as u8;
                image.set_pixel(col as u32, row as u32, level, level, level, 255);
            }
        }
        image
    }

    /// Set a single pixel's RGBA value.
    ///
    /// # Panics
    ///
    /// Panics if `x >= width` or `y >= height`.
    pub fn set_pixel(&mut self, x: u32, y: u32, r: u8, g: u8, b: u8, a: u8) {
        let idx = ((y * self.width + x) * 4) as usize;
        self.pixels[idx] = r;
        self.pixels[idx + 1] = g;
        self.pixels[idx + 2] = b;
        self.pixels[idx + 3] = a;
    }

    /// Get a pixel's RGBA value.
    ///
    /// # Panics
    ///
    /// Panics if `x >= width` or `y >= height`.
    pub fn get_pixel(&self, x: u32, y: u32) -> (u8, u8, u8, u8) {
        let idx = ((y * self.width + x) * 4) as usize;
        (
            self.pixels[idx],
            self.pixels[idx + 1],
            self.pixels[idx + 2],
            self.pixels[idx + 3],
        )
    }
}
