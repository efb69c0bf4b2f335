use std::path::Path;

use assert2::assert;
use image::RgbImage;

use crate::{
    geometry::ScreenSize,
    util::{BLACK, Rgb},
};

/// Rendered image, stored row by row with row 0 at the top.
///
/// Rows are in image order, so they run opposite to the camera's vertical axis:
/// row 0 holds the pixels seen through the top of the view, where the
/// camera-space `y` is largest. A plain `y = (2·row/height − 1)·h_max` mapping
/// would put row 0 at the bottom instead.
#[derive(Clone, Debug, PartialEq)]
pub struct FrameBuffer {
    size: ScreenSize,
    pixels: Vec<Rgb>,
}

impl FrameBuffer {
    /// Black image of the given size.
    pub fn new(size: ScreenSize) -> Self {
        FrameBuffer {
            size,
            pixels: vec![BLACK; size.x as usize * size.y as usize],
        }
    }

    pub fn size(&self) -> ScreenSize {
        self.size
    }

    pub fn width(&self) -> u32 {
        self.size.x
    }

    pub fn height(&self) -> u32 {
        self.size.y
    }

    pub fn pixel(&self, row: u32, column: u32) -> Rgb {
        self.pixels[self.index(row, column)]
    }

    pub fn set_pixel(&mut self, row: u32, column: u32, color: Rgb) {
        let index = self.index(row, column);
        self.pixels[index] = color;
    }

    pub fn pixels(&self) -> &[Rgb] {
        &self.pixels
    }

    /// Mutable rows of the image, top to bottom.
    pub fn rows_mut(&mut self) -> std::slice::ChunksMut<'_, Rgb> {
        self.pixels.chunks_mut(self.size.x.max(1) as usize)
    }

    pub fn to_image(&self) -> RgbImage {
        RgbImage::from_fn(self.width(), self.height(), |x, y| {
            color_to_image(self.pixel(y, x))
        })
    }

    /// Writes the image, format is chosen by the file extension.
    pub fn save(&self, path: impl AsRef<Path>) -> image::ImageResult<()> {
        self.to_image().save(path)
    }

    fn index(&self, row: u32, column: u32) -> usize {
        assert!(row < self.size.y && column < self.size.x);
        row as usize * self.size.x as usize + column as usize
    }
}

/// Maps a 0-1 rgb pixel to pixel type compatible with module image.
pub fn color_to_image(color: Rgb) -> image::Rgb<u8> {
    image::Rgb([
        (color.r * 255.0).round().clamp(0.0, 255.0) as u8,
        (color.g * 255.0).round().clamp(0.0, 255.0) as u8,
        (color.b * 255.0).round().clamp(0.0, 255.0) as u8,
    ])
}

#[cfg(test)]
mod test {
    use super::*;
    use assert2::assert;

    #[test]
    fn starts_black() {
        let frame = FrameBuffer::new(ScreenSize::new(3, 2));
        assert!(frame.width() == 3);
        assert!(frame.height() == 2);
        assert!(frame.pixels().len() == 6);
        assert!(frame.pixels().iter().all(|p| *p == BLACK));
    }

    #[test]
    fn rows_are_stored_top_down() {
        let mut frame = FrameBuffer::new(ScreenSize::new(3, 2));
        frame.set_pixel(1, 2, Rgb::new(1.0, 0.0, 0.0));
        assert!(frame.pixels()[5] == Rgb::new(1.0, 0.0, 0.0));

        for (row, pixels) in frame.rows_mut().enumerate() {
            assert!(pixels.len() == 3);
            pixels[0] = Rgb::new(0.0, row as f64, 0.0);
        }
        assert!(frame.pixel(0, 0) == BLACK);
        assert!(frame.pixel(1, 0) == Rgb::new(0.0, 1.0, 0.0));
    }

    #[test]
    #[should_panic]
    fn out_of_bounds() {
        FrameBuffer::new(ScreenSize::new(3, 2)).pixel(2, 0);
    }

    #[test]
    fn conversion_clamps() {
        assert!(color_to_image(Rgb::new(-0.5, 0.5, 2.0)) == image::Rgb([0, 128, 255]));
    }

    #[test]
    fn image_has_same_layout() {
        let mut frame = FrameBuffer::new(ScreenSize::new(4, 3));
        frame.set_pixel(2, 1, Rgb::new(1.0, 1.0, 1.0));
        let image = frame.to_image();
        assert!(image.dimensions() == (4, 3));
        assert!(*image.get_pixel(1, 2) == image::Rgb([255, 255, 255]));
        assert!(*image.get_pixel(2, 1) == image::Rgb([0, 0, 0]));
    }
}
