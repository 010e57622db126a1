use std::path::Path;

use image::codecs::pnm::{PnmEncoder, PnmSubtype, SampleEncoding};
use image::{ExtendedColorType, ImageEncoder, ImageFormat, ImageReader, Rgb, RgbImage};

use crate::error::AssetError;

/// An RGB8 texture backed by PPM files.
#[derive(Debug, Clone, PartialEq)]
pub struct Texture {
    image: RgbImage,
}

impl Texture {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            image: RgbImage::new(width, height),
        }
    }

    /// Loads any PNM pixmap (ASCII P3 or binary P6).
    pub fn load_ppm(path: impl AsRef<Path>) -> Result<Self, AssetError> {
        let path = path.as_ref();
        let mut reader = ImageReader::open(path).map_err(|source| AssetError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        reader.set_format(ImageFormat::Pnm);
        let image = reader.decode()?.to_rgb8();

        log::debug!(
            "Loaded texture {} ({}x{})",
            path.display(),
            image.width(),
            image.height()
        );

        Ok(Self { image })
    }

    pub fn from_ppm_bytes(bytes: &[u8]) -> Result<Self, AssetError> {
        let image = image::load_from_memory_with_format(bytes, ImageFormat::Pnm)?.to_rgb8();
        Ok(Self { image })
    }

    /// Writes the texture as an ASCII (P3) PPM with a maximum value of 255.
    pub fn save_ppm(&self, path: impl AsRef<Path>) -> Result<(), AssetError> {
        let path = path.as_ref();
        let bytes = self.to_ppm_bytes()?;
        std::fs::write(path, bytes).map_err(|source| AssetError::Io {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn to_ppm_bytes(&self) -> Result<Vec<u8>, AssetError> {
        let mut bytes = Vec::new();
        PnmEncoder::new(&mut bytes)
            .with_subtype(PnmSubtype::Pixmap(SampleEncoding::Ascii))
            .write_image(
                self.image.as_raw(),
                self.image.width(),
                self.image.height(),
                ExtendedColorType::Rgb8,
            )?;
        Ok(bytes)
    }

    pub fn set_pixel(&mut self, x: u32, y: u32, rgb: [u8; 3]) -> Result<(), AssetError> {
        if x >= self.width() || y >= self.height() {
            return Err(AssetError::PixelOutOfBounds {
                x,
                y,
                width: self.width(),
                height: self.height(),
            });
        }

        self.image.put_pixel(x, y, Rgb(rgb));
        Ok(())
    }

    /// Writes a pixel if it lies inside the texture; other positions are
    /// clipped.
    pub fn put_pixel_clipped(&mut self, x: u32, y: u32, rgb: [u8; 3]) {
        if let Some(pixel) = self.image.get_pixel_mut_checked(x, y) {
            *pixel = Rgb(rgb);
        }
    }

    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 3]> {
        self.image.get_pixel_checked(x, y).map(|pixel| pixel.0)
    }

    pub fn fill(&mut self, rgb: [u8; 3]) {
        for pixel in self.image.pixels_mut() {
            *pixel = Rgb(rgb);
        }
    }

    /// Halves every channel, rounding down.
    pub fn darken(&mut self) {
        for channel in self.image.iter_mut() {
            *channel /= 2;
        }
    }

    /// Doubles every channel, saturating at 255.
    pub fn lighten(&mut self) {
        for channel in self.image.iter_mut() {
            *channel = channel.saturating_mul(2);
        }
    }

    /// Mean color over all pixels, or black for an empty texture.
    pub fn average_color(&self) -> [u8; 3] {
        let count = u64::from(self.width()) * u64::from(self.height());
        if count == 0 {
            return [0, 0, 0];
        }

        let mut sums = [0u64; 3];
        for pixel in self.image.pixels() {
            for (sum, channel) in sums.iter_mut().zip(pixel.0) {
                *sum += u64::from(channel);
            }
        }

        sums.map(|sum| (sum / count) as u8)
    }

    pub fn width(&self) -> u32 {
        self.image.width()
    }

    pub fn height(&self) -> u32 {
        self.image.height()
    }
}
