use image::{DynamicImage, GenericImageView, RgbImage};

use crate::color::ColorKey;
use crate::errors::{PaletteError, Result};

/// A decoded image exposed to the scanner as a grid of color keys.
pub trait PixelSource: Send + Sync {
    fn width(&self) -> u32;
    fn height(&self) -> u32;

    /// Color at (x, y) with x in [0, width) and y in [0, height).
    /// Out-of-range coordinates are an error, not a panic.
    fn color_at(&self, x: u32, y: u32) -> Result<ColorKey>;
}

/// Pixel grid backed by an RGB8 buffer from the `image` crate. Alpha is
/// dropped during conversion, so keys carry exactly three channels.
#[derive(Debug)]
pub struct DecodedImage {
    pixels: RgbImage,
}

impl DecodedImage {
    pub fn new(image: DynamicImage) -> Self {
        Self {
            pixels: image.to_rgb8(),
        }
    }
}

impl PixelSource for DecodedImage {
    fn width(&self) -> u32 {
        self.pixels.width()
    }

    fn height(&self) -> u32 {
        self.pixels.height()
    }

    fn color_at(&self, x: u32, y: u32) -> Result<ColorKey> {
        if x >= self.pixels.width() || y >= self.pixels.height() {
            return Err(PaletteError::ScanTask {
                message: format!(
                    "pixel ({}, {}) outside {}x{} grid",
                    x,
                    y,
                    self.pixels.width(),
                    self.pixels.height()
                ),
            });
        }
        let pixel = self.pixels.get_pixel(x, y);
        Ok(ColorKey::new(pixel[0], pixel[1], pixel[2]))
    }
}

/// Load an image from an http(s) URL or a local filesystem path and decode
/// it into a pixel grid.
pub async fn load(
    client: &reqwest::Client,
    reference: &str,
    max_megapixels: u64,
) -> Result<DecodedImage> {
    let bytes = if is_remote(reference) {
        fetch_bytes(client, reference).await?
    } else {
        std::fs::read(reference).map_err(|e| PaletteError::Fetch {
            url: reference.to_string(),
            message: e.to_string(),
        })?
    };
    decode(reference, &bytes, max_megapixels)
}

fn is_remote(reference: &str) -> bool {
    reference.starts_with("http://") || reference.starts_with("https://")
}

async fn fetch_bytes(client: &reqwest::Client, url: &str) -> Result<Vec<u8>> {
    log::debug!("Downloading {}", url);

    let response = client
        .get(url)
        .send()
        .await
        .map_err(|e| PaletteError::Fetch {
            url: url.to_string(),
            message: e.to_string(),
        })?;

    if !response.status().is_success() {
        return Err(PaletteError::Fetch {
            url: url.to_string(),
            message: format!("HTTP status {}", response.status()),
        });
    }

    let bytes = response.bytes().await.map_err(|e| PaletteError::Fetch {
        url: url.to_string(),
        message: e.to_string(),
    })?;
    Ok(bytes.to_vec())
}

fn decode(reference: &str, bytes: &[u8], max_megapixels: u64) -> Result<DecodedImage> {
    let image = image::load_from_memory(bytes).map_err(|e| PaletteError::Decode {
        url: reference.to_string(),
        message: e.to_string(),
    })?;

    // Check image dimensions to prevent decoding absurdly large grids
    let (width, height) = image.dimensions();
    let megapixels = (width as u64 * height as u64) / 1_000_000;
    if megapixels > max_megapixels {
        return Err(PaletteError::Decode {
            url: reference.to_string(),
            message: format!("Image too large: {}MP (max {}MP)", megapixels, max_megapixels),
        });
    }

    Ok(DecodedImage::new(image))
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgb;

    fn two_by_two() -> DecodedImage {
        let mut img = RgbImage::new(2, 2);
        img.put_pixel(0, 0, Rgb([255, 0, 0]));
        img.put_pixel(1, 0, Rgb([0, 255, 0]));
        img.put_pixel(0, 1, Rgb([0, 0, 255]));
        img.put_pixel(1, 1, Rgb([10, 20, 30]));
        DecodedImage::new(DynamicImage::ImageRgb8(img))
    }

    #[test]
    fn test_color_at_reads_channels() {
        let source = two_by_two();
        assert_eq!(source.width(), 2);
        assert_eq!(source.height(), 2);
        assert_eq!(source.color_at(0, 0).unwrap(), ColorKey::new(255, 0, 0));
        assert_eq!(source.color_at(1, 1).unwrap(), ColorKey::new(10, 20, 30));
    }

    #[test]
    fn test_color_at_out_of_range_is_an_error() {
        let source = two_by_two();
        let err = source.color_at(2, 0).unwrap_err();
        assert!(matches!(err, PaletteError::ScanTask { .. }));
        assert!(source.color_at(0, 2).is_err());
    }

    #[test]
    fn test_alpha_is_dropped() {
        let rgba = image::RgbaImage::from_pixel(1, 1, image::Rgba([9, 8, 7, 0]));
        let source = DecodedImage::new(DynamicImage::ImageRgba8(rgba));
        assert_eq!(source.color_at(0, 0).unwrap(), ColorKey::new(9, 8, 7));
    }

    #[test]
    fn test_decode_rejects_invalid_bytes() {
        let err = decode("garbage.bin", b"not an image", 100).unwrap_err();
        assert!(matches!(err, PaletteError::Decode { .. }));
    }

    #[test]
    fn test_decode_rejects_oversized_images() {
        let img = RgbImage::new(2_000, 1_000); // 2MP
        let mut bytes = Vec::new();
        DynamicImage::ImageRgb8(img)
            .write_to(&mut std::io::Cursor::new(&mut bytes), image::ImageFormat::Png)
            .unwrap();

        let err = decode("big.png", &bytes, 1).unwrap_err();
        assert!(matches!(err, PaletteError::Decode { .. }));
        assert!(decode("big.png", &bytes, 100).is_ok());
    }

    #[tokio::test]
    async fn test_load_reads_local_paths() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("solid.png");
        RgbImage::from_pixel(3, 3, Rgb([1, 2, 3])).save(&path).unwrap();

        let client = reqwest::Client::new();
        let source = load(&client, path.to_str().unwrap(), 100).await.unwrap();
        assert_eq!(source.width(), 3);
        assert_eq!(source.color_at(2, 2).unwrap(), ColorKey::new(1, 2, 3));
    }

    #[tokio::test]
    async fn test_load_missing_path_is_a_fetch_error() {
        let client = reqwest::Client::new();
        let err = load(&client, "/no/such/file.png", 100).await.unwrap_err();
        assert!(matches!(err, PaletteError::Fetch { .. }));
    }
}
