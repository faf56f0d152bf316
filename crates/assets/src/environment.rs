use crate::{AssetError, AssetId};
use image::ImageFormat;
use std::path::Path;

/// Whether pixel values may exceed 1.0 and need tone mapping for display.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DynamicRange {
    Low,
    High,
}

/// A decoded equirectangular environment image in linear RGBA f32.
#[derive(Debug, Clone, PartialEq)]
pub struct EnvironmentMap {
    pub id: AssetId,
    pub width: u32,
    pub height: u32,
    pub range: DynamicRange,
    /// Row-major RGBA, four floats per pixel, linear light.
    pub pixels: Vec<f32>,
}

fn range_of(format: ImageFormat) -> Result<DynamicRange, AssetError> {
    match format {
        ImageFormat::Hdr | ImageFormat::OpenExr => Ok(DynamicRange::High),
        ImageFormat::Png | ImageFormat::Jpeg => Ok(DynamicRange::Low),
        other => Err(AssetError::UnsupportedFormat(format!("{other:?}"))),
    }
}

fn srgb_to_linear(c: f32) -> f32 {
    if c <= 0.04045 {
        c / 12.92
    } else {
        ((c + 0.055) / 1.055).powf(2.4)
    }
}

fn linear_to_srgb(c: f32) -> f32 {
    if c <= 0.003_130_8 {
        c * 12.92
    } else {
        1.055 * c.powf(1.0 / 2.4) - 0.055
    }
}

impl EnvironmentMap {
    /// Decode an image file; the format is taken from the extension.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, AssetError> {
        let path = path.as_ref();
        let format = ImageFormat::from_path(path)
            .map_err(|_| AssetError::UnsupportedFormat(path.display().to_string()))?;
        let bytes = std::fs::read(path)?;
        Self::decode(&bytes, format)
    }

    pub fn decode(bytes: &[u8], format: ImageFormat) -> Result<Self, AssetError> {
        let range = range_of(format)?;
        let image = image::load_from_memory_with_format(bytes, format)?;
        let (width, height) = (image.width(), image.height());
        let mut pixels = image.to_rgba32f().into_raw();
        if range == DynamicRange::Low {
            for px in pixels.chunks_exact_mut(4) {
                for c in &mut px[..3] {
                    *c = srgb_to_linear(*c);
                }
            }
        }
        tracing::debug!(width, height, ?format, "decoded environment image");
        Ok(Self {
            id: AssetId::of_bytes(bytes),
            width,
            height,
            range,
            pixels,
        })
    }

    pub fn pixel_count(&self) -> usize {
        self.pixels.len() / 4
    }

    /// Mean linear luminance, for diagnostics.
    pub fn mean_luminance(&self) -> f32 {
        if self.pixels.is_empty() {
            return 0.0;
        }
        let sum: f32 = self
            .pixels
            .chunks_exact(4)
            .map(|p| 0.2126 * p[0] + 0.7152 * p[1] + 0.0722 * p[2])
            .sum();
        sum / self.pixel_count() as f32
    }

    /// sRGB-encoded RGBA8 for upload. High dynamic range input is scaled by
    /// `exposure` and Reinhard tone mapped first.
    pub fn to_rgba8(&self, exposure: f32) -> Vec<u8> {
        let map = |c: f32| -> u8 {
            let c = match self.range {
                DynamicRange::High => {
                    let e = (c * exposure).max(0.0);
                    e / (1.0 + e)
                }
                DynamicRange::Low => c,
            };
            (linear_to_srgb(c.clamp(0.0, 1.0)) * 255.0).round() as u8
        };
        self.pixels
            .chunks_exact(4)
            .flat_map(|p| [map(p[0]), map(p[1]), map(p[2]), (p[3].clamp(0.0, 1.0) * 255.0).round() as u8])
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn write_png(dir: &Path, name: &str, color: [u8; 4]) -> std::path::PathBuf {
        let path = dir.join(name);
        image::RgbaImage::from_pixel(4, 2, image::Rgba(color))
            .save(&path)
            .unwrap();
        path
    }

    #[test]
    fn decodes_png_into_linear_floats() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_png(dir.path(), "sky.png", [255, 0, 0, 255]);
        let env = EnvironmentMap::load(&path).unwrap();
        assert_eq!((env.width, env.height), (4, 2));
        assert_eq!(env.pixel_count(), 8);
        assert_eq!(env.range, DynamicRange::Low);
        assert!((env.pixels[0] - 1.0).abs() < 1e-6);
        assert_eq!(env.pixels[1], 0.0);
    }

    #[test]
    fn ldr_round_trips_through_rgba8() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_png(dir.path(), "grey.png", [128, 64, 200, 255]);
        let env = EnvironmentMap::load(&path).unwrap();
        let bytes = env.to_rgba8(1.0);
        assert_eq!(&bytes[..4], &[128, 64, 200, 255]);
    }

    #[test]
    fn hdr_values_are_tone_mapped() {
        let env = EnvironmentMap {
            id: AssetId(0),
            width: 1,
            height: 1,
            range: DynamicRange::High,
            pixels: vec![100.0, 1.0, 0.0, 1.0],
        };
        let bytes = env.to_rgba8(1.0);
        assert!(bytes[0] > 250, "bright values approach white");
        assert!(bytes[1] > 150 && bytes[1] < 200, "1.0 maps to mid-grey");
        assert_eq!(bytes[2], 0);
        assert_eq!(bytes[3], 255);
    }

    #[test]
    fn unknown_extension_is_unsupported() {
        let err = EnvironmentMap::load("sky.unknownext").unwrap_err();
        assert!(matches!(err, AssetError::UnsupportedFormat(_)));
    }

    #[test]
    fn corrupt_bytes_fail_to_decode() {
        let err = EnvironmentMap::decode(b"not an image", ImageFormat::Png).unwrap_err();
        assert!(matches!(err, AssetError::Decode(_)));
    }

    #[test]
    fn same_bytes_same_id() {
        let dir = tempfile::tempdir().unwrap();
        let a = write_png(dir.path(), "a.png", [1, 2, 3, 255]);
        let b = write_png(dir.path(), "b.png", [1, 2, 3, 255]);
        let ea = EnvironmentMap::load(&a).unwrap();
        let eb = EnvironmentMap::load(&b).unwrap();
        assert_eq!(ea.id, eb.id);
    }

    #[test]
    fn mean_luminance_of_white_is_one() {
        let env = EnvironmentMap {
            id: AssetId(0),
            width: 2,
            height: 1,
            range: DynamicRange::Low,
            pixels: vec![1.0; 8],
        };
        assert!((env.mean_luminance() - 1.0).abs() < 1e-6);
    }
}
