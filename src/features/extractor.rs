// src/features/extractor.rs

use std::path::Path;
use image::io::{Limits, Reader as ImageReader};
use image::{DynamicImage, GenericImageView, ImageError};
use log::trace;

use crate::config::subsystems::{ColorMode, ExtractorConfig};
use crate::error::{Error, Result};
use crate::types::Descriptor;

/// Turns one image file into an intensity histogram descriptor.
#[derive(Debug, Clone)]
pub struct FeatureExtractor {
    config: ExtractorConfig,
}

impl FeatureExtractor {
    pub fn new(config: ExtractorConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &ExtractorConfig {
        &self.config
    }

    pub fn descriptor_len(&self) -> usize {
        self.config.descriptor_len()
    }

    /// Decodes `path` and describes it. Any open or decode failure comes
    /// back as `Error::Decode` carrying the path.
    pub fn extract(&self, path: &Path) -> Result<Descriptor> {
        let img = self.decode(path).map_err(|e| Error::decode(path, e))?;
        let descriptor = self.describe(&img);
        trace!("Extracted {}-dim descriptor from {:?}", descriptor.len(), path);
        Ok(descriptor)
    }

    /// Format is sniffed from the file content, the extension is only a
    /// fallback.
    fn decode(&self, path: &Path) -> std::result::Result<DynamicImage, ImageError> {
        let mut reader = ImageReader::open(path)?.with_guessed_format()?;
        reader.limits(self.decoder_limits());
        reader.decode()
    }

    /// Unlimited unless `max_decode_bytes` is configured.
    pub fn decoder_limits(&self) -> Limits {
        let mut limits = Limits::no_limits();
        limits.max_alloc = self.config.max_decode_bytes;
        limits
    }

    /// Descriptor for an already decoded image.
    pub fn describe(&self, img: &DynamicImage) -> Descriptor {
        let (width, height) = img.dimensions();
        let resample = self.config.resample;

        // Only shrink; small images keep their resolution.
        let thumb = if width > resample || height > resample {
            img.thumbnail(resample, resample)
        } else {
            img.clone()
        };

        let (thumb_w, thumb_h) = thumb.dimensions();
        let samples = match self.config.color_mode {
            ColorMode::Luma => thumb.to_luma8().into_raw(),
            ColorMode::Rgb => thumb.to_rgb8().into_raw(),
        };

        let mut values = histogram(&samples, self.config.bins);
        let pixels = (thumb_w as f64) * (thumb_h as f64);
        if pixels > 0.0 {
            for v in values.iter_mut() {
                *v = *v / pixels * 100.0;
            }
        }

        if self.config.include_size {
            values.push(width as f64);
            values.push(height as f64);
        }

        Descriptor::new(values)
    }
}

/// Counts 8-bit samples into `bins` equal-width bins spanning `[0, 256)`.
pub fn histogram(samples: &[u8], bins: usize) -> Vec<f64> {
    let mut counts = vec![0.0f64; bins];
    if bins == 0 {
        return counts;
    }
    for &sample in samples {
        let bin = (sample as usize * bins) / 256;
        counts[bin] += 1.0;
    }
    counts
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{GrayImage, Luma, Rgb, RgbImage};

    fn extractor(resample: u32, include_size: bool) -> FeatureExtractor {
        FeatureExtractor::new(ExtractorConfig {
            resample,
            include_size,
            ..ExtractorConfig::default()
        })
        .unwrap()
    }

    #[test]
    fn histogram_bins_cover_full_range() {
        let counts = histogram(&[0, 25, 26, 128, 255, 255], 10);
        assert_eq!(counts.len(), 10);
        assert_eq!(counts[0], 2.0);
        assert_eq!(counts[1], 1.0);
        assert_eq!(counts[5], 1.0);
        assert_eq!(counts[9], 2.0);
        assert_eq!(counts.iter().sum::<f64>(), 6.0);
    }

    #[test]
    fn solid_images_fill_one_bin_with_100() {
        let black = DynamicImage::ImageLuma8(GrayImage::from_pixel(10, 10, Luma([0])));
        let white = DynamicImage::ImageLuma8(GrayImage::from_pixel(10, 10, Luma([255])));
        let ex = extractor(32, false);

        let b = ex.describe(&black);
        let w = ex.describe(&white);
        assert_eq!(b.as_slice()[0], 100.0);
        assert_eq!(w.as_slice()[9], 100.0);
        assert_eq!(b.as_slice().iter().sum::<f64>(), 100.0);
        assert_eq!(w.as_slice().iter().sum::<f64>(), 100.0);
    }

    #[test]
    fn normalization_is_independent_of_resolution() {
        let small = DynamicImage::ImageLuma8(GrayImage::from_pixel(8, 8, Luma([200])));
        let large = DynamicImage::ImageLuma8(GrayImage::from_pixel(300, 300, Luma([200])));
        let ex = extractor(16, false);
        assert_eq!(ex.describe(&small), ex.describe(&large));
    }

    #[test]
    fn include_size_appends_original_dimensions() {
        let img = DynamicImage::ImageRgb8(RgbImage::from_pixel(640, 480, Rgb([10, 20, 30])));
        let ex = extractor(64, true);
        let d = ex.describe(&img);
        assert_eq!(d.len(), ex.descriptor_len());
        assert_eq!(&d.as_slice()[10..], &[640.0, 480.0]);
    }

    #[test]
    fn rgb_mode_counts_every_channel() {
        let img = DynamicImage::ImageRgb8(RgbImage::from_pixel(4, 4, Rgb([0, 128, 255])));
        let ex = FeatureExtractor::new(ExtractorConfig {
            resample: 16,
            color_mode: ColorMode::Rgb,
            ..ExtractorConfig::default()
        })
        .unwrap();
        let d = ex.describe(&img);
        assert_eq!(d.as_slice()[0], 100.0);
        assert_eq!(d.as_slice()[5], 100.0);
        assert_eq!(d.as_slice()[9], 100.0);
    }

    #[test]
    fn descriptor_length_is_stable_across_shapes() {
        let ex = extractor(32, true);
        let shapes = [(1, 1), (10, 300), (300, 10), (33, 32), (500, 500)];
        for (w, h) in shapes {
            let img = DynamicImage::ImageLuma8(GrayImage::from_pixel(w, h, Luma([90])));
            assert_eq!(ex.describe(&img).len(), ex.descriptor_len(), "{}x{}", w, h);
        }
    }

    #[test]
    fn rejects_out_of_range_resample() {
        assert!(matches!(
            FeatureExtractor::new(ExtractorConfig { resample: 8, ..ExtractorConfig::default() }),
            Err(Error::InvalidParameter(_))
        ));
    }

    #[test]
    fn format_is_detected_from_content() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("photo.jpg");
        GrayImage::from_pixel(10, 10, Luma([255]))
            .save_with_format(&path, image::ImageFormat::Png)
            .unwrap();

        let d = extractor(32, false).extract(&path).unwrap();
        assert_eq!(d.as_slice()[9], 100.0);
    }

    #[test]
    fn decoding_is_unlimited_by_default() {
        let ex = extractor(32, false);
        let limits = ex.decoder_limits();
        assert_eq!(limits.max_alloc, None);
        assert_eq!(limits.max_image_width, None);
        assert_eq!(limits.max_image_height, None);
    }

    #[test]
    fn configured_decode_limit_is_enforced() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("wide.png");
        GrayImage::from_pixel(64, 64, Luma([40])).save(&path).unwrap();

        assert!(extractor(32, false).extract(&path).is_ok());

        let limited = FeatureExtractor::new(ExtractorConfig {
            resample: 32,
            max_decode_bytes: Some(100),
            ..ExtractorConfig::default()
        })
        .unwrap();
        let err = limited.extract(&path).unwrap_err();
        assert!(err.is_recoverable());
    }

    #[test]
    fn missing_file_is_a_decode_error() {
        let ex = extractor(32, false);
        let err = ex.extract(Path::new("/definitely/not/here.png")).unwrap_err();
        assert!(err.is_recoverable());
    }
}
