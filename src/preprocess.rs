use image::error::{ParameterError, ParameterErrorKind};
use image::{ImageError, RgbImage};
use ndarray::Array4;

/// Side length of the square image the model expects.
pub const INPUT_SIZE: u32 = 128;

/// Decodes an image of any supported format into 8-bit RGB.
///
/// Grayscale inputs (most chest X-rays) get their single channel replicated.
pub fn decode_rgb(bytes: &[u8]) -> Result<RgbImage, ImageError> {
    let image = image::load_from_memory(bytes)?.to_rgb8();
    if image.width() == 0 || image.height() == 0 {
        return Err(ImageError::Parameter(ParameterError::from_kind(
            ParameterErrorKind::DimensionMismatch,
        )));
    }
    Ok(image)
}

/// Source neighbours and blend weight for one output row or column.
#[derive(Debug, Clone, Copy, PartialEq)]
struct Tap {
    lower: u32,
    upper: u32,
    lerp: f32,
}

/// Bilinear taps with half-pixel centers and no antialiasing, the way
/// `tf.image.resize` samples: output `i` reads source `(i + 0.5) * scale - 0.5`.
fn taps(in_size: u32, out_size: u32) -> Vec<Tap> {
    let scale = in_size as f32 / out_size as f32;
    (0..out_size)
        .map(|i| {
            let pos = (i as f32 + 0.5) * scale - 0.5;
            let floor = pos.floor();
            Tap {
                lower: floor.max(0.0) as u32,
                upper: (pos.ceil().max(0.0) as u32).min(in_size - 1),
                lerp: pos - floor,
            }
        })
        .collect()
}

/// Stretches the image to `INPUT_SIZE` square and lays it out as a
/// `[1, H, W, 3]` batch of raw `0..=255` values.
///
/// `image` must be non-empty; [`decode_rgb`] guarantees that.
pub fn to_input_tensor(image: &RgbImage) -> Array4<f32> {
    let xs = taps(image.width(), INPUT_SIZE);
    let ys = taps(image.height(), INPUT_SIZE);
    let side = INPUT_SIZE as usize;
    let value = |x: u32, y: u32, c: usize| image.get_pixel(x, y)[c] as f32;

    Array4::from_shape_fn((1, side, side, 3), |(_, y, x, c)| {
        let (tx, ty) = (xs[x], ys[y]);
        let top_left = value(tx.lower, ty.lower, c);
        let top_right = value(tx.upper, ty.lower, c);
        let bottom_left = value(tx.lower, ty.upper, c);
        let bottom_right = value(tx.upper, ty.upper, c);

        let top = top_left + (top_right - top_left) * tx.lerp;
        let bottom = bottom_left + (bottom_right - bottom_left) * tx.lerp;
        top + (bottom - top) * ty.lerp
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{DynamicImage, GrayImage, ImageBuffer, ImageOutputFormat, Luma, Rgb};
    use std::io::Cursor;

    fn encode_png(image: DynamicImage) -> Vec<u8> {
        let mut bytes = Vec::new();
        image
            .write_to(&mut Cursor::new(&mut bytes), ImageOutputFormat::Png)
            .unwrap();
        bytes
    }

    fn assert_close(actual: f32, expected: f32) {
        assert!(
            (actual - expected).abs() <= 1.0,
            "expected {} got {}",
            expected,
            actual
        );
    }

    #[test]
    fn test_tensor_shape_is_nhwc() {
        let img: RgbImage = ImageBuffer::from_pixel(300, 200, Rgb([10, 20, 30]));
        let tensor = to_input_tensor(&img);
        assert_eq!(tensor.shape(), &[1, 128, 128, 3]);
    }

    #[test]
    fn test_values_are_not_normalized() {
        let img: RgbImage = ImageBuffer::from_pixel(64, 64, Rgb([255, 128, 0]));
        let tensor = to_input_tensor(&img);

        assert_close(tensor[[0, 0, 0, 0]], 255.0);
        assert_close(tensor[[0, 64, 64, 1]], 128.0);
        assert_eq!(tensor[[0, 127, 127, 2]], 0.0);
    }

    #[test]
    fn test_resize_stretches_without_padding() {
        // A wide red image must fill the whole frame, corners included.
        let img: RgbImage = ImageBuffer::from_pixel(400, 100, Rgb([255, 0, 0]));
        let tensor = to_input_tensor(&img);

        for &(y, x) in &[(0, 0), (0, 127), (127, 0), (127, 127)] {
            assert_close(tensor[[0, y, x, 0]], 255.0);
            assert_eq!(tensor[[0, y, x, 1]], 0.0);
        }
    }

    #[test]
    fn test_downscale_samples_without_averaging() {
        // Only columns 8i+3 and 8i+4 are white; a 1024 -> 128 bilinear
        // resize reads exactly between them, so no grey may leak in.
        let img: RgbImage = ImageBuffer::from_fn(1024, 1024, |x, _| {
            if matches!(x % 8, 3 | 4) {
                Rgb([255, 255, 255])
            } else {
                Rgb([0, 0, 0])
            }
        });
        let tensor = to_input_tensor(&img);

        assert_eq!(tensor[[0, 64, 64, 0]], 255.0);
        assert_eq!(tensor[[0, 0, 0, 1]], 255.0);
        assert_eq!(tensor[[0, 127, 127, 2]], 255.0);
    }

    #[test]
    fn test_taps_use_half_pixel_centers() {
        assert_eq!(
            taps(1024, 128)[64],
            Tap {
                lower: 515,
                upper: 516,
                lerp: 0.5
            }
        );

        // Upscaling clamps at the border instead of reading outside the image.
        let up = taps(64, 128);
        assert_eq!((up[0].lower, up[0].upper), (0, 0));
        assert_eq!((up[127].lower, up[127].upper), (63, 63));
        assert_eq!(up[1].lerp, 0.25);
    }

    #[test]
    fn test_grayscale_png_becomes_three_channels() {
        let gray: GrayImage = ImageBuffer::from_pixel(32, 32, Luma([77]));
        let bytes = encode_png(DynamicImage::ImageLuma8(gray));

        let rgb = decode_rgb(&bytes).unwrap();
        assert_eq!(rgb.dimensions(), (32, 32));
        assert_eq!(rgb.get_pixel(5, 5), &Rgb([77, 77, 77]));
    }

    #[test]
    fn test_garbage_is_rejected() {
        assert!(decode_rgb(b"\x89PNG but not really").is_err());
        assert!(decode_rgb(&[]).is_err());
    }
}
