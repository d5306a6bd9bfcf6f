use image::RgbImage;
use tracing::{Level, span, trace};

/// Stretch each channel independently so its darkest value maps to 0
/// and its brightest to 255. Flat channels are left untouched.
pub fn contrast_stretch(img: &RgbImage) -> RgbImage {
    let span = span!(Level::DEBUG, "contrast_stretch");
    let _guard = span.enter();

    let mut out = img.clone();
    for chan in 0..3 {
        let (min, max) = img.pixels().fold((u8::MAX, u8::MIN), |(min, max), p| {
            (min.min(p[chan]), max.max(p[chan]))
        });
        trace!("Channel {chan}: {min}..={max}");

        if min >= max {
            continue;
        }

        let lut = stretch_lut(min, max);
        for p in out.pixels_mut() {
            p[chan] = lut[p[chan] as usize];
        }
    }

    out
}

fn stretch_lut(min: u8, max: u8) -> [u8; 256] {
    let range = (max - min) as f32;
    let mut lut = [0u8; 256];
    for (v, out) in lut.iter_mut().enumerate() {
        *out = match v as u8 {
            v if v < min => 0,
            v if v > max => 255,
            v => ((v - min) as f32 / range * 255.) as u8,
        };
    }

    lut
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgb;

    #[test]
    fn test_stretch_lut() {
        let lut = stretch_lut(50, 150);
        assert_eq!(lut[0], 0);
        assert_eq!(lut[50], 0);
        assert_eq!(lut[100], 127);
        assert_eq!(lut[150], 255);
        assert_eq!(lut[200], 255);
    }

    #[test]
    fn test_contrast_stretch() {
        let img = RgbImage::from_fn(2, 1, |x, _| {
            if x == 0 {
                Rgb([10, 40, 77])
            } else {
                Rgb([20, 240, 77])
            }
        });
        let out = contrast_stretch(&img);

        assert_eq!(out.get_pixel(0, 0), &Rgb([0, 0, 77]));
        assert_eq!(out.get_pixel(1, 0), &Rgb([255, 255, 77]));
    }

    #[test]
    fn test_empty_image() {
        let out = contrast_stretch(&RgbImage::new(0, 0));
        assert_eq!(out.dimensions(), (0, 0));
    }
}
