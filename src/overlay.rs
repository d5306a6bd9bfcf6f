use crate::landmarks::{LandmarkSet, MOUTH_LEFT, MOUTH_RIGHT, Region};
use image::{Rgb, RgbImage};
use imageproc::drawing;

const CORNER_COLOR: Rgb<u8> = Rgb([255, 255, 0]);
const CORNER_RADIUS: i32 = 8;

fn color(region: Region) -> Rgb<u8> {
    match region {
        Region::LeftEye | Region::RightEye => Rgb([0, 255, 0]),
        Region::Nose => Rgb([0, 0, 255]),
        Region::Mouth => Rgb([255, 0, 0]),
        Region::LeftEyebrow | Region::RightEyebrow => Rgb([0, 255, 255]),
    }
}

fn radius(region: Region) -> i32 {
    match region {
        Region::Mouth => 4,
        _ => 2,
    }
}

/// Dot every landmark and ring the mouth corners.
pub fn draw_landmarks(img: &mut RgbImage, landmarks: &LandmarkSet) {
    for region in Region::ALL {
        for p in landmarks.region(region).iter() {
            drawing::draw_filled_circle_mut(img, p.pixel(), radius(region), color(region));
        }
    }

    if landmarks.mouth.len() > MOUTH_RIGHT {
        for idx in [MOUTH_LEFT, MOUTH_RIGHT] {
            if let Some(corner) = landmarks.mouth.get(idx) {
                drawing::draw_hollow_circle_mut(img, corner.pixel(), CORNER_RADIUS, CORNER_COLOR);
            }
        }
    }
}
