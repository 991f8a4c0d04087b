//! 焦点裁剪在真实图像缓冲上的端到端测试

use image::{DynamicImage, Rgba, RgbaImage};
use pic_downloader::imaging::{CropRect, ImagingError, focused_crop, focused_crop_rect};

const RED: Rgba<u8> = Rgba([255, 0, 0, 255]);
const BLUE: Rgba<u8> = Rgba([0, 0, 255, 255]);

fn blank(width: u32, height: u32) -> DynamicImage {
    DynamicImage::ImageRgba8(RgbaImage::new(width, height))
}

/// 左半红右半蓝的测试图
fn half_and_half(width: u32, height: u32) -> DynamicImage {
    let image = RgbaImage::from_fn(width, height, |x, _y| {
        if x < width / 2 { RED } else { BLUE }
    });
    DynamicImage::ImageRgba8(image)
}

#[test]
fn test_output_is_exactly_target_size() {
    let image = blank(800, 600);
    for target in [(400, 400), (100, 300), (799, 599), (1600, 1200)] {
        for focus in [(0.0, 0.0), (0.5, 0.5), (1.0, 1.0), (-1.0, 7.0)] {
            let out = focused_crop(&image, target, focus).unwrap();
            assert_eq!((out.width(), out.height()), target);
        }
    }
}

#[test]
fn test_example_rect_landscape_to_square() {
    // 800×600 -> 400×400，居中焦点：宽度是受限维度
    let rect = focused_crop_rect((800, 600), (400, 400), (0.5, 0.5)).unwrap();
    assert_eq!(
        rect,
        CropRect {
            x: 100,
            y: 0,
            width: 600,
            height: 600
        }
    );

    let out = focused_crop(&blank(800, 600), (400, 400), (0.5, 0.5)).unwrap();
    assert_eq!((out.width(), out.height()), (400, 400));
}

#[test]
fn test_focus_selects_expected_region() {
    // 200×100 的图左半红右半蓝，目标 100×100：
    // 焦点在最左 → 裁出红色区域；焦点在最右 → 裁出蓝色区域
    let image = half_and_half(200, 100);

    let left = focused_crop(&image, (100, 100), (0.0, 0.5)).unwrap();
    assert_eq!(left.to_rgba8().get_pixel(50, 50), &RED);

    let right = focused_crop(&image, (100, 100), (1.0, 0.5)).unwrap();
    assert_eq!(right.to_rgba8().get_pixel(50, 50), &BLUE);
}

#[test]
fn test_clamped_focus_matches_nearest_valid_focus() {
    let image = half_and_half(200, 100);
    let clamped = focused_crop(&image, (100, 100), (-3.0, 0.5)).unwrap();
    let reference = focused_crop(&image, (100, 100), (0.0, 0.5)).unwrap();
    assert_eq!(clamped.to_rgba8().as_raw(), reference.to_rgba8().as_raw());
}

#[test]
fn test_zero_target_dimension_is_rejected() {
    let image = blank(800, 600);
    let err = focused_crop(&image, (0, 400), (0.5, 0.5)).unwrap_err();
    assert!(matches!(err, ImagingError::InvalidDimensions { .. }));
    let err = focused_crop(&image, (400, 0), (0.5, 0.5)).unwrap_err();
    assert!(matches!(err, ImagingError::InvalidDimensions { .. }));
}
