//! 在真实图像缓冲上执行焦点裁剪

use image::DynamicImage;
use image::imageops::FilterType;

use super::ImagingError;
use super::calculations::focused_crop_rect;

/// 以焦点为基准做 cover 裁剪，再缩放到目标尺寸。
/// 输出图像的尺寸严格等于 target；无副作用，可并发调用。
pub fn focused_crop(
    image: &DynamicImage,
    target: (u32, u32),
    focus: (f64, f64),
) -> Result<DynamicImage, ImagingError> {
    let rect = focused_crop_rect((image.width(), image.height()), target, focus)?;
    let cropped = image.crop_imm(rect.x, rect.y, rect.width, rect.height);
    Ok(cropped.resize_exact(target.0, target.1, FilterType::Lanczos3))
}
