//! 保持焦点的裁剪缩放：
//! 纯几何计算在 calculations，像素操作在 operations。

pub mod calculations;
pub mod operations;

pub use calculations::{CropRect, focused_crop_rect};
pub use operations::focused_crop;

use thiserror::Error;

#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum ImagingError {
    #[error("图像尺寸非法: 源 {source_size:?}, 目标 {target_size:?}")]
    InvalidDimensions {
        source_size: (u32, u32),
        target_size: (u32, u32),
    },
}
