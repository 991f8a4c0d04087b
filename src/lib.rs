//! 异步图片下载库：
//! 单个下载任务的生命周期管理（启动、进度、取消），
//! 以及下载完成后保持焦点的裁剪缩放。

pub mod auth;
pub mod downloader;
pub mod imaging;

pub use downloader::{
    DownloadError, DownloadEvent, DownloadObserver, DownloadRequest, DownloadTask, Priority,
    TaskState, Token,
};
pub use imaging::{focused_crop, focused_crop_rect, CropRect, ImagingError};
