use thiserror::Error;

use crate::auth::AuthError;

#[derive(Debug, Error)]
pub enum DownloadError {
    #[error("网络请求失败: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("传输失败: {0}")]
    TransportFailed(String),

    #[error("认证配置错误: {0}")]
    Auth(#[from] AuthError),

    #[error("认证质询失败: 状态码 {status}")]
    ChallengeFailed { status: u16 },

    #[error("无效的URL: {0}")]
    InvalidUrl(String),

    #[error("无效的请求头: {0}")]
    InvalidHeader(String),
}

pub type Result<T> = std::result::Result<T, DownloadError>;
