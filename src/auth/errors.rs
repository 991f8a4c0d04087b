use thiserror::Error;

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("认证模式 {mode} 缺少必需的凭据字段: {field}")]
    MissingCredentials {
        mode: &'static str,
        field: &'static str,
    },

    #[error("凭据无法编码为请求头: {0}")]
    InvalidCredentials(String),
}

pub type Result<T> = std::result::Result<T, AuthError>;
