use std::any::Any;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use url::Url;

use crate::auth::AuthMode;

/// 下载优先级
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Priority {
    #[default]
    Normal,
    Low,
}

impl Priority {
    pub fn is_low(&self) -> bool {
        matches!(self, Priority::Low)
    }
}

/// 调用方传入的关联令牌。
/// 原样出现在回调里，用于把结果和发起方对应起来，本库不做任何解释。
#[derive(Clone)]
pub struct Token(Arc<dyn Any + Send + Sync>);

impl Token {
    pub fn new<T: Any + Send + Sync>(value: T) -> Self {
        Self(Arc::new(value))
    }

    pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
        self.0.downcast_ref()
    }
}

impl fmt::Debug for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Token(..)")
    }
}

/// 单次下载请求，任务启动后不再变化
#[derive(Debug, Clone)]
pub struct DownloadRequest {
    pub url: Url,
    pub extra_headers: HashMap<String, String>,
    pub priority: Priority,
    pub auth: AuthMode,
    pub token: Token,
}

impl DownloadRequest {
    pub fn new(url: Url, token: Token) -> Self {
        Self {
            url,
            extra_headers: HashMap::new(),
            priority: Priority::Normal,
            auth: AuthMode::None,
            token,
        }
    }
}

/// 任务生命周期状态。
/// Succeeded / Failed / Cancelled 是终态，进入后不再迁移。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskState {
    Idle,
    Connecting,
    Transferring,
    Succeeded,
    Failed,
    Cancelled,
}

impl TaskState {
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            TaskState::Succeeded | TaskState::Failed | TaskState::Cancelled
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_token_roundtrip() {
        let token = Token::new(42u32);
        assert_eq!(token.downcast_ref::<u32>(), Some(&42));
        assert!(token.downcast_ref::<String>().is_none());
    }

    #[test]
    fn test_terminal_states() {
        assert!(!TaskState::Idle.is_terminal());
        assert!(!TaskState::Connecting.is_terminal());
        assert!(!TaskState::Transferring.is_terminal());
        assert!(TaskState::Succeeded.is_terminal());
        assert!(TaskState::Failed.is_terminal());
        assert!(TaskState::Cancelled.is_terminal());
    }
}
