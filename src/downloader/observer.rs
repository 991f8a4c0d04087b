use async_trait::async_trait;
use bytes::Bytes;
use uuid::Uuid;

use super::error::DownloadError;
use super::models::Token;

// 下载任务的观察者。
// 任务只持有观察者的弱引用，不延长其生命周期；
// 观察者先于任务被释放时，剩余回调会被静默跳过。
#[async_trait]
pub trait DownloadObserver: Send + Sync + 'static {
    /// 每收到一块响应数据后调用。
    /// received 在同一任务的连续调用之间单调不减；expected 未知时为 None
    async fn on_progress(&self, task_id: Uuid, received: u64, expected: Option<u64>);

    /// 传输成功，body 为完整响应体，token 为创建任务时传入的关联令牌
    async fn on_success(&self, task_id: Uuid, body: Bytes, token: &Token, low_priority: bool);

    /// 传输失败。已取消的任务不会触发本回调
    async fn on_failure(&self, task_id: Uuid, error: &DownloadError, token: &Token);
}
