//! 进程级下载事件总线。
//! 与观察者回调无关，供横切面的监听方（统计、埋点）订阅。

use std::sync::atomic::{AtomicUsize, Ordering};

use lazy_static::lazy_static;
use tokio::sync::broadcast;
use uuid::Uuid;

/// 进程级下载事件
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DownloadEvent {
    /// 任务开始传输
    Started { task_id: Uuid },
    /// 任务结束：成功、失败，或传输开始后被取消。
    /// 尚未启动就被取消的任务不会发出本事件
    Finished { task_id: Uuid },
}

lazy_static! {
    static ref EVENT_BUS: broadcast::Sender<DownloadEvent> = broadcast::channel(64).0;
    static ref MAX_CONCURRENT: AtomicUsize = AtomicUsize::new(0);
}

/// 订阅进程级下载事件
pub fn subscribe() -> broadcast::Receiver<DownloadEvent> {
    EVENT_BUS.subscribe()
}

/// 发布事件。没有订阅者时静默丢弃
pub(crate) fn publish(event: DownloadEvent) {
    let _ = EVENT_BUS.send(event);
}

/// 历史遗留的全局并发数设置。
/// 只保存传入值，不再有任何调度作用；并发与准入控制由调用方自行实现。
#[deprecated(note = "该设置已不再生效，任务级并发控制由调用方负责")]
pub fn set_max_concurrent_downloads(max: usize) {
    MAX_CONCURRENT.store(max, Ordering::Relaxed);
}
