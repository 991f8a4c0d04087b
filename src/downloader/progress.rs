use std::sync::Mutex;

use async_trait::async_trait;
use bytes::Bytes;
use indicatif::{ProgressBar, ProgressStyle};
use uuid::Uuid;

use super::error::DownloadError;
use super::models::Token;
use super::observer::DownloadObserver;

/// 下载的最终结果，供命令行在任务结束后取走
pub enum DownloadOutcome {
    Success(Bytes),
    Failure(String),
}

/// 渲染进度条并收集下载结果的现成观察者
pub struct ProgressReporter {
    bar: ProgressBar,
    outcome: Mutex<Option<DownloadOutcome>>,
}

impl ProgressReporter {
    pub fn new() -> Self {
        let bar = ProgressBar::new(0);
        bar.set_style(
            ProgressStyle::default_bar()
                .template("{msg} [{elapsed_precise}] {wide_bar} {bytes}/{total_bytes} ({eta})")
                .unwrap(),
        );
        Self {
            bar,
            outcome: Mutex::new(None),
        }
    }

    /// 取走下载结果。任务尚未结束（或已被取消）时为 None
    pub fn take_outcome(&self) -> Option<DownloadOutcome> {
        self.outcome.lock().unwrap().take()
    }
}

impl Default for ProgressReporter {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl DownloadObserver for ProgressReporter {
    async fn on_progress(&self, _task_id: Uuid, received: u64, expected: Option<u64>) {
        if let Some(total) = expected {
            self.bar.set_length(total);
        }
        self.bar.set_position(received);
    }

    async fn on_success(&self, _task_id: Uuid, body: Bytes, _token: &Token, _low_priority: bool) {
        self.bar.finish_with_message("下载完成");
        *self.outcome.lock().unwrap() = Some(DownloadOutcome::Success(body));
    }

    async fn on_failure(&self, _task_id: Uuid, error: &DownloadError, _token: &Token) {
        self.bar.abandon_with_message("下载失败");
        *self.outcome.lock().unwrap() = Some(DownloadOutcome::Failure(error.to_string()));
    }
}
