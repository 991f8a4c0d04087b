use std::collections::HashMap;
use std::sync::{Arc, Mutex, Weak};

use bytes::{Bytes, BytesMut};
use futures_util::StreamExt;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use tokio::sync::Notify;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};
use url::Url;
use uuid::Uuid;

use crate::auth::{self, AuthHeaders, AuthMode};

use super::error::{DownloadError, Result};
use super::models::{DownloadRequest, Priority, TaskState, Token};
use super::notify::{self, DownloadEvent};
use super::observer::DownloadObserver;
use super::transport::{HttpTransport, Transport, TransportResponse};

/// 单次下载的状态机。
///
/// 一个任务只管理一个在途请求；所有回调由唯一的驱动协程顺序派发，
/// 同一任务的回调之间不会并发。任务之间不共享可变状态，可以任意并行。
pub struct DownloadTask {
    task_id: Uuid,
    request: DownloadRequest,
    transport: Arc<dyn Transport>,
    observer: Weak<dyn DownloadObserver>,
    state: Mutex<TaskState>,
    cancel: CancellationToken,
    done: Notify,
}

impl DownloadTask {
    /// 创建任务，绑定请求、传输层与观察者。
    /// 观察者以弱引用持有，任务不延长它的生命周期。
    pub fn new(
        request: DownloadRequest,
        transport: Arc<dyn Transport>,
        observer: &Arc<dyn DownloadObserver>,
    ) -> Arc<Self> {
        Arc::new(Self {
            task_id: Uuid::new_v4(),
            request,
            transport,
            observer: Arc::downgrade(observer),
            state: Mutex::new(TaskState::Idle),
            cancel: CancellationToken::new(),
            done: Notify::new(),
        })
    }

    /// 使用默认 reqwest 传输层的便捷构造
    pub fn with_http_transport(
        request: DownloadRequest,
        observer: &Arc<dyn DownloadObserver>,
    ) -> Arc<Self> {
        Self::new(request, Arc::new(HttpTransport::new()), observer)
    }

    /// 便捷工厂：绑定 URL、附加请求头、观察者、关联令牌与优先级，
    /// 使用默认传输层，不带认证
    pub fn create(
        url: Url,
        extra_headers: Option<HashMap<String, String>>,
        observer: &Arc<dyn DownloadObserver>,
        token: Token,
        priority: Priority,
    ) -> Arc<Self> {
        let request = DownloadRequest {
            url,
            extra_headers: extra_headers.unwrap_or_default(),
            priority,
            auth: AuthMode::None,
            token,
        };
        Self::with_http_transport(request, observer)
    }

    pub fn task_id(&self) -> Uuid {
        self.task_id
    }

    pub fn request(&self) -> &DownloadRequest {
        &self.request
    }

    /// 当前生命周期状态
    pub fn state(&self) -> TaskState {
        *self.state.lock().unwrap()
    }

    /// 启动任务，立即返回，不等待网络。
    /// 只在 Idle 状态生效，重复调用为空操作。
    /// 认证配置错误在打开任何网络句柄之前同步返回，任务停留在 Idle。
    pub fn start(self: &Arc<Self>) -> Result<()> {
        let (headers, expect_challenge) = {
            let mut state = self.state.lock().unwrap();
            if *state != TaskState::Idle {
                warn!("任务 {} 已启动或已结束，忽略重复的 start", self.task_id);
                return Ok(());
            }
            // 选择认证策略并合并请求头，失败时不迁移状态
            let auth = auth::resolve(&self.request.auth, "GET", &self.request.url)?;
            let headers = self.merged_headers(&auth)?;
            *state = TaskState::Connecting;
            (headers, auth.expect_challenge)
        };

        info!("🚀 开始下载任务: {} -> {}", self.task_id, self.request.url);
        notify::publish(DownloadEvent::Started {
            task_id: self.task_id,
        });

        let task = Arc::clone(self);
        tokio::spawn(async move {
            task.run(headers, expect_challenge).await;
        });
        Ok(())
    }

    /// 取消任务。任何状态下可调用，终态下为空操作。
    /// 同步标记 Cancelled，异步请求传输层收尾，不等待连接真正断开。
    /// 取消对观察者是静默的：之后不再有任何终态回调，
    /// 即使传输层的成功/失败信号已经在途。
    pub fn cancel(&self) {
        let prev = {
            let mut state = self.state.lock().unwrap();
            let prev = *state;
            if prev.is_terminal() {
                return;
            }
            *state = TaskState::Cancelled;
            prev
        };

        info!("任务 {} 已取消 (原状态: {:?})", self.task_id, prev);
        if prev != TaskState::Idle {
            // 释放传输句柄；已入队的回调由终态检查丢弃
            self.cancel.cancel();
            notify::publish(DownloadEvent::Finished {
                task_id: self.task_id,
            });
        }
        self.done.notify_waiters();
    }

    /// 等待任务到达终态
    pub async fn wait(&self) {
        loop {
            let notified = self.done.notified();
            if self.state().is_terminal() {
                return;
            }
            notified.await;
        }
    }

    /// 驱动协程：执行传输并派发终态回调。
    /// Ok(None) 表示中途取消，保持静默。
    async fn run(self: Arc<Self>, headers: HeaderMap, expect_challenge: bool) {
        match self.transfer(&headers, expect_challenge).await {
            Ok(None) => {}
            Ok(Some(body)) => {
                if !self.try_finish(TaskState::Succeeded) {
                    return;
                }
                debug!("任务 {} 下载完成, 共 {} 字节", self.task_id, body.len());
                if let Some(observer) = self.observer.upgrade() {
                    observer
                        .on_success(
                            self.task_id,
                            body,
                            &self.request.token,
                            self.request.priority.is_low(),
                        )
                        .await;
                }
                notify::publish(DownloadEvent::Finished {
                    task_id: self.task_id,
                });
            }
            Err(e) => {
                if !self.try_finish(TaskState::Failed) {
                    return;
                }
                warn!("任务 {} 下载失败: {}", self.task_id, e);
                if let Some(observer) = self.observer.upgrade() {
                    observer
                        .on_failure(self.task_id, &e, &self.request.token)
                        .await;
                }
                notify::publish(DownloadEvent::Finished {
                    task_id: self.task_id,
                });
            }
        }
    }

    /// 执行一次传输：打开句柄、处理质询、累积响应体并上报进度
    async fn transfer(
        &self,
        headers: &HeaderMap,
        expect_challenge: bool,
    ) -> Result<Option<Bytes>> {
        let mut response = tokio::select! {
            _ = self.cancel.cancelled() => return Ok(None),
            resp = self.transport.fetch(&self.request.url, headers) => resp?,
        };

        // 质询处理：HTTP 401 按认证模式分派
        if response.status == 401 {
            if !expect_challenge {
                return Err(DownloadError::ChallengeFailed {
                    status: response.status,
                });
            }
            let retry_headers = self.challenge_headers(headers)?;
            debug!("任务 {} 收到认证质询，使用凭据重试", self.task_id);
            response = tokio::select! {
                _ = self.cancel.cancelled() => return Ok(None),
                resp = self.transport.fetch(&self.request.url, &retry_headers) => resp?,
            };
            if response.status == 401 {
                // 凭据被拒绝
                return Err(DownloadError::ChallengeFailed {
                    status: response.status,
                });
            }
        }

        // 收到响应头，进入传输阶段
        if !self.try_transition(TaskState::Transferring) {
            return Ok(None);
        }

        let TransportResponse {
            expected_len,
            mut stream,
            ..
        } = response;
        // Content-Length 来自服务端，不可信，预分配封顶 1 MiB，超出部分按需增长
        const MAX_PREALLOC: u64 = 1024 * 1024;
        let mut buffer =
            BytesMut::with_capacity(expected_len.unwrap_or(8 * 1024).min(MAX_PREALLOC) as usize);

        loop {
            let chunk = tokio::select! {
                // 取消时丢弃缓冲区，不把部分数据交给观察者
                _ = self.cancel.cancelled() => return Ok(None),
                chunk = stream.next() => chunk,
            };
            let Some(chunk) = chunk else { break };
            buffer.extend_from_slice(&chunk?);

            if self.state() == TaskState::Cancelled {
                return Ok(None);
            }
            if let Some(observer) = self.observer.upgrade() {
                observer
                    .on_progress(self.task_id, buffer.len() as u64, expected_len)
                    .await;
            }
        }

        Ok(Some(buffer.freeze()))
    }

    /// 质询到达时的重试策略。只有 HTTP 自协商模式允许带凭据重试；
    /// 其余模式在启动时已附好凭据（或明确禁用认证），此时一律按失败处理
    fn challenge_headers(&self, base: &HeaderMap) -> Result<HeaderMap> {
        match &self.request.auth {
            AuthMode::Http { username, password } => {
                let mut headers = base.clone();
                let (name, value) = auth::basic_header(username, password)?;
                headers.insert(name, value);
                Ok(headers)
            }
            _ => Err(DownloadError::ChallengeFailed { status: 401 }),
        }
    }

    /// 合并调用方请求头与认证策略注入的请求头
    fn merged_headers(&self, auth: &AuthHeaders) -> Result<HeaderMap> {
        let mut headers = HeaderMap::new();
        for (name, value) in &self.request.extra_headers {
            let name = HeaderName::from_bytes(name.as_bytes())
                .map_err(|e| DownloadError::InvalidHeader(format!("{name}: {e}")))?;
            let value = HeaderValue::from_str(value)
                .map_err(|e| DownloadError::InvalidHeader(e.to_string()))?;
            headers.insert(name, value);
        }
        for (name, value) in &auth.headers {
            headers.insert(name.clone(), value.clone());
        }
        Ok(headers)
    }

    /// 非终态迁移，取消后到达的信号在这里被丢弃
    fn try_transition(&self, next: TaskState) -> bool {
        let mut state = self.state.lock().unwrap();
        if state.is_terminal() {
            return false;
        }
        *state = next;
        true
    }

    /// 终态迁移并唤醒 wait()。已是终态（包括 Cancelled）时返回 false，
    /// 调用方据此跳过全部观察者回调
    fn try_finish(&self, next: TaskState) -> bool {
        {
            let mut state = self.state.lock().unwrap();
            if state.is_terminal() {
                return false;
            }
            *state = next;
        }
        self.done.notify_waiters();
        true
    }
}
