use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;
use futures_util::StreamExt;
use futures_util::stream::BoxStream;
use reqwest::header::{ACCEPT, HeaderMap, USER_AGENT};
use reqwest::{Client, ClientBuilder};
use tracing::warn;
use url::Url;

use super::error::{DownloadError, Result};

/// 传输层的响应：状态码 + 预期长度 + 响应体字节流
pub struct TransportResponse {
    pub status: u16,
    pub expected_len: Option<u64>,
    pub stream: BoxStream<'static, Result<Bytes>>,
}

/// 注入给下载任务的网络传输层。
/// 每次 fetch 打开一个新的请求句柄；
/// 认证质询（HTTP 401）通过状态码上报，由任务按认证模式处理。
#[async_trait]
pub trait Transport: Send + Sync + 'static {
    async fn fetch(&self, url: &Url, headers: &HeaderMap) -> Result<TransportResponse>;
}

/// 基于 reqwest 的默认传输层
#[derive(Debug, Clone)]
pub struct HttpTransport {
    inner: Client,
}

impl HttpTransport {
    pub fn new() -> Self {
        let inner = match ClientBuilder::new()
            .timeout(Duration::from_secs(30))
            .default_headers(Self::default_headers())
            .build()
        {
            Ok(client) => client,
            Err(e) => {
                // 退回默认客户端会丢失超时与默认请求头配置
                warn!("HTTP 客户端构建失败，退回默认配置: {}", e);
                Client::new()
            }
        };
        Self { inner }
    }

    fn default_headers() -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(
            ACCEPT,
            reqwest::header::HeaderValue::from_static("image/avif,image/webp,image/apng,image/*,*/*;q=0.8"),
        );
        headers.insert(
            USER_AGENT,
            reqwest::header::HeaderValue::from_static("Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/135.0.0.0 Safari/537.36"),
        );
        headers
    }
}

impl Default for HttpTransport {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn fetch(&self, url: &Url, headers: &HeaderMap) -> Result<TransportResponse> {
        let resp = self
            .inner
            .get(url.clone())
            .headers(headers.clone())
            .send()
            .await?;

        let status = resp.status().as_u16();
        let expected_len = resp.content_length();
        let stream = resp
            .bytes_stream()
            .map(|chunk| chunk.map_err(DownloadError::from))
            .boxed();

        Ok(TransportResponse {
            status,
            expected_len,
            stream,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transport_constructs_with_configured_client() {
        // 构造不会 panic，Default 与 new 等价
        let _ = HttpTransport::new();
        let _ = HttpTransport::default();
    }
}
