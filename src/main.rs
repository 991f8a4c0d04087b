use std::collections::HashMap;
use std::sync::Arc;

use clap::Parser;
use colored::Colorize;
use tracing::{error, info};

use pic_downloader::auth::AuthMode;
use pic_downloader::downloader::progress::{DownloadOutcome, ProgressReporter};
use pic_downloader::downloader::{
    DownloadObserver, DownloadRequest, DownloadTask, Priority, Token,
};
use pic_downloader::imaging;

mod cli;

type Result<T> = std::result::Result<T, Box<dyn std::error::Error + Send + Sync>>;

/// 解析 key:value 形式的附加请求头
fn parse_headers(raw: &[String]) -> Result<HashMap<String, String>> {
    let mut headers = HashMap::new();
    for item in raw {
        let (key, value) = item
            .split_once(':')
            .ok_or_else(|| format!("请求头格式错误: {item}"))?;
        headers.insert(key.trim().to_string(), value.trim().to_string());
    }
    Ok(headers)
}

/// 解析 WxH 形式的尺寸
fn parse_size(raw: &str) -> Result<(u32, u32)> {
    let (w, h) = raw
        .split_once(['x', 'X'])
        .ok_or_else(|| format!("尺寸格式错误: {raw}"))?;
    Ok((w.trim().parse()?, h.trim().parse()?))
}

/// 解析 x,y 形式的焦点
fn parse_focus(raw: &str) -> Result<(f64, f64)> {
    let (x, y) = raw
        .split_once(',')
        .ok_or_else(|| format!("焦点格式错误: {raw}"))?;
    Ok((x.trim().parse()?, y.trim().parse()?))
}

/// 从命令行参数推导认证模式
fn create_auth_mode(args: &cli::Cli) -> AuthMode {
    if let Some(token) = &args.oauth2_token {
        return AuthMode::OAuth2 {
            access_token: token.clone(),
        };
    }
    match (&args.username, &args.password) {
        (Some(username), Some(password)) => AuthMode::HttpBasic {
            username: username.clone(),
            password: password.clone(),
        },
        _ => AuthMode::None,
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::INFO)
        .init();

    let args = cli::Cli::parse();

    let request = DownloadRequest {
        url: url::Url::parse(&args.url)?,
        extra_headers: parse_headers(&args.headers)?,
        priority: if args.low_priority {
            Priority::Low
        } else {
            Priority::Normal
        },
        auth: create_auth_mode(&args),
        token: Token::new(args.url.clone()),
    };

    let reporter = Arc::new(ProgressReporter::new());
    let observer: Arc<dyn DownloadObserver> = reporter.clone();
    let task = DownloadTask::with_http_transport(request, &observer);

    task.start()?;
    task.wait().await;

    let body = match reporter.take_outcome() {
        Some(DownloadOutcome::Success(body)) => body,
        Some(DownloadOutcome::Failure(message)) => {
            error!("下载失败: {}", message);
            return Err(message.into());
        }
        None => return Err("任务未产生结果".into()),
    };

    // 可选的焦点裁剪后处理
    if let Some(crop) = &args.crop {
        let target = parse_size(crop)?;
        let focus = parse_focus(&args.focus)?;
        let image = image::load_from_memory(&body)?;
        info!(
            "裁剪图像: {}x{} -> {}x{}, 焦点 ({}, {})",
            image.width(),
            image.height(),
            target.0,
            target.1,
            focus.0,
            focus.1
        );
        let cropped = imaging::focused_crop(&image, target, focus)?;
        cropped.save(&args.output)?;
    } else {
        tokio::fs::write(&args.output, &body).await?;
    }

    println!("{}: {}", "下载完成".green(), args.output.display());
    Ok(())
}
