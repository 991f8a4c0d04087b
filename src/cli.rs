use clap::Parser;
use std::path::PathBuf;

/// 图片下载器
#[derive(Parser, Debug)]
#[command(name = "picdl")]
#[command(version = "1.0")]
#[command(author = "rpeng252@gmail.com")]
#[command(about = "一个简单的异步图片下载工具", long_about = None)]
pub struct Cli {
    /// 图片链接
    #[arg(long, value_name = "URL")]
    #[arg(value_hint = clap::ValueHint::Url)]
    pub url: String,

    /// 输出文件路径
    #[arg(long, value_name = "FILE")]
    #[arg(default_value = "output.png")]
    #[arg(value_hint = clap::ValueHint::FilePath)]
    pub output: PathBuf,

    /// 附加请求头，可重复
    #[arg(long = "header", value_name = "KEY:VALUE")]
    #[arg(help = "附加请求头，格式 key:value，可多次指定")]
    pub headers: Vec<String>,

    /// 低优先级下载
    #[arg(long)]
    pub low_priority: bool,

    /// 裁剪目标尺寸 (可选)
    #[arg(long, value_name = "WxH")]
    #[arg(help = "下载后裁剪到指定尺寸，如 400x400")]
    pub crop: Option<String>,

    /// 裁剪焦点位置
    #[arg(long, value_name = "X,Y")]
    #[arg(default_value = "0.5,0.5")]
    #[arg(help = "焦点在源图中的比例位置，0,0 为左上角，1,1 为右下角")]
    pub focus: String,

    /// HTTP Basic 用户名 (可选)
    #[arg(long, value_name = "USER")]
    pub username: Option<String>,

    /// HTTP Basic 密码 (可选)
    #[arg(long, value_name = "PASS")]
    pub password: Option<String>,

    /// OAuth2 访问令牌 (可选)
    #[arg(long, value_name = "TOKEN")]
    pub oauth2_token: Option<String>,
}
