//! 认证策略选择：把认证模式映射为要附加的请求头，
//! 以及是否预期服务端发起质询。纯映射，不做任何网络 I/O。

pub mod errors;

pub use errors::AuthError;
use errors::Result;

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as BASE64;
use chrono::Utc;
use hmac::{Hmac, Mac};
use reqwest::header::{AUTHORIZATION, HeaderName, HeaderValue};
use sha1::Sha1;
use url::Url;

type HmacSha1 = Hmac<Sha1>;

/// 认证模式。每个变体只携带该模式必需的字段，
/// 从类型上排除互相矛盾的组合；留空的字段视为缺失。
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum AuthMode {
    /// 不使用认证，收到质询时直接拒绝
    #[default]
    None,
    /// HTTP 认证自协商：凭据在收到质询后才附上
    Http { username: String, password: String },
    /// 强制 HTTP Basic：凭据在请求发出前就附在 Authorization 头上，
    /// 不等待质询；此时再收到质询按失败处理
    HttpBasic { username: String, password: String },
    /// OAuth 1.0 签名认证，四个字段缺一不可
    OAuth1 {
        consumer_key: String,
        consumer_secret: String,
        access_token: String,
        access_token_secret: String,
    },
    /// OAuth 2.0 Bearer 令牌
    OAuth2 { access_token: String },
}

impl AuthMode {
    pub fn name(&self) -> &'static str {
        match self {
            AuthMode::None => "None",
            AuthMode::Http { .. } => "HTTP",
            AuthMode::HttpBasic { .. } => "HTTPBasic",
            AuthMode::OAuth1 { .. } => "OAuth1",
            AuthMode::OAuth2 { .. } => "OAuth2",
        }
    }
}

/// 策略选择的结果：要附加的请求头 + 是否预期质询
#[derive(Debug, Clone)]
pub struct AuthHeaders {
    pub headers: Vec<(HeaderName, HeaderValue)>,
    pub expect_challenge: bool,
}

impl AuthHeaders {
    fn none() -> Self {
        Self {
            headers: Vec::new(),
            expect_challenge: false,
        }
    }
}

/// 按认证模式决定附加哪些请求头。
/// 凭据字段缺失时返回 MissingCredentials，此时不应打开任何网络句柄。
pub fn resolve(mode: &AuthMode, method: &str, url: &Url) -> Result<AuthHeaders> {
    match mode {
        AuthMode::None => Ok(AuthHeaders::none()),
        AuthMode::Http { username, password } => {
            require(username, mode, "username")?;
            require(password, mode, "password")?;
            // 凭据留到质询阶段再附上
            Ok(AuthHeaders {
                headers: Vec::new(),
                expect_challenge: true,
            })
        }
        AuthMode::HttpBasic { username, password } => {
            require(username, mode, "username")?;
            require(password, mode, "password")?;
            Ok(AuthHeaders {
                headers: vec![basic_header(username, password)?],
                expect_challenge: false,
            })
        }
        AuthMode::OAuth1 {
            consumer_key,
            consumer_secret,
            access_token,
            access_token_secret,
        } => {
            require(consumer_key, mode, "consumer_key")?;
            require(consumer_secret, mode, "consumer_secret")?;
            require(access_token, mode, "access_token")?;
            require(access_token_secret, mode, "access_token_secret")?;
            let timestamp = Utc::now().timestamp();
            let nonce = format!("{:016x}", rand::random::<u64>());
            let value = oauth1_header(
                consumer_key,
                consumer_secret,
                access_token,
                access_token_secret,
                method,
                url,
                timestamp,
                &nonce,
            )?;
            Ok(AuthHeaders {
                headers: vec![(AUTHORIZATION, value)],
                expect_challenge: false,
            })
        }
        AuthMode::OAuth2 { access_token } => {
            require(access_token, mode, "access_token")?;
            let value = HeaderValue::from_str(&format!("Bearer {access_token}"))
                .map_err(|e| AuthError::InvalidCredentials(e.to_string()))?;
            Ok(AuthHeaders {
                headers: vec![(AUTHORIZATION, value)],
                expect_challenge: false,
            })
        }
    }
}

fn require(field: &str, mode: &AuthMode, name: &'static str) -> Result<()> {
    if field.is_empty() {
        return Err(AuthError::MissingCredentials {
            mode: mode.name(),
            field: name,
        });
    }
    Ok(())
}

/// 构造 HTTP Basic 的 Authorization 头
pub fn basic_header(username: &str, password: &str) -> Result<(HeaderName, HeaderValue)> {
    let encoded = BASE64.encode(format!("{username}:{password}"));
    let value = HeaderValue::from_str(&format!("Basic {encoded}"))
        .map_err(|e| AuthError::InvalidCredentials(e.to_string()))?;
    Ok((AUTHORIZATION, value))
}

/// 构造 OAuth 1.0 的 Authorization 头（HMAC-SHA1 签名）。
/// 时间戳与随机串由调用方传入，同样的输入总是产生同样的签名。
#[allow(clippy::too_many_arguments)]
pub(crate) fn oauth1_header(
    consumer_key: &str,
    consumer_secret: &str,
    access_token: &str,
    access_token_secret: &str,
    method: &str,
    url: &Url,
    timestamp: i64,
    nonce: &str,
) -> Result<HeaderValue> {
    let timestamp = timestamp.to_string();

    // 参与签名的参数按字典序排列
    let mut params: Vec<(String, String)> = vec![
        ("oauth_consumer_key".into(), consumer_key.into()),
        ("oauth_nonce".into(), nonce.into()),
        ("oauth_signature_method".into(), "HMAC-SHA1".into()),
        ("oauth_timestamp".into(), timestamp.clone()),
        ("oauth_token".into(), access_token.into()),
        ("oauth_version".into(), "1.0".into()),
    ];
    for (key, value) in url.query_pairs() {
        params.push((key.into_owned(), value.into_owned()));
    }
    params.sort();

    let param_string = params
        .iter()
        .map(|(key, value)| format!("{}={}", percent(key), percent(value)))
        .collect::<Vec<_>>()
        .join("&");

    // 基准 URL 不含查询串与片段
    let mut base_url = url.clone();
    base_url.set_query(None);
    base_url.set_fragment(None);

    let base = format!(
        "{}&{}&{}",
        method.to_uppercase(),
        percent(base_url.as_str()),
        percent(&param_string)
    );
    let signing_key = format!(
        "{}&{}",
        percent(consumer_secret),
        percent(access_token_secret)
    );

    let mut mac = HmacSha1::new_from_slice(signing_key.as_bytes())
        .map_err(|e| AuthError::InvalidCredentials(e.to_string()))?;
    mac.update(base.as_bytes());
    let signature = BASE64.encode(mac.finalize().into_bytes());

    let header = format!(
        "OAuth oauth_consumer_key=\"{}\", oauth_nonce=\"{}\", oauth_signature=\"{}\", \
         oauth_signature_method=\"HMAC-SHA1\", oauth_timestamp=\"{}\", \
         oauth_token=\"{}\", oauth_version=\"1.0\"",
        percent(consumer_key),
        percent(nonce),
        percent(&signature),
        timestamp,
        percent(access_token)
    );
    HeaderValue::from_str(&header).map_err(|e| AuthError::InvalidCredentials(e.to_string()))
}

// RFC 3986 百分号编码
fn percent(s: &str) -> String {
    urlencoding::encode(s).into_owned()
}
