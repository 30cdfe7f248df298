//! Isard VDI 平台客户端核心实现

use std::fmt;
use std::time::Duration;

use reqwest::{Client, Method, StatusCode};
use serde::Serialize;
use tracing::{debug, warn};

use crate::api::{DeploymentApi, DesktopApi, GroupApi, TemplateApi};
use crate::auth::{AuthMethod, AuthNegotiator};
use crate::error::{Result, VdiError};

/// API 路径前缀
pub const API_PREFIX: &str = "/api/v3";

/// 客户端配置
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// 连接超时（秒）
    pub connect_timeout: u64,

    /// 请求超时（秒）
    pub request_timeout: u64,

    /// 是否验证 SSL 证书（平台通常使用自签名证书）
    pub verify_ssl: bool,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            connect_timeout: 10,
            request_timeout: 60,
            verify_ssl: false,
        }
    }
}

/// 规范化平台地址：无 scheme 时补 `https://`，去掉末尾的 `/`
pub fn normalize_endpoint(endpoint: &str) -> Result<String> {
    let endpoint = endpoint.trim().trim_end_matches('/');
    if endpoint.is_empty() {
        return Err(VdiError::Config("endpoint 不能为空".to_string()));
    }

    if endpoint.contains("://") {
        Ok(endpoint.to_string())
    } else {
        Ok(format!("https://{}", endpoint))
    }
}

/// 原始响应：状态码 + 响应体文本
#[derive(Debug, Clone)]
pub(crate) struct RawResponse {
    pub status: StatusCode,
    pub body: String,
}

impl RawResponse {
    pub fn status_in(&self, accepted: &[StatusCode]) -> bool {
        accepted.contains(&self.status)
    }

    pub fn code(&self) -> u16 {
        self.status.as_u16()
    }
}

/// Isard VDI 平台客户端（已认证会话）
///
/// 只能通过认证得到；token 在构造后不可变，
/// 因此可以在多个任务之间共享（`Clone` 只复制连接池句柄和字符串）。
#[derive(Clone)]
pub struct VdiClient {
    /// 平台基础 URL
    base_url: String,

    /// HTTP 客户端
    http_client: Client,

    /// 会话 token
    token: String,
}

impl VdiClient {
    /// 连接平台并完成认证
    pub async fn connect(endpoint: &str, config: ClientConfig, auth: &AuthMethod) -> Result<Self> {
        let base_url = normalize_endpoint(endpoint)?;
        let http_client = build_http_client(&config)?;

        let token = AuthNegotiator::new(&http_client, &base_url)
            .authenticate(auth)
            .await?;

        Ok(Self {
            base_url,
            http_client,
            token,
        })
    }

    /// 使用已签发的 token 创建客户端
    pub fn with_token(endpoint: &str, config: ClientConfig, token: impl Into<String>) -> Result<Self> {
        Ok(Self {
            base_url: normalize_endpoint(endpoint)?,
            http_client: build_http_client(&config)?,
            token: token.into(),
        })
    }

    /// 部署管理 API
    ///
    /// # Example
    /// ```ignore
    /// let id = client.deployment().create(&spec).await?;
    /// client.deployment().start(&id).await?;
    /// ```
    pub fn deployment(&self) -> DeploymentApi<'_> {
        DeploymentApi::new(self)
    }

    /// 持久桌面管理 API
    pub fn desktop(&self) -> DesktopApi<'_> {
        DesktopApi::new(self)
    }

    /// 模板查询 API
    pub fn template(&self) -> TemplateApi<'_> {
        TemplateApi::new(self)
    }

    /// 用户组查询 API
    pub fn group(&self) -> GroupApi<'_> {
        GroupApi::new(self)
    }

    /// 平台基础 URL
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// 当前会话 token
    pub fn token(&self) -> &str {
        &self.token
    }

    /// 发送 API 请求，返回状态码和响应体，由调用方解释状态
    ///
    /// 不做重试；网络层失败直接返回 `VdiError::Transport`。
    pub(crate) async fn send<T: Serialize + ?Sized>(
        &self,
        method: Method,
        path: &str,
        body: Option<&T>,
    ) -> Result<RawResponse> {
        let url = format!("{}{}{}", self.base_url, API_PREFIX, path);
        debug!("Isard API 请求: {} {}", method, url);

        let mut request = self
            .http_client
            .request(method, &url)
            .bearer_auth(&self.token)
            .header("Content-Type", "application/json");

        if let Some(body) = body {
            request = request.json(body);
        }

        let response = request.send().await?;
        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            warn!("API 请求返回非成功状态: {} {} - {}", status, url, body);
        }

        Ok(RawResponse { status, body })
    }
}

impl fmt::Debug for VdiClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("VdiClient")
            .field("base_url", &self.base_url)
            .field("token", &"***")
            .finish()
    }
}

fn build_http_client(config: &ClientConfig) -> Result<Client> {
    Client::builder()
        .timeout(Duration::from_secs(config.request_timeout))
        .connect_timeout(Duration::from_secs(config.connect_timeout))
        .danger_accept_invalid_certs(!config.verify_ssl)
        .build()
        .map_err(|e| VdiError::Config(e.to_string()))
}
