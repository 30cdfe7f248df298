//! CLI 配置管理
//!
//! **数据存储方式**: TOML 文件 (默认 ~/.config/isard/config.toml)
//!
//! 环境变量优先于配置文件：
//! - `ISARD_ENDPOINT`
//! - `ISARD_TOKEN`
//! - `ISARD_USERNAME`
//! - `ISARD_PASSWORD`

use anyhow::{Context, Result};
use isard_vdiplatform::{AuthMethod, ClientConfig, DEFAULT_CATEGORY};
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

/// CLI 配置
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CliConfig {
    /// 平台连接配置
    #[serde(default)]
    pub provider: ProviderConfig,
}

/// 认证方式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AuthKind {
    Token,
    Form,
}

/// 平台连接配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderConfig {
    /// 平台地址（主机名或完整 URL）
    #[serde(default)]
    pub endpoint: String,

    /// 认证方式；未设置时直接使用 `token`
    pub auth_method: Option<AuthKind>,

    /// 分类 ID
    #[serde(default = "default_category")]
    pub category_id: String,

    pub token: Option<String>,

    pub username: Option<String>,

    pub password: Option<String>,

    /// 是否验证 SSL 证书
    #[serde(default)]
    pub verify_ssl: bool,

    /// 请求超时 (秒)
    #[serde(default = "default_request_timeout")]
    pub request_timeout: u64,
}

fn default_category() -> String {
    DEFAULT_CATEGORY.to_string()
}

fn default_request_timeout() -> u64 {
    60
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            endpoint: String::new(),
            auth_method: None,
            category_id: default_category(),
            token: None,
            username: None,
            password: None,
            verify_ssl: false,
            request_timeout: default_request_timeout(),
        }
    }
}

impl CliConfig {
    /// 默认配置文件路径
    pub fn default_path() -> Result<PathBuf> {
        let home = dirs::home_dir().context("无法获取用户主目录")?;
        Ok(home.join(".config").join("isard").join("config.toml"))
    }

    /// 加载配置：指定路径 > 默认路径；文件不存在时使用默认值，然后应用环境变量
    pub fn load(path: Option<&str>) -> Result<Self> {
        let path = match path {
            Some(p) => PathBuf::from(shellexpand::tilde(p).as_ref()),
            None => Self::default_path()?,
        };

        let mut config = if path.exists() {
            Self::load_from_path(&path)?
        } else {
            Self::default()
        };

        config.provider.apply_env(|key| env::var(key).ok());
        Ok(config)
    }

    /// 从文件加载配置
    pub fn load_from_path(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("读取配置文件失败: {:?}", path))?;

        toml::from_str(&content).with_context(|| format!("解析配置文件失败: {:?}", path))
    }
}

impl ProviderConfig {
    /// 应用环境变量覆盖
    pub fn apply_env(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(endpoint) = lookup("ISARD_ENDPOINT") {
            self.endpoint = endpoint;
        }
        if let Some(token) = lookup("ISARD_TOKEN") {
            self.token = Some(token);
        }
        if let Some(username) = lookup("ISARD_USERNAME") {
            self.username = Some(username);
        }
        if let Some(password) = lookup("ISARD_PASSWORD") {
            self.password = Some(password);
        }
    }

    /// 校验配置并得到认证方式
    pub fn auth_method(&self) -> Result<AuthMethod> {
        if self.endpoint.trim().is_empty() {
            anyhow::bail!("未配置平台地址 (provider.endpoint / ISARD_ENDPOINT)");
        }

        match self.auth_method {
            Some(AuthKind::Form) => match (&self.username, &self.password) {
                (Some(username), Some(password)) => Ok(AuthMethod::form(
                    username.clone(),
                    password.clone(),
                    self.category_id.clone(),
                )),
                _ => anyhow::bail!("使用 form 认证时必须同时提供 username 和 password"),
            },
            Some(AuthKind::Token) => {
                let token = self
                    .token
                    .as_ref()
                    .context("使用 token 认证时必须提供 token")?;
                Ok(AuthMethod::token(token.clone(), self.category_id.clone()))
            }
            None => {
                let token = self
                    .token
                    .as_ref()
                    .context("未配置认证方式，且未提供 token")?;
                Ok(AuthMethod::Static(token.clone()))
            }
        }
    }

    /// HTTP 客户端配置
    pub fn client_config(&self) -> ClientConfig {
        ClientConfig {
            request_timeout: self.request_timeout,
            verify_ssl: self.verify_ssl,
            ..Default::default()
        }
    }
}
