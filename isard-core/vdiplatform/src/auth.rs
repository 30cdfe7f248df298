//! 认证协商
//!
//! 平台的登录接口有两种流程（`token` / `form`），响应体却有多种形态。
//! 这里把响应形态建模为一组按顺序尝试的匹配器，第一个命中的结果即为会话 token；
//! 都不命中且响应体非空时，整个响应体视为纯文本 token。

use std::fmt;

use reqwest::{Client, Method, StatusCode};
use serde_json::Value;
use tracing::{debug, info, warn};

use crate::error::{Result, VdiError};

/// 登录接口路径
pub const LOGIN_PATH: &str = "/authentication/login";

/// 默认分类 ID
pub const DEFAULT_CATEGORY: &str = "default";

/// 认证方式
#[derive(Clone, PartialEq, Eq)]
pub enum AuthMethod {
    /// 将预先配置的凭据发送到登录接口，换取新的会话 token
    Token { token: String, category_id: String },

    /// 以 multipart 表单提交用户名和密码
    Form {
        username: String,
        password: String,
        category_id: String,
    },

    /// 直接使用已签发的 token，不进行协商
    Static(String),
}

impl AuthMethod {
    pub fn token(token: impl Into<String>, category_id: impl Into<String>) -> Self {
        AuthMethod::Token {
            token: token.into(),
            category_id: category_id.into(),
        }
    }

    pub fn form(
        username: impl Into<String>,
        password: impl Into<String>,
        category_id: impl Into<String>,
    ) -> Self {
        AuthMethod::Form {
            username: username.into(),
            password: password.into(),
            category_id: category_id.into(),
        }
    }

    /// 方式名称，用于日志
    pub fn name(&self) -> &'static str {
        match self {
            AuthMethod::Token { .. } => "token",
            AuthMethod::Form { .. } => "form",
            AuthMethod::Static(_) => "static",
        }
    }
}

// 凭据不进日志
impl fmt::Debug for AuthMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AuthMethod::Token { category_id, .. } => f
                .debug_struct("Token")
                .field("token", &"***")
                .field("category_id", category_id)
                .finish(),
            AuthMethod::Form {
                username,
                category_id,
                ..
            } => f
                .debug_struct("Form")
                .field("username", username)
                .field("password", &"***")
                .field("category_id", category_id)
                .finish(),
            AuthMethod::Static(_) => f.debug_tuple("Static").field(&"***").finish(),
        }
    }
}

/// 响应形态匹配器
type TokenShape = fn(&Value) -> Option<String>;

/// `{"data": "<token>"}`
fn data_string(value: &Value) -> Option<String> {
    value.get("data")?.as_str().map(str::to_string)
}

/// `{"token": "<token>"}`
fn token_string(value: &Value) -> Option<String> {
    value.get("token")?.as_str().map(str::to_string)
}

/// `{"data": {"token": "<token>"}}`
fn nested_data_token(value: &Value) -> Option<String> {
    value.get("data")?.get("token")?.as_str().map(str::to_string)
}

/// 按优先级排列
const TOKEN_SHAPES: &[TokenShape] = &[data_string, token_string, nested_data_token];

/// 从登录响应体中提取 token
pub fn extract_token(body: &str) -> Result<String> {
    if let Ok(value) = serde_json::from_str::<Value>(body) {
        if let Some(token) = TOKEN_SHAPES.iter().find_map(|shape| shape(&value)) {
            return Ok(token);
        }
    }

    if !body.is_empty() {
        debug!("登录响应不是已知的 JSON 形态，按纯文本 token 处理");
        return Ok(body.to_string());
    }

    Err(VdiError::Auth {
        message: "登录响应中未找到 token".to_string(),
        status: None,
        body: body.to_string(),
    })
}

/// 认证协商器
///
/// 每个会话只运行一次；得到的 token 交给 [`crate::VdiClient`] 持有后不再变化。
pub struct AuthNegotiator<'a> {
    http_client: &'a Client,
    base_url: &'a str,
}

impl<'a> AuthNegotiator<'a> {
    pub fn new(http_client: &'a Client, base_url: &'a str) -> Self {
        Self {
            http_client,
            base_url,
        }
    }

    /// 执行认证并返回会话 token
    pub async fn authenticate(&self, method: &AuthMethod) -> Result<String> {
        info!("Isard 认证: method={}", method.name());

        let url = format!("{}{}", self.base_url, LOGIN_PATH);

        let request = match method {
            AuthMethod::Static(token) => return Ok(token.clone()),
            AuthMethod::Token { token, category_id } => self
                .http_client
                .request(Method::GET, &url)
                .query(&[("provider", "saml"), ("category_id", category_id.as_str())])
                .header("Authorization", token),
            AuthMethod::Form {
                username,
                password,
                category_id,
            } => {
                let form = reqwest::multipart::Form::new()
                    .text("username", username.clone())
                    .text("password", password.clone());
                self.http_client
                    .request(Method::POST, &url)
                    .query(&[("provider", "form"), ("category_id", category_id.as_str())])
                    .header("Accept", "text/plain")
                    .multipart(form)
            }
        };

        debug!("登录请求: {}", url);
        let response = request.send().await?;
        let status = response.status();
        let body = response.text().await?;

        if status != StatusCode::OK && status != StatusCode::CREATED {
            warn!("登录失败: {}", status);
            return Err(VdiError::Auth {
                message: format!("登录接口返回 {}", status),
                status: Some(status.as_u16()),
                body,
            });
        }

        let token = extract_token(&body)?;
        info!("Isard 认证成功");
        Ok(token)
    }
}
