//! 公共工具函数模块
//!
//! 提供各命令模块共享的功能，包括：
//! - 按配置创建并认证 VDI 客户端
//! - 按扩展名读取参数文件 (YAML/JSON/TOML)

use anyhow::{Context, Result};
use isard_vdiplatform::VdiClient;
use serde::de::DeserializeOwned;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

use crate::config::CliConfig;

/// 创建并认证 VDI 客户端
pub async fn create_client(config: &CliConfig) -> Result<VdiClient> {
    let provider = &config.provider;
    let auth = provider.auth_method()?;

    info!("连接 Isard 平台: {} ({})", provider.endpoint, auth.name());

    VdiClient::connect(&provider.endpoint, provider.client_config(), &auth)
        .await
        .context("Isard 平台认证失败")
}

/// 读取参数文件，格式由扩展名决定 (yaml/yml/json/toml)
pub fn load_spec<T: DeserializeOwned>(path: &str) -> Result<T> {
    let path = PathBuf::from(shellexpand::tilde(path).as_ref());
    let content =
        fs::read_to_string(&path).with_context(|| format!("读取参数文件失败: {:?}", path))?;

    parse_spec(&path, &content)
}

fn parse_spec<T: DeserializeOwned>(path: &Path, content: &str) -> Result<T> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_lowercase())
        .unwrap_or_default();

    match ext.as_str() {
        "yaml" | "yml" => serde_yaml::from_str(content)
            .with_context(|| format!("解析 YAML 文件失败: {:?}", path)),
        "json" => serde_json::from_str(content)
            .with_context(|| format!("解析 JSON 文件失败: {:?}", path)),
        "toml" => {
            toml::from_str(content).with_context(|| format!("解析 TOML 文件失败: {:?}", path))
        }
        _ => anyhow::bail!("不支持的文件格式: {:?} (仅支持 yaml/yml/json/toml)", path),
    }
}
