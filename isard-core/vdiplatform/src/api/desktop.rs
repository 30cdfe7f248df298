//! 持久桌面管理 API

use reqwest::Method;
use serde_json::Value;
use tracing::info;

use crate::api::deployment::{created_id, deleted, parse_read, read_body};
use crate::client::VdiClient;
use crate::error::Result;
use crate::models::{Desktop, DesktopSpec};
use crate::resolver::resolve_desktop;

/// 持久桌面管理 API
pub struct DesktopApi<'a> {
    client: &'a VdiClient,
}

impl<'a> DesktopApi<'a> {
    /// 创建新的持久桌面 API 实例
    pub(crate) fn new(client: &'a VdiClient) -> Self {
        Self { client }
    }

    /// 创建持久桌面，返回平台分配的 ID
    pub async fn create(&self, spec: &DesktopSpec) -> Result<String> {
        info!("创建持久桌面: {} (模板 {})", spec.name, spec.template_id);
        let payload = resolve_desktop(spec);

        let response = self
            .client
            .send(Method::POST, "/persistent_desktop", Some(&payload))
            .await?;

        let id = created_id(response)?;
        info!("持久桌面创建成功: {} -> {}", spec.name, id);
        Ok(id)
    }

    /// 查询桌面信息
    ///
    /// 返回 `Ok(None)` 表示桌面已不存在 (404)。
    pub async fn get(&self, desktop_id: &str) -> Result<Option<Desktop>> {
        info!("查询桌面: {}", desktop_id);
        let response = self
            .client
            .send::<()>(Method::GET, &format!("/domain/info/{}", desktop_id), None)
            .await?;

        let Some(body) = read_body(response)? else {
            return Ok(None);
        };

        let info: Value = parse_read(&body)?;
        Ok(Some(Desktop::from_domain_info(desktop_id, &info)))
    }

    /// 彻底删除桌面；桌面已不存在 (404) 也视为成功
    pub async fn delete(&self, desktop_id: &str) -> Result<()> {
        info!("删除桌面: {}", desktop_id);
        let response = self
            .client
            .send::<()>(Method::DELETE, &format!("/desktop/{}/true", desktop_id), None)
            .await?;

        deleted(response)
    }
}
