//! 用户组查询 API
//!
//! 提供管理员视角的用户组列表，用于：
//! - 填写部署的 `allowed.groups`
//! - 按名称或分类查找用户组

use reqwest::{Method, StatusCode};
use tracing::info;

use crate::client::VdiClient;
use crate::error::{Result, VdiError};
use crate::models::{parse_body, Group, GroupFilter};

/// 用户组查询 API
pub struct GroupApi<'a> {
    client: &'a VdiClient,
}

impl<'a> GroupApi<'a> {
    /// 创建新的用户组 API 实例
    pub(crate) fn new(client: &'a VdiClient) -> Self {
        Self { client }
    }

    /// 获取全部用户组
    ///
    /// 调用 GET /api/v3/admin/groups
    pub async fn list(&self) -> Result<Vec<Group>> {
        info!("查询用户组列表");

        let response = self
            .client
            .send::<()>(Method::GET, "/admin/groups", None)
            .await?;

        if response.status != StatusCode::OK {
            return Err(VdiError::Request {
                endpoint: "admin/groups",
                status: response.code(),
                body: response.body,
            });
        }

        let groups: Vec<Group> = parse_body(&response.body)?;
        info!("获取到 {} 个用户组", groups.len());
        Ok(groups)
    }

    /// 按条件过滤用户组
    ///
    /// # Arguments
    /// * `filter` - 名称子串（不区分大小写）和/或分类 ID
    pub async fn list_filtered(&self, filter: &GroupFilter) -> Result<Vec<Group>> {
        let groups = self.list().await?;
        Ok(filter.apply(groups))
    }
}
