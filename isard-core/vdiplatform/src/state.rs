//! 观测状态记录
//!
//! 调用方（编排层）在创建/读取之后保存的实体状态。
//! 创建成功后会做一次尽力而为的刷新：刷新失败只记录告警，不回滚创建。
//! 刷新时实体已不存在则返回 `None`，调用方应删除本地记录。

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::client::VdiClient;
use crate::error::Result;
use crate::models::{Deployment, DeploymentSpec, Desktop, DesktopSpec, JsonMap};

/// 部署观测状态
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DeploymentState {
    pub id: String,
    pub name: String,
    pub description: String,
    pub template_id: String,
    pub desktop_name: String,
    pub visible: bool,
    pub allowed: JsonMap,
    pub total_desktops: i64,
    pub visible_desktops: i64,
    pub started_desktops: i64,
    pub creating_desktops: i64,
}

impl DeploymentState {
    /// 由创建参数得到的初始状态（尚未读取远端）
    pub fn planned(id: impl Into<String>, spec: &DeploymentSpec) -> Self {
        Self {
            id: id.into(),
            name: spec.name.clone(),
            description: spec.description.clone(),
            template_id: spec.template_id.clone(),
            desktop_name: spec.desktop_name.clone(),
            visible: spec.visible,
            allowed: spec.allowed.clone(),
            ..Default::default()
        }
    }

    /// 用远端读取结果覆盖本地状态
    pub fn apply(&mut self, remote: &Deployment) {
        self.name = remote.name.clone();
        self.description = remote.description.clone();
        self.desktop_name = remote.desktop_name.clone();
        self.visible = remote.visible;
        self.allowed = remote.allowed.clone();
        if !remote.template_id.is_empty() {
            self.template_id = remote.template_id.clone();
        }
        self.total_desktops = remote.total_desktops;
        self.visible_desktops = remote.visible_desktops;
        self.started_desktops = remote.started_desktops;
        self.creating_desktops = remote.creating_desktops;
    }

    /// 创建部署并尽力刷新一次
    pub async fn provision(client: &VdiClient, spec: &DeploymentSpec) -> Result<Self> {
        let id = client.deployment().create(spec).await?;
        let mut state = Self::planned(id, spec);

        match client.deployment().get(&state.id).await {
            Ok(Some(remote)) => state.apply(&remote),
            Ok(None) => warn!("部署 {} 创建后立即读取返回 404", state.id),
            Err(e) => warn!("部署 {} 创建后刷新失败: {}", state.id, e),
        }

        Ok(state)
    }

    /// 重新读取远端状态；`None` 表示部署已不存在
    pub async fn refresh(mut self, client: &VdiClient) -> Result<Option<Self>> {
        let Some(remote) = client.deployment().get(&self.id).await? else {
            return Ok(None);
        };
        self.apply(&remote);
        Ok(Some(self))
    }
}

/// 持久桌面观测状态
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DesktopState {
    pub id: String,
    pub name: String,
    pub description: String,
    pub template_id: String,
    pub vcpus: Option<i64>,
    /// 内存：创建参数中的值，读取后为平台原值
    pub memory: Option<f64>,
}

impl DesktopState {
    pub fn planned(id: impl Into<String>, spec: &DesktopSpec) -> Self {
        Self {
            id: id.into(),
            name: spec.name.clone(),
            description: spec.description.clone(),
            template_id: spec.template_id.clone(),
            vcpus: spec.vcpus,
            memory: spec.memory,
        }
    }

    /// 创建后的刷新：只补全平台计算出的值，不覆盖名称和模板
    fn apply_computed(&mut self, remote: &Desktop) {
        if !remote.description.is_empty() {
            self.description = remote.description.clone();
        }
        self.apply_hardware(remote);
    }

    /// 读取刷新：名称、描述、模板以远端为准
    pub fn apply(&mut self, remote: &Desktop) {
        self.name = remote.name.clone();
        self.description = remote.description.clone();
        self.template_id = remote.template_id.clone();
        self.apply_hardware(remote);
    }

    // 远端给出 0 或缺失时保留本地值
    fn apply_hardware(&mut self, remote: &Desktop) {
        if let Some(vcpus) = remote.vcpus.filter(|v| *v > 0) {
            self.vcpus = Some(vcpus);
        }
        if let Some(memory) = remote.memory.filter(|m| *m > 0.0) {
            self.memory = Some(memory);
        }
    }

    /// 创建持久桌面并尽力刷新一次
    pub async fn provision(client: &VdiClient, spec: &DesktopSpec) -> Result<Self> {
        let id = client.desktop().create(spec).await?;
        let mut state = Self::planned(id, spec);

        match client.desktop().get(&state.id).await {
            Ok(Some(remote)) => state.apply_computed(&remote),
            Ok(None) => warn!("桌面 {} 创建后立即读取返回 404", state.id),
            Err(e) => warn!("桌面 {} 创建后刷新失败: {}", state.id, e),
        }

        Ok(state)
    }

    /// 重新读取远端状态；`None` 表示桌面已不存在
    pub async fn refresh(mut self, client: &VdiClient) -> Result<Option<Self>> {
        let Some(remote) = client.desktop().get(&self.id).await? else {
            return Ok(None);
        };
        self.apply(&remote);
        Ok(Some(self))
    }
}
