//! 部署 (deployment) 模型

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use super::{null_or_default, JsonMap};

/// 部署创建参数（调用方提供，可部分填写）
///
/// `vcpus` / `memory` 为 `None` 时回退到模板值；显式的 0 不会触发回退。
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DeploymentSpec {
    /// 部署名称
    pub name: String,

    #[serde(default)]
    pub description: String,

    /// 模板 ID
    pub template_id: String,

    /// 部署内桌面的名称
    #[serde(default)]
    pub desktop_name: String,

    /// 桌面是否对用户可见
    #[serde(default)]
    pub visible: bool,

    /// 允许访问的主体（roles/categories/groups/users）
    #[serde(default)]
    pub allowed: JsonMap,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vcpus: Option<i64>,

    /// 内存 (GB)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub memory: Option<f64>,

    #[serde(default)]
    pub interfaces: Vec<String>,

    #[serde(default)]
    pub guest_properties: JsonMap,

    #[serde(default)]
    pub image: JsonMap,

    #[serde(default)]
    pub user_permissions: Vec<String>,
}

impl DeploymentSpec {
    /// 创建只包含必填字段的参数
    pub fn new(name: impl Into<String>, template_id: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            template_id: template_id.into(),
            ..Default::default()
        }
    }

    pub fn with_vcpus(mut self, vcpus: i64) -> Self {
        self.vcpus = Some(vcpus);
        self
    }

    pub fn with_memory(mut self, memory_gb: f64) -> Self {
        self.memory = Some(memory_gb);
        self
    }

    pub fn with_desktop_name(mut self, desktop_name: impl Into<String>) -> Self {
        self.desktop_name = desktop_name.into();
        self
    }

    pub fn with_interfaces(mut self, interfaces: Vec<String>) -> Self {
        self.interfaces = interfaces;
        self
    }

    pub fn with_guest_property(mut self, key: impl Into<String>, value: Value) -> Self {
        self.guest_properties.insert(key.into(), value);
        self
    }
}

/// `reservables` 固定值
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reservables {
    pub vgpus: Vec<String>,
}

impl Default for Reservables {
    fn default() -> Self {
        Self {
            vgpus: vec!["None".to_string()],
        }
    }
}

/// 解析后的硬件配置
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HardwarePayload {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub boot_order: Option<Value>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub disk_bus: Option<Value>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub disks: Option<Value>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub floppies: Option<Value>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub isos: Option<Value>,

    /// 平台要求必须存在且非空
    pub videos: Value,

    pub vcpus: i64,

    /// 内存 (GB)
    pub memory: i64,

    pub interfaces: Vec<String>,

    pub reservables: Reservables,
}

impl Default for HardwarePayload {
    fn default() -> Self {
        Self {
            boot_order: None,
            disk_bus: None,
            disks: None,
            floppies: None,
            isos: None,
            videos: json!(["default"]),
            vcpus: 2,
            memory: 2,
            interfaces: vec!["default".to_string(), "wireguard".to_string()],
            reservables: Reservables::default(),
        }
    }
}

/// 部署创建请求体 (`POST /api/v3/deployments`)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeploymentPayload {
    pub name: String,
    pub description: String,
    pub template_id: String,
    pub desktop_name: String,
    pub visible: bool,
    pub allowed: JsonMap,
    pub user_permissions: Vec<String>,
    pub hardware: HardwarePayload,
    pub guest_properties: JsonMap,
    pub image: JsonMap,
}

/// 部署信息 (`GET /api/v3/deployment/{id}`)
///
/// 平台对空字段可能返回 `null`，与缺失同样取默认值。
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Deployment {
    #[serde(default, deserialize_with = "null_or_default")]
    pub id: String,

    #[serde(default, deserialize_with = "null_or_default")]
    pub name: String,

    #[serde(default, deserialize_with = "null_or_default")]
    pub description: String,

    #[serde(default, deserialize_with = "null_or_default")]
    pub desktop_name: String,

    #[serde(default, deserialize_with = "null_or_default")]
    pub visible: bool,

    /// 模板 ID
    #[serde(default, deserialize_with = "null_or_default", rename = "template")]
    pub template_id: String,

    #[serde(default, deserialize_with = "null_or_default")]
    pub allowed: JsonMap,

    #[serde(default, deserialize_with = "null_or_default", rename = "totalDesktops")]
    pub total_desktops: i64,

    #[serde(default, deserialize_with = "null_or_default", rename = "visibleDesktops")]
    pub visible_desktops: i64,

    #[serde(default, deserialize_with = "null_or_default", rename = "startedDesktops")]
    pub started_desktops: i64,

    #[serde(default, deserialize_with = "null_or_default", rename = "creatingDesktops")]
    pub creating_desktops: i64,
}

/// 部署部分更新 (`PUT /api/v3/deployment/{id}`)
///
/// 未设置的字段不会出现在请求体中。
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DeploymentUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub desktop_name: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub visible: Option<bool>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub allowed: Option<JsonMap>,

    /// 其它透传字段
    #[serde(flatten)]
    pub extra: JsonMap,
}

impl DeploymentUpdate {
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.description.is_none()
            && self.desktop_name.is_none()
            && self.visible.is_none()
            && self.allowed.is_none()
            && self.extra.is_empty()
    }
}
