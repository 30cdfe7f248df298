//! 持久桌面模型

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::truncate;

/// 持久桌面创建参数
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DesktopSpec {
    pub name: String,

    #[serde(default)]
    pub description: String,

    pub template_id: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vcpus: Option<i64>,

    /// 内存 (GB)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub memory: Option<f64>,
}

/// 持久桌面硬件覆盖；只包含显式指定的字段
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DesktopHardware {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vcpus: Option<i64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub memory: Option<f64>,
}

/// 持久桌面创建请求体 (`POST /api/v3/persistent_desktop`)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DesktopPayload {
    pub name: String,

    pub template_id: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub hardware: Option<DesktopHardware>,
}

/// 桌面信息 (`GET /api/v3/domain/info/{id}`)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Desktop {
    pub id: String,
    pub name: String,
    pub description: String,
    pub template_id: String,
    pub vcpus: Option<i64>,
    /// 内存，平台 `hardware.memory` 原值（单位由平台决定）
    pub memory: Option<f64>,
}

impl Desktop {
    /// 从 domain info 响应中提取桌面信息
    ///
    /// 该接口的响应字段很多且不稳定，只挑选需要的部分，
    /// 缺失或类型不符的字段保持默认值。
    pub fn from_domain_info(id: &str, info: &Value) -> Self {
        let text = |v: &Value| v.as_str().unwrap_or_default().to_string();

        Self {
            id: id.to_string(),
            name: text(&info["name"]),
            description: text(&info["description"]),
            template_id: text(&info["create_dict"]["origin"]),
            vcpus: info["hardware"]["vcpus"].as_f64().map(truncate),
            memory: info["hardware"]["memory"].as_f64(),
        }
    }
}
