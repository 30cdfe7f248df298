//! Isard VDI 平台数据模型
//!
//! 远端返回的 JSON 结构并不稳定（字段可能缺失、类型可能漂移），
//! 因此这里的模型全部使用 `Option` 字段并配合宽松反序列化：
//! "字段缺失" 与 "字段存在但为 0" 在结构上是可区分的，配置解析依赖这一点。

mod deployment;
mod desktop;
mod group;
mod template;

pub use deployment::{
    Deployment, DeploymentPayload, DeploymentSpec, DeploymentUpdate, HardwarePayload, Reservables,
};
pub use desktop::{Desktop, DesktopHardware, DesktopPayload, DesktopSpec};
pub use group::{Group, GroupFilter};
pub use template::{Template, TemplateHardware};

use serde::{Deserialize, Deserializer};
use serde_json::{Map, Value};

use crate::error::{Result, VdiError};

/// JSON 对象类型别名
pub type JsonMap = Map<String, Value>;

/// 创建接口的响应，只关心远端分配的 `id`
///
/// 返回 `None` 表示响应不是 JSON 或 `id` 缺失/不是字符串。
pub(crate) fn extract_created_id(body: &str) -> Option<String> {
    let value: Value = serde_json::from_str(body).ok()?;
    value.get("id")?.as_str().map(str::to_string)
}

/// 将 JSON 数值截断为整数（不四舍五入）
pub(crate) fn truncate(value: f64) -> i64 {
    value.trunc() as i64
}

/// 判断一个 JSON 值是否"有内容"：null、空数组、空对象、空字符串都视为缺失
pub(crate) fn is_present(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Array(items) => !items.is_empty(),
        Value::Object(map) => !map.is_empty(),
        Value::String(s) => !s.is_empty(),
        _ => true,
    }
}

/// 解析 JSON 响应体，失败时带上原始内容
pub(crate) fn parse_body<T: serde::de::DeserializeOwned>(body: &str) -> Result<T> {
    serde_json::from_str(body)
        .map_err(|e| VdiError::Parse(format!("{}: {}", e, body)))
}

/// `null` 按缺失处理，取类型默认值
pub(crate) fn null_or_default<'de, D, T>(deserializer: D) -> std::result::Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// 宽松数值：任意 JSON 类型，只有数字才会被接受
pub(crate) fn lenient_number<'de, D>(deserializer: D) -> std::result::Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.and_then(|v| v.as_f64()))
}

/// 宽松对象：只有 JSON 对象才会被接受，其它类型视为缺失
pub(crate) fn lenient_object<'de, D>(deserializer: D) -> std::result::Result<Option<JsonMap>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::Object(map)) => Some(map),
        _ => None,
    })
}

/// 宽松字符串
pub(crate) fn lenient_string<'de, D>(deserializer: D) -> std::result::Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::String(s)) => Some(s),
        _ => None,
    })
}
