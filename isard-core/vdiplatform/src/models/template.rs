//! 模板模型

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use super::{lenient_number, lenient_object, lenient_string, JsonMap};

/// 模板信息 (`GET /api/v3/template/{id}`)
///
/// 只读；每次解析配置前都重新获取，不做缓存。
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Template {
    #[serde(default, deserialize_with = "lenient_string")]
    pub id: Option<String>,

    #[serde(default, deserialize_with = "lenient_string")]
    pub name: Option<String>,

    /// 硬件默认值；模板可能完全没有该字段
    #[serde(default, deserialize_with = "lenient_hardware")]
    pub hardware: Option<TemplateHardware>,

    #[serde(default, deserialize_with = "lenient_object")]
    pub guest_properties: Option<JsonMap>,

    #[serde(default, deserialize_with = "lenient_object")]
    pub image: Option<JsonMap>,
}

/// 模板硬件配置
///
/// 列表类字段的元素结构由平台决定，原样透传。
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TemplateHardware {
    #[serde(default)]
    pub boot_order: Option<Value>,

    #[serde(default)]
    pub disk_bus: Option<Value>,

    #[serde(default)]
    pub disks: Option<Value>,

    #[serde(default)]
    pub floppies: Option<Value>,

    #[serde(default)]
    pub isos: Option<Value>,

    #[serde(default)]
    pub videos: Option<Value>,

    /// 旧版模板使用单数字段名
    #[serde(default)]
    pub video: Option<Value>,

    #[serde(default, deserialize_with = "lenient_number")]
    pub vcpus: Option<f64>,

    /// 内存 (KiB)
    #[serde(default, deserialize_with = "lenient_number")]
    pub memory: Option<f64>,
}

fn lenient_hardware<'de, D>(deserializer: D) -> std::result::Result<Option<TemplateHardware>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(v @ Value::Object(_)) => serde_json::from_value(v).ok(),
        _ => None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_template_full() {
        let tpl: Template = serde_json::from_value(json!({
            "id": "tpl-1",
            "name": "ubuntu",
            "hardware": {
                "vcpus": 4.0,
                "memory": 4194304,
                "videos": ["default"],
                "disk_bus": "virtio",
                "boot_order": ["disk"]
            },
            "guest_properties": {"credentials": {"username": "isard"}},
            "image": {"type": "stock", "id": "img"}
        }))
        .unwrap();

        let hw = tpl.hardware.unwrap();
        assert_eq!(hw.vcpus, Some(4.0));
        assert_eq!(hw.memory, Some(4194304.0));
        assert_eq!(hw.disk_bus, Some(json!("virtio")));
        assert!(hw.isos.is_none());
        assert!(tpl.guest_properties.unwrap().contains_key("credentials"));
        assert_eq!(tpl.image.unwrap()["type"], "stock");
    }

    #[test]
    fn test_template_without_hardware() {
        let tpl: Template = serde_json::from_value(json!({"id": "tpl-2"})).unwrap();
        assert!(tpl.hardware.is_none());
        assert!(tpl.guest_properties.is_none());
        assert!(tpl.image.is_none());
    }

    #[test]
    fn test_template_drifted_types() {
        // 类型不符的字段视为缺失，而不是整体解析失败
        let tpl: Template = serde_json::from_value(json!({
            "hardware": {"vcpus": "four", "memory": null},
            "guest_properties": "oops",
            "image": []
        }))
        .unwrap();

        let hw = tpl.hardware.unwrap();
        assert_eq!(hw.vcpus, None);
        assert_eq!(hw.memory, None);
        assert!(tpl.guest_properties.is_none());
        assert!(tpl.image.is_none());

        let tpl: Template = serde_json::from_value(json!({"hardware": "n/a"})).unwrap();
        assert!(tpl.hardware.is_none());
    }
}
