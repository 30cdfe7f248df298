//! 配置解析
//!
//! 将模板默认值与调用方覆盖值合并为一个可直接提交的创建请求体。
//! 优先级：覆盖值 > 模板值 > 内置默认值。
//!
//! 解析本身是纯函数，永不失败；模板的获取由调用方在解析前完成。

use serde_json::{json, Value};

use crate::models::{
    is_present, truncate, DeploymentPayload, DeploymentSpec, DesktopHardware, DesktopPayload,
    DesktopSpec, HardwarePayload, JsonMap, Reservables, Template,
};

/// KiB -> GB
const KIB_PER_GB: f64 = 1024.0 * 1024.0;

/// 解析部署创建请求体
pub fn resolve_deployment(spec: &DeploymentSpec, template: &Template) -> DeploymentPayload {
    let defaults = HardwarePayload::default();
    let hw = template.hardware.clone().unwrap_or_default();

    let videos = [hw.videos, hw.video]
        .into_iter()
        .flatten()
        .find(is_present)
        .unwrap_or(defaults.videos);

    let vcpus = spec
        .vcpus
        .or_else(|| hw.vcpus.map(truncate))
        .unwrap_or(defaults.vcpus);

    let memory = match (spec.memory, hw.memory) {
        (Some(gb), _) => truncate(gb),
        (None, Some(kib)) => truncate(kib / KIB_PER_GB),
        (None, None) => defaults.memory,
    };

    let interfaces = if spec.interfaces.is_empty() {
        defaults.interfaces
    } else {
        spec.interfaces.clone()
    };

    let hardware = HardwarePayload {
        boot_order: hw.boot_order,
        disk_bus: hw.disk_bus,
        disks: hw.disks,
        floppies: hw.floppies,
        isos: hw.isos,
        videos,
        vcpus,
        memory,
        interfaces,
        // 无论模板或覆盖值如何，始终固定
        reservables: Reservables::default(),
    };

    DeploymentPayload {
        name: spec.name.clone(),
        description: spec.description.clone(),
        template_id: spec.template_id.clone(),
        desktop_name: spec.desktop_name.clone(),
        visible: spec.visible,
        allowed: spec.allowed.clone(),
        user_permissions: spec.user_permissions.clone(),
        hardware,
        guest_properties: merge_guest_properties(
            template.guest_properties.as_ref(),
            &spec.guest_properties,
        ),
        image: resolve_image(&spec.image, template.image.as_ref()),
    }
}

/// 浅合并：模板键保留，覆盖键优先
fn merge_guest_properties(template: Option<&JsonMap>, overrides: &JsonMap) -> JsonMap {
    let mut merged = template.cloned().unwrap_or_default();
    for (key, value) in overrides {
        merged.insert(key.clone(), value.clone());
    }
    merged
}

fn resolve_image(overrides: &JsonMap, template: Option<&JsonMap>) -> JsonMap {
    if !overrides.is_empty() {
        return overrides.clone();
    }
    if let Some(image) = template {
        return image.clone();
    }
    match json!({ "type": "user" }) {
        Value::Object(map) => map,
        _ => JsonMap::new(),
    }
}

/// 解析持久桌面创建请求体
///
/// 不读取模板：平台端会以模板为准补齐未指定的硬件。
pub fn resolve_desktop(spec: &DesktopSpec) -> DesktopPayload {
    let hardware = if spec.vcpus.is_some() || spec.memory.is_some() {
        Some(DesktopHardware {
            vcpus: spec.vcpus,
            memory: spec.memory,
        })
    } else {
        None
    };

    DesktopPayload {
        name: spec.name.clone(),
        template_id: spec.template_id.clone(),
        description: Some(spec.description.clone()).filter(|d| !d.is_empty()),
        hardware,
    }
}
