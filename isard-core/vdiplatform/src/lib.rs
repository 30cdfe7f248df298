//! Isard VDI 平台客户端
//!
//! 提供与 Isard VDI `api/v3` 交互的客户端实现。
//!
//! # 功能
//!
//! - **认证协商** (`AuthNegotiator`): `token` / `form` 两种登录流程，兼容多种响应形态
//! - **配置解析** (`resolver`): 模板默认值 + 调用方覆盖值 → 创建请求体
//! - **部署管理** (`DeploymentApi`): 创建、查询、修改、删除、启动、停止
//! - **持久桌面管理** (`DesktopApi`): 创建、查询、删除
//! - **模板查询** (`TemplateApi`)
//! - **用户组查询** (`GroupApi`): 支持按名称/分类过滤
//! - **观测状态** (`state`): 创建后刷新、404 时丢弃记录
//!
//! # 示例
//!
//! ```ignore
//! use isard_vdiplatform::{AuthMethod, ClientConfig, DeploymentSpec, VdiClient};
//!
//! // 认证并创建客户端
//! let auth = AuthMethod::form("admin", "password", "default");
//! let client = VdiClient::connect("isard.example.org", ClientConfig::default(), &auth).await?;
//!
//! // 从模板创建部署，覆盖 CPU 数
//! let spec = DeploymentSpec::new("lab-2024", "template-id").with_vcpus(4);
//! let id = client.deployment().create(&spec).await?;
//!
//! // 启动部署下的全部桌面
//! client.deployment().start(&id).await?;
//!
//! // 404 表示已不存在
//! if client.deployment().get(&id).await?.is_none() {
//!     println!("deployment gone");
//! }
//! ```

pub mod api;
pub mod auth;
pub mod client;
pub mod error;
pub mod models;
pub mod resolver;
pub mod state;

pub use auth::{extract_token, AuthMethod, AuthNegotiator, DEFAULT_CATEGORY};
pub use client::{normalize_endpoint, ClientConfig, VdiClient};
pub use error::{PowerAction, Result, VdiError};

// 导出 API 模块
pub use api::{DeploymentApi, DesktopApi, GroupApi, TemplateApi};

// 导出数据模型
pub use models::{
    // 模板
    Template, TemplateHardware,

    // 部署
    Deployment, DeploymentPayload, DeploymentSpec, DeploymentUpdate, HardwarePayload, Reservables,

    // 持久桌面
    Desktop, DesktopHardware, DesktopPayload, DesktopSpec,

    // 用户组
    Group, GroupFilter,

    JsonMap,
};

pub use resolver::{resolve_deployment, resolve_desktop};
pub use state::{DeploymentState, DesktopState};
