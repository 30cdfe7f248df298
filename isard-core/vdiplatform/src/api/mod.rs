//! Isard VDI 平台 API 模块
//!
//! - 部署管理 (DeploymentApi)
//! - 持久桌面管理 (DesktopApi)
//! - 模板查询 (TemplateApi)
//! - 用户组查询 (GroupApi)

pub mod deployment;
pub mod desktop;
pub mod group;
pub mod template;

pub use deployment::DeploymentApi;
pub use desktop::DesktopApi;
pub use group::GroupApi;
pub use template::TemplateApi;
