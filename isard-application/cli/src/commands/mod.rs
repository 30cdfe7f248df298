//! CLI 命令处理模块

pub mod common; // 公共工具函数
pub mod deployment;
pub mod desktop;
pub mod group;
pub mod output;
pub mod template;
