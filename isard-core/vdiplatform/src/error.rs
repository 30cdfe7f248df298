//! Isard VDI 平台错误定义
//!
//! 每类生命周期操作对应一个独立变体，均携带 HTTP 状态码和原始响应体，
//! 便于调用方直接诊断远端问题。传输层失败 (`Transport`) 与 HTTP 状态失败分开。

use std::fmt;

use thiserror::Error;

/// 部署电源操作
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PowerAction {
    Start,
    Stop,
}

impl PowerAction {
    /// 对应的 URL 路径段
    pub fn as_path(&self) -> &'static str {
        match self {
            PowerAction::Start => "start",
            PowerAction::Stop => "stop",
        }
    }
}

impl fmt::Display for PowerAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_path())
    }
}

/// VDI 平台错误类型
#[derive(Error, Debug)]
pub enum VdiError {
    /// 网络层失败（连接拒绝、超时、TLS 等），与 HTTP 状态错误区分
    #[error("HTTP 传输错误: {0}")]
    Transport(String),

    /// 认证失败或响应中没有可用的 token
    #[error("认证错误: {message}")]
    Auth {
        message: String,
        status: Option<u16>,
        body: String,
    },

    /// 获取模板失败，整个创建流程中止
    #[error("获取模板 {template_id} 失败: {source}")]
    TemplateFetch {
        template_id: String,
        #[source]
        source: Box<VdiError>,
    },

    #[error("创建失败 (status {status}): {body}")]
    Create { status: u16, body: String },

    #[error("读取失败 (status {status}): {body}")]
    Read { status: u16, body: String },

    #[error("更新失败 (status {status}): {body}")]
    Update { status: u16, body: String },

    #[error("删除失败 (status {status}): {body}")]
    Delete { status: u16, body: String },

    #[error("{action} 操作失败 (status {status}): {body}")]
    StartStop {
        action: PowerAction,
        status: u16,
        body: String,
    },

    /// 其它接口（模板、组列表等）返回非成功状态
    #[error("API 错误 [{endpoint}] (status {status}): {body}")]
    Request {
        endpoint: &'static str,
        status: u16,
        body: String,
    },

    #[error("解析错误: {0}")]
    Parse(String),

    #[error("配置错误: {0}")]
    Config(String),
}

impl VdiError {
    /// 远端返回的 HTTP 状态码（传输/解析/配置错误没有状态码）
    pub fn status(&self) -> Option<u16> {
        match self {
            VdiError::Auth { status, .. } => *status,
            VdiError::TemplateFetch { source, .. } => source.status(),
            VdiError::Create { status, .. }
            | VdiError::Read { status, .. }
            | VdiError::Update { status, .. }
            | VdiError::Delete { status, .. }
            | VdiError::StartStop { status, .. }
            | VdiError::Request { status, .. } => Some(*status),
            VdiError::Transport(_) | VdiError::Parse(_) | VdiError::Config(_) => None,
        }
    }

    /// 是否为网络层失败（包括被模板获取包装的情况）
    pub fn is_transport(&self) -> bool {
        match self {
            VdiError::Transport(_) => true,
            VdiError::TemplateFetch { source, .. } => source.is_transport(),
            _ => false,
        }
    }
}

impl From<reqwest::Error> for VdiError {
    fn from(e: reqwest::Error) -> Self {
        VdiError::Transport(e.to_string())
    }
}

/// VDI 平台结果类型
pub type Result<T> = std::result::Result<T, VdiError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_passthrough() {
        let err = VdiError::Delete {
            status: 500,
            body: "boom".into(),
        };
        assert_eq!(err.status(), Some(500));
        assert!(!err.is_transport());

        let err = VdiError::Transport("connection refused".into());
        assert_eq!(err.status(), None);
        assert!(err.is_transport());
    }

    #[test]
    fn test_template_fetch_wraps_source() {
        let err = VdiError::TemplateFetch {
            template_id: "tpl-1".into(),
            source: Box::new(VdiError::Transport("timeout".into())),
        };
        assert!(err.is_transport());
        assert_eq!(err.status(), None);
        assert!(err.to_string().contains("tpl-1"));

        let err = VdiError::TemplateFetch {
            template_id: "tpl-2".into(),
            source: Box::new(VdiError::Request {
                endpoint: "template",
                status: 403,
                body: "forbidden".into(),
            }),
        };
        assert_eq!(err.status(), Some(403));
    }

    #[test]
    fn test_power_action_display() {
        assert_eq!(PowerAction::Start.to_string(), "start");
        assert_eq!(PowerAction::Stop.as_path(), "stop");
    }
}
