//! 部署管理 API
//!
//! 提供部署的完整生命周期：
//! - 创建：获取模板 → 合并覆盖值 → 提交
//! - 查询：基本信息、编辑用详细信息（404 视为"已不存在"，不是错误）
//! - 修改、删除（幂等）
//! - 启动/停止部署下的全部桌面

use reqwest::{Method, StatusCode};
use tracing::info;

use crate::client::{RawResponse, VdiClient};
use crate::error::{PowerAction, Result, VdiError};
use crate::models::{
    extract_created_id, parse_body, Deployment, DeploymentPayload, DeploymentSpec,
    DeploymentUpdate, JsonMap,
};
use crate::resolver::resolve_deployment;

/// 部署管理 API
pub struct DeploymentApi<'a> {
    client: &'a VdiClient,
}

impl<'a> DeploymentApi<'a> {
    /// 创建新的部署 API 实例
    pub(crate) fn new(client: &'a VdiClient) -> Self {
        Self { client }
    }

    /// 获取模板并解析出创建请求体，不提交
    pub async fn resolve(&self, spec: &DeploymentSpec) -> Result<DeploymentPayload> {
        let template = self
            .client
            .template()
            .get(&spec.template_id)
            .await
            .map_err(|e| VdiError::TemplateFetch {
                template_id: spec.template_id.clone(),
                source: Box::new(e),
            })?;

        Ok(resolve_deployment(spec, &template))
    }

    /// 创建部署，返回平台分配的 ID
    ///
    /// 模板获取失败时整个创建中止，返回 `VdiError::TemplateFetch`。
    ///
    /// # Example
    /// ```ignore
    /// let spec = DeploymentSpec::new("lab-2024", "template-id")
    ///     .with_desktop_name("student")
    ///     .with_vcpus(4);
    /// let id = client.deployment().create(&spec).await?;
    /// ```
    pub async fn create(&self, spec: &DeploymentSpec) -> Result<String> {
        info!("创建部署: {} (模板 {})", spec.name, spec.template_id);
        let payload = self.resolve(spec).await?;
        self.create_resolved(&payload).await
    }

    /// 提交已解析好的创建请求体
    pub async fn create_resolved(&self, payload: &DeploymentPayload) -> Result<String> {
        let response = self
            .client
            .send(Method::POST, "/deployments", Some(payload))
            .await?;

        let id = created_id(response)?;
        info!("部署创建成功: {} -> {}", payload.name, id);
        Ok(id)
    }

    /// 查询部署信息
    ///
    /// 返回 `Ok(None)` 表示部署已不存在 (404)，调用方应丢弃本地记录。
    pub async fn get(&self, deployment_id: &str) -> Result<Option<Deployment>> {
        info!("查询部署: {}", deployment_id);
        let response = self
            .client
            .send::<()>(Method::GET, &format!("/deployment/{}", deployment_id), None)
            .await?;

        match read_body(response)? {
            Some(body) => parse_read(&body).map(Some),
            None => Ok(None),
        }
    }

    /// 查询部署的编辑用详细信息
    ///
    /// 字段随平台版本变化，原样返回 JSON 对象。
    pub async fn get_info(&self, deployment_id: &str) -> Result<Option<JsonMap>> {
        info!("查询部署详细信息: {}", deployment_id);
        let response = self
            .client
            .send::<()>(Method::GET, &format!("/deployment/info/{}", deployment_id), None)
            .await?;

        match read_body(response)? {
            Some(body) => parse_read(&body).map(Some),
            None => Ok(None),
        }
    }

    /// 修改部署
    pub async fn update(&self, deployment_id: &str, update: &DeploymentUpdate) -> Result<()> {
        info!("修改部署: {}", deployment_id);
        let response = self
            .client
            .send(Method::PUT, &format!("/deployment/{}", deployment_id), Some(update))
            .await?;

        if response.status != StatusCode::OK {
            return Err(VdiError::Update {
                status: response.code(),
                body: response.body,
            });
        }
        Ok(())
    }

    /// 删除部署
    ///
    /// # Arguments
    /// * `deployment_id` - 部署 ID
    /// * `permanent` - 是否彻底删除（否则平台仅做标记）
    ///
    /// 部署已不存在 (404) 也视为成功。
    pub async fn delete(&self, deployment_id: &str, permanent: bool) -> Result<()> {
        info!("删除部署: {}, 彻底删除: {}", deployment_id, permanent);
        let response = self
            .client
            .send::<()>(
                Method::DELETE,
                &format!("/deployments/{}/{}", deployment_id, permanent),
                None,
            )
            .await?;

        deleted(response)
    }

    /// 启动部署下的全部桌面
    pub async fn start(&self, deployment_id: &str) -> Result<()> {
        self.power(deployment_id, PowerAction::Start).await
    }

    /// 停止部署下的全部桌面
    pub async fn stop(&self, deployment_id: &str) -> Result<()> {
        self.power(deployment_id, PowerAction::Stop).await
    }

    async fn power(&self, deployment_id: &str, action: PowerAction) -> Result<()> {
        info!("部署电源操作: {} {}", action, deployment_id);
        let response = self
            .client
            .send::<()>(
                Method::PUT,
                &format!("/deployments/{}/{}", action.as_path(), deployment_id),
                None,
            )
            .await?;

        if response.status != StatusCode::OK {
            return Err(VdiError::StartStop {
                action,
                status: response.code(),
                body: response.body,
            });
        }
        Ok(())
    }
}

/// 解析创建响应：200/201 且带字符串 `id`
pub(crate) fn created_id(response: RawResponse) -> Result<String> {
    if !response.status_in(&[StatusCode::OK, StatusCode::CREATED]) {
        return Err(VdiError::Create {
            status: response.code(),
            body: response.body,
        });
    }

    let status = response.code();
    extract_created_id(&response.body).ok_or(VdiError::Create {
        status,
        body: response.body,
    })
}

/// 读取类接口的状态判定：200 返回响应体，404 返回 `None`
pub(crate) fn read_body(response: RawResponse) -> Result<Option<String>> {
    match response.status {
        StatusCode::OK => Ok(Some(response.body)),
        StatusCode::NOT_FOUND => Ok(None),
        _ => Err(VdiError::Read {
            status: response.code(),
            body: response.body,
        }),
    }
}

/// 读取成功但响应体无法解析时，同样归为读取错误
pub(crate) fn parse_read<T: serde::de::DeserializeOwned>(body: &str) -> Result<T> {
    parse_body(body).map_err(|_| VdiError::Read {
        status: StatusCode::OK.as_u16(),
        body: body.to_string(),
    })
}

/// 删除类接口的状态判定：200/204/404 均视为成功
pub(crate) fn deleted(response: RawResponse) -> Result<()> {
    if response.status_in(&[StatusCode::OK, StatusCode::NO_CONTENT, StatusCode::NOT_FOUND]) {
        return Ok(());
    }

    Err(VdiError::Delete {
        status: response.code(),
        body: response.body,
    })
}
