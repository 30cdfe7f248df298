//! 模板查询 API

use reqwest::{Method, StatusCode};
use tracing::info;

use crate::client::VdiClient;
use crate::error::{Result, VdiError};
use crate::models::{parse_body, Template};

/// 模板查询 API
pub struct TemplateApi<'a> {
    client: &'a VdiClient,
}

impl<'a> TemplateApi<'a> {
    /// 创建新的模板 API 实例
    pub(crate) fn new(client: &'a VdiClient) -> Self {
        Self { client }
    }

    /// 查询模板详情
    pub async fn get(&self, template_id: &str) -> Result<Template> {
        info!("查询模板详情: {}", template_id);

        let response = self
            .client
            .send::<()>(Method::GET, &format!("/template/{}", template_id), None)
            .await?;

        if response.status != StatusCode::OK {
            return Err(VdiError::Request {
                endpoint: "template",
                status: response.code(),
                body: response.body,
            });
        }

        parse_body(&response.body)
    }
}
