//! 模板查询命令

use anyhow::{Context, Result};

use crate::commands::common::create_client;
use crate::commands::output::output_document;
use crate::config::CliConfig;
use crate::TemplateAction;

pub async fn handle(action: TemplateAction, config: &CliConfig, format: &str) -> Result<()> {
    match action {
        TemplateAction::Show { id } => {
            let client = create_client(config).await?;
            let template = client
                .template()
                .get(&id)
                .await
                .with_context(|| format!("读取模板 {} 失败", id))?;

            output_document(&template, format)?;
        }
    }
    Ok(())
}
